mod memory;
mod postgres;

use crate::domain::{NewSubscription, SubscriptionPatch};
use crate::models::Subscription;
use async_trait::async_trait;
pub use memory::InMemorySubscriptionStore;
pub use postgres::PgSubscriptionStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("No subscription with id {0}.")]
    NotFound(i64),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// The `subscriptions` table. Every operation is a single atomic statement.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn create(&self, new_subscription: &NewSubscription) -> Result<Subscription, StoreError>;

    /// All rows, newest first.
    async fn list(&self) -> Result<Vec<Subscription>, StoreError>;

    async fn update(&self, id: i64, patch: &SubscriptionPatch) -> Result<Subscription, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
