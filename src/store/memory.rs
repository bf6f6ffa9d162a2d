use crate::domain::{NewSubscription, SubscriptionPatch};
use crate::models::Subscription;
use crate::store::{StoreError, SubscriptionStore};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Process-local store used by the test-suite. Data is lost on drop.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    rows: RwLock<Vec<Subscription>>,
    next_id: RwLock<i64>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn get(&self, id: i64) -> Option<Subscription> {
        self.rows.read().await.iter().find(|row| row.id == id).cloned()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn create(&self, new: &NewSubscription) -> Result<Subscription, StoreError> {
        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let row = Subscription {
            id: *next_id,
            created_at: Utc::now(),
            customer_name: new.customer_name.as_ref().to_string(),
            customer_email: new.customer_email.as_ref().map(|e| e.as_ref().to_string()),
            plan_title: new.plan_title.as_ref().to_string(),
            plan_price: new.plan_price.value(),
            flavor_preference: new.flavor_preference.clone(),
            delivery_day: new.delivery_day.clone(),
            delivery_time: new.delivery_time.clone(),
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn update(&self, id: i64, patch: &SubscriptionPatch) -> Result<Subscription, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.apply(patch);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
