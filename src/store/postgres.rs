use crate::configuration::DatabaseSettings;
use crate::domain::{NewSubscription, SubscriptionPatch};
use crate::models::{NewSubscriptionRow, Subscription, SubscriptionChangeset};
use crate::schema::subscriptions;
use crate::store::{StoreError, SubscriptionStore};
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use secrecy::ExposeSecret;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type PgPool = Pool<ConnectionManager<PgConnection>>;

pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    /// Builds the pool without opening a connection; the first query (or
    /// `run_migrations`) is what actually reaches the database.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let manager =
            ConnectionManager::<PgConnection>::new(settings.connection_string().expose_secret());
        let pool = Pool::builder()
            .max_size(settings.max_connections)
            .connection_timeout(settings.connection_timeout())
            .build_unchecked(manager);
        Self { pool }
    }

    #[tracing::instrument(name = "Running pending migrations", skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        self.run(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|applied| {
                    tracing::info!(count = applied.len(), "Migrations applied");
                })
                .map_err(|e| anyhow!("Failed to run migrations: {}", e))
        })
        .await
    }

    async fn run<F, T>(&self, query: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, anyhow::Error> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        spawn_blocking_with_tracing(move || {
            let mut conn = pool
                .get()
                .context("Failed to retrieve a connection from the pool.")?;
            query(&mut conn)
        })
        .await
        .context("Database task panicked.")?
        .map_err(StoreError::Persistence)
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(name = "Saving new subscription in the database", skip_all)]
    async fn create(&self, new_subscription: &NewSubscription) -> Result<Subscription, StoreError> {
        let new_subscription = new_subscription.clone();
        self.run(move |conn| {
            diesel::insert_into(subscriptions::table)
                .values(NewSubscriptionRow::from(&new_subscription))
                .returning(Subscription::as_returning())
                .get_result(conn)
                .context("Failed to insert a new subscription.")
        })
        .await
    }

    #[tracing::instrument(name = "Listing subscriptions", skip(self))]
    async fn list(&self) -> Result<Vec<Subscription>, StoreError> {
        self.run(|conn| {
            subscriptions::table
                .select(Subscription::as_select())
                .order((subscriptions::created_at.desc(), subscriptions::id.desc()))
                .load(conn)
                .context("Failed to list subscriptions.")
        })
        .await
    }

    #[tracing::instrument(name = "Updating subscription", skip(self, patch))]
    async fn update(&self, id: i64, patch: &SubscriptionPatch) -> Result<Subscription, StoreError> {
        let patch = patch.clone();
        let updated = self
            .run(move |conn| {
                diesel::update(subscriptions::table.find(id))
                    .set(SubscriptionChangeset::from(&patch))
                    .returning(Subscription::as_returning())
                    .get_result(conn)
                    .optional()
                    .context("Failed to update the subscription.")
            })
            .await?;
        updated.ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(name = "Deleting subscription", skip(self))]
    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let deleted = self
            .run(move |conn| {
                diesel::delete(subscriptions::table.find(id))
                    .execute(conn)
                    .context("Failed to delete the subscription.")
            })
            .await?;
        match deleted {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }
}
