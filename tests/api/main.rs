mod helpers;
mod postgres_store;
mod subscriptions;
