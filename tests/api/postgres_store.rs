//! Runs the Diesel store against a real Postgres. Each test gets a fresh
//! database. Run with `cargo test -- --ignored` once Postgres is up.

use boloflix::configuration::{get_configuration, DatabaseSettings};
use boloflix::domain::{CustomerName, NewSubscription, PlanPrice, PlanTitle, SubscriptionPatch};
use boloflix::store::{PgSubscriptionStore, StoreError, SubscriptionStore};
use claim::assert_ok;
use diesel::{Connection, PgConnection, RunQueryDsl};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use uuid::Uuid;

async fn configure_database() -> PgSubscriptionStore {
    let settings: DatabaseSettings = {
        let mut c = get_configuration()
            .expect("Failed to read configuration.")
            .database;
        c.database_name = Uuid::new_v4().to_string();
        c
    };

    let mut connection =
        PgConnection::establish(settings.connection_string_without_database().expose_secret())
            .expect("Failed to connect to Postgres.");
    diesel::sql_query(format!(r#"CREATE DATABASE "{}";"#, settings.database_name))
        .execute(&mut connection)
        .expect("Failed to create database.");

    let store = PgSubscriptionStore::connect_lazy(&settings);
    store
        .run_migrations()
        .await
        .expect("Failed to migrate the database.");
    store
}

fn new_subscription(name: &str) -> NewSubscription {
    NewSubscription {
        customer_name: CustomerName::parse(name.into()).unwrap(),
        customer_email: None,
        plan_title: PlanTitle::parse("Bolo Curioso".into()).unwrap(),
        plan_price: PlanPrice::parse(Decimal::new(11990, 2)).unwrap(),
        flavor_preference: Some("Chocolate".into()),
        delivery_day: Some("Quarta-feira".into()),
        delivery_time: Some("Manhã".into()),
    }
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn created_rows_round_trip_through_the_table() {
    let store = configure_database().await;

    let created = store.create(&new_subscription("Ana")).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.customer_name, "Ana");
    assert_eq!(created.plan_price, Decimal::new(11990, 2));
    assert_eq!(store.list().await.unwrap(), vec![created]);
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn rows_are_listed_newest_first() {
    let store = configure_database().await;
    for name in ["Ana", "Bia", "Carla"] {
        store.create(&new_subscription(name)).await.unwrap();
    }

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.customer_name)
        .collect();

    assert_eq!(names, vec!["Carla", "Bia", "Ana"]);
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn updates_patch_and_clear_columns() {
    let store = configure_database().await;
    let created = store.create(&new_subscription("Ana")).await.unwrap();
    let patch = SubscriptionPatch {
        delivery_day: Some(Some("Sexta-feira".into())),
        flavor_preference: Some(None),
        ..SubscriptionPatch::default()
    };

    let updated = store.update(created.id, &patch).await.unwrap();

    assert_eq!(updated.delivery_day.as_deref(), Some("Sexta-feira"));
    assert_eq!(updated.flavor_preference, None);
    assert_eq!(updated.delivery_time.as_deref(), Some("Manhã"));
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn updating_a_missing_row_is_not_found() {
    let store = configure_database().await;
    let patch = SubscriptionPatch {
        delivery_day: Some(Some("Sexta-feira".into())),
        ..SubscriptionPatch::default()
    };

    let result = store.update(42, &patch).await;

    assert!(matches!(result, Err(StoreError::NotFound(42))));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn deleting_twice_is_not_found() {
    let store = configure_database().await;
    let created = store.create(&new_subscription("Ana")).await.unwrap();

    assert_ok!(store.delete(created.id).await);
    let second = store.delete(created.id).await;

    assert!(matches!(second, Err(StoreError::NotFound(id)) if id == created.id));
    assert!(store.list().await.unwrap().is_empty());
}
