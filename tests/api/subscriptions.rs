use crate::helpers::{ana, spawn_app, spawn_app_with, MockEmailClient};

#[tokio::test]
async fn subscribe_returns_a_201_for_valid_data() {
    let app = spawn_app().await;

    let response = app.post_subscriptions(&ana()).await;

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Assinatura criada com sucesso!");
    let data = &body["data"];
    assert!(data["id"].as_i64().is_some());
    assert!(data["created_at"].is_string());
    assert_eq!(data["customer_name"], "Ana");
    assert_eq!(data["plan_title"], "Bolo Curioso");
    assert_eq!(data["plan_price"].as_f64(), Some(60.0));
    assert_eq!(data["delivery_day"], "Quarta-feira");
    assert_eq!(data["delivery_time"], "Manhã");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn the_legacy_subscribe_path_creates_too() {
    let app = spawn_app().await;

    let response = app.post_json("/subscribe", &ana()).await;

    assert_eq!(201, response.status().as_u16());
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_data_is_missing() {
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({"planTitle": "Bolo Curioso", "planPrice": 60}),
            "missing the name",
        ),
        (
            serde_json::json!({"customerName": "Ana", "planPrice": 60}),
            "missing the plan",
        ),
        (
            serde_json::json!({"customerName": "Ana", "planTitle": "Bolo Curioso"}),
            "missing the price",
        ),
        (serde_json::json!({}), "missing everything"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_subscriptions(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["message"].is_string());
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn subscribe_returns_a_400_when_fields_are_present_but_invalid() {
    let app = spawn_app().await;
    let mut blank_name = ana();
    blank_name["customerName"] = " ".into();
    let mut bad_email = ana();
    bad_email["customerEmail"] = "ana-at-example.com".into();
    let mut negative_price = ana();
    negative_price["planPrice"] = (-1).into();
    let mut wrong_type = ana();
    wrong_type["planPrice"] = "sessenta".into();
    let mut huge_price = ana();
    huge_price["planPrice"] = 123_456_789_012_i64.into();

    for (invalid_body, description) in [
        (blank_name, "a blank name"),
        (bad_email, "an invalid email"),
        (negative_price, "a negative price"),
        (wrong_type, "a non-numeric price"),
        (huge_price, "a price too large to store"),
    ] {
        let response = app.post_subscriptions(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload had {}.",
            description
        );
    }
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn subscribing_notifies_the_kitchen_and_the_customer() {
    let app = spawn_app().await;

    app.post_subscriptions(&ana()).await;

    let sent = app.wait_for_emails(2).await;
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .any(|email| email.recipient == "cozinha@boloflix.com.br"
            && email.html.contains("Bolo Curioso")));
    assert!(sent
        .iter()
        .any(|email| email.recipient == "ana@example.com" && email.subject.contains("BoloFlix")));
}

#[tokio::test]
async fn without_a_customer_email_only_the_kitchen_is_notified() {
    let app = spawn_app().await;
    let mut body = ana();
    body.as_object_mut().unwrap().remove("customerEmail");

    let response = app.post_subscriptions(&body).await;

    assert_eq!(201, response.status().as_u16());
    let sent = app.wait_for_emails(1).await;
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(app.email_client.sent_emails().len(), 1);
    assert_eq!(sent[0].recipient, "cozinha@boloflix.com.br");
}

#[tokio::test]
async fn an_email_outage_does_not_fail_the_subscription() {
    let app = spawn_app_with(MockEmailClient::failing()).await;

    let response = app.post_subscriptions(&ana()).await;

    assert_eq!(201, response.status().as_u16());
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn subscriptions_are_listed_newest_first() {
    let app = spawn_app().await;
    for name in ["Ana", "Bia", "Carla"] {
        let mut body = ana();
        body["customerName"] = name.into();
        assert_eq!(201, app.post_subscriptions(&body).await.status().as_u16());
    }

    let rows = app.list_subscriptions().await;

    let names: Vec<_> = rows
        .iter()
        .map(|row| row["customer_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Carla", "Bia", "Ana"]);
}

#[tokio::test]
async fn an_update_patches_only_the_supplied_fields() {
    let app = spawn_app().await;
    let created: serde_json::Value = app.post_subscriptions(&ana()).await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .put_subscription(
            id,
            &serde_json::json!({"delivery_day": "Sexta-feira", "planPrice": 119.9}),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Assinatura atualizada com sucesso.");
    assert_eq!(body["data"]["delivery_day"], "Sexta-feira");
    assert_eq!(body["data"]["plan_price"].as_f64(), Some(119.9));
    assert_eq!(body["data"]["customer_name"], "Ana");
    assert_eq!(body["data"]["created_at"], created["data"]["created_at"]);
}

#[tokio::test]
async fn blank_optional_fields_are_cleared_on_update() {
    let app = spawn_app().await;
    let created: serde_json::Value = app.post_subscriptions(&ana()).await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .put_subscription(
            id,
            &serde_json::json!({"deliveryDay": "", "customerEmail": "", "customerName": "Ana"}),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["delivery_day"].is_null());
    assert!(body["data"]["customer_email"].is_null());
    assert_eq!(body["data"]["delivery_time"], "Manhã");
}

#[tokio::test]
async fn an_update_with_a_price_too_large_to_store_is_rejected() {
    let app = spawn_app().await;
    let created: serde_json::Value = app.post_subscriptions(&ana()).await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .put_subscription(id, &serde_json::json!({"planPrice": 100_000_000}))
        .await;

    assert_eq!(400, response.status().as_u16());
    let rows = app.list_subscriptions().await;
    assert_eq!(rows[0]["plan_price"].as_f64(), Some(60.0));
}

#[tokio::test]
async fn updating_an_unknown_subscription_returns_404() {
    let app = spawn_app().await;

    let response = app
        .put_subscription(999, &serde_json::json!({"customerName": "Bia"}))
        .await;

    assert_eq!(404, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Assinatura não encontrada.");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn an_empty_update_is_a_bad_request() {
    let app = spawn_app().await;
    let created: serde_json::Value = app.post_subscriptions(&ana()).await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app.put_subscription(id, &serde_json::json!({})).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn a_deleted_subscription_disappears_from_the_list() {
    let app = spawn_app().await;
    let created: serde_json::Value = app.post_subscriptions(&ana()).await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app.delete_subscription(id).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Assinatura deletada com sucesso.");
    let rows = app.list_subscriptions().await;
    assert!(rows.iter().all(|row| row["id"].as_i64() != Some(id)));
}

#[tokio::test]
async fn deleting_an_unknown_subscription_returns_404() {
    let app = spawn_app().await;

    let response = app.delete_subscription(999).await;

    assert_eq!(404, response.status().as_u16());
}
