use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use async_trait::async_trait;
use boloflix::ai::{AiError, GenerativeModel, ResponseShape};
use boloflix::configuration::get_configuration;
use boloflix::domain::CustomerEmail;
use boloflix::email::Email;
use boloflix::startup::{Application, Dependencies};
use boloflix::store::InMemorySubscriptionStore;
use boloflix::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use std::sync::{Arc, Mutex};
use std::time::Duration;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const ADMIN_PASSWORD: &str = "fuba-com-goiabada";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

/// Records every email instead of sending it. Can be switched into an
/// outage where every send fails.
#[derive(Default)]
pub struct MockEmailClient {
    sent: Mutex<Vec<SentEmail>>,
    failing: bool,
}

impl MockEmailClient {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Email for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &CustomerEmail,
        subject: &str,
        html_content: &str,
        _text_content: &str,
    ) -> Result<(), anyhow::Error> {
        if self.failing {
            anyhow::bail!("SES is unreachable");
        }
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.as_ref().to_string(),
            subject: subject.to_string(),
            html: html_content.to_string(),
        });
        Ok(())
    }
}

enum Script {
    Reply(String),
    RateLimited,
    Unavailable,
}

/// Answers every prompt with the scripted reply and keeps the prompts it saw.
pub struct ScriptedModel {
    script: Mutex<Script>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new() -> Self {
        Self {
            script: Mutex::new(Script::Unavailable),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_with(&self, reply: impl Into<String>) {
        *self.script.lock().unwrap() = Script::Reply(reply.into());
    }

    pub fn rate_limit(&self) {
        *self.script.lock().unwrap() = Script::RateLimited;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str, _: Option<&ResponseShape>) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &*self.script.lock().unwrap() {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::RateLimited => Err(AiError::RateLimited),
            Script::Unavailable => Err(AiError::UnexpectedStatus {
                status: 503,
                body: "model overloaded".into(),
            }),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemorySubscriptionStore>,
    pub email_client: Arc<MockEmailClient>,
    pub model: Arc<ScriptedModel>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscriptions(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/subscriptions", body).await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn list_subscriptions(&self) -> Vec<serde_json::Value> {
        let response = self.get("/subscriptions").await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Listing was not a JSON array.")
    }

    pub async fn put_subscription(&self, id: i64, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .put(&format!("{}/subscriptions/{}", &self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_subscription(&self, id: i64) -> reqwest::Response {
        self.api_client
            .delete(&format!("{}/subscriptions/{}", &self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Notifications are detached from the request, so give them a moment.
    pub async fn wait_for_emails(&self, count: usize) -> Vec<SentEmail> {
        for _ in 0..50 {
            let sent = self.email_client.sent_emails();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.email_client.sent_emails()
    }
}

pub fn ana() -> serde_json::Value {
    serde_json::json!({
        "customerName": "Ana",
        "customerEmail": "ana@example.com",
        "planTitle": "Bolo Curioso",
        "planPrice": 60,
        "deliveryDay": "Quarta-feira",
        "deliveryTime": "Manhã",
    })
}

fn hash_admin_password() -> Secret<String> {
    let salt = SaltString::from_b64("Ym9sb2ZsaXgtdGVzdHM").unwrap();
    let hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).unwrap(),
    )
    .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
    .unwrap()
    .to_string();
    Secret::new(hash)
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockEmailClient::default()).await
}

pub async fn spawn_app_with(email_client: MockEmailClient) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.application.host = "127.0.0.1".parse().unwrap();
        c.admin.password_hash = hash_admin_password();
        c
    };

    let store = Arc::new(InMemorySubscriptionStore::new());
    let email_client = Arc::new(email_client);
    let model = Arc::new(ScriptedModel::new());

    let app = Application::build(
        &configuration,
        Dependencies {
            store: store.clone(),
            email_client: email_client.clone(),
            model: model.clone(),
        },
    )
    .await
    .expect("Failed to build application.");
    let port = app.port;
    let _ = tokio::spawn(app.server.launch());

    TestApp {
        address: format!(
            "http://127.0.0.1:{}",
            port.get().await.expect("Server never lifted off.")
        ),
        store,
        email_client,
        model,
        api_client: reqwest::Client::new(),
    }
}
