use anyhow::Context;
use boloflix::ai::GeminiClient;
use boloflix::configuration::get_configuration;
use boloflix::email::SesEmailClient;
use boloflix::startup::{Application, Dependencies};
use boloflix::store::PgSubscriptionStore;
use boloflix::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("boloflix".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;
    configuration.ensure_secrets_present()?;

    let store = PgSubscriptionStore::connect_lazy(&configuration.database);
    store.run_migrations().await?;
    let email_client = SesEmailClient::from_settings(&configuration.email_client).await?;
    let model = GeminiClient::new(&configuration.ai_client)
        .context("Failed to build the generative model client.")?;

    let application = Application::build(
        &configuration,
        Dependencies {
            store: Arc::new(store),
            email_client: Arc::new(email_client),
            model: Arc::new(model),
        },
    )
    .await?;
    application.run_until_stopped().await
}
