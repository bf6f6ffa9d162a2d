use crate::ai::GenerativeModel;
use crate::catchers::*;
use crate::configuration::Settings;
use crate::cors::{preflight, Cors};
use crate::email::Email;
use crate::notifier::Notifier;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use crate::store::SubscriptionStore;
use anyhow::anyhow;
use rocket::{Config, Ignite, Rocket};
use std::sync::Arc;

/// The collaborators the HTTP surface is wired to.
pub struct Dependencies {
    pub store: Arc<dyn SubscriptionStore>,
    pub email_client: Arc<dyn Email>,
    pub model: Arc<dyn GenerativeModel>,
}

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        dependencies: Dependencies,
    ) -> Result<Application, anyhow::Error> {
        let operator = configuration.notification.operator()?;
        let notifier = Notifier::new(dependencies.email_client, operator);
        let credentials = AdminCredentials::new(configuration.admin.password_hash.clone());

        let (port_saver, port) = port_saver::create_pair();
        let server = rocket::custom(Config {
            address: configuration.application.host,
            port: configuration.application.port.unwrap_or(0),
            ..Config::default()
        })
        .attach(port_saver)
        .attach(Cors::new(configuration.application.allowed_origin.clone()))
        .manage(dependencies.store)
        .manage(dependencies.model)
        .manage(notifier)
        .manage(credentials)
        .mount(
            "/",
            routes![
                index,
                health_check,
                preflight,
                subscribe,
                create_subscription,
                list_subscriptions,
                update_subscription,
                delete_subscription,
                verify_admin,
                taste_profile,
                check_availability,
                welcome_message,
                investor_pitch,
                business_model_canvas,
                financial_estimate,
                testimonials,
                custom_cake_description,
                cake_of_the_month,
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                unprocessable_entity_to_bad_request,
                not_found,
                internal_error,
            ],
        )
        .ignite()
        .await
        .map_err(|e| anyhow!("Failed to ignite the server: {}", e))?;

        Ok(Application { server, port })
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server
            .launch()
            .await
            .map(|_| ())
            .map_err(|e| anyhow!("Server stopped with an error: {}", e))
    }
}
