use crate::domain::CustomerEmail;
use crate::email::Email;
use crate::models::Subscription;
use std::sync::Arc;
use tracing::Instrument;

const OPERATOR_SUBJECT: &str = "🎉 Novo pedido na BoloFlix!";
const CUSTOMER_SUBJECT: &str = "Bem-vindo(a) à família BoloFlix!";

/// A rendered email ready to be handed to an [`Email`] client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub recipient: CustomerEmail,
    pub subject: &'static str,
    pub html: String,
    pub text: String,
}

/// Best-effort transactional emails for new subscriptions.
#[derive(Clone)]
pub struct Notifier {
    email_client: Arc<dyn Email>,
    operator: CustomerEmail,
}

impl Notifier {
    pub fn new(email_client: Arc<dyn Email>, operator: CustomerEmail) -> Self {
        Self {
            email_client,
            operator,
        }
    }

    /// Dispatches the operator and customer emails as detached tasks and
    /// returns immediately. Delivery failures are logged, never returned.
    pub fn notify_new_subscription(&self, subscription: &Subscription) {
        self.dispatch(operator_notification(&self.operator, subscription));
        match customer_address(subscription) {
            Some(recipient) => self.dispatch(customer_welcome(recipient, subscription)),
            None => tracing::info!(
                subscription_id = subscription.id,
                "No usable customer address, skipping the welcome email"
            ),
        }
    }

    fn dispatch(&self, email: OutgoingEmail) {
        let email_client = Arc::clone(&self.email_client);
        let span = tracing::info_span!(
            "Delivering notification email",
            recipient = %email.recipient,
            subject = email.subject
        );
        tokio::spawn(
            async move {
                if let Err(error) = email_client
                    .send_email(&email.recipient, email.subject, &email.html, &email.text)
                    .await
                {
                    tracing::error!(
                        error.cause_chain = ?error,
                        error.message = %error,
                        "Failed to deliver a notification email"
                    );
                }
            }
            .instrument(span),
        );
    }
}

fn customer_address(subscription: &Subscription) -> Option<CustomerEmail> {
    let raw = subscription.customer_email.as_ref()?;
    match CustomerEmail::parse(raw.clone()) {
        Ok(email) => Some(email),
        Err(error) => {
            tracing::warn!(
                subscription_id = subscription.id,
                error.message = %error,
                "Stored customer address is invalid"
            );
            None
        }
    }
}

pub fn operator_notification(operator: &CustomerEmail, subscription: &Subscription) -> OutgoingEmail {
    let flavor = subscription
        .flavor_preference
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or("Sem preferência");
    let day = subscription.delivery_day.as_deref().unwrap_or("A combinar");
    let time = subscription.delivery_time.as_deref().unwrap_or("A combinar");
    let email = subscription.customer_email.as_deref().unwrap_or("Não informado");

    let html = format!(
        "<h1>Novo pedido recebido!</h1>\
         <p>Um novo cliente assinou a BoloFlix:</p>\
         <ul>\
         <li><strong>Nome:</strong> {name}</li>\
         <li><strong>Email:</strong> {email}</li>\
         <li><strong>Plano:</strong> {plan} (R$ {price})</li>\
         <li><strong>Preferência:</strong> {flavor}</li>\
         <li><strong>Entrega:</strong> {day}, {time}</li>\
         </ul>",
        name = escape_html(&subscription.customer_name),
        email = escape_html(email),
        plan = escape_html(&subscription.plan_title),
        price = subscription.plan_price,
        flavor = escape_html(flavor),
        day = escape_html(day),
        time = escape_html(time),
    );
    let text = format!(
        "Novo pedido recebido!\n\
         Nome: {}\nEmail: {}\nPlano: {} (R$ {})\nPreferência: {}\nEntrega: {}, {}",
        subscription.customer_name,
        email,
        subscription.plan_title,
        subscription.plan_price,
        flavor,
        day,
        time,
    );
    OutgoingEmail {
        recipient: operator.clone(),
        subject: OPERATOR_SUBJECT,
        html,
        text,
    }
}

pub fn customer_welcome(recipient: CustomerEmail, subscription: &Subscription) -> OutgoingEmail {
    let delivery = match (&subscription.delivery_day, &subscription.delivery_time) {
        (Some(day), Some(time)) => format!("{}, {}", day, time),
        (Some(day), None) => day.clone(),
        _ => "o dia combinado".to_string(),
    };
    let html = format!(
        "<h1>Olá, {name}!</h1>\
         <p>Sua assinatura do plano <strong>{plan}</strong> foi confirmada.</p>\
         <p>Sua primeira caixa chega em: <strong>{delivery}</strong>.</p>\
         <p>Com carinho,<br />Cozinha BoloFlix</p>",
        name = escape_html(&subscription.customer_name),
        plan = escape_html(&subscription.plan_title),
        delivery = escape_html(&delivery),
    );
    let text = format!(
        "Olá, {}!\nSua assinatura do plano {} foi confirmada.\n\
         Sua primeira caixa chega em: {}.\nCom carinho,\nCozinha BoloFlix",
        subscription.customer_name, subscription.plan_title, delivery
    );
    OutgoingEmail {
        recipient,
        subject: CUSTOMER_SUBJECT,
        html,
        text,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
