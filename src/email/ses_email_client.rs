use crate::configuration::{ConfigurationError, EmailClientSettings};
use crate::domain::CustomerEmail;
use crate::email::Email;
use anyhow::Context;
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_sesv2 as ses;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

pub struct SesEmailClient {
    ses_client: ses::Client,
    sender: CustomerEmail,
}

impl SesEmailClient {
    pub fn new(ses_client: ses::Client, sender: CustomerEmail) -> Self {
        Self { ses_client, sender }
    }

    /// Credentials and region come from the standard AWS environment chain.
    pub async fn from_settings(settings: &EmailClientSettings) -> Result<Self, ConfigurationError> {
        let sender = settings.sender()?;
        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(settings.timeout())
            .build();
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(timeout_config)
            .load()
            .await;
        Ok(Self::new(ses::Client::new(&shared_config), sender))
    }
}

fn utf8_content(data: &str) -> Result<Content, anyhow::Error> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .context("Failed to build email content.")
}

#[async_trait]
impl Email for SesEmailClient {
    #[tracing::instrument(name = "Sending email through SES", skip_all, fields(recipient = %recipient))]
    async fn send_email(
        &self,
        recipient: &CustomerEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), anyhow::Error> {
        let body = Body::builder()
            .html(utf8_content(html_content)?)
            .text(utf8_content(text_content)?)
            .build();
        let message = Message::builder()
            .subject(utf8_content(subject)?)
            .body(body)
            .build();
        let content = EmailContent::builder().simple(message).build();
        let destination = Destination::builder()
            .to_addresses(recipient.as_ref())
            .build();

        self.ses_client
            .send_email()
            .from_email_address(self.sender.as_ref())
            .destination(destination)
            .content(content)
            .send()
            .await
            .context("SES rejected the send request.")?;
        Ok(())
    }
}
