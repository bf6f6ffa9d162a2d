mod gemini_client;
pub mod prompts;
mod shape;

use async_trait::async_trait;
pub use gemini_client::GeminiClient;
use serde::de::DeserializeOwned;
pub use shape::ResponseShape;

#[derive(thiserror::Error, Debug)]
pub enum AiError {
    #[error("Failed to reach the generative model.")]
    Transport(#[source] reqwest::Error),
    #[error("The generative model is rate limiting us.")]
    RateLimited,
    #[error("The generative model answered with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("The generative model returned no text.")]
    EmptyCompletion,
    #[error("The generative model reply does not match the requested shape.")]
    MalformedReply(#[source] serde_json::Error),
}

/// A prompt-in, text-out generative model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// When `shape` is given the model is asked to answer with JSON of that
    /// shape; the raw reply text is returned either way.
    async fn generate(&self, prompt: &str, shape: Option<&ResponseShape>) -> Result<String, AiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Structured(serde_json::Value),
}

#[tracing::instrument(name = "Requesting a completion", skip_all, fields(structured = shape.is_some()))]
pub async fn complete(
    model: &dyn GenerativeModel,
    prompt: &str,
    shape: Option<&ResponseShape>,
) -> Result<Completion, AiError> {
    let reply = model.generate(prompt, shape).await?;
    match shape {
        None => Ok(Completion::Text(reply)),
        Some(_) => serde_json::from_str(strip_code_fence(&reply))
            .map(Completion::Structured)
            .map_err(AiError::MalformedReply),
    }
}

/// Requests a completion and deserializes it into `T`. Free-text replies
/// deserialize as a JSON string, so `T = String` fits unshaped prompts.
pub async fn complete_as<T: DeserializeOwned>(
    model: &dyn GenerativeModel,
    prompt: &str,
    shape: Option<&ResponseShape>,
) -> Result<T, AiError> {
    let value = match complete(model, prompt, shape).await? {
        Completion::Structured(value) => value,
        Completion::Text(text) => serde_json::Value::String(text),
    };
    serde_json::from_value(value).map_err(AiError::MalformedReply)
}

/// Models occasionally wrap JSON in a ```json fence despite being told not to.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
