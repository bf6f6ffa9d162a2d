use crate::ai::{AiError, GenerativeModel, ResponseShape};
use crate::configuration::AiClientSettings;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Secret<String>,
}

impl GeminiClient {
    pub fn new(settings: &AiClientSettings) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(serde::Serialize, Debug)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(serde::Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(serde::Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(serde::Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(serde::Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

fn request_body<'a>(prompt: &'a str, shape: Option<&ResponseShape>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: [RequestContent {
            role: "user",
            parts: [RequestPart { text: prompt }],
        }],
        generation_config: shape.map(|shape| GenerationConfig {
            response_mime_type: "application/json",
            response_schema: shape.to_schema(),
        }),
    }
}

/// Concatenates the text parts of the first candidate.
fn first_candidate_text(response: GenerateContentResponse) -> Result<String, AiError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AiError::EmptyCompletion);
    }
    Ok(text)
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[tracing::instrument(name = "Calling Gemini", skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str, shape: Option<&ResponseShape>) -> Result<String, AiError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request_body(prompt, shape))
            .send()
            .await
            .map_err(AiError::Transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(AiError::Transport)?;
        first_candidate_text(payload)
    }
}
