use crate::ai::prompts::{
    self, Availability, BusinessModelCanvas, CakeCreation, CakeOfTheMonth, DeliverySlot,
    GeneratedCake, Prompt, QuizAnswers, TasteProfile, Testimonial, WelcomeMessage,
    WelcomeRequest,
};
use crate::ai::{complete_as, AiError, GenerativeModel};
use crate::routes::{error_chain_fmt, MessageBody};
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(serde::Serialize, Debug)]
pub struct PitchResponse {
    pitch: String,
}

#[derive(serde::Serialize, Debug)]
pub struct CanvasResponse {
    canvas: BusinessModelCanvas,
}

#[derive(serde::Serialize, Debug)]
pub struct EstimateResponse {
    estimate: String,
}

#[derive(serde::Serialize, Debug)]
pub struct TestimonialsResponse {
    testimonials: Vec<Testimonial>,
}

#[derive(serde::Serialize, Debug)]
pub struct CakeResponse<T> {
    cake: T,
}

async fn ask<T: DeserializeOwned>(
    model: &State<Arc<dyn GenerativeModel>>,
    prompt: Prompt,
    action: &'static str,
) -> Result<T, AiRouteError> {
    complete_as(model.inner().as_ref(), &prompt.text, prompt.shape.as_ref())
        .await
        .map_err(|source| AiRouteError { action, source })
}

#[tracing::instrument(name = "Generating a taste profile", skip(answers, model))]
#[post("/taste-profile", data = "<answers>")]
pub async fn taste_profile(
    answers: Json<QuizAnswers>,
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<TasteProfile>, AiRouteError> {
    ask(model, prompts::taste_profile(&answers), "gerar seu perfil de sabor")
        .await
        .map(Json)
}

#[tracing::instrument(
    name = "Checking delivery availability",
    skip(slot, model),
    fields(day = %slot.day, time = %slot.time)
)]
#[post("/check-availability", data = "<slot>")]
pub async fn check_availability(
    slot: Json<DeliverySlot>,
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<Availability>, AiRouteError> {
    ask(model, prompts::check_availability(&slot), "verificar a disponibilidade")
        .await
        .map(Json)
}

/// Never fails: a canned greeting replaces any model failure.
#[tracing::instrument(name = "Generating a welcome message", skip(details, model))]
#[post("/welcome-message", data = "<details>")]
pub async fn welcome_message(
    details: Json<WelcomeRequest>,
    model: &State<Arc<dyn GenerativeModel>>,
) -> Json<WelcomeMessage> {
    match ask(model, prompts::welcome_message(&details), "gerar sua mensagem").await {
        Ok(message) => Json(message),
        Err(error) => {
            tracing::warn!(error.cause_chain = ?error, "Falling back to the canned welcome");
            Json(WelcomeMessage::fallback())
        }
    }
}

#[tracing::instrument(name = "Generating the investor pitch", skip(model))]
#[get("/investor-pitch")]
pub async fn investor_pitch(
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<PitchResponse>, AiRouteError> {
    let pitch = ask(model, prompts::investor_pitch(), "gerar o pitch").await?;
    Ok(Json(PitchResponse { pitch }))
}

#[tracing::instrument(name = "Generating the business model canvas", skip(model))]
#[get("/business-model-canvas")]
pub async fn business_model_canvas(
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<CanvasResponse>, AiRouteError> {
    let canvas = ask(model, prompts::business_model_canvas(), "gerar o canvas").await?;
    Ok(Json(CanvasResponse { canvas }))
}

#[tracing::instrument(name = "Generating the financial estimate", skip(model))]
#[get("/financial-estimate")]
pub async fn financial_estimate(
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<EstimateResponse>, AiRouteError> {
    let estimate = ask(
        model,
        prompts::financial_estimate(),
        "gerar a estimativa financeira",
    )
    .await?;
    Ok(Json(EstimateResponse { estimate }))
}

#[tracing::instrument(name = "Generating testimonials", skip(model))]
#[get("/testimonials")]
pub async fn testimonials(
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<TestimonialsResponse>, AiRouteError> {
    let testimonials = ask(model, prompts::testimonials(), "buscar os depoimentos").await?;
    Ok(Json(TestimonialsResponse { testimonials }))
}

#[tracing::instrument(name = "Describing a custom cake", skip(creation, model))]
#[post("/custom-cake-description", data = "<creation>")]
pub async fn custom_cake_description(
    creation: Json<CakeCreation>,
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<CakeResponse<GeneratedCake>>, AiRouteError> {
    let cake = ask(
        model,
        prompts::custom_cake_description(&creation),
        "criar a descrição do seu bolo",
    )
    .await?;
    Ok(Json(CakeResponse { cake }))
}

#[tracing::instrument(name = "Generating the cake of the month", skip(model))]
#[get("/cake-of-the-month")]
pub async fn cake_of_the_month(
    model: &State<Arc<dyn GenerativeModel>>,
) -> Result<Json<CakeResponse<CakeOfTheMonth>>, AiRouteError> {
    let cake = ask(model, prompts::cake_of_the_month(), "buscar o bolo do mês").await?;
    Ok(Json(CakeResponse { cake }))
}

/// A failed completion, tagged with what the visitor was trying to do.
#[derive(thiserror::Error)]
#[error("Failed to {action}.")]
pub struct AiRouteError {
    action: &'static str,
    #[source]
    source: AiError,
}

impl std::fmt::Debug for AiRouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl AiRouteError {
    fn client_message(&self) -> String {
        match self.source {
            AiError::RateLimited => "A cozinha está muito movimentada agora! \
                Aguarde um instante e tente novamente."
                .to_string(),
            _ => format!(
                "Oops! Tivemos um probleminha na cozinha ao {}. Por favor, tente novamente.",
                self.action
            ),
        }
    }
}

impl<'r> Responder<'r, 'static> for AiRouteError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!("{:?}", self);
        Custom(
            Status::InternalServerError,
            Json(MessageBody::new(self.client_message())),
        )
        .respond_to(request)
    }
}
