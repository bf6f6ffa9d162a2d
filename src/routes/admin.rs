use crate::routes::{error_chain_fmt, MessageBody};
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use secrecy::{ExposeSecret, Secret};

/// Argon2 PHC hash of the single admin password.
#[derive(Clone)]
pub struct AdminCredentials {
    password_hash: Secret<String>,
}

impl AdminCredentials {
    pub fn new(password_hash: Secret<String>) -> Self {
        Self { password_hash }
    }
}

#[derive(serde::Deserialize)]
pub struct VerifyBody {
    password: Secret<String>,
}

#[derive(serde::Serialize, Debug, PartialEq, Eq)]
pub struct VerifyResponse {
    success: bool,
}

#[tracing::instrument(name = "Verifying the admin password", skip(body, credentials))]
#[post("/admin/verify", data = "<body>")]
pub async fn verify_admin(
    body: Json<VerifyBody>,
    credentials: &State<AdminCredentials>,
) -> Result<Json<VerifyResponse>, AdminAuthError> {
    let expected = credentials.password_hash.clone();
    let candidate = body.into_inner().password;
    spawn_blocking_with_tracing(move || verify_password_hash(expected, candidate))
        .await
        .context("Failed to spawn blocking task.")
        .map_err(AdminAuthError::UnexpectedError)??;
    Ok(Json(VerifyResponse { success: true }))
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AdminAuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")
        .map_err(AdminAuthError::UnexpectedError)?;
    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[derive(thiserror::Error)]
pub enum AdminAuthError {
    #[error("Invalid admin password.")]
    InvalidCredentials,
    #[error("Something went wrong while checking the admin password.")]
    UnexpectedError(#[source] anyhow::Error),
}

impl std::fmt::Debug for AdminAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for AdminAuthError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            AdminAuthError::InvalidCredentials => {
                tracing::warn!("Rejected an admin login attempt");
                Custom(Status::Unauthorized, Json(VerifyResponse { success: false }))
                    .respond_to(request)
            }
            AdminAuthError::UnexpectedError(_) => {
                tracing::error!("{:?}", self);
                Custom(
                    Status::InternalServerError,
                    Json(MessageBody::new("Erro ao verificar a senha.")),
                )
                .respond_to(request)
            }
        }
    }
}
