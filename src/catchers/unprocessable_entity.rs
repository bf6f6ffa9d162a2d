use crate::routes::MessageBody;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::Request;

/// Rocket answers 422 when a JSON body has the wrong types; clients get the
/// same 400 as any other invalid payload.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(req: &Request) -> Custom<Json<MessageBody>> {
    tracing::warn!(uri = %req.uri(), "Rejected a mistyped request body");
    Custom(
        Status::BadRequest,
        Json(MessageBody::new("Dados inválidos na requisição.")),
    )
}
