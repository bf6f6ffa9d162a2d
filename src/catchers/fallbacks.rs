use crate::routes::MessageBody;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(400)]
pub fn bad_request(req: &Request) -> Json<MessageBody> {
    tracing::warn!(uri = %req.uri(), "Rejected a malformed request");
    Json(MessageBody::new("Requisição malformada."))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<MessageBody> {
    Json(MessageBody::new("Recurso não encontrado."))
}

#[catch(500)]
pub fn internal_error(req: &Request) -> Json<MessageBody> {
    tracing::error!(uri = %req.uri(), "Unhandled failure while serving a request");
    Json(MessageBody::new("Erro interno do servidor."))
}
