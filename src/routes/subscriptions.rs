use crate::domain::{
    CustomerEmail, CustomerName, NewSubscription, PlanPrice, PlanTitle, SubscriptionPatch,
};
use crate::models::Subscription;
use crate::notifier::Notifier;
use crate::routes::{error_chain_fmt, MessageBody};
use crate::store::{StoreError, SubscriptionStore};
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Inbound subscription fields. camelCase is canonical; the stored
/// snake_case names are accepted too.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBody {
    #[serde(alias = "customer_name")]
    customer_name: Option<String>,
    #[serde(alias = "customer_email")]
    customer_email: Option<String>,
    #[serde(alias = "plan_title")]
    plan_title: Option<String>,
    #[serde(alias = "plan_price")]
    plan_price: Option<Decimal>,
    #[serde(alias = "flavor_preference")]
    flavor_preference: Option<String>,
    #[serde(alias = "delivery_day")]
    delivery_day: Option<String>,
    #[serde(alias = "delivery_time")]
    delivery_time: Option<String>,
}

#[derive(serde::Serialize, Debug)]
pub struct SubscriptionEnvelope {
    message: &'static str,
    data: Subscription,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// An absent field is left alone; a blank one clears the column.
fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| non_blank(Some(v)))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("O campo '{}' é obrigatório.", field))
}

impl TryFrom<SubscriptionBody> for NewSubscription {
    type Error = String;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        let customer_name = CustomerName::parse(required(body.customer_name, "customerName")?)?;
        let plan_title = PlanTitle::parse(required(body.plan_title, "planTitle")?)?;
        let plan_price = PlanPrice::parse(required(body.plan_price, "planPrice")?)?;
        let customer_email = non_blank(body.customer_email)
            .map(CustomerEmail::parse)
            .transpose()?;
        Ok(NewSubscription {
            customer_name,
            customer_email,
            plan_title,
            plan_price,
            flavor_preference: non_blank(body.flavor_preference),
            delivery_day: non_blank(body.delivery_day),
            delivery_time: non_blank(body.delivery_time),
        })
    }
}

impl TryFrom<SubscriptionBody> for SubscriptionPatch {
    type Error = String;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        let patch = SubscriptionPatch {
            customer_name: body.customer_name.map(CustomerName::parse).transpose()?,
            customer_email: clearable(body.customer_email)
                .map(|email| email.map(CustomerEmail::parse).transpose())
                .transpose()?,
            plan_title: body.plan_title.map(PlanTitle::parse).transpose()?,
            plan_price: body.plan_price.map(PlanPrice::parse).transpose()?,
            flavor_preference: clearable(body.flavor_preference),
            delivery_day: clearable(body.delivery_day),
            delivery_time: clearable(body.delivery_time),
        };
        if patch.is_empty() {
            return Err("Nenhum campo para atualizar foi informado.".to_string());
        }
        Ok(patch)
    }
}

#[tracing::instrument(
    name = "Adding a new subscription",
    skip(body, store, notifier),
    fields(
        request_id = %Uuid::new_v4(),
        customer_name = ?body.customer_name,
        plan_title = ?body.plan_title
    )
)]
#[post("/subscriptions", data = "<body>")]
pub async fn create_subscription(
    body: Json<SubscriptionBody>,
    store: &State<Arc<dyn SubscriptionStore>>,
    notifier: &State<Notifier>,
) -> Result<Custom<Json<SubscriptionEnvelope>>, SubscriptionError> {
    subscribe_flow(body.into_inner(), store.inner().as_ref(), notifier.inner()).await
}

/// Path used by the first checkout form.
#[tracing::instrument(
    name = "Adding a new subscription",
    skip(body, store, notifier),
    fields(
        request_id = %Uuid::new_v4(),
        customer_name = ?body.customer_name,
        plan_title = ?body.plan_title
    )
)]
#[post("/subscribe", data = "<body>")]
pub async fn subscribe(
    body: Json<SubscriptionBody>,
    store: &State<Arc<dyn SubscriptionStore>>,
    notifier: &State<Notifier>,
) -> Result<Custom<Json<SubscriptionEnvelope>>, SubscriptionError> {
    subscribe_flow(body.into_inner(), store.inner().as_ref(), notifier.inner()).await
}

/// Validate, persist, then notify without waiting for delivery.
async fn subscribe_flow(
    body: SubscriptionBody,
    store: &dyn SubscriptionStore,
    notifier: &Notifier,
) -> Result<Custom<Json<SubscriptionEnvelope>>, SubscriptionError> {
    let new_subscription: NewSubscription =
        body.try_into().map_err(SubscriptionError::ValidationError)?;
    let subscription = store
        .create(&new_subscription)
        .await
        .map_err(store_error("Erro interno ao processar a assinatura."))?;

    notifier.notify_new_subscription(&subscription);

    Ok(Custom(
        Status::Created,
        Json(SubscriptionEnvelope {
            message: "Assinatura criada com sucesso!",
            data: subscription,
        }),
    ))
}

#[tracing::instrument(name = "Listing subscriptions", skip(store), fields(request_id = %Uuid::new_v4()))]
#[get("/subscriptions")]
pub async fn list_subscriptions(
    store: &State<Arc<dyn SubscriptionStore>>,
) -> Result<Json<Vec<Subscription>>, SubscriptionError> {
    store
        .list()
        .await
        .map(Json)
        .map_err(store_error("Erro ao buscar assinaturas."))
}

#[tracing::instrument(
    name = "Updating a subscription",
    skip(body, store),
    fields(request_id = %Uuid::new_v4())
)]
#[put("/subscriptions/<id>", data = "<body>")]
pub async fn update_subscription(
    id: i64,
    body: Json<SubscriptionBody>,
    store: &State<Arc<dyn SubscriptionStore>>,
) -> Result<Json<SubscriptionEnvelope>, SubscriptionError> {
    let patch: SubscriptionPatch = body
        .into_inner()
        .try_into()
        .map_err(SubscriptionError::ValidationError)?;
    let subscription = store
        .update(id, &patch)
        .await
        .map_err(store_error("Erro ao atualizar assinatura."))?;
    Ok(Json(SubscriptionEnvelope {
        message: "Assinatura atualizada com sucesso.",
        data: subscription,
    }))
}

#[tracing::instrument(name = "Deleting a subscription", skip(store), fields(request_id = %Uuid::new_v4()))]
#[delete("/subscriptions/<id>")]
pub async fn delete_subscription(
    id: i64,
    store: &State<Arc<dyn SubscriptionStore>>,
) -> Result<Json<MessageBody>, SubscriptionError> {
    store
        .delete(id)
        .await
        .map_err(store_error("Erro ao deletar assinatura."))?;
    Ok(Json(MessageBody::new("Assinatura deletada com sucesso.")))
}

fn store_error(context: &'static str) -> impl FnOnce(StoreError) -> SubscriptionError {
    move |error| match error {
        StoreError::NotFound(id) => SubscriptionError::NotFound(id),
        StoreError::Persistence(source) => SubscriptionError::UnexpectedError(source, context),
    }
}

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Subscription {0} does not exist.")]
    NotFound(i64),
    #[error("{1}")]
    UnexpectedError(#[source] anyhow::Error, &'static str),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SubscriptionError {
    fn status(&self) -> Status {
        match self {
            SubscriptionError::ValidationError(_) => Status::BadRequest,
            SubscriptionError::NotFound(_) => Status::NotFound,
            SubscriptionError::UnexpectedError(..) => Status::InternalServerError,
        }
    }

    fn client_message(&self) -> String {
        match self {
            SubscriptionError::ValidationError(message) => message.clone(),
            SubscriptionError::NotFound(_) => "Assinatura não encontrada.".to_string(),
            SubscriptionError::UnexpectedError(_, message) => message.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for SubscriptionError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match &self {
            SubscriptionError::UnexpectedError(..) => tracing::error!("{:?}", self),
            _ => tracing::warn!("{:?}", self),
        }
        Custom(self.status(), Json(MessageBody::new(self.client_message()))).respond_to(request)
    }
}
