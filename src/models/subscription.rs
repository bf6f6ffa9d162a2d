use crate::domain::{NewSubscription, SubscriptionPatch};
use crate::schema::subscriptions;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

/// A persisted subscription row, rendered with the store's snake_case names.
#[derive(Queryable, Selectable, serde::Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub plan_title: String,
    pub plan_price: Decimal,
    pub flavor_preference: Option<String>,
    pub delivery_day: Option<String>,
    pub delivery_time: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = subscriptions)]
pub struct NewSubscriptionRow<'a> {
    pub customer_name: &'a str,
    pub customer_email: Option<&'a str>,
    pub plan_title: &'a str,
    pub plan_price: Decimal,
    pub flavor_preference: Option<&'a str>,
    pub delivery_day: Option<&'a str>,
    pub delivery_time: Option<&'a str>,
}

impl<'a> From<&'a NewSubscription> for NewSubscriptionRow<'a> {
    fn from(new: &'a NewSubscription) -> Self {
        NewSubscriptionRow {
            customer_name: new.customer_name.as_ref(),
            customer_email: new.customer_email.as_ref().map(AsRef::as_ref),
            plan_title: new.plan_title.as_ref(),
            plan_price: new.plan_price.value(),
            flavor_preference: new.flavor_preference.as_deref(),
            delivery_day: new.delivery_day.as_deref(),
            delivery_time: new.delivery_time.as_deref(),
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionChangeset<'a> {
    pub customer_name: Option<&'a str>,
    pub customer_email: Option<Option<&'a str>>,
    pub plan_title: Option<&'a str>,
    pub plan_price: Option<Decimal>,
    pub flavor_preference: Option<Option<&'a str>>,
    pub delivery_day: Option<Option<&'a str>>,
    pub delivery_time: Option<Option<&'a str>>,
}

impl<'a> From<&'a SubscriptionPatch> for SubscriptionChangeset<'a> {
    fn from(patch: &'a SubscriptionPatch) -> Self {
        SubscriptionChangeset {
            customer_name: patch.customer_name.as_ref().map(AsRef::as_ref),
            customer_email: patch
                .customer_email
                .as_ref()
                .map(|email| email.as_ref().map(AsRef::as_ref)),
            plan_title: patch.plan_title.as_ref().map(AsRef::as_ref),
            plan_price: patch.plan_price.map(|price| price.value()),
            flavor_preference: patch.flavor_preference.as_ref().map(Option::as_deref),
            delivery_day: patch.delivery_day.as_ref().map(Option::as_deref),
            delivery_time: patch.delivery_time.as_ref().map(Option::as_deref),
        }
    }
}

impl Subscription {
    /// Applies a patch in place, leaving `id` and `created_at` untouched.
    pub fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(name) = &patch.customer_name {
            self.customer_name = name.as_ref().to_string();
        }
        if let Some(email) = &patch.customer_email {
            self.customer_email = email.as_ref().map(|e| e.as_ref().to_string());
        }
        if let Some(title) = &patch.plan_title {
            self.plan_title = title.as_ref().to_string();
        }
        if let Some(price) = patch.plan_price {
            self.plan_price = price.value();
        }
        if let Some(flavor) = &patch.flavor_preference {
            self.flavor_preference = flavor.clone();
        }
        if let Some(day) = &patch.delivery_day {
            self.delivery_day = day.clone();
        }
        if let Some(time) = &patch.delivery_time {
            self.delivery_time = time.clone();
        }
    }
}
