use crate::domain::{CustomerEmail, CustomerName, PlanPrice, PlanTitle};

/// Partial update of the editable subscription fields. `None` leaves the
/// stored value untouched; for nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub customer_name: Option<CustomerName>,
    pub customer_email: Option<Option<CustomerEmail>>,
    pub plan_title: Option<PlanTitle>,
    pub plan_price: Option<PlanPrice>,
    pub flavor_preference: Option<Option<String>>,
    pub delivery_day: Option<Option<String>>,
    pub delivery_time: Option<Option<String>>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.customer_email.is_none()
            && self.plan_title.is_none()
            && self.plan_price.is_none()
            && self.flavor_preference.is_none()
            && self.delivery_day.is_none()
            && self.delivery_time.is_none()
    }
}
