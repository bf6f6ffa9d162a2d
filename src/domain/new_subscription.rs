use crate::domain::{CustomerEmail, CustomerName, PlanPrice, PlanTitle};

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub customer_name: CustomerName,
    pub customer_email: Option<CustomerEmail>,
    pub plan_title: PlanTitle,
    pub plan_price: PlanPrice,
    pub flavor_preference: Option<String>,
    pub delivery_day: Option<String>,
    pub delivery_time: Option<String>,
}
