mod customer_email;
mod customer_name;
mod new_subscription;
mod plan;
mod subscription_patch;

pub use customer_email::CustomerEmail;
pub use customer_name::CustomerName;
pub use new_subscription::NewSubscription;
pub use plan::{PlanPrice, PlanTitle};
pub use subscription_patch::SubscriptionPatch;
