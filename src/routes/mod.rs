mod admin;
mod ai;
mod health;
mod subscriptions;

pub use admin::*;
pub use ai::*;
pub use health::*;
pub use subscriptions::*;

/// JSON body carried by every error response and most acknowledgements.
#[derive(serde::Serialize, Debug)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
