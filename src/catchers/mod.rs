mod fallbacks;
mod unprocessable_entity;

pub use fallbacks::*;
pub use unprocessable_entity::*;
