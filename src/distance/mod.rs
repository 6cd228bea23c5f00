//! Travel-time matrices and the provider boundary that produces them.

mod matrix;
mod provider;

pub use matrix::TimeMatrix;
pub use provider::{ProviderError, TravelTimeProvider};
