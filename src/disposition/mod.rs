//! Classification of orders after routing.
//!
//! - [`DispositionClassifier`] — KEEP / EARLY_DELIVERY / RESCHEDULE / CANCEL
//! - [`ScoringModel`] — 0–100 fit score bands per category

mod classifier;
mod scoring;

pub use classifier::DispositionClassifier;
pub use scoring::{size_bonus, Band, ScoringModel, MAX_SIZE_BONUS};
