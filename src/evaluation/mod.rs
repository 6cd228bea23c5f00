//! Route feasibility checking, cost evaluation, and route metrics.

mod evaluator;
mod metrics;

pub use evaluator::TripEvaluator;
pub use metrics::{RouteMetrics, MILES_PER_MINUTE};
