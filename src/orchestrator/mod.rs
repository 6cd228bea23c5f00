//! End-to-end dispatch pipeline and its reports.
//!
//! - [`Dispatcher`] — Allocation, then per-window routing and classification
//! - [`DispatchReport`], [`WindowReport`], [`OrderOutcome`] — Terminal records

mod dispatcher;
mod report;

pub use dispatcher::Dispatcher;
pub use report::{DispatchReport, OrderOutcome, WindowReport, WindowStatus};
