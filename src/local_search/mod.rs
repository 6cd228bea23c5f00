//! Local search operators for improving trip solutions.
//!
//! Every operator edits a [`SearchState`] in place, applies the first
//! improving move it finds under the context's [`ArcCost`], never breaks
//! capacity or the route time budget, and reports whether it moved.
//!
//! - [`relocate`] — Move one node within or between routes
//! - [`two_opt`] — Intra-route segment reversal
//! - [`exchange`] — Swap two served nodes
//! - [`insert_unassigned`], [`remove_visit`], [`replace_visit`] — Change
//!   which nodes are served

mod exchange;
mod optional;
mod relocate;
mod state;
mod two_opt;

pub use exchange::exchange;
pub use optional::{insert_unassigned, remove_visit, replace_visit};
pub use relocate::relocate;
pub use state::{ArcCost, SearchContext, SearchState};
pub use two_opt::two_opt;

/// Smallest cost decrease accepted as an improvement.
pub(crate) const IMPROVEMENT_EPS: f64 = 1e-9;
