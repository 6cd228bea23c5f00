//! Trip solver: construction followed by guided local search.
//!
//! - [`RouteSolver`] — Solves one window's [`TripProblem`](crate::models::TripProblem)
//! - [`SearchLimit`] — Wall-clock and iteration limits

mod gls;
mod monitor;
mod route_solver;

pub use monitor::SearchLimit;
pub use route_solver::RouteSolver;
