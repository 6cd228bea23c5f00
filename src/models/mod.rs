//! Domain model types for delivery dispatch.
//!
//! Orders with their requested windows, the per-stage decision records that
//! the pipeline attaches to them, and the problem/route/plan types the route
//! solver works with.

mod decision;
mod disposition;
mod order;
mod problem;
mod route;
mod solution;
mod vehicle;
mod window;

pub use decision::{AllocationDecision, Decision};
pub use disposition::{Category, DispositionRecord};
pub use order::{Order, PriorityTag};
pub use problem::TripProblem;
pub use route::{Route, RouteStop, Visit};
pub use solution::{TripPlan, Violation};
pub use vehicle::Vehicle;
pub use window::DeliveryWindow;
