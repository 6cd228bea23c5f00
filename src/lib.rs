//! # u-dispatch
//!
//! Delivery dispatch planning: allocate orders across delivery windows,
//! solve one capacitated trip per window with optional visits, and sort
//! every order that did not make a trip into early delivery, reschedule or
//! cancel with a fit score.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Order, DeliveryWindow, decisions, TripProblem, TripPlan)
//! - [`distance`] — Travel-time matrix and the provider boundary
//! - [`service_time`] — Unloading time per order size
//! - [`allocation`] — Cross-window order allocation
//! - [`evaluation`] — Route timing, feasibility and metrics
//! - [`constructive`] — Initial trips (cheapest insertion, path cheapest arc)
//! - [`local_search`] — Move operators over trips with optional visits
//! - [`solver`] — Guided local search trip solver
//! - [`disposition`] — Post-routing classification and scoring
//! - [`strategy`] — Order pre-selection strategies
//! - [`orchestrator`] — The end-to-end pipeline and its reports
//! - [`config`] — Planner configuration
//! - [`error`] — Error type

pub mod allocation;
pub mod config;
pub mod constructive;
pub mod disposition;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod orchestrator;
pub mod service_time;
pub mod solver;
pub mod strategy;

pub use error::{DispatchError, Result};
