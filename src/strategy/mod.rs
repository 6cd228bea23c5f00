//! Trip cut strategies.
//!
//! A strategy decides which of a window's orders the solver may serve:
//!
//! - [`Strategy::MaxOrders`] — every order, solved with the configured penalty
//! - [`Strategy::Shortest`] — the orders with the most units per depot minute
//! - [`Strategy::HighDensity`] — the most tightly clustered orders
//!
//! Pre-selecting strategies fill the fleet greedily up to 90% of its
//! capacity, then solve only the selected orders with a high drop penalty.
//! Plans always use the window's full node numbering, so orders left out
//! by the pre-selection show up as dropped.

mod cut;

pub use cut::{compare, plan_trip, select_nodes, TripCut, FILL_RATIO, SELECTED_DROP_PENALTY};

pub use crate::config::Strategy;
