//! Trip plan and constraint violation types.

use serde::{Deserialize, Serialize};

use super::Route;

/// A broken route constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// Load carried exceeds the vehicle capacity.
    CapacityExceeded {
        /// Vehicle whose route is overloaded.
        vehicle: usize,
        /// Total load of the route.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// Depot-to-depot duration exceeds the time budget.
    RouteTooLong {
        /// Vehicle whose route is too long.
        vehicle: usize,
        /// Route duration in minutes.
        minutes: i64,
        /// Allowed minutes.
        max_minutes: i64,
    },
}

/// Solved routes of one window plus the order nodes left unserved.
///
/// Every order node appears exactly once: in one route or in `dropped`.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Route, TripPlan};
///
/// let plan = TripPlan::new(vec![Route::new(0)], vec![1, 2], 200_000);
/// assert_eq!(plan.num_kept(), 0);
/// assert_eq!(plan.dropped(), &[1, 2]);
/// assert!(plan.is_degenerate());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    routes: Vec<Route>,
    dropped: Vec<usize>,
    objective: i64,
}

impl TripPlan {
    /// Creates a plan. `dropped` is stored sorted.
    pub fn new(routes: Vec<Route>, mut dropped: Vec<usize>, objective: i64) -> Self {
        dropped.sort_unstable();
        Self {
            routes,
            dropped,
            objective,
        }
    }

    /// One route per vehicle, possibly empty.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Order nodes served by no vehicle, ascending.
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }

    /// Route minutes plus drop penalties.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// Number of served order nodes.
    pub fn num_kept(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Served nodes, route by route in visiting order.
    pub fn kept_nodes(&self) -> Vec<usize> {
        self.routes.iter().flat_map(|r| r.nodes()).collect()
    }

    /// Vehicle and visit index serving `node`, if any.
    pub fn position_of(&self, node: usize) -> Option<(usize, usize)> {
        self.routes.iter().find_map(|r| {
            r.visits()
                .iter()
                .position(|v| v.node == node)
                .map(|seq| (r.vehicle_id(), seq))
        })
    }

    /// Returns `true` if there were orders to serve and none was kept.
    pub fn is_degenerate(&self) -> bool {
        self.num_kept() == 0 && !self.dropped.is_empty()
    }

    /// Total route minutes across vehicles.
    pub fn total_minutes(&self) -> i64 {
        self.routes.iter().map(|r| r.total_minutes()).sum()
    }
}
