//! Vehicle type with capacity and time budget.

use serde::{Deserialize, Serialize};

/// A delivery van serving one window.
///
/// Every vehicle of a window starts and ends at the depot (node 0).
///
/// # Examples
///
/// ```
/// use u_dispatch::models::Vehicle;
///
/// let v = Vehicle::new(0, 80, 120);
/// assert_eq!(v.capacity(), 80);
/// assert_eq!(v.max_route_minutes(), 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
    max_route_minutes: i64,
}

impl Vehicle {
    /// Creates a vehicle with the given capacity (units) and route budget (minutes).
    pub fn new(id: usize, capacity: i32, max_route_minutes: i64) -> Self {
        Self {
            id,
            capacity,
            max_route_minutes,
        }
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load in units.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Maximum cumulative time from depot departure to depot return.
    pub fn max_route_minutes(&self) -> i64 {
        self.max_route_minutes
    }
}
