//! Route, visit, and route stop types.

use serde::{Deserialize, Serialize};

/// A single visit to a matrix node within a vehicle trip.
///
/// Times are minutes since depot departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// Node index in the time matrix (never the depot).
    pub node: usize,
    /// 0-based position in the trip.
    pub sequence_index: usize,
    /// Cumulative time on arrival.
    pub arrival_minute: i64,
    /// Arrival plus service time at this node.
    pub departure_minute: i64,
    /// Cumulative load after this visit.
    pub load_after: i32,
}

/// An ordered sequence of visits assigned to one vehicle.
///
/// A route starts and ends at the depot (node 0), which is not stored in
/// `visits`.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Route, Visit};
///
/// let mut route = Route::new(0);
/// route.push_visit(Visit {
///     node: 1,
///     sequence_index: 0,
///     arrival_minute: 10,
///     departure_minute: 13,
///     load_after: 10,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.vehicle_id(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    vehicle_id: usize,
    visits: Vec<Visit>,
    travel_minutes: i64,
    total_minutes: i64,
    total_load: i32,
}

impl Route {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle_id: usize) -> Self {
        Self {
            vehicle_id,
            visits: Vec::new(),
            travel_minutes: 0,
            total_minutes: 0,
            total_load: 0,
        }
    }

    /// Appends a visit to the end of this route.
    pub fn push_visit(&mut self, visit: Visit) {
        self.total_load = visit.load_after;
        self.visits.push(visit);
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns the ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Returns the number of visits (excluding depot).
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if this route has no visits.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Returns the node indices in visiting order.
    pub fn nodes(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.node).collect()
    }

    /// Drive time only, depot legs included (set by evaluator).
    pub fn travel_minutes(&self) -> i64 {
        self.travel_minutes
    }

    /// Drive plus service time until back at the depot (set by evaluator).
    pub fn total_minutes(&self) -> i64 {
        self.total_minutes
    }

    /// Total load carried on this route.
    pub fn total_load(&self) -> i32 {
        self.total_load
    }

    /// Sets the drive time (used by evaluator).
    pub fn set_travel_minutes(&mut self, minutes: i64) {
        self.travel_minutes = minutes;
    }

    /// Sets the total duration (used by evaluator).
    pub fn set_total_minutes(&mut self, minutes: i64) {
        self.total_minutes = minutes;
    }
}

/// A kept order's place in a planned trip.
///
/// Per vehicle, `sequence_index` runs `0..k` in visiting order and
/// `arrival_minute` never decreases along it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Order served at this stop.
    pub order_id: String,
    /// Vehicle serving the stop (0 or 1).
    pub vehicle: usize,
    /// 0-based position in the vehicle's trip.
    pub sequence_index: usize,
    /// Minutes since depot departure.
    pub arrival_minute: i64,
}
