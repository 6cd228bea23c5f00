//! Per-route efficiency figures for dispatch review.

use serde::{Deserialize, Serialize};

use crate::models::{Route, TripProblem};

/// Miles assumed per minute of route time.
pub const MILES_PER_MINUTE: f64 = 0.5;

/// Summary figures for one vehicle's route.
///
/// `cluster_drive_minutes` covers first stop to last stop only, so it
/// measures how tight the stops are regardless of the depot's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Vehicle the route belongs to.
    pub vehicle: usize,
    /// Number of stops.
    pub stops: usize,
    /// Units carried.
    pub total_units: i32,
    /// Units carried as a percentage of capacity.
    pub load_factor: f64,
    /// Drive time including both depot legs.
    pub drive_minutes: i64,
    /// Unloading time over all stops.
    pub service_minutes: i64,
    /// Depot departure to depot return.
    pub total_minutes: i64,
    /// Estimated distance from total time.
    pub route_miles: f64,
    /// Units per estimated mile.
    pub units_per_mile: f64,
    /// Stops per estimated mile.
    pub stops_per_mile: f64,
    /// Drive time from the first to the last stop.
    pub cluster_drive_minutes: i64,
    /// Stops per cluster drive minute.
    pub cluster_density: f64,
}

impl RouteMetrics {
    /// Computes metrics for a route built by
    /// [`TripEvaluator`](super::TripEvaluator).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::distance::TimeMatrix;
    /// use u_dispatch::evaluation::{RouteMetrics, TripEvaluator};
    /// use u_dispatch::models::TripProblem;
    ///
    /// let tm = TimeMatrix::from_rows(&[
    ///     vec![0, 10, 12],
    ///     vec![10, 0, 4],
    ///     vec![12, 4, 0],
    /// ]).unwrap();
    /// let problem = TripProblem::new(tm, vec![0, 20, 20], vec![0, 3, 3], 80, 120, 1).unwrap();
    /// let (route, _) = TripEvaluator::new(&problem).build_route(0, &[1, 2]);
    ///
    /// let m = RouteMetrics::from_route(&route, &problem);
    /// assert_eq!(m.total_units, 40);
    /// assert_eq!(m.drive_minutes, 26);
    /// assert_eq!(m.service_minutes, 6);
    /// assert_eq!(m.cluster_drive_minutes, 4);
    /// assert!((m.load_factor - 50.0).abs() < 1e-9);
    /// ```
    pub fn from_route(route: &Route, problem: &TripProblem) -> Self {
        let nodes = route.nodes();
        let stops = nodes.len();
        let total_units = route.total_load();
        let service_minutes: i64 = nodes.iter().map(|&n| problem.service_minutes(n)).sum();
        let cluster_drive_minutes: i64 = nodes
            .windows(2)
            .map(|w| problem.travel(w[0], w[1]))
            .sum();
        let total_minutes = route.total_minutes();
        let route_miles = total_minutes as f64 * MILES_PER_MINUTE;
        let capacity = problem.capacity();

        Self {
            vehicle: route.vehicle_id(),
            stops,
            total_units,
            load_factor: ratio(total_units as f64 * 100.0, capacity as f64),
            drive_minutes: route.travel_minutes(),
            service_minutes,
            total_minutes,
            route_miles,
            units_per_mile: ratio(total_units as f64, route_miles),
            stops_per_mile: ratio(stops as f64, route_miles),
            cluster_drive_minutes,
            cluster_density: ratio(stops as f64, cluster_drive_minutes as f64),
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}
