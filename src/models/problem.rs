//! Single-window routing problem.

use std::ops::Range;

use super::Vehicle;
use crate::distance::TimeMatrix;
use crate::error::{DispatchError, Result};

/// One window's routing instance: depot plus the window's orders.
///
/// Node 0 is the depot; nodes `1..n` are orders. Moving from `a` to `b`
/// costs `matrix[a][b] + service_minutes[a]`, so a route's cost is also its
/// duration from depot departure to depot return.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::models::TripProblem;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 5, 8],
///     vec![5, 0, 3],
///     vec![8, 3, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 10, 20], vec![0, 2, 3], 80, 120, 1).unwrap();
/// assert_eq!(problem.num_orders(), 2);
/// assert_eq!(problem.arc_minutes(1, 2), 3 + 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripProblem {
    matrix: TimeMatrix,
    demands: Vec<i32>,
    service_minutes: Vec<i64>,
    vehicles: Vec<Vehicle>,
}

impl TripProblem {
    /// Creates a problem with `vehicle_count` identical vehicles.
    ///
    /// # Errors
    ///
    /// [`DispatchError::ProblemShape`] when the arrays do not match the
    /// matrix, the depot carries demand or service time, a value or travel
    /// time is negative, or the fleet is not one or two vehicles.
    pub fn new(
        matrix: TimeMatrix,
        demands: Vec<i32>,
        service_minutes: Vec<i64>,
        capacity: i32,
        max_route_minutes: i64,
        vehicle_count: usize,
    ) -> Result<Self> {
        let n = matrix.size();
        if n == 0 {
            return Err(shape("time matrix must contain the depot"));
        }
        if demands.len() != n || service_minutes.len() != n {
            return Err(shape(&format!(
                "{} demands and {} service times for a {n}x{n} matrix",
                demands.len(),
                service_minutes.len()
            )));
        }
        if demands[0] != 0 || service_minutes[0] != 0 {
            return Err(shape("depot demand and service time must be zero"));
        }
        if demands.iter().any(|&d| d < 0) || service_minutes.iter().any(|&s| s < 0) {
            return Err(shape("demands and service times must not be negative"));
        }
        if let Some((from, to)) = matrix.first_negative() {
            return Err(shape(&format!(
                "travel time from node {from} to node {to} is negative ({})",
                matrix.get(from, to)
            )));
        }
        if capacity < 0 || max_route_minutes < 0 {
            return Err(shape("capacity and route time budget must not be negative"));
        }
        if !(1..=2).contains(&vehicle_count) {
            return Err(shape(&format!(
                "fleet must be one or two vehicles, got {vehicle_count}"
            )));
        }
        let vehicles = (0..vehicle_count)
            .map(|id| Vehicle::new(id, capacity, max_route_minutes))
            .collect();
        Ok(Self {
            matrix,
            demands,
            service_minutes,
            vehicles,
        })
    }

    /// Travel-time matrix.
    pub fn matrix(&self) -> &TimeMatrix {
        &self.matrix
    }

    /// Number of nodes, depot included.
    pub fn num_nodes(&self) -> usize {
        self.matrix.size()
    }

    /// Number of order nodes.
    pub fn num_orders(&self) -> usize {
        self.num_nodes() - 1
    }

    /// Order node indices.
    pub fn order_nodes(&self) -> Range<usize> {
        1..self.num_nodes()
    }

    /// Units demanded at `node`.
    pub fn demand(&self, node: usize) -> i32 {
        self.demands[node]
    }

    /// Unloading minutes at `node`.
    pub fn service_minutes(&self, node: usize) -> i64 {
        self.service_minutes[node]
    }

    /// The fleet; all vehicles share depot, capacity and time budget.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Per-vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.vehicles[0].capacity()
    }

    /// Per-vehicle route time budget.
    pub fn max_route_minutes(&self) -> i64 {
        self.vehicles[0].max_route_minutes()
    }

    /// Drive minutes from `from` to `to`.
    pub fn travel(&self, from: usize, to: usize) -> i64 {
        self.matrix.get(from, to)
    }

    /// Arc cost: service at `from` plus the drive to `to`.
    pub fn arc_minutes(&self, from: usize, to: usize) -> i64 {
        self.matrix.get(from, to) + self.service_minutes[from]
    }
}

fn shape(msg: &str) -> DispatchError {
    DispatchError::ProblemShape(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix3() -> TimeMatrix {
        TimeMatrix::from_rows(&[vec![0, 5, 8], vec![5, 0, 3], vec![8, 3, 0]]).expect("valid")
    }

    #[test]
    fn test_problem_accessors() {
        let p = TripProblem::new(matrix3(), vec![0, 10, 20], vec![0, 2, 3], 80, 120, 2)
            .expect("valid");
        assert_eq!(p.num_nodes(), 3);
        assert_eq!(p.order_nodes().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(p.vehicles().len(), 2);
        assert_eq!(p.capacity(), 80);
        assert_eq!(p.max_route_minutes(), 120);
        assert_eq!(p.travel(2, 0), 8);
        assert_eq!(p.arc_minutes(2, 0), 11);
        assert_eq!(p.arc_minutes(0, 1), 5);
    }

    #[test]
    fn test_problem_length_mismatch() {
        let err = TripProblem::new(matrix3(), vec![0, 10], vec![0, 2, 3], 80, 120, 1).unwrap_err();
        assert!(matches!(err, DispatchError::ProblemShape(_)));
    }

    #[test]
    fn test_problem_depot_demand() {
        assert!(TripProblem::new(matrix3(), vec![5, 10, 20], vec![0, 2, 3], 80, 120, 1).is_err());
        assert!(TripProblem::new(matrix3(), vec![0, 10, 20], vec![1, 2, 3], 80, 120, 1).is_err());
    }

    #[test]
    fn test_problem_negative_travel_time() {
        let mut tm = matrix3();
        tm.set(1, 2, -30);
        let err = TripProblem::new(tm, vec![0, 10, 20], vec![0, 2, 3], 80, 120, 1).unwrap_err();
        match err {
            DispatchError::ProblemShape(msg) => assert!(msg.contains("node 1 to node 2")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_problem_fleet_size() {
        assert!(TripProblem::new(matrix3(), vec![0, 1, 1], vec![0, 1, 1], 80, 120, 0).is_err());
        assert!(TripProblem::new(matrix3(), vec![0, 1, 1], vec![0, 1, 1], 80, 120, 3).is_err());
    }

    #[test]
    fn test_problem_depot_only() {
        let p = TripProblem::new(TimeMatrix::new(1), vec![0], vec![0], 80, 120, 1).expect("valid");
        assert_eq!(p.num_orders(), 0);
        assert!(p.order_nodes().is_empty());
    }
}
