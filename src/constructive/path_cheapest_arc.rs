//! Path cheapest arc construction with optional visits.
//!
//! # Algorithm
//!
//! Builds each vehicle's route by extension from the depot: at every step
//! the vehicle moves to the unvisited node reachable by the cheapest arc,
//! among nodes that keep the route within capacity and within the time
//! budget once it returns to the depot. When no node qualifies the next
//! vehicle starts; nodes left over are dropped.
//!
//! # Complexity
//!
//! O(n²) where n = orders.

use crate::evaluation::TripEvaluator;
use crate::models::{TripPlan, TripProblem};

/// Builds a first solution by extending routes along their cheapest arc.
///
/// A node is only appended when the extension costs less than
/// `drop_penalty`. Ties go to the lower node index.
///
/// # Examples
///
/// ```
/// use u_dispatch::constructive::path_cheapest_arc;
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::models::TripProblem;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 3, 6],
///     vec![3, 0, 3],
///     vec![6, 3, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 10, 10], vec![0, 1, 1], 80, 60, 1).unwrap();
///
/// let plan = path_cheapest_arc(&problem, 100_000);
/// assert_eq!(plan.routes()[0].nodes(), vec![1, 2]);
/// ```
pub fn path_cheapest_arc(problem: &TripProblem, drop_penalty: i64) -> TripPlan {
    let evaluator = TripEvaluator::new(problem);
    let n = problem.num_nodes();
    let mut visited = vec![false; n];
    visited[0] = true;
    let mut routes = Vec::with_capacity(problem.vehicles().len());

    for _ in problem.vehicles() {
        let mut route = Vec::new();
        let mut current = 0;
        let mut elapsed = 0i64;
        let mut load = 0i32;

        loop {
            let mut best: Option<(usize, i64)> = None;

            for node in problem.order_nodes() {
                if visited[node] || load + problem.demand(node) > problem.capacity() {
                    continue;
                }
                let arc = problem.arc_minutes(current, node);
                let closed = elapsed + arc + problem.arc_minutes(node, 0);
                if closed > problem.max_route_minutes() {
                    continue;
                }
                let extension = arc + problem.arc_minutes(node, 0) - problem.arc_minutes(current, 0);
                if extension >= drop_penalty {
                    continue;
                }
                if best.is_none_or(|(_, b)| arc < b) {
                    best = Some((node, arc));
                }
            }

            match best {
                Some((next, arc)) => {
                    visited[next] = true;
                    route.push(next);
                    elapsed += arc;
                    load += problem.demand(next);
                    current = next;
                }
                None => break,
            }
        }
        routes.push(route);
    }

    evaluator.build_plan(&routes, drop_penalty)
}
