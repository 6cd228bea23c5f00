//! Global cheapest insertion with optional visits.
//!
//! # Algorithm
//!
//! Repeatedly evaluates every (unrouted node, vehicle, position) triple and
//! performs the feasible insertion with the smallest increase in route
//! minutes:
//!
//! ```text
//! c(i, u, j) = arc(i, u) + arc(u, j) - arc(i, j)
//! ```
//!
//! An insertion is only made when it costs less than the drop penalty, so
//! with a low penalty expensive orders stay unserved. Stops when no node
//! can be inserted.
//!
//! # Complexity
//!
//! O(n³ · m) where n = orders, m = vehicles.

use crate::evaluation::TripEvaluator;
use crate::models::{TripPlan, TripProblem};

/// Builds a first solution by global cheapest insertion.
///
/// Nodes that no vehicle can take within capacity and time budget, or whose
/// cheapest insertion costs at least `drop_penalty`, are dropped.
///
/// # Examples
///
/// ```
/// use u_dispatch::constructive::cheapest_insertion;
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::models::TripProblem;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 3, 4, 5],
///     vec![3, 0, 2, 3],
///     vec![4, 2, 0, 2],
///     vec![5, 3, 2, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 10, 10, 10], vec![0, 2, 2, 2], 80, 120, 1).unwrap();
///
/// let plan = cheapest_insertion(&problem, 100_000);
/// assert_eq!(plan.num_kept(), 3);
/// assert!(plan.dropped().is_empty());
/// ```
pub fn cheapest_insertion(problem: &TripProblem, drop_penalty: i64) -> TripPlan {
    let evaluator = TripEvaluator::new(problem);
    let vehicles = problem.vehicles().len();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); vehicles];
    let mut loads = vec![0i32; vehicles];
    let mut minutes = vec![0i64; vehicles];
    let mut unrouted: Vec<usize> = problem.order_nodes().collect();

    loop {
        // (unrouted index, vehicle, position, cost)
        let mut best: Option<(usize, usize, usize, i64)> = None;

        for (ui, &node) in unrouted.iter().enumerate() {
            for v in 0..vehicles {
                if loads[v] + problem.demand(node) > problem.capacity() {
                    continue;
                }
                for pos in 0..=routes[v].len() {
                    let cost = insertion_minutes(problem, &routes[v], pos, node);
                    if minutes[v] + cost > problem.max_route_minutes() || cost >= drop_penalty {
                        continue;
                    }
                    if best.is_none_or(|b| cost < b.3) {
                        best = Some((ui, v, pos, cost));
                    }
                }
            }
        }

        match best {
            Some((ui, v, pos, cost)) => {
                let node = unrouted.remove(ui);
                routes[v].insert(pos, node);
                loads[v] += problem.demand(node);
                minutes[v] += cost;
            }
            None => break,
        }
    }

    evaluator.build_plan(&routes, drop_penalty)
}

/// Added route minutes from inserting `node` before position `pos`.
fn insertion_minutes(problem: &TripProblem, route: &[usize], pos: usize, node: usize) -> i64 {
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos == route.len() { 0 } else { route[pos] };
    problem.arc_minutes(prev, node) + problem.arc_minutes(node, next) - problem.arc_minutes(prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TimeMatrix;

    fn problem(capacity: i32, max_minutes: i64, vehicles: usize) -> TripProblem {
        let tm = TimeMatrix::from_rows(&[
            vec![0, 10, 10, 30],
            vec![10, 0, 2, 25],
            vec![10, 2, 0, 25],
            vec![30, 25, 25, 0],
        ])
        .expect("valid");
        TripProblem::new(tm, vec![0, 20, 20, 20], vec![0, 2, 2, 2], capacity, max_minutes, vehicles)
            .expect("valid")
    }

    #[test]
    fn test_insert_all_when_feasible() {
        let p = problem(100, 500, 1);
        let plan = cheapest_insertion(&p, 100_000);
        assert_eq!(plan.num_kept(), 3);
        let eval = TripEvaluator::new(&p);
        assert!(eval.is_feasible(&plan.routes()[0].nodes()));
    }

    #[test]
    fn test_capacity_drops_node() {
        let p = problem(40, 500, 1);
        let plan = cheapest_insertion(&p, 100_000);
        assert_eq!(plan.num_kept(), 2);
        // the remote node is the expensive one
        assert_eq!(plan.dropped(), &[3]);
    }

    #[test]
    fn test_time_budget_drops_node() {
        // 0→1→2→0 = 10+2+2+2+10 = 26, adding node 3 needs far more
        let p = problem(100, 30, 1);
        let plan = cheapest_insertion(&p, 100_000);
        assert_eq!(plan.dropped(), &[3]);
        assert!(plan.routes()[0].total_minutes() <= 30);
    }

    #[test]
    fn test_low_penalty_skips_expensive_nodes() {
        let p = problem(100, 500, 1);
        let plan = cheapest_insertion(&p, 40);
        assert_eq!(plan.dropped(), &[3]);
    }

    #[test]
    fn test_two_vehicles_share_load() {
        let p = problem(40, 500, 2);
        let plan = cheapest_insertion(&p, 100_000);
        assert_eq!(plan.num_kept(), 3);
        assert!(plan.routes().iter().all(|r| r.total_load() <= 40));
    }

    #[test]
    fn test_depot_only() {
        let p = TripProblem::new(TimeMatrix::new(1), vec![0], vec![0], 10, 10, 1).expect("valid");
        let plan = cheapest_insertion(&p, 100);
        assert_eq!(plan.num_kept(), 0);
        assert!(plan.dropped().is_empty());
    }
}
