//! Order pre-selection and per-strategy trip planning.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Strategy;
use crate::disposition::DispositionClassifier;
use crate::error::Result;
use crate::evaluation::TripEvaluator;
use crate::models::{DispositionRecord, Order, TripPlan, TripProblem};
use crate::solver::RouteSolver;

/// Share of fleet capacity the greedy pre-selection fills before stopping.
pub const FILL_RATIO: f64 = 0.9;

/// Drop penalty used when solving a pre-selected subset.
pub const SELECTED_DROP_PENALTY: i64 = 100_000;

/// One strategy's plan and classification for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCut {
    /// Strategy that produced the plan.
    pub strategy: Strategy,
    /// Plan over the window's full node numbering.
    pub plan: TripPlan,
    /// One record per order, in node order.
    pub records: Vec<DispositionRecord>,
}

/// Order nodes a strategy lets the solver see, or `None` for all of them.
///
/// Nodes are ranked by the strategy's score (stable, so ties keep node
/// order) and admitted while the running load is below
/// [`FILL_RATIO`] of the fleet capacity and the node still fits.
pub fn select_nodes(strategy: Strategy, problem: &TripProblem) -> Option<Vec<usize>> {
    let mut ranked: Vec<(usize, f64)> = match strategy {
        Strategy::MaxOrders => return None,
        Strategy::Shortest => problem
            .order_nodes()
            .map(|n| (n, efficiency(problem, n)))
            .collect(),
        Strategy::HighDensity => problem
            .order_nodes()
            .map(|n| (n, isolation(problem, n)))
            .collect(),
    };
    match strategy {
        Strategy::Shortest => ranked.sort_by(|a, b| b.1.total_cmp(&a.1)),
        _ => ranked.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }

    let fleet_capacity: i64 = problem.vehicles().iter().map(|v| v.capacity() as i64).sum();
    let target = FILL_RATIO * fleet_capacity as f64;
    let mut load = 0i64;
    let mut selected = Vec::new();
    for (node, _) in ranked {
        if load as f64 >= target {
            break;
        }
        let units = problem.demand(node) as i64;
        if load + units <= fleet_capacity {
            selected.push(node);
            load += units;
        }
    }
    selected.sort_unstable();
    Some(selected)
}

/// Units delivered per minute of depot leg; infinite for a zero leg.
fn efficiency(problem: &TripProblem, node: usize) -> f64 {
    let leg = problem.travel(0, node);
    if leg == 0 {
        f64::INFINITY
    } else {
        problem.demand(node) as f64 / leg as f64
    }
}

/// Mean travel time to every other order; 0 for a lone order.
fn isolation(problem: &TripProblem, node: usize) -> f64 {
    let others: Vec<usize> = problem.order_nodes().filter(|&k| k != node).collect();
    problem.matrix().mean_from(node, &others).unwrap_or(0.0)
}

/// Plans one window's trip under `strategy`.
pub fn plan_trip(strategy: Strategy, problem: &TripProblem, solver: &RouteSolver) -> Result<TripPlan> {
    let Some(selected) = select_nodes(strategy, problem) else {
        return Ok(solver.solve(problem));
    };
    debug!(
        ?strategy,
        orders = problem.num_orders(),
        selected = selected.len(),
        "pre-selected orders"
    );

    let mut nodes = Vec::with_capacity(selected.len() + 1);
    nodes.push(0);
    nodes.extend_from_slice(&selected);
    let sub = TripProblem::new(
        problem.matrix().submatrix(&nodes),
        nodes.iter().map(|&n| problem.demand(n)).collect(),
        nodes.iter().map(|&n| problem.service_minutes(n)).collect(),
        problem.capacity(),
        problem.max_route_minutes(),
        problem.vehicles().len(),
    )?;
    let sub_solver = solver.clone().with_drop_penalty(SELECTED_DROP_PENALTY);
    let sub_plan = sub_solver.solve(&sub);

    let routes: Vec<Vec<usize>> = sub_plan
        .routes()
        .iter()
        .map(|r| r.nodes().into_iter().map(|n| nodes[n]).collect())
        .collect();
    Ok(TripEvaluator::new(problem).build_plan(&routes, SELECTED_DROP_PENALTY))
}

/// Plans and classifies a window under every strategy, for side-by-side
/// review.
///
/// `orders[i]` is node `i + 1` of `problem`.
pub fn compare(
    problem: &TripProblem,
    orders: &[Order],
    solver: &RouteSolver,
    classifier: &DispositionClassifier,
) -> Result<Vec<TripCut>> {
    [Strategy::MaxOrders, Strategy::Shortest, Strategy::HighDensity]
        .into_iter()
        .map(|strategy| {
            let plan = plan_trip(strategy, problem, solver)?;
            let records = classifier.classify(orders, &plan, problem.matrix());
            Ok(TripCut {
                strategy,
                plan,
                records,
            })
        })
        .collect()
}
