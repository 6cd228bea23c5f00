//! Route solver entry point.

use tracing::{debug, info};

use super::gls::guided_local_search;
use super::monitor::SearchLimit;
use crate::config::SolverSettings;
use crate::constructive::{cheapest_insertion, path_cheapest_arc};
use crate::evaluation::TripEvaluator;
use crate::local_search::SearchState;
use crate::models::{TripPlan, TripProblem};

/// Capacitated trip solver with optional drops.
///
/// Builds a start with the cheaper of cheapest insertion and path cheapest
/// arc, then improves it with guided local search until the time limit (or
/// the iteration cap, when set). The returned plan always satisfies
/// capacity and the route time budget; if no order fits, every order is
/// dropped.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::SolverSettings;
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::models::TripProblem;
/// use u_dispatch::solver::RouteSolver;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 5, 6, 7],
///     vec![5, 0, 2, 3],
///     vec![6, 2, 0, 2],
///     vec![7, 3, 2, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 10, 10, 10], vec![0, 2, 2, 2], 80, 300, 1).unwrap();
///
/// let settings = SolverSettings { max_iterations: Some(100), ..SolverSettings::default() };
/// let plan = RouteSolver::new(settings).solve(&problem);
/// assert_eq!(plan.num_kept(), 3);
/// assert!(plan.dropped().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteSolver {
    settings: SolverSettings,
}

impl RouteSolver {
    /// Creates a solver with the given settings.
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Returns the solver settings.
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Replaces the drop penalty.
    pub fn with_drop_penalty(mut self, drop_penalty: i64) -> Self {
        self.settings.drop_penalty = drop_penalty;
        self
    }

    /// Solves one trip.
    pub fn solve(&self, problem: &TripProblem) -> TripPlan {
        let penalty = self.settings.drop_penalty;
        let evaluator = TripEvaluator::new(problem);
        let empty = vec![Vec::new(); problem.vehicles().len()];
        if problem.num_orders() == 0 {
            return evaluator.build_plan(&empty, penalty);
        }

        let mut limit = SearchLimit::new(self.settings.time_limit(), self.settings.max_iterations);

        let insertion = cheapest_insertion(problem, penalty);
        let arc = path_cheapest_arc(problem, penalty);
        debug!(
            cheapest_insertion = insertion.objective(),
            path_cheapest_arc = arc.objective(),
            "constructed initial solutions"
        );
        let initial = if arc.objective() < insertion.objective() {
            arc
        } else {
            insertion
        };
        let routes: Vec<Vec<usize>> = initial.routes().iter().map(|r| r.nodes()).collect();

        if initial.num_kept() == 0 && !any_order_fits(problem) {
            info!(orders = problem.num_orders(), "no order fits a single trip, all dropped");
            return evaluator.build_plan(&empty, penalty);
        }

        let state = SearchState::from_routes(problem, routes);
        let mut rng = u_numflow::random::create_rng(self.settings.seed);
        let outcome = guided_local_search(
            problem,
            state,
            penalty,
            self.settings.gls_lambda_coefficient,
            &mut limit,
            &mut rng,
        );

        let plan = evaluator.build_plan(outcome.best.routes(), penalty);
        info!(
            orders = problem.num_orders(),
            kept = plan.num_kept(),
            dropped = plan.dropped().len(),
            objective = plan.objective(),
            initial = initial.objective(),
            best = outcome.best_objective,
            iterations = outcome.iterations,
            penalty_rounds = outcome.penalty_rounds,
            elapsed_ms = limit.elapsed().as_millis() as u64,
            "route solver finished"
        );
        plan
    }
}

/// Returns `true` if some order can be served alone.
fn any_order_fits(problem: &TripProblem) -> bool {
    let evaluator = TripEvaluator::new(problem);
    problem.order_nodes().any(|n| evaluator.is_feasible(&[n]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TimeMatrix;

    fn settings(iterations: u64) -> SolverSettings {
        SolverSettings {
            max_iterations: Some(iterations),
            ..SolverSettings::default()
        }
    }

    fn cluster(demand: i32, capacity: i32, max_minutes: i64, vehicles: usize) -> TripProblem {
        let tm = TimeMatrix::from_rows(&[
            vec![0, 8, 9, 10, 11],
            vec![8, 0, 2, 3, 4],
            vec![9, 2, 0, 2, 3],
            vec![10, 3, 2, 0, 2],
            vec![11, 4, 3, 2, 0],
        ])
        .expect("valid");
        let demands = vec![0, demand, demand, demand, demand];
        TripProblem::new(tm, demands, vec![0, 3, 3, 3, 3], capacity, max_minutes, vehicles)
            .expect("valid")
    }

    fn assert_feasible(plan: &TripPlan, problem: &TripProblem) {
        for route in plan.routes() {
            assert!(route.total_load() <= problem.capacity());
            assert!(route.total_minutes() <= problem.max_route_minutes());
        }
        let mut all = plan.kept_nodes();
        all.extend_from_slice(plan.dropped());
        all.sort_unstable();
        assert_eq!(all, problem.order_nodes().collect::<Vec<_>>());
    }

    #[test]
    fn test_all_kept_when_room() {
        let p = cluster(10, 80, 300, 1);
        let plan = RouteSolver::new(settings(200)).solve(&p);
        assert_eq!(plan.num_kept(), 4);
        assert!(plan.dropped().is_empty());
        assert_feasible(&plan, &p);
        // 8 + 2 + 2 + 2 + 11 drive plus 12 service
        assert_eq!(plan.objective(), 37);
    }

    #[test]
    fn test_capacity_forces_drops() {
        let p = cluster(30, 80, 300, 1);
        let plan = RouteSolver::new(settings(200)).solve(&p);
        assert_eq!(plan.num_kept(), 2);
        assert_eq!(plan.dropped().len(), 2);
        assert_feasible(&plan, &p);
    }

    #[test]
    fn test_time_budget_forces_drops() {
        let p = cluster(10, 80, 25, 1);
        let plan = RouteSolver::new(settings(200)).solve(&p);
        assert!(plan.num_kept() < 4);
        assert!(plan.num_kept() >= 1);
        assert_feasible(&plan, &p);
    }

    #[test]
    fn test_two_vehicles_share_load() {
        let p = cluster(30, 60, 300, 2);
        let plan = RouteSolver::new(settings(200)).solve(&p);
        assert_eq!(plan.num_kept(), 4);
        assert_eq!(plan.routes().len(), 2);
        assert_feasible(&plan, &p);
    }

    #[test]
    fn test_degenerate_all_dropped() {
        let p = cluster(100, 80, 300, 1);
        let plan = RouteSolver::new(settings(200)).solve(&p);
        assert_eq!(plan.num_kept(), 0);
        assert_eq!(plan.dropped().len(), 4);
        assert!(plan.is_degenerate());
    }

    #[test]
    fn test_no_orders() {
        let tm = TimeMatrix::new(1);
        let p = TripProblem::new(tm, vec![0], vec![0], 80, 300, 1).expect("valid");
        let plan = RouteSolver::default().solve(&p);
        assert_eq!(plan.num_kept(), 0);
        assert!(plan.dropped().is_empty());
        assert!(!plan.is_degenerate());
    }

    #[test]
    fn test_same_seed_same_plan() {
        let p = cluster(30, 80, 300, 1);
        let a = RouteSolver::new(settings(150)).solve(&p);
        let b = RouteSolver::new(settings(150)).solve(&p);
        assert_eq!(a, b);
    }

    #[test]
    fn test_low_penalty_drops_far_order() {
        let tm = TimeMatrix::from_rows(&[vec![0, 5, 60], vec![5, 0, 58], vec![60, 58, 0]])
            .expect("valid");
        let p = TripProblem::new(tm, vec![0, 1, 1], vec![0, 0, 0], 80, 300, 1).expect("valid");
        let plan = RouteSolver::new(settings(100)).with_drop_penalty(50).solve(&p);
        assert_eq!(plan.dropped(), &[2]);
        assert_eq!(plan.objective(), 10 + 50);
    }
}
