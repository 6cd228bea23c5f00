//! Trip evaluator that computes arrival times, load, and feasibility.

use crate::models::{Route, TripPlan, TripProblem, Violation, Visit};

/// Evaluates node sequences against one window's [`TripProblem`].
///
/// A sequence lists order nodes in visiting order; the depot legs at both
/// ends are implied. Arrival at a stop is the time since depot departure:
/// the previous stop's arrival plus its service time plus the drive between
/// them.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::evaluation::TripEvaluator;
/// use u_dispatch::models::TripProblem;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 5, 8],
///     vec![5, 0, 3],
///     vec![8, 3, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 10, 20], vec![0, 2, 3], 80, 120, 1).unwrap();
///
/// let evaluator = TripEvaluator::new(&problem);
/// let (route, violations) = evaluator.build_route(0, &[1, 2]);
/// assert!(violations.is_empty());
/// assert_eq!(route.visits()[1].arrival_minute, 5 + 2 + 3);
/// assert_eq!(route.total_minutes(), 5 + 2 + 3 + 3 + 8);
/// ```
pub struct TripEvaluator<'a> {
    problem: &'a TripProblem,
}

impl<'a> TripEvaluator<'a> {
    /// Creates an evaluator for the given problem.
    pub fn new(problem: &'a TripProblem) -> Self {
        Self { problem }
    }

    /// Builds a route for `vehicle` visiting `nodes` in order.
    ///
    /// Returns the route and any capacity or time budget violations.
    pub fn build_route(&self, vehicle: usize, nodes: &[usize]) -> (Route, Vec<Violation>) {
        let p = self.problem;
        let mut route = Route::new(vehicle);
        let mut time = 0;
        let mut load = 0;
        let mut travel = 0;
        let mut prev = 0;

        for (seq, &node) in nodes.iter().enumerate() {
            let leg = p.travel(prev, node);
            travel += leg;
            let arrival = time + leg;
            let departure = arrival + p.service_minutes(node);
            load += p.demand(node);
            route.push_visit(Visit {
                node,
                sequence_index: seq,
                arrival_minute: arrival,
                departure_minute: departure,
                load_after: load,
            });
            time = departure;
            prev = node;
        }

        if !nodes.is_empty() {
            let back = p.travel(prev, 0);
            travel += back;
            time += back;
        }
        route.set_travel_minutes(travel);
        route.set_total_minutes(time);

        let mut violations = Vec::new();
        if load > p.capacity() {
            violations.push(Violation::CapacityExceeded {
                vehicle,
                load,
                capacity: p.capacity(),
            });
        }
        if time > p.max_route_minutes() {
            violations.push(Violation::RouteTooLong {
                vehicle,
                minutes: time,
                max_minutes: p.max_route_minutes(),
            });
        }
        (route, violations)
    }

    /// Depot-to-depot minutes of a sequence (sum of arc costs).
    pub fn route_minutes(&self, nodes: &[usize]) -> i64 {
        let p = self.problem;
        let Some((&first, _)) = nodes.split_first() else {
            return 0;
        };
        let inner: i64 = nodes.windows(2).map(|w| p.arc_minutes(w[0], w[1])).sum();
        let last = nodes[nodes.len() - 1];
        p.arc_minutes(0, first) + inner + p.arc_minutes(last, 0)
    }

    /// Total demand of a sequence.
    pub fn route_load(&self, nodes: &[usize]) -> i32 {
        nodes.iter().map(|&n| self.problem.demand(n)).sum()
    }

    /// Returns `true` if the sequence fits one vehicle's capacity and time budget.
    pub fn is_feasible(&self, nodes: &[usize]) -> bool {
        self.route_load(nodes) <= self.problem.capacity()
            && self.route_minutes(nodes) <= self.problem.max_route_minutes()
    }

    /// Objective of a multi-vehicle assignment: route minutes plus
    /// `drop_penalty` per unserved order node.
    pub fn objective(&self, routes: &[Vec<usize>], drop_penalty: i64) -> i64 {
        let served: usize = routes.iter().map(Vec::len).sum();
        let dropped = self.problem.num_orders().saturating_sub(served) as i64;
        routes.iter().map(|r| self.route_minutes(r)).sum::<i64>() + dropped * drop_penalty
    }

    /// Materializes a [`TripPlan`] from per-vehicle sequences.
    ///
    /// Order nodes absent from every sequence are reported dropped.
    pub fn build_plan(&self, routes: &[Vec<usize>], drop_penalty: i64) -> TripPlan {
        let mut served = vec![false; self.problem.num_nodes()];
        let built: Vec<Route> = routes
            .iter()
            .enumerate()
            .map(|(v, nodes)| {
                for &n in nodes {
                    served[n] = true;
                }
                self.build_route(v, nodes).0
            })
            .collect();
        let dropped = self
            .problem
            .order_nodes()
            .filter(|&n| !served[n])
            .collect();
        TripPlan::new(built, dropped, self.objective(routes, drop_penalty))
    }
}
