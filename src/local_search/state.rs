//! Mutable search state and move-delta helpers shared by the operators.

use crate::models::TripProblem;

/// Arc weights minimized by the operators.
///
/// The problem itself weighs arcs by their route minutes; the guided local
/// search adds arc penalties on top.
pub trait ArcCost {
    /// Cost of travelling `from` → `to` (service at `from` included).
    fn arc(&self, from: usize, to: usize) -> f64;
}

impl ArcCost for TripProblem {
    fn arc(&self, from: usize, to: usize) -> f64 {
        self.arc_minutes(from, to) as f64
    }
}

/// What an operator needs besides the state it edits.
pub struct SearchContext<'a, C: ArcCost> {
    /// Problem data and hard constraints.
    pub problem: &'a TripProblem,
    /// Arc weights to minimize.
    pub cost: &'a C,
    /// Objective cost per unserved node.
    pub drop_penalty: i64,
}

/// Per-vehicle node sequences plus the unserved nodes, with cached loads
/// and route minutes.
///
/// Operators only apply moves that keep every route within capacity and
/// time budget, so a state built from a feasible plan stays feasible.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    routes: Vec<Vec<usize>>,
    unassigned: Vec<usize>,
    loads: Vec<i32>,
    minutes: Vec<i64>,
}

impl SearchState {
    /// Creates a state from per-vehicle sequences; order nodes missing
    /// from all of them become unassigned.
    pub fn from_routes(problem: &TripProblem, routes: Vec<Vec<usize>>) -> Self {
        let mut served = vec![false; problem.num_nodes()];
        for &n in routes.iter().flatten() {
            served[n] = true;
        }
        let unassigned = problem.order_nodes().filter(|&n| !served[n]).collect();
        let mut state = Self {
            loads: vec![0; routes.len()],
            minutes: vec![0; routes.len()],
            routes,
            unassigned,
        };
        for r in 0..state.routes.len() {
            state.refresh(problem, r);
        }
        state
    }

    /// Node sequences per vehicle.
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Unserved order nodes.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// Load of route `r`.
    pub fn load(&self, r: usize) -> i32 {
        self.loads[r]
    }

    /// Depot-to-depot minutes of route `r`.
    pub fn minutes(&self, r: usize) -> i64 {
        self.minutes[r]
    }

    /// Route minutes plus drop penalties.
    pub fn objective(&self, drop_penalty: i64) -> i64 {
        self.minutes.iter().sum::<i64>() + self.unassigned.len() as i64 * drop_penalty
    }

    /// Consumes the state, returning the per-vehicle sequences.
    pub fn into_routes(self) -> Vec<Vec<usize>> {
        self.routes
    }

    /// Route and position of a served node.
    pub(crate) fn locate(&self, node: usize) -> Option<(usize, usize)> {
        self.routes
            .iter()
            .enumerate()
            .find_map(|(r, seq)| seq.iter().position(|&n| n == node).map(|p| (r, p)))
    }

    pub(crate) fn route_mut(&mut self, r: usize) -> &mut Vec<usize> {
        &mut self.routes[r]
    }

    pub(crate) fn unassigned_mut(&mut self) -> &mut Vec<usize> {
        &mut self.unassigned
    }

    /// Recomputes the cached load and minutes of route `r`.
    pub(crate) fn refresh(&mut self, problem: &TripProblem, r: usize) {
        let seq = &self.routes[r];
        self.loads[r] = seq.iter().map(|&n| problem.demand(n)).sum();
        self.minutes[r] = sequence_cost(problem, seq) as i64;
    }
}

/// Neighbors of a prospective slot: the nodes before and after position
/// `pos` once something sits there, depot at either end.
fn slot(route: &[usize], pos: usize) -> (usize, usize) {
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos == route.len() { 0 } else { route[pos] };
    (prev, next)
}

/// Cost change from removing the node at `pos`.
pub(crate) fn removal_delta<C: ArcCost>(c: &C, route: &[usize], pos: usize) -> f64 {
    let node = route[pos];
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos + 1 == route.len() { 0 } else { route[pos + 1] };
    c.arc(prev, next) - c.arc(prev, node) - c.arc(node, next)
}

/// Cost change from inserting `node` before position `pos`.
pub(crate) fn insertion_delta<C: ArcCost>(c: &C, route: &[usize], pos: usize, node: usize) -> f64 {
    let (prev, next) = slot(route, pos);
    c.arc(prev, node) + c.arc(node, next) - c.arc(prev, next)
}

/// Cost change from putting `node` in place of the node at `pos`.
pub(crate) fn replace_delta<C: ArcCost>(c: &C, route: &[usize], pos: usize, node: usize) -> f64 {
    let old = route[pos];
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos + 1 == route.len() { 0 } else { route[pos + 1] };
    c.arc(prev, node) + c.arc(node, next) - c.arc(prev, old) - c.arc(old, next)
}

/// Depot-to-depot cost of a sequence.
pub(crate) fn sequence_cost<C: ArcCost>(c: &C, route: &[usize]) -> f64 {
    match (route.first(), route.last()) {
        (Some(&first), Some(&last)) => {
            let inner: f64 = route.windows(2).map(|w| c.arc(w[0], w[1])).sum();
            c.arc(0, first) + inner + c.arc(last, 0)
        }
        _ => 0.0,
    }
}

/// Minutes after adding an exact integer-valued delta.
pub(crate) fn shifted(minutes: i64, delta: f64) -> i64 {
    minutes + delta.round() as i64
}
