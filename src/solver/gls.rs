//! Guided local search over trip solutions.
//!
//! # Algorithm
//!
//! Alternates two phases until the search limit is hit:
//!
//! 1. Descent: apply improving moves under the augmented arc cost
//!    `arc(a, b) + λ · p(a, b)` until none is left.
//! 2. Penalization: among the arcs of the local optimum, increment
//!    `p(a, b)` for those with the highest utility
//!    `arc(a, b) / (1 + p(a, b))`.
//!
//! Penalties push the descent away from arcs it keeps returning to. The
//! best solution under the true objective is tracked throughout; λ is
//! fixed at the first local optimum as a fraction of its mean arc cost.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use rand::Rng;
use tracing::trace;

use super::monitor::SearchLimit;
use crate::local_search::{
    exchange, insert_unassigned, relocate, remove_visit, replace_visit, two_opt, ArcCost,
    SearchContext, SearchState,
};
use crate::models::TripProblem;

/// Arc cost with guided local search penalties added.
struct PenalizedCost<'a> {
    problem: &'a TripProblem,
    counts: Vec<u32>,
    lambda: f64,
}

impl<'a> PenalizedCost<'a> {
    fn new(problem: &'a TripProblem) -> Self {
        let n = problem.num_nodes();
        Self {
            problem,
            counts: vec![0; n * n],
            lambda: 0.0,
        }
    }

    fn count(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.problem.num_nodes() + to]
    }

    fn increment(&mut self, from: usize, to: usize) {
        let idx = from * self.problem.num_nodes() + to;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }
}

impl ArcCost for PenalizedCost<'_> {
    fn arc(&self, from: usize, to: usize) -> f64 {
        self.problem.arc(from, to) + self.lambda * self.count(from, to) as f64
    }
}

/// Outcome of a guided local search run.
#[derive(Debug, Clone)]
pub(crate) struct SearchOutcome {
    pub best: SearchState,
    pub best_objective: i64,
    pub iterations: u64,
    pub penalty_rounds: u64,
}

/// Runs guided local search from `initial`, returning the best state seen.
pub(crate) fn guided_local_search<R: Rng>(
    problem: &TripProblem,
    initial: SearchState,
    drop_penalty: i64,
    lambda_coefficient: f64,
    limit: &mut SearchLimit,
    rng: &mut R,
) -> SearchOutcome {
    let mut penalized = PenalizedCost::new(problem);
    let mut current = initial;
    let mut best_objective = current.objective(drop_penalty);
    let mut best = current.clone();
    let mut penalty_rounds = 0u64;
    let mut scan: Vec<usize> = problem.order_nodes().collect();

    'search: loop {
        // descent to a local optimum of the augmented cost
        loop {
            shuffle(&mut scan, rng);
            let ctx = SearchContext {
                problem,
                cost: &penalized,
                drop_penalty,
            };
            let moved = relocate(&mut current, &ctx, &scan)
                || exchange(&mut current, &ctx, &scan)
                || two_opt(&mut current, &ctx)
                || insert_unassigned(&mut current, &ctx, &scan)
                || replace_visit(&mut current, &ctx, &scan)
                || remove_visit(&mut current, &ctx, &scan);
            if !moved {
                break;
            }
            let objective = current.objective(drop_penalty);
            if objective < best_objective {
                best_objective = objective;
                best = current.clone();
            }
            if !limit.tick() {
                break 'search;
            }
        }

        let arcs = solution_arcs(&current);
        if arcs.is_empty() || limit.is_expired() {
            break;
        }
        if penalty_rounds == 0 {
            let total: f64 = arcs.iter().map(|&(a, b)| problem.arc(a, b)).sum();
            penalized.lambda = lambda_coefficient * total / arcs.len() as f64;
        }
        penalize(&mut penalized, &arcs);
        penalty_rounds += 1;
        trace!(
            round = penalty_rounds,
            lambda = penalized.lambda,
            objective = current.objective(drop_penalty),
            "penalized local optimum"
        );
        if !limit.tick() {
            break;
        }
    }

    SearchOutcome {
        best,
        best_objective,
        iterations: limit.iterations(),
        penalty_rounds,
    }
}

/// Arcs travelled by a state, depot legs included.
fn solution_arcs(state: &SearchState) -> Vec<(usize, usize)> {
    let mut arcs = Vec::new();
    for route in state.routes().iter().filter(|r| !r.is_empty()) {
        let mut prev = 0;
        for &node in route {
            arcs.push((prev, node));
            prev = node;
        }
        arcs.push((prev, 0));
    }
    arcs
}

/// Increments the penalty of every max-utility arc.
fn penalize(cost: &mut PenalizedCost<'_>, arcs: &[(usize, usize)]) {
    let utility = |c: &PenalizedCost<'_>, (a, b): (usize, usize)| {
        c.problem.arc(a, b) / (1.0 + c.count(a, b) as f64)
    };
    let max = arcs
        .iter()
        .map(|&arc| utility(cost, arc))
        .fold(f64::NEG_INFINITY, f64::max);
    let chosen: Vec<(usize, usize)> = arcs
        .iter()
        .copied()
        .filter(|&arc| (utility(cost, arc) - max).abs() < 1e-12)
        .collect();
    for (a, b) in chosen {
        cost.increment(a, b);
    }
}

/// Fisher-Yates shuffle.
fn shuffle<R: Rng>(items: &mut [usize], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i as u64) as usize;
        items.swap(i, j);
    }
}
