//! Node relocation within and between routes.
//!
//! # Algorithm
//!
//! Takes each served node in scan order, removes it, and tries every
//! position in every route (its own included). The first feasible move
//! that lowers the cost is applied.
//!
//! # Complexity
//!
//! O(n² · m) per call where n = served nodes, m = vehicles.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::state::{insertion_delta, removal_delta, shifted};
use super::{ArcCost, SearchContext, SearchState, IMPROVEMENT_EPS};

/// Applies the first improving relocation of a node from `scan`.
///
/// Returns `true` if a move was applied.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::local_search::{relocate, SearchContext, SearchState};
/// use u_dispatch::models::TripProblem;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 1, 2, 3],
///     vec![1, 0, 1, 2],
///     vec![2, 1, 0, 1],
///     vec![3, 2, 1, 0],
/// ]).unwrap();
/// let problem = TripProblem::new(tm, vec![0, 1, 1, 1], vec![0, 0, 0, 0], 10, 100, 1).unwrap();
/// let ctx = SearchContext { problem: &problem, cost: &problem, drop_penalty: 1_000 };
///
/// let mut state = SearchState::from_routes(&problem, vec![vec![2, 1, 3]]);
/// let before = state.minutes(0);
/// assert!(relocate(&mut state, &ctx, &[1, 2, 3]));
/// assert!(state.minutes(0) < before);
/// ```
pub fn relocate<C: ArcCost>(state: &mut SearchState, ctx: &SearchContext<'_, C>, scan: &[usize]) -> bool {
    let p = ctx.problem;
    for &node in scan {
        let Some((from, i)) = state.locate(node) else {
            continue;
        };
        let source = &state.routes()[from];
        let rem_cost = removal_delta(ctx.cost, source, i);
        let rem_minutes = removal_delta(p, source, i);
        let mut reduced = source.clone();
        reduced.remove(i);

        for to in 0..state.routes().len() {
            let same = to == from;
            if !same
                && (state.load(to) + p.demand(node) > p.capacity()
                    || shifted(state.minutes(from), rem_minutes) > p.max_route_minutes())
            {
                continue;
            }
            let target: &[usize] = if same { &reduced } else { &state.routes()[to] };
            let base = if same {
                shifted(state.minutes(from), rem_minutes)
            } else {
                state.minutes(to)
            };

            for pos in 0..=target.len() {
                if same && pos == i {
                    continue;
                }
                let delta = rem_cost + insertion_delta(ctx.cost, target, pos, node);
                if delta >= -IMPROVEMENT_EPS {
                    continue;
                }
                let added = insertion_delta(p, target, pos, node);
                if shifted(base, added) > p.max_route_minutes() {
                    continue;
                }
                state.route_mut(from).remove(i);
                state.route_mut(to).insert(pos, node);
                state.refresh(p, from);
                state.refresh(p, to);
                return true;
            }
        }
    }
    false
}
