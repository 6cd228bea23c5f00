//! Moves that change which nodes are served.
//!
//! Serving a node saves its drop penalty; unserving it pays the penalty
//! back. These moves let the search trade route minutes against penalties
//! and recover nodes the construction could not place.

use super::state::{insertion_delta, removal_delta, replace_delta, shifted};
use super::{ArcCost, SearchContext, SearchState, IMPROVEMENT_EPS};

/// Inserts an unserved node from `scan` at its cheapest feasible slot when
/// that beats its drop penalty.
///
/// Returns `true` if a node was inserted.
pub fn insert_unassigned<C: ArcCost>(
    state: &mut SearchState,
    ctx: &SearchContext<'_, C>,
    scan: &[usize],
) -> bool {
    let p = ctx.problem;
    for &node in scan {
        let Some(ui) = state.unassigned().iter().position(|&u| u == node) else {
            continue;
        };
        // (route, position, cost)
        let mut best: Option<(usize, usize, f64)> = None;
        for (r, route) in state.routes().iter().enumerate() {
            if state.load(r) + p.demand(node) > p.capacity() {
                continue;
            }
            for pos in 0..=route.len() {
                let added = insertion_delta(p, route, pos, node);
                if shifted(state.minutes(r), added) > p.max_route_minutes() {
                    continue;
                }
                let cost = insertion_delta(ctx.cost, route, pos, node);
                if best.is_none_or(|b| cost < b.2) {
                    best = Some((r, pos, cost));
                }
            }
        }
        if let Some((r, pos, cost)) = best {
            if cost - (ctx.drop_penalty as f64) < -IMPROVEMENT_EPS {
                state.unassigned_mut().swap_remove(ui);
                state.route_mut(r).insert(pos, node);
                state.refresh(p, r);
                return true;
            }
        }
    }
    false
}

/// Unserves a served node from `scan` when its drop penalty is smaller than
/// what its visit costs.
///
/// Returns `true` if a node was removed.
pub fn remove_visit<C: ArcCost>(
    state: &mut SearchState,
    ctx: &SearchContext<'_, C>,
    scan: &[usize],
) -> bool {
    let p = ctx.problem;
    for &node in scan {
        let Some((r, i)) = state.locate(node) else {
            continue;
        };
        let route = &state.routes()[r];
        let delta = ctx.drop_penalty as f64 + removal_delta(ctx.cost, route, i);
        if delta >= -IMPROVEMENT_EPS {
            continue;
        }
        if shifted(state.minutes(r), removal_delta(p, route, i)) > p.max_route_minutes() {
            continue;
        }
        state.route_mut(r).remove(i);
        state.unassigned_mut().push(node);
        state.refresh(p, r);
        return true;
    }
    false
}

/// Swaps a served node from `scan` with an unserved one in place.
///
/// Penalties cancel out, so this only trades route cost; it mainly frees
/// capacity or time for a better-placed order.
///
/// Returns `true` if a swap was applied.
pub fn replace_visit<C: ArcCost>(
    state: &mut SearchState,
    ctx: &SearchContext<'_, C>,
    scan: &[usize],
) -> bool {
    let p = ctx.problem;
    for &node in scan {
        let Some((r, i)) = state.locate(node) else {
            continue;
        };
        for ui in 0..state.unassigned().len() {
            let other = state.unassigned()[ui];
            if state.load(r) - p.demand(node) + p.demand(other) > p.capacity() {
                continue;
            }
            let route = &state.routes()[r];
            let delta = replace_delta(ctx.cost, route, i, other);
            if delta >= -IMPROVEMENT_EPS {
                continue;
            }
            if shifted(state.minutes(r), replace_delta(p, route, i, other)) > p.max_route_minutes() {
                continue;
            }
            state.route_mut(r)[i] = other;
            state.unassigned_mut()[ui] = node;
            state.refresh(p, r);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TimeMatrix;
    use crate::models::TripProblem;

    fn problem(capacity: i32, max_minutes: i64) -> TripProblem {
        let tm = TimeMatrix::from_rows(&[
            vec![0, 5, 5, 20],
            vec![5, 0, 2, 18],
            vec![5, 2, 0, 18],
            vec![20, 18, 18, 0],
        ])
        .expect("valid");
        TripProblem::new(tm, vec![0, 10, 10, 10], vec![0, 1, 1, 1], capacity, max_minutes, 1)
            .expect("valid")
    }

    fn ctx(p: &TripProblem, drop_penalty: i64) -> SearchContext<'_, TripProblem> {
        SearchContext {
            problem: p,
            cost: p,
            drop_penalty,
        }
    }

    #[test]
    fn test_insert_unassigned() {
        let p = problem(100, 100);
        let mut s = SearchState::from_routes(&p, vec![vec![1]]);
        assert!(insert_unassigned(&mut s, &ctx(&p, 1_000), &[2, 3]));
        assert_eq!(s.routes()[0].len(), 2);
        assert!(s.routes()[0].contains(&2));
        assert_eq!(s.unassigned(), &[3]);
    }

    #[test]
    fn test_insert_respects_time_budget() {
        let p = problem(100, 20);
        let mut s = SearchState::from_routes(&p, vec![vec![1, 2]]);
        assert!(!insert_unassigned(&mut s, &ctx(&p, 1_000), &[3]));
        assert_eq!(s.unassigned(), &[3]);
    }

    #[test]
    fn test_remove_with_low_penalty() {
        let p = problem(100, 200);
        let mut s = SearchState::from_routes(&p, vec![vec![1, 2, 3]]);
        // visiting 3 costs far more than 10
        assert!(remove_visit(&mut s, &ctx(&p, 10), &[3]));
        assert_eq!(s.routes()[0], vec![1, 2]);
        assert_eq!(s.unassigned(), &[3]);
        assert!(!remove_visit(&mut s, &ctx(&p, 1_000), &[1, 2]));
    }

    #[test]
    fn test_replace_with_cheaper_node() {
        let p = problem(10, 200);
        let mut s = SearchState::from_routes(&p, vec![vec![3]]);
        assert_eq!(s.unassigned(), &[1, 2]);
        assert!(replace_visit(&mut s, &ctx(&p, 1_000), &[3]));
        assert_eq!(s.routes()[0], vec![1]);
        assert!(s.unassigned().contains(&3));
    }
}
