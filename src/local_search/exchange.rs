//! Pairwise node exchange within and between routes.
//!
//! # Algorithm
//!
//! For each served node in scan order, tries swapping it with every other
//! served node. Swaps across routes are costed with two replacement deltas;
//! swaps inside one route are re-costed over the whole route, since the
//! two positions may be adjacent. The first feasible improving swap is
//! applied.
//!
//! # Complexity
//!
//! O(n²) per call for inter-route swaps, O(n³) worst case with intra-route
//! swaps.

use super::state::{replace_delta, sequence_cost, shifted};
use super::{ArcCost, SearchContext, SearchState, IMPROVEMENT_EPS};

/// Applies the first improving exchange of a node from `scan` with any
/// other served node.
///
/// Returns `true` if a move was applied.
pub fn exchange<C: ArcCost>(state: &mut SearchState, ctx: &SearchContext<'_, C>, scan: &[usize]) -> bool {
    for &x in scan {
        let Some((rx, i)) = state.locate(x) else {
            continue;
        };
        for ry in 0..state.routes().len() {
            for j in 0..state.routes()[ry].len() {
                if ry == rx && j == i {
                    continue;
                }
                let y = state.routes()[ry][j];
                let applied = if ry == rx {
                    try_swap_within(state, ctx, rx, i, j)
                } else {
                    try_swap_between(state, ctx, (rx, i, x), (ry, j, y))
                };
                if applied {
                    return true;
                }
            }
        }
    }
    false
}

fn try_swap_within<C: ArcCost>(
    state: &mut SearchState,
    ctx: &SearchContext<'_, C>,
    r: usize,
    i: usize,
    j: usize,
) -> bool {
    let p = ctx.problem;
    let route = &state.routes()[r];
    let mut candidate = route.clone();
    candidate.swap(i, j);
    let delta = sequence_cost(ctx.cost, &candidate) - sequence_cost(ctx.cost, route);
    if delta >= -IMPROVEMENT_EPS || sequence_cost(p, &candidate) as i64 > p.max_route_minutes() {
        return false;
    }
    state.route_mut(r).swap(i, j);
    state.refresh(p, r);
    true
}

fn try_swap_between<C: ArcCost>(
    state: &mut SearchState,
    ctx: &SearchContext<'_, C>,
    (rx, i, x): (usize, usize, usize),
    (ry, j, y): (usize, usize, usize),
) -> bool {
    let p = ctx.problem;
    let (dx, dy) = (p.demand(x), p.demand(y));
    if state.load(rx) - dx + dy > p.capacity() || state.load(ry) - dy + dx > p.capacity() {
        return false;
    }
    let route_x = &state.routes()[rx];
    let route_y = &state.routes()[ry];
    let delta = replace_delta(ctx.cost, route_x, i, y) + replace_delta(ctx.cost, route_y, j, x);
    if delta >= -IMPROVEMENT_EPS {
        return false;
    }
    if shifted(state.minutes(rx), replace_delta(p, route_x, i, y)) > p.max_route_minutes()
        || shifted(state.minutes(ry), replace_delta(p, route_y, j, x)) > p.max_route_minutes()
    {
        return false;
    }
    state.route_mut(rx)[i] = y;
    state.route_mut(ry)[j] = x;
    state.refresh(p, rx);
    state.refresh(p, ry);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TimeMatrix;
    use crate::models::TripProblem;

    fn two_clusters(capacity: i32) -> TripProblem {
        // stops 1, 2 near each other, 3, 4 near each other, clusters far apart
        let tm = TimeMatrix::from_rows(&[
            vec![0, 10, 10, 10, 10],
            vec![10, 0, 1, 15, 15],
            vec![10, 1, 0, 15, 15],
            vec![10, 15, 15, 0, 1],
            vec![10, 15, 15, 1, 0],
        ])
        .expect("valid");
        TripProblem::new(tm, vec![0, 5, 5, 5, 5], vec![0, 0, 0, 0, 0], capacity, 100, 2)
            .expect("valid")
    }

    #[test]
    fn test_exchange_between_routes() {
        let p = two_clusters(10);
        let ctx = SearchContext {
            problem: &p,
            cost: &p,
            drop_penalty: 1_000,
        };
        // mixed routes: 10 + 15 + 10 each = 70; clustered: 10 + 1 + 10 each = 42
        let mut s = SearchState::from_routes(&p, vec![vec![1, 3], vec![2, 4]]);
        assert_eq!(s.minutes(0) + s.minutes(1), 70);
        assert!(exchange(&mut s, &ctx, &[1, 2, 3, 4]));
        assert_eq!(s.minutes(0) + s.minutes(1), 42);
        assert_eq!(s.load(0), 10);
        assert_eq!(s.load(1), 10);
    }

    #[test]
    fn test_exchange_within_route() {
        let tm = TimeMatrix::from_rows(&[
            vec![0, 1, 5, 9],
            vec![1, 0, 4, 8],
            vec![5, 4, 0, 4],
            vec![9, 8, 4, 0],
        ])
        .expect("valid");
        let p = TripProblem::new(tm, vec![0, 1, 1, 1], vec![0, 0, 0, 0], 10, 100, 1)
            .expect("valid");
        let ctx = SearchContext {
            problem: &p,
            cost: &p,
            drop_penalty: 1_000,
        };
        // swapping the first two stops gives 0→1→2→3→0 = 18
        let mut s = SearchState::from_routes(&p, vec![vec![2, 1, 3]]);
        assert_eq!(s.minutes(0), 5 + 4 + 8 + 9);
        assert!(exchange(&mut s, &ctx, &[1, 2, 3]));
        assert!(s.minutes(0) < 26);
    }
}
