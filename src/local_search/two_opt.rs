//! Intra-route 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For each pair of positions i < j in a route, reverses the segment
//! `route[i..=j]`. Travel times may be asymmetric, so the reversed segment's
//! inner arcs are re-costed too:
//!
//! ```text
//! delta = c(prev, r[j]) + rev(i..=j) + c(r[i], next)
//!       - c(prev, r[i]) - fwd(i..=j) - c(r[j], next)
//! ```
//!
//! Both inner sums grow incrementally with j. The first feasible reversal
//! with delta < 0 is applied.
//!
//! # Complexity
//!
//! O(n²) per route per call.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::state::shifted;
use super::{ArcCost, SearchContext, SearchState, IMPROVEMENT_EPS};

/// Applies the first improving 2-opt reversal found in any route.
///
/// Returns `true` if a move was applied.
pub fn two_opt<C: ArcCost>(state: &mut SearchState, ctx: &SearchContext<'_, C>) -> bool {
    let p = ctx.problem;
    for r in 0..state.routes().len() {
        let route = &state.routes()[r];
        let n = route.len();
        if n < 2 {
            continue;
        }
        for i in 0..n - 1 {
            let mut fwd = (0.0, 0.0);
            let mut rev = (0.0, 0.0);
            for j in i + 1..n {
                fwd.0 += ctx.cost.arc(route[j - 1], route[j]);
                rev.0 += ctx.cost.arc(route[j], route[j - 1]);
                fwd.1 += p.arc(route[j - 1], route[j]);
                rev.1 += p.arc(route[j], route[j - 1]);

                let delta = reversal_delta(ctx.cost, route, i, j, fwd.0, rev.0);
                if delta >= -IMPROVEMENT_EPS {
                    continue;
                }
                let minutes = reversal_delta(p, route, i, j, fwd.1, rev.1);
                if shifted(state.minutes(r), minutes) > p.max_route_minutes() {
                    continue;
                }
                state.route_mut(r)[i..=j].reverse();
                state.refresh(p, r);
                return true;
            }
        }
    }
    false
}

/// Cost change from reversing `route[i..=j]`, given the segment's inner
/// forward and reversed sums.
fn reversal_delta<C: ArcCost>(c: &C, route: &[usize], i: usize, j: usize, fwd: f64, rev: f64) -> f64 {
    let prev = if i == 0 { 0 } else { route[i - 1] };
    let next = if j + 1 == route.len() { 0 } else { route[j + 1] };
    c.arc(prev, route[j]) + rev + c.arc(route[i], next) - c.arc(prev, route[i]) - fwd - c.arc(route[j], next)
}
