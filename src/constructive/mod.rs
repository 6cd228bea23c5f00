//! Constructive heuristics for first trip solutions.
//!
//! Both respect capacity and the route time budget and leave a node
//! unserved when serving it is infeasible or costs more than its drop
//! penalty.
//!
//! - [`cheapest_insertion`] — Global cheapest insertion, O(n³·m)
//! - [`path_cheapest_arc`] — Route extension along the cheapest arc, O(n²)

mod cheapest_insertion;
mod path_cheapest_arc;

pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;
