//! Cross-window allocation of orders under capacity and priority rules.
//!
//! - [`WindowAllocator`] — Deterministic multi-pass bin packing over window capacities
//! - [`AllocationOutcome`] — Per-order decisions plus orders grouped by window

mod allocator;

pub use allocator::{AllocationOutcome, WindowAllocator, WindowOrders};
