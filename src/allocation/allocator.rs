//! Multi-pass cross-window allocation.
//!
//! # Algorithm
//!
//! Deterministic, in this order; each pass only sees orders left undecided
//! by the previous ones:
//!
//! 1. Size pre-filter: `units > cancel_threshold` cancels,
//!    `units > reschedule_threshold` reschedules. Neither touches capacity.
//! 2. Priority lock: priority-tagged orders keep their window, even if that
//!    drives its remaining capacity below zero.
//! 3. Early move: early-eligible orders, smallest first, go to the earliest
//!    window starting strictly before theirs, no more than
//!    `early_move_max_hours` earlier, with room for them.
//! 4. Keep: orders that still fit their own window stay there.
//! 5. Overflow filter: the size thresholds again.
//! 6. Later rescue: overflow orders, largest first, go to the first later
//!    window with room.
//! 7. Fallback: reschedule, or cancel when the order was already
//!    rescheduled `max_prior_reschedules` times.
//!
//! Sorts are stable, so ties keep input order.
//!
//! # Complexity
//!
//! O(n log n + n·w) for n orders and w windows.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::AllocationSettings;
use crate::error::{DispatchError, Result};
use crate::models::{AllocationDecision, Decision, DeliveryWindow, Order};

/// Orders placed in one window, in placement order.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOrders {
    window: DeliveryWindow,
    capacity: i32,
    remaining: i64,
    orders: Vec<Order>,
}

impl WindowOrders {
    /// The window.
    pub fn window(&self) -> &DeliveryWindow {
        &self.window
    }

    /// Configured capacity in units.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Capacity left after allocation. Negative when priority orders overbooked it.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Orders placed here.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Total units placed here.
    pub fn total_units(&self) -> i64 {
        self.orders.iter().map(|o| o.units() as i64).sum()
    }

    /// Returns `true` if nothing was placed here.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Result of one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    decisions: Vec<AllocationDecision>,
    windows: Vec<WindowOrders>,
}

impl AllocationOutcome {
    /// One decision per input order, in input order.
    pub fn decisions(&self) -> &[AllocationDecision] {
        &self.decisions
    }

    /// Every window of the run, chronologically, including empty ones.
    pub fn windows(&self) -> &[WindowOrders] {
        &self.windows
    }

    /// Consumes the outcome, returning decisions and window groups.
    pub fn into_parts(self) -> (Vec<AllocationDecision>, Vec<WindowOrders>) {
        (self.decisions, self.windows)
    }

    /// Looks up the decision for an order id.
    pub fn decision_for(&self, order_id: &str) -> Option<&AllocationDecision> {
        self.decisions.iter().find(|d| d.order_id() == order_id)
    }

    /// Orders grouped under `window`, if it is part of the run.
    pub fn orders_in(&self, window: &DeliveryWindow) -> Option<&[Order]> {
        self.windows
            .iter()
            .find(|w| w.window() == window)
            .map(|w| w.orders())
    }

    /// Number of decisions of the given kind.
    pub fn count(&self, decision: Decision) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.decision() == decision)
            .count()
    }
}

/// Partitions orders across delivery windows.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use u_dispatch::allocation::WindowAllocator;
/// use u_dispatch::config::AllocationSettings;
/// use u_dispatch::models::{Decision, DeliveryWindow, Order};
///
/// let morning = DeliveryWindow::from_hm(9, 0, 11, 0).unwrap();
/// let midday = DeliveryWindow::from_hm(11, 0, 13, 0).unwrap();
/// let capacities = HashMap::from([
///     (morning.label(), 50),
///     (midday.label(), 50),
/// ]);
/// let orders = vec![
///     Order::new("A", 20, midday).with_early_delivery(true),
///     Order::new("B", 120, midday),
/// ];
///
/// let allocator = WindowAllocator::new(AllocationSettings::default());
/// let outcome = allocator.allocate(&orders, &[morning, midday], &capacities).unwrap();
/// assert_eq!(outcome.decisions()[0].decision(), Decision::MovedEarly);
/// assert_eq!(outcome.decisions()[1].decision(), Decision::Cancel);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowAllocator {
    settings: AllocationSettings,
}

impl WindowAllocator {
    /// Creates an allocator with the given rules.
    pub fn new(settings: AllocationSettings) -> Self {
        Self { settings }
    }

    /// The rules in force.
    pub fn settings(&self) -> &AllocationSettings {
        &self.settings
    }

    /// Allocates `orders` across `windows`.
    ///
    /// `capacities` is keyed by [`DeliveryWindow::label`]. Windows may be
    /// given in any order; they are processed chronologically.
    ///
    /// # Errors
    ///
    /// Rejects duplicate or inverted windows, windows missing from
    /// `capacities`, duplicate order ids, non-positive units, and orders
    /// whose original window is not in `windows`. Nothing is allocated in
    /// that case.
    pub fn allocate(
        &self,
        orders: &[Order],
        windows: &[DeliveryWindow],
        capacities: &HashMap<String, i32>,
    ) -> Result<AllocationOutcome> {
        let (windows, capacity) = sorted_windows(windows, capacities)?;
        let index_of: HashMap<DeliveryWindow, usize> =
            windows.iter().enumerate().map(|(i, w)| (*w, i)).collect();
        let home = validate_orders(orders, &index_of)?;

        let mut state = PassState {
            orders,
            windows: &windows,
            remaining: capacity.iter().map(|&c| c as i64).collect(),
            placed: vec![Vec::new(); windows.len()],
            decisions: vec![None; orders.len()],
        };

        // Pass 1: size pre-filter
        let mut pending = Vec::with_capacity(orders.len());
        for (i, order) in orders.iter().enumerate() {
            match self.size_verdict(order) {
                Some((decision, reason)) => state.settle(i, decision, reason),
                None => pending.push(i),
            }
        }
        debug!(
            pass = "size_filter",
            settled = orders.len() - pending.len(),
            pending = pending.len()
        );

        // Pass 2: priority lock
        if self.settings.honor_priority {
            let before = pending.len();
            pending.retain(|&i| {
                if !orders[i].is_priority() {
                    return true;
                }
                state.place(i, home[i], Decision::KeepWindow, "priority customer honored".into());
                false
            });
            debug!(pass = "priority_lock", locked = before - pending.len());
        }

        // Pass 3: early move
        let (mut early, rest): (Vec<usize>, Vec<usize>) = pending
            .into_iter()
            .partition(|&i| orders[i].early_delivery_ok());
        early.sort_by_key(|&i| orders[i].units());

        let mut undecided = Vec::with_capacity(early.len() + rest.len());
        let mut moved_early = 0usize;
        for i in early {
            match self.earliest_early_window(&state, i, home[i]) {
                Some(w) => {
                    let hours = windows[w].hours_until(&windows[home[i]]);
                    let reason = format!(
                        "moved early to {} ({hours:.1}h before requested window)",
                        windows[w].label()
                    );
                    state.place(i, w, Decision::MovedEarly, reason);
                    moved_early += 1;
                }
                None => undecided.push(i),
            }
        }
        undecided.extend(rest);
        debug!(pass = "early_move", moved = moved_early, undecided = undecided.len());

        // Pass 4: keep in original window
        let mut overflow = Vec::new();
        for i in undecided {
            let w = home[i];
            if state.remaining[w] >= orders[i].units() as i64 {
                state.place(i, w, Decision::KeepWindow, "fits in original window".into());
            } else {
                overflow.push(i);
            }
        }
        debug!(pass = "keep", overflow = overflow.len());

        // Pass 5: overflow filter
        overflow.sort_by_key(|&i| std::cmp::Reverse(orders[i].units()));
        overflow.retain(|&i| match self.size_verdict(&orders[i]) {
            Some((decision, reason)) => {
                state.settle(i, decision, reason);
                false
            }
            None => true,
        });

        // Pass 6: later-window rescue
        let mut stranded = Vec::new();
        for i in overflow {
            let w = home[i];
            let units = orders[i].units() as i64;
            let later = (w + 1..windows.len())
                .find(|&c| windows[w].starts_before(&windows[c]) && state.remaining[c] >= units);
            match later {
                Some(c) => {
                    let reason = format!(
                        "original window full, moved later to {}",
                        windows[c].label()
                    );
                    state.place(i, c, Decision::MovedLater, reason);
                }
                None => stranded.push(i),
            }
        }
        debug!(pass = "later_rescue", stranded = stranded.len());

        // Pass 7: fallback
        for i in stranded {
            let count = orders[i].prior_reschedule_count();
            if count >= self.settings.max_prior_reschedules {
                let reason = format!(
                    "no window has capacity and already rescheduled {count} times, recommend cancel"
                );
                state.settle(i, Decision::Cancel, reason);
            } else {
                state.settle(
                    i,
                    Decision::Reschedule,
                    "no window has capacity, reschedule to a different day".into(),
                );
            }
        }

        let PassState {
            remaining,
            placed,
            decisions,
            ..
        } = state;
        let decisions: Vec<AllocationDecision> = decisions.into_iter().flatten().collect();
        debug_assert_eq!(decisions.len(), orders.len());

        let windows: Vec<WindowOrders> = windows
            .iter()
            .zip(capacity)
            .zip(remaining)
            .zip(placed)
            .map(|(((window, capacity), remaining), idx)| WindowOrders {
                window: *window,
                capacity,
                remaining,
                orders: idx.into_iter().map(|i| orders[i].clone()).collect(),
            })
            .collect();

        let outcome = AllocationOutcome { decisions, windows };
        info!(
            orders = orders.len(),
            kept = outcome.count(Decision::KeepWindow),
            moved_early = outcome.count(Decision::MovedEarly),
            moved_later = outcome.count(Decision::MovedLater),
            rescheduled = outcome.count(Decision::Reschedule),
            cancelled = outcome.count(Decision::Cancel),
            "allocation finished"
        );
        Ok(outcome)
    }

    /// Applies the two size thresholds.
    fn size_verdict(&self, order: &Order) -> Option<(Decision, String)> {
        let units = order.units();
        if units > self.settings.cancel_threshold {
            Some((
                Decision::Cancel,
                format!(
                    "too large for any route ({units} units exceeds cancel threshold of {})",
                    self.settings.cancel_threshold
                ),
            ))
        } else if units > self.settings.reschedule_threshold {
            Some((
                Decision::Reschedule,
                format!(
                    "reschedule to a different day ({units} units exceeds reschedule threshold of {})",
                    self.settings.reschedule_threshold
                ),
            ))
        } else {
            None
        }
    }

    /// Earliest window that can take order `i` ahead of its home window.
    fn earliest_early_window(&self, state: &PassState<'_>, i: usize, home: usize) -> Option<usize> {
        let original = &state.windows[home];
        let units = state.orders[i].units() as i64;
        // windows are chronological, so the first hit starts earliest
        (0..home).find(|&c| {
            let candidate = &state.windows[c];
            candidate.starts_before(original)
                && candidate.hours_until(original) <= self.settings.early_move_max_hours
                && state.remaining[c] >= units
        })
    }
}

/// Mutable bookkeeping shared by the passes of one run.
struct PassState<'a> {
    orders: &'a [Order],
    windows: &'a [DeliveryWindow],
    remaining: Vec<i64>,
    placed: Vec<Vec<usize>>,
    decisions: Vec<Option<AllocationDecision>>,
}

impl PassState<'_> {
    fn place(&mut self, i: usize, w: usize, decision: Decision, reason: String) {
        let order = &self.orders[i];
        self.remaining[w] -= order.units() as i64;
        self.placed[w].push(i);
        self.decisions[i] = Some(AllocationDecision::assigned(
            order.id(),
            *order.original_window(),
            self.windows[w],
            decision,
            reason,
        ));
    }

    fn settle(&mut self, i: usize, decision: Decision, reason: String) {
        let order = &self.orders[i];
        self.decisions[i] = Some(AllocationDecision::unassigned(
            order.id(),
            *order.original_window(),
            decision,
            reason,
        ));
    }
}

/// Sorts windows chronologically and resolves their capacities.
fn sorted_windows(
    windows: &[DeliveryWindow],
    capacities: &HashMap<String, i32>,
) -> Result<(Vec<DeliveryWindow>, Vec<i32>)> {
    let mut sorted = windows.to_vec();
    sorted.sort();
    let mut capacity = Vec::with_capacity(sorted.len());
    for (i, w) in sorted.iter().enumerate() {
        if w.duration_minutes() <= 0 {
            return Err(DispatchError::InvalidWindow { label: w.label() });
        }
        if i > 0 && sorted[i - 1] == *w {
            return Err(DispatchError::DuplicateWindow { label: w.label() });
        }
        let label = w.label();
        match capacities.get(&label) {
            Some(&c) => capacity.push(c),
            None => return Err(DispatchError::MissingCapacity { label }),
        }
    }
    Ok((sorted, capacity))
}

/// Checks order data and returns each order's home window index.
fn validate_orders(
    orders: &[Order],
    index_of: &HashMap<DeliveryWindow, usize>,
) -> Result<Vec<usize>> {
    let mut seen = HashSet::with_capacity(orders.len());
    let mut home = Vec::with_capacity(orders.len());
    for order in orders {
        if !seen.insert(order.id()) {
            return Err(DispatchError::DuplicateOrder {
                order_id: order.id().to_string(),
            });
        }
        if order.units() <= 0 {
            return Err(DispatchError::InvalidOrder {
                order_id: order.id().to_string(),
                reason: format!("units must be positive, got {}", order.units()),
            });
        }
        match index_of.get(order.original_window()) {
            Some(&w) => home.push(w),
            None => {
                return Err(DispatchError::UnknownWindow {
                    order_id: order.id().to_string(),
                    label: order.original_window().label(),
                })
            }
        }
    }
    Ok(home)
}
