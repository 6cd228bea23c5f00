//! Terminal records of a dispatch run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evaluation::RouteMetrics;
use crate::models::{Category, DeliveryWindow, Decision, RouteStop};

/// Everything downstream needs to render one order's fate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOutcome {
    /// Order identifier.
    pub order_id: String,
    /// The window the customer asked for.
    pub original_window: DeliveryWindow,
    /// The window the allocator placed the order in, if any.
    pub assigned_window: Option<DeliveryWindow>,
    /// Allocation stage decision.
    pub allocation: Decision,
    /// Final bucket; `None` when the order's window failed.
    pub category: Option<Category>,
    /// Human-readable explanation of the final state.
    pub reason: String,
    /// Fit score, present once the order went through classification.
    pub score: Option<u8>,
    /// Vehicle serving the order (0-based), for KEEP only.
    pub vehicle: Option<usize>,
    /// Position in the vehicle's trip, for KEEP only.
    pub sequence_index: Option<usize>,
    /// Minutes after depot departure, for KEEP only.
    pub arrival_minute: Option<i64>,
}

impl OrderOutcome {
    /// Returns `true` if the order is on a planned trip.
    pub fn is_kept(&self) -> bool {
        self.category == Some(Category::Keep)
    }
}

/// How a window's planning ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    /// Routed and classified.
    Planned,
    /// The allocator placed no orders here.
    Empty,
    /// Planning failed; sibling windows are unaffected.
    Failed {
        /// Diagnostic message.
        reason: String,
    },
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => f.write_str("planned"),
            Self::Empty => f.write_str("no orders assigned"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-window summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    /// The window.
    pub window: DeliveryWindow,
    /// Canonical label.
    pub label: String,
    /// Outcome of planning.
    pub status: WindowStatus,
    /// Orders the allocator placed here.
    pub orders: usize,
    /// Units the allocator placed here.
    pub units: i64,
    /// KEEP count.
    pub keep: usize,
    /// EARLY_DELIVERY count.
    pub early_delivery: usize,
    /// RESCHEDULE count.
    pub reschedule: usize,
    /// CANCEL count.
    pub cancel: usize,
    /// Solver objective, when planned.
    pub objective: Option<i64>,
    /// Kept stops, per vehicle in visiting order.
    pub stops: Vec<RouteStop>,
    /// Metrics for each non-empty vehicle route.
    pub metrics: Vec<RouteMetrics>,
}

impl WindowReport {
    pub(crate) fn new(window: DeliveryWindow, orders: usize, units: i64, status: WindowStatus) -> Self {
        Self {
            label: window.label(),
            window,
            status,
            orders,
            units,
            keep: 0,
            early_delivery: 0,
            reschedule: 0,
            cancel: 0,
            objective: None,
            stops: Vec::new(),
            metrics: Vec::new(),
        }
    }

    pub(crate) fn tally(&mut self, category: Category) {
        match category {
            Category::Keep => self.keep += 1,
            Category::EarlyDelivery => self.early_delivery += 1,
            Category::Reschedule => self.reschedule += 1,
            Category::Cancel => self.cancel += 1,
        }
    }

    /// Returns `true` if planning failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, WindowStatus::Failed { .. })
    }
}

/// Result of a whole dispatch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// One record per input order, in input order.
    pub outcomes: Vec<OrderOutcome>,
    /// One report per window, chronologically.
    pub windows: Vec<WindowReport>,
}

impl DispatchReport {
    /// Outcome for an order id.
    pub fn outcome(&self, order_id: &str) -> Option<&OrderOutcome> {
        self.outcomes.iter().find(|o| o.order_id == order_id)
    }

    /// Report for a window label.
    pub fn window(&self, label: &str) -> Option<&WindowReport> {
        self.windows.iter().find(|w| w.label == label)
    }

    /// Number of orders that ended in `category`.
    pub fn count(&self, category: Category) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.category == Some(category))
            .count()
    }

    /// Windows whose planning failed.
    pub fn failed_windows(&self) -> impl Iterator<Item = &WindowReport> {
        self.windows.iter().filter(|w| w.is_failed())
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DeliveryWindow {
        DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid")
    }

    #[test]
    fn test_status_display() {
        assert_eq!(WindowStatus::Empty.to_string(), "no orders assigned");
        let failed = WindowStatus::Failed {
            reason: "geocoding failed".into(),
        };
        assert_eq!(failed.to_string(), "failed: geocoding failed");
    }

    #[test]
    fn test_status_json() {
        let json = serde_json::to_string(&WindowStatus::Failed { reason: "x".into() })
            .expect("serialize");
        assert_eq!(json, r#"{"status":"failed","reason":"x"}"#);
    }

    #[test]
    fn test_tally() {
        let mut report = WindowReport::new(window(), 3, 30, WindowStatus::Planned);
        report.tally(Category::Keep);
        report.tally(Category::Keep);
        report.tally(Category::Cancel);
        assert_eq!(report.keep, 2);
        assert_eq!(report.cancel, 1);
        assert_eq!(report.label, "09:00 AM - 11:00 AM");
        assert!(!report.is_failed());
    }
}
