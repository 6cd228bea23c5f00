//! Allocation decision records.

use serde::{Deserialize, Serialize};

use super::DeliveryWindow;

/// Outcome of the cross-window allocation stage for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Stays in the requested window.
    KeepWindow,
    /// Moved to an earlier window (customer consented).
    MovedEarly,
    /// Overflow rescued by a later window.
    MovedLater,
    /// Should be rescheduled to another day.
    Reschedule,
    /// Recommended for cancellation.
    Cancel,
}

impl Decision {
    /// Returns `true` if the order was placed in some window.
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::KeepWindow | Self::MovedEarly | Self::MovedLater)
    }
}

/// The allocation record for a single order.
///
/// `assigned_window` is present exactly when the decision places the order
/// in a window; the constructors uphold this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationDecision {
    order_id: String,
    original_window: DeliveryWindow,
    assigned_window: Option<DeliveryWindow>,
    decision: Decision,
    reason: String,
}

impl AllocationDecision {
    /// Records an order placed in `window`.
    ///
    /// `decision` must be one of the assigning variants.
    pub(crate) fn assigned(
        order_id: &str,
        original_window: DeliveryWindow,
        window: DeliveryWindow,
        decision: Decision,
        reason: impl Into<String>,
    ) -> Self {
        debug_assert!(decision.is_assigned());
        Self {
            order_id: order_id.to_string(),
            original_window,
            assigned_window: Some(window),
            decision,
            reason: reason.into(),
        }
    }

    /// Records an order left without a window (reschedule or cancel).
    pub(crate) fn unassigned(
        order_id: &str,
        original_window: DeliveryWindow,
        decision: Decision,
        reason: impl Into<String>,
    ) -> Self {
        debug_assert!(!decision.is_assigned());
        Self {
            order_id: order_id.to_string(),
            original_window,
            assigned_window: None,
            decision,
            reason: reason.into(),
        }
    }

    /// Order identifier.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// The window the customer asked for.
    pub fn original_window(&self) -> &DeliveryWindow {
        &self.original_window
    }

    /// The window the order was placed in, if any.
    pub fn assigned_window(&self) -> Option<&DeliveryWindow> {
        self.assigned_window.as_ref()
    }

    /// The decision taken.
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Human-readable explanation.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_assigned() {
        assert!(Decision::KeepWindow.is_assigned());
        assert!(Decision::MovedEarly.is_assigned());
        assert!(Decision::MovedLater.is_assigned());
        assert!(!Decision::Reschedule.is_assigned());
        assert!(!Decision::Cancel.is_assigned());
    }

    #[test]
    fn test_assigned_window_invariant() {
        let w = DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid");
        let kept = AllocationDecision::assigned("A", w, w, Decision::KeepWindow, "fits");
        assert_eq!(kept.assigned_window(), Some(&w));
        let cancelled = AllocationDecision::unassigned("B", w, Decision::Cancel, "too large");
        assert!(cancelled.assigned_window().is_none());
        assert_eq!(cancelled.reason(), "too large");
    }

    #[test]
    fn test_decision_serializes_upper_snake() {
        let json = serde_json::to_string(&Decision::MovedEarly).expect("serialize");
        assert_eq!(json, "\"MOVED_EARLY\"");
    }
}
