//! Disposition categories and records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final bucket for an order considered by a route solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Served on the planned trip.
    Keep,
    /// Close to the trip and the customer accepts an earlier delivery.
    EarlyDelivery,
    /// Better served in a different window or day.
    Reschedule,
    /// Recommended for cancellation.
    Cancel,
}

impl Category {
    /// All categories, best first.
    pub const ALL: [Category; 4] = [
        Category::Keep,
        Category::EarlyDelivery,
        Category::Reschedule,
        Category::Cancel,
    ];

    /// Upper-case name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "KEEP",
            Self::EarlyDelivery => "EARLY_DELIVERY",
            Self::Reschedule => "RESCHEDULE",
            Self::Cancel => "CANCEL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one order after routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionRecord {
    /// Order identifier.
    pub order_id: String,
    /// Matrix node of the order within its window.
    pub node: usize,
    /// Assigned bucket.
    pub category: Category,
    /// Human-readable explanation.
    pub reason: String,
    /// Fit score in `0..=100`.
    pub score: u8,
    /// Mean travel time to the kept cluster, `None` when nothing was kept.
    pub avg_minutes_to_cluster: Option<f64>,
}
