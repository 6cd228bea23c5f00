//! Error type shared by every planning stage.

use thiserror::Error;

use crate::distance::ProviderError;

/// Errors that abort a planning run or reject malformed input.
///
/// Solver non-convergence and dropped orders are not errors: they are
/// ordinary results carried in [`TripPlan`](crate::models::TripPlan) and
/// [`DispatchReport`](crate::orchestrator::DispatchReport).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A window in the window list has no entry in the capacity map.
    #[error("capacity map has no entry for window {label}")]
    MissingCapacity {
        /// Canonical label of the window.
        label: String,
    },

    /// An order references a delivery window that is not in the window list.
    #[error("order {order_id} references unknown window {label}")]
    UnknownWindow {
        /// Offending order.
        order_id: String,
        /// Label of the window the order asked for.
        label: String,
    },

    /// An order carries data no stage can process (e.g. non-positive units).
    #[error("order {order_id} is invalid: {reason}")]
    InvalidOrder {
        /// Offending order.
        order_id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two orders share the same identifier.
    #[error("order id {order_id} appears more than once")]
    DuplicateOrder {
        /// The repeated identifier.
        order_id: String,
    },

    /// A window does not end after it starts.
    #[error("window {label} must end after it starts")]
    InvalidWindow {
        /// Canonical label of the window.
        label: String,
    },

    /// A window appears twice in the window list.
    #[error("window {label} appears more than once")]
    DuplicateWindow {
        /// Canonical label of the window.
        label: String,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// A travel-time matrix does not match the number of locations.
    #[error("time matrix has {actual} locations, expected {expected}")]
    MatrixShape {
        /// Number of locations requested (depot included).
        expected: usize,
        /// Number of locations in the returned matrix.
        actual: usize,
    },

    /// Solver input arrays are inconsistent with the time matrix.
    #[error("malformed routing problem: {0}")]
    ProblemShape(String),

    /// The travel-time collaborator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DispatchError>;
