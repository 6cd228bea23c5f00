//! Travel-time collaborator boundary.
//!
//! Geocoding and distance-matrix services live outside this crate. The
//! dispatcher only needs one call per window that turns a list of addresses
//! (depot first) into a [`TimeMatrix`].

use thiserror::Error;

use super::TimeMatrix;

/// Failure reported by a [`TravelTimeProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("travel times unavailable: {message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    /// Creates an error with a human-readable diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Produces the travel-time matrix for one window.
///
/// `locations[0]` is the depot address; `locations[i]` for `i >= 1` are the
/// delivery addresses of the window's orders, in node order. The returned
/// matrix must be `locations.len()` square. Pairs that cannot be routed
/// should be reported as [`TimeMatrix::UNREACHABLE`] rather than failing the
/// whole call.
///
/// Implemented for any `Fn(&[&str]) -> Result<TimeMatrix, ProviderError>`
/// closure that is `Sync`, which is convenient for precomputed matrices.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::{ProviderError, TimeMatrix, TravelTimeProvider};
///
/// let flat = |locations: &[&str]| -> Result<TimeMatrix, ProviderError> {
///     let n = locations.len();
///     let mut tm = TimeMatrix::new(n);
///     for i in 0..n {
///         for j in 0..n {
///             if i != j {
///                 tm.set(i, j, 4);
///             }
///         }
///     }
///     Ok(tm)
/// };
/// let tm = flat.time_matrix(&["depot", "a", "b"]).unwrap();
/// assert_eq!(tm.get(1, 2), 4);
/// ```
pub trait TravelTimeProvider: Sync {
    /// Builds the N×N matrix for the given locations.
    fn time_matrix(&self, locations: &[&str]) -> Result<TimeMatrix, ProviderError>;
}

impl<F> TravelTimeProvider for F
where
    F: Fn(&[&str]) -> Result<TimeMatrix, ProviderError> + Sync,
{
    fn time_matrix(&self, locations: &[&str]) -> Result<TimeMatrix, ProviderError> {
        self(locations)
    }
}
