//! Unloading-time estimates per stop.

use serde::{Deserialize, Serialize};

/// Maps an order's size to the minutes spent unloading at its stop.
///
/// The size curve is `round(min(7, 1.6 + units^1.3 * 0.045))`, floored at
/// the value for zero units, so it is non-decreasing in `units` and never
/// exceeds seven minutes.
///
/// # Examples
///
/// ```
/// use u_dispatch::service_time::ServiceTimeModel;
///
/// let model = ServiceTimeModel::SizeCurve;
/// assert_eq!(model.estimate(2), 2);
/// assert_eq!(model.estimate(10), 2);
/// assert_eq!(model.estimate(18), 4);
/// assert_eq!(model.estimate(25), 5);
/// assert_eq!(model.estimate(500), 7);
///
/// assert_eq!(ServiceTimeModel::Fixed { minutes: 4 }.estimate(500), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceTimeModel {
    /// Same unloading time for every stop.
    Fixed {
        /// Minutes per stop.
        minutes: i64,
    },
    /// Power curve of the order size, capped at [`ServiceTimeModel::CAP_MINUTES`].
    #[default]
    SizeCurve,
}

impl ServiceTimeModel {
    /// Upper bound of the size curve.
    pub const CAP_MINUTES: f64 = 7.0;

    const BASE_MINUTES: f64 = 1.6;
    const EXPONENT: f64 = 1.3;
    const SCALE: f64 = 0.045;

    /// Estimated unloading minutes for an order of `units`.
    pub fn estimate(&self, units: i32) -> i64 {
        match *self {
            Self::Fixed { minutes } => minutes,
            Self::SizeCurve => {
                let floor = Self::curve(0);
                Self::curve(units.max(0)).max(floor)
            }
        }
    }

    /// Service time array for a window: depot first (zero), then one entry per order.
    pub fn for_nodes(&self, units: impl IntoIterator<Item = i32>) -> Vec<i64> {
        std::iter::once(0)
            .chain(units.into_iter().map(|u| self.estimate(u)))
            .collect()
    }

    fn curve(units: i32) -> i64 {
        let raw = Self::BASE_MINUTES + (units as f64).powf(Self::EXPONENT) * Self::SCALE;
        raw.min(Self::CAP_MINUTES).round() as i64
    }
}
