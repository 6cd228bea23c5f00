//! Fit score bands.

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::models::Category;

/// Largest size bonus any order can earn.
pub const MAX_SIZE_BONUS: f64 = 5.0;

/// Score rule for one category.
///
/// `score = base - min(cap, per_minute * max(0, distance - offset)) + bonus`,
/// clamped to `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Score at zero distance penalty.
    pub base: f64,
    /// Points lost per minute beyond `offset`.
    pub per_minute: f64,
    /// Distance (minutes) where the penalty starts.
    pub offset: f64,
    /// Largest distance penalty.
    pub cap: f64,
    /// Lowest score of the band.
    pub min: f64,
    /// Highest score of the band.
    pub max: f64,
}

impl Band {
    fn penalty(&self, distance: f64) -> f64 {
        (self.per_minute * (distance - self.offset).max(0.0)).min(self.cap)
    }

    fn lowest(&self) -> f64 {
        self.base - self.cap
    }

    fn highest(&self) -> f64 {
        self.base + MAX_SIZE_BONUS
    }
}

/// Per-category score bands.
///
/// Closer orders never score lower than farther ones in the same category,
/// and the bands of different categories never overlap, so any KEEP score
/// beats any EARLY_DELIVERY score and so on down to CANCEL.
///
/// # Examples
///
/// ```
/// use u_dispatch::disposition::ScoringModel;
/// use u_dispatch::models::Category;
///
/// let model = ScoringModel::default();
/// let near = model.score(Category::Reschedule, 12.0, 10);
/// let far = model.score(Category::Reschedule, 18.0, 10);
/// assert!(near >= far);
/// assert!(model.score(Category::EarlyDelivery, 9.9, 1) > near);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringModel {
    /// Served orders: 85–100.
    pub keep: Band,
    /// Early delivery candidates: 65–84.
    pub early: Band,
    /// Reschedule candidates: 35–64.
    pub reschedule: Band,
    /// Cancel candidates: 0–34.
    pub cancel: Band,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            keep: Band {
                base: 90.0,
                per_minute: 0.5,
                offset: 0.0,
                cap: 5.0,
                min: 85.0,
                max: 100.0,
            },
            early: Band {
                base: 75.0,
                per_minute: 1.0,
                offset: 0.0,
                cap: 10.0,
                min: 65.0,
                max: 84.0,
            },
            reschedule: Band {
                base: 50.0,
                per_minute: 1.5,
                offset: 10.0,
                cap: 15.0,
                min: 35.0,
                max: 64.0,
            },
            cancel: Band {
                base: 20.0,
                per_minute: 0.5,
                offset: 20.0,
                cap: 20.0,
                min: 0.0,
                max: 34.0,
            },
        }
    }
}

impl ScoringModel {
    /// Band for a category.
    pub fn band(&self, category: Category) -> &Band {
        match category {
            Category::Keep => &self.keep,
            Category::EarlyDelivery => &self.early,
            Category::Reschedule => &self.reschedule,
            Category::Cancel => &self.cancel,
        }
    }

    /// Scores an order at `distance` minutes from the cluster.
    pub fn score(&self, category: Category, distance: f64, units: i32) -> u8 {
        let band = self.band(category);
        let raw = band.base - band.penalty(distance) + size_bonus(units);
        raw.clamp(band.min, band.max).clamp(0.0, 100.0).round() as u8
    }

    /// Rejects bands that are malformed or overlap a neighbor.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let b = self.band(category);
            let values = [b.base, b.per_minute, b.offset, b.cap, b.min, b.max];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(invalid(category, "has a non-finite value"));
            }
            if b.per_minute < 0.0 || b.cap < 0.0 {
                return Err(invalid(category, "penalty rate and cap must not be negative"));
            }
            if b.min > b.max || b.min < 0.0 || b.max > 100.0 {
                return Err(invalid(category, "range must lie within 0..=100"));
            }
            if b.lowest() < b.min || b.highest() > b.max {
                return Err(invalid(category, "base, cap and size bonus leave its range"));
            }
        }
        for pair in Category::ALL.windows(2) {
            let (upper, lower) = (self.band(pair[0]), self.band(pair[1]));
            if lower.max >= upper.min {
                return Err(DispatchError::InvalidConfig(format!(
                    "{} score band overlaps {}",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(())
    }
}

/// Logarithmic bonus for larger orders, at most [`MAX_SIZE_BONUS`].
pub fn size_bonus(units: i32) -> f64 {
    (units.max(0) as f64 + 1.0).ln().min(MAX_SIZE_BONUS)
}

fn invalid(category: Category, msg: &str) -> DispatchError {
    DispatchError::InvalidConfig(format!("{category} score band {msg}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScoringModel::default().validate().is_ok());
    }

    #[test]
    fn test_bands_never_overlap() {
        let m = ScoringModel::default();
        for units in [1, 5, 40, 500] {
            for d in [0.0, 5.0, 9.9, 15.0, 19.9, 30.0, 9999.0] {
                let keep = m.score(Category::Keep, d, units);
                let early = m.score(Category::EarlyDelivery, d, units);
                let resched = m.score(Category::Reschedule, d, units);
                let cancel = m.score(Category::Cancel, d, units);
                assert!(keep > early && early > resched && resched > cancel);
            }
        }
    }

    #[test]
    fn test_score_monotone_in_distance() {
        let m = ScoringModel::default();
        for category in Category::ALL {
            let mut last = u8::MAX;
            for step in 0..100 {
                let s = m.score(category, step as f64 * 0.5, 10);
                assert!(s <= last);
                last = s;
            }
        }
    }

    #[test]
    fn test_known_scores() {
        let m = ScoringModel::default();
        // unreachable hits the cap: 20 - 20 + ln(1) = 0
        assert_eq!(m.score(Category::Cancel, 9999.0, 0), 0);
        // 20 - 20 + ln(11) ≈ 2.4
        assert_eq!(m.score(Category::Cancel, 9999.0, 10), 2);
        // 75 - 8 + ln(21) ≈ 70.04
        assert_eq!(m.score(Category::EarlyDelivery, 8.0, 20), 70);
        // 50 - 0 + ln(21) ≈ 53.04
        assert_eq!(m.score(Category::Reschedule, 8.0, 20), 53);
        // 90 - 0 + min(5, ln(1001)) = 95
        assert_eq!(m.score(Category::Keep, 0.0, 1000), 95);
    }

    #[test]
    fn test_size_bonus_capped() {
        assert_eq!(size_bonus(0), 0.0);
        assert!(size_bonus(10) > size_bonus(5));
        assert_eq!(size_bonus(100_000), MAX_SIZE_BONUS);
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let mut m = ScoringModel::default();
        m.reschedule.max = 70.0;
        assert!(m.validate().is_err());

        let mut m = ScoringModel::default();
        m.early.cap = 30.0;
        assert!(m.validate().is_err());
    }
}
