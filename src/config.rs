//! Planner configuration.
//!
//! Every section deserializes with defaults, so a JSON document only needs
//! the keys it wants to change:
//!
//! ```
//! use u_dispatch::config::{PlannerConfig, Strategy};
//!
//! let cfg = PlannerConfig::from_json(r#"{
//!     "allocation": { "cancel_threshold": 80 },
//!     "vehicle": { "capacity": 100, "count": 2 },
//!     "strategy": "high_density"
//! }"#).unwrap();
//! assert_eq!(cfg.allocation.cancel_threshold, 80);
//! assert_eq!(cfg.allocation.reschedule_threshold, 40);
//! assert_eq!(cfg.vehicle.count, 2);
//! assert_eq!(cfg.strategy, Strategy::HighDensity);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::disposition::ScoringModel;
use crate::error::{DispatchError, Result};
use crate::service_time::ServiceTimeModel;

/// Rules for the cross-window allocation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    /// Lock priority customers to their requested window.
    pub honor_priority: bool,
    /// Orders larger than this are cancelled outright.
    pub cancel_threshold: i32,
    /// Orders larger than this (and not cancelled) are rescheduled outright.
    pub reschedule_threshold: i32,
    /// How far ahead of the requested window an early move may go.
    pub early_move_max_hours: f64,
    /// Overflow orders rescheduled this many times before are cancelled instead.
    pub max_prior_reschedules: u32,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            honor_priority: true,
            cancel_threshold: 75,
            reschedule_threshold: 40,
            early_move_max_hours: 6.0,
            max_prior_reschedules: 2,
        }
    }
}

/// Fleet available to each window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSettings {
    /// Units per vehicle.
    pub capacity: i32,
    /// Vehicles per window (1 or 2), sharing depot, capacity and time budget.
    pub count: usize,
}

impl Default for VehicleSettings {
    fn default() -> Self {
        Self {
            capacity: 80,
            count: 1,
        }
    }
}

/// Route solver search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock budget per solve, in milliseconds.
    pub time_limit_ms: u64,
    /// Objective cost of leaving an order unserved.
    pub drop_penalty: i64,
    /// Guided local search penalty weight, relative to the mean arc cost
    /// of the local optimum being escaped.
    pub gls_lambda_coefficient: f64,
    /// Optional cap on improvement iterations (mainly for reproducible tests).
    pub max_iterations: Option<u64>,
    /// Seed for the neighborhood scan order.
    pub seed: u64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_ms: 5_000,
            drop_penalty: 100_000,
            gls_lambda_coefficient: 0.1,
            max_iterations: None,
            seed: 42,
        }
    }
}

impl SolverSettings {
    /// Quick interactive solve (1 second).
    pub fn fast() -> Self {
        Self {
            time_limit_ms: 1_000,
            ..Self::default()
        }
    }

    /// Longer background solve (30 seconds).
    pub fn quality() -> Self {
        Self {
            time_limit_ms: 30_000,
            ..Self::default()
        }
    }

    /// Wall-clock budget as a [`Duration`].
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

/// Distance thresholds and scores for dropped-order classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispositionSettings {
    /// Below this mean distance an early-eligible order becomes EARLY_DELIVERY.
    pub early_threshold_minutes: f64,
    /// Below this mean distance an order becomes RESCHEDULE; otherwise CANCEL.
    pub reschedule_threshold_minutes: f64,
    /// Score bands per category.
    pub scoring: ScoringModel,
}

impl Default for DispositionSettings {
    fn default() -> Self {
        Self {
            early_threshold_minutes: 10.0,
            reschedule_threshold_minutes: 20.0,
            scoring: ScoringModel::default(),
        }
    }
}

/// How each window's trip is cut from its allocated orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Serve as many orders as fit.
    #[default]
    MaxOrders,
    /// Pre-select the orders with the best units per depot minute.
    Shortest,
    /// Pre-select the most tightly clustered orders.
    HighDensity,
}

/// Complete configuration of a dispatch run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Allocation rules.
    pub allocation: AllocationSettings,
    /// Fleet per window.
    pub vehicle: VehicleSettings,
    /// Solver search parameters.
    pub solver: SolverSettings,
    /// Classification thresholds and scoring.
    pub disposition: DispositionSettings,
    /// Unloading-time model.
    pub service_time: ServiceTimeModel,
    /// Trip cut strategy.
    pub strategy: Strategy,
    /// Route time budget override; defaults to each window's duration.
    pub max_route_minutes: Option<i64>,
}

impl PlannerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        let a = &self.allocation;
        if a.reschedule_threshold <= 0 || a.cancel_threshold <= 0 {
            return Err(invalid("size thresholds must be positive"));
        }
        if a.reschedule_threshold > a.cancel_threshold {
            return Err(invalid(
                "reschedule_threshold must not exceed cancel_threshold",
            ));
        }
        if !a.early_move_max_hours.is_finite() || a.early_move_max_hours < 0.0 {
            return Err(invalid("early_move_max_hours must be a non-negative number"));
        }
        if self.vehicle.capacity <= 0 {
            return Err(invalid("vehicle capacity must be positive"));
        }
        if !(1..=2).contains(&self.vehicle.count) {
            return Err(invalid("vehicle count must be 1 or 2"));
        }
        if self.solver.drop_penalty < 0 {
            return Err(invalid("drop_penalty must not be negative"));
        }
        if !self.solver.gls_lambda_coefficient.is_finite() || self.solver.gls_lambda_coefficient < 0.0
        {
            return Err(invalid("gls_lambda_coefficient must be a non-negative number"));
        }
        let d = &self.disposition;
        if !(d.early_threshold_minutes >= 0.0
            && d.early_threshold_minutes <= d.reschedule_threshold_minutes)
        {
            return Err(invalid(
                "early_threshold_minutes must be between 0 and reschedule_threshold_minutes",
            ));
        }
        d.scoring.validate()?;
        if let ServiceTimeModel::Fixed { minutes } = self.service_time {
            if minutes < 0 {
                return Err(invalid("fixed service time must not be negative"));
            }
        }
        if matches!(self.max_route_minutes, Some(m) if m <= 0) {
            return Err(invalid("max_route_minutes must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> DispatchError {
    DispatchError::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = PlannerConfig::default();
        assert!(cfg.allocation.honor_priority);
        assert_eq!(cfg.allocation.cancel_threshold, 75);
        assert_eq!(cfg.allocation.reschedule_threshold, 40);
        assert_eq!(cfg.vehicle.capacity, 80);
        assert_eq!(cfg.vehicle.count, 1);
        assert_eq!(cfg.solver.time_limit_ms, 5_000);
        assert_eq!(cfg.solver.drop_penalty, 100_000);
        assert_eq!(cfg.strategy, Strategy::MaxOrders);
        assert_eq!(cfg.service_time, ServiceTimeModel::SizeCurve);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_solver_presets() {
        assert!(SolverSettings::fast().time_limit() < SolverSettings::default().time_limit());
        assert!(SolverSettings::quality().time_limit() > SolverSettings::default().time_limit());
    }

    #[test]
    fn test_from_json_empty_object() {
        let cfg = PlannerConfig::from_json("{}").expect("valid");
        assert_eq!(cfg, PlannerConfig::default());
    }

    #[test]
    fn test_from_json_partial_section() {
        let cfg = PlannerConfig::from_json(
            r#"{"solver": {"time_limit_ms": 250, "max_iterations": 100},
                "service_time": {"kind": "fixed", "minutes": 3},
                "max_route_minutes": 90}"#,
        )
        .expect("valid");
        assert_eq!(cfg.solver.time_limit_ms, 250);
        assert_eq!(cfg.solver.max_iterations, Some(100));
        assert_eq!(cfg.solver.drop_penalty, 100_000);
        assert_eq!(cfg.service_time, ServiceTimeModel::Fixed { minutes: 3 });
        assert_eq!(cfg.max_route_minutes, Some(90));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = PlannerConfig::from_json("{\"vehicle\": ").unwrap_err();
        assert!(matches!(err, DispatchError::ConfigParse(_)));
    }

    #[test]
    fn test_validate_thresholds() {
        let mut cfg = PlannerConfig::default();
        cfg.allocation.reschedule_threshold = 90;
        assert!(matches!(cfg.validate(), Err(DispatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_vehicle_count() {
        let mut cfg = PlannerConfig::default();
        cfg.vehicle.count = 3;
        assert!(cfg.validate().is_err());
        cfg.vehicle.count = 2;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_disposition_thresholds() {
        let mut cfg = PlannerConfig::default();
        cfg.disposition.early_threshold_minutes = 30.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = PlannerConfig::from_json_file("/nonexistent/planner.json").unwrap_err();
        assert!(matches!(err, DispatchError::ConfigRead(_)));
    }
}
