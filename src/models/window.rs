//! Delivery window type.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A fixed delivery interval within one service day.
///
/// Windows order by start time (then end time). The canonical label formats
/// both ends on a 12-hour clock with a leading-zero hour and an uppercase
/// AM/PM suffix, which is also the key of the capacity map.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::DeliveryWindow;
///
/// let w = DeliveryWindow::from_hm(9, 0, 11, 0).unwrap();
/// assert_eq!(w.label(), "09:00 AM - 11:00 AM");
/// assert_eq!(w.duration_minutes(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeliveryWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl DeliveryWindow {
    /// Creates a window.
    ///
    /// Returns `None` unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start >= end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Creates a window from hour/minute pairs on a 24-hour clock.
    pub fn from_hm(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start_hour, start_min, 0)?;
        let end = NaiveTime::from_hms_opt(end_hour, end_min, 0)?;
        Self::new(start, end)
    }

    /// Window start.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Window end.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Length of the window in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Canonical label, e.g. `"01:00 PM - 03:00 PM"`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%I:%M %p"),
            self.end.format("%I:%M %p")
        )
    }

    /// Hours from this window's start to `later`'s start.
    ///
    /// Negative when `later` actually starts first.
    pub fn hours_until(&self, later: &DeliveryWindow) -> f64 {
        let delta = later.start.num_seconds_from_midnight() as f64
            - self.start.num_seconds_from_midnight() as f64;
        delta / 3600.0
    }

    /// Returns `true` if this window starts strictly before `other`.
    pub fn starts_before(&self, other: &DeliveryWindow) -> bool {
        self.start < other.start
    }
}

impl fmt::Display for DeliveryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_invalid() {
        assert!(DeliveryWindow::from_hm(11, 0, 9, 0).is_none());
        assert!(DeliveryWindow::from_hm(9, 0, 9, 0).is_none());
        assert!(DeliveryWindow::from_hm(25, 0, 26, 0).is_none());
    }

    #[test]
    fn test_label_afternoon() {
        let w = DeliveryWindow::from_hm(13, 0, 15, 30).expect("valid");
        assert_eq!(w.label(), "01:00 PM - 03:30 PM");
        assert_eq!(w.to_string(), w.label());
        assert_eq!(w.duration_minutes(), 150);
    }

    #[test]
    fn test_label_noon() {
        let w = DeliveryWindow::from_hm(11, 0, 13, 0).expect("valid");
        assert_eq!(w.label(), "11:00 AM - 01:00 PM");
    }

    #[test]
    fn test_hours_until() {
        let a = DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid");
        let b = DeliveryWindow::from_hm(15, 30, 17, 0).expect("valid");
        assert!((a.hours_until(&b) - 6.5).abs() < 1e-10);
        assert!((b.hours_until(&a) + 6.5).abs() < 1e-10);
        assert!(a.starts_before(&b));
        assert!(!b.starts_before(&a));
    }

    #[test]
    fn test_sort_by_start() {
        let mut ws = vec![
            DeliveryWindow::from_hm(13, 0, 15, 0).expect("valid"),
            DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid"),
            DeliveryWindow::from_hm(11, 0, 13, 0).expect("valid"),
        ];
        ws.sort();
        let starts: Vec<u32> = ws.iter().map(|w| w.start().hour()).collect();
        assert_eq!(starts, vec![9, 11, 13]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let w = DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid");
        let json = serde_json::to_string(&w).expect("serialize");
        assert_eq!(json, r#"{"start":"09:00:00","end":"11:00:00"}"#);
    }
}
