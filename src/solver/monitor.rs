//! Wall-clock and iteration limits for the improvement phase.

use std::time::{Duration, Instant};

/// Stops a search after a fixed duration or iteration count.
///
/// The clock is only read when the masked iteration counter is zero, so a
/// mask of `0x3F` reads it every 64 ticks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_dispatch::solver::SearchLimit;
///
/// let mut limit = SearchLimit::new(Duration::from_secs(60), Some(3));
/// assert!(limit.tick());
/// assert!(limit.tick());
/// assert!(!limit.tick());
/// assert_eq!(limit.iterations(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SearchLimit {
    start: Instant,
    time_limit: Duration,
    max_iterations: Option<u64>,
    iterations: u64,
    clock_check_mask: u64,
    expired: bool,
}

impl SearchLimit {
    /// Creates a limit starting now.
    pub fn new(time_limit: Duration, max_iterations: Option<u64>) -> Self {
        Self {
            start: Instant::now(),
            time_limit,
            max_iterations,
            iterations: 0,
            clock_check_mask: 0x3F,
            expired: false,
        }
    }

    /// Sets how often the clock is read (a power of two minus one).
    pub fn with_mask(mut self, mask: u64) -> Self {
        self.clock_check_mask = mask;
        self
    }

    /// Counts one iteration; returns `false` once the search must stop.
    pub fn tick(&mut self) -> bool {
        if self.expired {
            return false;
        }
        self.iterations += 1;
        if self.max_iterations.is_some_and(|max| self.iterations >= max) {
            self.expired = true;
        } else if self.iterations & self.clock_check_mask == 0 && self.start.elapsed() >= self.time_limit {
            self.expired = true;
        }
        !self.expired
    }

    /// Returns `true` once the limit was hit, checking the clock directly.
    pub fn is_expired(&mut self) -> bool {
        if !self.expired && self.start.elapsed() >= self.time_limit {
            self.expired = true;
        }
        self.expired
    }

    /// Iterations counted so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Time since the limit was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
