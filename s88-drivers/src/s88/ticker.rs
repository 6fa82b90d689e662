//! Interval gate for cooperative polling
//!
//! The host loop calls the driver as often as it likes; the ticker lets one
//! phase through per elapsed interval. The very first call is always due.
//! Elapsed time uses wrapping arithmetic so a rolling-over microsecond
//! counter is handled.

use s88_core::Micros;

/// Lets work through at most once per `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickScheduler {
    interval: Micros,
    last: Option<Micros>,
}

impl TickScheduler {
    /// Create a ticker that has not advanced yet
    pub const fn new(interval: Micros) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Configured interval
    pub fn interval(&self) -> Micros {
        self.interval
    }

    /// Time of the last advance, if any
    pub fn last(&self) -> Option<Micros> {
        self.last
    }

    /// Move the reference time without advancing
    pub fn restart(&mut self, now: Micros) {
        self.last = Some(now);
    }

    /// Check whether an interval has elapsed since the last advance
    ///
    /// When it has, `now` becomes the new reference time.
    pub fn due(&mut self, now: Micros) -> bool {
        if let Some(last) = self.last {
            if now.wrapping_sub(last) < self.interval {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}
