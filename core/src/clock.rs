//! Wall-clock seam.
//!
//! Predictions depend on "now" only through this trait, so tests can pin
//! the clock and make every prediction a pure function of catalog,
//! calibration and time.

use crate::types::UnixSeconds;

pub trait Clock: Send + Sync {
    fn now_unix(&self) -> UnixSeconds;
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> UnixSeconds {
        chrono::Utc::now().timestamp()
    }
}

/// A clock frozen at a fixed instant, for tests.
pub struct FixedClock(pub UnixSeconds);

impl Clock for FixedClock {
    fn now_unix(&self) -> UnixSeconds {
        self.0
    }
}
