//! Clock implementations.
//!
//! The core crate only ever sees the [`Clock`] trait; the system clock
//! lives here, alongside a settable clock for tests and backfills.

use parking_lot::Mutex;
use stride_core::store::Clock;
use time::{Duration, OffsetDateTime};

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock pinned to an explicit instant, advanced manually.
#[derive(Debug)]
pub struct FixedClock(Mutex<OffsetDateTime>);

impl FixedClock {
    pub fn at(t: OffsetDateTime) -> Self {
        Self(Mutex::new(t))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock() += by;
    }

    pub fn set(&self, t: OffsetDateTime) {
        *self.0.lock() = t;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.0.lock()
    }
}
