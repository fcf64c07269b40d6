//! The clock capability: the single source of "now".
//!
//! Predicates that compare against the current time take a [`Clock`] instead
//! of reading the system clock, so they can be replayed deterministically.

use chrono::Utc;

use crate::Instant;

pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads the OS clock via `chrono::Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Utc::now()
    }
}

/// Always answers the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
