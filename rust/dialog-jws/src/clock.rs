//! Wall-clock sources.
//!
//! Evaluation only ever needs "now" as whole Unix seconds. Abstracting it
//! behind [`Clock`] keeps the evaluator deterministic under test.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// A source of the current time as seconds since the Unix epoch.
pub trait Clock {
    /// Current Unix time in seconds.
    fn now(&self) -> u64;
}

/// Reads the system clock.
///
/// Uses `std::time::SystemTime` on native and `web_time::SystemTime` on WASM.
/// A clock set before the epoch reads as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn now(&self) -> u64 {
        self()
    }
}
