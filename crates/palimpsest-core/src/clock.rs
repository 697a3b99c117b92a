//! Current-date capability.
//!
//! The engine needs exactly one fact from the outside world: today's date on
//! the system the member lives on, as the legacy `yymmdd` numeric. It is
//! used only as the fallback when a caller supplies a date outside the sane
//! range, so the trait is deliberately this small.

use chrono::{Datelike, Local};

/// Supplies the current system date.
pub trait Clock: std::fmt::Debug {
    /// Today as `yymmdd` (e.g. `260806` for 2026-08-06).
    fn current_date(&self) -> u32;
}

/// Wall clock of the local system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_date(&self) -> u32 {
        let today = Local::now().date_naive();
        let yy = u32::try_from(today.year().rem_euclid(100)).unwrap_or(0);
        yy * 10_000 + today.month() * 100 + today.day()
    }
}

/// A clock pinned to one date, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_date(&self) -> u32 {
        self.0
    }
}
