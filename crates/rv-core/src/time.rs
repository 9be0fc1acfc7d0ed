//! Planning time model.
//!
//! # Design
//!
//! Time is a signed `Tick` counter relative to *now*: tick 0 is the current
//! control cycle, positive ticks are the future.  Reservations made for a
//! tick `≤ 0` are "immediate" and are tracked outside any timeline.
//!
//! Permanent infeasibility is a value, not an error: [`Tick::NEVER`] is the
//! largest representable tick and compares greater than every real one, so
//! `max` across requirements naturally propagates it.

use std::fmt;

/// Signed amount of a resource.  Positive deltas consume, negative deltas
/// produce or release.
pub type Amount = i64;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A planning tick, relative to the current control cycle.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub i64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Sentinel meaning "never feasible".
    pub const NEVER: Tick = Tick(i64::MAX);

    #[inline]
    pub fn is_never(self) -> bool {
        self == Tick::NEVER
    }

    /// `true` for ticks that refer to the present (`≤ 0`).
    #[inline]
    pub fn is_immediate(self) -> bool {
        self.0 <= 0
    }

    /// Return the tick `n` steps after `self`.  Saturates, so `NEVER` stays
    /// `NEVER`.
    #[inline]
    pub fn offset(self, n: i64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> i64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<i64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: i64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Tick) -> i64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            f.write_str("never")
        } else {
            write!(f, "T{}", self.0)
        }
    }
}
