//! Ledger configuration.
//!
//! Typically loaded from a JSON file by the host application and passed to
//! the resource manager at construction.

use crate::{ReserveError, ReserveResult, ResourceKind};

/// Income of one gatherer per tick, used to seed the primary rate before the
/// first measured rate arrives.
pub const GATHERER_RATE_PER_TICK: f64 = 0.0501;

/// Gatherers assumed to be working on the first cycle.
pub const STARTING_GATHERERS: u32 = 4;

/// Top-level configuration of the resource ledger.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LedgerConfig {
    /// Accrual rate of the primary pool until a snapshot supplies one.
    pub primary_rate: f64,

    /// Accrual rate of the secondary pool until a snapshot supplies one.
    pub secondary_rate: f64,

    /// How many ticks pass between two control cycles.  The host uses this to
    /// decide when to call `ResourceManager::refresh`; the ledger itself only
    /// validates it.
    pub refresh_interval_ticks: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            primary_rate:           STARTING_GATHERERS as f64 * GATHERER_RATE_PER_TICK,
            secondary_rate:         0.0,
            refresh_interval_ticks: 3,
        }
    }
}

impl LedgerConfig {
    /// Reject rates that are negative or not finite, and a zero interval.
    pub fn validate(&self) -> ReserveResult<()> {
        for (name, rate) in [
            ("primary_rate", self.primary_rate),
            ("secondary_rate", self.secondary_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ReserveError::Config(format!(
                    "{name} must be finite and >= 0, got {rate}"
                )));
            }
        }
        if self.refresh_interval_ticks == 0 {
            return Err(ReserveError::Config(
                "refresh_interval_ticks must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Starting accrual rate for `kind`.  The capacity pool never accrues.
    pub fn initial_rate(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Primary   => self.primary_rate,
            ResourceKind::Secondary => self.secondary_rate,
            ResourceKind::Capacity  => 0.0,
        }
    }
}
