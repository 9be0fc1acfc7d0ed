//! The snapshot interface the host supplies once per control cycle.

use rv_core::{Amount, ResourceKind, Tick};

/// A producer under construction that will raise capacity on completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingProducer {
    /// Ticks from now until the producer completes.
    pub completes_in: Tick,
    /// Capacity the producer adds once complete.
    pub provides: Amount,
}

/// Source of the current game state, read once per cycle by
/// [`ResourceManager::refresh`][crate::ResourceManager::refresh].
///
/// # Contract
///
/// - `balance(Capacity)` is the free capacity right now (total − used).
/// - `pending_producers` lists only producers that are not yet complete;
///   completed ones are already part of `capacity_total`.
/// - Must not block or perform I/O.
pub trait SnapshotProvider {
    /// Current raw balance of `kind`.
    fn balance(&self, kind: ResourceKind) -> f64;

    /// Measured accrual rate of `kind`, if the host has one.
    ///
    /// Default: `None`, which keeps the rate the ledger already holds.
    fn rate(&self, _kind: ResourceKind) -> Option<f64> {
        None
    }

    /// Total capacity currently provided by completed producers.
    fn capacity_total(&self) -> Amount;

    /// Producers still under construction.
    fn pending_producers(&self) -> Vec<PendingProducer>;
}

/// A plain-data snapshot.  Hosts that already collect their state into a
/// struct can fill this in and hand it to the ledger directly.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Snapshot {
    pub primary:           f64,
    pub secondary:         f64,
    pub capacity_used:     Amount,
    pub capacity_total:    Amount,
    pub primary_rate:      Option<f64>,
    pub secondary_rate:    Option<f64>,
    pub pending_producers: Vec<PendingProducer>,
}

impl SnapshotProvider for Snapshot {
    fn balance(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Primary   => self.primary,
            ResourceKind::Secondary => self.secondary,
            ResourceKind::Capacity  => (self.capacity_total - self.capacity_used) as f64,
        }
    }

    fn rate(&self, kind: ResourceKind) -> Option<f64> {
        match kind {
            ResourceKind::Primary   => self.primary_rate,
            ResourceKind::Secondary => self.secondary_rate,
            ResourceKind::Capacity  => None,
        }
    }

    fn capacity_total(&self) -> Amount {
        self.capacity_total
    }

    fn pending_producers(&self) -> Vec<PendingProducer> {
        self.pending_producers.clone()
    }
}
