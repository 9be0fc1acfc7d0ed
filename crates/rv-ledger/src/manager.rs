//! The `ResourceManager`: one [`ResourceSlot`] per pool plus capacity
//! output tracking.

use rv_core::{Amount, LedgerConfig, ReserveResult, ResourceKind, Tick};
use rv_timeline::ResourceTimeline;
use tracing::{debug, trace, warn};

use crate::{ResourceSlot, SnapshotProvider};

/// Owns the three pools and answers every reservation question against them.
///
/// # Capacity pool
///
/// Capacity never accrues.  Besides the usual task and implicit timelines it
/// keeps a third, permanent timeline of capacity that tasks will *add* on
/// completion.  The distinction matters for two queries:
///
/// | Recorded as                  | `available_at_time` | `total_capacity_at_time` |
/// |------------------------------|---------------------|--------------------------|
/// | temporary output             | yes                 | no                       |
/// | permanent output             | yes                 | yes                      |
/// | pending producer (snapshot)  | yes                 | yes                      |
///
/// A permanent output must be taken back with
/// [`remove_capacity_output`][Self::remove_capacity_output] by whoever added
/// it, once the producer either completes (the snapshot then reports it) or
/// is abandoned.  The ledger has no other way to learn that it is gone.
#[derive(Clone, Debug)]
pub struct ResourceManager {
    config: LedgerConfig,

    slots: [ResourceSlot; 3],

    /// Capacity provided by completed producers, from the latest snapshot.
    capacity_total: Amount,

    /// Permanent capacity outputs of planned producers (negative deltas).
    capacity_outputs: ResourceTimeline,

    /// Number of refreshes applied so far.
    cycles: u64,
}

impl ResourceManager {
    /// Create a manager with empty pools and the configured starting rates.
    pub fn new(config: LedgerConfig) -> ReserveResult<Self> {
        config.validate()?;
        let slots = ResourceKind::ALL.map(|kind| ResourceSlot::new(config.initial_rate(kind)));
        Ok(Self {
            config,
            slots,
            capacity_total:   0,
            capacity_outputs: ResourceTimeline::new(),
            cycles:           0,
        })
    }

    // ── Per-cycle refresh ─────────────────────────────────────────────────

    /// Pull balances and rates from `snapshot` and rebuild the capacity
    /// pool's implicit timeline from every producer still under construction.
    ///
    /// Task reservations and permanent outputs are left untouched, so
    /// refreshing twice with the same snapshot is a no-op the second time.
    pub fn refresh<P: SnapshotProvider + ?Sized>(&mut self, snapshot: &P) {
        for kind in ResourceKind::ALL {
            let slot = &mut self.slots[kind.index()];
            slot.balance = snapshot.balance(kind);

            if !kind.accrues() {
                continue;
            }
            match snapshot.rate(kind) {
                Some(rate) if rate.is_finite() => slot.rate = rate,
                Some(rate) => warn!(%kind, rate, "ignoring non-finite accrual rate"),
                None => {}
            }
        }

        self.capacity_total = snapshot.capacity_total();

        let producers = snapshot.pending_producers();
        let implicit = &mut self.slots[ResourceKind::Capacity.index()].implicit_timeline;
        implicit.clear();
        for producer in &producers {
            let mut at = producer.completes_in;
            if at.is_immediate() {
                warn!(completes_in = %at, provides = producer.provides, "pending producer already due; counting it at T1");
                at = Tick(1);
            }
            implicit.insert(at, -producer.provides);
        }

        self.cycles += 1;
        debug!(
            cycle          = self.cycles,
            primary        = self.slots[0].balance,
            secondary      = self.slots[1].balance,
            capacity_free  = self.slots[2].balance,
            pending        = producers.len(),
            "ledger refreshed"
        );
    }

    // ── Reservations ──────────────────────────────────────────────────────

    /// Commit `amount` of `kind` at `time`.
    ///
    /// `time ≤ 0` adds to the immediate reservation; later ticks add a delta
    /// to the pool's task timeline.
    pub fn reserve_task(&mut self, kind: ResourceKind, time: Tick, amount: Amount) {
        trace!(%kind, %time, amount, "reserve");
        self.slots[kind.index()].reserve(time, amount);
    }

    /// Release a reservation previously made with the same arguments.
    ///
    /// # Panics
    ///
    /// Panics if `time > 0` and the pool's task timeline has no entry at
    /// `time`.  Freeing what was never reserved would otherwise read as
    /// future production.
    pub fn free_task(&mut self, kind: ResourceKind, time: Tick, amount: Amount) {
        trace!(%kind, %time, amount, "free");
        self.slots[kind.index()].free(time, amount);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Earliest tick from which `amount` of `kind` can be committed for good,
    /// or [`Tick::NEVER`].
    pub fn earliest_availability(&self, kind: ResourceKind, amount: Amount) -> Tick {
        self.slots[kind.index()].earliest_availability(amount)
    }

    /// Projected free amount of `kind` at `time`.
    pub fn available_at_time(&self, kind: ResourceKind, time: Tick) -> Amount {
        self.slots[kind.index()].available_at_time(time)
    }

    // ── Capacity outputs ──────────────────────────────────────────────────

    /// Record that `amount` capacity becomes available at `time`.
    ///
    /// Always visible to availability checks.  Unless `temporary`, it is also
    /// recorded as a permanent output and counted by
    /// [`total_capacity_at_time`][Self::total_capacity_at_time].
    pub fn add_capacity_output(&mut self, time: Tick, amount: Amount, temporary: bool) {
        debug_assert!(!time.is_immediate(), "capacity output must land in the future, got {time}");
        trace!(%time, amount, temporary, "add capacity output");

        self.slots[ResourceKind::Capacity.index()].task_timeline.insert(time, -amount);
        if !temporary {
            self.capacity_outputs.insert(time, -amount);
        }
    }

    /// Take back an output added with the same arguments.
    ///
    /// # Panics
    ///
    /// Panics if no output was recorded at `time`.
    pub fn remove_capacity_output(&mut self, time: Tick, amount: Amount, temporary: bool) {
        trace!(%time, amount, temporary, "remove capacity output");

        if !temporary {
            self.capacity_outputs.remove(time, amount);
        }
        self.slots[ResourceKind::Capacity.index()].task_timeline.remove(time, amount);
    }

    /// Total capacity at `time`: the current total plus every pending
    /// producer and permanent output completing by then.
    pub fn total_capacity_at_time(&self, time: Tick) -> Amount {
        let implicit = &self.slots[ResourceKind::Capacity.index()].implicit_timeline;
        let added: Amount = implicit
            .iter()
            .chain(self.capacity_outputs.iter())
            .filter(|e| e.time <= time && e.amount < 0)
            .map(|e| -e.amount)
            .sum();
        self.capacity_total + added
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn slot(&self, kind: ResourceKind) -> &ResourceSlot {
        &self.slots[kind.index()]
    }

    pub fn balance(&self, kind: ResourceKind) -> f64 {
        self.slots[kind.index()].balance
    }

    pub fn rate(&self, kind: ResourceKind) -> f64 {
        self.slots[kind.index()].rate
    }

    pub fn immediate_reservation(&self, kind: ResourceKind) -> Amount {
        self.slots[kind.index()].immediate_reservation
    }

    pub fn capacity_outputs(&self) -> &ResourceTimeline {
        &self.capacity_outputs
    }

    /// Number of refreshes applied so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
