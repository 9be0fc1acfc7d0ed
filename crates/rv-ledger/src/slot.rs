//! One pool's state: current balance, immediate reservation, accrual rate,
//! and its two timelines.

use std::borrow::Cow;

use rv_core::{Amount, Tick};
use rv_timeline::{ResourceTimeline, availability_at_time, earliest_availability};

/// Ledger state for a single resource pool.
///
/// `balance - immediate_reservation` is the free amount at tick 0.  Callers
/// are expected to keep it non-negative by never reserving more than
/// [`earliest_availability`][Self::earliest_availability] allows; the slot
/// does not enforce it.
#[derive(Clone, Debug, Default)]
pub struct ResourceSlot {
    /// Raw balance from the latest snapshot.
    pub(crate) balance: f64,

    /// Amount reserved for "now" (tick ≤ 0), tracked outside the timelines.
    pub(crate) immediate_reservation: Amount,

    /// Continuous accrual per tick.  Always 0 for the capacity pool.
    pub(crate) rate: f64,

    /// Reservations committed by tasks for future ticks.  Persists across
    /// cycles until freed.
    pub(crate) task_timeline: ResourceTimeline,

    /// Projection rebuilt from every snapshot (e.g. capacity provided by
    /// producers still under construction).
    pub(crate) implicit_timeline: ResourceTimeline,
}

impl ResourceSlot {
    pub(crate) fn new(rate: f64) -> Self {
        Self { rate, ..Self::default() }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn immediate_reservation(&self) -> Amount {
        self.immediate_reservation
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn task_timeline(&self) -> &ResourceTimeline {
        &self.task_timeline
    }

    pub fn implicit_timeline(&self) -> &ResourceTimeline {
        &self.implicit_timeline
    }

    /// Free amount at tick 0.
    #[inline]
    pub fn free_now(&self) -> f64 {
        self.balance - self.immediate_reservation as f64
    }

    /// Task and implicit timelines merged into the single view the
    /// availability simulation walks.
    pub fn projected_timeline(&self) -> Cow<'_, ResourceTimeline> {
        if self.implicit_timeline.is_empty() {
            Cow::Borrowed(&self.task_timeline)
        } else if self.task_timeline.is_empty() {
            Cow::Borrowed(&self.implicit_timeline)
        } else {
            Cow::Owned(self.task_timeline.merged(&self.implicit_timeline))
        }
    }

    /// Commit `amount` at `time`.  Ticks `≤ 0` go to the immediate counter.
    ///
    /// A future entry is kept even if other deltas cancel it to zero, so the
    /// matching [`free`][Self::free] always finds it.
    pub(crate) fn reserve(&mut self, time: Tick, amount: Amount) {
        if time.is_immediate() {
            self.immediate_reservation += amount;
        } else {
            self.task_timeline.insert(time, amount);
        }
    }

    /// Undo a [`reserve`][Self::reserve] made with the same arguments.
    ///
    /// # Panics
    ///
    /// Panics if `time` is in the future and nothing was reserved there.
    pub(crate) fn free(&mut self, time: Tick, amount: Amount) {
        if time.is_immediate() {
            self.immediate_reservation -= amount;
        } else {
            self.task_timeline.remove(time, -amount);
        }
    }

    pub fn earliest_availability(&self, amount: Amount) -> Tick {
        earliest_availability(amount, self.free_now(), self.rate, &self.projected_timeline())
    }

    pub fn available_at_time(&self, time: Tick) -> Amount {
        availability_at_time(time, self.free_now(), self.rate, &self.projected_timeline())
    }
}
