//! The `Requirement` trait and the fixed-amount resource requirement.

use rv_core::{Amount, ResourceKind, Tick};

use crate::PlanContext;

/// A unit of demand that knows how to ask the ledger for its earliest time
/// and how to commit and release its own reservation.
///
/// # Contract
///
/// - [`earliest_time`][Self::earliest_time] is a pure query.
/// - [`reserve_time`][Self::reserve_time] commits at exactly the given tick,
///   replacing any reservation the requirement already held.  If it cannot
///   commit there it holds nothing afterwards.
/// - [`free_reserved`][Self::free_reserved] releases what is held and is a
///   no-op on an unresolved requirement, so calling it twice is safe.
pub trait Requirement {
    /// Earliest tick at which this requirement could be committed, or
    /// [`Tick::NEVER`].
    fn earliest_time(&self, ctx: &PlanContext<'_>) -> Tick;

    /// Commit the requirement at `time`.
    fn reserve_time(&mut self, ctx: &mut PlanContext<'_>, time: Tick);

    /// Release the reservation, if any.
    fn free_reserved(&mut self, ctx: &mut PlanContext<'_>);

    /// `true` while a reservation is held.
    fn is_reserved(&self) -> bool;
}

/// Demand for a fixed amount of one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRequirement {
    kind:        ResourceKind,
    amount:      Amount,
    reserved_at: Option<Tick>,
}

impl ResourceRequirement {
    pub fn new(kind: ResourceKind, amount: Amount) -> Self {
        Self { kind, amount, reserved_at: None }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Tick of the reservation currently held.
    pub fn reserved_at(&self) -> Option<Tick> {
        self.reserved_at
    }
}

impl Requirement for ResourceRequirement {
    fn earliest_time(&self, ctx: &PlanContext<'_>) -> Tick {
        ctx.resources.earliest_availability(self.kind, self.amount)
    }

    fn reserve_time(&mut self, ctx: &mut PlanContext<'_>, time: Tick) {
        debug_assert!(!time.is_never(), "cannot reserve {} at {time}", self.kind);
        self.free_reserved(ctx);
        ctx.resources.reserve_task(self.kind, time, self.amount);
        self.reserved_at = Some(time);
    }

    fn free_reserved(&mut self, ctx: &mut PlanContext<'_>) {
        if let Some(time) = self.reserved_at.take() {
            ctx.resources.free_task(self.kind, time, self.amount);
        }
    }

    fn is_reserved(&self) -> bool {
        self.reserved_at.is_some()
    }
}
