//! Unit requirements and the allocator interface that fulfils them.
//!
//! Which concrete unit serves a request is decided by a [`UnitAllocator`]
//! supplied by the host.  The requirement only carries the request, asks the
//! allocator for an offer no earlier than a floor tick, and owns the
//! resulting [`UnitReservation`] until it is released.

use rv_core::{Position, Tick, UnitId, UnitTypeId};
use tracing::{trace, warn};

use crate::{PlanContext, Requirement};

// ── Request types ─────────────────────────────────────────────────────────────

/// Which unit(s) may satisfy a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitTarget {
    /// Any unit of this type.
    OfType(UnitTypeId),
    /// Exactly this unit.
    Instance(UnitId),
}

/// Where the unit has to go: passed through to the allocator untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub from: Position,
    pub to:   Position,
}

/// Everything an allocator needs to choose a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitRequest {
    pub target: UnitTarget,

    /// How many ticks the unit is needed for.  `None` means the unit is
    /// consumed: it stays busy for good once the task starts.
    pub duration: Option<i64>,

    pub route: Option<Route>,
}

/// An allocator's answer to [`UnitAllocator::find_earliest`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnitOffer {
    pub unit:  UnitId,
    pub start: Tick,
}

/// A unit held for `[start, end)`.  `end` is [`Tick::NEVER`] for open-ended
/// requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitReservation {
    pub unit:  UnitId,
    pub start: Tick,
    pub end:   Tick,
}

// ── Allocator trait ───────────────────────────────────────────────────────────

/// Pluggable unit selection.
///
/// # Contract
///
/// - `find_earliest` is a pure query and never offers a start earlier than
///   `not_before`.  `None` means no unit can ever serve the request.
/// - `reserve` books the offered unit; the offer must come from
///   `find_earliest` with no other booking in between.
/// - `release` undoes a reservation returned by `reserve`.
pub trait UnitAllocator {
    fn find_earliest(&self, request: &UnitRequest, not_before: Tick) -> Option<UnitOffer>;

    fn reserve(&mut self, request: &UnitRequest, offer: UnitOffer) -> UnitReservation;

    fn release(&mut self, reservation: &UnitReservation);
}

// ── UnitRequirement ───────────────────────────────────────────────────────────

/// Demand for a unit of a type, or for one specific unit.
///
/// # Example
///
/// ```rust,ignore
/// let builder = UnitRequirement::of_type(WORKER)
///     .with_duration(40)
///     .with_route(base, expansion);
/// task.set_unit_requirement(builder);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRequirement {
    request:     UnitRequest,
    reservation: Option<UnitReservation>,
}

impl UnitRequirement {
    pub fn of_type(unit_type: UnitTypeId) -> Self {
        Self::new(UnitTarget::OfType(unit_type))
    }

    pub fn instance(unit: UnitId) -> Self {
        Self::new(UnitTarget::Instance(unit))
    }

    fn new(target: UnitTarget) -> Self {
        Self {
            request:     UnitRequest { target, duration: None, route: None },
            reservation: None,
        }
    }

    pub fn with_duration(mut self, ticks: i64) -> Self {
        self.request.duration = Some(ticks);
        self
    }

    pub fn with_route(mut self, from: Position, to: Position) -> Self {
        self.request.route = Some(Route { from, to });
        self
    }

    pub fn request(&self) -> &UnitRequest {
        &self.request
    }

    pub fn reservation(&self) -> Option<&UnitReservation> {
        self.reservation.as_ref()
    }

    /// Find and book the earliest unit that can start at or after
    /// `not_before`.  Returns the start tick, or [`Tick::NEVER`] (holding
    /// nothing) if no unit qualifies.
    pub fn reserve_earliest_time(&mut self, ctx: &mut PlanContext<'_>, not_before: Tick) -> Tick {
        self.free_reserved(ctx);

        let Some(offer) = ctx.units.find_earliest(&self.request, not_before) else {
            return Tick::NEVER;
        };
        debug_assert!(offer.start >= not_before, "allocator offered {} before {not_before}", offer.start);

        let reservation = ctx.units.reserve(&self.request, offer);
        trace!(unit = %reservation.unit, start = %reservation.start, end = %reservation.end, "unit reserved");
        self.reservation = Some(reservation);
        offer.start
    }

    /// The unit chosen by the last successful reservation.
    pub fn chosen_unit(&self) -> Option<UnitId> {
        self.reservation.map(|r| r.unit)
    }
}

impl Requirement for UnitRequirement {
    fn earliest_time(&self, ctx: &PlanContext<'_>) -> Tick {
        ctx.units
            .find_earliest(&self.request, Tick::ZERO)
            .map_or(Tick::NEVER, |offer| offer.start)
    }

    /// Book a unit starting at exactly `time`.  If no unit is free then,
    /// nothing is held afterwards.
    fn reserve_time(&mut self, ctx: &mut PlanContext<'_>, time: Tick) {
        self.free_reserved(ctx);

        match ctx.units.find_earliest(&self.request, time) {
            Some(offer) if offer.start == time => {
                self.reservation = Some(ctx.units.reserve(&self.request, offer));
            }
            offer => warn!(
                target_unit = ?self.request.target,
                %time,
                earliest = ?offer.map(|o| o.start),
                "no unit free at the requested tick; nothing reserved"
            ),
        }
    }

    fn free_reserved(&mut self, ctx: &mut PlanContext<'_>) {
        if let Some(reservation) = self.reservation.take() {
            ctx.units.release(&reservation);
        }
    }

    fn is_reserved(&self) -> bool {
        self.reservation.is_some()
    }
}
