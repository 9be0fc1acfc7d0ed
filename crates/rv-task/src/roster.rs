//! The `UnitRoster`: an in-process [`UnitAllocator`] over per-unit busy
//! intervals.

use std::collections::BTreeMap;

use rv_core::{Tick, UnitId, UnitTypeId};
use tracing::warn;

use crate::{UnitAllocator, UnitOffer, UnitRequest, UnitReservation, UnitTarget};

/// One unit known to the roster.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RosterUnit {
    unit_type: UnitTypeId,

    /// First tick the unit can do anything (it may still be in production).
    ready_at: Tick,

    /// Half-open `[start, end)` bookings, sorted by start.
    busy: Vec<(Tick, Tick)>,
}

impl RosterUnit {
    /// Earliest start `≥ not_before` at which the unit is free for
    /// `duration` ticks, or forever when `duration` is `None`.
    fn earliest_slot(&self, not_before: Tick, duration: Option<i64>) -> Option<Tick> {
        if self.ready_at.is_never() {
            return None;
        }
        let mut candidate = not_before.max(self.ready_at);

        for &(start, end) in &self.busy {
            if end <= candidate {
                continue;
            }
            let needed_until = duration.map_or(Tick::NEVER, |d| candidate.offset(d));
            if start >= needed_until {
                break;
            }
            if end.is_never() {
                return None;
            }
            candidate = end;
        }
        Some(candidate)
    }
}

/// Tracks which units exist, when each becomes ready, and when each is
/// already booked.
///
/// Units are kept in id order so that, between equally early candidates,
/// the lowest id always wins.
#[derive(Clone, Debug, Default)]
pub struct UnitRoster {
    units: BTreeMap<UnitId, RosterUnit>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `unit` as available from `ready_at`.  Re-adding a known unit
    /// resets its type and readiness but keeps its bookings.
    pub fn add_unit(&mut self, unit: UnitId, unit_type: UnitTypeId, ready_at: Tick) {
        let entry = self.units.entry(unit).or_insert_with(|| RosterUnit {
            unit_type,
            ready_at,
            busy: Vec::new(),
        });
        entry.unit_type = unit_type;
        entry.ready_at  = ready_at;
    }

    /// Forget `unit`.  Returns its type if it was known.
    pub fn remove_unit(&mut self, unit: UnitId) -> Option<UnitTypeId> {
        self.units.remove(&unit).map(|u| u.unit_type)
    }

    /// Move the tick at which `unit` becomes ready.  Returns `false` if the
    /// unit is unknown.
    pub fn set_ready_at(&mut self, unit: UnitId, ready_at: Tick) -> bool {
        match self.units.get_mut(&unit) {
            Some(u) => {
                u.ready_at = ready_at;
                true
            }
            None => false,
        }
    }

    /// Current bookings of `unit`, sorted by start.
    pub fn busy_intervals(&self, unit: UnitId) -> &[(Tick, Tick)] {
        self.units.get(&unit).map_or(&[], |u| u.busy.as_slice())
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains_key(&unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl UnitAllocator for UnitRoster {
    fn find_earliest(&self, request: &UnitRequest, not_before: Tick) -> Option<UnitOffer> {
        let offer_for = |(&unit, u): (&UnitId, &RosterUnit)| {
            u.earliest_slot(not_before, request.duration)
                .map(|start| UnitOffer { unit, start })
        };

        match request.target {
            UnitTarget::Instance(unit) => self.units.get_key_value(&unit).and_then(offer_for),
            UnitTarget::OfType(unit_type) => self
                .units
                .iter()
                .filter(|(_, u)| u.unit_type == unit_type)
                .filter_map(offer_for)
                .min_by_key(|offer| (offer.start, offer.unit)),
        }
    }

    fn reserve(&mut self, request: &UnitRequest, offer: UnitOffer) -> UnitReservation {
        let end = request.duration.map_or(Tick::NEVER, |d| offer.start.offset(d));
        let reservation = UnitReservation { unit: offer.unit, start: offer.start, end };

        match self.units.get_mut(&offer.unit) {
            Some(u) => {
                let at = u.busy.partition_point(|&(start, _)| start <= offer.start);
                u.busy.insert(at, (offer.start, end));
            }
            None => warn!(unit = %offer.unit, "reserving a unit the roster does not know"),
        }
        reservation
    }

    fn release(&mut self, reservation: &UnitReservation) {
        let interval = (reservation.start, reservation.end);
        let found = self.units.get_mut(&reservation.unit).and_then(|u| {
            let at = u.busy.iter().position(|&b| b == interval)?;
            Some(u.busy.remove(at))
        });
        if found.is_none() {
            warn!(
                unit  = %reservation.unit,
                start = %reservation.start,
                end   = %reservation.end,
                "releasing a unit reservation the roster never recorded"
            );
        }
    }
}
