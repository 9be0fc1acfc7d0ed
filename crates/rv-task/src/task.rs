//! The `Task`: a bundle of requirements resolved and committed together.

use rv_core::{Amount, ResourceKind, TaskId, Tick, UnitId};
use tracing::{debug, warn};

use crate::{PlanContext, Requirement, ResourceRequirement, UnitRequirement};

/// Zero or more resource requirements plus at most one unit requirement.
///
/// # Lifecycle
///
/// 1. Build with [`new`][Self::new], then add requirements.
/// 2. Call [`update_time`][Self::update_time] once per control cycle.  Each
///    call frees what the previous one committed and resolves afresh.
/// 3. Call [`release`][Self::release] when the task is finished or
///    abandoned.  Dropping a task that still holds reservations leaks them
///    in the ledger and logs a warning.
#[derive(Debug)]
pub struct Task {
    id: TaskId,

    requirements: Vec<ResourceRequirement>,

    unit_requirement: Option<UnitRequirement>,

    /// Result of the last resolution.  `Tick::ZERO` before the first one.
    earliest_time: Tick,

    /// Unit chosen by the last resolution, if a unit was required and found.
    assigned_unit: Option<UnitId>,
}

impl Task {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            requirements:     Vec::new(),
            unit_requirement: None,
            earliest_time:    Tick::ZERO,
            assigned_unit:    None,
        }
    }

    /// Require `amount` of `kind` at the task's start.
    ///
    /// Takes effect on the next [`update_time`][Self::update_time].
    pub fn add_requirement(&mut self, kind: ResourceKind, amount: Amount) -> &mut Self {
        self.requirements.push(ResourceRequirement::new(kind, amount));
        self
    }

    /// Require a unit.  A task has at most one unit requirement; setting a
    /// second one replaces the first.
    ///
    /// A replaced requirement that still holds a reservation is not released
    /// here: the reservation stays with the allocator.  Call
    /// [`free_all`][Self::free_all] first when re-targeting a resolved task.
    pub fn set_unit_requirement(&mut self, requirement: UnitRequirement) -> &mut Self {
        if let Some(previous) = self.unit_requirement.replace(requirement) {
            warn!(
                task     = %self.id,
                previous = ?previous.request().target,
                held     = previous.is_reserved(),
                "task already had a unit requirement; replacing it"
            );
        }
        self
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve the task's earliest start and commit every requirement there.
    ///
    /// Returns the new earliest time, [`Tick::NEVER`] if any requirement can
    /// never be met.  On `NEVER` nothing is committed.
    pub fn update_time(&mut self, ctx: &mut PlanContext<'_>) -> Tick {
        self.free_all(ctx);

        let view: &PlanContext<'_> = ctx;
        let mut time = self
            .requirements
            .iter()
            .map(|r| r.earliest_time(view))
            .max()
            .unwrap_or(Tick::ZERO);

        if !time.is_never() {
            if let Some(unit) = self.unit_requirement.as_mut() {
                time = unit.reserve_earliest_time(ctx, time);
            }
        }

        if !time.is_never() {
            for requirement in &mut self.requirements {
                requirement.reserve_time(ctx, time);
            }
        }

        self.earliest_time = time;
        self.assigned_unit = self.unit_requirement.as_ref().and_then(UnitRequirement::chosen_unit);

        debug!(
            task         = %self.id,
            earliest     = %time,
            requirements = self.requirements.len(),
            unit         = ?self.assigned_unit,
            "task resolved"
        );
        time
    }

    /// Release every reservation the task holds.  Safe to call repeatedly.
    pub fn free_all(&mut self, ctx: &mut PlanContext<'_>) {
        for requirement in &mut self.requirements {
            requirement.free_reserved(ctx);
        }
        if let Some(unit) = self.unit_requirement.as_mut() {
            unit.free_reserved(ctx);
        }
    }

    /// Tear the task down: free everything and, if it had resolved to a
    /// future tick, tell the owning scheduler.
    pub fn release(mut self, ctx: &mut PlanContext<'_>) {
        self.free_all(ctx);
        if self.earliest_time > Tick::ZERO && !self.earliest_time.is_never() {
            ctx.observer.on_task_destroyed(self.id, self.earliest_time);
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn earliest_time(&self) -> Tick {
        self.earliest_time
    }

    pub fn assigned_unit(&self) -> Option<UnitId> {
        self.assigned_unit
    }

    pub fn requirements(&self) -> &[ResourceRequirement] {
        &self.requirements
    }

    pub fn unit_requirement(&self) -> Option<&UnitRequirement> {
        self.unit_requirement.as_ref()
    }

    /// `true` while any requirement holds a reservation.
    pub fn holds_reservations(&self) -> bool {
        self.requirements.iter().any(Requirement::is_reserved)
            || self.unit_requirement.as_ref().is_some_and(Requirement::is_reserved)
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        if self.holds_reservations() {
            warn!(
                task     = %self.id,
                earliest = %self.earliest_time,
                "task dropped while still holding reservations"
            );
        }
    }
}
