//! Borrowed collaborators passed to every requirement and task call.

use rv_ledger::ResourceManager;

use crate::{TaskObserver, UnitAllocator};

/// The shared state a task works against during one control cycle.
///
/// Built by the host for the duration of its planning pass.  Tasks and
/// requirements only ever hold it for a single call, so one ledger serves
/// any number of tasks without shared ownership.
pub struct PlanContext<'a> {
    /// The resource ledger.
    pub resources: &'a mut ResourceManager,

    /// Chooses which concrete unit fulfils a unit requirement.
    pub units: &'a mut dyn UnitAllocator,

    /// The owning scheduler, notified when resolved tasks are released.
    pub observer: &'a mut dyn TaskObserver,
}

impl<'a> PlanContext<'a> {
    #[inline]
    pub fn new(
        resources: &'a mut ResourceManager,
        units:     &'a mut dyn UnitAllocator,
        observer:  &'a mut dyn TaskObserver,
    ) -> Self {
        Self { resources, units, observer }
    }
}
