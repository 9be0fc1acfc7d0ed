//! Unit tests for rv-task.

use rv_core::{LedgerConfig, Position, ResourceKind, TaskId, Tick, UnitId, UnitTypeId};
use rv_ledger::{ResourceManager, Snapshot};

use crate::{
    PlanContext, Requirement, ResourceRequirement, Task, TaskObserver, UnitAllocator, UnitRequest,
    UnitRequirement, UnitRoster, UnitTarget,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const WORKER: UnitTypeId = UnitTypeId(0);
const FACTORY: UnitTypeId = UnitTypeId(1);

#[derive(Default)]
struct RecordingObserver {
    destroyed: Vec<(TaskId, Tick)>,
}

impl TaskObserver for RecordingObserver {
    fn on_task_destroyed(&mut self, task: TaskId, earliest_time: Tick) {
        self.destroyed.push((task, earliest_time));
    }
}

/// Ledger, roster and observer for one test.
struct Harness {
    resources: ResourceManager,
    roster:    UnitRoster,
    observer:  RecordingObserver,
}

impl Harness {
    /// Primary accrues 1 per tick from an empty balance; secondary never
    /// accrues.
    fn new(snapshot: Snapshot) -> Self {
        let config = LedgerConfig { primary_rate: 1.0, secondary_rate: 0.0, ..LedgerConfig::default() };
        let mut resources = ResourceManager::new(config).unwrap();
        resources.refresh(&snapshot);
        Self { resources, roster: UnitRoster::new(), observer: RecordingObserver::default() }
    }

    fn empty() -> Self {
        Self::new(Snapshot::default())
    }

    fn ctx(&mut self) -> PlanContext<'_> {
        PlanContext::new(&mut self.resources, &mut self.roster, &mut self.observer)
    }

    fn primary_entries(&self) -> Vec<(i64, i64)> {
        self.resources
            .slot(ResourceKind::Primary)
            .task_timeline()
            .iter()
            .map(|e| (e.time.0, e.amount))
            .collect()
    }
}

fn open_request(target: UnitTarget) -> UnitRequest {
    UnitRequest { target, duration: None, route: None }
}

fn timed_request(target: UnitTarget, ticks: i64) -> UnitRequest {
    UnitRequest { target, duration: Some(ticks), route: None }
}

// ── ResourceRequirement ───────────────────────────────────────────────────────

#[cfg(test)]
mod resource_requirement_tests {
    use super::*;

    #[test]
    fn earliest_time_is_a_pure_query() {
        let mut h = Harness::empty();
        let req = ResourceRequirement::new(ResourceKind::Primary, 12);
        let ctx = h.ctx();
        assert_eq!(req.earliest_time(&ctx), Tick(12));
        assert_eq!(req.earliest_time(&ctx), Tick(12));
        drop(ctx);
        assert!(h.primary_entries().is_empty());
    }

    #[test]
    fn reserve_then_free_restores_the_ledger() {
        let mut h = Harness::empty();
        let mut req = ResourceRequirement::new(ResourceKind::Primary, 12);
        req.reserve_time(&mut h.ctx(), Tick(20));
        assert_eq!(req.reserved_at(), Some(Tick(20)));
        assert_eq!(h.primary_entries(), vec![(20, 12)]);

        req.free_reserved(&mut h.ctx());
        assert!(!req.is_reserved());
        assert!(h.primary_entries().is_empty());
    }

    #[test]
    fn free_is_idempotent() {
        let mut h = Harness::empty();
        let mut req = ResourceRequirement::new(ResourceKind::Primary, 12);
        req.free_reserved(&mut h.ctx());

        req.reserve_time(&mut h.ctx(), Tick(20));
        req.free_reserved(&mut h.ctx());
        req.free_reserved(&mut h.ctx());
        assert!(h.primary_entries().is_empty());
    }

    #[test]
    fn reserving_again_moves_the_reservation() {
        let mut h = Harness::empty();
        let mut req = ResourceRequirement::new(ResourceKind::Primary, 12);
        req.reserve_time(&mut h.ctx(), Tick(20));
        req.reserve_time(&mut h.ctx(), Tick(30));
        assert_eq!(h.primary_entries(), vec![(30, 12)]);
    }
}

// ── UnitRoster ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod roster_tests {
    use super::*;

    #[test]
    fn lowest_id_wins_among_equally_early_units() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(9), WORKER, Tick(0));
        roster.add_unit(UnitId(3), WORKER, Tick(0));
        roster.add_unit(UnitId(1), FACTORY, Tick(0));

        let offer = roster.find_earliest(&open_request(UnitTarget::OfType(WORKER)), Tick(4)).unwrap();
        assert_eq!(offer.unit, UnitId(3));
        assert_eq!(offer.start, Tick(4));
    }

    #[test]
    fn earlier_unit_beats_lower_id() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick(30));
        roster.add_unit(UnitId(2), WORKER, Tick(10));

        let offer = roster.find_earliest(&open_request(UnitTarget::OfType(WORKER)), Tick(0)).unwrap();
        assert_eq!((offer.unit, offer.start), (UnitId(2), Tick(10)));
    }

    #[test]
    fn unknown_type_or_instance_has_no_offer() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick(0));
        assert!(roster.find_earliest(&open_request(UnitTarget::OfType(FACTORY)), Tick(0)).is_none());
        assert!(roster.find_earliest(&open_request(UnitTarget::Instance(UnitId(2))), Tick(0)).is_none());
    }

    #[test]
    fn timed_booking_fits_in_a_gap() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick(0));
        let worker = UnitTarget::Instance(UnitId(1));

        let first = roster.find_earliest(&timed_request(worker, 10), Tick(0)).unwrap();
        roster.reserve(&timed_request(worker, 10), first);
        let second = roster.find_earliest(&timed_request(worker, 10), Tick(25)).unwrap();
        roster.reserve(&timed_request(worker, 10), second);
        assert_eq!(roster.busy_intervals(UnitId(1)), &[(Tick(0), Tick(10)), (Tick(25), Tick(35))]);

        // 15 ticks fit between 10 and 25; 16 do not.
        assert_eq!(roster.find_earliest(&timed_request(worker, 15), Tick(0)).unwrap().start, Tick(10));
        assert_eq!(roster.find_earliest(&timed_request(worker, 16), Tick(0)).unwrap().start, Tick(35));
    }

    #[test]
    fn open_ended_request_waits_for_the_last_booking() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick(0));
        let worker = UnitTarget::Instance(UnitId(1));

        let offer = roster.find_earliest(&timed_request(worker, 10), Tick(40)).unwrap();
        roster.reserve(&timed_request(worker, 10), offer);
        assert_eq!(roster.find_earliest(&open_request(worker), Tick(0)).unwrap().start, Tick(50));
    }

    #[test]
    fn open_ended_booking_blocks_the_unit_for_good() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick(0));
        let worker = UnitTarget::Instance(UnitId(1));

        let offer = roster.find_earliest(&open_request(worker), Tick(20)).unwrap();
        let reservation = roster.reserve(&open_request(worker), offer);
        assert_eq!(reservation.end, Tick::NEVER);

        assert_eq!(roster.find_earliest(&timed_request(worker, 20), Tick(0)).unwrap().start, Tick(0));
        assert!(roster.find_earliest(&timed_request(worker, 21), Tick(0)).is_none());

        roster.release(&reservation);
        assert!(roster.busy_intervals(UnitId(1)).is_empty());
    }

    #[test]
    fn unready_unit_is_never_offered() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), WORKER, Tick::NEVER);
        assert!(roster.find_earliest(&open_request(UnitTarget::OfType(WORKER)), Tick(0)).is_none());

        assert!(roster.set_ready_at(UnitId(1), Tick(8)));
        assert!(!roster.set_ready_at(UnitId(2), Tick(8)));
        let offer = roster.find_earliest(&open_request(UnitTarget::OfType(WORKER)), Tick(0)).unwrap();
        assert_eq!(offer.start, Tick(8));
    }

    #[test]
    fn remove_unit_reports_its_type() {
        let mut roster = UnitRoster::new();
        roster.add_unit(UnitId(1), FACTORY, Tick(0));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.remove_unit(UnitId(1)), Some(FACTORY));
        assert_eq!(roster.remove_unit(UnitId(1)), None);
        assert!(roster.is_empty());
    }
}

// ── UnitRequirement ───────────────────────────────────────────────────────────

#[cfg(test)]
mod unit_requirement_tests {
    use super::*;

    #[test]
    fn builder_fills_in_the_request() {
        let req = UnitRequirement::of_type(WORKER)
            .with_duration(40)
            .with_route(Position::new(0, 0), Position::new(12, -3));
        let request = req.request();
        assert_eq!(request.target, UnitTarget::OfType(WORKER));
        assert_eq!(request.duration, Some(40));
        assert_eq!(request.route.unwrap().to, Position::new(12, -3));
        assert!(!req.is_reserved());
        assert_eq!(req.chosen_unit(), None);
    }

    #[test]
    fn never_resolves_before_the_floor() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(0));
        let mut req = UnitRequirement::of_type(WORKER);

        assert_eq!(req.earliest_time(&h.ctx()), Tick(0));
        assert_eq!(req.reserve_earliest_time(&mut h.ctx(), Tick(17)), Tick(17));
        assert_eq!(req.chosen_unit(), Some(UnitId(1)));
        assert_eq!(h.roster.busy_intervals(UnitId(1)), &[(Tick(17), Tick::NEVER)]);
    }

    #[test]
    fn no_candidate_resolves_to_never_and_holds_nothing() {
        let mut h = Harness::empty();
        let mut req = UnitRequirement::instance(UnitId(5));
        assert_eq!(req.earliest_time(&h.ctx()), Tick::NEVER);
        assert_eq!(req.reserve_earliest_time(&mut h.ctx(), Tick(0)), Tick::NEVER);
        assert!(!req.is_reserved());
    }

    #[test]
    fn reserve_time_books_exactly_the_given_tick_or_nothing() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(20));
        let mut req = UnitRequirement::of_type(WORKER).with_duration(5);

        req.reserve_time(&mut h.ctx(), Tick(3));
        assert!(!req.is_reserved());
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());

        req.reserve_time(&mut h.ctx(), Tick(20));
        assert_eq!(req.reservation().map(|r| r.start), Some(Tick(20)));
        assert_eq!(h.roster.busy_intervals(UnitId(1)), &[(Tick(20), Tick(25))]);

        // A failed re-booking also gives up the previous unit.
        req.reserve_time(&mut h.ctx(), Tick(19));
        assert!(!req.is_reserved());
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());
    }

    #[test]
    fn re_resolving_releases_the_previous_unit() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(0));
        let mut req = UnitRequirement::of_type(WORKER).with_duration(10);

        req.reserve_earliest_time(&mut h.ctx(), Tick(5));
        req.reserve_earliest_time(&mut h.ctx(), Tick(30));
        assert_eq!(h.roster.busy_intervals(UnitId(1)), &[(Tick(30), Tick(40))]);

        req.free_reserved(&mut h.ctx());
        req.free_reserved(&mut h.ctx());
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_tests {
    use super::*;

    #[test]
    fn unit_readiness_pushes_resources_later() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(15));

        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12);
        task.set_unit_requirement(UnitRequirement::of_type(WORKER));

        assert_eq!(task.update_time(&mut h.ctx()), Tick(15));
        assert_eq!(task.earliest_time(), Tick(15));
        assert_eq!(task.assigned_unit(), Some(UnitId(1)));
        assert_eq!(h.primary_entries(), vec![(15, 12)]);
        assert_eq!(h.roster.busy_intervals(UnitId(1)), &[(Tick(15), Tick::NEVER)]);

        task.release(&mut h.ctx());
    }

    #[test]
    fn resources_set_the_floor_for_the_unit() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(5));

        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12);
        task.set_unit_requirement(UnitRequirement::of_type(WORKER).with_duration(8));

        assert_eq!(task.update_time(&mut h.ctx()), Tick(12));
        assert_eq!(h.roster.busy_intervals(UnitId(1)), &[(Tick(12), Tick(20))]);
        task.release(&mut h.ctx());
    }

    #[test]
    fn no_requirements_resolves_to_now() {
        let mut h = Harness::empty();
        let mut task = Task::new(TaskId(1));
        assert_eq!(task.update_time(&mut h.ctx()), Tick::ZERO);
        assert!(!task.holds_reservations());
        task.release(&mut h.ctx());
        assert!(h.observer.destroyed.is_empty());
    }

    #[test]
    fn affordable_now_goes_to_the_immediate_reservation() {
        let mut h = Harness::new(Snapshot { primary: 100.0, ..Snapshot::default() });
        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 50);

        assert_eq!(task.update_time(&mut h.ctx()), Tick::ZERO);
        assert_eq!(h.resources.immediate_reservation(ResourceKind::Primary), 50);
        assert!(h.primary_entries().is_empty());

        task.release(&mut h.ctx());
        assert_eq!(h.resources.immediate_reservation(ResourceKind::Primary), 0);
    }

    #[test]
    fn infeasible_resource_commits_nothing() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(0));

        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12);
        task.add_requirement(ResourceKind::Secondary, 10);
        task.set_unit_requirement(UnitRequirement::of_type(WORKER));

        assert_eq!(task.update_time(&mut h.ctx()), Tick::NEVER);
        assert!(!task.holds_reservations());
        assert_eq!(task.assigned_unit(), None);
        assert!(h.primary_entries().is_empty());
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());
    }

    #[test]
    fn missing_unit_commits_nothing() {
        let mut h = Harness::empty();
        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12);
        task.set_unit_requirement(UnitRequirement::of_type(FACTORY));

        assert_eq!(task.update_time(&mut h.ctx()), Tick::NEVER);
        assert!(!task.holds_reservations());
        assert!(h.primary_entries().is_empty());
    }

    #[test]
    fn repeated_updates_do_not_double_count() {
        let mut h = Harness::empty();
        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12);

        for _ in 0..3 {
            h.resources.refresh(&Snapshot::default());
            assert_eq!(task.update_time(&mut h.ctx()), Tick(12));
        }
        assert_eq!(h.primary_entries(), vec![(12, 12)]);
        task.release(&mut h.ctx());
    }

    #[test]
    fn committed_tasks_queue_behind_each_other() {
        let mut h = Harness::empty();
        let mut first = Task::new(TaskId(1));
        first.add_requirement(ResourceKind::Primary, 12);
        let mut second = Task::new(TaskId(2));
        second.add_requirement(ResourceKind::Primary, 12);

        assert_eq!(first.update_time(&mut h.ctx()), Tick(12));
        assert_eq!(second.update_time(&mut h.ctx()), Tick(24));
        assert_eq!(h.primary_entries(), vec![(12, 12), (24, 12)]);

        // Releasing the first lets the second move up on its next update.
        first.release(&mut h.ctx());
        assert_eq!(second.update_time(&mut h.ctx()), Tick(12));
        second.release(&mut h.ctx());
        assert!(h.primary_entries().is_empty());
    }

    #[test]
    fn release_notifies_observer_for_future_tasks() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(0));

        let mut task = Task::new(TaskId(7));
        task.add_requirement(ResourceKind::Primary, 12);
        task.set_unit_requirement(UnitRequirement::of_type(WORKER).with_duration(5));
        task.update_time(&mut h.ctx());
        task.release(&mut h.ctx());

        assert_eq!(h.observer.destroyed, vec![(TaskId(7), Tick(12))]);
        assert!(h.primary_entries().is_empty());
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());
    }

    #[test]
    fn release_is_silent_for_immediate_and_infeasible_tasks() {
        let mut h = Harness::new(Snapshot { primary: 100.0, ..Snapshot::default() });

        let mut now = Task::new(TaskId(1));
        now.add_requirement(ResourceKind::Primary, 10);
        now.update_time(&mut h.ctx());
        now.release(&mut h.ctx());

        let mut never = Task::new(TaskId(2));
        never.add_requirement(ResourceKind::Secondary, 10);
        never.update_time(&mut h.ctx());
        never.release(&mut h.ctx());

        let unresolved = Task::new(TaskId(3));
        unresolved.release(&mut h.ctx());

        assert!(h.observer.destroyed.is_empty());
    }

    #[test]
    fn setting_a_second_unit_requirement_replaces_the_first() {
        let mut h = Harness::empty();
        h.roster.add_unit(UnitId(1), WORKER, Tick(0));
        h.roster.add_unit(UnitId(2), FACTORY, Tick(3));

        let mut task = Task::new(TaskId(1));
        task.set_unit_requirement(UnitRequirement::of_type(WORKER));
        task.set_unit_requirement(UnitRequirement::instance(UnitId(2)));
        assert_eq!(task.unit_requirement().unwrap().request().target, UnitTarget::Instance(UnitId(2)));

        assert_eq!(task.update_time(&mut h.ctx()), Tick(3));
        assert_eq!(task.assigned_unit(), Some(UnitId(2)));
        assert!(h.roster.busy_intervals(UnitId(1)).is_empty());
        task.release(&mut h.ctx());
    }

    #[test]
    fn free_all_keeps_the_task_reusable() {
        let mut h = Harness::new(Snapshot { secondary: 5.0, ..Snapshot::default() });
        let mut task = Task::new(TaskId(1));
        task.add_requirement(ResourceKind::Primary, 12).add_requirement(ResourceKind::Secondary, 3);
        task.update_time(&mut h.ctx());
        assert!(task.holds_reservations());
        assert_eq!(h.primary_entries(), vec![(12, 12)]);
        assert_eq!(h.resources.slot(ResourceKind::Secondary).task_timeline().amount_at(Tick(12)), Some(3));

        task.free_all(&mut h.ctx());
        assert!(!task.holds_reservations());
        assert!(h.primary_entries().is_empty());
        assert!(h.resources.slot(ResourceKind::Secondary).task_timeline().is_empty());
        assert_eq!(task.requirements().len(), 2);
        task.release(&mut h.ctx());
    }
}
