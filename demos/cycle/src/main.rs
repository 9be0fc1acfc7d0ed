//! cycle: a toy host driving the reservation engine.
//!
//! A single base with one producer and four gatherers works through a short
//! build order.  Every control cycle the host advances its own state, hands a
//! snapshot to the ledger, and re-resolves every queued task.  Tasks that
//! resolve to "now" are started and released.
//!
//! ```text
//! cargo run -p cycle -- [ledger.json]
//! RUST_LOG=debug cargo run -p cycle
//! ```

use std::fs;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rv_core::config::{GATHERER_RATE_PER_TICK, STARTING_GATHERERS};
use rv_core::{Amount, LedgerConfig, ResourceKind, TaskId, Tick, UnitId, UnitTypeId};
use rv_ledger::{PendingProducer, ResourceManager, Snapshot};
use rv_task::{NoopObserver, PlanContext, Task, UnitRequirement, UnitRoster};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64 = 7;
const CYCLES:        u32 = 400;
const NEXUS:         UnitTypeId = UnitTypeId(0);
const GATHERER:      UnitTypeId = UnitTypeId(1);
const NEXUS_ID:      UnitId = UnitId(0);

const GATHERER_COST: Amount = 50;
const GATHERER_TIME: i64    = 17;
const DEPOT_COST:    Amount = 100;
const DEPOT_TIME:    i64    = 40;
const DEPOT_SUPPLY:  Amount = 8;

// ── Build order ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Order {
    Gatherer,
    Depot,
}

const BUILD_ORDER: [Order; 8] = [
    Order::Gatherer,
    Order::Gatherer,
    Order::Depot,
    Order::Gatherer,
    Order::Gatherer,
    Order::Gatherer,
    Order::Depot,
    Order::Gatherer,
];

/// A queued order and the permanent capacity output it has announced.
struct Planned {
    order:  Order,
    task:   Task,
    output: Option<Tick>,
}

impl Planned {
    fn new(id: u32, order: Order) -> Self {
        let mut task = Task::new(TaskId(id));
        match order {
            Order::Gatherer => {
                task.add_requirement(ResourceKind::Primary, GATHERER_COST)
                    .add_requirement(ResourceKind::Capacity, 1)
                    .set_unit_requirement(UnitRequirement::instance(NEXUS_ID).with_duration(GATHERER_TIME));
            }
            Order::Depot => {
                task.add_requirement(ResourceKind::Primary, DEPOT_COST)
                    .set_unit_requirement(UnitRequirement::of_type(GATHERER).with_duration(DEPOT_TIME));
            }
        }
        Self { order, task, output: None }
    }

    fn retract_output(&mut self, resources: &mut ResourceManager) {
        if let Some(at) = self.output.take() {
            resources.remove_capacity_output(at, DEPOT_SUPPLY, false);
        }
    }
}

// ── Host state ────────────────────────────────────────────────────────────────

/// Everything the host knows in absolute ticks.
struct Host {
    now:          i64,
    primary:      f64,
    gatherers:    u32,
    next_unit:    u32,
    supply_used:  Amount,
    supply_total: Amount,
    /// (completes at, supply provided)
    depots:       Vec<(i64, Amount)>,
    /// Completion ticks of gatherers in production.
    training:     Vec<i64>,
    /// Absolute tick each unit is busy until.
    busy_until:   Vec<(UnitId, i64)>,
}

impl Host {
    fn new() -> Self {
        Self {
            now:          0,
            primary:      50.0,
            gatherers:    STARTING_GATHERERS,
            next_unit:    1,
            supply_used:  STARTING_GATHERERS as Amount,
            supply_total: 10,
            depots:       Vec::new(),
            training:     Vec::new(),
            busy_until:   Vec::new(),
        }
    }

    /// Advance `ticks`, with ±10 % noise on income.
    fn advance(&mut self, ticks: i64, rng: &mut SmallRng, roster: &mut UnitRoster) {
        self.now += ticks;
        let income = self.gatherers as f64 * GATHERER_RATE_PER_TICK * ticks as f64;
        self.primary += income * rng.gen_range(0.9..1.1);

        let now = self.now;
        let finished = self.training.iter().filter(|&&t| t <= now).count();
        self.training.retain(|&t| t > now);
        for _ in 0..finished {
            let unit = UnitId(self.next_unit);
            self.next_unit += 1;
            self.gatherers += 1;
            roster.add_unit(unit, GATHERER, Tick::ZERO);
            info!(%unit, gatherers = self.gatherers, "gatherer ready");
        }

        for &(_, provides) in self.depots.iter().filter(|(t, _)| *t <= now) {
            self.supply_total += provides;
            info!(supply_total = self.supply_total, "depot complete");
        }
        self.depots.retain(|(t, _)| *t > now);

        for &(unit, until) in &self.busy_until {
            roster.set_ready_at(unit, Tick((until - now).max(0)));
        }
        self.busy_until.retain(|(_, until)| *until > now);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            primary:           self.primary,
            capacity_used:     self.supply_used,
            capacity_total:    self.supply_total,
            primary_rate:      Some(self.gatherers as f64 * GATHERER_RATE_PER_TICK),
            pending_producers: self
                .depots
                .iter()
                .map(|&(at, provides)| PendingProducer { completes_in: Tick(at - self.now), provides })
                .collect(),
            ..Snapshot::default()
        }
    }

    fn start(&mut self, order: Order, unit: Option<UnitId>) {
        let (cost, busy_for) = match order {
            Order::Gatherer => (GATHERER_COST, GATHERER_TIME),
            Order::Depot    => (DEPOT_COST, DEPOT_TIME),
        };
        self.primary -= cost as f64;
        match order {
            Order::Gatherer => {
                self.supply_used += 1;
                self.training.push(self.now + GATHERER_TIME);
            }
            Order::Depot => self.depots.push((self.now + DEPOT_TIME, DEPOT_SUPPLY)),
        }
        if let Some(unit) = unit {
            self.busy_until.push((unit, self.now + busy_for));
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<LedgerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(LedgerConfig::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: LedgerConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(config)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    let interval = config.refresh_interval_ticks as i64;
    info!(?config, "starting");

    let mut resources = ResourceManager::new(config)?;
    let mut roster = UnitRoster::new();
    let mut observer = NoopObserver;
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut host = Host::new();

    roster.add_unit(NEXUS_ID, NEXUS, Tick::ZERO);
    for _ in 0..STARTING_GATHERERS {
        roster.add_unit(UnitId(host.next_unit), GATHERER, Tick::ZERO);
        host.next_unit += 1;
    }

    let mut queue: Vec<Planned> = BUILD_ORDER
        .iter()
        .enumerate()
        .map(|(i, &order)| Planned::new(i as u32, order))
        .collect();

    for cycle in 0..CYCLES {
        if queue.is_empty() {
            info!(cycle, tick = host.now, "build order complete");
            break;
        }
        host.advance(interval, &mut rng, &mut roster);
        resources.refresh(&host.snapshot());

        let mut started = Vec::new();
        for (i, planned) in queue.iter_mut().enumerate() {
            planned.retract_output(&mut resources);

            let mut ctx = PlanContext::new(&mut resources, &mut roster, &mut observer);
            let at = planned.task.update_time(&mut ctx);

            if at.is_immediate() {
                started.push(i);
            } else if planned.order == Order::Depot && !at.is_never() {
                let done = at.offset(DEPOT_TIME);
                resources.add_capacity_output(done, DEPOT_SUPPLY, false);
                planned.output = Some(done);
            }
        }

        for i in started.into_iter().rev() {
            let planned = queue.remove(i);
            let unit = planned.task.assigned_unit();
            info!(cycle, tick = host.now, order = ?planned.order, unit = ?unit, "starting");
            planned.task.release(&mut PlanContext::new(&mut resources, &mut roster, &mut observer));
            host.start(planned.order, unit);
        }
    }

    info!(
        tick         = host.now,
        gatherers    = host.gatherers,
        supply_used  = host.supply_used,
        supply_total = host.supply_total,
        remaining    = queue.len(),
        "done"
    );
    Ok(())
}
