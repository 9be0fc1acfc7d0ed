//! `rv-task`: requirements and the tasks that bundle them.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                         |
//! |-----------------|------------------------------------------------------------------|
//! | [`requirement`] | `Requirement` trait, `ResourceRequirement`                       |
//! | [`unit`]        | `UnitRequirement`, `UnitRequest`, `UnitAllocator` trait          |
//! | [`roster`]      | `UnitRoster`: in-process `UnitAllocator` over busy intervals     |
//! | [`context`]     | `PlanContext<'a>`: borrowed ledger, allocator, and observer      |
//! | [`observer`]    | `TaskObserver` trait, `NoopObserver`                             |
//! | [`task`]        | `Task`: resolves and commits all requirements together           |
//!
//! # Resolution (summary)
//!
//! ```text
//! Task::update_time:
//!   ① free whatever the task still holds from the previous cycle
//!   ② t = max(earliest_time of every resource requirement)
//!   ③ if t is finite and a unit is required: t = unit.reserve_earliest_time(t)
//!   ④ if t is finite: reserve every resource requirement at t
//! ```
//!
//! Requirements never own the ledger.  They borrow it through a
//! [`PlanContext`] for the duration of one call and must be released
//! explicitly with [`Task::release`].

pub mod context;
pub mod observer;
pub mod requirement;
pub mod roster;
pub mod task;
pub mod unit;

#[cfg(test)]
mod tests;

pub use context::PlanContext;
pub use observer::{NoopObserver, TaskObserver};
pub use requirement::{Requirement, ResourceRequirement};
pub use roster::UnitRoster;
pub use task::Task;
pub use unit::{Route, UnitAllocator, UnitOffer, UnitRequest, UnitRequirement, UnitReservation, UnitTarget};
