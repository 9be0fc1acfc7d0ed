//! `rv-ledger`: the resource manager that owns every pool's timelines.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`slot`]      | `ResourceSlot`: balance, immediate reservation, rate, timelines |
//! | [`manager`]   | `ResourceManager`: reserve/free/query, capacity outputs, refresh |
//! | [`snapshot`]  | `SnapshotProvider` trait, `Snapshot`, `PendingProducer`         |
//!
//! # Cycle model (summary)
//!
//! ```text
//! once per control cycle:
//!   ① refresh(snapshot) : copy balances/rates, rebuild the capacity pool's
//!                          implicit timeline from in-progress producers
//!   ② queries           : earliest_availability / available_at_time
//!   ③ commits           : reserve_task / free_task from requirements
//! ```
//!
//! Task reservations live in each slot's *task* timeline and persist across
//! cycles until freed.  The *implicit* timeline is rebuilt from scratch on
//! every refresh.  Queries see both merged.

pub mod manager;
pub mod slot;
pub mod snapshot;


pub use manager::ResourceManager;
pub use slot::ResourceSlot;
pub use snapshot::{PendingProducer, Snapshot, SnapshotProvider};
