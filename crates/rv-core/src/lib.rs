//! `rv-core`: foundational types for the reservation engine.
//!
//! This crate is a dependency of every other `rv-*` crate.  It has no `rv-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`time`]        | `Tick` (with the `Tick::NEVER` sentinel), `Amount`    |
//! | [`ids`]         | `UnitId`, `UnitTypeId`, `TaskId`                      |
//! | [`resource`]    | `ResourceKind`, `Position`                            |
//! | [`config`]      | `LedgerConfig`                                        |
//! | [`error`]       | `ReserveError`, `ReserveResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all plain-data types.    |

pub mod config;
pub mod error;
pub mod ids;
pub mod resource;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::LedgerConfig;
pub use error::{ReserveError, ReserveResult};
pub use ids::{TaskId, UnitId, UnitTypeId};
pub use resource::{Position, ResourceKind};
pub use time::{Amount, Tick};
