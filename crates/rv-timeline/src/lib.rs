//! `rv-timeline`: per-pool timelines of pending balance deltas and the
//! simulation that answers availability questions against them.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`timeline`]     | `ResourceTiming`, `ResourceTimeline` (sorted, merge-on-equal-tick) |
//! | [`availability`] | `earliest_availability`, `availability_at_time`            |
//!
//! # Balance model (summary)
//!
//! A pool starts at a free balance `F` at tick 0 and accrues `rate` per tick.
//! Each timeline entry lands exactly at its tick:
//!
//! ```text
//! balance(t) = F + rate * t - Σ amount(e)   for every entry e with e.time ≤ t
//! ```
//!
//! Positive amounts are future consumption, negative amounts future
//! production.  `earliest_availability` finds the first tick from which a
//! commitment of `R` keeps `balance - R ≥ 0` at every later known event.

pub mod availability;
pub mod timeline;


pub use availability::{availability_at_time, earliest_availability};
pub use timeline::{ResourceTimeline, ResourceTiming};
