//! Error type shared by the `rv-*` crates.
//!
//! Infeasibility is never an error: availability queries answer
//! [`Tick::NEVER`][crate::Tick::NEVER] instead.  Errors only arise at the
//! edges, when configuration or textual input is rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `rv-*` crates.
pub type ReserveResult<T> = Result<T, ReserveError>;
