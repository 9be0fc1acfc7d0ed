//! Resource pools and positions shared across the ledger and task crates.

use std::str::FromStr;

use crate::ReserveError;

/// The three pools the ledger tracks.
///
/// `Primary` and `Secondary` are depletable pools that accrue continuously at
/// a measured rate.  `Capacity` never accrues; it changes only through
/// discrete completion events (a producer finishing raises it).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResourceKind {
    Primary,
    Secondary,
    Capacity,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Primary,
        ResourceKind::Secondary,
        ResourceKind::Capacity,
    ];

    /// Dense index into per-pool arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ResourceKind::Primary   => 0,
            ResourceKind::Secondary => 1,
            ResourceKind::Capacity  => 2,
        }
    }

    /// `true` for pools whose balance accrues at a continuous rate.
    #[inline]
    pub fn accrues(self) -> bool {
        !matches!(self, ResourceKind::Capacity)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Primary   => "primary",
            ResourceKind::Secondary => "secondary",
            ResourceKind::Capacity  => "capacity",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ReserveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary"   => Ok(ResourceKind::Primary),
            "secondary" => Ok(ResourceKind::Secondary),
            "capacity"  => Ok(ResourceKind::Capacity),
            other => Err(ReserveError::Parse(format!(
                "invalid resource kind {other:?}: expected \"primary\", \"secondary\", or \"capacity\""
            ))),
        }
    }
}

/// A world position in the host's integer coordinate space.
///
/// The engine never reasons about positions; they are carried on unit
/// requirements so the unit allocator can take travel into account.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
