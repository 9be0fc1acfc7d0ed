//! `ResourceTimeline`: sparse, tick-ordered ledger of pending balance deltas.
//!
//! # Invariant
//!
//! Entries are sorted strictly ascending by `time` and every tick appears at
//! most once.  Writing to a tick that already has an entry accumulates into
//! it instead of creating a duplicate.
//!
//! # Performance note
//!
//! A sorted `Vec` gives O(log n) lookup and O(n) shift on insert.  Timelines
//! hold tens of entries (one per pending completion or reservation tick), so
//! the shift is cheaper than a `BTreeMap` node walk and iteration stays a
//! flat slice scan for the availability simulation.

use rv_core::{Amount, Tick};

/// One pending balance change: `amount` lands at `time`.
///
/// A positive amount is future consumption; a negative amount is future
/// production or release.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceTiming {
    pub time:   Tick,
    pub amount: Amount,
}

impl ResourceTiming {
    #[inline]
    pub fn new(time: Tick, amount: Amount) -> Self {
        Self { time, amount }
    }
}

/// Ordered, tick-keyed sequence of [`ResourceTiming`]s for one pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceTimeline {
    entries: Vec<ResourceTiming>,
}

impl ResourceTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` at `time`.
    ///
    /// Accumulates into an existing entry at the same tick, otherwise inserts
    /// a new entry in order.  An entry that accumulates to zero is kept; use
    /// [`remove`][Self::remove] to take a recorded delta back out.
    pub fn insert(&mut self, time: Tick, delta: Amount) {
        match self.search(time) {
            Ok(i)  => self.entries[i].amount += delta,
            Err(i) => self.entries.insert(i, ResourceTiming::new(time, delta)),
        }
    }

    /// Accumulate `delta` into the entry recorded at `time`, dropping it when
    /// it reaches zero.
    ///
    /// # Panics
    ///
    /// Panics if no entry exists at `time`.  Callers may only take back what
    /// they previously recorded.
    pub fn remove(&mut self, time: Tick, delta: Amount) {
        let Ok(i) = self.search(time) else {
            panic!("no timeline entry recorded at {time} (delta {delta})");
        };
        self.entries[i].amount += delta;
        if self.entries[i].amount == 0 {
            self.entries.remove(i);
        }
    }

    /// Drop every entry.  Used to rebuild per-cycle projections.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The amount recorded at exactly `time`, if any.
    pub fn amount_at(&self, time: Tick) -> Option<Amount> {
        self.search(time).ok().map(|i| self.entries[i].amount)
    }

    /// Merge two timelines into a new one; equal ticks are summed.
    pub fn merged(&self, other: &ResourceTimeline) -> ResourceTimeline {
        let (a, b) = (&self.entries, &other.entries);
        let mut entries = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].time.cmp(&b[j].time) {
                std::cmp::Ordering::Less => {
                    entries.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    entries.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    entries.push(ResourceTiming::new(a[i].time, a[i].amount + b[j].amount));
                    i += 1;
                    j += 1;
                }
            }
        }
        entries.extend_from_slice(&a[i..]);
        entries.extend_from_slice(&b[j..]);
        ResourceTimeline { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceTiming> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ResourceTiming] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn search(&self, time: Tick) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&time, |e| e.time)
    }
}

impl<'a> IntoIterator for &'a ResourceTimeline {
    type Item     = &'a ResourceTiming;
    type IntoIter = std::slice::Iter<'a, ResourceTiming>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(Tick, Amount)> for ResourceTimeline {
    /// Build by repeated [`insert`][ResourceTimeline::insert]; input order
    /// does not matter.
    fn from_iter<I: IntoIterator<Item = (Tick, Amount)>>(iter: I) -> Self {
        let mut timeline = ResourceTimeline::new();
        for (time, amount) in iter {
            timeline.insert(time, amount);
        }
        timeline
    }
}
