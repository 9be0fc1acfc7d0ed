//! Availability simulation over one pool's timeline.
//!
//! Both functions walk the timeline in tick order.  Between entries the
//! balance accrues continuously at `rate`; each entry's amount lands exactly
//! at its tick.

use rv_core::{Amount, Tick};

use crate::ResourceTimeline;

/// Earliest tick at which `required` can be committed and stay committed
/// through every later known event.
///
/// `free` is the balance available at tick 0 (already net of immediate
/// reservations).  Once the timeline is exhausted the rate is assumed to
/// continue forever.  Returns [`Tick::NEVER`] when `rate ≤ 0` and no event
/// ever frees enough.
///
/// A commitment that becomes feasible but is later squeezed below zero by a
/// bigger draw does not count: the scan withdraws it and keeps looking for
/// the next point from which it holds continuously.
pub fn earliest_availability(
    required: Amount,
    free:     f64,
    rate:     f64,
    timeline: &ResourceTimeline,
) -> Tick {
    let required = required as f64;
    let mut free = free;

    // While committed, `free` is the balance left after taking `required`.
    let mut committed = free >= required;
    if committed {
        free -= required;
    }

    let mut earliest  = Tick::ZERO;
    let mut last_time = Tick::ZERO;

    for timing in timeline {
        let previous_free = free;

        free += (timing.time - last_time) as f64 * rate;
        free -= timing.amount as f64;

        if !committed {
            if free >= required {
                earliest = if rate > 0.0 {
                    // Accrual alone may close the gap before this entry lands.
                    let closed_at = last_time + ticks_to_accrue(required - previous_free, rate);
                    closed_at.min(timing.time)
                } else {
                    timing.time
                };
                free -= required;
                committed = true;
            }
        } else if free < 0.0 {
            committed = false;
            free += required;
        }

        last_time = timing.time;
    }

    if !committed {
        if rate <= 0.0 {
            return Tick::NEVER;
        }
        earliest = last_time + ticks_to_accrue(required - free, rate);
    }

    earliest
}

/// Projected free balance at `time`, truncated toward zero.
///
/// Applies every entry with `entry.time ≤ time`, then accrues the remaining
/// ticks.  Pure point query: no commitment bookkeeping.
pub fn availability_at_time(
    time:     Tick,
    free:     f64,
    rate:     f64,
    timeline: &ResourceTimeline,
) -> Amount {
    let mut free = free;
    let mut last_time = Tick::ZERO;

    for timing in timeline {
        if timing.time > time {
            break;
        }
        free += (timing.time - last_time) as f64 * rate;
        free -= timing.amount as f64;
        last_time = timing.time;
    }

    if time > last_time {
        free += (time - last_time) as f64 * rate;
    }

    free as Amount
}

/// Whole ticks needed for `rate` to accrue `deficit`.  `rate` must be > 0.
#[inline]
fn ticks_to_accrue(deficit: f64, rate: f64) -> i64 {
    (deficit / rate).ceil() as i64
}
