//! Wraparound-safe tick arithmetic and the non-blocking interval gate.
//!
//! The millisecond counter wraps after ~49.7 days.  Every "has enough time
//! passed" check in the firmware goes through [`elapsed`] so that timers keep
//! working across the wrap boundary instead of stalling for another 49 days.

/// Milliseconds since an arbitrary epoch (boot).  Wraps at `u32::MAX`.
pub type TimeTick = u32;

/// Ticks elapsed from `last` to `current`, tolerating one counter wrap.
///
/// `current >= last` yields `current - last`; otherwise the counter wrapped
/// and the result is `(2^32 - last) + current`.
#[inline]
pub const fn elapsed(current: TimeTick, last: TimeTick) -> TimeTick {
    current.wrapping_sub(last)
}

/// Self-rearming periodic timer.
///
/// The first [`tick`](Self::tick) after construction or [`reset`](Self::reset)
/// latches the start time and reports "still waiting".  Each later call
/// compares the elapsed time with the interval; once it is reached the gate
/// reports completion exactly once and re-latches for the next period.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalGate {
    started_at: Option<TimeTick>,
}

impl IntervalGate {
    pub const fn new() -> Self {
        Self { started_at: None }
    }

    /// Returns `true` while the interval is still running, `false` on the
    /// call where it completes.
    pub fn tick(&mut self, now: TimeTick, interval_ms: u32) -> bool {
        let Some(start) = self.started_at else {
            self.started_at = Some(now);
            return true;
        };

        if elapsed(now, start) < interval_ms {
            return true;
        }

        self.started_at = Some(now);
        false
    }

    /// Convenience inverse of [`tick`](Self::tick).
    pub fn fired(&mut self, now: TimeTick, interval_ms: u32) -> bool {
        !self.tick(now, interval_ms)
    }

    /// Forget the latched start; the next tick starts a fresh interval.
    pub fn reset(&mut self) {
        self.started_at = None;
    }
}
