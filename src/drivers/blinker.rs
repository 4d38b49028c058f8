//! Square-wave output patterns for the indicator lamp and the buzzer.
//!
//! | Output    | Inactive     | Active                                  |
//! |-----------|--------------|-----------------------------------------|
//! | Indicator | steady on    | 150 ms on / 150 ms off, starting on     |
//! | Buzzer    | off          | 50 ms off / 50 ms on, starting off      |
//!
//! The steady indicator doubles as a "system alive" light.  Both patterns
//! are driven by the control loop's tick, so they never block.

use crate::timing::{TimeTick, elapsed};

/// Toggling output with a fixed idle level.
#[derive(Debug, Clone)]
pub struct Blinker {
    idle_level: bool,
    half_period_ms: u32,
    level: bool,
    last_toggle: TimeTick,
}

impl Blinker {
    pub const fn new(idle_level: bool, half_period_ms: u32) -> Self {
        Self {
            idle_level,
            half_period_ms,
            level: idle_level,
            last_toggle: 0,
        }
    }

    /// Visual alarm indicator: lit when idle.
    pub const fn indicator(flash_ms: u32) -> Self {
        Self::new(true, flash_ms)
    }

    /// Audible alarm: silent when idle.
    pub const fn buzzer(pulse_ms: u32) -> Self {
        Self::new(false, pulse_ms)
    }

    /// Advance the pattern and return the level to drive.
    pub fn update(&mut self, active: bool, now: TimeTick) -> bool {
        if !active {
            self.level = self.idle_level;
            self.last_toggle = now;
        } else if elapsed(now, self.last_toggle) >= self.half_period_ms {
            self.level = !self.level;
            self.last_toggle = now;
        }
        self.level
    }

    pub fn level(&self) -> bool {
        self.level
    }

    pub fn set_half_period(&mut self, half_period_ms: u32) {
        self.half_period_ms = half_period_ms;
    }
}
