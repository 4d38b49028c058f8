//! Polled, debounced mute pushbutton.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The adapter turns
//! the pin level into "held down" before it reaches this driver.
//!
//! ## State machine
//!
//! | State        | Input held                    | Input released |
//! |--------------|-------------------------------|----------------|
//! | `Idle`       | → `Debouncing { since }`      | stay           |
//! | `Debouncing` | ≥ debounce → `Confirmed`, **press** | → `Idle` |
//! | `Confirmed`  | stay                          | → `Idle`       |
//!
//! A press is reported exactly once per physical press, no matter how long
//! the button stays down.  Contact bounce shorter than the debounce time
//! drops back to `Idle` and never reports.

use crate::timing::{TimeTick, elapsed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Debouncing { since: TimeTick },
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct DebouncedButton {
    debounce_ms: u32,
    state: PressState,
}

impl DebouncedButton {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            state: PressState::Idle,
        }
    }

    /// Feed one raw sample; returns `true` on the sample that confirms a
    /// new press.
    pub fn update(&mut self, held: bool, now: TimeTick) -> bool {
        if !held {
            self.state = PressState::Idle;
            return false;
        }

        match self.state {
            PressState::Idle => {
                self.state = PressState::Debouncing { since: now };
                false
            }
            PressState::Debouncing { since } => {
                if elapsed(now, since) >= self.debounce_ms {
                    self.state = PressState::Confirmed;
                    true
                } else {
                    false
                }
            }
            PressState::Confirmed => false,
        }
    }

    /// `true` while a confirmed press is being held.
    pub fn is_held(&self) -> bool {
        self.state == PressState::Confirmed
    }

    pub fn set_debounce(&mut self, debounce_ms: u32) {
        self.debounce_ms = debounce_ms;
    }
}
