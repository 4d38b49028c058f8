//! Servo "analog meter" dial.
//!
//! A hobby servo swings a needle across a printed face showing either
//! temperature (40–120 °F) or relative humidity (0–100 %).  The face is
//! mounted so that the highest reading sits at the servo's low end:
//!
//! ```text
//!   value  lo ──────────────── hi
//!   cmd   175 ──────────────── 5
//! ```
//!
//! Readings are rounded to whole units and clamped to the face before
//! mapping, so the needle never hits the servo's mechanical stops.

use crate::config::SystemConfig;

const HUMIDITY_LOW: i16 = 0;
const HUMIDITY_HIGH: i16 = 100;

/// What the dial currently shows, selected by the toggle switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Temperature,
    Humidity,
}

impl core::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Humidity => write!(f, "humidity"),
        }
    }
}

/// Map `value` onto the inverted needle range.
///
/// `value` is rounded half-up and truncated toward zero, then clamped to
/// `[low, high]`.  A degenerate face (`high <= low`) parks the needle at
/// `needle_max`.
pub fn needle_command(value: f32, low: i16, high: i16, needle_min: u8, needle_max: u8) -> u8 {
    let range = i32::from(high) - i32::from(low);
    if range <= 0 {
        return needle_max;
    }
    let rounded = ((value + 0.5) as i32).clamp(i32::from(low), i32::from(high));
    let span = i32::from(needle_max) - i32::from(needle_min);
    let movement = (rounded - i32::from(low)) * span / range;
    (i32::from(needle_max) - movement).clamp(0, i32::from(u8::MAX)) as u8
}

/// Dial state: which mode is showing and how to map each quantity.
#[derive(Debug, Clone)]
pub struct Meter {
    mode: Option<DisplayMode>,
    temp_low: i16,
    temp_high: i16,
    needle_min: u8,
    needle_max: u8,
}

impl Meter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            mode: None,
            temp_low: config.dial_temp_low_f,
            temp_high: config.dial_temp_high_f,
            needle_min: config.needle_min,
            needle_max: config.needle_max,
        }
    }

    /// Record the switch position; `true` when the dial must be redrawn.
    /// The first observation after boot always counts as a change.
    pub fn select(&mut self, mode: DisplayMode) -> bool {
        if self.mode == Some(mode) {
            return false;
        }
        self.mode = Some(mode);
        true
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode
    }

    /// Servo command for the current mode.
    pub fn command(&self, temperature_f: f32, humidity_pct: f32) -> u8 {
        match self.mode.unwrap_or(DisplayMode::Humidity) {
            DisplayMode::Temperature => needle_command(
                temperature_f,
                self.temp_low,
                self.temp_high,
                self.needle_min,
                self.needle_max,
            ),
            DisplayMode::Humidity => needle_command(
                humidity_pct,
                HUMIDITY_LOW,
                HUMIDITY_HIGH,
                self.needle_min,
                self.needle_max,
            ),
        }
    }
}
