//! Temperature alarm limits: remote parsing and persistence.
//!
//! The limits live in an EEPROM-style store at three fixed addresses:
//!
//! | Address | Content                             |
//! |---------|-------------------------------------|
//! | 10      | version byte (`0` = valid record)   |
//! | 20      | low limit, `i16` little-endian (°F) |
//! | 30      | high limit, `i16` little-endian (°F)|
//!
//! Anything other than a valid version byte (including a blank store)
//! yields the factory defaults.

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};
use crate::error::LimitsError;

pub const VERSION_ADDR: u16 = 10;
pub const LOW_LIMIT_ADDR: u16 = 20;
pub const HIGH_LIMIT_ADDR: u16 = 30;

/// Version byte marking a valid record.
pub const CURRENT_VERSION: u8 = 0;

pub const DEFAULT_LOW_F: i16 = 40;
pub const DEFAULT_HIGH_F: i16 = 105;

/// Low/high temperature alarm thresholds in °F.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmLimits {
    pub version: u8,
    pub low: i16,
    pub high: i16,
}

impl Default for AlarmLimits {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            low: DEFAULT_LOW_F,
            high: DEFAULT_HIGH_F,
        }
    }
}

impl AlarmLimits {
    pub const fn new(low: i16, high: i16) -> Self {
        Self {
            version: CURRENT_VERSION,
            low,
            high,
        }
    }

    /// `true` when `temperature_f` is strictly below the low limit.
    pub fn is_low(&self, temperature_f: f32) -> bool {
        temperature_f < f32::from(self.low)
    }

    /// `true` when `temperature_f` is strictly above the high limit.
    pub fn is_high(&self, temperature_f: f32) -> bool {
        temperature_f > f32::from(self.high)
    }

    /// Load from the store, falling back to defaults on a bad version byte
    /// or any read failure.
    pub fn load(store: &impl StoragePort) -> Self {
        match Self::try_load(store) {
            Ok(limits) => {
                info!("alarm limits loaded: low={} high={}", limits.low, limits.high);
                limits
            }
            Err(e) => {
                warn!("alarm limits unavailable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    fn try_load(store: &impl StoragePort) -> Result<Self, StorageError> {
        let mut version = [0u8; 1];
        if store.read(VERSION_ADDR, &mut version)? != 1 || version[0] != CURRENT_VERSION {
            return Err(StorageError::NotFound);
        }
        Ok(Self {
            version: version[0],
            low: read_i16(store, LOW_LIMIT_ADDR)?,
            high: read_i16(store, HIGH_LIMIT_ADDR)?,
        })
    }

    /// Persist all three fields.
    pub fn save(&self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        store.write(LOW_LIMIT_ADDR, &self.low.to_le_bytes())?;
        store.write(HIGH_LIMIT_ADDR, &self.high.to_le_bytes())?;
        // Version last: an interrupted first save still reads back as blank.
        store.write(VERSION_ADDR, &[self.version])
    }
}

fn read_i16(store: &impl StoragePort, addr: u16) -> Result<i16, StorageError> {
    let mut buf = [0u8; 2];
    if store.read(addr, &mut buf)? != 2 {
        return Err(StorageError::NotFound);
    }
    Ok(i16::from_le_bytes(buf))
}

/// Parse a remote `"<low>,<high>"` string.
///
/// Both fields must be plain integers (surrounding whitespace allowed).
/// Inverted limits (`low >= high`) are accepted but logged.
pub fn parse_limits(input: &str) -> Result<AlarmLimits, LimitsError> {
    let (low, high) = input
        .split_once(',')
        .ok_or(LimitsError::MissingSeparator)?;
    let low = low.trim().parse::<i16>().map_err(|_| LimitsError::InvalidLow)?;
    let high = high
        .trim()
        .parse::<i16>()
        .map_err(|_| LimitsError::InvalidHigh)?;

    if low >= high {
        warn!("inverted alarm limits accepted: low={} high={}", low, high);
    }
    Ok(AlarmLimits::new(low, high))
}
