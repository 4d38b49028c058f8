//! Unified error types for the leak detector firmware.
//!
//! A single `Error` enum that command handling funnels into, keeping the
//! remote path's error handling uniform.  Sensor faults never leave the
//! control loop and stay as [`SensorError`].  All variants are `Copy` so
//! they can be logged and passed around without allocation.
//!
//! None of these are fatal: the device is unattended, so every fault
//! degrades to "keep the last good value and keep running".

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible command funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A remote limits string could not be parsed.
    Limits(LimitsError),
    /// Persistent storage rejected a read or write.
    Storage(StorageError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limits(e) => write!(f, "limits: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Humidity/temperature acquisition failures.
///
/// The numeric codes match the status values reported by the classic DHT
/// interrupt driver so that logs stay comparable across firmware versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Decoded frame failed its checksum.
    Checksum,
    /// No edge at all arrived after the start pulse.
    IsrTimeout,
    /// The sensor's response pulse was missing or malformed.
    ResponseTimeout,
    /// Fewer than 40 data bits arrived before the deadline.
    DataTimeout,
    /// `start()` was called while a transaction was still in flight.
    Busy,
    /// A bit pulse was longer than any valid bit.
    Delta,
    /// A result was requested before any acquisition was started.
    NotStarted,
}

impl SensorError {
    /// Legacy numeric status code.
    pub const fn code(self) -> i8 {
        match self {
            Self::Checksum => -1,
            Self::IsrTimeout => -2,
            Self::ResponseTimeout => -3,
            Self::DataTimeout => -4,
            Self::Busy => -5,
            Self::Delta => -6,
            Self::NotStarted => -7,
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::IsrTimeout => write!(f, "no edges after start pulse"),
            Self::ResponseTimeout => write!(f, "sensor response timeout"),
            Self::DataTimeout => write!(f, "data timeout"),
            Self::Busy => write!(f, "acquisition already in progress"),
            Self::Delta => write!(f, "bit pulse out of range"),
            Self::NotStarted => write!(f, "acquisition not started"),
        }
    }
}

// ---------------------------------------------------------------------------
// Limits errors
// ---------------------------------------------------------------------------

/// Problems with a remote `"<low>,<high>"` limits string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitsError {
    /// No comma in the string.
    MissingSeparator,
    /// The low field is not a 16-bit integer.
    InvalidLow,
    /// The high field is not a 16-bit integer.
    InvalidHigh,
}

impl fmt::Display for LimitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "expected \"<low>,<high>\""),
            Self::InvalidLow => write!(f, "low limit is not an integer"),
            Self::InvalidHigh => write!(f, "high limit is not an integer"),
        }
    }
}

impl From<LimitsError> for Error {
    fn from(e: LimitsError) -> Self {
        Self::Limits(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::Corrupted => Self::Config("stored config corrupted"),
            ConfigError::IoError => Self::Config("config storage I/O error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
