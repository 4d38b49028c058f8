//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, publisher, storage) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Every port call is non-blocking: the control loop runs on a single
//! cooperative thread and must never wait on a peripheral.

use crate::config::SystemConfig;
use crate::drivers::meter::DisplayMode;
use crate::error::SensorError;
use crate::timing::TimeTick;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The two analog water-level probes.
pub trait WaterSensorPort {
    /// Raw ADC counts for probe A and probe B.
    fn read_water_raw(&mut self) -> (u16, u16);
}

/// Asynchronous humidity/temperature sensor.
///
/// The transaction completes on an interrupt path outside the control
/// loop's control; the loop only ever observes it by polling.
pub trait ClimateSensorPort {
    /// Kick off a new transaction.  Must not be called while
    /// [`acquiring`](Self::acquiring) still reports `true`.
    fn begin_acquisition(&mut self, now: TimeTick);

    /// Advance the transaction and report whether it is still in flight.
    fn acquiring(&mut self, now: TimeTick) -> bool;

    /// Outcome of the last finished transaction.
    fn result(&self) -> Result<(), SensorError>;

    /// Last good temperature in degrees Fahrenheit.
    fn fahrenheit(&self) -> f32;

    /// Last good relative humidity in percent.
    fn humidity(&self) -> f32;
}

/// Operator inputs, sampled once per tick.
pub trait OperatorInputPort {
    /// Raw level of the mute pushbutton (`true` = held down).
    fn mute_button_down(&mut self) -> bool;

    /// Position of the dial's temperature/humidity toggle switch.
    fn display_mode(&mut self) -> DisplayMode;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait ActuatorPort {
    /// Visual alarm indicator lamp.
    fn set_indicator(&mut self, on: bool);

    /// Piezo buzzer.
    fn set_buzzer(&mut self, on: bool);

    /// On-board activity LED (toggles on every climate acquisition).
    fn set_activity_led(&mut self, on: bool);

    /// Dial needle servo command.
    fn set_needle(&mut self, command: u8);
}

// ───────────────────────────────────────────────────────────────
// Notification port (driven adapter: domain → cloud)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget publication of a named event.
///
/// There is no delivery confirmation; failures are invisible to the core
/// and therefore never retried here.
pub trait NotifyPort {
    fn publish(&mut self, name: &str, message: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ EEPROM-style store)
// ───────────────────────────────────────────────────────────────

/// Byte store keyed by fixed addresses.
///
/// Write operations MUST be atomic per address: no partial writes on
/// power loss.
pub trait StoragePort {
    /// Read the value at `addr`.  Returns the number of bytes written to `buf`.
    fn read(&self, addr: u16, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing has ever been written at this address.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "address never written"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
