//! System configuration parameters
//!
//! All tunable parameters for the leak detector.
//! Values can be overridden via NVS (non-volatile storage); the
//! temperature alarm limits live separately in [`crate::limits`].

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// One day in milliseconds.
pub const ONE_DAY_MS: u32 = 24 * 60 * 60 * 1000;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Water sensing ---
    /// Sensor voltage above which a channel counts as wet (volts)
    pub water_threshold_v: f32,
    /// Consecutive wet samples needed to trip, and dry samples to clear
    pub leak_alarm_limit: u8,
    /// Water sensor sampling interval (milliseconds)
    pub water_sample_interval_ms: u32,

    // --- ADC ---
    /// Full-scale raw ADC count
    pub adc_full_scale: u16,
    /// ADC reference voltage (volts)
    pub adc_vref_v: f32,

    // --- Climate sensing ---
    /// Temperature/humidity acquisition interval (milliseconds)
    pub climate_sample_interval_ms: u32,
    /// Weight given to each new sample by the smoothing filter (0-1)
    pub smoothing_weight: f32,

    // --- Operator interface ---
    /// Mute button debounce time (milliseconds)
    pub debounce_ms: u32,
    /// Indicator on/off half-period while alarming (milliseconds)
    pub indicator_flash_ms: u32,
    /// Buzzer on/off half-period while sounding (milliseconds)
    pub buzzer_pulse_ms: u32,

    // --- Notification holdoff ---
    pub low_temp_holdoff_ms: u32,
    pub high_temp_holdoff_ms: u32,
    pub leak_holdoff_ms: u32,

    // --- Dial meter ---
    /// Lowest temperature printed on the dial face (°F)
    pub dial_temp_low_f: i16,
    /// Highest temperature printed on the dial face (°F)
    pub dial_temp_high_f: i16,
    /// Servo command at the dial's maximum reading
    pub needle_min: u8,
    /// Servo command at the dial's minimum reading
    pub needle_max: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Water sensing
            water_threshold_v: 0.5,
            leak_alarm_limit: 5,
            water_sample_interval_ms: 20, // 50 Hz

            // ADC (12-bit, 3.3 V)
            adc_full_scale: 4095,
            adc_vref_v: 3.3,

            // Climate
            climate_sample_interval_ms: 4000,
            smoothing_weight: 0.1, // ~10-sample moving average

            // Operator interface
            debounce_ms: 10,
            indicator_flash_ms: 150,
            buzzer_pulse_ms: 50,

            // Holdoff
            low_temp_holdoff_ms: ONE_DAY_MS,
            high_temp_holdoff_ms: ONE_DAY_MS,
            leak_holdoff_ms: ONE_DAY_MS,

            // Dial
            dial_temp_low_f: 40,
            dial_temp_high_f: 120,
            needle_min: 5,
            needle_max: 175,
        }
    }
}

impl SystemConfig {
    /// Convert a raw ADC count to volts.
    pub fn adc_to_volts(&self, raw: u16) -> f32 {
        f32::from(raw) * self.adc_vref_v / f32::from(self.adc_full_scale)
    }
}

/// Range-check every field.  Out-of-range values are rejected, never
/// clamped.
pub fn validate_config(cfg: &SystemConfig) -> Result<(), ConfigError> {
    if !(cfg.water_threshold_v > 0.0 && cfg.water_threshold_v < cfg.adc_vref_v) {
        return Err(ConfigError::ValidationFailed(
            "water_threshold_v must be between 0 and adc_vref_v",
        ));
    }
    if cfg.leak_alarm_limit == 0 {
        return Err(ConfigError::ValidationFailed("leak_alarm_limit must be >= 1"));
    }
    if !(5..=1000).contains(&cfg.water_sample_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "water_sample_interval_ms must be 5–1000",
        ));
    }
    if cfg.adc_full_scale == 0 || !(1.0..=5.0).contains(&cfg.adc_vref_v) {
        return Err(ConfigError::ValidationFailed("ADC scaling out of range"));
    }
    // DHT sensors need at least 2 s between conversions.
    if !(2000..=600_000).contains(&cfg.climate_sample_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "climate_sample_interval_ms must be 2000–600000",
        ));
    }
    if !(cfg.smoothing_weight > 0.0 && cfg.smoothing_weight <= 1.0) {
        return Err(ConfigError::ValidationFailed("smoothing_weight must be in (0, 1]"));
    }
    if !(1..=500).contains(&cfg.debounce_ms) {
        return Err(ConfigError::ValidationFailed("debounce_ms must be 1–500"));
    }
    if cfg.indicator_flash_ms == 0 || cfg.buzzer_pulse_ms == 0 {
        return Err(ConfigError::ValidationFailed("flash/pulse periods must be > 0"));
    }
    if cfg.dial_temp_low_f >= cfg.dial_temp_high_f {
        return Err(ConfigError::ValidationFailed(
            "dial_temp_low_f must be < dial_temp_high_f",
        ));
    }
    if cfg.needle_min >= cfg.needle_max || cfg.needle_max > 180 {
        return Err(ConfigError::ValidationFailed(
            "needle range must satisfy min < max <= 180",
        ));
    }
    Ok(())
}
