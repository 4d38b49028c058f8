//! GPIO / peripheral pin assignments for the leak detector board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Water sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Water probe A: resistive floor probe into a divider.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const WATER_A_ADC_GPIO: i32 = 1;
/// Water probe B.  ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const WATER_B_ADC_GPIO: i32 = 2;

pub const ADC1_CH_WATER_A: u32 = 0;
pub const ADC1_CH_WATER_B: u32 = 1;

// ---------------------------------------------------------------------------
// Humidity / temperature sensor (DHT22, single-wire open drain)
// ---------------------------------------------------------------------------

/// Bidirectional data line with external 10 kΩ pull-up.
pub const DHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Alarm outputs
// ---------------------------------------------------------------------------

/// Visual alarm indicator lamp (active HIGH).
pub const INDICATOR_GPIO: i32 = 5;
/// Piezo buzzer driver transistor (active HIGH).
pub const BUZZER_GPIO: i32 = 6;
/// On-board activity LED; toggles on every climate acquisition.
pub const ACTIVITY_LED_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Operator inputs (internal pull-ups)
// ---------------------------------------------------------------------------

/// Mute pushbutton, active LOW.
pub const BUTTON_GPIO: i32 = 8;
/// Dial mode toggle switch.  LOW = temperature, HIGH = humidity.
pub const TOGGLE_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Dial needle servo
// ---------------------------------------------------------------------------

/// Hobby servo signal line (LEDC PWM).
pub const SERVO_GPIO: i32 = 10;
/// Standard 50 Hz hobby-servo frame.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits) for the servo channel.
pub const SERVO_RESOLUTION_BITS: u32 = 14;
/// Pulse width at 0° and 180° (microseconds).
pub const SERVO_MIN_PULSE_US: u32 = 544;
pub const SERVO_MAX_PULSE_US: u32 = 2400;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
