//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures ADC channels, GPIO directions, the DHT line interrupt and
//! the servo LEDC timer/channel using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.
//!
//! On host builds every pin lives in a simulated level table so that the
//! adapters above can be exercised without hardware.

use core::convert::Infallible;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC servo config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_dht_line()?;
        init_servo()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation: full 0 – 3.3 V probe swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [pins::ADC1_CH_WATER_A, pins::ADC1_CH_WATER_B] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH0=water A, CH1=water B)");
    Ok(())
}

/// Read one ADC1 channel.  A failed conversion reads as 0 (dry).
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn config_pins(
    gpios: &[i32],
    mode: gpio_mode_t,
    pull_up: bool,
) -> Result<(), HwInitError> {
    for &pin in gpios {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode,
            pull_up_en: if pull_up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    unsafe { config_pins(&[pins::BUTTON_GPIO, pins::TOGGLE_GPIO], gpio_mode_t_GPIO_MODE_INPUT, true)? };
    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let outputs = [pins::INDICATOR_GPIO, pins::BUZZER_GPIO, pins::ACTIVITY_LED_GPIO];
    unsafe { config_pins(&outputs, gpio_mode_t_GPIO_MODE_OUTPUT, false)? };
    for pin in outputs {
        unsafe { gpio_set_level(pin, 0) };
    }
    info!("hw_init: GPIO outputs configured");
    Ok(())
}

/// DHT data line: open drain with pull-up, idle released (high).
#[cfg(target_os = "espidf")]
unsafe fn init_dht_line() -> Result<(), HwInitError> {
    unsafe {
        config_pins(&[pins::DHT_GPIO], gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, true)?;
        gpio_set_level(pins::DHT_GPIO, 1);
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as an output during init; main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

// ── Simulated pin table ───────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
const SIM_PIN_COUNT: usize = 49;

#[cfg(not(target_os = "espidf"))]
static SIM_LEVELS: [AtomicBool; SIM_PIN_COUNT] = [const { AtomicBool::new(true) }; SIM_PIN_COUNT];

#[cfg(not(target_os = "espidf"))]
static SIM_SERVO: AtomicU8 = AtomicU8::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

/// Simulated pins idle high (pull-ups everywhere).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    usize::try_from(pin)
        .ok()
        .and_then(|i| SIM_LEVELS.get(i))
        .is_none_or(|level| level.load(Ordering::Relaxed))
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    if let Some(level) = usize::try_from(pin).ok().and_then(|i| SIM_LEVELS.get(i)) {
        level.store(high, Ordering::Relaxed);
    }
}

/// Drive a simulated input (button, toggle switch).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio(pin: i32, high: bool) {
    gpio_write(pin, high);
}

/// Last servo angle commanded in simulation.
#[cfg(not(target_os = "espidf"))]
pub fn sim_servo_angle() -> u8 {
    SIM_SERVO.load(Ordering::Relaxed)
}

// ── embedded-hal pin wrapper ──────────────────────────────────

/// A configured GPIO exposed through the `embedded-hal` digital traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioLine {
    gpio: i32,
}

impl GpioLine {
    pub const fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.gpio, true);
        Ok(())
    }
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!gpio_read(self.gpio))
    }
}

// ── LEDC servo ────────────────────────────────────────────────

const SERVO_CHANNEL: u32 = 0;

/// Duty count for a servo angle (0–180°) at 50 Hz.
pub fn servo_duty(angle_deg: u8) -> u32 {
    let angle = u32::from(angle_deg.min(180));
    let pulse_us = pins::SERVO_MIN_PULSE_US
        + angle * (pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US) / 180;
    let period_us = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;
    pulse_us * (1 << pins::SERVO_RESOLUTION_BITS) / period_us
}

#[cfg(target_os = "espidf")]
unsafe fn init_servo() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::SERVO_RESOLUTION_BITS,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: SERVO_CHANNEL,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::SERVO_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!("hw_init: LEDC servo configured ({} Hz)", pins::SERVO_PWM_FREQ_HZ);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn servo_write(angle_deg: u8) {
    // SAFETY: the servo channel was configured in init_servo(); only the
    // main loop writes the duty register.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, SERVO_CHANNEL, servo_duty(angle_deg));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, SERVO_CHANNEL);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn servo_write(angle_deg: u8) {
    SIM_SERVO.store(angle_deg, Ordering::Relaxed);
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn dht_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_us = unsafe { esp_timer_get_time() } as u32;
    crate::sensors::dht::DHT_LINE.on_falling_edge(now_us);
}

/// Install the GPIO ISR service and hook the DHT falling-edge handler.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    // The handler only touches the critical-section protected DHT_LINE.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::DHT_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::DHT_GPIO, Some(dht_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::DHT_GPIO);
    }
    info!("hw_init: ISR service installed (dht)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
