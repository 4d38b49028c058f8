//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the water probes, the DHT driver and every operator-facing pin,
//! exposing them through [`WaterSensorPort`], [`ClimateSensorPort`],
//! [`OperatorInputPort`] and [`ActuatorPort`].  This is the only module in
//! the system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, ClimateSensorPort, OperatorInputPort, WaterSensorPort};
use crate::drivers::hw_init::{GpioLine, servo_write};
use crate::drivers::meter::DisplayMode;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::dht::{DHT_LINE, DhtModel, DhtSensor};
use crate::sensors::water_level::WaterProbes;
use crate::timing::TimeTick;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    probes: WaterProbes,
    dht: DhtSensor<'static, GpioLine>,
    button: GpioLine,
    toggle: GpioLine,
    indicator: GpioLine,
    buzzer: GpioLine,
    activity_led: GpioLine,
}

impl HardwareAdapter {
    /// Wire the adapter to the board's pin map.  Peripherals must already
    /// be configured by [`crate::drivers::hw_init::init_peripherals`].
    pub fn new(model: DhtModel) -> Self {
        Self {
            probes: WaterProbes::new(),
            dht: DhtSensor::new(model, GpioLine::new(pins::DHT_GPIO), &DHT_LINE),
            button: GpioLine::new(pins::BUTTON_GPIO),
            toggle: GpioLine::new(pins::TOGGLE_GPIO),
            indicator: GpioLine::new(pins::INDICATOR_GPIO),
            buzzer: GpioLine::new(pins::BUZZER_GPIO),
            activity_led: GpioLine::new(pins::ACTIVITY_LED_GPIO),
        }
    }

    /// Last good reading straight from the sensor, in °C.
    pub fn celsius(&self) -> f32 {
        self.dht.celsius()
    }
}

// ── Sensor ports ──────────────────────────────────────────────

impl WaterSensorPort for HardwareAdapter {
    fn read_water_raw(&mut self) -> (u16, u16) {
        self.probes.read_raw()
    }
}

impl ClimateSensorPort for HardwareAdapter {
    fn begin_acquisition(&mut self, now: TimeTick) {
        self.dht.begin_acquisition(now);
    }

    fn acquiring(&mut self, now: TimeTick) -> bool {
        self.dht.acquiring(now)
    }

    fn result(&self) -> Result<(), SensorError> {
        self.dht.result()
    }

    fn fahrenheit(&self) -> f32 {
        self.dht.fahrenheit()
    }

    fn humidity(&self) -> f32 {
        self.dht.humidity()
    }
}

// ── Operator inputs ───────────────────────────────────────────

impl OperatorInputPort for HardwareAdapter {
    /// Active low: the button shorts its pulled-up input to ground.
    fn mute_button_down(&mut self) -> bool {
        self.button.is_low().unwrap_or(false)
    }

    /// LOW selects temperature, HIGH selects humidity.
    fn display_mode(&mut self) -> DisplayMode {
        match self.toggle.is_low() {
            Ok(true) => DisplayMode::Temperature,
            _ => DisplayMode::Humidity,
        }
    }
}

// ── Actuators ─────────────────────────────────────────────────

fn drive(pin: &mut GpioLine, on: bool) {
    let _ = if on { pin.set_high() } else { pin.set_low() };
}

impl ActuatorPort for HardwareAdapter {
    fn set_indicator(&mut self, on: bool) {
        drive(&mut self.indicator, on);
    }

    fn set_buzzer(&mut self, on: bool) {
        drive(&mut self.buzzer, on);
    }

    fn set_activity_led(&mut self, on: bool) {
        drive(&mut self.activity_led, on);
    }

    fn set_needle(&mut self, command: u8) {
        servo_write(command);
    }
}
