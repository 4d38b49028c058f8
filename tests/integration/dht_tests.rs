//! DHT driver wired into the control loop: start pulse, ISR edge capture,
//! decode and smoothing, all observed only through polling.

use leakdetector::app::events::AppEvent;
use leakdetector::app::ports::{
    ActuatorPort, ClimateSensorPort, OperatorInputPort, WaterSensorPort,
};
use leakdetector::app::service::AppService;
use leakdetector::config::SystemConfig;
use leakdetector::drivers::meter::DisplayMode;
use leakdetector::error::SensorError;
use leakdetector::limits::AlarmLimits;
use leakdetector::sensors::dht::{DhtLine, DhtModel, DhtSensor, frame_edges};
use leakdetector::timing::TimeTick;

use crate::mock_hw::{EventLog, MockHardware, MockPin, MockPublisher};

/// 65.2 %RH, 23.5 °C.
const DHT22_FRAME: [u8; 5] = [0x02, 0x8C, 0x00, 0xEB, 0x79];

/// Real DHT driver for climate, mocks for everything else.
struct Board<'a> {
    dht: DhtSensor<'a, MockPin>,
    rest: MockHardware,
}

impl WaterSensorPort for Board<'_> {
    fn read_water_raw(&mut self) -> (u16, u16) {
        self.rest.read_water_raw()
    }
}

impl ClimateSensorPort for Board<'_> {
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

impl OperatorInputPort for Board<'_> {
    fn mute_button_down(&mut self) -> bool {
        self.rest.mute_button_down()
    }
    fn display_mode(&mut self) -> DisplayMode {
        self.rest.display_mode()
    }
}

impl ActuatorPort for Board<'_> {
    fn set_indicator(&mut self, on: bool) {
        self.rest.set_indicator(on);
    }
    fn set_buzzer(&mut self, on: bool) {
        self.rest.set_buzzer(on);
    }
    fn set_activity_led(&mut self, on: bool) {
        self.rest.set_activity_led(on);
    }
    fn set_needle(&mut self, command: u8) {
        self.rest.set_needle(command);
    }
}

fn climate_samples(sink: &EventLog) -> Vec<(f32, f32)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ClimateSample {
                temperature_f,
                humidity_pct,
            } => Some((*temperature_f, *humidity_pct)),
            _ => None,
        })
        .collect()
}

#[test]
fn interrupt_captured_frame_reaches_status() {
    let line = DhtLine::new();
    let mut board = Board {
        dht: DhtSensor::new(DhtModel::Dht22, MockPin::new(true), &line),
        rest: MockHardware::new(),
    };
    let mut app = AppService::new(SystemConfig::default(), AlarmLimits::default());
    let (mut publisher, mut sink) = (MockPublisher::new(), EventLog::new());

    let mut now = 0;
    while now <= 4000 {
        app.tick(now, &mut board, &mut publisher, &mut sink);
        now += 5;
    }
    assert_eq!(board.dht.session().result(), Err(SensorError::Busy), "still in flight");

    // Start pulse held for 18 ms, then the line is released and armed.
    while now <= 4020 {
        app.tick(now, &mut board, &mut publisher, &mut sink);
        now += 5;
    }
    assert!(climate_samples(&sink).is_empty());

    for t in frame_edges(&DHT22_FRAME, 7_000_000) {
        line.on_falling_edge(t);
    }
    app.tick(now, &mut board, &mut publisher, &mut sink);

    let samples = climate_samples(&sink);
    assert_eq!(samples.len(), 1);
    let (t, h) = samples[0];
    assert!((t - 74.3).abs() < 0.01, "23.5 C is 74.3 F, got {t}");
    assert!((h - 65.2).abs() < 0.01);
    assert_eq!(app.status().temperature(), "74.30");
    assert_eq!(app.status().humidity(), "65.20");
}

#[test]
fn silent_sensor_reports_isr_timeout_and_loop_keeps_running() {
    let line = DhtLine::new();
    let mut board = Board {
        dht: DhtSensor::new(DhtModel::Dht22, MockPin::new(true), &line),
        rest: MockHardware::new(),
    };
    board.rest.wet();
    let mut app = AppService::new(SystemConfig::default(), AlarmLimits::default());
    let (mut publisher, mut sink) = (MockPublisher::new(), EventLog::new());

    let mut now = 0;
    while now <= 4100 {
        app.tick(now, &mut board, &mut publisher, &mut sink);
        now += 5;
    }

    assert_eq!(
        sink.count(|e| *e == AppEvent::AcquisitionFailed(SensorError::IsrTimeout)),
        1
    );
    assert_eq!(board.dht.session().result_code(), SensorError::IsrTimeout.code());
    assert!(app.is_leaking(), "water monitoring continued meanwhile");
}
