//! End-to-end control loop scenarios: AppService driven tick by tick
//! against mock hardware.

use leakdetector::alarm::AlarmKind;
use leakdetector::app::events::AppEvent;
use leakdetector::app::service::AppService;
use leakdetector::config::SystemConfig;
use leakdetector::drivers::meter::DisplayMode;
use leakdetector::error::SensorError;
use leakdetector::limits::AlarmLimits;
use leakdetector::timing::TimeTick;

use crate::mock_hw::{EventLog, MockHardware, MockPublisher};

const LEAK_EVENT: &str = "WLDAlarmWaterLeak";
const HIGH_EVENT: &str = "WLDAlarmHighTemp";
const LOW_EVENT: &str = "WLDAlarmLowTemp";

struct Rig {
    app: AppService,
    hw: MockHardware,
    publisher: MockPublisher,
    sink: EventLog,
    now: TimeTick,
}

impl Rig {
    fn new(config: SystemConfig) -> Self {
        let mut app = AppService::new(config, AlarmLimits::default());
        let mut sink = EventLog::new();
        app.start(&mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            publisher: MockPublisher::new(),
            sink,
            now: 0,
        }
    }

    fn tick(&mut self) {
        self.app
            .tick(self.now, &mut self.hw, &mut self.publisher, &mut self.sink);
    }

    /// Tick every `step` ms from the current time up to and including `until`.
    fn run_to(&mut self, until: TimeTick, step: u32) {
        while self.now <= until {
            self.tick();
            self.now += step;
        }
    }

    /// Run with a per-tick observer.
    fn run_observing(&mut self, until: TimeTick, step: u32, mut f: impl FnMut(&MockHardware)) {
        while self.now <= until {
            self.tick();
            f(&self.hw);
            self.now += step;
        }
    }
}

fn instant_smoothing() -> SystemConfig {
    SystemConfig {
        smoothing_weight: 1.0,
        ..SystemConfig::default()
    }
}

// ── Water leak ────────────────────────────────────────────────

#[test]
fn five_wet_samples_trip_and_five_dry_samples_clear() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.wet();

    // Gate latches at t=0; samples at 20, 40, 60, 80.
    rig.run_to(80, 20);
    assert!(!rig.app.is_leaking());

    rig.run_to(100, 20);
    assert!(rig.app.is_leaking(), "fifth wet sample trips");
    assert_eq!(rig.publisher.count(LEAK_EVENT), 1);
    assert_eq!(rig.app.status().alarms(), "0,0,1");

    rig.hw.dry();
    rig.run_to(180, 20);
    assert!(rig.app.is_leaking(), "four dry samples are not enough");
    assert_eq!(rig.publisher.count(LEAK_EVENT), 1, "held off while persisting");

    rig.run_to(200, 20);
    assert!(!rig.app.is_leaking());
    assert_eq!(rig.app.status().alarms(), "0,0,0");

    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::LeakChanged { .. })),
        2
    );
}

#[test]
fn recurring_leak_notifies_again_after_clearing() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.wet();
    rig.run_to(100, 20);
    rig.hw.dry();
    rig.run_to(200, 20);
    rig.hw.wet();
    rig.run_to(300, 20);

    assert!(rig.app.is_leaking());
    assert_eq!(rig.publisher.count(LEAK_EVENT), 2);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::AlarmSent(AlarmKind::WaterLeak)),
        2
    );
}

#[test]
fn either_probe_alone_trips() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.water = (0, crate::mock_hw::WET_RAW);
    rig.run_to(100, 20);
    assert!(rig.app.is_leaking());
}

// ── Operator feedback ─────────────────────────────────────────

#[test]
fn indicator_is_steady_until_leak() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.dry();
    rig.run_observing(1000, 10, |hw| {
        assert!(hw.indicator.high);
        assert!(!hw.buzzer.high);
    });
}

#[test]
fn buzzer_pulses_until_muted_then_mute_clears_with_leak() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.wet();
    rig.run_to(100, 10);
    assert!(rig.app.is_leaking());

    let (mut buzz_on, mut buzz_off) = (0, 0);
    rig.run_observing(400, 10, |hw| {
        if hw.buzzer.high {
            buzz_on += 1;
        } else {
            buzz_off += 1;
        }
    });
    assert!(buzz_on > 0 && buzz_off > 0, "buzzer must pulse");

    rig.hw.press();
    rig.run_to(420, 10);
    assert!(rig.app.is_muted());

    let (mut lamp_on, mut lamp_off) = (0, 0);
    rig.run_observing(1000, 10, |hw| {
        assert!(!hw.buzzer.high, "muted buzzer stays silent");
        if hw.indicator.high {
            lamp_on += 1;
        } else {
            lamp_off += 1;
        }
    });
    assert!(lamp_on > 0 && lamp_off > 0, "indicator keeps flashing");
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Muted), 1, "one press, one mute");

    rig.hw.release();
    rig.hw.dry();
    rig.run_to(1200, 10);
    assert!(!rig.app.is_leaking());
    assert!(!rig.app.is_muted(), "clearing the leak clears the mute");
}

#[test]
fn bounce_shorter_than_debounce_is_ignored() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run_to(100, 5);
    for _ in 0..5 {
        rig.hw.press();
        rig.run_to(rig.now, 5);
        rig.hw.release();
        rig.run_to(rig.now, 5);
    }
    assert!(!rig.app.is_muted());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::Muted), 0);
}

// ── Temperature alarms ────────────────────────────────────────

#[test]
fn high_temperature_sent_once_held_off_then_rearmed_on_recovery() {
    let mut rig = Rig::new(instant_smoothing());
    rig.hw.climate = (Ok(()), 110.0, 50.0);

    // Acquisition starts at 4000 and completes on the next tick.
    rig.run_to(4010, 10);
    assert_eq!(rig.publisher.count(HIGH_EVENT), 1);
    assert_eq!(
        rig.publisher.sent[0].1,
        "High temperature detected. Temperature = 110.00"
    );
    assert_eq!(rig.app.status().alarms(), "0,1,0");
    assert_eq!(rig.app.status().temperature(), "110.00");

    rig.run_to(8010, 10);
    assert_eq!(rig.hw.acquisitions, 2);
    assert_eq!(rig.publisher.count(HIGH_EVENT), 1, "held off");

    rig.hw.climate = (Ok(()), 70.0, 50.0);
    rig.run_to(12_010, 10);
    assert_eq!(rig.app.status().alarms(), "0,0,0");

    rig.hw.climate = (Ok(()), 110.0, 50.0);
    rig.run_to(16_010, 10);
    assert_eq!(rig.publisher.count(HIGH_EVENT), 2, "recovery rearmed the notifier");
}

#[test]
fn low_temperature_alarm_and_boundary_values() {
    let mut rig = Rig::new(instant_smoothing());

    rig.hw.climate = (Ok(()), 40.0, 50.0);
    rig.run_to(4010, 10);
    assert_eq!(rig.publisher.count(LOW_EVENT), 0, "limit itself is not low");

    rig.hw.climate = (Ok(()), 39.5, 50.0);
    rig.run_to(8010, 10);
    assert_eq!(rig.publisher.count(LOW_EVENT), 1);
    assert_eq!(rig.app.status().alarms(), "1,0,0");

    rig.hw.climate = (Ok(()), 105.0, 50.0);
    rig.run_to(12_010, 10);
    assert_eq!(rig.publisher.count(HIGH_EVENT), 0, "limit itself is not high");
}

#[test]
fn smoothing_delays_alarm_for_a_single_spike() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.climate = (Ok(()), 70.0, 50.0);
    rig.run_to(4010, 10);

    rig.hw.climate = (Ok(()), 200.0, 50.0);
    rig.run_to(8010, 10);
    // 70 * 0.9 + 200 * 0.1 = 83
    let smoothed = rig.app.climate().map(|r| r.temperature_f);
    assert!(smoothed.is_some_and(|t| (t - 83.0).abs() < 0.01));
    assert_eq!(rig.publisher.count(HIGH_EVENT), 0);
}

#[test]
fn failed_acquisition_keeps_last_value_and_retries() {
    let mut rig = Rig::new(instant_smoothing());
    rig.hw.climate = (Ok(()), 72.0, 40.0);
    rig.run_to(4010, 10);

    rig.hw.climate = (Err(SensorError::Checksum), 0.0, 0.0);
    rig.run_to(8010, 10);
    assert_eq!(rig.app.status().temperature(), "72.00");
    assert_eq!(
        rig.sink
            .count(|e| *e == AppEvent::AcquisitionFailed(SensorError::Checksum)),
        1
    );

    rig.run_to(12_010, 10);
    assert_eq!(rig.hw.acquisitions, 3, "retried at the next interval");
}

#[test]
fn slow_acquisition_defers_next_start() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.hw.acquisition_ticks = 3;
    rig.run_to(4000, 10);
    assert_eq!(rig.hw.acquisitions, 1);
    assert!(rig.hw.activity_led.high);

    rig.run_to(8030, 10);
    assert_eq!(rig.hw.acquisitions, 2);
    assert!(!rig.hw.activity_led.high, "LED toggles per acquisition");
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::ClimateSample { .. })),
        1
    );
}

// ── Dial ──────────────────────────────────────────────────────

#[test]
fn dial_is_drawn_at_boot_and_redrawn_on_toggle() {
    let mut rig = Rig::new(instant_smoothing());
    rig.hw.toggle.high = false; // temperature
    rig.hw.climate = (Ok(()), 70.0, 45.0);

    rig.tick();
    assert_eq!(rig.hw.needle, vec![175], "no reading yet parks at the low end");
    assert_eq!(
        rig.sink
            .count(|e| *e == AppEvent::DisplayModeChanged(DisplayMode::Temperature)),
        1
    );

    rig.run_to(4010, 10);
    // 175 - (70 - 40) * 170 / 80
    assert_eq!(rig.hw.last_needle(), Some(112));

    rig.hw.toggle.high = true;
    rig.run_to(4020, 10);
    // 175 - 45 * 170 / 100
    assert_eq!(rig.hw.last_needle(), Some(99));

    let redraws = rig.hw.needle.len();
    rig.run_to(5000, 10);
    assert_eq!(rig.hw.needle.len(), redraws, "steady switch does not redraw");
}
