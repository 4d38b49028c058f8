//! Alarm limits: persistence at boot and the remote update path.

use leakdetector::app::commands::{
    AppCommand, COMMAND_CHANNEL, remote_set_alarm_limits, remote_test_alarm, remote_update_config,
};
use leakdetector::app::events::AppEvent;
use leakdetector::app::ports::{ConfigPort, StorageError};
use leakdetector::app::service::AppService;
use leakdetector::config::SystemConfig;
use leakdetector::error::{Error, LimitsError};
use leakdetector::limits::{AlarmLimits, HIGH_LIMIT_ADDR, LOW_LIMIT_ADDR, VERSION_ADDR};

use crate::mock_hw::{EventLog, MockHardware, MockPublisher, MockStore};

fn boot(store: &MockStore) -> AppService {
    let config = SystemConfig {
        smoothing_weight: 1.0,
        ..SystemConfig::default()
    };
    AppService::new(config, AlarmLimits::load(store))
}

#[test]
fn blank_store_boots_with_defaults() {
    let app = boot(&MockStore::new());
    assert_eq!(app.limits(), AlarmLimits::new(40, 105));
    assert_eq!(app.status().low_limit(), "40");
    assert_eq!(app.status().high_limit(), "105");
}

#[test]
fn stored_limits_are_loaded_at_boot() {
    let mut store = MockStore::new();
    AlarmLimits::new(33, 99).save(&mut store).unwrap();
    let app = boot(&store);
    assert_eq!(app.limits(), AlarmLimits::new(33, 99));
    assert_eq!(app.status().high_limit(), "99");
}

#[test]
fn bad_version_byte_falls_back_to_defaults() {
    let mut store = MockStore::new();
    store.cells.insert(VERSION_ADDR, vec![0xFF]);
    store.cells.insert(LOW_LIMIT_ADDR, 10i16.to_le_bytes().to_vec());
    store.cells.insert(HIGH_LIMIT_ADDR, 20i16.to_le_bytes().to_vec());
    assert_eq!(boot(&store).limits(), AlarmLimits::default());
}

#[test]
fn storage_failure_still_applies_new_limits() {
    let mut store = MockStore::new();
    store.fail_writes = true;
    let mut app = boot(&store);
    let (mut publisher, mut sink) = (MockPublisher::new(), EventLog::new());

    let mut raw = heapless::String::new();
    raw.push_str("50,90").unwrap();
    let err = app
        .handle_command(
            AppCommand::SetAlarmLimits(raw),
            &mut store,
            &mut publisher,
            &mut sink,
        )
        .unwrap_err();

    assert_eq!(err, Error::Storage(StorageError::IoError));
    assert_eq!(app.limits(), AlarmLimits::new(50, 90));
}

fn drain(
    app: &mut AppService,
    store: &mut MockStore,
    publisher: &mut MockPublisher,
    sink: &mut EventLog,
) -> Vec<Result<(), Error>> {
    let mut results = Vec::new();
    while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
        results.push(app.handle_command(cmd, store, publisher, sink));
    }
    results
}

// The command queue is a process-wide static, so every remote-path check
// lives in this one test.
#[test]
fn remote_calls_flow_through_the_command_queue() {
    while COMMAND_CHANNEL.try_receive().is_ok() {}

    let mut store = MockStore::new();
    let mut app = boot(&store);
    let mut hw = MockHardware::new();
    let (mut publisher, mut sink) = (MockPublisher::new(), EventLog::new());

    // Valid update: applied, persisted, reported.
    assert_eq!(remote_set_alarm_limits(" 50 , 90 "), 0);
    let results = drain(&mut app, &mut store, &mut publisher, &mut sink);
    assert_eq!(results, vec![Ok(())]);
    assert_eq!(app.limits(), AlarmLimits::new(50, 90));
    assert_eq!(AlarmLimits::load(&store), AlarmLimits::new(50, 90));
    assert!(sink.events.contains(&AppEvent::LimitsUpdated { low: 50, high: 90 }));

    // Malformed update: still returns 0, old limits stay.
    assert_eq!(remote_set_alarm_limits("50;90"), 0);
    assert_eq!(remote_set_alarm_limits("abc,90"), 0);
    let results = drain(&mut app, &mut store, &mut publisher, &mut sink);
    assert_eq!(
        results,
        vec![
            Err(Error::Limits(LimitsError::MissingSeparator)),
            Err(Error::Limits(LimitsError::InvalidLow)),
        ]
    );
    assert_eq!(app.limits(), AlarmLimits::new(50, 90));

    // New limits take effect on the next climate sample.
    hw.climate = (Ok(()), 95.0, 40.0);
    let mut now = 0;
    while now <= 4010 {
        app.tick(now, &mut hw, &mut publisher, &mut sink);
        now += 10;
    }
    assert_eq!(publisher.count("WLDAlarmHighTemp"), 1);

    // Test alarm: always published, never throttled.
    assert_eq!(remote_test_alarm(""), 0);
    assert_eq!(remote_test_alarm("ignored"), 0);
    drain(&mut app, &mut store, &mut publisher, &mut sink);
    assert_eq!(publisher.count("WLDAlarmTest"), 2);
    assert_eq!(
        publisher.sent.last().map(|(_, m)| m.as_str()),
        Some("This is a test of the WLD alarm system")
    );

    // Config push: out-of-range values rejected, valid ones applied and stored.
    let bad = SystemConfig {
        leak_alarm_limit: 0,
        ..SystemConfig::default()
    };
    let good = SystemConfig {
        leak_alarm_limit: 3,
        ..SystemConfig::default()
    };
    assert_eq!(remote_update_config(&postcard::to_allocvec(&bad).unwrap()), 0);
    assert_eq!(remote_update_config(&postcard::to_allocvec(&good).unwrap()), 0);
    let results = drain(&mut app, &mut store, &mut publisher, &mut sink);
    assert!(matches!(results[0], Err(Error::Config(_))));
    assert_eq!(results[1], Ok(()));
    assert_eq!(app.config().leak_alarm_limit, 3);
    assert_eq!(store.load().unwrap().leak_alarm_limit, 3);
}
