//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (cloud function
//! calls, serial console) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.
//!
//! Remote calls arrive on whatever task the transport runs on, so they are
//! queued through a static `embassy-sync` channel and drained by the
//! control loop between ticks:
//!
//! ```text
//! ┌──────────────┐  AppCommand  ┌──────────────┐
//! │  Transport   │─────────────▶│ Control Loop │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;
use log::warn;

use crate::config::SystemConfig;

/// Capacity of a raw remote argument.
pub const ARG_CAP: usize = 32;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Replace the temperature alarm limits from a `"<low>,<high>"` string.
    SetAlarmLimits(String<ARG_CAP>),

    /// Publish the diagnostic test notification.
    SendTestAlarm,

    /// Replace the tunables; persisted once accepted.
    UpdateConfig(SystemConfig),
}

const CMD_DEPTH: usize = 4;

/// Remote transport → control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, AppCommand, CMD_DEPTH> =
    Channel::new();

/// Remote entry point: set alarm limits.
///
/// Always returns `0`; parse failures are reported through the event sink
/// when the command is processed, and the old limits stay in force.
pub fn remote_set_alarm_limits(arg: &str) -> i32 {
    let mut raw = String::new();
    if raw.push_str(arg).is_err() {
        warn!("remote: limits argument too long ({} bytes), ignored", arg.len());
        return 0;
    }
    if COMMAND_CHANNEL.try_send(AppCommand::SetAlarmLimits(raw)).is_err() {
        warn!("remote: command queue full, limits update dropped");
    }
    0
}

/// Remote entry point: push a new configuration.
///
/// `blob` is a postcard-encoded [`SystemConfig`], the same format the NVS
/// adapter stores.  Range checks happen when the command is processed.
/// Always returns `0`.
pub fn remote_update_config(blob: &[u8]) -> i32 {
    let config: SystemConfig = match postcard::from_bytes(blob) {
        Ok(c) => c,
        Err(e) => {
            warn!("remote: config blob undecodable ({}), ignored", e);
            return 0;
        }
    };
    if COMMAND_CHANNEL
        .try_send(AppCommand::UpdateConfig(config))
        .is_err()
    {
        warn!("remote: command queue full, config update dropped");
    }
    0
}

/// Remote entry point: send a test alarm.  The argument is ignored.
pub fn remote_test_alarm(_arg: &str) -> i32 {
    if COMMAND_CHANNEL.try_send(AppCommand::SendTestAlarm).is_err() {
        warn!("remote: command queue full, test alarm dropped");
    }
    0
}
