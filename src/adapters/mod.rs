//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to              |
//! |-------------|---------------------|--------------------------|
//! | `hardware`  | WaterSensorPort     | ESP32 ADC1 (two probes)  |
//! |             | ClimateSensorPort   | DHT line + GPIO ISR      |
//! |             | OperatorInputPort   | Mute button, toggle      |
//! |             | ActuatorPort        | GPIO outputs, LEDC servo |
//! | `log_sink`  | EventSink           | Serial log output        |
//! | `nvs`       | ConfigPort          | NVS / in-memory store    |
//! |             | StoragePort         |                          |
//! | `publisher` | NotifyPort          | Serial log output        |
//! | `time`      | -                   | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod publisher;
pub mod time;
