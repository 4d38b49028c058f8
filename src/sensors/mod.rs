//! Sensor subsystem: water probes, the DHT climate sensor, and the
//! signal conditioning applied to both.
//!
//! Drivers here only produce numbers.  Deciding what those numbers mean
//! (leak / over-limit / normal) is the control loop's job.

pub mod climate;
pub mod dht;
pub mod water_level;
