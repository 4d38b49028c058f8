//! Operator I/O drivers, hardware initialisation, and peripheral helpers.

pub mod blinker;
pub mod button;
pub mod hw_init;
pub mod meter;
pub mod watchdog;
