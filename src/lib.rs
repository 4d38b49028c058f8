//! Leak detector firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod error;
pub mod limits;
pub mod pins;
pub mod timing;

// Hardware-facing modules; the ESP-IDF implementations are guarded by cfg
// attributes inside, with simulation backends on every other target.
pub mod adapters;
pub mod drivers;
pub mod sensors;
