//! Resistive floor probes and the leak integrator.
//!
//! Two probes sit on the floor under the protected appliance.  Dry, each
//! reads near 0 V; bridged by water, the divider pulls the ADC input up.
//!
//! ## Integration and hysteresis
//!
//! A single sample above threshold means nothing (splash, EMI on the long
//! probe leads).  Each channel keeps a saturating count:
//!
//! ```text
//!   wet sample  → count + 1  (max LIMIT)
//!   dry sample  → count − 1  (min 0)
//!
//!   any count == LIMIT        → leak
//!   all counts == 0           → no leak
//!   anything in between       → previous decision
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_WATER_A: AtomicU16 = AtomicU16::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_WATER_B: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_water_raw(a: u16, b: u16) {
    SIM_WATER_A.store(a, Ordering::Relaxed);
    SIM_WATER_B.store(b, Ordering::Relaxed);
}

// ── Probes ────────────────────────────────────────────────────

/// Raw ADC access to the two probes.
#[derive(Debug, Default)]
pub struct WaterProbes;

impl WaterProbes {
    pub const fn new() -> Self {
        Self
    }

    /// Raw counts for probe A and probe B.
    pub fn read_raw(&self) -> (u16, u16) {
        (self.read_a(), self.read_b())
    }

    #[cfg(target_os = "espidf")]
    fn read_a(&self) -> u16 {
        hw_init::adc1_read(pins::ADC1_CH_WATER_A)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_a(&self) -> u16 {
        SIM_WATER_A.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn read_b(&self) -> u16 {
        hw_init::adc1_read(pins::ADC1_CH_WATER_B)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_b(&self) -> u16 {
        SIM_WATER_B.load(Ordering::Relaxed)
    }
}

// ── Integrator ────────────────────────────────────────────────

/// Two-channel saturating integrator with hysteresis.
#[derive(Debug, Clone)]
pub struct LeakIntegrator {
    limit: u8,
    counts: [u8; 2],
    leak: bool,
}

impl LeakIntegrator {
    /// `limit` is the number of consecutive wet samples needed to trip.
    /// A zero limit is bumped to 1 so the integrator can still trip.
    pub fn new(limit: u8) -> Self {
        Self {
            limit: limit.max(1),
            counts: [0; 2],
            leak: false,
        }
    }

    /// Feed one reading per channel (volts) and return the leak decision.
    pub fn update(&mut self, a_v: f32, b_v: f32, threshold_v: f32) -> bool {
        for (count, volts) in self.counts.iter_mut().zip([a_v, b_v]) {
            if volts > threshold_v {
                *count = count.saturating_add(1).min(self.limit);
            } else {
                *count = count.saturating_sub(1);
            }
        }

        if self.counts.contains(&self.limit) {
            self.leak = true;
        } else if self.counts == [0, 0] {
            self.leak = false;
        }
        self.leak
    }

    pub fn is_leaking(&self) -> bool {
        self.leak
    }

    pub fn counts(&self) -> (u8, u8) {
        (self.counts[0], self.counts[1])
    }

    pub fn limit(&self) -> u8 {
        self.limit
    }

    /// Change the trip limit; existing counts are clamped to it.
    pub fn set_limit(&mut self, limit: u8) {
        self.limit = limit.max(1);
        for c in &mut self.counts {
            *c = (*c).min(self.limit);
        }
    }
}
