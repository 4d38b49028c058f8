//! Exponentially weighted smoothing of temperature and humidity.
//!
//! `smoothed = (1 − w) · smoothed + w · sample`, seeded with the first
//! sample so the dial does not crawl up from zero after boot.

/// Single-channel EWMA.
#[derive(Debug, Clone, Copy)]
pub struct Ewma {
    weight: f32,
    value: Option<f32>,
}

impl Ewma {
    pub const fn new(weight: f32) -> Self {
        Self {
            weight,
            value: None,
        }
    }

    pub fn update(&mut self, sample: f32) -> f32 {
        let next = match self.value {
            None => sample,
            Some(prev) => (1.0 - self.weight) * prev + self.weight * sample,
        };
        self.value = Some(next);
        next
    }

    /// Change the weight of future samples; the current value is kept.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    /// `None` until the first sample arrives.
    pub fn value(&self) -> Option<f32> {
        self.value
    }
}

/// Smoothed climate snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateReading {
    pub temperature_f: f32,
    pub humidity_pct: f32,
}

/// Temperature + humidity filter pair.
#[derive(Debug, Clone, Copy)]
pub struct ClimateFilter {
    temperature: Ewma,
    humidity: Ewma,
}

impl ClimateFilter {
    pub const fn new(weight: f32) -> Self {
        Self {
            temperature: Ewma::new(weight),
            humidity: Ewma::new(weight),
        }
    }

    pub fn update(&mut self, temperature_f: f32, humidity_pct: f32) -> ClimateReading {
        ClimateReading {
            temperature_f: self.temperature.update(temperature_f),
            humidity_pct: self.humidity.update(humidity_pct),
        }
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.temperature.set_weight(weight);
        self.humidity.set_weight(weight);
    }

    /// Latest smoothed values, or `None` before the first good sample.
    pub fn reading(&self) -> Option<ClimateReading> {
        Some(ClimateReading {
            temperature_f: self.temperature.value()?,
            humidity_pct: self.humidity.value()?,
        })
    }
}
