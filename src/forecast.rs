// src/forecast.rs
// Rule-based 72-hour AQI projection. Local and infallible.

use crate::types::ForecastPoint;
use chrono::Timelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

pub const FORECAST_HOURS: u32 = 72;
pub const MAX_AQI: u32 = 500;

const RUSH_HOUR_FACTOR: f64 = 1.15;
const OVERNIGHT_FACTOR: f64 = 0.85;
const MIN_CONFIDENCE: u8 = 70;
const MAX_CONFIDENCE: u8 = 95;

pub struct ForecastSynthesizer {
    jitter: f64,
    rng: Mutex<StdRng>,
}

impl ForecastSynthesizer {
    /// `jitter` is the half-width of the random multiplier (0.05 = ±5%).
    /// A seed makes the noise reproducible.
    pub fn new(jitter: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            jitter: if jitter.is_finite() { jitter.clamp(0.0, 0.5) } else { 0.0 },
            rng: Mutex::new(rng),
        }
    }

    /// Project from the current local hour.
    pub fn synthesize(&self, current_aqi: u32, recent_samples: &[u32]) -> Vec<ForecastPoint> {
        let start_hour = chrono::Local::now().hour();
        self.synthesize_from(start_hour, current_aqi, recent_samples)
    }

    pub fn synthesize_from(
        &self,
        start_hour: u32,
        current_aqi: u32,
        recent_samples: &[u32],
    ) -> Vec<ForecastPoint> {
        let drift = drift_rate(recent_samples);
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (1..=FORECAST_HOURS)
            .map(|hour| {
                let hour_of_day = (start_hour + hour) % 24;
                let jitter_factor = if self.jitter > 0.0 {
                    rng.gen_range((1.0 - self.jitter)..=(1.0 + self.jitter))
                } else {
                    1.0
                };
                let drift_factor = 1.0 + drift * f64::from(hour) / 100.0;

                let projected = (f64::from(current_aqi)
                    * hour_of_day_factor(hour_of_day)
                    * jitter_factor
                    * drift_factor)
                    .round();

                ForecastPoint {
                    hour,
                    aqi: projected.clamp(0.0, f64::from(MAX_AQI)) as u32,
                    confidence: confidence_for_hour(hour),
                }
            })
            .collect()
    }
}

impl Default for ForecastSynthesizer {
    fn default() -> Self {
        Self::new(0.05, None)
    }
}

/// Average change per sample between the first and last reading.
fn drift_rate(samples: &[u32]) -> f64 {
    match samples {
        [first, .., last] => (f64::from(*last) - f64::from(*first)) / samples.len() as f64,
        _ => 0.0,
    }
}

fn hour_of_day_factor(hour_of_day: u32) -> f64 {
    match hour_of_day {
        7..=9 | 17..=19 => RUSH_HOUR_FACTOR,
        22..=23 | 0..=5 => OVERNIGHT_FACTOR,
        _ => 1.0,
    }
}

fn confidence_for_hour(hour: u32) -> u8 {
    let decay = u8::try_from(hour / 3).unwrap_or(u8::MAX);
    MAX_CONFIDENCE.saturating_sub(decay).max(MIN_CONFIDENCE)
}
