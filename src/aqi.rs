// src/aqi.rs
// AQI bands, display colors and PM2.5 conversion

use serde::{Deserialize, Serialize};

/// US EPA air-quality band. Upper bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiBand {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiBand::Good,
            51..=100 => AqiBand::Moderate,
            101..=150 => AqiBand::UnhealthyForSensitive,
            151..=200 => AqiBand::Unhealthy,
            201..=300 => AqiBand::VeryUnhealthy,
            _ => AqiBand::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    /// Display color used by the globe markers and health cards.
    pub fn color(&self) -> &'static str {
        match self {
            AqiBand::Good => "hsl(142, 76%, 50%)",
            AqiBand::Moderate => "hsl(45, 100%, 55%)",
            AqiBand::UnhealthyForSensitive => "hsl(25, 100%, 55%)",
            AqiBand::Unhealthy => "hsl(0, 84%, 55%)",
            AqiBand::VeryUnhealthy => "hsl(280, 80%, 55%)",
            AqiBand::Hazardous => "hsl(320, 90%, 40%)",
        }
    }
}

pub fn color_for_aqi(aqi: u32) -> &'static str {
    AqiBand::from_aqi(aqi).color()
}

// (concentration low, concentration high, index low, index high)
const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 5] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
];

/// Convert a PM2.5 concentration (µg/m³) to an AQI value using the EPA
/// piecewise-linear breakpoints.
pub fn pm25_to_aqi(pm25: f64) -> u32 {
    if !pm25.is_finite() || pm25 <= 0.0 {
        return 0;
    }

    let (c_lo, c_hi, i_lo, i_hi) = PM25_BREAKPOINTS
        .iter()
        .copied()
        .find(|(_, c_hi, _, _)| pm25 <= *c_hi)
        .unwrap_or((250.5, 500.4, 301.0, 500.0));

    let aqi = (i_hi - i_lo) / (c_hi - c_lo) * (pm25 - c_lo) + i_lo;
    aqi.round().max(0.0) as u32
}
