// src/types.rs
// Domain types shared by the forecast, fallback and orchestrator layers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of recent AQI movement for a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[serde(alias = "up")]
    Rising,
    #[serde(alias = "down")]
    Falling,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rising" | "up" => Ok(Trend::Rising),
            "falling" | "down" => Ok(Trend::Falling),
            "stable" => Ok(Trend::Stable),
            other => Err(format!("unknown trend '{}'", other)),
        }
    }
}

/// Subject of an insight request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMetric {
    pub city: String,
    /// Current AQI; nominally 0-500 but not clamped on input
    pub aqi: u32,
    pub trend: Trend,
    /// Recent samples, oldest first. Only used to estimate drift.
    #[serde(default)]
    pub recent_samples: Vec<u32>,
}

impl CityMetric {
    pub fn new(city: impl Into<String>, aqi: u32, trend: Trend) -> Self {
        Self {
            city: city.into(),
            aqi,
            trend,
            recent_samples: Vec::new(),
        }
    }

    pub fn with_samples(mut self, samples: Vec<u32>) -> Self {
        self.recent_samples = samples;
        self
    }

    /// Requests for the same city and AQI share one cached report.
    pub fn cache_key(&self) -> String {
        format!("combined-{}-{}", self.city, self.aqi)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureProjection {
    pub percent_increase: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityInsight {
    pub explanation: String,
    pub health_advice: String,
    /// Short-term outlook note
    pub trend: String,
    /// Percentage, 65-95 in practice
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_projection: Option<FutureProjection>,
}

/// Respiratory risk and outdoor activity carry a `level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLevel {
    pub level: String,
    pub description: String,
    /// Band color; filled in from the AQI when a provider omits it
    #[serde(default)]
    pub color: String,
}

/// Visibility carries a `value` instead of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityLevel {
    pub value: String,
    pub description: String,
    /// Band color; filled in from the AQI when a provider omits it
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthImpact {
    pub respiratory_risk: RiskLevel,
    pub visibility: VisibilityLevel,
    pub outdoor_activity: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Hours ahead, 1..=72
    pub hour: u32,
    pub aqi: u32,
    pub confidence: u8,
}

/// Insight and health impact, as produced by a provider or the templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub insight: AirQualityInsight,
    pub health_impact: HealthImpact,
}

/// Which tier produced the textual part of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentSource {
    Generated { provider: String },
    Templated,
}

impl ContentSource {
    pub fn is_generated(&self) -> bool {
        matches!(self, ContentSource::Generated { .. })
    }
}

/// Composite result returned by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReport {
    pub city: String,
    pub insight: AirQualityInsight,
    pub forecast: Vec<ForecastPoint>,
    pub health_impact: HealthImpact,
    pub source: ContentSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_accepts_legacy_aliases() {
        let up: Trend = serde_json::from_str("\"up\"").unwrap();
        let down: Trend = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(up, Trend::Rising);
        assert_eq!(down, Trend::Falling);
        assert_eq!("Stable".parse::<Trend>().unwrap(), Trend::Stable);
        assert!("sideways".parse::<Trend>().is_err());
    }

    #[test]
    fn test_cache_key_ignores_trend_and_samples() {
        let a = CityMetric::new("Tokyo", 55, Trend::Stable);
        let b = CityMetric::new("Tokyo", 55, Trend::Rising).with_samples(vec![50, 55]);
        assert_eq!(a.cache_key(), "combined-Tokyo-55");
        assert_eq!(a.cache_key(), b.cache_key());
    }
}
