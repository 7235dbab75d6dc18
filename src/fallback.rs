// src/fallback.rs
// Template insight and health impact used when no provider answers.
// Pure function of (city, aqi, trend); no randomness.

use crate::aqi::AqiBand;
use crate::types::{AiAnalysis, AirQualityInsight, HealthImpact, RiskLevel, Trend, VisibilityLevel};

pub const FALLBACK_CONFIDENCE: u8 = 75;

pub fn static_analysis(city: &str, aqi: u32, trend: Trend) -> AiAnalysis {
    AiAnalysis {
        insight: static_insight(city, aqi, trend),
        health_impact: static_health_impact(city, aqi),
    }
}

pub fn static_insight(city: &str, aqi: u32, trend: Trend) -> AirQualityInsight {
    let band = AqiBand::from_aqi(aqi);

    let explanation = format!(
        "{} currently has an AQI of {}, which falls in the {} band. {}",
        city,
        aqi,
        band.label(),
        match band {
            AqiBand::Good | AqiBand::Moderate => {
                "Local emissions are being dispersed well by current weather patterns."
            }
            AqiBand::UnhealthyForSensitive | AqiBand::Unhealthy => {
                "Traffic, industrial emissions and weather patterns are concentrating pollutants."
            }
            AqiBand::VeryUnhealthy | AqiBand::Hazardous => {
                "Heavy emissions combined with stagnant air are trapping fine particulates near ground level."
            }
        }
    );

    let health_advice = match band {
        AqiBand::Good => format!("Air quality in {} is good. Enjoy outdoor activities.", city),
        AqiBand::Moderate => format!(
            "Air quality in {} is acceptable. Unusually sensitive people should consider reducing prolonged outdoor exertion.",
            city
        ),
        AqiBand::UnhealthyForSensitive => format!(
            "In {}, children, older adults and people with respiratory conditions should reduce prolonged outdoor exertion.",
            city
        ),
        AqiBand::Unhealthy => format!(
            "Residents of {} should limit outdoor activities. Keep windows closed and use air purifiers.",
            city
        ),
        AqiBand::VeryUnhealthy => format!(
            "Residents of {} should avoid outdoor exertion and wear a well-fitted N95 mask outside.",
            city
        ),
        AqiBand::Hazardous => format!(
            "Health warning for {}: everyone should stay indoors with windows closed and air purifiers running.",
            city
        ),
    };

    let trend_note = match trend {
        Trend::Rising => format!("Air quality in {} may worsen in the coming hours.", city),
        Trend::Falling => format!("Conditions in {} are expected to improve.", city),
        Trend::Stable => format!("Air quality in {} should remain stable.", city),
    };

    AirQualityInsight {
        explanation,
        health_advice,
        trend: trend_note,
        confidence: FALLBACK_CONFIDENCE,
        future_projection: None,
    }
}

pub fn static_health_impact(city: &str, aqi: u32) -> HealthImpact {
    let band = AqiBand::from_aqi(aqi);
    let color = band.color().to_string();

    let (risk_level, risk_description) = match band {
        AqiBand::Good => (
            "Low",
            format!("Low respiratory risk in {}. Air quality is satisfactory.", city),
        ),
        AqiBand::Moderate => (
            "Low",
            format!("Low respiratory risk in {} for most people. Air quality is acceptable.", city),
        ),
        AqiBand::UnhealthyForSensitive => (
            "Moderate",
            format!(
                "Moderate risk in {}. Sensitive individuals should limit prolonged outdoor exertion.",
                city
            ),
        ),
        AqiBand::Unhealthy => (
            "High",
            format!("High respiratory risk in {}. Sensitive groups should stay indoors.", city),
        ),
        AqiBand::VeryUnhealthy => (
            "Very High",
            format!(
                "Very high respiratory risk in {}. Everyone may experience health effects.",
                city
            ),
        ),
        AqiBand::Hazardous => (
            "Severe",
            format!(
                "Severe respiratory risk in {}. Emergency conditions for the entire population.",
                city
            ),
        ),
    };

    let (visibility, visibility_description) = match band {
        AqiBand::Good => (
            "> 10 km",
            format!("Good visibility in {}. Clear skies expected.", city),
        ),
        AqiBand::Moderate => (
            "> 10 km",
            format!("Good visibility in {}. Light haze possible.", city),
        ),
        AqiBand::UnhealthyForSensitive => (
            "5-10 km",
            format!("Moderate visibility in {}. Some haze may be present.", city),
        ),
        AqiBand::Unhealthy => (
            "< 5 km",
            format!("Poor visibility in {} due to high particulate concentration.", city),
        ),
        AqiBand::VeryUnhealthy => (
            "< 3 km",
            format!("Very poor visibility in {}. Dense smog likely.", city),
        ),
        AqiBand::Hazardous => (
            "< 1 km",
            format!("Extremely poor visibility in {}. Thick smog blankets the city.", city),
        ),
    };

    let (activity_level, activity_description) = match band {
        AqiBand::Good => (
            "Unrestricted",
            format!("Unrestricted outdoor activities in {}. Enjoy the fresh air!", city),
        ),
        AqiBand::Moderate => (
            "Unrestricted",
            format!("Outdoor activities in {} are fine for most people.", city),
        ),
        AqiBand::UnhealthyForSensitive => (
            "Limited",
            format!("Limit outdoor activities in {}. Morning hours are best for exercise.", city),
        ),
        AqiBand::Unhealthy => (
            "Limited",
            format!("Limit strenuous outdoor activities in {}. Move workouts indoors.", city),
        ),
        AqiBand::VeryUnhealthy => (
            "Avoid",
            format!("Avoid outdoor activities in {}. Stay indoors with air purifiers.", city),
        ),
        AqiBand::Hazardous => (
            "Avoid",
            format!("Avoid all outdoor activities in {}. Remain indoors.", city),
        ),
    };

    HealthImpact {
        respiratory_risk: RiskLevel {
            level: risk_level.to_string(),
            description: risk_description,
            color: color.clone(),
        },
        visibility: VisibilityLevel {
            value: visibility.to_string(),
            description: visibility_description,
            color: color.clone(),
        },
        outdoor_activity: RiskLevel {
            level: activity_level.to_string(),
            description: activity_description,
            color,
        },
    }
}
