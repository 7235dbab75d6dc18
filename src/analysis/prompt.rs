// analysis/prompt.rs
// Prompt describing the JSON shape a provider must return

use crate::aqi::color_for_aqi;
use crate::types::CityMetric;

pub fn build_prompt(metric: &CityMetric) -> String {
    let city = &metric.city;
    let aqi = metric.aqi;
    let color = color_for_aqi(aqi);

    format!(
        r#"You are an air quality expert analyzing {city}. Provide analysis in ONE JSON response.

Current Data:
- City: {city}
- Current AQI: {aqi}
- Trend: {trend}

Return ONLY this JSON structure (no markdown, no code blocks):

{{
  "insight": {{
    "explanation": "Why does {city} have an AQI of {aqi}? (2-3 sentences, city-specific)",
    "healthAdvice": "Practical recommendations for {city} residents today",
    "trend": "What to expect in next 24-48 hours for {city}",
    "confidence": 85,
    "futureProjection": {{
      "percentIncrease": 10,
      "reason": "Main driver of the expected change in {city}"
    }}
  }},
  "healthImpact": {{
    "respiratoryRisk": {{
      "level": "Low/Moderate/High/Very High",
      "description": "Respiratory health risks in {city}",
      "color": "{color}"
    }},
    "visibility": {{
      "value": "X km or Good/Fair/Poor",
      "description": "Visibility in {city}",
      "color": "{color}"
    }},
    "outdoorActivity": {{
      "level": "Unrestricted/Limited/Avoid",
      "description": "Activity recommendations for {city}",
      "color": "{color}"
    }}
  }}
}}

Confidence must be an integer between 65 and 95. Return ONLY valid JSON."#,
        city = city,
        aqi = aqi,
        trend = metric.trend,
        color = color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trend;

    #[test]
    fn test_prompt_embeds_subject() {
        let prompt = build_prompt(&CityMetric::new("Mumbai", 158, Trend::Rising));
        assert!(prompt.contains("- City: Mumbai"));
        assert!(prompt.contains("- Current AQI: 158"));
        assert!(prompt.contains("- Trend: rising"));
        assert!(prompt.contains("hsl(0, 84%, 55%)"));
        assert!(prompt.contains("\"healthImpact\": {"));
    }
}
