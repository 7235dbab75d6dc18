// analysis/mod.rs
// Provider client: prompt → remote generation → validated analysis

mod extract;
pub mod llm;
mod prompt;
mod types;

pub use extract::{first_json_object, parse_analysis};
pub use llm::LLMAdapter;
pub use prompt::build_prompt;
pub use types::{GenerationParams, LLMError};

use crate::aqi::color_for_aqi;
use crate::types::{AiAnalysis, CityMetric};

/// Wraps one text-generation backend. No retries here; failover is the
/// caller's job.
pub struct AnalysisClient {
    adapter: Box<dyn LLMAdapter>,
}

impl AnalysisClient {
    pub fn new(adapter: Box<dyn LLMAdapter>) -> Self {
        Self { adapter }
    }

    pub fn name(&self) -> &str {
        self.adapter.name()
    }

    pub async fn request(&self, metric: &CityMetric) -> Result<AiAnalysis, LLMError> {
        let prompt = build_prompt(metric);

        tracing::debug!(
            "{}: requesting analysis for {} (aqi={}, {} chars)",
            self.name(),
            metric.city,
            metric.aqi,
            prompt.len()
        );

        let text = self.adapter.generate(&prompt).await?;
        let mut analysis = parse_analysis(&text)?;

        // Card colors always follow the AQI band, whatever the model sent
        let color = color_for_aqi(metric.aqi);
        let impact = &mut analysis.health_impact;
        impact.respiratory_risk.color = color.to_string();
        impact.visibility.color = color.to_string();
        impact.outdoor_activity.color = color.to_string();

        Ok(analysis)
    }
}
