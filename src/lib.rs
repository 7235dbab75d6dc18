pub mod analysis;
pub mod aqi;
pub mod cache;
pub mod config;
pub mod fallback;
pub mod forecast;
pub mod inflight;
pub mod openaq;
pub mod orchestrator;
pub mod types;

pub use aqi::{color_for_aqi, pm25_to_aqi, AqiBand};
pub use config::InsightConfig;
pub use orchestrator::{AirQualityOrchestrator, ProviderConfig};
pub use types::{
    AiAnalysis, AirQualityInsight, AirQualityReport, CityMetric, ContentSource, ForecastPoint,
    FutureProjection, HealthImpact, RiskLevel, Trend, VisibilityLevel,
};
