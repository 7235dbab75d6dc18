use crate::analysis::AnalysisClient;
use crate::cache::ResponseCache;
use crate::config::InsightConfig;
use crate::fallback;
use crate::forecast::ForecastSynthesizer;
use crate::inflight::InFlightRegistry;
use crate::types::{
    AirQualityInsight, AirQualityReport, CityMetric, ContentSource, ForecastPoint, HealthImpact,
};
use std::sync::Arc;

use self::failover::FailoverController;
use self::metrics::MetricsSnapshot;
use self::provider_registry::default_providers;

pub mod circuit_breaker;
pub mod failover;
pub mod metrics;
pub mod provider_registry;

/// One remote provider and its position in the failover order
pub struct ProviderConfig {
    pub id: String,
    pub priority: u8,
    pub client: AnalysisClient,
}

struct Inner {
    cache: ResponseCache<AirQualityReport>,
    in_flight: InFlightRegistry<AirQualityReport>,
    forecaster: ForecastSynthesizer,
    failover: FailoverController,
}

/// Single entry point for insight, forecast and health-impact data.
///
/// Every call resolves: cached report, then a coalesced in-flight request,
/// then providers in order, then templated content. Clones share state.
#[derive(Clone)]
pub struct AirQualityOrchestrator {
    inner: Arc<Inner>,
}

impl AirQualityOrchestrator {
    pub fn new(config: &InsightConfig) -> Self {
        let providers = default_providers(config);
        Self::with_providers(config, providers)
    }

    pub fn with_providers(config: &InsightConfig, providers: Vec<ProviderConfig>) -> Self {
        let failover = FailoverController::new(
            providers,
            config.ai_enabled,
            config.max_provider_failures,
            config.provider_cooldown(),
        );

        tracing::info!(
            "Orchestrator initialized: providers={:?}, ai_enabled={}, cache_ttl={}s",
            failover.provider_ids(),
            failover.is_enabled(),
            config.cache_ttl_secs
        );

        Self {
            inner: Arc::new(Inner {
                cache: ResponseCache::new(config.cache_ttl()),
                in_flight: InFlightRegistry::new(),
                forecaster: ForecastSynthesizer::new(config.forecast_jitter, config.forecast_seed),
                failover,
            }),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&InsightConfig::from_env())
    }

    /// Insight, 72-hour forecast and health impact for one city.
    pub async fn get_all(&self, metric: &CityMetric) -> AirQualityReport {
        let key = metric.cache_key();

        if let Some(report) = self.inner.cache.get(&key) {
            self.inner.failover.metrics().record_cache_hit();
            return report;
        }

        let inner = Arc::clone(&self.inner);
        let producer_metric = metric.clone();
        let producer_key = key.clone();

        self.inner
            .in_flight
            .run(
                &key,
                move || async move { inner.produce(&producer_key, &producer_metric).await },
                || self.inner.templated_report(metric),
            )
            .await
    }

    pub async fn get_insight(&self, metric: &CityMetric) -> AirQualityInsight {
        self.get_all(metric).await.insight
    }

    pub async fn get_forecast(&self, metric: &CityMetric) -> Vec<ForecastPoint> {
        self.get_all(metric).await.forecast
    }

    pub async fn get_health_impact(&self, metric: &CityMetric) -> HealthImpact {
        self.get_all(metric).await.health_impact
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.failover.metrics_snapshot()
    }

    pub fn failover(&self) -> &FailoverController {
        &self.inner.failover
    }

    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    pub fn reset_providers(&self) {
        self.inner.failover.reset_all();
    }
}

impl Inner {
    async fn produce(&self, key: &str, metric: &CityMetric) -> AirQualityReport {
        // A producer that finished between our cache miss and registration
        // has already stored this key.
        if let Some(report) = self.cache.get(key) {
            return report;
        }

        let forecast = self.forecaster.synthesize(metric.aqi, &metric.recent_samples);

        let (analysis, source) = match self.failover.analyze(metric).await {
            Some((analysis, provider)) => (analysis, ContentSource::Generated { provider }),
            None => (
                fallback::static_analysis(&metric.city, metric.aqi, metric.trend),
                ContentSource::Templated,
            ),
        };

        tracing::info!(
            "Serving {} content for {} (aqi={})",
            if source.is_generated() { "generated" } else { "templated" },
            metric.city,
            metric.aqi
        );
        self.failover.metrics().record_report(source.is_generated());

        let report = AirQualityReport {
            city: metric.city.clone(),
            insight: analysis.insight,
            forecast,
            health_impact: analysis.health_impact,
            source,
        };

        self.cache.put(key, report.clone());
        report
    }

    /// Used only if a producer task dies; not cached.
    fn templated_report(&self, metric: &CityMetric) -> AirQualityReport {
        let analysis = fallback::static_analysis(&metric.city, metric.aqi, metric.trend);
        AirQualityReport {
            city: metric.city.clone(),
            insight: analysis.insight,
            forecast: self.forecaster.synthesize(metric.aqi, &metric.recent_samples),
            health_impact: analysis.health_impact,
            source: ContentSource::Templated,
        }
    }
}
