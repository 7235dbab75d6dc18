use super::circuit_breaker::{CircuitBreaker, CircuitState};
use super::metrics::{Metrics, MetricsSnapshot};
use super::ProviderConfig;
use crate::types::{AiAnalysis, CityMetric};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct ProviderSlot {
    config: ProviderConfig,
    breaker: Mutex<CircuitBreaker>,
}

impl ProviderSlot {
    fn breaker(&self) -> MutexGuard<'_, CircuitBreaker> {
        self.breaker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tries providers in priority order and demotes the ones that keep failing.
/// `None` from [`FailoverController::analyze`] means the caller should serve
/// templated content.
pub struct FailoverController {
    slots: Vec<ProviderSlot>,
    enabled: bool,
    metrics: Mutex<Metrics>,
}

impl FailoverController {
    pub fn new(
        mut providers: Vec<ProviderConfig>,
        enabled: bool,
        max_failures: u32,
        cooldown: Duration,
    ) -> Self {
        providers.sort_by_key(|p| p.priority);

        let slots = providers
            .into_iter()
            .map(|config| ProviderSlot {
                config,
                breaker: Mutex::new(CircuitBreaker::new(max_failures, cooldown)),
            })
            .collect();

        Self {
            slots,
            enabled,
            metrics: Mutex::new(Metrics::new()),
        }
    }

    pub async fn analyze(&self, metric: &CityMetric) -> Option<(AiAnalysis, String)> {
        if !self.enabled {
            tracing::info!("AI disabled, skipping providers for {}", metric.city);
            return None;
        }

        for (index, slot) in self.slots.iter().enumerate() {
            let id = slot.config.id.as_str();

            if !slot.breaker().is_request_allowed() {
                tracing::debug!("Provider {} skipped: demoted after repeated failures", id);
                continue;
            }

            tracing::info!(
                "Attempting provider: {} (priority {}) for {}",
                id,
                slot.config.priority,
                metric.city
            );

            match slot.config.client.request(metric).await {
                Ok(analysis) => {
                    slot.breaker().record_success();
                    self.restore_demoted(index);
                    self.metrics().record_success(id);
                    tracing::info!("Provider {} succeeded for {}", id, metric.city);
                    return Some((analysis, id.to_string()));
                }
                Err(e) => {
                    let failures = {
                        let mut breaker = slot.breaker();
                        breaker.record_failure();
                        breaker.failure_count()
                    };
                    self.metrics().record_failure(id);
                    tracing::warn!(
                        "Provider {} failed ({} consecutive, status={:?}): {}",
                        id,
                        failures,
                        e.status(),
                        e
                    );
                }
            }
        }

        tracing::warn!("All providers unavailable for {}", metric.city);
        None
    }

    /// A success anywhere makes every demoted provider eligible again.
    fn restore_demoted(&self, winner: usize) {
        for (index, slot) in self.slots.iter().enumerate() {
            if index == winner {
                continue;
            }

            let mut breaker = slot.breaker();
            if breaker.state() != CircuitState::Closed {
                breaker.reset();
                tracing::info!(
                    "Provider {} restored after {} succeeded",
                    slot.config.id,
                    self.slots[winner].config.id
                );
            }
        }
    }

    /// Clear one provider's failure state. Returns false for unknown ids.
    pub fn reset(&self, provider_id: &str) -> bool {
        match self.slots.iter().find(|s| s.config.id == provider_id) {
            Some(slot) => {
                slot.breaker().reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&self) {
        for slot in &self.slots {
            slot.breaker().reset();
        }
    }

    pub fn consecutive_failures(&self, provider_id: &str) -> Option<u32> {
        self.slots
            .iter()
            .find(|s| s.config.id == provider_id)
            .map(|s| s.breaker().failure_count())
    }

    pub fn provider_ids(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.config.id.clone()).collect()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn metrics(&self) -> MutexGuard<'_, Metrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics().snapshot()
    }
}
