use serde::Serialize;
use std::collections::HashMap;

pub struct Metrics {
    success_counts: HashMap<String, u64>,
    failure_counts: HashMap<String, u64>,
    generated_reports: u64,
    templated_reports: u64,
    cache_hits: u64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub success_counts: HashMap<String, u64>,
    pub failure_counts: HashMap<String, u64>,
    /// Successes over attempts, for every provider tried at least once
    pub success_rates: HashMap<String, f32>,
    pub generated_reports: u64,
    pub templated_reports: u64,
    pub cache_hits: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            success_counts: HashMap::new(),
            failure_counts: HashMap::new(),
            generated_reports: 0,
            templated_reports: 0,
            cache_hits: 0,
        }
    }

    pub fn record_success(&mut self, provider_id: &str) {
        *self
            .success_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, provider_id: &str) {
        *self
            .failure_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_report(&mut self, generated: bool) {
        if generated {
            self.generated_reports += 1;
        } else {
            self.templated_reports += 1;
        }
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    fn success_rate(&self, provider_id: &str) -> f32 {
        let success = *self.success_counts.get(provider_id).unwrap_or(&0) as f32;
        let failure = *self.failure_counts.get(provider_id).unwrap_or(&0) as f32;
        let total = success + failure;

        if total == 0.0 {
            0.0
        } else {
            success / total
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let success_rates = self
            .success_counts
            .keys()
            .chain(self.failure_counts.keys())
            .map(|id| (id.clone(), self.success_rate(id)))
            .collect();

        MetricsSnapshot {
            success_counts: self.success_counts.clone(),
            success_rates,
            failure_counts: self.failure_counts.clone(),
            generated_reports: self.generated_reports,
            templated_reports: self.templated_reports,
            cache_hits: self.cache_hits,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_success_rates() {
        let mut metrics = Metrics::new();
        assert!(metrics.snapshot().success_rates.is_empty());

        metrics.record_success("gemini");
        metrics.record_success("gemini");
        metrics.record_success("gemini");
        metrics.record_failure("gemini");
        metrics.record_failure("groq");

        let rates = metrics.snapshot().success_rates;
        assert_eq!(rates.get("gemini"), Some(&0.75));
        assert_eq!(rates.get("groq"), Some(&0.0));
        assert_eq!(rates.len(), 2);
    }

    #[test]
    fn test_snapshot_counts_tiers() {
        let mut metrics = Metrics::new();
        metrics.record_report(true);
        metrics.record_report(false);
        metrics.record_report(false);
        metrics.record_cache_hit();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.generated_reports, 1);
        assert_eq!(snapshot.templated_reports, 2);
        assert_eq!(snapshot.cache_hits, 1);
    }
}
