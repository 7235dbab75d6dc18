use crate::analysis::GenerationParams;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = crate::analysis::llm::gemini::DEFAULT_MODEL;
pub const DEFAULT_GROQ_MODEL: &str = crate::analysis::llm::groq::DEFAULT_MODEL;
pub const DEFAULT_PROXY_URL: &str = "http://localhost:8888/.netlify/functions/gemini-proxy";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_MAX_PROVIDER_FAILURES: u32 = 2;
pub const DEFAULT_PROVIDER_COOLDOWN_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_FORECAST_JITTER: f64 = 0.05;

/// Runtime configuration for the insight orchestrator. Every field has a
/// default, so partial JSON and a bare environment both load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub ai_enabled: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub use_proxy: bool,
    pub proxy_url: String,
    pub cache_ttl_secs: u64,
    pub max_provider_failures: u32,
    pub provider_cooldown_secs: u64,
    pub request_timeout_secs: u64,
    pub generation: GenerationParams,
    pub forecast_jitter: f64,
    pub forecast_seed: Option<u64>,
    pub openaq_api_key: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            use_proxy: false,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_provider_failures: DEFAULT_MAX_PROVIDER_FAILURES,
            provider_cooldown_secs: DEFAULT_PROVIDER_COOLDOWN_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            generation: GenerationParams::default(),
            forecast_jitter: DEFAULT_FORECAST_JITTER,
            forecast_seed: None,
            openaq_api_key: None,
        }
    }
}

impl InsightConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values fall back
    /// to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let generation = GenerationParams {
            temperature: parse_or(
                get("AQI_TEMPERATURE"),
                "AQI_TEMPERATURE",
                defaults.generation.temperature,
            ),
            max_output_tokens: parse_or(
                get("AQI_MAX_OUTPUT_TOKENS"),
                "AQI_MAX_OUTPUT_TOKENS",
                defaults.generation.max_output_tokens,
            ),
        };

        let config = Self {
            ai_enabled: get("AQI_AI_ENABLED").map_or(true, |v| !is_disabled_flag(&v)),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get("GROQ_MODEL").unwrap_or(defaults.groq_model),
            use_proxy: get("AQI_USE_PROXY").map_or(false, |v| is_enabled_flag(&v)),
            proxy_url: get("AQI_PROXY_URL").unwrap_or(defaults.proxy_url),
            cache_ttl_secs: parse_or(
                get("AQI_CACHE_TTL_SECS"),
                "AQI_CACHE_TTL_SECS",
                defaults.cache_ttl_secs,
            ),
            max_provider_failures: parse_or(
                get("AQI_MAX_PROVIDER_FAILURES"),
                "AQI_MAX_PROVIDER_FAILURES",
                defaults.max_provider_failures,
            )
            .max(1),
            provider_cooldown_secs: parse_or(
                get("AQI_PROVIDER_COOLDOWN_SECS"),
                "AQI_PROVIDER_COOLDOWN_SECS",
                defaults.provider_cooldown_secs,
            ),
            request_timeout_secs: parse_or(
                get("AQI_REQUEST_TIMEOUT_SECS"),
                "AQI_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            generation,
            forecast_jitter: parse_or(
                get("AQI_FORECAST_JITTER"),
                "AQI_FORECAST_JITTER",
                defaults.forecast_jitter,
            ),
            forecast_seed: get("AQI_FORECAST_SEED").and_then(|v| match v.parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    tracing::warn!("Ignoring invalid AQI_FORECAST_SEED '{}'", v);
                    None
                }
            }),
            openaq_api_key: get("OPENAQ_API_KEY"),
        };

        tracing::debug!(
            "Config loaded: ai_enabled={}, gemini={}, groq={}, proxy={}, cache_ttl={}s",
            config.ai_enabled,
            config.gemini_api_key.is_some(),
            config.groq_api_key.is_some(),
            config.use_proxy,
            config.cache_ttl_secs
        );

        config
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn provider_cooldown(&self) -> Duration {
        Duration::from_secs(self.provider_cooldown_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}='{}', using default {:?}", name, value, default);
            default
        }),
    }
}

fn is_disabled_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "false" | "0" | "off" | "no")
}

fn is_enabled_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> InsightConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        InsightConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), InsightConfig::default());
    }

    #[test]
    fn test_ai_enabled_only_disabled_explicitly() {
        assert!(config_from(&[("AQI_AI_ENABLED", "yes please")]).ai_enabled);
        assert!(!config_from(&[("AQI_AI_ENABLED", "false")]).ai_enabled);
        assert!(!config_from(&[("AQI_AI_ENABLED", "OFF")]).ai_enabled);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[
            ("AQI_CACHE_TTL_SECS", "ten minutes"),
            ("AQI_MAX_PROVIDER_FAILURES", "0"),
            ("AQI_FORECAST_SEED", "abc"),
            ("AQI_TEMPERATURE", "0.2"),
        ]);
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.max_provider_failures, 1);
        assert_eq!(config.forecast_seed, None);
        assert_eq!(config.generation.temperature, 0.2);
    }

    #[test]
    fn test_keys_and_proxy() {
        let config = config_from(&[
            ("GEMINI_API_KEY", " gm-key "),
            ("GROQ_API_KEY", ""),
            ("AQI_USE_PROXY", "true"),
        ]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("gm-key"));
        assert_eq!(config.groq_api_key, None);
        assert!(config.use_proxy);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: InsightConfig = serde_json::from_str(r#"{"cache_ttl_secs": 300}"#).unwrap();
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.max_provider_failures, DEFAULT_MAX_PROVIDER_FAILURES);
    }
}
