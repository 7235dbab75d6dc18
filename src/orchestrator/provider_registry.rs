use super::ProviderConfig;
use crate::analysis::llm::{GeminiAdapter, GeminiTransport, GroqAdapter};
use crate::analysis::AnalysisClient;
use crate::config::InsightConfig;

pub const GEMINI_ID: &str = "gemini";
pub const GROQ_ID: &str = "groq";

/// Providers in priority order: Gemini first, then Groq. A provider without
/// credentials is left out (the proxy holds Gemini's key itself).
pub fn default_providers(config: &InsightConfig) -> Vec<ProviderConfig> {
    let mut providers = Vec::new();
    let timeout = config.request_timeout();

    let gemini_transport = if config.use_proxy {
        Some(GeminiTransport::Proxy {
            url: config.proxy_url.clone(),
        })
    } else {
        config.gemini_api_key.clone().map(|api_key| GeminiTransport::Direct {
            api_key,
            base_url: crate::analysis::llm::gemini::GEMINI_BASE_URL.to_string(),
        })
    };

    if let Some(transport) = gemini_transport {
        providers.push(ProviderConfig {
            id: GEMINI_ID.to_string(),
            priority: 1,
            client: AnalysisClient::new(Box::new(GeminiAdapter::new(
                transport,
                config.gemini_model.clone(),
                config.generation,
                timeout,
            ))),
        });
        tracing::info!("Gemini provider loaded (proxy={})", config.use_proxy);
    }

    if let Some(key) = config.groq_api_key.clone() {
        providers.push(ProviderConfig {
            id: GROQ_ID.to_string(),
            priority: 2,
            client: AnalysisClient::new(Box::new(GroqAdapter::new(
                key,
                config.groq_model.clone(),
                config.generation,
                timeout,
            ))),
        });
        tracing::info!("Groq provider loaded");
    }

    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_no_providers() {
        assert!(default_providers(&InsightConfig::default()).is_empty());
    }

    #[test]
    fn test_priority_order() {
        let config = InsightConfig {
            gemini_api_key: Some("g".to_string()),
            groq_api_key: Some("q".to_string()),
            ..InsightConfig::default()
        };
        let providers = default_providers(&config);
        let ids: Vec<_> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![GEMINI_ID, GROQ_ID]);
    }

    #[test]
    fn test_proxy_does_not_need_key() {
        let config = InsightConfig {
            use_proxy: true,
            ..InsightConfig::default()
        };
        let providers = default_providers(&config);
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, GEMINI_ID);
    }
}
