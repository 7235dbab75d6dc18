// src/openaq.rs
// Latest PM2.5 readings from OpenAQ, converted to AQI

use crate::aqi::pm25_to_aqi;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const OPENAQ_BASE_URL: &str = "https://api.openaq.org";

#[derive(Debug, Error)]
pub enum OpenAqError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("OpenAQ returned HTTP {0}")]
    Http(u16),

    #[error("Invalid OpenAQ response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityReading {
    pub aqi: u32,
    pub pm25: f64,
    pub last_updated: String,
}

#[derive(Deserialize)]
struct LatestResponse {
    #[serde(default)]
    results: Vec<LocationResult>,
}

#[derive(Deserialize)]
struct LocationResult {
    #[serde(default)]
    measurements: Vec<Measurement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Measurement {
    parameter: String,
    value: f64,
    last_updated: String,
}

pub struct OpenAqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAqClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: OPENAQ_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Most recent PM2.5 reading for `city`, or `None` if OpenAQ has none.
    pub async fn latest_reading(&self, city: &str) -> Result<Option<CityReading>, OpenAqError> {
        let url = format!("{}/v2/latest", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .query(&[("city", city), ("parameter", "pm25"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| OpenAqError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OpenAqError::Http(response.status().as_u16()));
        }

        let body: LatestResponse = response
            .json()
            .await
            .map_err(|e| OpenAqError::InvalidResponse(e.to_string()))?;

        let reading = body
            .results
            .into_iter()
            .next()
            .and_then(|r| r.measurements.into_iter().find(|m| m.parameter == "pm25"))
            .map(|m| CityReading {
                aqi: pm25_to_aqi(m.value),
                pm25: m.value,
                last_updated: m.last_updated,
            });

        Ok(reading)
    }

    /// Fetch several cities concurrently. Cities without data or whose
    /// request failed are left out.
    pub async fn latest_readings(&self, cities: &[String]) -> HashMap<String, CityReading> {
        let lookups = cities.iter().map(|city| async move {
            match self.latest_reading(city).await {
                Ok(reading) => reading.map(|r| (city.clone(), r)),
                Err(e) => {
                    tracing::warn!("OpenAQ lookup failed for {}: {}", city, e);
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}
