use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::core::rates::{RateFetcher, RateSnapshot};
use crate::core::region::regions_for;

/// Fetches the latest rates for a base currency from exchangerate-api.com (v6).
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    time_last_update_unix: Option<i64>,
    conversion_rates: Option<BTreeMap<String, f64>>,
}

#[async_trait]
impl RateFetcher for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn fetch_snapshot(&self, base: &str) -> Result<RateSnapshot> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key configured for the exchange rate provider"))?;

        let url = format!("{}/v6/{}/latest/{}", self.base_url, api_key, base);
        debug!("Requesting rates from {}", self.base_url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if data.result != "success" {
            return Err(anyhow!(
                "API error: {} for base currency: {}",
                data.error_type.as_deref().unwrap_or("unknown"),
                base
            ));
        }

        let rates = data
            .conversion_rates
            .filter(|r| !r.is_empty())
            .ok_or_else(|| anyhow!("No rate data found for base currency: {}", base))?;
        let region_by_code = regions_for(rates.keys().map(String::as_str));

        Ok(RateSnapshot {
            base_currency: data.base_code.unwrap_or_else(|| base.to_string()),
            rates,
            fetched_at: data.time_last_update_unix.unwrap_or_default(),
            region_by_code,
        })
    }
}
