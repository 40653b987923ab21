//! Measurement API Client
//!
//! reqwest-backed implementation of `EmissionsFetcher`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{EmissionsFetcher, FetchError};
use crate::config::Config;
use crate::models::{EmissionRecord, MeasureRow};

/// Default endpoint of the measurement API
pub const DEFAULT_MEASURE_URL: &str =
    "https://api.scope3.com/v2/measure?includeRows=true&latest=true&fields=emissionsBreakdown";

// == Fetch Defaults ==
/// Context sent with every row; not derived from the inbound request.
#[derive(Debug, Clone)]
struct FetchDefaults {
    country: String,
    channel: String,
    impressions: u32,
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            channel: "web".to_string(),
            impressions: 1000,
        }
    }
}

// == Wire Types ==
#[derive(Debug, Serialize)]
struct UpstreamRequest<'a> {
    rows: Vec<UpstreamRow<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamRow<'a> {
    country: &'a str,
    channel: &'a str,
    impressions: u32,
    inventory_id: &'a str,
    utc_datetime: &'a str,
    row_identifier: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    rows: Vec<UpstreamResultRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamResultRow {
    row_identifier: String,
    total_emissions: f64,
}

// == Measure API Client ==
/// Client for the batched measurement endpoint.
#[derive(Debug, Clone)]
pub struct MeasureApiClient {
    client: Client,
    url: String,
    api_token: String,
    defaults: FetchDefaults,
}

impl MeasureApiClient {
    /// Creates a client with a fixed per-call timeout.
    pub fn new(
        url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_token: api_token.into(),
            defaults: FetchDefaults::default(),
        })
    }

    /// Creates a client from server configuration and the API token.
    pub fn from_config(config: &Config, api_token: impl Into<String>) -> Result<Self, FetchError> {
        Self::new(
            config.api_url.clone(),
            api_token,
            Duration::from_secs(config.fetch_timeout),
        )
    }

    fn build_request<'a>(&'a self, rows: &'a [MeasureRow]) -> UpstreamRequest<'a> {
        UpstreamRequest {
            rows: rows
                .iter()
                .map(|row| UpstreamRow {
                    country: &self.defaults.country,
                    channel: &self.defaults.channel,
                    impressions: self.defaults.impressions,
                    inventory_id: &row.inventory_id,
                    utc_datetime: &row.utc_datetime,
                    row_identifier: &row.inventory_id,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl EmissionsFetcher for MeasureApiClient {
    async fn fetch(&self, rows: &[MeasureRow]) -> Result<Vec<EmissionRecord>, FetchError> {
        let body = self.build_request(rows);
        debug!(rows = rows.len(), url = %self.url, "Requesting emissions");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Failed to get emission data: {}", status);
            return Err(FetchError::Status(status));
        }

        let decoded: UpstreamResponse = response.json().await.map_err(|e| {
            error!("Failed to decode measurement response: {}", e);
            FetchError::Decode(e.to_string())
        })?;

        let records: Vec<EmissionRecord> = decoded
            .rows
            .into_iter()
            .map(|row| EmissionRecord::new(row.row_identifier, row.total_emissions))
            .collect();
        debug!(records = records.len(), "Received emissions");

        Ok(records)
    }
}
