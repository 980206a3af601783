use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::{RawMonthRecord, School};
use crate::month::MonthKey;
use crate::records::parse_schools;
use crate::window::Window;

/// Remote reads the aggregator depends on. Payloads are returned untouched.
#[async_trait]
pub trait WellnessSource: Send + Sync {
    async fn wellness(&self, school_id: &str, month: MonthKey) -> Result<Value, SourceError>;

    async fn schools(&self) -> Result<Value, SourceError>;
}

/// Reads the PHP wellness backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWellnessSource {
    client: Client,
    endpoint: String,
    wellness_path: String,
    schools_path: String,
}

impl HttpWellnessSource {
    pub fn builder() -> HttpWellnessSourceBuilder {
        HttpWellnessSourceBuilder::default()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, SourceError> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl WellnessSource for HttpWellnessSource {
    async fn wellness(&self, school_id: &str, month: MonthKey) -> Result<Value, SourceError> {
        let month = month.to_string();
        let url = self.url(&self.wellness_path);
        self.get_json(&url, &[("school_id", school_id), ("month", month.as_str())])
            .await
    }

    async fn schools(&self) -> Result<Value, SourceError> {
        let url = self.url(&self.schools_path);
        self.get_json(&url, &[]).await
    }
}

#[derive(Debug, Default)]
pub struct HttpWellnessSourceBuilder {
    endpoint: Option<String>,
    wellness_path: Option<String>,
    schools_path: Option<String>,
    timeout: Option<Duration>,
}

impl HttpWellnessSourceBuilder {
    /// Base URL of the backend API (e.g., "http://localhost/wellness-backend/api").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn wellness_path(mut self, path: impl Into<String>) -> Self {
        self.wellness_path = Some(path.into());
        self
    }

    pub fn schools_path(mut self, path: impl Into<String>) -> Self {
        self.schools_path = Some(path.into());
        self
    }

    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpWellnessSource, SourceError> {
        let mut client = Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(HttpWellnessSource {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost/wellness-backend/api".to_string()),
            wellness_path: self
                .wellness_path
                .unwrap_or_else(|| "get_wellness.php".to_string()),
            schools_path: self
                .schools_path
                .unwrap_or_else(|| "get_schools.php".to_string()),
        })
    }
}

/// Turns remote reads into records. Failures degrade to empty records.
#[derive(Clone)]
pub struct WellnessFetcher {
    source: Arc<dyn WellnessSource>,
}

impl WellnessFetcher {
    pub fn new(source: Arc<dyn WellnessSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, school_id: &str, month: MonthKey) -> RawMonthRecord {
        match self.source.wellness(school_id, month).await {
            Ok(payload) => {
                if !payload.is_array() {
                    warn!(school_id, %month, "wellness payload is not a list, treating as empty");
                }
                let record = RawMonthRecord::from_json(&payload);
                debug!(school_id, %month, entries = record.entries.len(), "fetched wellness month");
                record
            }
            Err(err) => {
                warn!(school_id, %month, error = %err, "wellness fetch failed, treating as empty");
                RawMonthRecord::default()
            }
        }
    }

    /// Fetches every month of `window` concurrently and waits for all of them.
    pub async fn fetch_window(
        &self,
        school_id: &str,
        window: &Window,
    ) -> BTreeMap<MonthKey, RawMonthRecord> {
        let months = window.months();
        let records = join_all(months.iter().map(|&month| self.fetch(school_id, month))).await;
        months.into_iter().zip(records).collect()
    }

    pub async fn schools(&self) -> Result<Vec<School>, SourceError> {
        let payload = self.source.schools().await?;
        Ok(parse_schools(&payload))
    }
}
