use crate::config::service_config::AirtableConfig;
use crate::domain::model::{Record, Table};
use crate::domain::ports::RecordFetcher;
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Record fetcher for the Airtable REST API:
/// `GET <base>/<space>/<Table>/<recordId>` with bearer auth.
#[derive(Clone)]
pub struct AirtableClient {
    space_url: Url,
    api_key: String,
    client: Client,
}

impl fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableClient")
            .field("space_url", &self.space_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Result<Self> {
        let invalid_base = |reason: String| ServiceError::InvalidConfigValueError {
            field: "airtable.api_base_url".to_string(),
            value: config.api_base_url.clone(),
            reason,
        };

        let mut space_url =
            Url::parse(&config.api_base_url).map_err(|e| invalid_base(e.to_string()))?;
        space_url
            .path_segments_mut()
            .map_err(|_| invalid_base("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&config.space_id);

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            space_url,
            api_key: config.api_key.clone(),
            client: builder.build()?,
        })
    }

    /// URL of one record. Table names and ids are pushed as single path
    /// segments, so spaces become `%20` and a `/` in an id stays inside it.
    pub fn record_url(&self, table: Table, id: &str) -> Url {
        let mut url = self.space_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(table.as_str()).push(id);
        }
        url
    }
}

#[async_trait]
impl RecordFetcher for AirtableClient {
    async fn fetch(&self, table: Table, id: &str) -> Result<Record> {
        if id.trim().is_empty() {
            return Err(ServiceError::BadRequest {
                message: format!("{} record id cannot be empty", table),
            });
        }

        let url = self.record_url(table, id);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::RecordNotFound {
                table,
                id: id.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::UpstreamStatusError {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Record>(&body).map_err(|e| ServiceError::MalformedRecordError {
            message: format!("{} record {}: {}", table, id, e),
        })
    }
}
