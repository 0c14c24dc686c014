//! HTTP adapter for the remote detection API

use crate::types::record::Record;
use crate::types::score::ScoreResult;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the remote detection endpoint.
///
/// One POST per record, no retries. Failures never escape: they come back
/// as [`ScoreResult::ApiError`] or [`ScoreResult::ConnectionFailed`].
pub struct RemoteScorer {
    client: reqwest::Client,
    endpoint: String,
    credential: String,
}

enum Reply {
    Accepted(Map<String, Value>),
    Rejected(StatusCode),
}

impl RemoteScorer {
    /// Create a scorer with a per-request timeout
    pub fn new(
        endpoint: impl Into<String>,
        credential: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credential: credential.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Score one record through the API
    pub async fn score(&self, record: &Record) -> ScoreResult {
        match self.send(record).await {
            Ok(Reply::Accepted(fields)) => {
                debug!(endpoint = %self.endpoint, fields = fields.len(), "Detection API scored record");
                ScoreResult::Reported(fields)
            }
            Ok(Reply::Rejected(status)) => {
                warn!(endpoint = %self.endpoint, status = status.as_u16(), "Detection API returned an error status");
                ScoreResult::ApiError {
                    status_code: status.as_u16(),
                }
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(endpoint = %self.endpoint, error = %reason, "Detection API call failed");
                ScoreResult::ConnectionFailed { reason }
            }
        }
    }

    async fn send(&self, record: &Record) -> Result<Reply> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credential)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Reply::Rejected(status));
        }

        let fields = response
            .json::<Map<String, Value>>()
            .await
            .context("Detection API returned a malformed body")?;
        Ok(Reply::Accepted(fields))
    }
}
