//! HTTP transport to the sync server.

use chrono::SecondsFormat;
use till_engine::{ChangeSet, PullResponse, PushReceipt, Timestamp};

use crate::config::ClientConfig;
use crate::error::TransportError;

/// The two wire calls a sync cycle makes.
#[allow(async_fn_in_trait)]
pub trait SyncTransport {
    /// POST the device's changes, every entity type present.
    async fn push(&self, changes: &ChangeSet) -> Result<PushReceipt, TransportError>;

    /// GET changes since the watermark; `None` asks for everything.
    async fn pull(&self, since: Option<Timestamp>) -> Result<PullResponse, TransportError>;
}

/// Transport over HTTP with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the configured server.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    fn classify(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(e)
        }
    }
}

impl SyncTransport for HttpTransport {
    async fn push(&self, changes: &ChangeSet) -> Result<PushReceipt, TransportError> {
        let url = format!("{}/api/sync/push", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(changes)
            .send()
            .await
            .map_err(Self::classify)?;

        read_json(response).await
    }

    async fn pull(&self, since: Option<Timestamp>) -> Result<PullResponse, TransportError> {
        let url = format!("{}/api/sync/pull", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(since) = since {
            // Same RFC 3339 form the records themselves use on the wire.
            request = request.query(&[("since", since.to_rfc3339_opts(SecondsFormat::AutoSi, true))]);
        }
        let response = request.send().await.map_err(Self::classify)?;

        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))
}
