//! Client for the external push gateway.
//!
//! The gateway is an opaque, fallible collaborator: it receives a device token
//! plus a fixed notification envelope and answers with an optional delivery
//! receipt. Every call is bounded by the configured timeout, and timeouts and
//! transport faults get one jittered retry; a rejection is final.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PushGatewayConfig;

const MAX_SEND_ATTEMPTS: u32 = 2;
const RETRY_JITTER_MS: std::ops::Range<u64> = 50..250;

/// Fixed notification envelope: the alert text is the notification message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushPayload {
    pub alert: String,
}

impl PushPayload {
    pub fn from_message(message: &str) -> Self {
        Self {
            alert: message.to_string(),
        }
    }
}

/// Acknowledgment from the gateway. Accepted, not necessarily delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Gateway timed out after {0}ms")]
    Timeout(u64),
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gateway rejected the notification ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl PushError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PushError::Timeout(_) | PushError::Transport(_))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        device_token: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, PushError>;
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    to: &'a str,
    notification: &'a PushPayload,
}

#[derive(Deserialize)]
struct GatewayResponse {
    id: Option<String>,
}

/// Gateway client over HTTP.
///
/// Safe to share across requests: the underlying `reqwest::Client` pools
/// connections and is designed for concurrent use.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpPushGateway {
    pub fn new(config: &PushGatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        }
    }

    async fn attempt(
        &self,
        device_token: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, PushError> {
        let request = GatewayRequest {
            to: device_token,
            notification: payload,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PushError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    PushError::Transport(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(PushError::Transport)?;

        if !status.is_success() {
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // Receipt ids are optional; an unparseable success body is still a success.
        let id = serde_json::from_str::<GatewayResponse>(&body)
            .ok()
            .and_then(|r| r.id);

        Ok(DeliveryReceipt { id })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(
        &self,
        device_token: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, PushError> {
        let mut attempt = 1;
        loop {
            match self.attempt(device_token, payload).await {
                Ok(receipt) => return Ok(receipt),
                Err(err) if err.is_retryable() && attempt < MAX_SEND_ATTEMPTS => {
                    tracing::warn!(error = %err, attempt, "push attempt failed, retrying");
                    let delay = rand::thread_rng().gen_range(RETRY_JITTER_MS);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
