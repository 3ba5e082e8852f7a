//! # Payload Delivery
//!
//! The orchestrator hands each signed payload to a [`DeliveryTarget`]. Two
//! implementations exist: the embedded receiver, which runs the destination
//! side in-process (verify, allow-list, snapshot upsert), and an HTTP target
//! that POSTs the wire body to the site's destination URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::signer;
use super::store::SyncStore;
use crate::models::site;

/// Wire body delivered to a destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// Collapsed content object for the destination
    pub payload: JsonValue,
    /// Hex HMAC-SHA256 of the payload's canonical encoding
    pub signature: String,
    /// Destination tag (the site's slug)
    pub campaign: String,
}

/// Acknowledgment returned by a destination on success.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire response body from a destination receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverWireResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Delivery failure taxonomy, mirroring the receiver's status codes.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Malformed delivery request (missing field, campaign outside the allow-list)
    #[error("invalid delivery request: {0}")]
    Validation(String),
    /// No destination is registered under the given tag
    #[error("unknown destination '{0}'")]
    UnknownDestination(String),
    /// The destination rejected the signature
    #[error("signature rejected for destination '{0}'")]
    Unauthorized(String),
    /// The destination or transport failed
    #[error("destination failure: {0}")]
    Upstream(String),
    /// The receiver itself faulted while handling the request
    #[error("receiver fault: {0}")]
    Internal(String),
}

/// Destination-side acceptance of a signed payload.
#[async_trait]
pub trait DeliveryTarget: Send + Sync {
    async fn deliver(
        &self,
        site: &site::Model,
        envelope: &DeliveryEnvelope,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// In-process destination receiver.
///
/// Implements the same semantics the HTTP receiver endpoint exposes: the
/// campaign must be allow-listed, the signature must verify against the
/// destination's copy of the secret, and an accepted payload overwrites the
/// site's snapshot.
pub struct EmbeddedReceiver {
    store: Arc<dyn SyncStore>,
    allowed_destinations: Vec<String>,
}

impl EmbeddedReceiver {
    pub fn new(store: Arc<dyn SyncStore>, allowed_destinations: Vec<String>) -> Self {
        Self {
            store,
            allowed_destinations,
        }
    }

    /// Accept one delivery. Shared by the in-process delivery target and the
    /// HTTP receiver endpoint.
    pub async fn accept(
        &self,
        envelope: &DeliveryEnvelope,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if !self
            .allowed_destinations
            .iter()
            .any(|allowed| allowed == &envelope.campaign)
        {
            return Err(DeliveryError::Validation(format!(
                "Invalid campaign. Must be one of: {}",
                self.allowed_destinations.join(", ")
            )));
        }

        let site = self
            .store
            .find_site_by_slug(&envelope.campaign)
            .await
            .map_err(|e| DeliveryError::Internal(e.to_string()))?
            .ok_or_else(|| DeliveryError::UnknownDestination(envelope.campaign.clone()))?;

        if !signer::verify(
            &envelope.payload,
            &site.destination_secret,
            &envelope.signature,
        ) {
            warn!(campaign = %envelope.campaign, "Delivery rejected: signature verification failed");
            return Err(DeliveryError::Unauthorized(envelope.campaign.clone()));
        }

        let item_count = envelope
            .payload
            .get("items")
            .and_then(|items| items.as_array())
            .map(|items| items.len())
            .unwrap_or(0) as i32;

        self.store
            .upsert_snapshot(site.id, envelope.payload.clone(), item_count)
            .await
            .map_err(|e| DeliveryError::Internal(e.to_string()))?;

        info!(
            campaign = %envelope.campaign,
            site_id = %site.id,
            item_count,
            "Delivery accepted"
        );

        Ok(DeliveryReceipt {
            message: format!("Content synced to {}", envelope.campaign),
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl DeliveryTarget for EmbeddedReceiver {
    async fn deliver(
        &self,
        _site: &site::Model,
        envelope: &DeliveryEnvelope,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        self.accept(envelope).await
    }
}

/// HTTP delivery target POSTing the wire body to each site's destination URL.
pub struct HttpDeliveryTarget {
    client: reqwest::Client,
}

impl HttpDeliveryTarget {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for HttpDeliveryTarget {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() > 200 {
        let truncated: String = body.chars().take(200).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}

#[async_trait]
impl DeliveryTarget for HttpDeliveryTarget {
    async fn deliver(
        &self,
        site: &site::Model,
        envelope: &DeliveryEnvelope,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        debug!(
            site_id = %site.id,
            destination_url = %site.destination_url,
            "Delivering payload over HTTP"
        );

        let response = self
            .client
            .post(&site.destination_url)
            .json(envelope)
            .send()
            .await
            .map_err(|e| DeliveryError::Upstream(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let wire: Option<ReceiverWireResponse> = serde_json::from_str(&body).ok();
            let (message, timestamp) = wire
                .map(|w| (w.message, w.timestamp))
                .unwrap_or((None, None));

            return Ok(DeliveryReceipt {
                message: message
                    .unwrap_or_else(|| format!("Content synced to {}", envelope.campaign)),
                timestamp: timestamp.unwrap_or_else(Utc::now),
            });
        }

        match status.as_u16() {
            400 => Err(DeliveryError::Validation(truncate_body(&body))),
            401 => Err(DeliveryError::Unauthorized(site.slug.clone())),
            404 => Err(DeliveryError::UnknownDestination(site.slug.clone())),
            _ => Err(DeliveryError::Upstream(format!(
                "destination returned status {}: {}",
                status,
                truncate_body(&body)
            ))),
        }
    }
}
