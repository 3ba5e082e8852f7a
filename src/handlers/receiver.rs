//! # Destination Receiver Handler
//!
//! Public wire endpoint a destination exposes to accept signed sync
//! deliveries. Validates field presence and the campaign allow-list, verifies
//! the signature against the destination's copy of the site secret, and
//! stores the accepted payload as the site's snapshot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::server::AppState;
use crate::sync::delivery::{DeliveryEnvelope, DeliveryError, ReceiverWireResponse};

/// Incoming sync delivery body; every field is required
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReceiveSyncRequest {
    /// Collapsed content object for the destination
    pub payload: Option<JsonValue>,
    /// Hex HMAC-SHA256 of the payload's canonical encoding
    pub signature: Option<String>,
    /// Destination tag (the site's slug)
    pub campaign: Option<String>,
}

fn failure(error: impl Into<String>, details: Option<String>) -> ReceiverWireResponse {
    ReceiverWireResponse {
        success: false,
        message: None,
        timestamp: None,
        error: Some(error.into()),
        details,
    }
}

/// Receive one signed sync delivery
#[utoipa::path(
    post,
    path = "/receive",
    request_body = ReceiveSyncRequest,
    responses(
        (status = 200, description = "Payload accepted and snapshot stored"),
        (status = 400, description = "Missing field or campaign outside the allow-list"),
        (status = 401, description = "Signature verification failed"),
        (status = 404, description = "No site registered under the campaign tag"),
        (status = 500, description = "Receiver fault while handling the request")
    ),
    tag = "receiver"
)]
pub async fn receive_sync(
    State(state): State<AppState>,
    Json(request): Json<ReceiveSyncRequest>,
) -> (StatusCode, Json<ReceiverWireResponse>) {
    let (Some(payload), Some(signature), Some(campaign)) =
        (request.payload, request.signature, request.campaign)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(failure(
                "Missing required fields: payload, signature, campaign",
                None,
            )),
        );
    };

    let envelope = DeliveryEnvelope {
        payload,
        signature,
        campaign,
    };

    match state.receiver.accept(&envelope).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(ReceiverWireResponse {
                success: true,
                message: Some(receipt.message),
                timestamp: Some(receipt.timestamp),
                error: None,
                details: None,
            }),
        ),
        Err(e) => {
            let status = match &e {
                DeliveryError::Validation(_) => StatusCode::BAD_REQUEST,
                DeliveryError::UnknownDestination(_) => StatusCode::NOT_FOUND,
                DeliveryError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                DeliveryError::Upstream(_) => StatusCode::BAD_GATEWAY,
                DeliveryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            let details = match &e {
                DeliveryError::Internal(details) => Some(details.clone()),
                _ => None,
            };

            let message = match &e {
                DeliveryError::Validation(message) => message.clone(),
                DeliveryError::UnknownDestination(_) => "Site not found".to_string(),
                DeliveryError::Unauthorized(_) => "Invalid signature".to_string(),
                DeliveryError::Upstream(message) => message.clone(),
                DeliveryError::Internal(_) => "Internal server error".to_string(),
            };

            (status, Json(failure(message, details)))
        }
    }
}
