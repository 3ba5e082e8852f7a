//! Tests for the HTTP delivery target against a mock destination server.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use syndicate::models::site;
use syndicate::sync::delivery::{
    DeliveryEnvelope, DeliveryError, DeliveryTarget, HttpDeliveryTarget,
};

fn site_for(url: String) -> site::Model {
    let now = Utc::now().fixed_offset();
    site::Model {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        name: "Facebook Campaign".to_string(),
        slug: "facebook".to_string(),
        destination_url: url,
        destination_secret: "shared-secret".to_string(),
        last_sync_status: None,
        last_sync_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn envelope() -> DeliveryEnvelope {
    DeliveryEnvelope {
        payload: json!({"headline": "Summer Sale"}),
        signature: "deadbeef".to_string(),
        campaign: "facebook".to_string(),
    }
}

#[tokio::test]
async fn accepted_delivery_returns_receipt_from_wire_response() {
    let server = MockServer::start().await;

    let expected_body = serde_json::to_string(&envelope()).unwrap();
    Mock::given(method("POST"))
        .and(path("/receive"))
        .and(body_json_string(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Content synced to facebook",
            "timestamp": "2026-01-15T10:30:00Z",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let target = HttpDeliveryTarget::new();
    let site = site_for(format!("{}/receive", server.uri()));

    let receipt = target.deliver(&site, &envelope()).await.unwrap();
    assert_eq!(receipt.message, "Content synced to facebook");
}

#[tokio::test]
async fn signature_rejection_maps_to_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid signature",
        })))
        .mount(&server)
        .await;

    let target = HttpDeliveryTarget::new();
    let site = site_for(format!("{}/receive", server.uri()));

    let error = target.deliver(&site, &envelope()).await.unwrap_err();
    assert!(matches!(error, DeliveryError::Unauthorized(slug) if slug == "facebook"));
}

#[tokio::test]
async fn malformed_request_maps_to_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid campaign"))
        .mount(&server)
        .await;

    let target = HttpDeliveryTarget::new();
    let site = site_for(format!("{}/receive", server.uri()));

    let error = target.deliver(&site, &envelope()).await.unwrap_err();
    assert!(matches!(error, DeliveryError::Validation(body) if body.contains("Invalid campaign")));
}

#[tokio::test]
async fn destination_5xx_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let target = HttpDeliveryTarget::new();
    let site = site_for(format!("{}/receive", server.uri()));

    let error = target.deliver(&site, &envelope()).await.unwrap_err();
    assert!(matches!(error, DeliveryError::Upstream(_)));
}

#[tokio::test]
async fn unreachable_destination_maps_to_upstream_error() {
    // Nothing is listening on this address
    let target = HttpDeliveryTarget::new();
    let site = site_for("http://127.0.0.1:9/receive".to_string());

    let error = target.deliver(&site, &envelope()).await.unwrap_err();
    assert!(matches!(error, DeliveryError::Upstream(_)));
}
