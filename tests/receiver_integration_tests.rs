//! End-to-end tests for the destination receiver endpoint: wire validation,
//! real signature verification, snapshot upsert semantics, and the snapshot
//! read interface.

mod test_utils;

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};
use tower::ServiceExt;

use syndicate::config::AppConfig;
use syndicate::models::destination_snapshot;
use syndicate::server::{AppState, create_app};
use syndicate::sync::signer;
use test_utils::{create_site, create_test_org, setup_test_db};

const OPERATOR_TOKEN: &str = "receiver-test-token";

fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        operator_tokens: vec![OPERATOR_TOKEN.to_string()],
        ..Default::default()
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn receive_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/receive")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn signed_delivery_is_accepted_and_snapshot_stored() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    let site = create_site(&db, org, "facebook", "shared-secret").await?;

    let app = create_app(AppState::new(db.clone(), test_config()));

    let payload = json!({"headline": "Summer Sale", "items": [{"a": 1}, {"b": 2}]});
    let signature = signer::sign(&payload, "shared-secret").unwrap();

    let response = app
        .oneshot(receive_request(json!({
            "payload": payload,
            "signature": signature,
            "campaign": "facebook",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());

    let snapshots = destination_snapshot::Entity::find()
        .filter(destination_snapshot::Column::SiteId.eq(site.id))
        .all(&db)
        .await?;
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].payload, payload);
    assert_eq!(snapshots[0].item_count, 2);

    Ok(())
}

#[tokio::test]
async fn repeated_delivery_upserts_a_single_snapshot_row() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    let site = create_site(&db, org, "facebook", "shared-secret").await?;

    let app = create_app(AppState::new(db.clone(), test_config()));

    let payload = json!({"headline": "Same payload"});
    let signature = signer::sign(&payload, "shared-secret").unwrap();
    let body = json!({
        "payload": payload,
        "signature": signature,
        "campaign": "facebook",
    });

    let first = app
        .clone()
        .oneshot(receive_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let first_row = destination_snapshot::Entity::find()
        .filter(destination_snapshot::Column::SiteId.eq(site.id))
        .one(&db)
        .await?
        .unwrap();

    let second = app.oneshot(receive_request(body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let rows = destination_snapshot::Entity::find()
        .filter(destination_snapshot::Column::SiteId.eq(site.id))
        .all(&db)
        .await?;

    // Exactly one row per site; received_at reflects the latest delivery
    assert_eq!(rows.len(), 1);
    assert!(rows[0].received_at >= first_row.received_at);

    Ok(())
}

#[tokio::test]
async fn invalid_signature_is_rejected_with_401() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    let site = create_site(&db, org, "facebook", "shared-secret").await?;

    let app = create_app(AppState::new(db.clone(), test_config()));

    let payload = json!({"headline": "Summer Sale"});
    // Signed with the wrong secret
    let signature = signer::sign(&payload, "wrong-secret").unwrap();

    let response = app
        .oneshot(receive_request(json!({
            "payload": payload,
            "signature": signature,
            "campaign": "facebook",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid signature");

    // Nothing was stored
    let rows = destination_snapshot::Entity::find()
        .filter(destination_snapshot::Column::SiteId.eq(site.id))
        .all(&db)
        .await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn allowed_campaign_without_site_row_is_404() -> Result<()> {
    let db = setup_test_db().await?;
    let _org = create_test_org(&db).await?;
    // "google" is on the default allow-list but no site is registered for it

    let app = create_app(AppState::new(db.clone(), test_config()));

    let payload = json!({"headline": "x"});
    let signature = signer::sign(&payload, "whatever").unwrap();

    let response = app
        .oneshot(receive_request(json!({
            "payload": payload,
            "signature": signature,
            "campaign": "google",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Site not found");

    Ok(())
}

#[tokio::test]
async fn snapshot_read_returns_last_accepted_payload() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    let site = create_site(&db, org, "facebook", "shared-secret").await?;

    let app = create_app(AppState::new(db.clone(), test_config()));

    let snapshot_uri = format!("/sites/{}/snapshot", site.id);
    let authed_get = |uri: String| {
        Request::builder()
            .uri(uri)
            .header("Authorization", format!("Bearer {}", OPERATOR_TOKEN))
            .header("X-Organization-Id", org.to_string())
            .body(Body::empty())
            .unwrap()
    };

    // Before any delivery the read interface reports empty
    let response = app
        .clone()
        .oneshot(authed_get(snapshot_uri.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let payload = json!({"headline": "Stored", "items": [1, 2, 3]});
    let signature = signer::sign(&payload, "shared-secret").unwrap();
    let delivery = app
        .clone()
        .oneshot(receive_request(json!({
            "payload": payload,
            "signature": signature,
            "campaign": "facebook",
        })))
        .await
        .unwrap();
    assert_eq!(delivery.status(), StatusCode::OK);

    let response = app.oneshot(authed_get(snapshot_uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["payload"], payload);
    assert_eq!(body["item_count"], 3);
    assert!(body["received_at"].is_string());

    Ok(())
}
