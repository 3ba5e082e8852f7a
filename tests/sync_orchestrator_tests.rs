//! Integration tests for the sync orchestrator's job state machine, per-site
//! fan-out, and partial-failure aggregation.

mod test_utils;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use syndicate::models::site;
use syndicate::repositories::{
    JobLogRepository, SiteRepository, SnapshotRepository, SyncJobRepository,
};
use syndicate::sync::JobStatus;
use syndicate::sync::delivery::{
    DeliveryEnvelope, DeliveryError, DeliveryReceipt, DeliveryTarget, EmbeddedReceiver,
};
use syndicate::sync::fault::{AlwaysFault, NeverFault};
use syndicate::sync::orchestrator::{SyncOrchestrator, SyncSettings};
use syndicate::sync::store::{DbSyncStore, SyncStore};
use test_utils::{
    create_content_item, create_content_type, create_mapping, create_site, create_test_org,
    setup_test_db,
};

/// Delivery double that rejects configured destination tags with an
/// authentication error and accepts everything else.
struct RejectBySlug {
    rejected: Vec<String>,
}

#[async_trait]
impl DeliveryTarget for RejectBySlug {
    async fn deliver(
        &self,
        site: &site::Model,
        envelope: &DeliveryEnvelope,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if self.rejected.iter().any(|slug| slug == &site.slug) {
            Err(DeliveryError::Unauthorized(site.slug.clone()))
        } else {
            Ok(DeliveryReceipt {
                message: format!("Content synced to {}", envelope.campaign),
                timestamp: Utc::now(),
            })
        }
    }
}

fn orchestrator_with_delivery(
    db: &DatabaseConnection,
    delivery: Arc<dyn DeliveryTarget>,
) -> SyncOrchestrator {
    let store: Arc<dyn SyncStore> = Arc::new(DbSyncStore::new(db.clone()));
    SyncOrchestrator::new(
        store,
        delivery,
        Arc::new(NeverFault),
        SyncSettings::default(),
    )
}

async fn queue_job(db: &DatabaseConnection, organization_id: Uuid) -> Result<Uuid> {
    let job = SyncJobRepository::new(db.clone())
        .create(organization_id, "manual", None)
        .await?;
    assert_eq!(job.status, "queued");
    Ok(job.id)
}

#[tokio::test]
async fn partial_aggregation_when_one_of_three_sites_fails() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;

    let site_a = create_site(&db, org, "alpha", "secret-a").await?;
    let site_b = create_site(&db, org, "bravo", "secret-b").await?;
    let site_c = create_site(&db, org, "charlie", "secret-c").await?;

    let delivery = Arc::new(RejectBySlug {
        rejected: vec!["bravo".to_string()],
    });
    let orchestrator = orchestrator_with_delivery(&db, delivery);

    let job_id = queue_job(&db, org).await?;
    let outcome = orchestrator.execute_job(job_id, org).await;

    assert_eq!(outcome.status, JobStatus::Partial);
    assert!(outcome.success);

    let job = SyncJobRepository::new(db.clone())
        .find_by_org(org, job_id)
        .await?
        .unwrap();
    assert_eq!(job.status, "partial");
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());

    let sites = SiteRepository::new(db.clone());
    let refreshed_a = sites.find_by_org(org, site_a.id).await?.unwrap();
    let refreshed_b = sites.find_by_org(org, site_b.id).await?.unwrap();
    let refreshed_c = sites.find_by_org(org, site_c.id).await?.unwrap();

    assert_eq!(refreshed_a.last_sync_status.as_deref(), Some("success"));
    assert_eq!(refreshed_b.last_sync_status.as_deref(), Some("failed"));
    assert_eq!(refreshed_c.last_sync_status.as_deref(), Some("success"));
    assert!(refreshed_b.last_sync_at.is_some());

    Ok(())
}

#[tokio::test]
async fn all_sites_failing_yields_failed_job_with_one_error_log_per_site() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;

    create_site(&db, org, "alpha", "secret-a").await?;
    create_site(&db, org, "bravo", "secret-b").await?;

    let delivery = Arc::new(RejectBySlug {
        rejected: vec!["alpha".to_string(), "bravo".to_string()],
    });
    let orchestrator = orchestrator_with_delivery(&db, delivery);

    let job_id = queue_job(&db, org).await?;
    let outcome = orchestrator.execute_job(job_id, org).await;

    assert_eq!(outcome.status, JobStatus::Failed);
    assert!(!outcome.success);

    let logs = JobLogRepository::new(db.clone()).list_for_job(job_id).await?;
    let error_logs: Vec<_> = logs.iter().filter(|l| l.level == "error").collect();
    assert_eq!(error_logs.len(), 2);
    assert!(error_logs.iter().all(|l| l.site_id.is_some()));

    Ok(())
}

#[tokio::test]
async fn job_with_no_sites_completes_as_success() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;

    let delivery = Arc::new(RejectBySlug { rejected: vec![] });
    let orchestrator = orchestrator_with_delivery(&db, delivery);

    let job_id = queue_job(&db, org).await?;
    let outcome = orchestrator.execute_job(job_id, org).await;

    assert_eq!(outcome.status, JobStatus::Success);

    let logs = JobLogRepository::new(db.clone()).list_for_job(job_id).await?;
    assert!(
        logs.iter()
            .any(|l| l.message == "Found 0 sites to sync" && l.level == "info")
    );
    assert!(
        logs.iter()
            .any(|l| l.message == "Sync job completed with status: success")
    );

    Ok(())
}

#[tokio::test]
async fn delivered_snapshot_reflects_mapping_resolution_and_collapse() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;

    // Site slug must be on the receiver allow-list
    let site = create_site(&db, org, "facebook", "shared-secret").await?;
    assert_eq!(site.slug, "facebook");

    let content_type = create_content_type(&db, org).await?;

    let published = create_content_item(
        &db,
        org,
        content_type.id,
        "Hero",
        json!({"headline": "Summer Sale", "cta_url": "https://example.com"}),
        "published",
    )
    .await?;
    let draft = create_content_item(
        &db,
        org,
        content_type.id,
        "Draft",
        json!({"headline": "Not yet"}),
        "draft",
    )
    .await?;
    let blocked = create_content_item(
        &db,
        org,
        content_type.id,
        "Blocked",
        json!({"headline": "Hidden"}),
        "published",
    )
    .await?;
    let overridden = create_content_item(
        &db,
        org,
        content_type.id,
        "Override",
        json!({"headline": "Generic", "badge": "A"}),
        "published",
    )
    .await?;
    // A published item with no mapping row for this site: must stay absent
    create_content_item(
        &db,
        org,
        content_type.id,
        "Unmapped",
        json!({"headline": "Invisible"}),
        "published",
    )
    .await?;

    create_mapping(&db, site.id, published.id, "full", json!({})).await?;
    create_mapping(&db, site.id, draft.id, "full", json!({})).await?;
    create_mapping(&db, site.id, blocked.id, "block", json!({})).await?;
    create_mapping(
        &db,
        site.id,
        overridden.id,
        "override",
        json!({"headline": "Local"}),
    )
    .await?;

    let store: Arc<dyn SyncStore> = Arc::new(DbSyncStore::new(db.clone()));
    let receiver = Arc::new(EmbeddedReceiver::new(
        Arc::clone(&store),
        vec!["facebook".to_string()],
    ));
    let orchestrator = SyncOrchestrator::new(
        store,
        receiver,
        Arc::new(NeverFault),
        SyncSettings::default(),
    );

    let job_id = queue_job(&db, org).await?;
    let outcome = orchestrator.execute_job(job_id, org).await;
    assert_eq!(outcome.status, JobStatus::Success);

    let snapshot = SnapshotRepository::new(db.clone())
        .find_by_site(site.id)
        .await?
        .expect("snapshot stored after successful sync");

    // Resolution keeps the published full item and the override item; the
    // draft, the blocked item, and the unmapped item are all absent. With the
    // default first-wins collapse the delivered object is the first resolved
    // item's data as-is.
    assert_eq!(snapshot.item_count, 2);
    assert_eq!(
        snapshot.payload,
        json!({"headline": "Summer Sale", "cta_url": "https://example.com"})
    );
    let rendered = snapshot.payload.to_string();
    assert!(!rendered.contains("Hidden"));
    assert!(!rendered.contains("Invisible"));
    assert!(!rendered.contains("Not yet"));

    let logs = JobLogRepository::new(db.clone()).list_for_job(job_id).await?;
    assert!(
        logs.iter()
            .any(|l| l.message == "Found 4 mappings for facebook")
    );
    assert!(logs.iter().any(|l| l.message == "Sending 2 items to facebook"));

    Ok(())
}

#[tokio::test]
async fn injected_fault_logs_a_warning_but_does_not_fail_the_site() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    create_site(&db, org, "facebook", "shared-secret").await?;

    let store: Arc<dyn SyncStore> = Arc::new(DbSyncStore::new(db.clone()));
    let receiver = Arc::new(EmbeddedReceiver::new(
        Arc::clone(&store),
        vec!["facebook".to_string()],
    ));
    let settings = SyncSettings {
        fault_pause: std::time::Duration::from_millis(10),
        ..Default::default()
    };
    let orchestrator = SyncOrchestrator::new(store, receiver, Arc::new(AlwaysFault), settings);

    let job_id = queue_job(&db, org).await?;
    let outcome = orchestrator.execute_job(job_id, org).await;

    assert_eq!(outcome.status, JobStatus::Success);

    let logs = JobLogRepository::new(db.clone()).list_for_job(job_id).await?;
    assert!(
        logs.iter()
            .any(|l| l.level == "warn" && l.message.contains("Simulated failure"))
    );

    Ok(())
}

#[tokio::test]
async fn orchestrator_level_fault_forces_failed_job_without_erroring() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;

    let delivery = Arc::new(RejectBySlug { rejected: vec![] });
    let orchestrator = orchestrator_with_delivery(&db, delivery);

    // Execute a job that was never created: the first status update fails,
    // which is an orchestrator-level fault. The entry point must still
    // return an outcome instead of an error.
    let missing_job = Uuid::new_v4();
    let outcome = orchestrator.execute_job(missing_job, org).await;

    assert_eq!(outcome.status, JobStatus::Failed);
    assert!(!outcome.success);

    Ok(())
}

#[tokio::test]
async fn successful_rerun_overwrites_the_site_snapshot() -> Result<()> {
    let db = setup_test_db().await?;
    let org = create_test_org(&db).await?;
    let site = create_site(&db, org, "facebook", "shared-secret").await?;

    let content_type = create_content_type(&db, org).await?;
    let item = create_content_item(
        &db,
        org,
        content_type.id,
        "Hero",
        json!({"headline": "First"}),
        "published",
    )
    .await?;
    create_mapping(&db, site.id, item.id, "full", json!({})).await?;

    let store: Arc<dyn SyncStore> = Arc::new(DbSyncStore::new(db.clone()));
    let receiver = Arc::new(EmbeddedReceiver::new(
        Arc::clone(&store),
        vec!["facebook".to_string()],
    ));
    let orchestrator = SyncOrchestrator::new(
        store,
        receiver,
        Arc::new(NeverFault),
        SyncSettings::default(),
    );

    let first_job = queue_job(&db, org).await?;
    orchestrator.execute_job(first_job, org).await;

    let snapshots = SnapshotRepository::new(db.clone());
    let first = snapshots.find_by_site(site.id).await?.unwrap();

    // Change the published content and run a second job
    syndicate::repositories::ContentItemRepository::new(db.clone())
        .update(
            org,
            item.id,
            syndicate::repositories::content_item::ContentItemUpdate {
                data: Some(json!({"headline": "Second"})),
                ..Default::default()
            },
        )
        .await?;

    let second_job = queue_job(&db, org).await?;
    orchestrator.execute_job(second_job, org).await;

    let second = snapshots.find_by_site(site.id).await?.unwrap();

    // Still one snapshot per site, now carrying the latest payload
    assert_eq!(second.site_id, site.id);
    assert_eq!(second.payload, json!({"headline": "Second"}));
    assert!(second.received_at >= first.received_at);

    Ok(())
}
