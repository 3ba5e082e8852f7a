//! # Sync Orchestrator
//!
//! Drives one sync job across all sites belonging to an organization: moves
//! the job through its lifecycle, fans the per-site syncs out concurrently,
//! aggregates their outcomes into the job's terminal status, and records the
//! audit trail as it goes.
//!
//! Failure containment: a per-site failure is caught inside the per-site
//! procedure and never aborts the other sites; an orchestrator-level fault is
//! caught at the top so `execute_job` never returns an error to its caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, histogram};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::collapse::{self, CollapsePolicy};
use super::delivery::{DeliveryEnvelope, DeliveryTarget};
use super::fault::FaultPolicy;
use super::resolver::{self, SitePayload};
use super::signer;
use super::store::{NewJobLog, SyncStore};
use super::{JobStatus, SiteSyncStatus};
use crate::config::AppConfig;
use crate::models::site;

/// Tunables the orchestrator reads from configuration.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Pause applied after an injected fault before the attempt continues
    pub fault_pause: Duration,
    /// How resolved items collapse into the delivered content object
    pub collapse_policy: CollapsePolicy,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fault_pause: Duration::from_millis(config.sync.fault_pause_ms),
            collapse_policy: CollapsePolicy::parse(&config.sync.collapse_policy)
                .unwrap_or_default(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            fault_pause: Duration::from_millis(500),
            collapse_policy: CollapsePolicy::default(),
        }
    }
}

/// Result of one job run; always returned, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOutcome {
    pub status: JobStatus,
    pub success: bool,
}

/// Result of one site's sync within a job.
#[derive(Debug, Clone, Copy)]
struct SiteOutcome {
    site_id: Uuid,
    success: bool,
}

/// Sync orchestrator responsible for running sync jobs
#[derive(Clone)]
pub struct SyncOrchestrator {
    store: Arc<dyn SyncStore>,
    delivery: Arc<dyn DeliveryTarget>,
    fault: Arc<dyn FaultPolicy>,
    settings: SyncSettings,
}

impl SyncOrchestrator {
    /// Create a new orchestrator over the given collaborators
    pub fn new(
        store: Arc<dyn SyncStore>,
        delivery: Arc<dyn DeliveryTarget>,
        fault: Arc<dyn FaultPolicy>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            store,
            delivery,
            fault,
            settings,
        }
    }

    /// Run one sync job to completion.
    ///
    /// The returned outcome mirrors the job's terminal status; any fault that
    /// escapes the per-site containment forces the job to `failed` and is
    /// reported through the outcome and the job log, not as an error.
    #[instrument(skip(self), fields(job_id = %job_id, organization_id = %organization_id))]
    pub async fn execute_job(&self, job_id: Uuid, organization_id: Uuid) -> JobOutcome {
        let timer = std::time::Instant::now();

        let outcome = match self.run_job(job_id, organization_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Sync job failed with orchestrator-level fault");

                let _ = self
                    .store
                    .append_log(NewJobLog::error(job_id, format!("Fatal error: {}", e)))
                    .await;
                let _ = self
                    .store
                    .update_job_status(job_id, JobStatus::Failed, None, Some(Utc::now()))
                    .await;

                JobOutcome {
                    status: JobStatus::Failed,
                    success: false,
                }
            }
        };

        let labels = vec![("status", outcome.status.as_str().to_string())];
        counter!("sync_jobs_total", &labels).increment(1);
        histogram!("sync_job_duration_seconds", &labels).record(timer.elapsed().as_secs_f64());

        outcome
    }

    async fn run_job(&self, job_id: Uuid, organization_id: Uuid) -> anyhow::Result<JobOutcome> {
        self.store
            .update_job_status(job_id, JobStatus::Running, Some(Utc::now()), None)
            .await?;
        self.store
            .append_log(NewJobLog::info(job_id, "Sync job started"))
            .await?;

        let sites = self.store.list_sites_for_org(organization_id).await?;
        self.store
            .append_log(NewJobLog::info(
                job_id,
                format!("Found {} sites to sync", sites.len()),
            ))
            .await?;

        // Fan out: all sites are dispatched together and attempted
        // independently; one site's failure never aborts the others.
        let mut handles = Vec::with_capacity(sites.len());
        for site in sites {
            let worker = self.clone();
            let site_id = site.id;
            let handle = tokio::spawn(async move { worker.sync_site(job_id, site).await });
            handles.push((site_id, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (site_id, handle) in handles {
            match handle.await {
                Ok(outcome) => results.push(outcome),
                Err(e) => {
                    error!(site_id = %site_id, error = %e, "Per-site sync task aborted");
                    let now = Utc::now();
                    let _ = self
                        .store
                        .update_site_sync_status(site_id, SiteSyncStatus::Failed, now)
                        .await;
                    let _ = self
                        .store
                        .append_log(
                            NewJobLog::error(job_id, format!("Site sync aborted: {}", e))
                                .for_site(site_id),
                        )
                        .await;
                    results.push(SiteOutcome {
                        site_id,
                        success: false,
                    });
                }
            }
        }

        let all_success = results.iter().all(|r| r.success);
        let all_failed = results.iter().all(|r| !r.success);
        let final_status = if all_success {
            JobStatus::Success
        } else if all_failed {
            JobStatus::Failed
        } else {
            JobStatus::Partial
        };

        self.store
            .update_job_status(job_id, final_status, None, Some(Utc::now()))
            .await?;
        self.store
            .append_log(NewJobLog::info(
                job_id,
                format!("Sync job completed with status: {}", final_status),
            ))
            .await?;

        info!(status = %final_status, sites = results.len(), "Sync job completed");

        Ok(JobOutcome {
            status: final_status,
            success: !all_failed,
        })
    }

    /// Run one site's sync, containing every failure to this site.
    #[instrument(skip(self, site), fields(job_id = %job_id, site_id = %site.id, site = %site.name))]
    async fn sync_site(&self, job_id: Uuid, site: site::Model) -> SiteOutcome {
        let site_id = site.id;

        match self.try_sync_site(job_id, &site).await {
            Ok(item_count) => {
                let labels = vec![("status", "success".to_string())];
                counter!("sync_sites_total", &labels).increment(1);
                info!(item_count, "Site synced");
                SiteOutcome {
                    site_id,
                    success: true,
                }
            }
            Err(e) => {
                let now = Utc::now();
                let _ = self
                    .store
                    .update_site_sync_status(site_id, SiteSyncStatus::Failed, now)
                    .await;
                let _ = self
                    .store
                    .append_log(
                        NewJobLog::error(
                            job_id,
                            format!("Failed to sync {}: {}", site.name, e),
                        )
                        .for_site(site_id),
                    )
                    .await;

                let labels = vec![("status", "failed".to_string())];
                counter!("sync_sites_total", &labels).increment(1);
                warn!(error = %e, "Site sync failed");

                SiteOutcome {
                    site_id,
                    success: false,
                }
            }
        }
    }

    async fn try_sync_site(&self, job_id: Uuid, site: &site::Model) -> anyhow::Result<usize> {
        self.store
            .append_log(
                NewJobLog::info(job_id, format!("Syncing site: {}", site.name))
                    .for_site(site.id),
            )
            .await?;

        let rows = self.store.list_mappings_for_site(site.id).await?;
        self.store
            .append_log(
                NewJobLog::info(
                    job_id,
                    format!("Found {} mappings for {}", rows.len(), site.name),
                )
                .for_site(site.id),
            )
            .await?;

        let payload = SitePayload::new(resolver::resolve(&rows));

        if self.fault.should_inject() {
            self.store
                .append_log(
                    NewJobLog::warn(
                        job_id,
                        format!("Simulated failure for {}, retrying...", site.name),
                    )
                    .for_site(site.id),
                )
                .await?;
            tokio::time::sleep(self.settings.fault_pause).await;
        }

        let item_count = payload.items.len();
        self.store
            .append_log(
                NewJobLog::info(
                    job_id,
                    format!("Sending {} items to {}", item_count, site.name),
                )
                .for_site(site.id)
                .with_payload(json!({ "itemCount": item_count })),
            )
            .await?;

        let content = collapse::collapse(&payload.items, self.settings.collapse_policy);
        let signature = signer::sign(&content, &site.destination_secret)?;

        let envelope = DeliveryEnvelope {
            payload: content.clone(),
            signature,
            campaign: site.slug.clone(),
        };

        let receipt = self.delivery.deliver(site, &envelope).await?;

        self.store
            .upsert_snapshot(site.id, content, item_count as i32)
            .await?;
        self.store
            .update_site_sync_status(site.id, SiteSyncStatus::Success, Utc::now())
            .await?;
        self.store
            .append_log(
                NewJobLog::info(
                    job_id,
                    format!("Successfully synced to {}", site.name),
                )
                .for_site(site.id)
                .with_payload(json!({
                    "message": receipt.message,
                    "timestamp": receipt.timestamp,
                    "itemCount": item_count,
                })),
            )
            .await?;

        Ok(item_count)
    }
}
