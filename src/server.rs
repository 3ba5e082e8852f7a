//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Syndicate API.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers;
use crate::sync::delivery::{DeliveryTarget, EmbeddedReceiver, HttpDeliveryTarget};
use crate::sync::fault::{FaultPolicy, RandomFault};
use crate::sync::orchestrator::{SyncOrchestrator, SyncSettings};
use crate::sync::store::{DbSyncStore, SyncStore};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub receiver: Arc<EmbeddedReceiver>,
}

impl AppState {
    /// Wire the default state: database-backed store, delivery target per the
    /// configured mode, and random fault injection.
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        let store: Arc<dyn SyncStore> = Arc::new(DbSyncStore::new(db.clone()));
        let receiver = Arc::new(EmbeddedReceiver::new(
            Arc::clone(&store),
            config.allowed_destinations.clone(),
        ));

        let delivery: Arc<dyn DeliveryTarget> = match config.sync.delivery_mode.as_str() {
            "http" => Arc::new(HttpDeliveryTarget::new()),
            _ => Arc::clone(&receiver) as Arc<dyn DeliveryTarget>,
        };

        let fault: Arc<dyn FaultPolicy> = Arc::new(RandomFault::new(config.sync.fault_probability));

        let orchestrator = Arc::new(SyncOrchestrator::new(
            store,
            delivery,
            fault,
            SyncSettings::from_config(&config),
        ));

        Self {
            db,
            config,
            orchestrator,
            receiver,
        }
    }

}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/content-types",
            post(handlers::content_types::create_content_type)
                .get(handlers::content_types::list_content_types),
        )
        .route(
            "/content-items",
            post(handlers::content_items::create_content_item)
                .get(handlers::content_items::list_content_items),
        )
        .route(
            "/content-items/{id}",
            get(handlers::content_items::get_content_item)
                .patch(handlers::content_items::update_content_item),
        )
        .route(
            "/sites",
            post(handlers::sites::create_site).get(handlers::sites::list_sites),
        )
        .route(
            "/sites/{id}/snapshot",
            get(handlers::snapshots::get_site_snapshot),
        )
        .route(
            "/mappings",
            put(handlers::mappings::upsert_mapping)
                .get(handlers::mappings::list_mappings)
                .delete(handlers::mappings::delete_mapping),
        )
        .route(
            "/jobs",
            post(handlers::jobs::trigger_job).get(handlers::jobs::list_jobs),
        )
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}/logs", get(handlers::jobs::get_job_logs))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/receive", post(handlers::receiver::receive_sync))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let profile = config.profile.clone();
    let state = AppState::new(db, Arc::new(config));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, profile = %profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::receiver::receive_sync,
        crate::handlers::jobs::trigger_job,
        crate::handlers::jobs::list_jobs,
        crate::handlers::jobs::get_job,
        crate::handlers::jobs::get_job_logs,
        crate::handlers::sites::create_site,
        crate::handlers::sites::list_sites,
        crate::handlers::snapshots::get_site_snapshot,
        crate::handlers::mappings::upsert_mapping,
        crate::handlers::mappings::list_mappings,
        crate::handlers::mappings::delete_mapping,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::HealthResponse,
            crate::handlers::jobs::TriggerJobRequest,
            crate::handlers::jobs::JobResponse,
            crate::handlers::jobs::JobsResponse,
            crate::handlers::jobs::JobLogResponse,
            crate::handlers::jobs::JobLogsResponse,
            crate::handlers::sites::CreateSiteRequest,
            crate::handlers::sites::SiteResponse,
            crate::handlers::sites::SitesResponse,
            crate::handlers::snapshots::SnapshotResponse,
            crate::handlers::mappings::UpsertMappingRequest,
            crate::handlers::mappings::MappingResponse,
            crate::handlers::mappings::MappingsResponse,
            crate::handlers::receiver::ReceiveSyncRequest,
        )
    ),
    info(
        title = "Syndicate API",
        description = "API for managing content syndication to destination sites",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
