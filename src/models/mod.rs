//! # Data Models
//!
//! This module contains all the data models used throughout the Syndicate API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod content_item;
pub mod content_type;
pub mod destination_snapshot;
pub mod job_log;
pub mod organization;
pub mod site;
pub mod site_item_mapping;
pub mod sync_job;

pub use content_item::Entity as ContentItem;
pub use content_type::Entity as ContentType;
pub use destination_snapshot::Entity as DestinationSnapshot;
pub use job_log::Entity as JobLog;
pub use organization::Entity as Organization;
pub use site::Entity as Site;
pub use site_item_mapping::Entity as SiteItemMapping;
pub use sync_job::Entity as SyncJob;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "syndicate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
