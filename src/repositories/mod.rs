//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access
//! with organization-aware methods.

pub mod content_item;
pub mod content_type;
pub mod job_log;
pub mod mapping;
pub mod site;
pub mod snapshot;
pub mod sync_job;

pub use content_item::ContentItemRepository;
pub use content_type::ContentTypeRepository;
pub use job_log::JobLogRepository;
pub use mapping::MappingRepository;
pub use site::SiteRepository;
pub use snapshot::SnapshotRepository;
pub use sync_job::SyncJobRepository;
