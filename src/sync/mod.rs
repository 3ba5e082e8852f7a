//! # Sync Engine
//!
//! The core of the service: mapping resolution, payload signing, delivery,
//! and the job orchestrator that drives one syndication run across all of an
//! organization's sites.

use serde::{Deserialize, Serialize};

pub mod collapse;
pub mod delivery;
pub mod fault;
pub mod orchestrator;
pub mod resolver;
pub mod signer;
pub mod store;

/// Version tag stamped on every site payload.
pub const PAYLOAD_VERSION: &str = "1.0";

/// Lifecycle status of a sync job.
///
/// Transitions are monotonic: queued -> running -> exactly one of
/// success/partial/failed, and a terminal status is never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Success,
    Partial,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Partial => "partial",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Partial | JobStatus::Failed
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent sync attempt for one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteSyncStatus {
    Success,
    Failed,
}

impl SiteSyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteSyncStatus::Success => "success",
            SiteSyncStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SiteSyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a job log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Per-(site, item) syndication rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    Full,
    Override,
    Block,
}

impl MappingMode {
    /// Parse a stored mode string. Unrecognized values behave as `full`,
    /// matching the resolver's include-unless-blocked semantics.
    pub fn parse(value: &str) -> Self {
        match value {
            "override" => MappingMode::Override,
            "block" => MappingMode::Block,
            _ => MappingMode::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMode::Full => "full",
            MappingMode::Override => "override",
            MappingMode::Block => "block",
        }
    }
}
