//! Capture task configuration
//!
//! Configured externally (file, env, CLI), immutable after startup.
//! Only the settings that influence offset resolution live here; loading
//! and the wider connector surface are the caller's concern.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::QueryScope;

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration validation errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A setting holds a value that can never be valid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Policy governing how in-flight transactions are discovered when the
/// snapshot offset is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionBoundaryMode {
    /// Ignore in-flight transactions entirely.
    Skip,
    /// Trust only the live transaction-status view.
    TransactionViewOnly,
    /// Consult the view, then corroborate and extend via a log scan.
    TransactionViewAndLog,
}

impl Default for TransactionBoundaryMode {
    fn default() -> Self {
        TransactionBoundaryMode::TransactionViewAndLog
    }
}

/// Bounds for the current-SCN stabilization loop.
///
/// The upstream loop re-samples without limit; a bound is the hardening
/// knob for deployments where quiescence may never arrive. `max_attempts`
/// of `None` restores the unbounded behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizationConfig {
    /// Maximum number of re-samples before giving up.
    pub max_attempts: Option<u32>,
    /// Pause between re-samples.
    pub pause: Duration,
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        Self {
            max_attempts: Some(5),
            pause: Duration::from_secs(1),
        }
    }
}

/// Settings for one offset-resolution task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// How in-flight transactions are discovered at the snapshot boundary.
    pub boundary_mode: TransactionBoundaryMode,

    /// Retention window limiting how far back archived log segments are
    /// considered. `None` means the catalog's full retention.
    pub archive_log_retention: Option<Duration>,

    /// Archive destination to read segments from, when the database
    /// maintains more than one.
    pub archive_destination_name: Option<String>,

    /// When set, only sealed (archived) segments are eligible; the live
    /// segment is excluded from selection.
    pub archive_log_only_mode: bool,

    /// Cluster member addresses. Non-empty means a multi-instance
    /// deployment, so status and catalog queries must address
    /// cluster-wide views rather than instance-local ones.
    pub cluster_nodes: Vec<String>,

    /// Pluggable-database name, when capturing from a sub-container.
    /// Mining commands are not valid inside that scope, so the resolver
    /// resets its secondary session to the root container first.
    pub pluggable_database: Option<String>,

    /// Bounds for the stabilization loops.
    pub stabilization: StabilizationConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            boundary_mode: TransactionBoundaryMode::default(),
            archive_log_retention: None,
            archive_destination_name: None,
            archive_log_only_mode: false,
            cluster_nodes: Vec::new(),
            pluggable_database: None,
            stabilization: StabilizationConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// Returns the scope status and catalog queries must address.
    pub fn query_scope(&self) -> QueryScope {
        if self.cluster_nodes.is_empty() {
            QueryScope::Instance
        } else {
            QueryScope::ClusterWide
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(name) = &self.archive_destination_name {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "archive_destination_name must not be blank".to_string(),
                ));
            }
        }
        if let Some(name) = &self.pluggable_database {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "pluggable_database must not be blank".to_string(),
                ));
            }
        }
        if let Some(retention) = self.archive_log_retention {
            if retention.is_zero() {
                return Err(ConfigError::Invalid(
                    "archive_log_retention must be greater than zero when set".to_string(),
                ));
            }
        }
        if self.stabilization.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "stabilization.max_attempts must be at least 1 when bounded".to_string(),
            ));
        }
        Ok(())
    }
}
