//! Shared error types for the application

use crate::core::ProtectionLevel;
use thiserror::Error;

/// Main error type for seaplan operations
#[derive(Debug, Error)]
pub enum Error {
    /// No precalculated baseline metric matches a class. A missing baseline
    /// is a configuration bug and halts the report rather than rendering
    /// misleading zeros.
    #[error("no baseline metric for class {class_id:?} (group {group_id:?})")]
    BaselineNotFound {
        class_id: Option<String>,
        group_id: Option<ProtectionLevel>,
    },

    /// Grouped aggregation requested on a single sketch
    #[error("expected a sketch collection, got single sketch {0}")]
    ExpectedCollection(String),

    /// Two metrics share the same identity tuple
    #[error("duplicate metric identity: {0}")]
    DuplicateMetric(String),

    /// No metric satisfied a required lookup
    #[error("no metric found: {0}")]
    MetricNotFound(String),

    /// A sketch carries a designation code outside the configured tables
    /// and the unknown policy is set to error
    #[error("unknown designation {designation:?} on sketch {sketch_id}")]
    UnknownDesignation {
        sketch_id: String,
        designation: String,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
