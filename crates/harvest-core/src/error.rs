//! Error types and exit codes for harvest
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (including interrupted runs and failed units)
//! - 2: Usage error (bad flags/args)
//! - 3: Data/store error (store unavailable, migration failure)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Extended SQLite result code for a foreign key constraint failure
const SQLITE_CONSTRAINT_FOREIGNKEY: std::ffi::c_int = 787;

/// Exit codes for the harvest binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - store unavailable, migration failed (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while fetching and tracking catalog state
#[derive(Error, Debug)]
pub enum HarvestError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("store unavailable at {path:?}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("migration to version {version} ({name}) failed: {reason}")]
    MigrationFailed {
        version: u32,
        name: String,
        reason: String,
    },

    // Catalog errors (exit code 1)
    #[error("{kind} not found in catalog: {id}")]
    CatalogNotFound { kind: String, id: String },

    #[error("catalog unavailable during {operation}: {reason}")]
    CatalogTransient { operation: String, reason: String },

    #[error("referential integrity violated during {operation}: {reason}")]
    ReferentialViolation { operation: String, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),

    #[error("Run interrupted. Completed work has been saved; run again to resume.")]
    Interrupted,
}

impl From<rusqlite::Error> for HarvestError {
    fn from(err: rusqlite::Error) -> Self {
        HarvestError::db_operation("query store", err)
    }
}

impl From<CatalogError> for HarvestError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => HarvestError::CatalogNotFound {
                kind: kind.to_string(),
                id,
            },
            CatalogError::Transient { operation, reason } => {
                HarvestError::CatalogTransient { operation, reason }
            }
            CatalogError::Malformed { reason } => HarvestError::invalid_value("catalog data", reason),
        }
    }
}

impl HarvestError {
    /// Create an error for a failed store operation.
    ///
    /// Foreign key failures become `ReferentialViolation` so callers can
    /// abort only the unit of work that produced them.
    pub fn db_operation(operation: &str, error: rusqlite::Error) -> Self {
        if is_foreign_key_violation(&error) {
            return HarvestError::ReferentialViolation {
                operation: operation.to_string(),
                reason: error.to_string(),
            };
        }
        HarvestError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a store that cannot be opened or created
    pub fn store_unavailable(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        HarvestError::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        HarvestError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            HarvestError::UsageError(_) | HarvestError::InvalidValue { .. } => ExitCode::Usage,

            HarvestError::StoreUnavailable { .. } | HarvestError::MigrationFailed { .. } => {
                ExitCode::Data
            }

            HarvestError::CatalogNotFound { .. }
            | HarvestError::CatalogTransient { .. }
            | HarvestError::ReferentialViolation { .. }
            | HarvestError::Io(_)
            | HarvestError::Json(_)
            | HarvestError::Toml(_)
            | HarvestError::FailedOperation { .. }
            | HarvestError::Other(_)
            | HarvestError::Interrupted => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            HarvestError::UsageError(_) => "usage_error",
            HarvestError::InvalidValue { .. } => "invalid_value",
            HarvestError::StoreUnavailable { .. } => "store_unavailable",
            HarvestError::MigrationFailed { .. } => "migration_failed",
            HarvestError::CatalogNotFound { .. } => "catalog_not_found",
            HarvestError::CatalogTransient { .. } => "catalog_transient",
            HarvestError::ReferentialViolation { .. } => "referential_violation",
            HarvestError::Io(_) => "io_error",
            HarvestError::Json(_) => "json_error",
            HarvestError::Toml(_) => "toml_error",
            HarvestError::FailedOperation { .. } => "failed_operation",
            HarvestError::Other(_) => "other",
            HarvestError::Interrupted => "interrupted",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(e, _) => e.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY,
        _ => false,
    }
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
