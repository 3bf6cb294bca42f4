//! Error types for the flowfit_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flowfit_core operations
///
/// Remote generation failures have their own type
/// ([`crate::remote::RemoteGenerationError`]) because they are always
/// recovered by the orchestrator and never reach callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied input outside the accepted domain
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Store read/write error
    #[error("Store error: {0}")]
    Store(String),

    /// Record lookup by id found nothing
    #[error("Not found: {0}")]
    NotFound(String),
}
