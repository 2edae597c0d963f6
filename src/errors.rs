//! Typed error hierarchy for the stencil bootstrap tool.
//!
//! Three top-level enums cover the three subsystems:
//! - `SetupError` — environment initializer failures
//! - `CleanupError` — template cleanup orchestrator failures
//! - `SessionError` — auth-context bridge session resolution failures

use thiserror::Error;

/// Errors from the environment initializer.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "Environment template not found at {path}: the starter checkout is incomplete or corrupted"
    )]
    MissingEnvTemplate { path: std::path::PathBuf },

    #[error("Failed to read environment template at {path}: {source}")]
    TemplateReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write environment file at {path}: {source}")]
    EnvWriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the template cleanup orchestrator.
///
/// Only guard evaluation can abort a run; individual cleanup steps report
/// soft failures through `StepOutcome::Failed` instead of raising.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Failed to read package manifest at {path}: {source}")]
    ManifestReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package manifest at {path} is not valid JSON: {source}")]
    ManifestParseFailed {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Environment file is missing required key {key}")]
    MissingEnvKey { key: String },

    #[error("Version control query failed: {0}")]
    VcsQuery(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from session resolution in the auth-context bridge.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No valid session on the request. Swallowed by the bridge: many API
    /// routes are public, so this is "anonymous", not a failure.
    #[error("No authenticated session on request")]
    Unauthenticated,

    #[error("Session claims are malformed: {0}")]
    MalformedClaims(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
