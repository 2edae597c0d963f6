//! Environment initializer for stencil projects.
//!
//! This module provides the `stencil env-init` functionality: make sure the
//! project has a local `.env` file, seeding it from `.env.example` on first
//! run. The layout it works against:
//!
//! ```text
//! project/
//! ├── .env             # Local environment (created here, then operator-owned)
//! ├── .env.example     # Template shipped with the starter
//! └── package.json
//! ```
//!
//! The initializer never touches an existing `.env`: after creation the file
//! belongs to the operator.

use std::path::{Path, PathBuf};

use crate::errors::SetupError;

/// The local environment file, relative to the project root.
pub const ENV_FILE: &str = ".env";

/// The environment template shipped with the starter.
pub const ENV_TEMPLATE_FILE: &str = ".env.example";

/// Keys the operator must fill in before the application can start.
pub const REQUIRED_KEYS: &[&str] = &[
    "PROJECT_NAME",
    "APP_DOMAIN",
    "DATABASE_URL",
    "OIDC_ISSUER",
    "OIDC_CLIENT_ID",
    "OIDC_CLIENT_SECRET",
    "SESSION_SECRET",
];

/// Keys that have sensible defaults and may be left as-is.
pub const OPTIONAL_KEYS: &[&str] = &["API_DOMAIN", "LOG_LEVEL", "SMTP_URL"];

/// Result of running the environment initializer.
#[derive(Debug, PartialEq, Eq)]
pub enum EnvInitOutcome {
    /// `.env` was already present; nothing was written.
    AlreadyExists { path: PathBuf },
    /// `.env` was created from the template. The caller must stop the
    /// bootstrap flow so the operator reviews the new file.
    Created { path: PathBuf },
}

/// Ensure the project has a local environment file.
///
/// * `.env` exists → `AlreadyExists`, no write.
/// * `.env` missing, `.env.example` missing → `SetupError::MissingEnvTemplate`.
/// * otherwise → copy the template byte-for-byte and return `Created`.
pub fn init_env(project_dir: &Path) -> Result<EnvInitOutcome, SetupError> {
    let env_path = project_dir.join(ENV_FILE);
    if env_path.exists() {
        return Ok(EnvInitOutcome::AlreadyExists { path: env_path });
    }

    let template_path = project_dir.join(ENV_TEMPLATE_FILE);
    if !template_path.exists() {
        return Err(SetupError::MissingEnvTemplate {
            path: template_path,
        });
    }

    let content =
        std::fs::read(&template_path).map_err(|source| SetupError::TemplateReadFailed {
            path: template_path,
            source,
        })?;
    std::fs::write(&env_path, content).map_err(|source| SetupError::EnvWriteFailed {
        path: env_path.clone(),
        source,
    })?;

    Ok(EnvInitOutcome::Created { path: env_path })
}

/// Check whether the project already has a local environment file.
pub fn has_env_file(project_dir: &Path) -> bool {
    project_dir.join(ENV_FILE).exists()
}
