//! Project settings read from the local environment file.

use std::path::Path;

use crate::env_init::ENV_FILE;
use crate::errors::CleanupError;

/// The env key holding the human-readable project name.
pub const PROJECT_NAME_KEY: &str = "PROJECT_NAME";

/// Settings the cleanup orchestrator needs from `.env`.
///
/// The environment file is operator-owned by the time cleanup runs; this
/// struct only reads it, never writes it.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    /// Human-readable project name, e.g. "My Cool App!".
    pub project_name: String,
}

impl ProjectSettings {
    /// Load settings from `<project_dir>/.env`.
    pub fn load(project_dir: &Path) -> Result<Self, CleanupError> {
        let env_path = project_dir.join(ENV_FILE);
        let mut project_name = None;

        for item in dotenvy::from_path_iter(&env_path)
            .map_err(|e| CleanupError::Other(anyhow::anyhow!("{}: {e}", env_path.display())))?
        {
            let (key, value) =
                item.map_err(|e| CleanupError::Other(anyhow::anyhow!("{e}")))?;
            if key == PROJECT_NAME_KEY {
                project_name = Some(value);
            }
        }

        let project_name = project_name
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CleanupError::MissingEnvKey {
                key: PROJECT_NAME_KEY.to_string(),
            })?;

        Ok(Self { project_name })
    }

    /// The manifest-safe package name derived from the project name.
    pub fn package_name(&self) -> String {
        derive_package_name(&self.project_name)
    }
}

/// Normalize a human-readable project name into a package-manifest name:
/// lower-case, whitespace runs become a single hyphen, everything outside
/// `[a-z0-9-]` is dropped, and stray leading/trailing hyphens are trimmed.
pub fn derive_package_name(project_name: &str) -> String {
    let mut out = String::with_capacity(project_name.len());
    let mut pending_hyphen = false;

    for ch in project_name.trim().chars() {
        if ch.is_whitespace() {
            pending_hyphen = !out.is_empty();
            continue;
        }
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() || lower == '-' {
                if pending_hyphen {
                    out.push('-');
                    pending_hyphen = false;
                }
                out.push(lower);
            }
        }
    }

    out.trim_matches('-').to_string()
}
