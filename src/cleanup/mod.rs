//! Template cleanup orchestrator.
//!
//! Turns an unmodified starter checkout into a project-specific repository:
//! strips template-only scripts from the package manifest, renames the
//! infrastructure scripts to their public names, rewrites the manifest
//! identity and the README, and removes the starter license.
//!
//! Two guards suppress the whole run:
//! - `Dirty` — the manifest or the template document carries uncommitted
//!   changes; mutating now would trample in-progress operator edits.
//! - `Template` — the manifest still carries the reserved starter name; the
//!   upstream template repository must never rewrite itself.
//!
//! Past the guards every step is best-effort: failures are recorded in the
//! [`CleanupReport`] and the run continues, because a partially cleaned
//! project is still recoverable by hand while an aborted bootstrap is not.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::CleanupError;
use crate::manifest::{
    self, MANIFEST_FILE, apply_project_identity, remove_template_scripts, rename_infra_scripts,
    to_manifest_string,
};
use crate::project::ProjectSettings;
use crate::readme::{README_FILE, rewrite_readme};
use crate::report::{CleanupReport, StepOutcome};
use crate::tracker::WorkingTree;

/// Starter license removed for derived projects.
pub const LICENSE_FILE: &str = "LICENSE";

/// Template instructions document, removed by the explicit finalize step.
pub const TEMPLATE_DOC: &str = "TEMPLATE.md";

/// Step names as they appear in [`CleanupReport`].
pub mod steps {
    pub const SCRIPTS_REMOVE: &str = "manifest:scripts:remove";
    pub const SCRIPTS_RENAME: &str = "manifest:scripts:rename";
    pub const IDENTITY: &str = "manifest:identity";
    pub const PERSIST: &str = "manifest:persist";
    pub const README: &str = "readme:rewrite";
    pub const LICENSE: &str = "license:remove";
    pub const FINALIZE: &str = "template-doc:remove";
}

/// Repository state, computed once before any mutation and threaded through
/// the run explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoState {
    /// Still the unmodified starter; cleanup is suppressed.
    Template,
    /// Uncommitted changes on guarded paths; cleanup is suppressed.
    Dirty,
    /// Derived project with a clean tree; cleanup may run.
    Ready,
}

impl std::fmt::Display for RepoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoState::Template => write!(f, "template"),
            RepoState::Dirty => write!(f, "dirty"),
            RepoState::Ready => write!(f, "ready"),
        }
    }
}

/// Classify the checkout. The uncommitted-changes check runs first: an
/// operator mid-edit outranks every other signal, including the template
/// marker itself.
pub fn detect_state(project_dir: &Path) -> Result<RepoState, CleanupError> {
    let tree = WorkingTree::open(project_dir);
    if tree.has_pending_changes(&[MANIFEST_FILE, TEMPLATE_DOC])? {
        return Ok(RepoState::Dirty);
    }

    // An unreadable manifest cannot prove template mode; the manifest steps
    // will surface the problem as soft failures.
    match read_manifest(project_dir) {
        Ok(m) if manifest::is_template_manifest(&m) => Ok(RepoState::Template),
        _ => Ok(RepoState::Ready),
    }
}

/// Run the cleanup state machine once, end to end.
pub fn run_cleanup(project_dir: &Path) -> Result<CleanupReport, CleanupError> {
    let state = detect_state(project_dir)?;
    if state != RepoState::Ready {
        return Ok(CleanupReport::guarded(state));
    }

    let mut report = CleanupReport::guarded(RepoState::Ready);
    let settings = ProjectSettings::load(project_dir);

    run_manifest_steps(project_dir, &settings, &mut report);
    run_readme_step(project_dir, &settings, &mut report);
    report.record(steps::LICENSE, remove_optional_file(project_dir, LICENSE_FILE));

    Ok(report)
}

/// Explicit finalize step, invoked by the caller after a successful `Ready`
/// run: remove the template instructions document. Idempotent; failure is
/// reported, never escalated.
pub fn finalize(project_dir: &Path) -> StepOutcome {
    remove_optional_file(project_dir, TEMPLATE_DOC)
}

fn run_manifest_steps(
    project_dir: &Path,
    settings: &Result<ProjectSettings, CleanupError>,
    report: &mut CleanupReport,
) {
    let mut doc = match read_manifest(project_dir) {
        Ok(doc) => doc,
        Err(e) => {
            let reason = e.to_string();
            for step in [
                steps::SCRIPTS_REMOVE,
                steps::SCRIPTS_RENAME,
                steps::IDENTITY,
                steps::PERSIST,
            ] {
                report.record(step, StepOutcome::Failed(reason.clone()));
            }
            return;
        }
    };

    let removed = remove_template_scripts(&mut doc);
    report.record(
        steps::SCRIPTS_REMOVE,
        if removed.is_empty() {
            StepOutcome::Skipped("no template scripts present".into())
        } else {
            StepOutcome::Applied
        },
    );

    let renamed = rename_infra_scripts(&mut doc);
    report.record(
        steps::SCRIPTS_RENAME,
        if renamed.is_empty() {
            StepOutcome::Skipped("no infrastructure scripts to rename".into())
        } else {
            StepOutcome::Applied
        },
    );

    let mut mutated = !removed.is_empty() || !renamed.is_empty();
    match settings {
        Ok(settings) => {
            let rewritten = apply_project_identity(&mut doc, &settings.package_name());
            if rewritten.is_empty() {
                // Nothing to rewrite on a non-object root; claiming Applied
                // here would also force a pointless persist.
                report.record(
                    steps::IDENTITY,
                    StepOutcome::Failed("manifest root is not a JSON object".into()),
                );
            } else {
                mutated = true;
                report.record(steps::IDENTITY, StepOutcome::Applied);
            }
        }
        Err(e) => report.record(steps::IDENTITY, StepOutcome::Failed(e.to_string())),
    }

    if !mutated {
        report.record(
            steps::PERSIST,
            StepOutcome::Skipped("manifest unchanged".into()),
        );
        return;
    }

    let outcome = to_manifest_string(&doc)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            std::fs::write(project_dir.join(MANIFEST_FILE), content).map_err(|e| e.to_string())
        });
    report.record(
        steps::PERSIST,
        match outcome {
            Ok(()) => StepOutcome::Applied,
            Err(reason) => StepOutcome::Failed(reason),
        },
    );
}

fn run_readme_step(
    project_dir: &Path,
    settings: &Result<ProjectSettings, CleanupError>,
    report: &mut CleanupReport,
) {
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            report.record(steps::README, StepOutcome::Failed(e.to_string()));
            return;
        }
    };

    let readme_path = project_dir.join(README_FILE);
    let content = match std::fs::read_to_string(&readme_path) {
        Ok(content) => content,
        Err(e) => {
            report.record(steps::README, StepOutcome::Failed(e.to_string()));
            return;
        }
    };

    let (rewritten, changes) = rewrite_readme(&content, settings);
    if changes.is_empty() {
        report.record(
            steps::README,
            StepOutcome::Skipped("no recognizable sections".into()),
        );
        return;
    }

    report.record(
        steps::README,
        match std::fs::write(&readme_path, rewritten) {
            Ok(()) => StepOutcome::Applied,
            Err(e) => StepOutcome::Failed(e.to_string()),
        },
    );
}

fn read_manifest(project_dir: &Path) -> Result<Value, CleanupError> {
    let path = project_dir.join(MANIFEST_FILE);
    let raw = std::fs::read_to_string(&path).map_err(|source| CleanupError::ManifestReadFailed {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CleanupError::ManifestParseFailed { path, source })
}

fn remove_optional_file(project_dir: &Path, name: &str) -> StepOutcome {
    match std::fs::remove_file(project_dir.join(name)) {
        Ok(()) => StepOutcome::Applied,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            StepOutcome::Skipped(format!("{name} not present"))
        }
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}
