use std::path::{Path, PathBuf};

use git2::{Repository, Status};

use crate::errors::CleanupError;

/// Read-only view of the project's git working tree.
///
/// The cleanup orchestrator only ever asks one question: do the files it is
/// about to rewrite carry uncommitted changes? A project without version
/// control answers "no" by definition.
pub struct WorkingTree {
    repo: Option<Repository>,
    project_dir: PathBuf,
}

impl WorkingTree {
    /// Open the repository containing `project_dir`. A missing repository is
    /// not an error; it degrades to the "no pending changes" answer.
    pub fn open(project_dir: &Path) -> Self {
        Self {
            repo: Repository::discover(project_dir).ok(),
            project_dir: project_dir
                .canonicalize()
                .unwrap_or_else(|_| project_dir.to_path_buf()),
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.repo.is_some()
    }

    /// True if any of `paths` (relative to the project directory) has a
    /// pending change in the index or the worktree. Untracked counts as
    /// pending: a brand-new manifest is exactly the in-progress edit the
    /// guard protects.
    pub fn has_pending_changes(&self, paths: &[&str]) -> Result<bool, CleanupError> {
        let Some(repo) = &self.repo else {
            return Ok(false);
        };

        // Discovery may land on an enclosing repository (monorepo layout),
        // so status queries must use paths relative to the repo root, not
        // the project directory.
        let Some(workdir) = repo.workdir() else {
            return Ok(false);
        };
        let workdir = workdir
            .canonicalize()
            .unwrap_or_else(|_| workdir.to_path_buf());
        let Ok(subdir) = self.project_dir.strip_prefix(&workdir) else {
            return Ok(false);
        };

        for path in paths {
            let status = match repo.status_file(&subdir.join(path)) {
                Ok(status) => status,
                // Paths git has never seen (deleted template files, absent
                // optional files) cannot hold pending edits.
                Err(e) if e.code() == git2::ErrorCode::NotFound => continue,
                Err(e) => return Err(CleanupError::VcsQuery(e.to_string())),
            };
            if status.intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_DELETED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE
                    | Status::WT_NEW
                    | Status::WT_MODIFIED
                    | Status::WT_DELETED
                    | Status::WT_RENAMED
                    | Status::WT_TYPECHANGE,
            ) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
