//! Integration tests for stencil
//!
//! These tests drive the compiled binary end to end against temporary
//! project directories.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a stencil Command
fn stencil() -> Command {
    cargo_bin_cmd!("stencil")
}

/// Helper to create a temporary project directory
fn create_temp_project() -> TempDir {
    TempDir::new().unwrap()
}

const TEMPLATE_MANIFEST: &str = r#"{
  "name": "stencil-starter",
  "version": "3.2.1",
  "description": "Opinionated web application starter",
  "scripts": {
    "dev": "nuxt dev",
    "setup": "stencil env-init && stencil cleanup",
    "setup:env": "stencil env-init",
    "template:cleanup": "stencil cleanup --finalize",
    "template:db:start": "docker compose up -d db",
    "template:db:stop": "docker compose down",
    "template:db:reset": "docker compose down -v"
  }
}
"#;

const TEMPLATE_README: &str = "\
# Stencil Starter

Starter tagline.

## Quick start

clone stencil-starter and run setup.

## Development

npm run dev.

## License

MIT.
";

/// Lay out a project derived from the starter (renamed, env configured).
fn write_derived_project(dir: &Path) {
    fs::write(
        dir.join("package.json"),
        TEMPLATE_MANIFEST.replace("stencil-starter", "old-name"),
    )
    .unwrap();
    fs::write(dir.join("README.md"), TEMPLATE_README).unwrap();
    fs::write(dir.join("LICENSE"), "MIT License\n").unwrap();
    fs::write(dir.join("TEMPLATE.md"), "starter instructions\n").unwrap();
    fs::write(dir.join(".env"), "PROJECT_NAME=My Cool App!\n").unwrap();
}

fn init_git_repo(dir: &Path) -> git2::Repository {
    let repo = git2::Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "test").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
    }
    repo
}

fn commit_all(repo: &git2::Repository, msg: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("test", "test@test.com").unwrap();
    if let Ok(head) = repo.head() {
        let parent = head.peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &[&parent])
            .unwrap();
    } else {
        repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &[])
            .unwrap();
    }
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_stencil_help() {
        stencil().arg("--help").assert().success();
    }

    #[test]
    fn test_stencil_version() {
        stencil().arg("--version").assert().success();
    }
}

// =============================================================================
// Environment Initializer
// =============================================================================

mod env_init {
    use super::*;

    #[test]
    fn test_env_init_creates_env_and_stops() {
        let dir = create_temp_project();
        fs::write(dir.path().join(".env.example"), "PROJECT_NAME=\n").unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("env-init")
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Created"))
            .stdout(predicate::str::contains("PROJECT_NAME"));

        assert_eq!(
            fs::read_to_string(dir.path().join(".env")).unwrap(),
            "PROJECT_NAME=\n"
        );
    }

    #[test]
    fn test_env_init_idempotent() {
        let dir = create_temp_project();
        fs::write(dir.path().join(".env.example"), "PROJECT_NAME=\n").unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("env-init")
            .assert()
            .code(2);

        // Operator fills the file in; a second run must not overwrite it.
        fs::write(dir.path().join(".env"), "PROJECT_NAME=My App\n").unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("env-init")
            .assert()
            .success()
            .stdout(predicate::str::contains("already present"));

        assert_eq!(
            fs::read_to_string(dir.path().join(".env")).unwrap(),
            "PROJECT_NAME=My App\n"
        );
    }

    #[test]
    fn test_env_init_missing_template_is_fatal() {
        let dir = create_temp_project();

        stencil()
            .current_dir(dir.path())
            .arg("env-init")
            .assert()
            .code(1)
            .stderr(predicate::str::contains(".env.example"));
    }
}

// =============================================================================
// Cleanup Orchestrator
// =============================================================================

mod cleanup {
    use super::*;

    #[test]
    fn test_cleanup_template_guard_is_a_no_op() {
        let dir = create_temp_project();
        fs::write(dir.path().join("package.json"), TEMPLATE_MANIFEST).unwrap();
        fs::write(dir.path().join("README.md"), TEMPLATE_README).unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("cleanup")
            .assert()
            .success()
            .stdout(predicate::str::contains("template name"));

        assert_eq!(
            fs::read_to_string(dir.path().join("package.json")).unwrap(),
            TEMPLATE_MANIFEST
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            TEMPLATE_README
        );
    }

    #[test]
    fn test_cleanup_dirty_guard_is_a_no_op() {
        let dir = create_temp_project();
        write_derived_project(dir.path());
        let repo = init_git_repo(dir.path());
        commit_all(&repo, "init");
        // Pending edit on a guarded path.
        fs::write(
            dir.path().join("package.json"),
            TEMPLATE_MANIFEST.replace("stencil-starter", "wip-edit"),
        )
        .unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("cleanup")
            .assert()
            .success()
            .stdout(predicate::str::contains("uncommitted changes"));

        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("wip-edit"));
        assert!(manifest.contains("template:cleanup"));
        assert!(dir.path().join("LICENSE").exists());
    }

    #[test]
    fn test_cleanup_ready_rewrites_everything() {
        let dir = create_temp_project();
        write_derived_project(dir.path());
        let repo = init_git_repo(dir.path());
        commit_all(&repo, "derive project");

        stencil()
            .current_dir(dir.path())
            .arg("cleanup")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleanup complete"));

        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("\"name\": \"my-cool-app\""));
        assert!(manifest.contains("\"version\": \"0.1.0\""));
        assert!(!manifest.contains("setup:env"));
        assert!(manifest.contains("\"db:start\": \"docker compose up -d db\""));

        let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.starts_with("# My Cool App!"));
        assert!(!readme.contains("## Quick start"));
        assert!(readme.contains("## Development"));

        assert!(!dir.path().join("LICENSE").exists());
        assert!(dir.path().join("TEMPLATE.md").exists());
    }

    #[test]
    fn test_cleanup_finalize_removes_template_doc() {
        let dir = create_temp_project();
        write_derived_project(dir.path());
        let repo = init_git_repo(dir.path());
        commit_all(&repo, "derive project");

        stencil()
            .current_dir(dir.path())
            .args(["cleanup", "--finalize"])
            .assert()
            .success();

        assert!(!dir.path().join("TEMPLATE.md").exists());

        // Re-running finalize on an already-finalized project stays calm.
        commit_all(&repo, "after cleanup");
        stencil()
            .current_dir(dir.path())
            .args(["cleanup", "--finalize"])
            .assert()
            .success();
    }

    #[test]
    fn test_cleanup_without_git_repo_runs() {
        let dir = create_temp_project();
        write_derived_project(dir.path());

        stencil()
            .current_dir(dir.path())
            .arg("cleanup")
            .assert()
            .success();

        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("my-cool-app"));
    }

    #[test]
    fn test_cleanup_json_report() {
        let dir = create_temp_project();
        write_derived_project(dir.path());

        let output = stencil()
            .current_dir(dir.path())
            .args(["cleanup", "--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["state"], "ready");
        let steps = report["steps"].as_array().unwrap();
        assert!(
            steps
                .iter()
                .any(|s| s["step"] == "manifest:persist" && s["outcome"] == "applied")
        );
    }

    #[test]
    fn test_cleanup_missing_project_name_is_partial_not_fatal() {
        let dir = create_temp_project();
        write_derived_project(dir.path());
        fs::write(dir.path().join(".env"), "APP_DOMAIN=example.com\n").unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("cleanup")
            .assert()
            .success()
            .stdout(predicate::str::contains("Partial cleanup"));

        // Script surgery still happened.
        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(!manifest.contains("template:cleanup"));
    }
}

// =============================================================================
// Status
// =============================================================================

mod status {
    use super::*;

    #[test]
    fn test_status_reports_template() {
        let dir = create_temp_project();
        fs::write(dir.path().join("package.json"), TEMPLATE_MANIFEST).unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("template"));
    }

    #[test]
    fn test_status_reports_ready() {
        let dir = create_temp_project();
        write_derived_project(dir.path());

        stencil()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("ready"));
    }

    #[test]
    fn test_status_does_not_mutate() {
        let dir = create_temp_project();
        write_derived_project(dir.path());
        let before = fs::read_to_string(dir.path().join("package.json")).unwrap();

        stencil()
            .current_dir(dir.path())
            .arg("status")
            .assert()
            .success();

        let after = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(before, after);
        assert!(dir.path().join("LICENSE").exists());
    }

    #[test]
    fn test_project_dir_flag_overrides_cwd() {
        let dir = create_temp_project();
        write_derived_project(dir.path());

        stencil()
            .arg("--project-dir")
            .arg(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("ready"));
    }
}
