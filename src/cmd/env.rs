//! Environment initializer command — `stencil env-init`.

use anyhow::Result;
use std::path::Path;

use stencil::env_init::{EnvInitOutcome, OPTIONAL_KEYS, REQUIRED_KEYS, init_env};

/// Exit code signalling "environment file created, review it before
/// continuing". A deliberate hard stop for the operator, not an error.
pub const EXIT_ENV_CREATED: i32 = 2;

pub fn cmd_env_init(project_dir: &Path) -> Result<()> {
    match init_env(project_dir)? {
        EnvInitOutcome::AlreadyExists { path } => {
            println!("Environment file already present at {}", path.display());
            Ok(())
        }
        EnvInitOutcome::Created { path } => {
            println!(
                "{} {}",
                console::style("Created").green().bold(),
                path.display()
            );
            println!();
            println!("Fill in the required keys before continuing:");
            for key in REQUIRED_KEYS {
                println!("  {}", console::style(key).bold());
            }
            println!();
            println!("Optional keys (defaults are fine for local development):");
            for key in OPTIONAL_KEYS {
                println!("  {}", console::style(key).dim());
            }
            println!();
            println!("Review the file, then re-run your setup command.");

            // Forces the operator to stop here; downstream tooling treats
            // this exit code as "created, come back after editing".
            std::process::exit(EXIT_ENV_CREATED);
        }
    }
}
