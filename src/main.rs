use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(version, about = "Starter-template bootstrap tool")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root to operate on (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the local .env file from .env.example if it does not exist
    EnvInit,
    /// Customize the starter for this project (manifest, README, license)
    Cleanup {
        /// Also remove the template document after a successful run
        #[arg(long)]
        finalize: bool,

        /// Print the step report as JSON instead of human-readable output
        #[arg(long)]
        json: bool,
    },
    /// Show the detected repository state without mutating anything
    Status,
    /// Run the API server with the auth-context bridge
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Enable dev mode (bind all interfaces, permissive CORS)
        #[arg(long)]
        dev: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::EnvInit => {
            cmd::cmd_env_init(&project_dir)?;
        }
        Commands::Cleanup { finalize, json } => {
            cmd::cmd_cleanup(&project_dir, *finalize, *json)?;
        }
        Commands::Status => {
            cmd::cmd_status(&project_dir)?;
        }
        Commands::Serve { port, dev } => {
            cmd::cmd_serve(&project_dir, *port, *dev).await?;
        }
    }

    Ok(())
}
