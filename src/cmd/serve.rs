//! API server command — `stencil serve`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use stencil::env_init::ENV_FILE;
use stencil::server::session::TrustedHeaderResolver;
use stencil::server::{ServerConfig, start_server};

pub async fn cmd_serve(project_dir: &Path, port: u16, dev: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The env file is operator-owned configuration; absent keys just mean
    // the corresponding features stay off.
    let env_path = project_dir.join(ENV_FILE);
    if env_path.exists() {
        dotenvy::from_path(&env_path).ok();
    }
    let database_url = std::env::var("DATABASE_URL").ok();

    let config = ServerConfig {
        port,
        database_url,
        dev_mode: dev,
    };
    start_server(config, Arc::new(TrustedHeaderResolver)).await
}
