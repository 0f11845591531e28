//! vibe rating server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), creates an
//! in-process rating store, and serves the JSON API over HTTP.
//!
//! Every setting can also be supplied as an environment variable, e.g.
//!
//! ```sh
//! VIBE_PORT=8080 cargo run -p vibe-server --bin server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vibe_api::AppState;
use vibe_server::ServerConfig;
use vibe_store_memory::MemoryStore;

#[derive(Parser)]
#[command(author, version, about = "vibe coding rating server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  // Ratings live only as long as this process.
  let state = AppState::new(Arc::new(MemoryStore::new()), server_cfg.session());

  let app = vibe_server::router(state);
  let address = server_cfg.address();

  tracing::info!(cookie = %server_cfg.session_cookie, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
