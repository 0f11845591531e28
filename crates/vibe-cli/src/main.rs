//! `vibe` — command-line client for the vibe rating service.
//!
//! # Usage
//!
//! ```sh
//! vibe stats
//! vibe status
//! vibe rate 8
//! vibe --url http://ratings.example.com rate 8
//! ```
//!
//! The session cookie issued by the server is kept in a small TOML file so
//! that repeated runs count as the same visitor.

mod client;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, RateOutcome};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vibe", about = "Rate how the vibe coding is going")]
struct Args {
  /// Base URL of the vibe server.
  #[arg(long, env = "VIBE_URL", default_value = "http://localhost:5000")]
  url: String,

  /// Name of the session cookie the server issues.
  #[arg(long, env = "VIBE_SESSION_COOKIE", default_value = "vibe_session")]
  cookie: String,

  /// Where the session id is remembered between runs.
  #[arg(long, value_name = "FILE", default_value = "~/.config/vibe/session.toml")]
  session_file: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the number of ratings and their average.
  Stats,
  /// Show whether this client has already rated.
  Status,
  /// Submit a rating from 1 to 10.
  Rate {
    #[arg(allow_negative_numbers = true)]
    rating: i64,
  },
}

// ─── Session file ─────────────────────────────────────────────────────────────

/// Shape of the session file.
#[derive(Serialize, Deserialize, Default)]
struct SessionFile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  session: Option<String>,
}

impl SessionFile {
  fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading session file {}", path.display()))?;
    toml::from_str(&raw).context("parsing session file")
  }

  fn save(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    }
    let raw = toml::to_string(self).context("serialising session file")?;
    std::fs::write(path, raw)
      .with_context(|| format!("writing session file {}", path.display()))
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let session_path = expand_tilde(&args.session_file);
  let saved = SessionFile::load(&session_path)?;

  let mut client = ApiClient::new(
    ApiConfig {
      base_url:    args.url,
      cookie_name: args.cookie,
    },
    saved.session.clone(),
  )?;

  match args.command {
    Command::Stats => {
      let stats = client.stats().await?;
      println!("ratings: {}", stats.total);
      println!("average: {:.1}", stats.average);
    }
    Command::Status => {
      let status = client.user_status().await?;
      if status.has_rated {
        println!("You have already rated.");
      } else {
        println!("You have not rated yet.");
      }
    }
    Command::Rate { rating } => match client.rate(rating).await? {
      RateOutcome::Accepted(sub) => {
        println!("Recorded rating #{}: {}", sub.rating.id, sub.rating.rating.get());
        println!("ratings: {}", sub.stats.total);
        println!("average: {:.1}", sub.stats.average);
      }
      RateOutcome::Rejected(message) => println!("{message}"),
    },
  }

  // Persist any session the server handed out.
  let current = client.session().map(str::to_owned);
  if current != saved.session {
    SessionFile { session: current }.save(&session_path)?;
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
