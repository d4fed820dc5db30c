//! CLI command definitions and handlers for the `iaped` binary.
//!
//! Uses clap derive macros. `status` and `prune` open the database directly
//! and do not require a model backend API key; only `serve` does.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use std::sync::Arc;

use iaped_core::chat::repository::ChatRepository;
use iaped_core::chat::sessions::SessionGate;
use iaped_infra::config::{load_config, resolve_data_dir};
use iaped_infra::sqlite::chat::SqliteChatRepository;
use iaped_infra::sqlite::pool::DatabasePool;

/// Pediatric assistant chat service.
#[derive(Parser)]
#[command(name = "iaped", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Show session and message counts.
    Status,

    /// Delete a caller's abandoned sessions (those with no user messages).
    Prune {
        /// Caller identifier whose empty sessions should be removed.
        owner: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Open the database in the resolved data directory.
async fn open_repository() -> anyhow::Result<(SqliteChatRepository, std::path::PathBuf)> {
    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;
    let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("iaped.db").display());
    let pool = DatabasePool::new(&db_url).await?;
    Ok((SqliteChatRepository::new(pool), data_dir))
}

/// Display session and message counts.
pub async fn status(json: bool) -> anyhow::Result<()> {
    let (repo, data_dir) = open_repository().await?;

    let sessions = repo.count_sessions().await?;
    let messages = repo.count_messages().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": data_dir.display().to_string(),
            "sessions": sessions,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Iaped v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {}", style("── Conversations ──").dim());
    println!("  Sessions: {}", style(sessions).bold());
    println!("  Messages: {}", style(messages).bold());
    println!();
    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}

/// Delete all of `owner`'s sessions that contain no user message.
pub async fn prune(owner: &str, json: bool) -> anyhow::Result<()> {
    let (repo, data_dir) = open_repository().await?;
    let config = load_config(&data_dir)?;

    let gate = SessionGate::new(Arc::new(repo), config.welcome_message);
    let pruned = gate.prune_empty_sessions(owner).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "owner": owner, "pruned": pruned })
        );
    } else {
        println!(
            "  Pruned {} empty session(s) for '{}'",
            style(pruned).bold(),
            owner
        );
    }

    Ok(())
}
