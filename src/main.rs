//! Task Reminder Service
//!
//! Opens the task database, creates the schema if needed, and runs the
//! background due-reminder scanner until shutdown. The HTTP API layer in
//! front of the store is external; this binary owns the store and the
//! scanner.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use task_reminder::config::Config;
use task_reminder::db::Database;
use task_reminder::notify::{LogTransport, Notifier};
use task_reminder::notify::email::EmailTransport;
use task_reminder::scanner::Scanner;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Task reminder service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Seconds between scan cycles (overrides config)
    #[arg(short, long)]
    interval_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the notifier from config: a real SMTP transport when configured,
/// log-only transports otherwise. Push has no real backend in this build.
fn build_notifier(config: &Config) -> Notifier {
    let notifier = match &config.smtp {
        Some(smtp) => match EmailTransport::new(smtp) {
            Ok(transport) => Notifier::new().with_transport("email", Arc::new(transport)),
            Err(e) => {
                warn!(error = %e, "invalid smtp config, falling back to log-only email");
                Notifier::new().with_transport("email", Arc::new(LogTransport::new("email")))
            }
        },
        None => Notifier::new().with_transport("email", Arc::new(LogTransport::new("email"))),
    };
    notifier.with_transport("push", Arc::new(LogTransport::new("push")))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(db_path) = cli.database {
        config.database = db_path;
    }
    if let Some(secs) = cli.interval_secs {
        config.scan.interval_secs = secs;
    }

    if let Some(parent) = config.database.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }

    let db = Database::open(&config.database)
        .with_context(|| format!("opening database {}", config.database.display()))?;
    info!(database = %config.database.display(), "database ready");

    let notifier = Arc::new(build_notifier(&config));
    let scanner = Scanner::new(
        db,
        notifier,
        Duration::from_secs(config.scan.interval_secs),
    );

    let scan_handle = tokio::spawn(scanner.run());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
        result = scan_handle => {
            // The scan loop never returns; reaching here means it panicked.
            result.context("reminder scanner terminated")?;
        }
    }

    Ok(())
}
