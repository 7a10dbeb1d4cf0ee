//! sessionward - command-line front end for the dashboard session.
//!
//! Stands in for the dashboard UI: it logs in with a token obtained
//! elsewhere, makes authorized API requests, walks the guarded routes and
//! logs out. `shell` keeps one process alive so that sessions which are not
//! remembered last until the shell exits.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use sessionward_core::{Config, MemoryStorage, SessionApp, ToastQueue};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;

/// Log file name in the cache directory
const LOG_FILE: &str = "sessionward.log";

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // File logging is best effort; the CLI still works without a cache dir
    let (file_layer, guard) = match Config::cache_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    if command == Command::Help {
        println!("{}", commands::USAGE);
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    info!(api = %config.api_base_url, backend = ?config.durable_backend, "sessionward starting");

    let toasts = Arc::new(ToastQueue::new());
    let app = SessionApp::new(
        &config,
        config.durable_storage()?,
        Arc::new(MemoryStorage::new()),
        toasts.clone(),
    )
    .context("Failed to set up API client")?;

    if command == Command::Shell {
        commands::shell(&app, &toasts).await
    } else {
        commands::run(&app, &toasts, command).await
    }
}
