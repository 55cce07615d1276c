// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
// Suppress clippy warnings about unknown/renamed dylint lint names
#![allow(unknown_lints, renamed_and_removed_lints, max_lines_per_file)]
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

mod app;
mod commands;

use app::Args;
use clap::Parser;
use color_eyre::eyre::Result;
use gamifier_admin::config::{load_config, load_config_from};
use gamifier_admin::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use gamifier_admin::session::{AuthInitializer, LocalSessionProvider, Session};
use gamifier_admin::store::SqliteStore;
use gamifier_admin::AdminContext;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    // Configure and initialize logging
    let log_dir = args.log_dir.clone().unwrap_or_else(|| config.log_dir());
    let log_file = log_dir.join(LOG_FILENAME);
    let mut log_config = LogConfig::from_settings(&config.logging, log_dir, args.log_json);
    if let Some(rotation) = &args.log_rotation {
        log_config.rotation = parse_rotation(rotation);
    }

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!();
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    let store_path = args.store.clone().unwrap_or_else(|| config.store_path());
    let store = Arc::new(SqliteStore::open(&store_path)?);
    info!("Using store at {}", store_path.display());

    let session = args
        .user
        .clone()
        .map(|user_id| Session::new(user_id, args.email.clone()));
    let sessions = Arc::new(LocalSessionProvider::new(session));
    let ctx = Arc::new(AdminContext::new(
        store,
        sessions,
        config.content_defaults()?,
    ));

    // Make sure the signed-in admin has a profile before anything else runs.
    let mut initializer = AuthInitializer::spawn(ctx.clone());
    if ctx.current_session().is_some() {
        if let Some(outcome) = initializer.next_outcome().await {
            match outcome.result {
                Ok(status) => info!(user_id = %outcome.user_id, ?status, "Admin profile ready"),
                Err(e) => warn!(user_id = %outcome.user_id, "Admin profile unavailable: {e}"),
            }
        }
    }
    initializer.shutdown();

    let output = commands::run(&ctx, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
