//! affdash - command-line console for the affiliate admin backend.
//!
//! Every command runs through the core `ApiClient`, so an expired access
//! token is refreshed transparently and a dead session ends with a hint to
//! log in again.

mod cli;
mod commands;
mod output;

use std::io;
use std::path::Path;
use std::sync::Arc;

use affdash_core::{ApiClient, Config, FileSessionStore, SessionStore};
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use output::print_error;

/// Log file name prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "affdash.log";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=affdash_core=debug).
/// The returned guard flushes the log file on drop.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    if let Err(e) = run(cli).await {
        print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    info!(base_url = %config.base_url(), "affdash starting");

    let client = make_client(&config, cli.session_key.as_deref())?;

    match cli.command {
        Commands::Login(args) => commands::auth::login(&client, &mut config, &args).await,
        Commands::Logout(args) => commands::auth::logout(&client, &config, &args).await,
        Commands::Whoami => commands::auth::whoami(&client),
        Commands::Users(cmd) => commands::resources::users(&client, cmd).await,
        Commands::Servers(cmd) => commands::resources::servers(&client, cmd).await,
        Commands::ServerRequests(cmd) => commands::resources::server_requests(&client, cmd).await,
        Commands::Applications(cmd) => commands::resources::applications(&client, cmd).await,
        Commands::Affiliates(cmd) => commands::resources::affiliates(&client, cmd).await,
        Commands::Commissions(cmd) => commands::resources::commissions(&client, cmd).await,
        Commands::Withdrawals(cmd) => commands::resources::withdrawals(&client, cmd).await,
        Commands::AdminRoles(cmd) => commands::resources::admin_roles(&client, cmd).await,
        Commands::Dashboard(cmd) => commands::dashboard::run(&client, cmd).await,
    }
}

fn make_client(config: &Config, session_key: Option<&str>) -> Result<ApiClient> {
    let cache_dir = config.cache_dir()?;
    let store: Arc<dyn SessionStore> = match session_key.filter(|k| !k.is_empty()) {
        Some(key) => Arc::new(FileSessionStore::encrypted(cache_dir, key)),
        None => Arc::new(FileSessionStore::new(cache_dir)),
    };
    debug!("Session store ready");
    Ok(ApiClient::new(config, store)?)
}
