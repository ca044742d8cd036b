//! Account service: CLI server
//!
//! Headless user-account backend: registration, token login/logout,
//! profiles and per-user access checks over a REST API.
//!
//! ```sh
//! # Run with default config (~/.config/account-service/config.toml)
//! account-service
//!
//! # Custom config path
//! account-service --config /etc/account-service/config.toml
//!
//! # Override the listen port
//! account-service --port 8080
//!
//! # Validate config without starting
//! account-service --check
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};

use account_service::config::{AppConfig, ConfigError};
use account_service::server::{init_tracing, ServerHandle, ServerOptions};

/// Account service: registration, token authentication and user profiles.
#[derive(Parser, Debug)]
#[command(
    name = "account-service",
    version,
    about = "User accounts, token authentication and profiles over REST",
    long_about = "Account service: REST API for user registration, token-based \
                  login/logout, profile storage and per-user access checks.\n\n\
                  Default config: ~/.config/account-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ACCOUNT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the bootstrap superuser.
    #[arg(long)]
    no_admin: bool,
}

/// Load the config file. A broken file falls back to the defaults when
/// serving, but is an error when `strict` (`--check`) is set.
fn load_config(path: &Path, strict: bool) -> Result<AppConfig, ConfigError> {
    match AppConfig::load(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if strict => Err(e),
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", path.display(), e);
            eprintln!("Using default configuration.");
            Ok(AppConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(account_service::default_config_path);

    let mut config = match load_config(&config_path, cli.check) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // The log level override has to land before the subscriber is installed.
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    info!("Configuration: {}", config_path.display());

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start account service: {}", e);
            return Err(e);
        }
    };

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
