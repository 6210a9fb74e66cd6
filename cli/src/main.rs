//! EV station directory CLI server
//!
//! ```sh
//! # Run with the default config (~/.config/evstation/config.toml)
//! evstation
//!
//! # Custom config path and port
//! evstation --config /etc/evstation/config.toml --port 9000
//!
//! # Validate the config without starting
//! evstation --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use evstation::config::AppConfig;
use evstation::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "evstation",
    version,
    about = "REST API for an EV charging station directory",
    long_about = "Serves the station directory, operator inventory and live \
                  port occupancy over a JSON REST API.\n\n\
                  Default config: ~/.config/evstation/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML)
    #[arg(short, long, env = "EVSTATION_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the bootstrap admin
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(evstation::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.check {
        return match loaded {
            Ok(_) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.server.address());
                println!("   Database    : {}", config.database.connection_url());
                println!("   Log level   : {}", config.logging.level);
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("{}", e);
            error!("Using default configuration.");
        }
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
