//! Single-upstream HTTP forwarder.
//!
//! Accepts any request on any path, replays it against one configured
//! upstream and answers with the upstream's status code only.
//!
//! ```text
//!     Caller ──▶ listener ──▶ client ip ──▶ translate ──▶ dispatch ──▶ Upstream
//!        ◀──────────────── bare status (or 502) ◀──────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forwarder::config::{build_context, load_config, ConfigOverrides};
use forwarder::observability::logging;
use forwarder::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "forwarder")]
#[command(about = "Forward every HTTP request to a single upstream", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "FORWARDER_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream base address, e.g. http://10.0.0.2:9000
    #[arg(long, env = "FORWARDER_TARGET_HOST")]
    target_host: Option<String>,

    /// Enable or disable access logging.
    #[arg(long, env = "ACCESS_LOGGING_ENABLED")]
    access_log: Option<bool>,

    /// Listener bind address.
    #[arg(long, env = "FORWARDER_BIND_ADDRESS")]
    bind: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target_host: self.target_host.clone(),
            access_log: self.access_log,
            bind_address: self.bind.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("forwarder v{} starting", env!("CARGO_PKG_VERSION"));

    let context = build_context(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start");
    })?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %context.upstream(),
        access_log = context.access_log_enabled(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    HttpServer::new(context).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
