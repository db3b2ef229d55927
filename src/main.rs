//! CORS relay.
//!
//! ```text
//!   Browser ──GET /?url=<encoded>──▶ ┌────────────┐ ──GET <url>──▶ Upstream
//!           X-Football-API-Key       │   relay    │  X-Auth-Token    API
//!                                    │ :8888      │
//!   Browser ◀──200 + CORS headers─── └────────────┘ ◀──body──────
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;

use cors_relay::config::{validate_config, RelayConfig, DEFAULT_BIND_ADDRESS};
use cors_relay::lifecycle::{signals, Shutdown};
use cors_relay::observability::init_logging;
use cors_relay::RelayServer;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Relay GET requests to an upstream API and add CORS headers", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value_t = DEFAULT_BIND_ADDRESS)]
    bind: SocketAddr,

    /// Total timeout for the upstream request, in seconds
    #[arg(long, default_value_t = 30)]
    upstream_timeout_secs: u64,

    /// Timeout for connecting to the upstream, in seconds
    #[arg(long, default_value_t = 5)]
    connect_timeout_secs: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Cli> for RelayConfig {
    fn from(cli: Cli) -> Self {
        let mut config = RelayConfig::default();
        config.listener.bind_address = cli.bind;
        config.timeouts.upstream_secs = cli.upstream_timeout_secs;
        config.timeouts.connect_secs = cli.connect_timeout_secs;
        config.observability.log_level = cli.log_level;
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::from(Cli::parse());
    validate_config(&config)?;

    init_logging(&config.observability);

    let listener = TcpListener::bind(config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "CORS relay listening on http://{}", local_addr);
    tracing::info!("Use ?url=<URL_ENCODED> to relay a request");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        match signals::wait_for_signal().await {
            Ok(()) => shutdown.trigger(),
            Err(e) => {
                // Keep the sender alive so the server is not stopped by a closed channel.
                tracing::error!(error = %e, "Failed to listen for shutdown signals");
                std::future::pending::<()>().await;
            }
        }
    });

    RelayServer::new(config)?.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
