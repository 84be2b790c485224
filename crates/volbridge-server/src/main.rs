//! volbridge: expose a pactl sink over HTTP on the loopback interface

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use volbridge_config::{BridgeConfig, Overrides};
use volbridge_server::{create_app, mixer_from_config};

/// Sink volume and mute over HTTP, for dimmable-light automation bridges
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "PACTL_HTTP_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides PACTL_HTTP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Sink to control (overrides PACTL_SINK)
    #[arg(short, long)]
    sink: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = BridgeConfig::load(&Overrides {
        config_file: args.config,
        http_port: args.port,
        sink: args.sink,
    })
    .context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref());

    if which::which(&config.binary).is_err() {
        warn!(
            "{} not found on PATH, every request will fail until it is installed",
            config.binary
        );
    }

    let app = create_app(mixer_from_config(&config));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("volbridge listening on {} (sink: {})", addr, config.sink);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down");
    Ok(())
}

/// Setup logging to stdout; an explicit level wins over `RUST_LOG`
fn setup_logging(level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(false))
        .init();
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
