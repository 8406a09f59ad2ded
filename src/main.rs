//! Utils RPC Node
//!
//! Serves the `utils` JSON-RPC namespace. Its one method,
//! `utils_convertAddress`, turns a `0x` hex account address into the
//! network's bech32 form and back.

use std::sync::Arc;

use tracing::info;
use utils_rpc::config::{Config, LogFormat};
use utils_rpc::{server, Metrics, UtilsApi};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> eyre::Result<()> {
    let config = Config::load()?;
    init_logging(config.log_format);

    info!("Starting Utils RPC Node");
    info!(
        prefix = %config.account_prefix,
        addr = %config.socket_addr(),
        "Configuration loaded"
    );

    let api = Arc::new(UtilsApi::from_prefix(config.account_prefix.as_str())?);
    let metrics = Arc::new(Metrics::new());

    server::start_server(
        config.socket_addr(),
        api,
        metrics,
        wait_for_shutdown_signal(),
    )
    .await?;

    info!("Utils RPC Node stopped");
    Ok(())
}

fn init_logging(format: LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,utils_rpc=debug"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).init(),
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}
