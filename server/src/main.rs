use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

use banstore_adapters::incoming::tokio_interval::expiry_sweeper::ExpirySweeper;
use server::bootstrap::router::create_router;
use server::bootstrap::state::AppState;
use server::config_loader;
use server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;

    observability::tracing::setup_logging(&config)?;

    info!("Starting ban store server");
    info!("Configuration loaded successfully");

    let state = AppState::new(config.clone()).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = config.sweep.enabled.then(|| {
        ExpirySweeper::new(
            Arc::clone(&state.ban_service),
            Duration::from_secs(config.sweep.interval_secs),
        )
        .spawn(shutdown_rx)
    });

    let app = create_router(&state);

    let listener = TcpListener::bind(&config.server_address()).await?;
    info!("Server listening on http://{}", config.server_address());

    observability::startup_info::print_startup_info(&config);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = sweeper {
        if shutdown_tx.send(true).is_err() {
            warn!("Expiry sweeper stopped before shutdown");
        }
        if let Err(e) = handle.await {
            error!("Expiry sweeper task failed: {}", e);
        }
    }

    state.ban_service.shutdown().await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown...");
        },
        () = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        },
    }
}
