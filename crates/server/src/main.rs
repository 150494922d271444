mod api;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airshift_core::{
    load_config, validate_config, Assembler, FfmpegAssembler, HttpProvider, Scheduler,
};

use state::AppState;

/// Scheduled time-shifted radio recorder.
#[derive(Debug, Parser)]
#[command(name = "airshift", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", env = "AIRSHIFT_CONFIG")]
    config: PathBuf,

    /// Fetch one time-shift locator immediately and exit
    #[arg(long, value_name = "LOCATOR")]
    now: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    tokio::fs::create_dir_all(&config.out_dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", config.out_dir))?;

    let provider = Arc::new(
        HttpProvider::new(config.provider.clone()).context("Failed to create provider client")?,
    );
    let assembler = Arc::new(FfmpegAssembler::new(config.assembler.clone()));
    assembler
        .validate()
        .await
        .context("ffmpeg is not available")?;

    let scheduler = Scheduler::new(config.clone(), provider, assembler);

    // Ad-hoc mode: one fetch, synchronous outcome, then exit.
    if let Some(locator) = args.now {
        scheduler
            .fetch_now(&locator)
            .await
            .context("Ad-hoc fetch failed")?;
        info!("Ad-hoc fetch finished");
        return Ok(());
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let server_task = if config.server.enabled {
        let app = api::create_router(Arc::new(AppState::new(&config)));
        let addr = SocketAddr::new(config.server.host, config.server.port);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;
        info!("Feed server listening on {}", addr);

        let mut shutdown_rx = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;
            if let Err(e) = result {
                error!("Feed server error: {e}");
            }
        }))
    } else {
        info!("Feed server disabled in config");
        None
    };

    let scheduler_task = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move { scheduler.run(shutdown).await })
    };

    shutdown_signal().await;
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(());

    let _ = scheduler_task.await;
    if let Some(task) = server_task {
        let _ = task.await;
    }
    info!("Shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
