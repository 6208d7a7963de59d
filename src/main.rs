use prometheus::Registry;
use shard_sidecar::Result;
use shard_sidecar::SidecarConfig;
use shard_sidecar::TargetsManager;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = SidecarConfig::new()?.validate()?;

    // Initializing Logs
    init_observability(&config.log.level);
    info!("starting with {:?}", config);

    let registry = Registry::new();
    let manager = TargetsManager::new(&config.store, &registry)?;
    manager.load()?;

    manager.read_snapshot(|snapshot| {
        info!(
            "restored {} jobs, {} targets, idle since {:?}",
            snapshot.targets.len(),
            snapshot.status.len(),
            snapshot.idle_at
        );
    });

    info!("Application started. Waiting for shutdown signal...");
    if let Err(e) = graceful_shutdown().await {
        error!("Failed to wait for shutdown signal: {:?}", e);
    }

    info!("Exiting, final state: {:?}", manager);
    Ok(())
}

async fn graceful_shutdown() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_observability(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
