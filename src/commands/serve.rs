//! Run the tempshot HTTP server.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{Overrides, load_config};
use crate::config::{Config, LogFormat};
use crate::http::{AppState, HttpSettings};
use crate::storage::FilesystemStorage;
use crate::store::ImageService;

/// Start the server and block until Ctrl-C or SIGTERM.
pub async fn execute(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    init_tracing(config.log_format);

    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let storage = FilesystemStorage::open(&config.upload.dir)?;
    if config.storage.sweep_on_start {
        let removed = storage.sweep().await?;
        if removed > 0 {
            info!(removed, "Removed files left by a previous run");
        }
    }

    let service = ImageService::new(storage, config.image.ttl());
    let state = AppState::new(service.clone(), HttpSettings::from_config(&config));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    log_banner(&config, &addr);

    crate::http::serve(listener, state, shutdown_signal()).await?;

    service.shutdown();
    info!(active_images = service.count(), "Server stopped");
    Ok(())
}

fn log_banner(config: &Config, addr: &str) {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        upload_dir = %config.upload.dir.display(),
        max_file_size_mb = config.upload.max_file_size / 1024 / 1024,
        ttl_secs = config.image.ttl_secs,
        "tempshot server started"
    );
}

/// Initialize tracing with `RUST_LOG` filtering (default `info`).
fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed when embedded in tests.
    let _ = match format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
