//! Padsync Daemon - Background synchronization service
//!
//! This binary runs as a long-lived user service and handles:
//! - Draining the project's sync queue against the publish service
//! - Periodic polling for buffered local changes
//! - Crash recovery of interrupted operations on startup
//! - Graceful shutdown on SIGTERM/SIGINT, flushing the write cache
//!
//! # Architecture
//!
//! The daemon wires the SQLite metadata store, the flat-file scratch
//! store, and the publish transport into one `SyncEngine`, then hands the
//! engine to an `EngineHandle` that owns the periodic drive loop. The
//! loop is controlled by a `CancellationToken` that is triggered on
//! receipt of SIGTERM or SIGINT.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use padsync_core::config::Config;
use padsync_core::domain::ProjectRoot;
use padsync_engine::{filesystem::TokioFileSystem, EngineHandle, SyncEngine};
use padsync_remote::{PublishClient, PublishTransport};
use padsync_store::{DatabasePool, FileScratchStore, SqliteMetadataStore};

// ============================================================================
// DaemonService
// ============================================================================

/// Main daemon service wiring the adapters into the sync engine
struct DaemonService {
    /// Application configuration loaded from YAML
    config: Config,
    /// Token for signalling graceful shutdown
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Creates a new DaemonService from the default configuration path
    fn new(shutdown: CancellationToken) -> Result<Self> {
        let config_path = Config::default_path();
        let config = Config::load_or_default(&config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        config.validate().context("Invalid configuration")?;

        Ok(Self { config, shutdown })
    }

    /// Runs the daemon until the shutdown token is cancelled
    ///
    /// 1. Opens the metadata database and the scratch directory
    /// 2. Wires the publish transport against the configured remote
    /// 3. Starts the engine's periodic drive loop
    /// 4. Waits for shutdown and stops the loop, flushing the cache
    async fn run(&self) -> Result<()> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("padsync");

        let db_pool = DatabasePool::new(&data_dir.join("padsync.db"))
            .await
            .context("Failed to open metadata database")?;
        let store = Arc::new(SqliteMetadataStore::new(db_pool.pool().clone()));

        let scratch = Arc::new(
            FileScratchStore::new(data_dir.join("scratch"))
                .context("Failed to open scratch directory")?,
        );

        let filesystem = Arc::new(TokioFileSystem::new());

        let client = PublishClient::new(
            self.config.remote.host.clone(),
            self.config.remote.project_id,
            self.config.remote.csrf_token.clone(),
        );
        let transport = Arc::new(PublishTransport::new(
            client,
            Arc::clone(&store) as Arc<dyn padsync_core::ports::IMetadataStore>,
            Arc::clone(&filesystem) as Arc<dyn padsync_core::ports::ILocalFileSystem>,
        ));

        let root = ProjectRoot::new(self.config.sync.root.clone())
            .context("sync.root is not a valid project root")?;

        let engine = Arc::new(SyncEngine::new(root, store, transport, scratch));

        let handle = EngineHandle::start(
            engine,
            Duration::from_secs(self.config.sync.poll_interval),
            self.shutdown.child_token(),
        );

        self.shutdown.cancelled().await;

        info!("Shutdown requested, stopping sync loop");
        handle.stop().await;

        Ok(())
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing before anything can log
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let config = Config::load_or_default(&Config::default_path());
        EnvFilter::new(config.logging.level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!("Padsync daemon starting (padsyncd)");

    let shutdown_token = CancellationToken::new();

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(shutdown_token.clone())?;
    let result = service.run().await;

    match &result {
        Ok(()) => info!("Padsync daemon shut down gracefully"),
        Err(e) => error!(error = %e, "Padsync daemon exiting with error"),
    }

    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_child_propagation() {
        let parent = CancellationToken::new();
        let child = parent.child_token();

        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
    }
}
