//! Engine lifecycle and periodic drive loop
//!
//! The [`EngineHandle`] owns the background task that keeps a
//! [`SyncEngine`](crate::engine::SyncEngine) draining:
//!
//! 1. On startup it restores the write cache from the scratch store and
//!    runs one immediate drain, which resumes any operation interrupted by
//!    an unclean shutdown.
//! 2. Thereafter a fixed-interval timer triggers a drain; explicit
//!    [`sync_now`](EngineHandle::sync_now) requests bypass the timer.
//! 3. On shutdown the remaining write cache is serialized to the scratch
//!    store so buffered intent survives the restart.
//!
//! Callers wanting to stop syncing simply stop the handle; a drain that is
//! already executing always runs its in-flight operation to completion.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::SyncEngine;

/// Handle owning the periodic drain task for one engine
///
/// Dropping the handle does not stop the task; call
/// [`stop`](EngineHandle::stop) for a clean shutdown that flushes the
/// write cache.
pub struct EngineHandle {
    engine: Arc<SyncEngine>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Start the periodic drive loop
    ///
    /// # Arguments
    /// * `engine` - the engine to drive
    /// * `poll_interval` - time between periodic drains
    /// * `shutdown` - token that stops the loop when cancelled
    pub fn start(
        engine: Arc<SyncEngine>,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        info!(
            root = %engine.root(),
            poll_secs = poll_interval.as_secs(),
            "Starting sync drive loop"
        );

        let task = tokio::spawn(Self::run(
            Arc::clone(&engine),
            poll_interval,
            shutdown.clone(),
        ));

        Self {
            engine,
            shutdown,
            task,
        }
    }

    /// The engine behind this handle
    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Request an immediate drain without waiting for the timer
    ///
    /// Idempotent while a drain is already running, like every `sync()`.
    pub fn sync_now(&self) {
        debug!(root = %self.engine.root(), "Immediate sync requested");
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            engine.sync().await;
        });
    }

    /// Stop the drive loop and flush the write cache
    pub async fn stop(self) {
        self.shutdown.cancel();
        // The task flushes the cache on its way out.
        let _ = self.task.await;
    }

    /// The background loop: startup recovery drain, then interval ticks
    /// until cancelled, then a teardown cache flush
    async fn run(engine: Arc<SyncEngine>, poll_interval: Duration, shutdown: CancellationToken) {
        engine.restore_cache().await;

        // Startup drain: resumes an interrupted `current` operation and
        // pushes out anything restored into the cache.
        engine.sync().await;

        let mut timer = tokio::time::interval(poll_interval);
        // The first tick completes immediately and is covered by the
        // startup drain above.
        timer.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(root = %engine.root(), "Sync drive loop shutting down");
                    break;
                }
                _ = timer.tick() => {
                    engine.sync().await;
                }
            }
        }

        engine.persist_cache().await;
    }
}
