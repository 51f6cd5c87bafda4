//! The sync drain state machine
//!
//! The [`SyncEngine`] owns the drain loop for one project root:
//!
//! 1. **Selecting**: load the latest persisted queue. An occupied `current`
//!    slot (left by an unclean shutdown) is resumed exactly as persisted.
//!    Otherwise the write cache is folded into `pending`, one path is
//!    promoted to `current`, and the queue is persisted before anything
//!    touches the network.
//! 2. **Executing**: one transport call for the promoted operation; never
//!    more than one in flight per engine.
//! 3. **Finalizing**: success discards `current` and records the file
//!    identity; failure merges the entry back into `pending` so it is
//!    retried on a later drain.
//!
//! Progress and completion surface through a broadcast channel; see
//! [`SyncEvent`].
//!
//! ## Retry semantics
//!
//! There is no retry budget and no backoff: a failing path is simply
//! re-queued and picked up again on the next drain, indefinitely. Within a
//! single drain a path is attempted at most once, so a permanently failing
//! path cannot spin the loop; it just stays pending. This is a known
//! limitation, not an accident.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use padsync_core::domain::{Operation, ProjectRoot, QueueEntry, SyncPath};
use padsync_core::ports::{IMetadataStore, IRemoteTransport, IScratchStore};

use crate::cache::WriteCache;

/// Consecutive queue persistence failures tolerated before a drain gives up
/// and waits for the next trigger
const MAX_STORE_FAILURES: u32 = 5;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// SyncEvent
// ============================================================================

/// Signals emitted by the engine, observable via [`SyncEngine::subscribe`]
///
/// Ordering guarantees: `Started`/`Stopped` bracket each drain (once per
/// Idle↔non-Idle transition, not once per operation); `Progress` fires after
/// every finalized operation; `Complete` fires whenever the pending count
/// reaches zero and is always preceded by any `Progress` for the same drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The engine left Idle and began draining
    Started,
    /// The engine returned to Idle
    Stopped,
    /// An operation was finalized; carries the new pending count
    Progress(usize),
    /// The pending count reached zero
    Complete,
    /// A recoverable failure (transport or persistence); the affected path
    /// remains queued
    Error(String),
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Drains one project's sync queue against the remote store
///
/// ## Dependencies
///
/// - `store`: durable queue and file-identity persistence
/// - `transport`: the network call per operation
/// - `scratch`: best-effort storage for the write cache across restarts
///
/// At most one drain loop runs per engine instance; `sync()` while a drain
/// is active is a no-op. Local change notifications may arrive concurrently
/// with a drain — they land in the write cache and are only consulted at
/// the next Selecting phase.
pub struct SyncEngine {
    /// The project this engine drains
    root: ProjectRoot,
    /// Durable per-project metadata
    store: Arc<dyn IMetadataStore>,
    /// Network operations
    transport: Arc<dyn IRemoteTransport>,
    /// Best-effort scratch storage for crash tolerance of the cache
    scratch: Arc<dyn IScratchStore>,
    /// Buffered local-edit notifications awaiting fold-in
    cache: Mutex<WriteCache>,
    /// Guard ensuring a single active drain loop
    syncing: AtomicBool,
    /// Mirror of the persisted pending count for cheap reads
    pending: AtomicUsize,
    /// Event fan-out to subscribers
    events: broadcast::Sender<SyncEvent>,
}

impl SyncEngine {
    /// Creates a new engine for one project root
    pub fn new(
        root: ProjectRoot,
        store: Arc<dyn IMetadataStore>,
        transport: Arc<dyn IRemoteTransport>,
        scratch: Arc<dyn IScratchStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            root,
            store,
            transport,
            scratch,
            cache: Mutex::new(WriteCache::new()),
            syncing: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            events,
        }
    }

    /// The project root this engine drains
    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    /// Subscribe to engine signals
    ///
    /// Slow subscribers may observe lagging receivers; events are
    /// notifications, not a durable log.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Feed one local mutation into the write cache
    ///
    /// Cheap and non-blocking apart from the cache mutex; nothing is
    /// persisted or merged until the next drain folds the cache in.
    pub fn add_local_change(&self, path: SyncPath, operation: Operation) {
        self.cache_guard().push(path, operation);
    }

    /// Number of pending operations as of the last queue read/write
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether a drain loop is currently active
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    // ========================================================================
    // Cache persistence (startup restore / teardown flush)
    // ========================================================================

    /// Restore buffered changes persisted by a previous process, if any
    ///
    /// Restored entries are placed ahead of anything observed since this
    /// process started, preserving the original arrival order. A corrupt
    /// payload is discarded: the local unsynced intent it held is lost,
    /// which is the accepted cost of the best-effort scratch store.
    pub async fn restore_cache(&self) {
        let key = WriteCache::scratch_key(&self.root);

        let payload = match self.scratch.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "Scratch store unavailable, starting with an empty cache");
                return;
            }
        };

        if let Err(err) = self.scratch.remove(&key).await {
            warn!(error = %format!("{err:#}"), "Failed to clear scratch entry after restore");
        }

        match WriteCache::decode_payload(&payload) {
            Ok(entries) => {
                info!(count = entries.len(), "Restored buffered changes from scratch store");
                self.cache_guard().requeue_front(entries);
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "Corrupt scratch payload discarded; unsynced local intent since last teardown is lost"
                );
            }
        }
    }

    /// Serialize the write cache to the scratch store at teardown
    ///
    /// Best-effort: a failure is logged, not surfaced, because teardown has
    /// nowhere to propagate it.
    pub async fn persist_cache(&self) {
        let payload = {
            let cache = self.cache_guard();
            if cache.is_empty() {
                None
            } else {
                Some(cache.to_payload())
            }
        };

        let Some(payload) = payload else {
            return;
        };

        let key = WriteCache::scratch_key(&self.root);
        match self.scratch.set(&key, &payload).await {
            Ok(()) => debug!("Write cache persisted to scratch store"),
            Err(err) => warn!(
                error = %format!("{err:#}"),
                "Failed to persist write cache; buffered changes will be lost on restart"
            ),
        }
    }

    // ========================================================================
    // Drain loop
    // ========================================================================

    /// Request a drain of the queue
    ///
    /// A no-op while a drain is already active: at most one drain loop runs
    /// at a time per engine, which keeps the `current` slot single-valued
    /// and bounds concurrent writes against the remote project to one.
    #[tracing::instrument(skip(self), fields(root = %self.root))]
    pub async fn sync(&self) {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Drain already active, ignoring sync request");
            return;
        }

        self.emit(SyncEvent::Started);
        self.drain().await;
        self.syncing.store(false, Ordering::Release);
        self.emit(SyncEvent::Stopped);
    }

    /// One full drain: Selecting → Executing → Finalizing until the queue
    /// is empty or nothing runnable remains
    async fn drain(&self) {
        // Paths that already failed once during this drain; they stay
        // pending but are not re-picked until the next drain.
        let mut failed_this_drain: BTreeSet<SyncPath> = BTreeSet::new();
        let mut store_failures: u32 = 0;

        loop {
            // --- Selecting ---
            // Always re-read the latest persisted queue: it is the single
            // resource shared with other engine instances on this root.
            let mut queue = match self.store.get_queue(&self.root).await {
                Ok(queue) => queue,
                Err(err) => {
                    if self.report_store_failure(&mut store_failures, &err) {
                        return;
                    }
                    continue;
                }
            };

            let entry = if let Some(current) = queue.current() {
                // Interrupted mid-flight (crash or abandoned finalize):
                // repeat the persisted operation exactly as-is, without
                // re-merging. Operations are idempotent, so at-least-once
                // is safe.
                info!(
                    path = %current.path,
                    operation = %current.operation,
                    "Resuming interrupted operation"
                );
                current.clone()
            } else {
                let batch = self.cache_guard().take_all();
                for buffered in &batch {
                    queue.push_pending(buffered.path.clone(), buffered.operation);
                }

                self.set_pending(queue.pending_count());

                if queue.pending().is_empty() {
                    self.emit(SyncEvent::Complete);
                    return;
                }

                let next = queue
                    .pending()
                    .keys()
                    .find(|path| !failed_this_drain.contains(*path))
                    .cloned();

                let Some(path) = next else {
                    // Everything still pending already failed this drain.
                    // Persist the fold-in so it survives, then wait for the
                    // next trigger instead of hammering the same paths.
                    if !batch.is_empty() {
                        if let Err(err) = self.store.set_queue(&self.root, &queue).await {
                            self.cache_guard().requeue_front(batch);
                            let _ = self.report_store_failure(&mut store_failures, &err);
                        }
                    }
                    debug!(
                        pending = queue.pending_count(),
                        "All pending paths failed this drain, deferring to the next one"
                    );
                    return;
                };

                let Some(entry) = queue.promote(&path) else {
                    continue;
                };

                // Persist before executing so a crash from here on is
                // recoverable from the `current` slot.
                if let Err(err) = self.store.set_queue(&self.root, &queue).await {
                    // The fold-in never became durable: return the batch to
                    // the buffer so no intent is lost, then retry the cycle.
                    self.cache_guard().requeue_front(batch);
                    if self.report_store_failure(&mut store_failures, &err) {
                        return;
                    }
                    continue;
                }

                store_failures = 0;
                self.set_pending(queue.pending_count());
                entry
            };

            // --- Executing ---
            let result = self.execute(&entry).await;

            // --- Finalizing ---
            // Re-read before mutating: a newer intention may have been
            // folded in by another instance while the call was in flight.
            let mut queue = match self.store.get_queue(&self.root).await {
                Ok(queue) => queue,
                Err(err) => {
                    if self.report_store_failure(&mut store_failures, &err) {
                        return;
                    }
                    // The current slot is still persisted; the retry of the
                    // selection cycle resumes it.
                    continue;
                }
            };

            if queue.current() != Some(&entry) {
                warn!(
                    path = %entry.path,
                    "Current slot changed during execution, skipping finalize"
                );
                continue;
            }

            match result {
                Ok(()) => {
                    queue.finish_current();
                    info!(path = %entry.path, operation = %entry.operation, "Operation synced");
                }
                Err(err) => {
                    warn!(
                        path = %entry.path,
                        operation = %entry.operation,
                        error = %format!("{err:#}"),
                        "Operation failed, re-queuing for a later drain"
                    );
                    failed_this_drain.insert(entry.path.clone());
                    // Merged, not inserted: a superseding intention that
                    // arrived meanwhile wins over the failed operation.
                    queue.requeue_current();
                    self.emit(SyncEvent::Error(format!("{err:#}")));
                }
            }

            if let Err(err) = self.store.set_queue(&self.root, &queue).await {
                // Abort this cycle's finalize; the persisted current entry
                // is resumed by the next selection.
                if self.report_store_failure(&mut store_failures, &err) {
                    return;
                }
                continue;
            }
            store_failures = 0;

            let pending = queue.pending_count();
            self.set_pending(pending);
            self.emit(SyncEvent::Progress(pending));

            if pending == 0 {
                self.emit(SyncEvent::Complete);
                return;
            }
        }
    }

    /// Dispatch one operation to the transport and keep the file identity
    /// bookkeeping consistent with the outcome
    async fn execute(&self, entry: &QueueEntry) -> anyhow::Result<()> {
        match entry.operation {
            Operation::Update => {
                let id = self
                    .transport
                    .update(&self.root, &entry.path)
                    .await
                    .with_context(|| format!("Update failed for {}", entry.path))?;
                self.store
                    .set_file_id(&self.root, &entry.path, &id)
                    .await
                    .with_context(|| format!("Failed to record file id for {}", entry.path))?;
            }
            Operation::Delete => {
                self.transport
                    .delete(&self.root, &entry.path)
                    .await
                    .with_context(|| format!("Delete failed for {}", entry.path))?;
                self.store
                    .remove_file_id(&self.root, &entry.path)
                    .await
                    .with_context(|| format!("Failed to clear file id for {}", entry.path))?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Emit an error event for a persistence failure and decide whether the
    /// drain should give up; returns `true` to abandon the drain
    fn report_store_failure(&self, failures: &mut u32, err: &anyhow::Error) -> bool {
        *failures += 1;
        error!(
            error = %format!("{err:#}"),
            consecutive = *failures,
            "Queue persistence failure"
        );
        self.emit(SyncEvent::Error(format!("{err:#}")));

        if *failures >= MAX_STORE_FAILURES {
            error!("Too many consecutive persistence failures, abandoning drain until next trigger");
            true
        } else {
            false
        }
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine; events are advisory.
        let _ = self.events.send(event);
    }

    fn set_pending(&self, count: usize) {
        self.pending.store(count, Ordering::Release);
    }

    /// Lock the write cache, recovering from a poisoned mutex
    ///
    /// Cache state is a plain Vec; a panic mid-push cannot leave it in a
    /// shape worth abandoning buffered intent over.
    fn cache_guard(&self) -> MutexGuard<'_, WriteCache> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
