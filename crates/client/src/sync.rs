//! Serialized background sync.
//!
//! The client pushes its whole item collection after every mutation. The
//! [`SyncWorker`] guarantees at most one push is in flight: snapshots
//! submitted while a push is running replace each other, and only the newest
//! is sent once the running push finishes. The store therefore always ends
//! up holding the latest submitted state, never an older one that happened to
//! finish last.

use std::sync::Arc;

use async_trait::async_trait;
use devsnippet_core::item::Item;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::error::ClientError;

/// Monotonic number assigned to each submitted snapshot, starting at 1.
pub type Revision = u64;

/// Destination for full-collection pushes.
#[async_trait]
pub trait SyncTarget: Send + Sync + 'static {
    /// Replace the remote collection with `items`, returning the stored count.
    async fn push(&self, items: &[Item]) -> Result<usize, ClientError>;
}

#[async_trait]
impl SyncTarget for ApiClient {
    async fn push(&self, items: &[Item]) -> Result<usize, ClientError> {
        Ok(self.sync_items(items).await?.count)
    }
}

/// Observable state of the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing submitted yet.
    Idle,
    InFlight {
        revision: Revision,
    },
    Synced {
        revision: Revision,
        count: usize,
    },
    Failed {
        revision: Revision,
        message: String,
    },
}

impl SyncStatus {
    pub fn revision(&self) -> Option<Revision> {
        match self {
            SyncStatus::Idle => None,
            SyncStatus::InFlight { revision }
            | SyncStatus::Synced { revision, .. }
            | SyncStatus::Failed { revision, .. } => Some(*revision),
        }
    }

    /// True once a push for `revision` or a later one has finished.
    pub fn is_settled_at(&self, revision: Revision) -> bool {
        match self {
            SyncStatus::Synced { revision: r, .. } | SyncStatus::Failed { revision: r, .. } => {
                *r >= revision
            }
            SyncStatus::Idle | SyncStatus::InFlight { .. } => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    revision: Revision,
    items: Arc<Vec<Item>>,
}

/// Handle to the background sync task.
pub struct SyncWorker {
    snapshots: watch::Sender<Option<Snapshot>>,
    status: watch::Receiver<SyncStatus>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncWorker {
    /// Spawn the worker on the current tokio runtime. It stops when `cancel`
    /// is triggered or [`SyncWorker::shutdown`] is called.
    pub fn spawn<T: SyncTarget>(target: Arc<T>, cancel: CancellationToken) -> Self {
        let (snapshots, snapshot_rx) = watch::channel(None);
        let (status_tx, status) = watch::channel(SyncStatus::Idle);

        let task = tokio::spawn(run(target, snapshot_rx, status_tx, cancel.clone()));

        Self {
            snapshots,
            status,
            cancel,
            task,
        }
    }

    /// Queue `items` as the next state to push and return its revision. Any
    /// snapshot still waiting to be pushed is discarded.
    pub fn submit(&self, items: Vec<Item>) -> Revision {
        let items = Arc::new(items);
        let mut revision = 0;
        self.snapshots.send_modify(|slot| {
            revision = slot.as_ref().map_or(0, |s| s.revision) + 1;
            *slot = Some(Snapshot {
                revision,
                items: Arc::clone(&items),
            });
        });
        tracing::debug!(revision, count = items.len(), "Sync snapshot queued");
        revision
    }

    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// A receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Wait until `revision` (or a newer snapshot that superseded it) has
    /// been pushed, and return the resulting status. Returns the last known
    /// status if the worker stops first.
    pub async fn wait_for(&self, revision: Revision) -> SyncStatus {
        let mut rx = self.status.clone();
        let settled = match rx.wait_for(|s| s.is_settled_at(revision)).await {
            Ok(status) => Some(status.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.status())
    }

    /// Stop the worker, letting a push already in flight finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Sync worker task failed");
        }
    }
}

async fn run<T: SyncTarget>(
    target: Arc<T>,
    mut snapshots: watch::Receiver<Option<Snapshot>>,
    status: watch::Sender<SyncStatus>,
    cancel: CancellationToken,
) {
    tracing::debug!("Sync worker started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let latest = snapshots.borrow_and_update().clone();
        let Some(snapshot) = latest else {
            continue;
        };

        status.send_replace(SyncStatus::InFlight {
            revision: snapshot.revision,
        });

        let next = match target.push(&snapshot.items).await {
            Ok(count) => {
                tracing::debug!(revision = snapshot.revision, count, "Sync complete");
                SyncStatus::Synced {
                    revision: snapshot.revision,
                    count,
                }
            }
            Err(e) => {
                tracing::warn!(
                    revision = snapshot.revision,
                    retryable = e.is_retryable(),
                    error = %e,
                    "Sync failed"
                );
                SyncStatus::Failed {
                    revision: snapshot.revision,
                    message: e.to_string(),
                }
            }
        };
        status.send_replace(next);
    }

    tracing::debug!("Sync worker stopped");
}
