//! The one place remote document-store failures are absorbed.
//!
//! Local storage decides whether a session is valid. The document store only
//! receives advisory copies of session metadata, so every call to it goes
//! through [`best_effort`] (awaited, result optional) or
//! [`MirrorTasks::spawn`] (detached, result discarded).

use std::future::Future;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::storage::StorageError;

/// Await a document-store call, logging and discarding any failure.
pub(super) async fn best_effort<T, F>(operation: &'static str, call: F) -> Option<T>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(operation, error = %e, "Document store call failed; continuing without it");
            None
        }
    }
}

/// Detached mirror writes that may finish after the caller has returned.
///
/// Each write runs as its own task. Handles are kept only so [`settle`]
/// can wait on them; dropping them leaves the writes running.
///
/// [`settle`]: MirrorTasks::settle
#[derive(Default)]
pub(super) struct MirrorTasks {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl MirrorTasks {
    pub(super) async fn spawn<F>(&self, operation: &'static str, call: F)
    where
        F: Future<Output = Result<(), StorageError>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            best_effort(operation, call).await;
        });

        let mut pending = self.pending.lock().await;
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    /// Wait for every mirror write spawned before this call.
    ///
    /// The lock is released before waiting, so new writes are never held up
    /// by a slow or hung one.
    pub(super) async fn settle(&self) {
        let pending = std::mem::take(&mut *self.pending.lock().await);
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Mirror task did not complete");
            }
        }
    }
}
