//! Append queue - single background writer for the event store
//!
//! Handlers must answer without waiting for the file to be rewritten,
//! but an accepted event must still reach the log. Handlers push events
//! onto an unbounded channel; one spawned task drains it and calls
//! `EventStore::append_event` for each, in arrival order. The queue owns
//! the task's `JoinHandle`, so shutdown waits for the backlog instead of
//! abandoning it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::store::EventStore;
use crate::types::Event;

/// Cloneable handle used by request handlers to submit events
#[derive(Debug, Clone)]
pub struct AppendHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl AppendHandle {
    /// Queue an event for persistence without waiting for it
    ///
    /// Returns `false` if the writer has already shut down.
    pub fn submit(&self, event: Event) -> bool {
        if self.tx.send(event).is_err() {
            error!("Append queue is closed, event dropped");
            return false;
        }
        true
    }
}

/// Owner of the background writer task
pub struct AppendQueue {
    handle: AppendHandle,
    worker: JoinHandle<usize>,
}

impl AppendQueue {
    /// Spawn the writer task for `store`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(store: Arc<EventStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_writer(store, rx));

        Self {
            handle: AppendHandle { tx },
            worker,
        }
    }

    /// Get a handle for submitting events
    pub fn handle(&self) -> AppendHandle {
        self.handle.clone()
    }

    /// Close the queue and wait until every submitted event is written
    ///
    /// The writer stops once all `AppendHandle` clones are dropped, so
    /// callers must release theirs (e.g. by dropping the router) first.
    /// Returns the number of events processed.
    pub async fn shutdown(self) -> usize {
        drop(self.handle);
        match self.worker.await {
            Ok(processed) => processed,
            Err(e) => {
                error!(error = %e, "Append queue worker failed");
                0
            }
        }
    }
}

async fn run_writer(store: Arc<EventStore>, mut rx: mpsc::UnboundedReceiver<Event>) -> usize {
    let path = store.config().file_path().display().to_string();
    let mut processed = 0;

    while let Some(event) = rx.recv().await {
        match store.append_event(event).await {
            Ok(total) => info!(path = %path, total, "Attempt saved"),
            Err(e) => error!(path = %path, error = %e, "Failed to save attempt"),
        }
        processed += 1;
    }

    info!(processed, "Append queue drained");
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::EventStoreConfig;
    use tempfile::TempDir;

    fn create_test_store() -> (Arc<EventStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventStoreConfig::new(temp_dir.path().join("attempts.json"));
        (Arc::new(EventStore::with_config(config)), temp_dir)
    }

    #[tokio::test]
    async fn test_shutdown_drains_backlog() {
        let (store, _temp_dir) = create_test_store();
        let queue = AppendQueue::spawn(Arc::clone(&store));
        let handle = queue.handle();

        for i in 0..20 {
            assert!(handle.submit(Event::builder().identity(Some(format!("u{}", i))).build()));
        }
        drop(handle);

        assert_eq!(queue.shutdown().await, 20);

        let events = store.load_events().await;
        assert_eq!(events.len(), 20);
        assert_eq!(events[0].identity.as_deref(), Some("u0"));
        assert_eq!(events[19].identity.as_deref(), Some("u19"));
    }

    #[test]
    fn test_submit_to_closed_queue_is_rejected() {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        drop(rx);
        let handle = AppendHandle { tx };

        assert!(!handle.submit(Event::builder().build()));
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_worker() {
        let temp_dir = TempDir::new().unwrap();
        // Renaming over a directory fails every time
        let path = temp_dir.path().join("attempts.json");
        std::fs::create_dir(&path).unwrap();
        let store = Arc::new(EventStore::with_config(EventStoreConfig::new(&path)));
        let queue = AppendQueue::spawn(store);
        let handle = queue.handle();

        handle.submit(Event::builder().build());
        handle.submit(Event::builder().build());
        drop(handle);

        assert_eq!(queue.shutdown().await, 2);
    }
}
