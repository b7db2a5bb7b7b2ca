//! Write-behind persistence.
//!
//! In-memory state is updated first; the serialized document is then handed
//! to a dedicated worker thread that owns the [`KvStore`]. Writes queued for
//! the same key before the worker gets to them collapse to the newest value.
//! Storage failures are logged on the worker and never reach the caller.

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use super::KvStore;
use crate::error::StorageError;

enum WriteCommand {
    Set { key: String, value: String },
    Flush(mpsc::Sender<()>),
    Shutdown,
}

struct WriterInner {
    sender: mpsc::Sender<WriteCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for WriterInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(WriteCommand::Shutdown) {
                error!("failed to send shutdown to storage writer: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("failed to join storage writer: {join_err:?}");
            }
        }
    }
}

/// Handle to the background writer. Cheap to clone; the worker drains its
/// queue and exits when the last handle is dropped.
#[derive(Clone)]
pub struct WriteBehind {
    inner: Arc<WriterInner>,
}

impl WriteBehind {
    /// Move `store` onto a new worker thread.
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<S: KvStore + 'static>(store: S) -> Result<Self, StorageError> {
        let (sender, receiver) = mpsc::channel::<WriteCommand>();
        let worker = thread::Builder::new()
            .name("roundbell-writer".into())
            .spawn(move || run_worker(store, receiver))
            .map_err(|e| StorageError::WriterUnavailable(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(WriterInner {
                sender,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Queue `value` for `key`. Returns immediately.
    pub fn write(&self, key: &str, value: String) {
        let command = WriteCommand::Set {
            key: key.to_string(),
            value,
        };
        if self.inner.sender.send(command).is_err() {
            error!(key, "storage writer is gone; dropping write");
        }
    }

    /// Block until every write queued before this call has been applied.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.inner.sender.send(WriteCommand::Flush(ack_tx)).is_err() {
            warn!("storage writer is gone; nothing to flush");
            return;
        }
        if ack_rx.recv().is_err() {
            warn!("storage writer exited before acknowledging flush");
        }
    }
}

fn run_worker<S: KvStore>(store: S, receiver: mpsc::Receiver<WriteCommand>) {
    let mut pending: HashMap<String, String> = HashMap::new();
    let mut acks: Vec<mpsc::Sender<()>> = Vec::new();

    while let Ok(first) = receiver.recv() {
        let mut shutdown = absorb(first, &mut pending, &mut acks);
        while !shutdown {
            match receiver.try_recv() {
                Ok(next) => shutdown = absorb(next, &mut pending, &mut acks),
                Err(_) => break,
            }
        }

        for (key, value) in pending.drain() {
            match store.set(&key, &value) {
                Ok(()) => debug!(key = %key, bytes = value.len(), "document persisted"),
                Err(err) => error!(key = %key, "failed to persist document: {err}"),
            }
        }
        for ack in acks.drain(..) {
            let _ = ack.send(());
        }

        if shutdown {
            break;
        }
    }

    debug!("storage writer shutting down");
}

/// Folds one command into the current batch. Returns true on shutdown.
fn absorb(
    command: WriteCommand,
    pending: &mut HashMap<String, String>,
    acks: &mut Vec<mpsc::Sender<()>>,
) -> bool {
    match command {
        WriteCommand::Set { key, value } => {
            pending.insert(key, value);
            false
        }
        WriteCommand::Flush(ack) => {
            acks.push(ack);
            false
        }
        WriteCommand::Shutdown => true,
    }
}
