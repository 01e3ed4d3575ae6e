//! Trailing-edge debouncer for interactive recomputation.
//!
//! Every [`Debouncer::call`] replaces the pending value. The callback runs
//! once the sender has been quiet for the configured period, and only with
//! the most recent value. Closing the debouncer flushes whatever is still
//! pending.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::trace;

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Starts the worker task on the current tokio runtime.
    pub fn spawn<F>(
        quiet: Duration,
        on_settle: F,
    ) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(settle_loop(rx, quiet, on_settle));
        Self { tx, worker }
    }

    /// Queues `value`, superseding anything not yet settled.
    /// Returns `false` if the worker has already stopped.
    pub fn call(
        &self,
        value: T,
    ) -> bool {
        self.tx.send(value).is_ok()
    }

    /// Closes the input side and waits until the last pending value has
    /// been handled.
    pub async fn finish(self) -> Result<(), JoinError> {
        drop(self.tx);
        self.worker.await
    }
}

async fn settle_loop<T, F>(
    mut rx: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
    mut on_settle: F,
) where
    F: FnMut(T),
{
    while let Some(mut latest) = rx.recv().await {
        loop {
            match tokio::time::timeout(quiet, rx.recv()).await {
                Ok(Some(next)) => {
                    trace!("debounced value superseded");
                    latest = next;
                }
                Ok(None) => {
                    on_settle(latest);
                    return;
                }
                Err(_) => {
                    on_settle(latest);
                    break;
                }
            }
        }
    }
}
