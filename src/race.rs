//! One-shot task handles with explicit join and discard
//!
//! Every concurrent call the orchestrator makes is spawned as a `Pending<T>`.
//! The owner either joins it, waiting for the single value it produces, or
//! discards it without waiting. Discarding never cancels the task: a running
//! task is detached and left to finish or time out, and a finished task's
//! value is taken and dropped on the spot.

use std::future::Future;

use futures::FutureExt;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// A spawned task panicked or was cancelled before producing its value
#[derive(Debug, Error)]
#[error("The {label} task did not complete: {source}")]
pub struct TaskError {
    pub label: &'static str,
    #[source]
    pub source: JoinError,
}

/// What happened to a discarded task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discarded {
    /// The task had already finished; its value was dropped unread
    Finished,
    /// The task is still running and has been detached
    Running,
}

/// Handle to a spawned task whose value has exactly one consumer
#[derive(Debug)]
pub struct Pending<T> {
    label: &'static str,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Pending<T> {
    /// Spawns `future` on the current runtime
    pub fn spawn<F>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            label,
            handle: tokio::spawn(future),
        }
    }

    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task's value
    pub async fn join(self) -> Result<T, TaskError> {
        let label = self.label;
        self.handle.await.map_err(|source| TaskError { label, source })
    }

    /// Gives up on the task without blocking
    pub fn discard(self) -> Discarded {
        if self.is_finished() {
            // Already complete, so this poll resolves immediately.
            drop(self.handle.now_or_never());
            debug!(task = self.label, "discarded finished task");
            Discarded::Finished
        } else {
            debug!(task = self.label, "detached running task");
            Discarded::Running
        }
    }
}

/// Joins two tasks, returning both values once both are done
pub async fn join_both<A, B>(first: Pending<A>, second: Pending<B>) -> Result<(A, B), TaskError>
where
    A: Send + 'static,
    B: Send + 'static,
{
    futures::future::try_join(first.join(), second.join()).await
}
