//! Scheduling of craft tasks on the tokio runtime.
//!
//! Each craft runs as one spawned task. The caller gets a [`TaskHandle`] that
//! resolves to the [`CraftOutcome`]; an optional [`ParentTask`] additionally
//! receives a [`TaskFailure`] whenever a child aborts.

use crate::error::CraftError;
use crate::executor::CraftOutcome;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, Instrument};

/// Identifier of a spawned craft task, unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Failure reported to a parent task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: TaskId,
    pub error: CraftError,
}

/// Receiving end for child failures.
#[derive(Debug, Clone)]
pub struct ParentTask {
    failures: mpsc::UnboundedSender<TaskFailure>,
}

impl ParentTask {
    /// Create a parent and the receiver its children report into.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TaskFailure>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { failures: tx }, rx)
    }

    fn notify(&self, failure: TaskFailure) {
        if self.failures.send(failure).is_err() {
            debug!("parent task is gone, failure not delivered");
        }
    }
}

/// Spawns craft tasks and assigns their ids.
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    runtime: Handle,
    next_id: Arc<AtomicU64>,
}

impl TaskScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Scheduler bound to the runtime of the calling context, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Spawn `task`. An aborted outcome is forwarded to `parent`, including
    /// a cancellation through [`TaskHandle::abort`].
    pub fn spawn<F>(&self, task: F, parent: Option<ParentTask>) -> TaskHandle
    where
        F: Future<Output = CraftOutcome> + Send + 'static,
    {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        // Created outside the future so a task aborted before its first poll
        // still reports.
        let mut report = FailureReport {
            task: id,
            parent,
            pending: true,
        };
        let join = self.runtime.spawn(
            async move {
                let outcome = task.await;
                report.pending = false;
                if let CraftOutcome::Aborted(error) = &outcome {
                    report.send(error.clone());
                }
                outcome
            }
            .instrument(info_span!("craft_task", %id)),
        );
        TaskHandle { id, join }
    }
}

/// Lives inside the spawned future. Dropped while still pending means the
/// task was cancelled before producing an outcome.
struct FailureReport {
    task: TaskId,
    parent: Option<ParentTask>,
    pending: bool,
}

impl FailureReport {
    fn send(&self, error: CraftError) {
        match &self.parent {
            Some(parent) => parent.notify(TaskFailure {
                task: self.task,
                error,
            }),
            None => debug!(%error, "craft task failed without parent"),
        }
    }
}

impl Drop for FailureReport {
    fn drop(&mut self) {
        // A panic is resumed on the waiting caller instead.
        if self.pending && !std::thread::panicking() {
            self.send(CraftError::Cancelled);
        }
    }
}

/// Owner side of a spawned craft task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    join: JoinHandle<CraftOutcome>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Stop the task at its current suspension point. Nothing is rolled back.
    pub fn abort(&self) {
        self.join.abort();
    }

    /// Wait for the task to end.
    ///
    /// A task stopped through [`TaskHandle::abort`] yields
    /// `Aborted(CraftError::Cancelled)`; a panic inside the task is resumed
    /// on the caller.
    pub async fn wait(self) -> CraftOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => CraftOutcome::Aborted(CraftError::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}
