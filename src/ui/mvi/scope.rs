//! Structured task ownership for a state container.
//!
//! Every task a container or its processor starts goes through a
//! [`TaskScope`]. Cancelling the scope aborts all of them; a panic in any of
//! them fails the scope and cancels the rest.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::error::ContainerError;

/// Terminal status of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeOutcome {
    Running,
    Cancelled,
    Failed(ContainerError),
}

struct ScopeTasks {
    cancelled: bool,
    handles: Vec<AbortHandle>,
}

struct ScopeInner {
    name: String,
    tasks: Mutex<ScopeTasks>,
    outcome: watch::Sender<ScopeOutcome>,
}

/// Owner of every task spawned on behalf of one container.
#[derive(Clone)]
pub struct TaskScope {
    inner: Arc<ScopeInner>,
}

impl TaskScope {
    pub fn new(name: impl Into<String>) -> Self {
        let (outcome, _) = watch::channel(ScopeOutcome::Running);
        Self {
            inner: Arc::new(ScopeInner {
                name: name.into(),
                tasks: Mutex::new(ScopeTasks {
                    cancelled: false,
                    handles: Vec::new(),
                }),
                outcome,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Spawn `future` on the current tokio runtime.
    ///
    /// Returns `None` if the scope is already cancelled. A panic inside
    /// `future` fails the whole scope.
    pub fn spawn<F>(&self, task: &str, future: F) -> Option<AbortHandle>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.inner.tasks.lock();
        if tasks.cancelled {
            tracing::trace!(scope = %self.inner.name, task, "Scope cancelled, task not started");
            return None;
        }

        let scope = self.clone();
        let task_name = task.to_string();
        let handle = tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(future).catch_unwind().await {
                scope.fail(&task_name, panic_message(panic.as_ref()));
            }
        });

        let abort = handle.abort_handle();
        tasks.handles.retain(|h| !h.is_finished());
        tasks.handles.push(abort.clone());
        Some(abort)
    }

    /// Abort every task. Idempotent.
    pub fn cancel(&self) {
        if self.abort_all() {
            tracing::debug!(scope = %self.inner.name, "Scope cancelled");
            self.inner.outcome.send_if_modified(|outcome| {
                if *outcome == ScopeOutcome::Running {
                    *outcome = ScopeOutcome::Cancelled;
                    true
                } else {
                    false
                }
            });
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.tasks.lock().cancelled
    }

    pub fn outcome(&self) -> ScopeOutcome {
        self.inner.outcome.borrow().clone()
    }

    /// Wait until the scope is cancelled or failed.
    pub async fn finished(&self) -> ScopeOutcome {
        let mut rx = self.inner.outcome.subscribe();
        let outcome = match rx.wait_for(|outcome| *outcome != ScopeOutcome::Running).await {
            Ok(outcome) => outcome.clone(),
            // Sender lives in `inner`, which we hold.
            Err(_) => ScopeOutcome::Cancelled,
        };
        outcome
    }

    fn fail(&self, task: &str, message: String) {
        tracing::error!(scope = %self.inner.name, task, %message, "Container task panicked");
        let error = ContainerError::TaskFailed {
            container: self.inner.name.clone(),
            task: task.to_string(),
            message,
        };
        self.inner.outcome.send_if_modified(|outcome| {
            if *outcome == ScopeOutcome::Running {
                *outcome = ScopeOutcome::Failed(error);
                true
            } else {
                false
            }
        });
        self.abort_all();
    }

    /// Returns false if the scope was already cancelled.
    fn abort_all(&self) -> bool {
        let handles = {
            let mut tasks = self.inner.tasks.lock();
            if tasks.cancelled {
                return false;
            }
            tasks.cancelled = true;
            std::mem::take(&mut tasks.handles)
        };
        for handle in handles {
            handle.abort();
        }
        true
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Ticket proving a task belongs to the most recent launch of a [`Latest`] slot.
///
/// Emissions go through [`Gate::pass`], which holds the generation lock, so
/// once a newer launch starts nothing from an older one gets through.
#[derive(Clone)]
pub struct Gate {
    generation: Arc<Mutex<u64>>,
    mine: u64,
}

impl Gate {
    pub fn is_current(&self) -> bool {
        *self.generation.lock() == self.mine
    }

    /// Run `f` only if this gate is still current.
    pub fn pass<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let generation = self.generation.lock();
        if *generation == self.mine {
            Some(f())
        } else {
            None
        }
    }
}

/// Latest-wins slot: launching a new task supersedes the previous one.
///
/// Equivalent to mapping each upstream value to a task and cancelling the
/// previous task on every new value.
pub struct Latest {
    scope: TaskScope,
    task: &'static str,
    generation: Arc<Mutex<u64>>,
    current: Option<AbortHandle>,
}

impl Latest {
    pub fn new(scope: &TaskScope, task: &'static str) -> Self {
        Self {
            scope: scope.clone(),
            task,
            generation: Arc::new(Mutex::new(0)),
            current: None,
        }
    }

    /// Cancel the running task (if any) and start `make(gate)` in its place.
    pub fn launch<F, Fut>(&mut self, make: F)
    where
        F: FnOnce(Gate) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mine = {
            let mut generation = self.generation.lock();
            *generation += 1;
            *generation
        };
        let gate = Gate {
            generation: Arc::clone(&self.generation),
            mine,
        };
        if let Some(previous) = self.current.take() {
            previous.abort();
        }
        self.current = self.scope.spawn(self.task, make(gate));
    }

    /// Cancel the running task without starting a new one.
    pub fn cancel(&mut self) {
        *self.generation.lock() += 1;
        if let Some(previous) = self.current.take() {
            previous.abort();
        }
    }

    pub fn generation(&self) -> u64 {
        *self.generation.lock()
    }
}
