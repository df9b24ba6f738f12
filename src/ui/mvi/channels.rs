//! Typed ends of the intent, update, state and signal channels.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};

use super::error::ContainerError;
use super::middleware::MiddlewareChain;
use super::scope::Gate;

/// Submits intents to a container. Cheap to clone.
pub struct IntentSender<I> {
    container: Arc<str>,
    tx: mpsc::UnboundedSender<I>,
    middlewares: Arc<MiddlewareChain<I>>,
}

impl<I> Clone for IntentSender<I> {
    fn clone(&self) -> Self {
        Self {
            container: Arc::clone(&self.container),
            tx: self.tx.clone(),
            middlewares: Arc::clone(&self.middlewares),
        }
    }
}

impl<I> IntentSender<I> {
    pub(crate) fn new(
        container: Arc<str>,
        tx: mpsc::UnboundedSender<I>,
        middlewares: Arc<MiddlewareChain<I>>,
    ) -> Self {
        Self {
            container,
            tx,
            middlewares,
        }
    }

    /// Enqueue `intent` without waiting.
    pub fn send(&self, intent: I) -> Result<(), ContainerError> {
        self.middlewares.run(&intent);
        self.tx.send(intent).map_err(|_| ContainerError::Closed {
            container: self.container.to_string(),
        })
    }
}

/// The processor's view of submitted intents, in submission order.
pub struct IntentStream<I> {
    rx: mpsc::UnboundedReceiver<I>,
}

impl<I> IntentStream<I> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<I>) -> Self {
        Self { rx }
    }

    pub async fn next(&mut self) -> Option<I> {
        self.rx.recv().await
    }
}

/// Where a processor emits updates.
///
/// A gated sink (see [`UpdateSink::gated`]) silently drops updates once its
/// latest-wins launch has been superseded.
pub struct UpdateSink<U> {
    tx: mpsc::UnboundedSender<U>,
    gate: Option<Gate>,
}

impl<U> Clone for UpdateSink<U> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<U> UpdateSink<U> {
    pub(crate) fn new(tx: mpsc::UnboundedSender<U>) -> Self {
        Self { tx, gate: None }
    }

    pub fn gated(&self, gate: Gate) -> Self {
        Self {
            tx: self.tx.clone(),
            gate: Some(gate),
        }
    }

    /// Returns false if the update was dropped (superseded or container gone).
    pub fn emit(&self, update: U) -> bool {
        match &self.gate {
            Some(gate) => gate.pass(|| self.tx.send(update).is_ok()).unwrap_or(false),
            None => self.tx.send(update).is_ok(),
        }
    }
}

/// Broadcasts signals to live subscribers.
pub struct SignalEmitter<S> {
    tx: broadcast::Sender<S>,
    gate: Option<Gate>,
}

impl<S> Clone for SignalEmitter<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<S: Clone + std::fmt::Debug> SignalEmitter<S> {
    pub(crate) fn new(tx: broadcast::Sender<S>) -> Self {
        Self { tx, gate: None }
    }

    pub fn gated(&self, gate: Gate) -> Self {
        Self {
            tx: self.tx.clone(),
            gate: Some(gate),
        }
    }

    /// Deliver `signal` to current subscribers. Returns how many received it.
    pub fn emit(&self, signal: S) -> usize {
        let send = || match self.tx.send(signal) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(signal)) => {
                tracing::trace!(?signal, "Signal dropped, no subscribers");
                0
            }
        };
        match &self.gate {
            Some(gate) => gate.pass(send).unwrap_or(0),
            None => send(),
        }
    }
}

/// Subscription to signals emitted after it was created.
pub struct SignalReceiver<S> {
    rx: broadcast::Receiver<S>,
}

impl<S: Clone> SignalReceiver<S> {
    pub(crate) fn new(rx: broadcast::Receiver<S>) -> Self {
        Self { rx }
    }

    /// Next signal, or `None` once the container is gone.
    pub async fn next(&mut self) -> Option<S> {
        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Signal subscriber lagged, signals dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next signal for which `f` returns `Some`.
    pub async fn next_matching<T, F>(&mut self, mut f: F) -> Option<T>
    where
        F: FnMut(S) -> Option<T>,
    {
        while let Some(signal) = self.next().await {
            if let Some(value) = f(signal) {
                return Some(value);
            }
        }
        None
    }

    /// Non-blocking poll, used by tests and render loops.
    pub fn try_next(&mut self) -> Option<S> {
        loop {
            match self.rx.try_recv() {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Observer of a container's state.
///
/// The first call to [`StateObserver::next`] yields the latest state; later
/// calls yield each new state. Intermediate states may be skipped when the
/// observer falls behind: only the most recent one is kept.
pub struct StateObserver<S> {
    rx: watch::Receiver<S>,
}

impl<S: Clone> Clone for StateObserver<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S: Clone> StateObserver<S> {
    pub(crate) fn new(mut rx: watch::Receiver<S>) -> Self {
        rx.mark_changed();
        Self { rx }
    }

    /// Synchronous read of the latest published state.
    pub fn current(&self) -> S {
        self.rx.borrow().clone()
    }

    /// Next state, or `None` once the container stopped publishing.
    pub async fn next(&mut self) -> Option<S> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Next state satisfying `predicate`, checking the latest state first.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<S>
    where
        F: FnMut(&S) -> bool,
    {
        let state = self.rx.wait_for(|state| predicate(state)).await.ok()?;
        Some(state.clone())
    }

    /// Project each state through `f`, yielding only distinct projections.
    pub fn map<V, F>(self, f: F) -> Projection<S, V, F>
    where
        F: FnMut(&S) -> V,
        V: PartialEq + Clone,
    {
        Projection {
            states: self,
            f,
            last: None,
        }
    }
}

/// Distinct-until-changed projection of a state stream.
pub struct Projection<S, V, F> {
    states: StateObserver<S>,
    f: F,
    last: Option<V>,
}

impl<S, V, F> Projection<S, V, F>
where
    S: Clone,
    V: PartialEq + Clone,
    F: FnMut(&S) -> V,
{
    pub async fn next(&mut self) -> Option<V> {
        loop {
            let state = self.states.next().await?;
            let value = (self.f)(&state);
            if self.last.as_ref() != Some(&value) {
                self.last = Some(value.clone());
                return Some(value);
            }
        }
    }
}
