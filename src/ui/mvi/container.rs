//! Generic state container driving a [`FlowProcessor`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, mpsc, watch};

use super::channels::{
    IntentSender, IntentStream, Projection, SignalEmitter, SignalReceiver, StateObserver,
    UpdateSink,
};
use super::error::ContainerError;
use super::middleware::{Middleware, MiddlewareChain};
use super::processor::{FlowProcessor, SideEffectsContext, UpdatesContext};
use super::saved_state::{state_key, SavedStateHandle};
use super::scope::{ScopeOutcome, TaskScope};
use super::update::StateUpdate;

const SIGNAL_BUFFER: usize = 64;

/// Knobs for a container; all optional.
pub struct ContainerOptions<P: FlowProcessor> {
    /// Used in logs and errors. Defaults to the state type name.
    pub name: Option<String>,
    /// Log each update at debug level.
    pub log_updates: bool,
    /// Log each new state at trace level.
    pub log_states: bool,
    pub intent_middlewares: Vec<Arc<dyn Middleware<P::Intent>>>,
    pub update_middlewares: Vec<Arc<dyn Middleware<P::Update>>>,
    pub state_middlewares: Vec<Arc<dyn Middleware<P::State>>>,
}

impl<P: FlowProcessor> Default for ContainerOptions<P> {
    fn default() -> Self {
        Self {
            name: None,
            log_updates: false,
            log_states: false,
            intent_middlewares: Vec::new(),
            update_middlewares: Vec::new(),
            state_middlewares: Vec::new(),
        }
    }
}

/// Owns the current state of one feature and runs its processor.
///
/// The container is the only writer of its state. Updates are applied one
/// at a time, in the order the processor emitted them. Dropping the
/// container cancels every task it started.
pub struct StateContainer<P: FlowProcessor> {
    name: Arc<str>,
    intents: IntentSender<P::Intent>,
    signals: SignalEmitter<P::Signal>,
    signal_tx: broadcast::Sender<P::Signal>,
    states: watch::Receiver<P::State>,
    saved_state: SavedStateHandle,
    scope: TaskScope,
}

impl<P: FlowProcessor> StateContainer<P> {
    /// Start a container whose initial state is restored from `saved_state`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(processor: P, saved_state: SavedStateHandle) -> Self
    where
        P::State: DeserializeOwned,
    {
        let initial = saved_state.initial_state::<P::State>();
        Self::launch_with(processor, initial, saved_state, ContainerOptions::default())
    }

    /// Start a container from an explicit initial state.
    pub fn launch_with(
        processor: P,
        initial_state: P::State,
        saved_state: SavedStateHandle,
        options: ContainerOptions<P>,
    ) -> Self {
        let name: Arc<str> = options
            .name
            .unwrap_or_else(|| state_key::<P::State>().to_string())
            .into();
        let scope = TaskScope::new(name.to_string());
        let processor = Arc::new(processor);

        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial_state);
        let (signal_tx, _) = broadcast::channel(SIGNAL_BUFFER);

        let intents = IntentSender::new(
            Arc::clone(&name),
            intent_tx,
            Arc::new(MiddlewareChain::new(options.intent_middlewares)),
        );
        let signals = SignalEmitter::new(signal_tx.clone());

        let fold = Fold {
            processor: Arc::clone(&processor),
            updates: update_rx,
            states: state_tx,
            saved_state: saved_state.clone(),
            update_middlewares: MiddlewareChain::new(options.update_middlewares),
            state_middlewares: MiddlewareChain::new(options.state_middlewares),
            log_updates: options.log_updates,
            log_states: options.log_states,
            name: Arc::clone(&name),
        };
        scope.spawn("fold", fold.run());

        let updates_ctx = UpdatesContext {
            intents: IntentStream::new(intent_rx),
            updates: UpdateSink::new(update_tx),
            states: StateObserver::new(state_rx.clone()),
            intent: intents.clone(),
            signals: signals.clone(),
            scope: scope.clone(),
        };
        scope.spawn("updates", Arc::clone(&processor).updates(updates_ctx));

        let side_effects_ctx = SideEffectsContext {
            states: StateObserver::new(state_rx.clone()),
            signals: signals.clone(),
            scope: scope.clone(),
        };
        scope.spawn("side_effects", processor.side_effects(side_effects_ctx));

        tracing::debug!(container = %name, "State container launched");

        Self {
            name,
            intents,
            signals,
            signal_tx,
            states: state_rx,
            saved_state,
            scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue an intent for asynchronous processing.
    pub fn intent(&self, intent: P::Intent) -> Result<(), ContainerError> {
        if self.scope.is_cancelled() {
            return Err(ContainerError::Closed {
                container: self.name.to_string(),
            });
        }
        self.intents.send(intent)
    }

    /// A sender that can outlive borrows of the container.
    pub fn intent_sender(&self) -> IntentSender<P::Intent> {
        self.intents.clone()
    }

    /// Broadcast a one-shot signal to current subscribers.
    pub fn signal(&self, signal: P::Signal) -> usize {
        self.signals.emit(signal)
    }

    /// Subscribe to signals emitted from now on.
    pub fn signals(&self) -> SignalReceiver<P::Signal> {
        SignalReceiver::new(self.signal_tx.subscribe())
    }

    /// Stream of states, starting with the latest one.
    pub fn states(&self) -> StateObserver<P::State> {
        StateObserver::new(self.states.clone())
    }

    /// Distinct projection of the state stream.
    pub fn map_states<V, F>(&self, f: F) -> Projection<P::State, V, F>
    where
        F: FnMut(&P::State) -> V,
        V: PartialEq + Clone,
    {
        self.states().map(f)
    }

    /// Next signal for which `f` returns `Some`, counting from this call.
    pub async fn signals_matching<T, F>(&self, f: F) -> Option<T>
    where
        F: FnMut(P::Signal) -> Option<T>,
    {
        self.signals().next_matching(f).await
    }

    /// Synchronous read of the current state.
    pub fn state(&self) -> P::State {
        self.states.borrow().clone()
    }

    pub fn saved_state(&self) -> &SavedStateHandle {
        &self.saved_state
    }

    /// Cancel every task. No state is published afterwards.
    pub fn shutdown(&self) {
        self.scope.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.scope.outcome() == ScopeOutcome::Running
    }

    /// Wait until the container stops.
    ///
    /// Returns `Err(ContainerError::TaskFailed)` if it stopped because a task
    /// panicked; the host decides whether to start a fresh container.
    pub async fn closed(&self) -> Result<(), ContainerError> {
        match self.scope.finished().await {
            ScopeOutcome::Failed(error) => Err(error),
            ScopeOutcome::Running | ScopeOutcome::Cancelled => Ok(()),
        }
    }
}

impl<P: FlowProcessor> Drop for StateContainer<P> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

/// The single task allowed to write state.
struct Fold<P: FlowProcessor> {
    processor: Arc<P>,
    updates: mpsc::UnboundedReceiver<P::Update>,
    states: watch::Sender<P::State>,
    saved_state: SavedStateHandle,
    update_middlewares: MiddlewareChain<P::Update>,
    state_middlewares: MiddlewareChain<P::State>,
    log_updates: bool,
    log_states: bool,
    name: Arc<str>,
}

impl<P: FlowProcessor> Fold<P> {
    async fn run(mut self) {
        while let Some(update) = self.updates.recv().await {
            self.update_middlewares.run(&update);
            if self.log_updates {
                tracing::debug!(container = %self.name, ?update, "STATE_UPDATE");
            }

            let current = self.states.borrow().clone();
            let next = update.apply(current.clone());
            self.processor
                .state_will_update(&current, &next, &update, &self.saved_state);

            self.state_middlewares.run(&next);
            if self.log_states {
                tracing::trace!(container = %self.name, state = ?next, "NEW_STATE");
            }

            // Equal states are not re-published.
            self.states.send_if_modified(|state| {
                if *state == next {
                    false
                } else {
                    *state = next;
                    true
                }
            });
        }
        tracing::debug!(container = %self.name, "Update stream ended");
    }
}
