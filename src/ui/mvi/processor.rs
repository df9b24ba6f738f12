//! Per-feature reactive policy plugged into a [`StateContainer`](super::StateContainer).

use std::sync::Arc;

use async_trait::async_trait;

use super::channels::{IntentSender, IntentStream, SignalEmitter, StateObserver, UpdateSink};
use super::intent::Intent;
use super::saved_state::SavedStateHandle;
use super::scope::TaskScope;
use super::signal::Signal;
use super::state::UiState;
use super::update::StateUpdate;

/// Everything `FlowProcessor::updates` may touch.
pub struct UpdatesContext<P: FlowProcessor> {
    /// Intents in submission order.
    pub intents: IntentStream<P::Intent>,
    /// Updates emitted here are applied in emission order.
    pub updates: UpdateSink<P::Update>,
    /// Read access to published states.
    pub states: StateObserver<P::State>,
    /// Re-submit synthetic intents (retry loops).
    pub intent: IntentSender<P::Intent>,
    /// One-shot signals correlated with specific intents.
    pub signals: SignalEmitter<P::Signal>,
    /// Spawn child tasks owned by the container.
    pub scope: TaskScope,
}

/// Everything `FlowProcessor::side_effects` may touch.
///
/// No update sink: side effects only signal.
pub struct SideEffectsContext<P: FlowProcessor> {
    pub states: StateObserver<P::State>,
    pub signals: SignalEmitter<P::Signal>,
    pub scope: TaskScope,
}

/// Feature policy: turns intents into updates and states into signals.
///
/// Both async methods run as tasks owned by the container and are cancelled
/// with it. Collaborator failures must be converted into updates carrying
/// the error; panics are treated as fatal for the container.
#[async_trait]
pub trait FlowProcessor: Send + Sync + Sized + 'static {
    type Intent: Intent;
    type Update: StateUpdate<State = Self::State>;
    type State: UiState;
    type Signal: Signal;

    /// Consume intents and emit updates until the intent stream ends.
    async fn updates(self: Arc<Self>, ctx: UpdatesContext<Self>);

    /// Started once per container; observes states and emits signals.
    async fn side_effects(self: Arc<Self>, ctx: SideEffectsContext<Self>) {
        drop(ctx);
    }

    /// Called synchronously right before `next` is published.
    ///
    /// Meant for write-through persistence of selected fields; must not block.
    fn state_will_update(
        &self,
        _current: &Self::State,
        _next: &Self::State,
        _update: &Self::Update,
        _saved_state: &SavedStateHandle,
    ) {
    }
}
