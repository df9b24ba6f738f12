//! State update trait for MVI architecture.

use std::fmt::Debug;

use super::state::UiState;

/// One atomic state transition.
///
/// Updates are plain data; `apply` is the pure dispatch that maps each
/// variant to its transition. It must not perform I/O and must not fail:
/// collaborator errors are carried in the update itself as data.
pub trait StateUpdate: Debug + Send + 'static {
    /// The state type this update operates on.
    type State: UiState;

    /// Compute the next state.
    fn apply(&self, state: Self::State) -> Self::State;
}

/// Fold `updates` over `initial` outside of any container.
pub fn fold_updates<U, I>(initial: U::State, updates: I) -> U::State
where
    U: StateUpdate,
    I: IntoIterator<Item = U>,
{
    updates
        .into_iter()
        .fold(initial, |state, update| update.apply(state))
}
