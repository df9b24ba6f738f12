//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides the generic state container that every feature
//! plugs into, plus the traits a feature implements.
//!
//! # Architecture
//!
//! ```text
//!  intent() ──→ FlowProcessor::updates ──→ Update ──→ fold ──→ State ──→ states()
//!     ↑                  │                                        │
//!     │                  └────────────→ Signal ←── side_effects ←─┘
//!     │                                   │
//!     └──────────────── View ←── signals()┘
//! ```
//!
//! - **State**: Immutable representation of a feature's state
//! - **Intent**: User actions or system events
//! - **Update**: Plain data describing one pure state transition
//! - **Signal**: One-shot notification, never replayed
//! - **FlowProcessor**: Per-feature policy turning intents into updates
//! - **StateContainer**: Owns the state and applies updates one at a time

mod channels;
mod container;
mod error;
mod intent;
mod middleware;
mod processor;
mod saved_state;
mod scope;
mod signal;
mod state;
mod update;

pub use channels::{
    IntentSender, IntentStream, Projection, SignalEmitter, SignalReceiver, StateObserver, UpdateSink,
};
pub use container::{ContainerOptions, StateContainer};
pub use error::{ContainerError, SavedStateError};
pub use intent::Intent;
pub use middleware::{DebugLoggingMiddleware, IdlingResource, Middleware, MiddlewareChain};
pub use processor::{FlowProcessor, SideEffectsContext, UpdatesContext};
pub use saved_state::{state_key, SavedStateHandle};
pub use scope::{Gate, Latest, ScopeOutcome, TaskScope};
pub use signal::Signal;
pub use state::UiState;
pub use update::{fold_updates, StateUpdate};
