//! Base trait for intents (user/system actions) in MVI architecture.

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (button taps, query edits)
/// - System events (permission results, scene loaded callbacks)
///
/// Intents are turned into updates by a feature's `FlowProcessor`.
pub trait Intent: Debug + Send + 'static {}
