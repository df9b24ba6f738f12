//! Base trait for one-shot signals.

use std::fmt::Debug;

/// Marker trait for signals.
///
/// Signals are delivered live to current subscribers only: a subscriber
/// attaching after a signal was emitted never sees it.
pub trait Signal: Debug + Clone + Send + 'static {}
