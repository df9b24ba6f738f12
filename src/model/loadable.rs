//! Lifecycle wrapper for asynchronously obtained values.
//!
//! A [`Loadable`] tracks whether a value is absent, loading, ready or failed,
//! and whether a previously loaded value is still available while the next
//! load is in flight or after it failed.
//!
//! ```text
//!                 loading         cleared error     error(e)
//! Empty           LoadingFirst    Empty             FailedFirst(e)
//! LoadingFirst    LoadingFirst    Empty             FailedFirst(e)
//! LoadingNext(v)  LoadingNext(v)  LoadingNext(v)    FailedNext(v, e)
//! Ready(v)        LoadingNext(v)  Ready(v)          FailedNext(v, e)
//! FailedFirst(e)  LoadingFirst    Empty             FailedFirst(e)
//! FailedNext(v,e) LoadingNext(v)  Ready(v)          FailedNext(v, e)
//! ```

use serde::{Deserialize, Serialize};

use crate::model::error::LoadError;

/// Value lifecycle: {empty, loading, ready, failed} x {with, without prior value}.
///
/// Variants carrying a value never mutate it; transitions build new variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Loadable<T> {
    /// No value, no error, not loading.
    #[default]
    Empty,
    /// Loading without a prior value.
    LoadingFirst,
    /// Loading while the previous value stays visible.
    LoadingNext { value: T },
    /// Value available.
    Ready { value: T },
    /// Failed without a prior value.
    FailedFirst { error: LoadError },
    /// Failed, previous value is kept alongside the error.
    FailedNext { value: T, error: LoadError },
}

impl<T> Loadable<T> {
    pub fn ready(value: T) -> Self {
        Self::Ready { value }
    }

    /// Transition into a loading variant, keeping the value if there is one.
    pub fn with_loading_in_progress(self) -> Self {
        match self {
            Self::Empty | Self::LoadingFirst | Self::FailedFirst { .. } => Self::LoadingFirst,
            Self::LoadingNext { value }
            | Self::Ready { value }
            | Self::FailedNext { value, .. } => Self::LoadingNext { value },
        }
    }

    /// Drop the error, if any. `LoadingNext` stays loading.
    pub fn with_cleared_error(self) -> Self {
        match self {
            Self::Empty | Self::LoadingFirst | Self::FailedFirst { .. } => Self::Empty,
            Self::LoadingNext { value } => Self::LoadingNext { value },
            Self::Ready { value } | Self::FailedNext { value, .. } => Self::Ready { value },
        }
    }

    /// Transition into a failed variant, keeping the value if there is one.
    pub fn with_error(self, error: LoadError) -> Self {
        match self {
            Self::Empty | Self::LoadingFirst | Self::FailedFirst { .. } => {
                Self::FailedFirst { error }
            }
            Self::LoadingNext { value }
            | Self::Ready { value }
            | Self::FailedNext { value, .. } => Self::FailedNext { value, error },
        }
    }

    /// Transform the payload, preserving the variant and error.
    pub fn map<R, F>(self, f: F) -> Loadable<R>
    where
        F: FnOnce(T) -> R,
    {
        match self {
            Self::Empty => Loadable::Empty,
            Self::LoadingFirst => Loadable::LoadingFirst,
            Self::FailedFirst { error } => Loadable::FailedFirst { error },
            Self::LoadingNext { value } => Loadable::LoadingNext { value: f(value) },
            Self::Ready { value } => Loadable::Ready { value: f(value) },
            Self::FailedNext { value, error } => Loadable::FailedNext {
                value: f(value),
                error,
            },
        }
    }

    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Self::Empty => Loadable::Empty,
            Self::LoadingFirst => Loadable::LoadingFirst,
            Self::FailedFirst { error } => Loadable::FailedFirst {
                error: error.clone(),
            },
            Self::LoadingNext { value } => Loadable::LoadingNext { value },
            Self::Ready { value } => Loadable::Ready { value },
            Self::FailedNext { value, error } => Loadable::FailedNext {
                value,
                error: error.clone(),
            },
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::LoadingNext { value } | Self::Ready { value } | Self::FailedNext { value, .. } => {
                Some(value)
            }
            Self::Empty | Self::LoadingFirst | Self::FailedFirst { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::LoadingNext { value } | Self::Ready { value } | Self::FailedNext { value, .. } => {
                Some(value)
            }
            Self::Empty | Self::LoadingFirst | Self::FailedFirst { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::FailedFirst { error } | Self::FailedNext { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingFirst | Self::LoadingNext { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }

    /// True when failed with an error matching `predicate`.
    pub fn is_failed_with<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&LoadError) -> bool,
    {
        self.error().is_some_and(predicate)
    }

    /// Short tag name, used in logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::LoadingFirst => "LoadingFirst",
            Self::LoadingNext { .. } => "LoadingNext",
            Self::Ready { .. } => "Ready",
            Self::FailedFirst { .. } => "FailedFirst",
            Self::FailedNext { .. } => "FailedNext",
        }
    }
}
