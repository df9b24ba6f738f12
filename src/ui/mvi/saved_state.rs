//! Key/value persistence handle used to restore feature states.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::SavedStateError;
use super::state::UiState;

/// Key under which a state type is stored: its unqualified type name.
pub fn state_key<S>() -> &'static str {
    let name = std::any::type_name::<S>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Shared key/value store of JSON values.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct SavedStateHandle {
    values: Arc<RwLock<BTreeMap<String, serde_json::Value>>>,
}

impl std::fmt::Debug for SavedStateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedStateHandle")
            .field("keys", &self.keys())
            .finish()
    }
}

impl SavedStateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode `key`. Undecodable values are treated as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.read().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(key, error = %err, "Ignoring undecodable saved state");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.values.write().insert(key.to_string(), encoded);
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to encode saved state");
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.values.write().remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Restore `S` from this handle, falling back to `S::default()`.
    pub fn initial_state<S>(&self) -> S
    where
        S: UiState + DeserializeOwned,
    {
        self.get(state_key::<S>()).unwrap_or_default()
    }

    pub fn save_state<S>(&self, state: &S)
    where
        S: UiState + Serialize,
    {
        self.set(state_key::<S>(), state);
    }

    /// Load a snapshot written by [`SavedStateHandle::persist_to`].
    ///
    /// A missing file yields an empty handle.
    pub fn load_from(path: &Path) -> Result<Self, SavedStateError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SavedStateError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let values: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| SavedStateError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            values: Arc::new(RwLock::new(values)),
        })
    }

    pub fn persist_to(&self, path: &Path) -> Result<(), SavedStateError> {
        let write_error = |e: std::io::Error| SavedStateError::WriteError {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = {
            let values = self.values.read();
            serde_json::to_string_pretty(&*values).map_err(SavedStateError::EncodeError)?
        };

        fs::write(path, content).map_err(write_error)
    }
}
