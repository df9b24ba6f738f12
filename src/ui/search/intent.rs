use serde::{Deserialize, Serialize};

use crate::model::Location;
use crate::ui::mvi::{Intent, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchIntent {
    /// Search for `query`, preferring results near `priority_location`.
    SearchPlaces {
        query: String,
        #[serde(default)]
        priority_location: Option<Location>,
    },
}

impl Intent for SearchIntent {}

/// Search has no one-shot effects.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchSignal {}

impl Signal for SearchSignal {}
