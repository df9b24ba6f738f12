use serde::{Deserialize, Serialize};

use crate::model::SearchKind;
use crate::ui::mvi::{Intent, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecentSearchesIntent {
    /// Load the first page, or the next one if more searches exist.
    LoadSearches,
    DeleteSearch { id: i64, kind: SearchKind },
}

impl Intent for RecentSearchesIntent {}

#[derive(Debug, Clone, PartialEq)]
pub enum RecentSearchesSignal {
    /// Deleting a search failed; the list is left as it was.
    DeleteFailed { id: i64 },
}

impl Signal for RecentSearchesSignal {}
