use serde::{Deserialize, Serialize};

use crate::model::{Loadable, RecentSearch};
use crate::ui::mvi::UiState;

/// Page size of the recent searches list.
pub const SEARCHES_LIMIT_INCREMENT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchesState {
    pub searches: Loadable<Vec<RecentSearch>>,
    /// How many searches the last load asked for.
    pub limit: usize,
}

impl Default for RecentSearchesState {
    fn default() -> Self {
        Self {
            searches: Loadable::Empty,
            limit: SEARCHES_LIMIT_INCREMENT,
        }
    }
}

impl UiState for RecentSearchesState {}

impl RecentSearchesState {
    /// Limit for the next page, or `None` if nothing more should be loaded.
    ///
    /// Nothing loaded yet (or the first load failed) asks for the first page.
    /// A loaded list asks for the page after its current size, as long as
    /// `total_count` says more searches exist. A load in flight asks for
    /// nothing.
    pub fn next_limit(&self, total_count: usize, increment: usize) -> Option<usize> {
        match &self.searches {
            Loadable::Empty | Loadable::FailedFirst { .. } => Some(increment),
            Loadable::Ready { value } | Loadable::FailedNext { value, .. } => {
                let loaded = value.len();
                (total_count > loaded).then(|| loaded / increment * increment + increment)
            }
            Loadable::LoadingFirst | Loadable::LoadingNext { .. } => None,
        }
    }
}
