use serde::{Deserialize, Serialize};

use crate::model::{LoadError, Loadable, RecentSearch, SearchKind};
use crate::ui::mvi::StateUpdate;
use crate::ui::recent_searches::state::RecentSearchesState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecentSearchesUpdate {
    LoadingSearches,
    SearchesLoaded {
        searches: Vec<RecentSearch>,
        limit: usize,
    },
    SearchesLoadingError { error: LoadError },
    /// Drop a search from the list ahead of the reload.
    SearchDeleted { id: i64, kind: SearchKind },
}

impl StateUpdate for RecentSearchesUpdate {
    type State = RecentSearchesState;

    fn apply(&self, state: RecentSearchesState) -> RecentSearchesState {
        match self {
            Self::LoadingSearches => RecentSearchesState {
                searches: state.searches.with_loading_in_progress(),
                ..state
            },
            Self::SearchesLoaded { searches, limit } => RecentSearchesState {
                searches: Loadable::ready(searches.clone()),
                limit: *limit,
            },
            Self::SearchesLoadingError { error } => RecentSearchesState {
                searches: state.searches.with_error(error.clone()),
                ..state
            },
            Self::SearchDeleted { id, kind } => RecentSearchesState {
                searches: state.searches.map(|searches| {
                    searches
                        .into_iter()
                        .filter(|search| !(search.id == *id && search.kind == *kind))
                        .collect()
                }),
                ..state
            },
        }
    }
}
