use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{LoadError, Location};
use crate::repo::AutocompleteRepository;
use crate::ui::mvi::{FlowProcessor, Latest, UpdatesContext};
use crate::ui::search::intent::{SearchIntent, SearchSignal};
use crate::ui::search::state::SearchState;
use crate::ui::search::update::SearchUpdate;

const DEFAULT_MIN_ALPHANUMERIC_CHARS: usize = 3;
const PRIORITY_DECIMAL_PLACES: u32 = 3;

/// True if `query` has `min_chars` letters or digits or fewer.
pub fn is_query_too_short(query: &str, min_chars: usize) -> bool {
    query.chars().filter(|c| c.is_alphanumeric()).count() <= min_chars
}

/// Validates queries and runs the latest one against the autocomplete service.
pub struct SearchProcessor {
    repository: Arc<dyn AutocompleteRepository>,
    min_alphanumeric_chars: usize,
}

impl SearchProcessor {
    pub fn new(repository: Arc<dyn AutocompleteRepository>) -> Self {
        Self {
            repository,
            min_alphanumeric_chars: DEFAULT_MIN_ALPHANUMERIC_CHARS,
        }
    }

    pub fn with_min_alphanumeric_chars(mut self, min_chars: usize) -> Self {
        self.min_alphanumeric_chars = min_chars;
        self
    }
}

#[async_trait]
impl FlowProcessor for SearchProcessor {
    type Intent = SearchIntent;
    type Update = SearchUpdate;
    type State = SearchState;
    type Signal = SearchSignal;

    async fn updates(self: Arc<Self>, mut ctx: UpdatesContext<Self>) {
        let mut search = Latest::new(&ctx.scope, "search_points");

        while let Some(intent) = ctx.intents.next().await {
            let SearchIntent::SearchPlaces {
                query,
                priority_location,
            } = intent;

            if query.trim().is_empty() {
                search.cancel();
                ctx.updates.emit(SearchUpdate::BlankQuery);
                continue;
            }
            if is_query_too_short(&query, self.min_alphanumeric_chars) {
                search.cancel();
                ctx.updates.emit(SearchUpdate::QueryTooShort);
                continue;
            }

            let repository = Arc::clone(&self.repository);
            let updates = ctx.updates.clone();
            search.launch(move |gate| {
                let updates = updates.gated(gate);
                updates.emit(SearchUpdate::LoadingPlaces);
                async move {
                    let update = search_points(repository.as_ref(), &query, priority_location).await;
                    updates.emit(update);
                }
            });
        }
    }
}

async fn search_points(
    repository: &dyn AutocompleteRepository,
    query: &str,
    priority_location: Option<Location>,
) -> SearchUpdate {
    let priority = priority_location.map(|location| location.rounded(PRIORITY_DECIMAL_PLACES));
    let result = repository
        .search_points(
            query,
            priority.map(|location| location.latitude),
            priority.map(|location| location.longitude),
        )
        .await;

    match result {
        Ok(points) => {
            tracing::debug!(query, count = points.len(), "Search finished");
            SearchUpdate::PlacesLoaded {
                points,
                with_location_priority: priority_location.is_some(),
            }
        }
        Err(err) => {
            tracing::warn!(query, error = %err, "Search failed");
            SearchUpdate::PlacesLoadingError {
                error: LoadError::from(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_letters_and_digits() {
        assert!(is_query_too_short("a-b-c", 3));
        assert!(is_query_too_short("  ab1 ", 3));
        assert!(!is_query_too_short("abcd", 3));
        assert!(!is_query_too_short("zoo 1", 3));
    }
}
