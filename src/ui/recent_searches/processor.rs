use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{LoadError, RecentSearch};
use crate::repo::RecentSearchesRepository;
use crate::ui::mvi::{FlowProcessor, Latest, UpdatesContext};
use crate::ui::recent_searches::intent::{RecentSearchesIntent, RecentSearchesSignal};
use crate::ui::recent_searches::state::{RecentSearchesState, SEARCHES_LIMIT_INCREMENT};
use crate::ui::recent_searches::update::RecentSearchesUpdate;

/// Loads recent searches page by page and handles deletions.
///
/// The first page is loaded as soon as the container starts.
pub struct RecentSearchesProcessor {
    repository: Arc<dyn RecentSearchesRepository>,
    page_size: usize,
}

impl RecentSearchesProcessor {
    pub fn new(repository: Arc<dyn RecentSearchesRepository>) -> Self {
        Self {
            repository,
            page_size: SEARCHES_LIMIT_INCREMENT,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn load_next_page(
        &self,
        ctx: &UpdatesContext<Self>,
        load: &mut Latest,
        last_requested: &mut Option<usize>,
    ) {
        let total = match self.repository.total_searches_count().await {
            Ok(total) => total,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to count recent searches");
                ctx.updates.emit(RecentSearchesUpdate::SearchesLoadingError {
                    error: LoadError::from(err),
                });
                return;
            }
        };

        let state = ctx.states.current();
        let Some(limit) = state.next_limit(total, self.page_size) else {
            tracing::trace!(total, "No more recent searches to load");
            return;
        };
        if *last_requested == Some(limit) && !state.searches.is_failed() {
            return;
        }

        *last_requested = Some(limit);
        self.launch_load(ctx, load, limit);
    }

    fn launch_load(&self, ctx: &UpdatesContext<Self>, load: &mut Latest, limit: usize) {
        let repository = Arc::clone(&self.repository);
        let updates = ctx.updates.clone();
        load.launch(move |gate| {
            let updates = updates.gated(gate);
            updates.emit(RecentSearchesUpdate::LoadingSearches);
            async move {
                let update = match repository.recent_searches(limit).await {
                    Ok(records) => RecentSearchesUpdate::SearchesLoaded {
                        searches: records.into_iter().map(RecentSearch::from).collect(),
                        limit,
                    },
                    Err(err) => {
                        tracing::warn!(limit, error = %err, "Failed to load recent searches");
                        RecentSearchesUpdate::SearchesLoadingError {
                            error: LoadError::from(err),
                        }
                    }
                };
                updates.emit(update);
            }
        });
    }
}

#[async_trait]
impl FlowProcessor for RecentSearchesProcessor {
    type Intent = RecentSearchesIntent;
    type Update = RecentSearchesUpdate;
    type State = RecentSearchesState;
    type Signal = RecentSearchesSignal;

    async fn updates(self: Arc<Self>, mut ctx: UpdatesContext<Self>) {
        let mut load = Latest::new(&ctx.scope, "recent_searches");
        let mut last_requested = None;

        self.load_next_page(&ctx, &mut load, &mut last_requested)
            .await;

        while let Some(intent) = ctx.intents.next().await {
            match intent {
                RecentSearchesIntent::LoadSearches => {
                    self.load_next_page(&ctx, &mut load, &mut last_requested)
                        .await;
                }
                RecentSearchesIntent::DeleteSearch { id, kind } => {
                    match self.repository.delete_search(id, kind).await {
                        Ok(()) => {
                            ctx.updates
                                .emit(RecentSearchesUpdate::SearchDeleted { id, kind });
                            let limit = ctx.states.current().limit;
                            last_requested = Some(limit);
                            self.launch_load(&ctx, &mut load, limit);
                        }
                        Err(err) => {
                            tracing::warn!(id, ?kind, error = %err, "Failed to delete search");
                            ctx.signals.emit(RecentSearchesSignal::DeleteFailed { id });
                        }
                    }
                }
            }
        }
    }
}
