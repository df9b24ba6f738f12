mod common;

use std::sync::Arc;

use common::{settle, within, FakeRecentSearches};
use lookaround::model::{Loadable, SearchKind};
use lookaround::ui::mvi::{SavedStateHandle, StateContainer};
use lookaround::ui::recent_searches::{
    RecentSearchesIntent, RecentSearchesProcessor, RecentSearchesSignal, RecentSearchesState,
};

fn launch(repository: Arc<FakeRecentSearches>) -> StateContainer<RecentSearchesProcessor> {
    StateContainer::launch(
        RecentSearchesProcessor::new(repository),
        SavedStateHandle::new(),
    )
}

fn loaded_count(state: &RecentSearchesState) -> Option<usize> {
    match &state.searches {
        Loadable::Ready { value } => Some(value.len()),
        _ => None,
    }
}

/// Test that the first page is loaded as soon as the container starts.
#[tokio::test]
async fn test_first_page_loaded_on_start() {
    let repository = FakeRecentSearches::with_count(25);
    let container = launch(repository.clone());

    let state = within(container.states().wait_for(|s| s.searches.is_ready()))
        .await
        .unwrap();
    assert_eq!(loaded_count(&state), Some(10));
    assert_eq!(state.limit, 10);
    assert_eq!(repository.requested_limits(), vec![10]);
}

/// Test that paging stops once every search is loaded.
#[tokio::test]
async fn test_pages_until_everything_is_loaded() {
    let repository = FakeRecentSearches::with_count(25);
    let container = launch(repository.clone());
    within(container.states().wait_for(|s| loaded_count(s) == Some(10))).await;

    container.intent(RecentSearchesIntent::LoadSearches).unwrap();
    within(container.states().wait_for(|s| loaded_count(s) == Some(20))).await;

    container.intent(RecentSearchesIntent::LoadSearches).unwrap();
    within(container.states().wait_for(|s| loaded_count(s) == Some(25))).await;

    container.intent(RecentSearchesIntent::LoadSearches).unwrap();
    settle().await;
    assert_eq!(repository.requested_limits(), vec![10, 20, 30]);
    assert_eq!(container.state().limit, 30);
}

/// Test that an empty history loads as an empty ready list.
#[tokio::test]
async fn test_empty_history() {
    let repository = FakeRecentSearches::with_count(0);
    let container = launch(repository);

    let state = within(container.states().wait_for(|s| s.searches.is_ready()))
        .await
        .unwrap();
    assert_eq!(loaded_count(&state), Some(0));
}

/// Test that a failed first load can be retried.
#[tokio::test]
async fn test_failed_first_load_is_retried() {
    let repository = FakeRecentSearches::with_count(3);
    repository.fail_loads(true);
    let container = launch(repository.clone());

    let state = within(container.states().wait_for(|s| s.searches.is_failed()))
        .await
        .unwrap();
    assert!(matches!(state.searches, Loadable::FailedFirst { .. }));

    repository.fail_loads(false);
    container.intent(RecentSearchesIntent::LoadSearches).unwrap();
    let state = within(container.states().wait_for(|s| s.searches.is_ready()))
        .await
        .unwrap();
    assert_eq!(loaded_count(&state), Some(3));
    assert_eq!(repository.requested_limits(), vec![10, 10]);
}

/// Test that deleting a search removes it and reloads the list.
#[tokio::test]
async fn test_delete_search_reloads() {
    let repository = FakeRecentSearches::with_count(3);
    let container = launch(repository.clone());
    within(container.states().wait_for(|s| loaded_count(s) == Some(3))).await;

    container
        .intent(RecentSearchesIntent::DeleteSearch {
            id: 2,
            kind: SearchKind::Around,
        })
        .unwrap();

    let state = within(container.states().wait_for(|s| loaded_count(s) == Some(2)))
        .await
        .unwrap();
    let ids: Vec<i64> = state
        .searches
        .value()
        .map(|searches| searches.iter().map(|s| s.id).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(repository.len(), 2);
}

/// Test that a failed deletion is signalled and leaves the list intact.
#[tokio::test]
async fn test_delete_failure_is_signalled() {
    let repository = FakeRecentSearches::with_count(3);
    repository.fail_deletes(true);
    let container = launch(repository.clone());
    within(container.states().wait_for(|s| loaded_count(s) == Some(3))).await;

    let mut signals = container.signals();
    container
        .intent(RecentSearchesIntent::DeleteSearch {
            id: 1,
            kind: SearchKind::Around,
        })
        .unwrap();

    assert_eq!(
        within(signals.next()).await,
        Some(RecentSearchesSignal::DeleteFailed { id: 1 })
    );
    assert_eq!(loaded_count(&container.state()), Some(3));
    assert_eq!(repository.len(), 3);
}
