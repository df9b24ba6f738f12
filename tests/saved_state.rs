mod common;

use common::within;
use lookaround::model::Loadable;
use lookaround::ui::main::{BottomNavItem, MainState};
use lookaround::ui::map_scene::{MapScene, MapSceneState};
use lookaround::ui::mvi::{state_key, SavedStateError, SavedStateHandle, StateContainer};
use lookaround::ui::search::{SearchIntent, SearchProcessor, SearchState};

/// Test that a snapshot written to disk restores every state.
#[test]
fn test_snapshot_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("saved_state.json");

    let handle = SavedStateHandle::new();
    handle.save_state(&MainState {
        selected_bottom_nav_item: BottomNavItem::PlaceList,
        search_query: "ramen".to_string(),
        ..MainState::default()
    });
    handle.save_state(&MapSceneState {
        scene: MapScene::Tron,
        scene_loaded: true,
        ..MapSceneState::default()
    });
    handle.persist_to(&path).unwrap();

    let restored = SavedStateHandle::load_from(&path).unwrap();
    assert_eq!(restored.keys(), vec!["MainState", "MapSceneState"]);

    let main: MainState = restored.initial_state();
    assert_eq!(main.selected_bottom_nav_item, BottomNavItem::PlaceList);
    assert_eq!(main.search_query, "ramen");
    assert_eq!(main.markers, Loadable::Empty);

    let scene: MapSceneState = restored.initial_state();
    assert_eq!(scene.scene, MapScene::Tron);
}

/// Test that a missing snapshot yields an empty handle.
#[test]
fn test_missing_snapshot_is_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let handle = SavedStateHandle::load_from(&dir.path().join("none.json")).unwrap();
    assert!(handle.keys().is_empty());
}

/// Test that a corrupt snapshot is reported as a parse error.
#[test]
fn test_corrupt_snapshot_is_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("saved_state.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        SavedStateHandle::load_from(&path),
        Err(SavedStateError::ParseError { .. })
    ));
}

/// Test that remove and contains work on the state key.
#[test]
fn test_remove_state() {
    let handle = SavedStateHandle::new();
    handle.save_state(&SearchState::default());
    assert!(handle.contains(state_key::<SearchState>()));
    assert!(handle.remove("SearchState"));
    assert!(!handle.contains("SearchState"));
    assert!(!handle.remove("SearchState"));
}

/// Test that a container restores a state written by an earlier session.
#[tokio::test]
async fn test_container_starts_from_restored_state() {
    let handle = SavedStateHandle::new();
    handle.set(
        "SearchState",
        &serde_json::json!({
            "points": { "status": "ready", "value": [] },
            "last_performed_with_location_priority": true
        }),
    );
    let restored: SearchState = handle.initial_state();
    assert!(restored.last_performed_with_location_priority);

    let container = StateContainer::launch(
        SearchProcessor::new(common::FakeAutocomplete::new()),
        handle,
    );
    assert_eq!(container.state(), restored);

    container
        .intent(SearchIntent::SearchPlaces {
            query: "".to_string(),
            priority_location: None,
        })
        .unwrap();
    let state = within(container.states().wait_for(|s| s.points == Loadable::Empty))
        .await
        .unwrap();
    assert!(state.last_performed_with_location_priority);
}
