mod common;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use common::{settle, within, FakeConnectivity};
use lookaround::ui::map_scene::{
    MapScene, MapSceneIntent, MapScenePhase, MapSceneProcessor, MapSceneSignal, MapSceneState,
    MapSceneUpdate,
};
use lookaround::ui::mvi::{ContainerOptions, Middleware, SavedStateHandle, StateContainer};

const TIMEOUT: Duration = Duration::from_secs(5);

fn launch(online: bool) -> (StateContainer<MapSceneProcessor>, Arc<FakeConnectivity>) {
    let connectivity = FakeConnectivity::new(online);
    let processor = MapSceneProcessor::new(connectivity.clone()).with_loading_timeout(TIMEOUT);
    (
        StateContainer::launch(processor, SavedStateHandle::new()),
        connectivity,
    )
}

/// Test that a fresh container has not started loading anything.
#[tokio::test(start_paused = true)]
async fn test_initial_phase_is_idle() {
    let (container, _) = launch(true);
    assert_eq!(container.state().phase(), MapScenePhase::Idle);
    assert_eq!(container.state().scene, MapScene::BubbleWrap);
}

/// Test that a scene that never reports loaded times out and keeps its scene.
#[tokio::test(start_paused = true)]
async fn test_scene_loading_times_out() {
    let (container, _) = launch(false);
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Tron,
        })
        .unwrap();

    let state = within(
        container
            .states()
            .wait_for(|s| s.phase() == MapScenePhase::TimedOut),
    )
    .await
    .unwrap();
    assert_eq!(state.scene, MapScene::Tron);
    assert!(!state.scene_loaded);
}

/// Test that loading the scene in time cancels the timeout.
#[tokio::test(start_paused = true)]
async fn test_loaded_scene_does_not_time_out() {
    let (container, _) = launch(true);
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Refill,
        })
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    container.intent(MapSceneIntent::SceneLoaded).unwrap();

    tokio::time::sleep(TIMEOUT * 2).await;
    settle().await;

    let state = container.state();
    assert_eq!(state.phase(), MapScenePhase::Loaded);
    assert!(!state.scene_loading_timeout_occurred);
}

/// Test that a newer scene load restarts the timeout instead of adding one.
#[tokio::test(start_paused = true)]
async fn test_new_scene_restarts_timeout() {
    let (container, _) = launch(false);
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Walkabout,
        })
        .unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Cinnabar,
        })
        .unwrap();

    // Past the first deadline, before the second.
    tokio::time::sleep(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(
        container.state().phase(),
        MapScenePhase::Loading(MapScene::Cinnabar)
    );

    tokio::time::sleep(Duration::from_secs(3)).await;
    settle().await;
    let state = container.state();
    assert_eq!(state.phase(), MapScenePhase::TimedOut);
    assert_eq!(state.scene, MapScene::Cinnabar);
}

/// Test that a timed-out scene is retried once the network comes back.
#[tokio::test(start_paused = true)]
async fn test_retry_after_connectivity_restored() {
    let (container, connectivity) = launch(false);
    let mut signals = container.signals();
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Refill,
        })
        .unwrap();

    within(
        container
            .states()
            .wait_for(|s| s.scene_loading_timeout_occurred),
    )
    .await;
    settle().await;
    assert_eq!(signals.try_next(), None);

    connectivity.set(true);
    assert_eq!(
        within(signals.next()).await,
        Some(MapSceneSignal::RetryLoadScene(MapScene::Refill))
    );

    // Flapping the network does not retry the same timeout again.
    connectivity.set(false);
    settle().await;
    connectivity.set(true);
    settle().await;
    assert_eq!(signals.try_next(), None);
}

/// Test that a timeout while online asks for a retry right away.
#[tokio::test(start_paused = true)]
async fn test_retry_when_online_at_timeout() {
    let (container, _) = launch(true);
    let mut signals = container.signals();
    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::Tron,
        })
        .unwrap();

    assert_eq!(
        within(signals.next()).await,
        Some(MapSceneSignal::RetryLoadScene(MapScene::Tron))
    );
    assert_eq!(container.state().phase(), MapScenePhase::TimedOut);
}

/// Test that every new timeout gets its own retry.
#[tokio::test(start_paused = true)]
async fn test_each_timeout_is_retried() {
    let (container, _) = launch(true);
    let mut signals = container.signals();

    for scene in [MapScene::Tron, MapScene::Walkabout] {
        container
            .intent(MapSceneIntent::LoadingScene { scene })
            .unwrap();
        assert_eq!(
            within(signals.next()).await,
            Some(MapSceneSignal::RetryLoadScene(scene))
        );
    }
}

/// Records every update the container applies.
#[derive(Default)]
struct UpdateRecorder {
    updates: Mutex<Vec<MapSceneUpdate>>,
}

impl Middleware<MapSceneUpdate> for UpdateRecorder {
    fn observe(&self, update: &MapSceneUpdate) {
        self.updates.lock().push(update.clone());
    }
}

/// Test that one load without a loaded report yields exactly one timeout update.
#[tokio::test(start_paused = true)]
async fn test_exactly_one_timeout_update() {
    let connectivity = FakeConnectivity::new(false);
    let recorder = Arc::new(UpdateRecorder::default());
    let mut options = ContainerOptions::<MapSceneProcessor>::default();
    options.update_middlewares.push(recorder.clone());

    let processor = MapSceneProcessor::new(connectivity.clone()).with_loading_timeout(TIMEOUT);
    let container = StateContainer::launch_with(
        processor,
        MapSceneState::default(),
        SavedStateHandle::new(),
        options,
    );
    let mut signals = container.signals();

    container
        .intent(MapSceneIntent::LoadingScene {
            scene: MapScene::BubbleWrap,
        })
        .unwrap();
    tokio::time::sleep(TIMEOUT * 4).await;
    settle().await;

    let timeouts = recorder
        .updates
        .lock()
        .iter()
        .filter(|u| **u == MapSceneUpdate::SceneLoadingTimeoutOccurred)
        .count();
    assert_eq!(timeouts, 1);
    assert_eq!(signals.try_next(), None);

    connectivity.set(true);
    assert_eq!(
        within(signals.next()).await,
        Some(MapSceneSignal::RetryLoadScene(MapScene::BubbleWrap))
    );
    settle().await;
    assert_eq!(signals.try_next(), None);
}
