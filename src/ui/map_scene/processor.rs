use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::repo::ConnectivityObserver;
use crate::ui::map_scene::intent::{MapSceneIntent, MapSceneSignal};
use crate::ui::map_scene::state::MapSceneState;
use crate::ui::map_scene::update::MapSceneUpdate;
use crate::ui::mvi::{FlowProcessor, Latest, SideEffectsContext, UpdatesContext};

pub const DEFAULT_SCENE_LOADING_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounds scene loading with a timeout and asks for a retry once the
/// network is available again.
pub struct MapSceneProcessor {
    connectivity: Arc<dyn ConnectivityObserver>,
    loading_timeout: Duration,
}

impl MapSceneProcessor {
    pub fn new(connectivity: Arc<dyn ConnectivityObserver>) -> Self {
        Self {
            connectivity,
            loading_timeout: DEFAULT_SCENE_LOADING_TIMEOUT,
        }
    }

    pub fn with_loading_timeout(mut self, timeout: Duration) -> Self {
        self.loading_timeout = timeout;
        self
    }
}

#[async_trait]
impl FlowProcessor for MapSceneProcessor {
    type Intent = MapSceneIntent;
    type Update = MapSceneUpdate;
    type State = MapSceneState;
    type Signal = MapSceneSignal;

    async fn updates(self: Arc<Self>, mut ctx: UpdatesContext<Self>) {
        let mut timeout = Latest::new(&ctx.scope, "scene_loading_timeout");

        while let Some(intent) = ctx.intents.next().await {
            match intent {
                MapSceneIntent::LoadingScene { scene } => {
                    ctx.updates.emit(MapSceneUpdate::LoadingScene { scene });

                    let states = ctx.states.clone();
                    let updates = ctx.updates.clone();
                    let limit = self.loading_timeout;
                    timeout.launch(move |gate| {
                        let updates = updates.gated(gate);
                        async move {
                            tokio::time::sleep(limit).await;
                            if !states.current().scene_loaded {
                                tracing::debug!(?scene, "Scene loading timed out");
                                updates.emit(MapSceneUpdate::SceneLoadingTimeoutOccurred);
                            }
                        }
                    });
                }
                MapSceneIntent::SceneLoaded => {
                    timeout.cancel();
                    ctx.updates.emit(MapSceneUpdate::SceneLoaded);
                }
            }
        }
    }

    async fn side_effects(self: Arc<Self>, ctx: SideEffectsContext<Self>) {
        let mut states = ctx.states;
        let mut connectivity = self.connectivity.connectivity();
        // One retry per timeout; re-armed when the flag clears.
        let mut retried = false;

        loop {
            let state = states.current();
            let connected = *connectivity.borrow_and_update();

            if !state.scene_loading_timeout_occurred {
                retried = false;
            } else if connected && !retried {
                retried = true;
                tracing::info!(scene = ?state.scene, "Network available, retrying scene load");
                ctx.signals.emit(MapSceneSignal::RetryLoadScene(state.scene));
            }

            tokio::select! {
                next = states.next() => {
                    if next.is_none() {
                        break;
                    }
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Connectivity source closed");
                        break;
                    }
                }
            }
        }
    }
}
