use serde::{Deserialize, Serialize};

use crate::ui::map_scene::state::{MapScene, MapSceneState};
use crate::ui::mvi::StateUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapSceneUpdate {
    LoadingScene { scene: MapScene },
    SceneLoaded,
    SceneLoadingTimeoutOccurred,
}

impl StateUpdate for MapSceneUpdate {
    type State = MapSceneState;

    fn apply(&self, state: MapSceneState) -> MapSceneState {
        match self {
            Self::LoadingScene { scene } => MapSceneState {
                scene: *scene,
                scene_loaded: false,
                scene_loading_timeout_occurred: false,
                scene_loading_started: true,
            },
            Self::SceneLoaded => MapSceneState {
                scene_loaded: true,
                scene_loading_timeout_occurred: false,
                ..state
            },
            // The scene is kept so a retry reloads the same one.
            Self::SceneLoadingTimeoutOccurred => MapSceneState {
                scene_loaded: false,
                scene_loading_timeout_occurred: true,
                ..state
            },
        }
    }
}
