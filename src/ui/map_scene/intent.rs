use serde::{Deserialize, Serialize};

use crate::ui::map_scene::state::MapScene;
use crate::ui::mvi::{Intent, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapSceneIntent {
    /// The map view started loading `scene`.
    LoadingScene { scene: MapScene },
    /// The map view reported the scene as loaded.
    SceneLoaded,
}

impl Intent for MapSceneIntent {}

#[derive(Debug, Clone, PartialEq)]
pub enum MapSceneSignal {
    /// Loading timed out and the network is back: load `scene` again.
    RetryLoadScene(MapScene),
}

impl Signal for MapSceneSignal {}
