use serde::{Deserialize, Serialize};

use crate::ui::mvi::UiState;

/// Map styles the map view can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapScene {
    #[default]
    BubbleWrap,
    Refill,
    Walkabout,
    Tron,
    Cinnabar,
}

impl MapScene {
    /// Scene bundle location.
    pub fn url(&self) -> &'static str {
        match self {
            Self::BubbleWrap => {
                "https://www.nextzen.org/carto/bubble-wrap-style/9/bubble-wrap-style.zip"
            }
            Self::Refill => "https://www.nextzen.org/carto/refill-style/11/refill-style.zip",
            Self::Walkabout => {
                "https://www.nextzen.org/carto/walkabout-style/7/walkabout-style.zip"
            }
            Self::Tron => "https://www.nextzen.org/carto/tron-style/6/tron-style.zip",
            Self::Cinnabar => "https://www.nextzen.org/carto/cinnabar-style/9/cinnabar-style.zip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapSceneState {
    pub scene: MapScene,
    pub scene_loaded: bool,
    pub scene_loading_timeout_occurred: bool,
    /// Whether the current scene started loading at all.
    #[serde(default)]
    pub scene_loading_started: bool,
}

impl UiState for MapSceneState {}

/// Where the scene is in its loading lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapScenePhase {
    Idle,
    Loading(MapScene),
    Loaded,
    TimedOut,
}

impl MapSceneState {
    pub fn phase(&self) -> MapScenePhase {
        if self.scene_loaded {
            MapScenePhase::Loaded
        } else if self.scene_loading_timeout_occurred {
            MapScenePhase::TimedOut
        } else if self.scene_loading_started {
            MapScenePhase::Loading(self.scene)
        } else {
            MapScenePhase::Idle
        }
    }
}
