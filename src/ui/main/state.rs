use serde::{Deserialize, Serialize};

use crate::model::{Loadable, Location, Marker};
use crate::ui::mvi::UiState;

/// Settled states of the places bottom sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomSheetState {
    #[default]
    Hidden,
    Collapsed,
    HalfExpanded,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomNavItem {
    #[default]
    Unchecked,
    PlaceTypes,
    PlaceList,
    RecentSearches,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MainState {
    /// Sorted by distance to `location`, nearest first.
    pub markers: Loadable<Vec<Marker>>,
    pub location: Loadable<Location>,
    pub last_live_bottom_sheet_state: BottomSheetState,
    pub selected_bottom_nav_item: BottomNavItem,
    pub recent_searches_count: usize,
    pub search_query: String,
    pub search_focused: bool,
}

impl UiState for MainState {}

impl MainState {
    pub fn has_recent_searches(&self) -> bool {
        self.recent_searches_count > 0
    }

    pub fn markers_ready(&self) -> bool {
        self.markers.value().is_some_and(|markers| !markers.is_empty())
    }
}
