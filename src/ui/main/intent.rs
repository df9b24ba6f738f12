use serde::{Deserialize, Serialize};

use crate::model::{LoadError, PlaceType};
use crate::ui::main::state::{BottomNavItem, BottomSheetState};
use crate::ui::mvi::{Intent, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MainIntent {
    GetPlacesOfType { place_type: PlaceType },
    GetAttractions,
    /// Only the first grant starts location updates.
    LocationPermissionGranted,
    LocationPermissionDenied,
    /// Raw text of the search bar.
    SearchQueryChanged { query: String },
    /// A debounced, validated query ready to be sent.
    AutocompleteSearch { query: String },
    SearchFocusChanged { focused: bool },
    BottomNavItemSelected { item: BottomNavItem },
    LiveBottomSheetStateChanged { state: BottomSheetState },
    LoadSearchAroundResults { search_id: i64 },
    LoadSearchAutocompleteResults { search_id: i64 },
    /// The search history changed; refresh its count.
    RecentSearchesChanged,
}

impl Intent for MainIntent {}

#[derive(Debug, Clone, PartialEq)]
pub enum MainSignal {
    UnableToLoadPlacesWithoutLocation,
    UnableToLoadPlacesWithoutConnection,
    PlacesLoadingFailed(LoadError),
    NoPlacesFound,
}

impl Signal for MainSignal {}
