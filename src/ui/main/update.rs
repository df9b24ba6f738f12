use serde::{Deserialize, Serialize};

use crate::model::{sort_by_distance, LoadError, Loadable, Location, Marker};
use crate::ui::main::state::{BottomNavItem, BottomSheetState, MainState};
use crate::ui::mvi::StateUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MainUpdate {
    LoadingSearchResults,
    /// Replace markers; they are sorted against the current location.
    SearchResultsLoaded { markers: Vec<Marker> },
    SearchResultsEmpty,
    SearchError { error: LoadError },
    LoadingLocation,
    LocationLoaded { location: Location },
    LocationDisabled,
    LocationPermissionDenied,
    FailedToUpdateLocation,
    SearchQueryChanged { query: String },
    SearchFocusChanged { focused: bool },
    BottomNavItemSelected { item: BottomNavItem },
    LiveBottomSheetStateChanged { state: BottomSheetState },
    RecentSearchesCountChanged { count: usize },
}

/// Sorts markers nearest first.
///
/// # Panics
///
/// If the user location has no value: results are only requested once a
/// location is known.
fn sorted(mut markers: Vec<Marker>, location: &Loadable<Location>) -> Vec<Marker> {
    let Some(origin) = location.value() else {
        panic!("User location does not have a value.");
    };
    sort_by_distance(&mut markers, origin);
    markers
}

impl StateUpdate for MainUpdate {
    type State = MainState;

    fn apply(&self, state: MainState) -> MainState {
        match self {
            Self::LoadingSearchResults => MainState {
                markers: state.markers.with_loading_in_progress(),
                ..state
            },
            Self::SearchResultsLoaded { markers } => MainState {
                markers: Loadable::ready(sorted(markers.clone(), &state.location)),
                ..state
            },
            Self::SearchResultsEmpty => MainState {
                markers: state.markers.with_error(LoadError::EmptyResponse),
                ..state
            },
            Self::SearchError { error } => MainState {
                markers: state.markers.with_error(error.clone()),
                ..state
            },
            Self::LoadingLocation => MainState {
                location: state.location.with_loading_in_progress(),
                ..state
            },
            Self::LocationLoaded { location } => {
                let location = Loadable::ready(*location);
                let markers = state
                    .markers
                    .map(|markers| sorted(markers, &location));
                MainState {
                    location,
                    markers,
                    ..state
                }
            }
            Self::LocationDisabled => MainState {
                location: state.location.with_error(LoadError::LocationDisabled),
                ..state
            },
            Self::LocationPermissionDenied => MainState {
                location: state.location.with_error(LoadError::LocationPermissionDenied),
                ..state
            },
            Self::FailedToUpdateLocation => MainState {
                location: state.location.with_error(LoadError::LocationUpdateFailure),
                ..state
            },
            Self::SearchQueryChanged { query } => MainState {
                search_query: query.clone(),
                ..state
            },
            Self::SearchFocusChanged { focused } => MainState {
                search_focused: *focused,
                ..state
            },
            Self::BottomNavItemSelected { item } => MainState {
                selected_bottom_nav_item: *item,
                ..state
            },
            Self::LiveBottomSheetStateChanged { state: sheet } => MainState {
                last_live_bottom_sheet_state: *sheet,
                ..state
            },
            Self::RecentSearchesCountChanged { count } => MainState {
                recent_searches_count: *count,
                ..state
            },
        }
    }
}
