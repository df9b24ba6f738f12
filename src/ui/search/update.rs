use serde::{Deserialize, Serialize};

use crate::model::{LoadError, Loadable, Point};
use crate::ui::mvi::StateUpdate;
use crate::ui::search::state::SearchState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchUpdate {
    LoadingPlaces,
    PlacesLoaded {
        points: Vec<Point>,
        with_location_priority: bool,
    },
    PlacesLoadingError { error: LoadError },
    BlankQuery,
    QueryTooShort,
}

impl StateUpdate for SearchUpdate {
    type State = SearchState;

    fn apply(&self, state: SearchState) -> SearchState {
        match self {
            Self::LoadingPlaces => SearchState {
                points: state.points.with_loading_in_progress(),
                ..state
            },
            Self::PlacesLoaded {
                points,
                with_location_priority,
            } => SearchState {
                points: Loadable::ready(points.clone()),
                last_performed_with_location_priority: *with_location_priority,
            },
            Self::PlacesLoadingError { error } => SearchState {
                points: state.points.with_error(error.clone()),
                ..state
            },
            Self::BlankQuery => SearchState {
                points: Loadable::Empty,
                ..state
            },
            Self::QueryTooShort => SearchState {
                points: state.points.with_error(LoadError::QueryTooShort),
                ..state
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use crate::ui::mvi::fold_updates;

    fn point(name: &str) -> Point {
        Point {
            name: name.to_string(),
            location: Location::new(0.0, 0.0),
        }
    }

    #[test]
    fn reload_keeps_previous_points_visible() {
        let state = fold_updates(
            SearchState::default(),
            [
                SearchUpdate::LoadingPlaces,
                SearchUpdate::PlacesLoaded {
                    points: vec![point("a")],
                    with_location_priority: true,
                },
                SearchUpdate::LoadingPlaces,
            ],
        );

        assert_eq!(
            state.points,
            Loadable::LoadingNext {
                value: vec![point("a")]
            }
        );
        assert!(state.last_performed_with_location_priority);
    }

    #[test]
    fn too_short_is_a_validation_error() {
        let state = SearchUpdate::QueryTooShort.apply(SearchState::default());
        assert!(state.points.is_failed_with(LoadError::is_validation));
    }

    #[test]
    fn blank_query_empties_results() {
        let state = fold_updates(
            SearchState::default(),
            [
                SearchUpdate::PlacesLoaded {
                    points: vec![point("a")],
                    with_location_priority: false,
                },
                SearchUpdate::BlankQuery,
            ],
        );
        assert_eq!(state.points, Loadable::Empty);
    }
}
