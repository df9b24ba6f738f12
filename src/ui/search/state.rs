use serde::{Deserialize, Serialize};

use crate::model::{Loadable, Point};
use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchState {
    pub points: Loadable<Vec<Point>>,
    pub last_performed_with_location_priority: bool,
}

impl UiState for SearchState {}
