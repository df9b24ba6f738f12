use serde::{Deserialize, Serialize};

use crate::model::{LoadError, Loadable, Location};
use crate::ui::camera::state::{CameraPreviewState, CameraState, StreamState};
use crate::ui::mvi::StateUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraUpdate {
    CameraViewCreated,
    CameraStreamStateChanged { stream: StreamState },
    CameraPermissionDenied,
    CameraInitializationFailed,
    CameraMarkersFirstIndexChanged { difference: i64 },
    LocationLoading,
    LocationLoaded { location: Location },
    LocationFailed { error: LoadError },
}

impl StateUpdate for CameraUpdate {
    type State = CameraState;

    fn apply(&self, state: CameraState) -> CameraState {
        match self {
            Self::CameraViewCreated => CameraState {
                preview: CameraPreviewState::Initial,
                ..state
            },
            Self::CameraStreamStateChanged { stream } => CameraState {
                preview: CameraPreviewState::Active { stream: *stream },
                ..state
            },
            Self::CameraPermissionDenied => CameraState {
                preview: CameraPreviewState::PermissionDenied,
                ..state
            },
            Self::CameraInitializationFailed => CameraState {
                preview: CameraPreviewState::InitializationFailure,
                ..state
            },
            Self::CameraMarkersFirstIndexChanged { difference } => {
                let first_marker_index = match isize::try_from(*difference) {
                    Ok(difference) => state.first_marker_index.saturating_add_signed(difference),
                    Err(_) if *difference < 0 => 0,
                    Err(_) => usize::MAX,
                };
                CameraState {
                    first_marker_index,
                    ..state
                }
            }
            Self::LocationLoading => CameraState {
                location: state.location.with_loading_in_progress(),
                ..state
            },
            Self::LocationLoaded { location } => CameraState {
                location: Loadable::ready(*location),
                ..state
            },
            Self::LocationFailed { error } => CameraState {
                location: state.location.with_error(error.clone()),
                ..state
            },
        }
    }
}
