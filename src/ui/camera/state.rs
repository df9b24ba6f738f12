use serde::{Deserialize, Serialize};

use crate::model::{LoadError, Loadable, Location};
use crate::ui::mvi::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Idle,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CameraPreviewState {
    #[default]
    Initial,
    PermissionDenied,
    InitializationFailure,
    Active { stream: StreamState },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraState {
    pub location: Loadable<Location>,
    pub preview: CameraPreviewState,
    /// Index of the first marker shown in the AR overlay.
    pub first_marker_index: usize,
}

impl UiState for CameraState {}

impl CameraState {
    /// Location is known and the camera is streaming.
    pub fn ar_enabled(&self) -> bool {
        self.location.is_ready()
            && self.preview
                == CameraPreviewState::Active {
                    stream: StreamState::Streaming,
                }
    }

    /// Location or the camera stream is still starting up.
    pub fn ar_loading(&self) -> bool {
        self.location.is_loading()
            || matches!(
                self.preview,
                CameraPreviewState::Initial
                    | CameraPreviewState::Active {
                        stream: StreamState::Idle
                    }
            )
    }

    /// A permission is missing or location is turned off.
    pub fn ar_disabled(&self) -> bool {
        self.any_permission_denied() || self.location_disabled()
    }

    pub fn any_permission_denied(&self) -> bool {
        self.preview == CameraPreviewState::PermissionDenied
            || self
                .location
                .is_failed_with(|error| *error == LoadError::LocationPermissionDenied)
    }

    pub fn location_disabled(&self) -> bool {
        self.location
            .is_failed_with(|error| *error == LoadError::LocationDisabled)
    }
}
