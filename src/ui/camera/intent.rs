use serde::{Deserialize, Serialize};

use crate::ui::camera::state::StreamState;
use crate::ui::mvi::{Intent, Signal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraIntent {
    CameraViewCreated,
    CameraStreamStateChanged { stream: StreamState },
    CameraPermissionDenied,
    CameraInitializationFailed,
    /// The visible marker page moved by `difference`.
    CameraMarkersFirstIndexChanged { difference: i64 },
    LocationPermissionDenied,
}

impl Intent for CameraIntent {}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraSignal {
    /// The provider stopped delivering locations.
    LocationUnavailable,
    /// Location became available again and is loading.
    LocationLoading,
}

impl Signal for CameraSignal {}
