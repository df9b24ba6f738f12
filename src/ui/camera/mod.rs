//! Camera preview and location state behind the AR overlay.

mod intent;
mod processor;
mod state;
mod update;

pub use intent::{CameraIntent, CameraSignal};
pub use processor::CameraProcessor;
pub use state::{CameraPreviewState, CameraState, StreamState};
pub use update::CameraUpdate;
