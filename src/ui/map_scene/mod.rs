//! Map scene loading with a bounded wait and automatic retry.

mod intent;
mod processor;
mod state;
mod update;

pub use intent::{MapSceneIntent, MapSceneSignal};
pub use processor::MapSceneProcessor;
pub use state::{MapScene, MapScenePhase, MapSceneState};
pub use update::MapSceneUpdate;
