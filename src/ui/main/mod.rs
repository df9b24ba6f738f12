//! Main screen: user location, place markers and search bookkeeping.

mod intent;
mod processor;
mod state;
mod update;

pub use intent::{MainIntent, MainSignal};
pub use processor::{MainProcessor, MainSettings};
pub use state::{BottomNavItem, BottomSheetState, MainState};
pub use update::MainUpdate;
