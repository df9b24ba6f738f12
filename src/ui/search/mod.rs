//! Free-text place search.

mod intent;
mod processor;
mod state;
mod update;

pub use intent::{SearchIntent, SearchSignal};
pub use processor::{is_query_too_short, SearchProcessor};
pub use state::SearchState;
pub use update::SearchUpdate;
