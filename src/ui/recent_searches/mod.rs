//! Paged list of previously performed searches.

mod intent;
mod processor;
mod state;
mod update;

pub use intent::{RecentSearchesIntent, RecentSearchesSignal};
pub use processor::RecentSearchesProcessor;
pub use state::{RecentSearchesState, SEARCHES_LIMIT_INCREMENT};
pub use update::RecentSearchesUpdate;
