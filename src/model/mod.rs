//! Data model shared by every feature.

pub mod error;
pub mod loadable;
pub mod location;
pub mod place;
pub mod search;

pub use error::{LoadError, RepoError};
pub use loadable::Loadable;
pub use location::{round_to_decimal_places, Location, LocationReading};
pub use place::{sort_by_distance, Marker, Node, PlaceType, Point};
pub use search::{RecentSearch, SearchKind, SearchRecord};
