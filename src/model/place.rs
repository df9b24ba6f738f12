//! Places returned by the search collaborators and their UI projections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::location::Location;

/// Category used for "places of type around" queries (e.g. `amenity=restaurant`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceType {
    pub key: String,
    pub value: String,
}

impl PlaceType {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Human readable label: `fast_food` becomes `Fast food`.
    pub fn label(&self) -> String {
        let spaced = self.value.replace('_', " ").to_lowercase();
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// A map node with tags, as returned by a places-around query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A geocoded point, as returned by autocomplete search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub name: String,
    pub location: Location,
}

/// Something displayable on the map / AR overlay.
///
/// Identity is the generated `id`; two markers with equal names are distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl From<Node> for Marker {
    fn from(node: Node) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: node.name,
            location: Location::new(node.lat, node.lon),
            tags: node.tags,
        }
    }
}

impl From<Point> for Marker {
    fn from(point: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: point.name,
            location: point.location,
            tags: BTreeMap::new(),
        }
    }
}

/// Sort markers by distance to `origin`, nearest first.
pub fn sort_by_distance(markers: &mut [Marker], origin: &Location) {
    markers.sort_by(|a, b| {
        a.location
            .distance_to(origin)
            .total_cmp(&b.location.distance_to(origin))
    });
}
