//! In-memory collaborators loaded from a JSON fixture.
//!
//! ```json
//! {
//!   "location": { "latitude": 52.23, "longitude": 21.01 },
//!   "nodes": [{ "id": 1, "name": "Cafe", "lat": 52.23, "lon": 21.0, "tags": { "amenity": "cafe" } }],
//!   "points": [{ "name": "Central Station", "location": { "latitude": 52.22, "longitude": 21.0 } }],
//!   "searches": []
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::watch;

use super::{
    AutocompleteRepository, ConnectivityObserver, LocationProvider, PlacesRepository,
    RecentSearchesRepository,
};
use crate::model::{
    Location, LocationReading, Node, PlaceType, Point, RepoError, SearchKind, SearchRecord,
};

const ATTRACTION_TAGS: [(&str, &str); 2] = [("tourism", "attraction"), ("historic", "monument")];

#[derive(Debug, Default, Deserialize)]
struct FixtureData {
    #[serde(default)]
    location: Option<Location>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    points: Vec<Point>,
    #[serde(default)]
    searches: Vec<SearchRecord>,
}

/// One object implementing every collaborator trait.
#[derive(Clone)]
pub struct FixtureRepository {
    location: Option<Location>,
    nodes: Arc<Vec<Node>>,
    points: Arc<Vec<Point>>,
    searches: Arc<Mutex<Vec<SearchRecord>>>,
    online: Arc<watch::Sender<bool>>,
}

impl Default for FixtureRepository {
    fn default() -> Self {
        Self::from_data(FixtureData::default())
    }
}

impl FixtureRepository {
    /// Load a fixture file. Missing sections are empty.
    pub fn load(path: &Path) -> Result<Self, RepoError> {
        let content = fs::read_to_string(path)
            .map_err(|e| RepoError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let data: FixtureData = serde_json::from_str(&content)
            .map_err(|e| RepoError::Malformed(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_data(data))
    }

    fn from_data(data: FixtureData) -> Self {
        let (online, _) = watch::channel(true);
        Self {
            location: data.location,
            nodes: Arc::new(data.nodes),
            points: Arc::new(data.points),
            searches: Arc::new(Mutex::new(data.searches)),
            online: Arc::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.send_replace(online);
    }

    fn nodes_around<F>(&self, latitude: f64, longitude: f64, radius_m: f64, matches: F) -> Vec<Node>
    where
        F: Fn(&Node) -> bool,
    {
        let origin = Location::new(latitude, longitude);
        self.nodes
            .iter()
            .filter(|node| matches(node))
            .filter(|node| Location::new(node.lat, node.lon).distance_to(&origin) <= radius_m)
            .cloned()
            .collect()
    }

    fn ensure_online(&self) -> Result<(), RepoError> {
        if *self.online.borrow() {
            Ok(())
        } else {
            Err(RepoError::Unavailable("offline".to_string()))
        }
    }
}

#[async_trait]
impl LocationProvider for FixtureRepository {
    fn updates(&self, interval: Duration) -> BoxStream<'static, LocationReading> {
        let reading = match self.location {
            Some(location) => LocationReading::Success(location),
            None => LocationReading::Failure,
        };
        let first = stream::once(async move { reading });
        let rest = stream::unfold((), move |()| async move {
            tokio::time::sleep(interval).await;
            Some((reading, ()))
        });
        first.chain(rest).boxed()
    }

    async fn is_location_available(&self) -> bool {
        self.location.is_some()
    }
}

impl ConnectivityObserver for FixtureRepository {
    fn connectivity(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }
}

#[async_trait]
impl PlacesRepository for FixtureRepository {
    async fn places_of_type_around(
        &self,
        place_type: &PlaceType,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<Node>, RepoError> {
        self.ensure_online()?;
        Ok(self.nodes_around(latitude, longitude, radius_m, |node| {
            node.tags.get(&place_type.key) == Some(&place_type.value)
        }))
    }

    async fn attractions_around(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<Node>, RepoError> {
        self.ensure_online()?;
        Ok(self.nodes_around(latitude, longitude, radius_m, |node| {
            ATTRACTION_TAGS
                .iter()
                .any(|(key, value)| node.tags.get(*key).map(String::as_str) == Some(*value))
        }))
    }
}

#[async_trait]
impl AutocompleteRepository for FixtureRepository {
    async fn search_points(
        &self,
        query: &str,
        _priority_lat: Option<f64>,
        _priority_lon: Option<f64>,
    ) -> Result<Vec<Point>, RepoError> {
        self.ensure_online()?;
        let needle = query.to_lowercase();
        Ok(self
            .points
            .iter()
            .filter(|point| point.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecentSearchesRepository for FixtureRepository {
    async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, RepoError> {
        let mut searches = self.searches.lock().clone();
        searches.sort_by_key(|search| std::cmp::Reverse(search.last_searched_at()));
        searches.truncate(limit);
        Ok(searches)
    }

    async fn total_searches_count(&self) -> Result<usize, RepoError> {
        Ok(self.searches.lock().len())
    }

    async fn delete_search(&self, id: i64, kind: SearchKind) -> Result<(), RepoError> {
        let mut searches = self.searches.lock();
        let before = searches.len();
        searches.retain(|search| !(search.id() == id && search.kind() == kind));
        if searches.len() == before {
            return Err(RepoError::NotFound { id });
        }
        Ok(())
    }

    async fn search_around_results(&self, id: i64) -> Result<Vec<Node>, RepoError> {
        let searches = self.searches.lock();
        match searches
            .iter()
            .find(|search| search.id() == id && search.kind() == SearchKind::Around)
        {
            Some(SearchRecord::Around { key, .. }) => {
                let (tag_key, tag_value) = key.split_once('=').unwrap_or((key.as_str(), ""));
                Ok(self
                    .nodes
                    .iter()
                    .filter(|node| match node.tags.get(tag_key) {
                        Some(value) => tag_value.is_empty() || value == tag_value,
                        None => false,
                    })
                    .cloned()
                    .collect())
            }
            _ => Err(RepoError::NotFound { id }),
        }
    }

    async fn autocomplete_results(&self, id: i64) -> Result<Vec<Point>, RepoError> {
        let query = {
            let searches = self.searches.lock();
            match searches.iter().find(|search| search.id() == id) {
                Some(SearchRecord::Autocomplete { query, .. }) => query.to_lowercase(),
                _ => return Err(RepoError::NotFound { id }),
            }
        };
        Ok(self
            .points
            .iter()
            .filter(|point| point.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}
