//! Shared test utilities and fake collaborators.

#![allow(dead_code, unused_imports)]

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::{mpsc, watch};

use lookaround::model::{
    Location, LocationReading, Node, PlaceType, Point, RepoError, SearchKind, SearchRecord,
};
use lookaround::repo::{
    AutocompleteRepository, ConnectivityObserver, LocationProvider, PlacesRepository,
    RecentSearchesRepository,
};

/// Upper bound for any wait in a test; with a paused clock it is virtual.
pub const WAIT: Duration = Duration::from_secs(60);

/// Await `future`, failing the test if it does not finish within [`WAIT`].
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(WAIT, future)
        .await
        .expect("Timed out waiting in test")
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn node(id: i64, name: &str, lat: f64, lon: f64) -> Node {
    Node {
        id,
        name: name.to_string(),
        lat,
        lon,
        tags: BTreeMap::new(),
    }
}

pub fn point(name: &str, latitude: f64, longitude: f64) -> Point {
    Point {
        name: name.to_string(),
        location: Location::new(latitude, longitude),
    }
}

pub fn around_search(id: i64, key: &str, minutes_ago: i64) -> SearchRecord {
    SearchRecord::Around {
        id,
        key: key.to_string(),
        lat: 52.0,
        lng: 21.0,
        last_searched_at: Utc.timestamp_opt(1_700_000_000 - minutes_ago * 60, 0).unwrap(),
    }
}

pub fn autocomplete_search(id: i64, query: &str, minutes_ago: i64) -> SearchRecord {
    SearchRecord::Autocomplete {
        id,
        query: query.to_string(),
        priority_lat: None,
        priority_lon: None,
        last_searched_at: Utc.timestamp_opt(1_700_000_000 - minutes_ago * 60, 0).unwrap(),
    }
}

/// Connectivity flag the test flips by hand.
pub struct FakeConnectivity {
    online: watch::Sender<bool>,
}

impl FakeConnectivity {
    pub fn new(online: bool) -> Arc<Self> {
        let (online, _) = watch::channel(online);
        Arc::new(Self { online })
    }

    pub fn set(&self, online: bool) {
        self.online.send_replace(online);
    }
}

impl ConnectivityObserver for FakeConnectivity {
    fn connectivity(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }
}

/// Location source fed by the test through [`FakeLocations::push`].
pub struct FakeLocations {
    tx: mpsc::UnboundedSender<LocationReading>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<LocationReading>>>,
    available: Mutex<bool>,
    subscriptions: Mutex<usize>,
    availability_checks: Mutex<usize>,
}

impl FakeLocations {
    pub fn new(available: bool) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            tx,
            rx: Mutex::new(Some(rx)),
            available: Mutex::new(available),
            subscriptions: Mutex::new(0),
            availability_checks: Mutex::new(0),
        })
    }

    pub fn push(&self, reading: LocationReading) {
        self.tx.send(reading).expect("Location stream dropped");
    }

    pub fn push_location(&self, latitude: f64, longitude: f64) {
        self.push(LocationReading::Success(Location::new(latitude, longitude)));
    }

    pub fn set_available(&self, available: bool) {
        *self.available.lock() = available;
    }

    pub fn subscriptions(&self) -> usize {
        *self.subscriptions.lock()
    }

    pub fn availability_checks(&self) -> usize {
        *self.availability_checks.lock()
    }
}

#[async_trait]
impl LocationProvider for FakeLocations {
    fn updates(&self, _interval: Duration) -> BoxStream<'static, LocationReading> {
        *self.subscriptions.lock() += 1;
        match self.rx.lock().take() {
            Some(rx) => stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|reading| (reading, rx))
            })
            .boxed(),
            None => stream::pending().boxed(),
        }
    }

    async fn is_location_available(&self) -> bool {
        *self.availability_checks.lock() += 1;
        *self.available.lock()
    }
}

/// Places source returning a fixed result after an optional delay.
pub struct FakePlaces {
    result: Mutex<Result<Vec<Node>, RepoError>>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<(String, f64, f64)>>,
}

impl FakePlaces {
    pub fn new(nodes: Vec<Node>) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Ok(nodes)),
            delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_result(&self, result: Result<Vec<Node>, RepoError>) {
        *self.result.lock() = result;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// `(what, latitude, longitude)` of every request.
    pub fn calls(&self) -> Vec<(String, f64, f64)> {
        self.calls.lock().clone()
    }

    async fn respond(
        &self,
        what: String,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Node>, RepoError> {
        self.calls.lock().push((what, latitude, longitude));
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.result.lock().clone()
    }
}

#[async_trait]
impl PlacesRepository for FakePlaces {
    async fn places_of_type_around(
        &self,
        place_type: &PlaceType,
        latitude: f64,
        longitude: f64,
        _radius_m: f64,
    ) -> Result<Vec<Node>, RepoError> {
        self.respond(place_type.label(), latitude, longitude).await
    }

    async fn attractions_around(
        &self,
        latitude: f64,
        longitude: f64,
        _radius_m: f64,
    ) -> Result<Vec<Node>, RepoError> {
        self.respond("attractions".to_string(), latitude, longitude).await
    }
}

/// Autocomplete source with per-query responses and delays.
#[derive(Default)]
pub struct FakeAutocomplete {
    responses: Mutex<HashMap<String, (Duration, Result<Vec<Point>, RepoError>)>>,
    queries: Mutex<Vec<(String, Option<f64>, Option<f64>)>>,
}

impl FakeAutocomplete {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, query: &str, delay: Duration, result: Result<Vec<Point>, RepoError>) {
        self.responses
            .lock()
            .insert(query.to_string(), (delay, result));
    }

    pub fn queries(&self) -> Vec<(String, Option<f64>, Option<f64>)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl AutocompleteRepository for FakeAutocomplete {
    async fn search_points(
        &self,
        query: &str,
        priority_lat: Option<f64>,
        priority_lon: Option<f64>,
    ) -> Result<Vec<Point>, RepoError> {
        self.queries
            .lock()
            .push((query.to_string(), priority_lat, priority_lon));
        let response = self.responses.lock().get(query).cloned();
        match response {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Recent searches held in memory, newest first.
pub struct FakeRecentSearches {
    searches: Mutex<Vec<SearchRecord>>,
    around_results: Mutex<HashMap<i64, Vec<Node>>>,
    autocomplete_results: Mutex<HashMap<i64, Vec<Point>>>,
    fail_loads: Mutex<bool>,
    fail_deletes: Mutex<bool>,
    requested_limits: Mutex<Vec<usize>>,
}

impl FakeRecentSearches {
    pub fn new(searches: Vec<SearchRecord>) -> Arc<Self> {
        Arc::new(Self {
            searches: Mutex::new(searches),
            around_results: Mutex::new(HashMap::new()),
            autocomplete_results: Mutex::new(HashMap::new()),
            fail_loads: Mutex::new(false),
            fail_deletes: Mutex::new(false),
            requested_limits: Mutex::new(Vec::new()),
        })
    }

    /// `count` searches with ids `1..=count`, id 1 the newest.
    pub fn with_count(count: i64) -> Arc<Self> {
        Self::new(
            (1..=count)
                .map(|id| around_search(id, "amenity=cafe", id))
                .collect(),
        )
    }

    /// Record a new search as the most recent one.
    pub fn push(&self, search: SearchRecord) {
        self.searches.lock().insert(0, search);
    }

    pub fn set_around_results(&self, id: i64, nodes: Vec<Node>) {
        self.around_results.lock().insert(id, nodes);
    }

    pub fn set_autocomplete_results(&self, id: i64, points: Vec<Point>) {
        self.autocomplete_results.lock().insert(id, points);
    }

    pub fn fail_loads(&self, fail: bool) {
        *self.fail_loads.lock() = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock() = fail;
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.requested_limits.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.searches.lock().len()
    }
}

#[async_trait]
impl RecentSearchesRepository for FakeRecentSearches {
    async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, RepoError> {
        self.requested_limits.lock().push(limit);
        if *self.fail_loads.lock() {
            return Err(RepoError::Unavailable("database locked".to_string()));
        }
        Ok(self.searches.lock().iter().take(limit).cloned().collect())
    }

    async fn total_searches_count(&self) -> Result<usize, RepoError> {
        Ok(self.searches.lock().len())
    }

    async fn delete_search(&self, id: i64, _kind: SearchKind) -> Result<(), RepoError> {
        if *self.fail_deletes.lock() {
            return Err(RepoError::Unavailable("database locked".to_string()));
        }
        let mut searches = self.searches.lock();
        let before = searches.len();
        searches.retain(|search| search.id() != id);
        if searches.len() == before {
            return Err(RepoError::NotFound { id });
        }
        Ok(())
    }

    async fn search_around_results(&self, id: i64) -> Result<Vec<Node>, RepoError> {
        self.around_results
            .lock()
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound { id })
    }

    async fn autocomplete_results(&self, id: i64) -> Result<Vec<Point>, RepoError> {
        self.autocomplete_results
            .lock()
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound { id })
    }
}
