//! Collaborator seams consumed by the feature processors.
//!
//! Concrete HTTP clients and databases live outside this crate; the
//! processors only see these traits. [`fixture`] provides in-memory
//! implementations backed by a JSON file for the CLI.

pub mod fixture;

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::watch;

use crate::model::{LocationReading, Node, PlaceType, Point, RepoError, SearchKind, SearchRecord};

/// Device location source.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Readings every `interval` until the stream is dropped.
    fn updates(&self, interval: Duration) -> BoxStream<'static, LocationReading>;

    /// Whether location services are currently enabled.
    async fn is_location_available(&self) -> bool;
}

/// Network reachability.
pub trait ConnectivityObserver: Send + Sync {
    /// Current connectivity; the receiver is notified on every change.
    fn connectivity(&self) -> watch::Receiver<bool>;
}

/// Places around a location.
#[async_trait]
pub trait PlacesRepository: Send + Sync {
    async fn places_of_type_around(
        &self,
        place_type: &PlaceType,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<Node>, RepoError>;

    async fn attractions_around(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Vec<Node>, RepoError>;
}

/// Free-text geocoding.
#[async_trait]
pub trait AutocompleteRepository: Send + Sync {
    async fn search_points(
        &self,
        query: &str,
        priority_lat: Option<f64>,
        priority_lon: Option<f64>,
    ) -> Result<Vec<Point>, RepoError>;
}

/// Persisted search history and cached results.
#[async_trait]
pub trait RecentSearchesRepository: Send + Sync {
    /// Most recent searches first, at most `limit` of them.
    async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, RepoError>;

    async fn total_searches_count(&self) -> Result<usize, RepoError>;

    async fn delete_search(&self, id: i64, kind: SearchKind) -> Result<(), RepoError>;

    async fn search_around_results(&self, id: i64) -> Result<Vec<Node>, RepoError>;

    async fn autocomplete_results(&self, id: i64) -> Result<Vec<Point>, RepoError>;
}
