use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::Config;
use crate::model::{LoadError, Location, LocationReading, Marker, RepoError};
use crate::repo::{
    AutocompleteRepository, ConnectivityObserver, LocationProvider, PlacesRepository,
    RecentSearchesRepository,
};
use crate::ui::main::intent::{MainIntent, MainSignal};
use crate::ui::main::state::MainState;
use crate::ui::main::update::MainUpdate;
use crate::ui::mvi::{FlowProcessor, Latest, SavedStateHandle, UpdatesContext};
use crate::ui::search::is_query_too_short;

/// Coordinates sent with place queries are rounded to this many decimals.
const QUERY_DECIMAL_PLACES: u32 = 2;

/// Timing and search knobs for [`MainProcessor`].
#[derive(Debug, Clone, PartialEq)]
pub struct MainSettings {
    pub location_update_interval: Duration,
    pub location_availability_poll: Duration,
    pub places_loading_timeout: Duration,
    pub search_debounce: Duration,
    pub places_radius_m: f64,
    pub min_alphanumeric_chars: usize,
}

impl Default for MainSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for MainSettings {
    fn from(config: &Config) -> Self {
        Self {
            location_update_interval: config.timing.location_update_interval(),
            location_availability_poll: config.timing.location_availability_poll(),
            places_loading_timeout: config.timing.places_loading_timeout(),
            search_debounce: config.timing.search_debounce(),
            places_radius_m: config.search.places_radius_m,
            min_alphanumeric_chars: config.search.min_alphanumeric_chars,
        }
    }
}

/// Drives location updates and every marker-producing search on the main screen.
///
/// All marker requests share one latest-wins slot: whichever request was
/// made last owns the markers.
pub struct MainProcessor {
    places: Arc<dyn PlacesRepository>,
    autocomplete: Arc<dyn AutocompleteRepository>,
    recent_searches: Arc<dyn RecentSearchesRepository>,
    locations: Arc<dyn LocationProvider>,
    connectivity: Arc<dyn ConnectivityObserver>,
    settings: MainSettings,
}

impl MainProcessor {
    pub fn new(
        places: Arc<dyn PlacesRepository>,
        autocomplete: Arc<dyn AutocompleteRepository>,
        recent_searches: Arc<dyn RecentSearchesRepository>,
        locations: Arc<dyn LocationProvider>,
        connectivity: Arc<dyn ConnectivityObserver>,
    ) -> Self {
        Self {
            places,
            autocomplete,
            recent_searches,
            locations,
            connectivity,
            settings: MainSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: MainSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Location to query around, or `None` after signalling why not.
    fn query_origin(
        &self,
        ctx: &UpdatesContext<Self>,
        connectivity: &watch::Receiver<bool>,
        needs_network: bool,
    ) -> Option<Location> {
        let Some(location) = ctx.states.current().location.value().copied() else {
            ctx.signals.emit(MainSignal::UnableToLoadPlacesWithoutLocation);
            return None;
        };
        if needs_network && !*connectivity.borrow() {
            ctx.signals.emit(MainSignal::UnableToLoadPlacesWithoutConnection);
            return None;
        }
        Some(location.rounded(QUERY_DECIMAL_PLACES))
    }

    fn load_markers<F>(&self, ctx: &UpdatesContext<Self>, slot: &mut Latest, request: F)
    where
        F: Future<Output = Result<Vec<Marker>, RepoError>> + Send + 'static,
    {
        let limit = self.settings.places_loading_timeout;
        let updates = ctx.updates.clone();
        let signals = ctx.signals.clone();

        slot.launch(move |gate| {
            let updates = updates.gated(gate.clone());
            let signals = signals.gated(gate);
            updates.emit(MainUpdate::LoadingSearchResults);

            async move {
                let error = match tokio::time::timeout(limit, request).await {
                    Ok(Ok(markers)) if markers.is_empty() => {
                        signals.emit(MainSignal::NoPlacesFound);
                        updates.emit(MainUpdate::SearchResultsEmpty);
                        return;
                    }
                    Ok(Ok(markers)) => {
                        tracing::debug!(count = markers.len(), "Places loaded");
                        updates.emit(MainUpdate::SearchResultsLoaded { markers });
                        return;
                    }
                    Ok(Err(err)) => LoadError::from(err),
                    Err(_) => LoadError::Timeout {
                        after_ms: limit.as_millis() as u64,
                    },
                };

                tracing::warn!(%error, "Places loading failed");
                updates.emit(MainUpdate::SearchError {
                    error: error.clone(),
                });
                signals.emit(MainSignal::PlacesLoadingFailed(error));
            }
        });
    }

    fn start_location_updates(&self, ctx: &UpdatesContext<Self>) {
        let locations = Arc::clone(&self.locations);
        let interval = self.settings.location_update_interval;
        let poll = self.settings.location_availability_poll;
        let updates = ctx.updates.clone();
        let scope = ctx.scope.clone();

        ctx.scope.spawn("location_updates", async move {
            if locations.is_location_available().await {
                updates.emit(MainUpdate::LoadingLocation);
            } else {
                updates.emit(MainUpdate::LocationDisabled);
            }

            let mut availability = Latest::new(&scope, "location_availability");
            let mut readings = locations.updates(interval);
            let mut failing = false;

            while let Some(reading) = readings.next().await {
                match reading {
                    LocationReading::Success(location) => {
                        if failing {
                            failing = false;
                            availability.cancel();
                        }
                        updates.emit(MainUpdate::LocationLoaded { location });
                    }
                    LocationReading::Failure if !failing => {
                        failing = true;
                        if locations.is_location_available().await {
                            updates.emit(MainUpdate::FailedToUpdateLocation);
                            continue;
                        }

                        updates.emit(MainUpdate::LocationDisabled);
                        let locations = Arc::clone(&locations);
                        let updates = updates.clone();
                        availability.launch(move |gate| {
                            let updates = updates.gated(gate);
                            async move {
                                loop {
                                    tokio::time::sleep(poll).await;
                                    if locations.is_location_available().await {
                                        break;
                                    }
                                }
                                updates.emit(MainUpdate::LoadingLocation);
                            }
                        });
                    }
                    LocationReading::Failure => {}
                }
            }
            tracing::debug!("Location stream ended");
        });
    }

    async fn refresh_recent_searches_count(&self, ctx: &UpdatesContext<Self>) {
        match self.recent_searches.total_searches_count().await {
            Ok(count) => {
                ctx.updates
                    .emit(MainUpdate::RecentSearchesCountChanged { count });
            }
            Err(err) => tracing::warn!(error = %err, "Failed to count recent searches"),
        }
    }
}

#[async_trait]
impl FlowProcessor for MainProcessor {
    type Intent = MainIntent;
    type Update = MainUpdate;
    type State = MainState;
    type Signal = MainSignal;

    async fn updates(self: Arc<Self>, mut ctx: UpdatesContext<Self>) {
        let connectivity = self.connectivity.connectivity();
        let mut markers = Latest::new(&ctx.scope, "markers");
        let mut debounce = Latest::new(&ctx.scope, "autocomplete_debounce");
        // Last query that settled after the debounce, searchable or not.
        let settled_query: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let mut location_started = false;

        self.refresh_recent_searches_count(&ctx).await;

        while let Some(intent) = ctx.intents.next().await {
            match intent {
                MainIntent::GetPlacesOfType { place_type } => {
                    let Some(origin) = self.query_origin(&ctx, &connectivity, true) else {
                        continue;
                    };
                    let places = Arc::clone(&self.places);
                    let radius = self.settings.places_radius_m;
                    self.load_markers(&ctx, &mut markers, async move {
                        let nodes = places
                            .places_of_type_around(
                                &place_type,
                                origin.latitude,
                                origin.longitude,
                                radius,
                            )
                            .await?;
                        let markers = nodes.into_iter().map(Marker::from).collect();
                        Ok::<Vec<Marker>, RepoError>(markers)
                    });
                }
                MainIntent::GetAttractions => {
                    let Some(origin) = self.query_origin(&ctx, &connectivity, true) else {
                        continue;
                    };
                    let places = Arc::clone(&self.places);
                    let radius = self.settings.places_radius_m;
                    self.load_markers(&ctx, &mut markers, async move {
                        let nodes = places
                            .attractions_around(origin.latitude, origin.longitude, radius)
                            .await?;
                        let markers = nodes.into_iter().map(Marker::from).collect();
                        Ok::<Vec<Marker>, RepoError>(markers)
                    });
                }
                MainIntent::SearchQueryChanged { query } => {
                    ctx.updates.emit(MainUpdate::SearchQueryChanged {
                        query: query.clone(),
                    });

                    // Every change restarts the debounce, so a cleared query drops a
                    // pending search.
                    let query = query.trim().to_string();
                    let searchable = !query.is_empty()
                        && !is_query_too_short(&query, self.settings.min_alphanumeric_chars);
                    let settled = Arc::clone(&settled_query);
                    let sender = ctx.intent.clone();
                    let quiet = self.settings.search_debounce;
                    debounce.launch(move |gate| async move {
                        tokio::time::sleep(quiet).await;
                        let sent = gate.pass(|| {
                            let mut last = settled.lock();
                            if last.as_deref() == Some(query.as_str()) {
                                return Ok(());
                            }
                            *last = Some(query.clone());
                            if !searchable {
                                return Ok(());
                            }
                            sender.send(MainIntent::AutocompleteSearch { query })
                        });
                        if let Some(Err(error)) = sent {
                            tracing::debug!(%error, "Debounced search not sent");
                        }
                    });
                }
                MainIntent::AutocompleteSearch { query } => {
                    let Some(origin) = self.query_origin(&ctx, &connectivity, true) else {
                        continue;
                    };
                    let autocomplete = Arc::clone(&self.autocomplete);
                    self.load_markers(&ctx, &mut markers, async move {
                        let points = autocomplete
                            .search_points(&query, Some(origin.latitude), Some(origin.longitude))
                            .await?;
                        let markers = points.into_iter().map(Marker::from).collect();
                        Ok::<Vec<Marker>, RepoError>(markers)
                    });
                }
                MainIntent::LoadSearchAroundResults { search_id } => {
                    if self.query_origin(&ctx, &connectivity, false).is_none() {
                        continue;
                    }
                    let recent = Arc::clone(&self.recent_searches);
                    self.load_markers(&ctx, &mut markers, async move {
                        let nodes = recent.search_around_results(search_id).await?;
                        let markers = nodes.into_iter().map(Marker::from).collect();
                        Ok::<Vec<Marker>, RepoError>(markers)
                    });
                }
                MainIntent::LoadSearchAutocompleteResults { search_id } => {
                    if self.query_origin(&ctx, &connectivity, false).is_none() {
                        continue;
                    }
                    let recent = Arc::clone(&self.recent_searches);
                    self.load_markers(&ctx, &mut markers, async move {
                        let points = recent.autocomplete_results(search_id).await?;
                        let markers = points.into_iter().map(Marker::from).collect();
                        Ok::<Vec<Marker>, RepoError>(markers)
                    });
                }
                MainIntent::LocationPermissionGranted => {
                    if !location_started {
                        location_started = true;
                        self.start_location_updates(&ctx);
                    }
                }
                MainIntent::LocationPermissionDenied => {
                    ctx.updates.emit(MainUpdate::LocationPermissionDenied);
                }
                MainIntent::SearchFocusChanged { focused } => {
                    ctx.updates.emit(MainUpdate::SearchFocusChanged { focused });
                }
                MainIntent::BottomNavItemSelected { item } => {
                    ctx.updates.emit(MainUpdate::BottomNavItemSelected { item });
                }
                MainIntent::LiveBottomSheetStateChanged { state } => {
                    ctx.updates
                        .emit(MainUpdate::LiveBottomSheetStateChanged { state });
                }
                MainIntent::RecentSearchesChanged => {
                    self.refresh_recent_searches_count(&ctx).await;
                }
            }
        }
    }

    fn state_will_update(
        &self,
        _current: &MainState,
        next: &MainState,
        _update: &MainUpdate,
        saved_state: &SavedStateHandle,
    ) {
        saved_state.save_state(next);
    }
}
