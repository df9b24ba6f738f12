use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use crate::model::{LoadError, LocationReading};
use crate::repo::LocationProvider;
use crate::ui::camera::intent::{CameraIntent, CameraSignal};
use crate::ui::camera::state::CameraState;
use crate::ui::camera::update::CameraUpdate;
use crate::ui::mvi::{FlowProcessor, Latest, UpdatesContext};

const DEFAULT_LOCATION_UPDATES_INTERVAL: Duration = Duration::from_secs(3);

/// Feeds camera lifecycle intents and device location into [`CameraState`].
pub struct CameraProcessor {
    locations: Arc<dyn LocationProvider>,
    interval: Duration,
}

impl CameraProcessor {
    pub fn new(locations: Arc<dyn LocationProvider>) -> Self {
        Self {
            locations,
            interval: DEFAULT_LOCATION_UPDATES_INTERVAL,
        }
    }

    /// Interval for both location updates and availability polling.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until location is available again, then report it as loading.
    fn await_availability(&self, ctx: &UpdatesContext<Self>, slot: &mut Latest) {
        let locations = Arc::clone(&self.locations);
        let interval = self.interval;
        let signals = ctx.signals.clone();
        let updates = ctx.updates.clone();
        slot.launch(move |gate| {
            let signals = signals.gated(gate.clone());
            let updates = updates.gated(gate);
            async move {
                loop {
                    tokio::time::sleep(interval).await;
                    if locations.is_location_available().await {
                        break;
                    }
                }
                signals.emit(CameraSignal::LocationLoading);
                updates.emit(CameraUpdate::LocationLoading);
            }
        });
    }
}

impl From<CameraIntent> for CameraUpdate {
    fn from(intent: CameraIntent) -> Self {
        match intent {
            CameraIntent::CameraViewCreated => CameraUpdate::CameraViewCreated,
            CameraIntent::CameraStreamStateChanged { stream } => {
                CameraUpdate::CameraStreamStateChanged { stream }
            }
            CameraIntent::CameraPermissionDenied => CameraUpdate::CameraPermissionDenied,
            CameraIntent::CameraInitializationFailed => CameraUpdate::CameraInitializationFailed,
            CameraIntent::CameraMarkersFirstIndexChanged { difference } => {
                CameraUpdate::CameraMarkersFirstIndexChanged { difference }
            }
            CameraIntent::LocationPermissionDenied => CameraUpdate::LocationFailed {
                error: LoadError::LocationPermissionDenied,
            },
        }
    }
}

#[async_trait]
impl FlowProcessor for CameraProcessor {
    type Intent = CameraIntent;
    type Update = CameraUpdate;
    type State = CameraState;
    type Signal = CameraSignal;

    async fn updates(self: Arc<Self>, mut ctx: UpdatesContext<Self>) {
        let mut readings = self.locations.updates(self.interval);
        let mut readings_done = false;
        let mut availability = Latest::new(&ctx.scope, "location_availability");
        // Consecutive failures are reported once.
        let mut failing = false;

        ctx.updates.emit(CameraUpdate::LocationLoading);

        loop {
            tokio::select! {
                intent = ctx.intents.next() => match intent {
                    Some(intent) => {
                        ctx.updates.emit(CameraUpdate::from(intent));
                    }
                    None => break,
                },
                reading = readings.next(), if !readings_done => match reading {
                    Some(LocationReading::Success(location)) => {
                        if failing {
                            failing = false;
                            availability.cancel();
                        }
                        ctx.updates.emit(CameraUpdate::LocationLoaded { location });
                    }
                    Some(LocationReading::Failure) if !failing => {
                        failing = true;
                        tracing::info!("Location unavailable, waiting for it to come back");
                        ctx.signals.emit(CameraSignal::LocationUnavailable);
                        ctx.updates.emit(CameraUpdate::LocationFailed {
                            error: LoadError::LocationDisabled,
                        });
                        self.await_availability(&ctx, &mut availability);
                    }
                    Some(LocationReading::Failure) => {}
                    None => {
                        tracing::debug!("Location stream ended");
                        readings_done = true;
                    }
                },
            }
        }
    }
}
