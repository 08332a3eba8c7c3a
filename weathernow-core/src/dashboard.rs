//! Query orchestration: geocode, fetch, normalize, publish.
//!
//! Each search takes a new generation number. Only the search holding the
//! newest generation may publish its snapshot; an older search that finishes
//! late gets [`WeatherError::Superseded`] and leaves state untouched.

use parking_lot::Mutex;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::WeatherError,
    forecast::{ForecastSource, OpenMeteoForecast},
    geocode::{Geocoder, OpenMeteoGeocoder},
    model::{Query, WeatherSnapshot},
    normalize::normalize,
    recent::{self, FileStore, RecentLocations},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
struct State {
    generation: u64,
    snapshot: Option<WeatherSnapshot>,
    recent: RecentLocations,
}

#[derive(Debug)]
pub struct Dashboard {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
    timeout: Duration,
    state: Mutex<State>,
}

impl Dashboard {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastSource>,
        recent: RecentLocations,
    ) -> Self {
        Self {
            geocoder,
            forecast,
            timeout: DEFAULT_TIMEOUT,
            state: Mutex::new(State { generation: 0, snapshot: None, recent }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open-Meteo clients plus a file-backed recency list in the data dir.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = config.timeout();
        let geocoder = OpenMeteoGeocoder::new(config.endpoints.geocoding_url.as_str(), timeout)?;
        let forecast = OpenMeteoForecast::new(config.endpoints.forecast_url.as_str(), timeout)?;
        let recent = RecentLocations::open(Arc::new(FileStore::new(
            Config::data_dir()?.join("recent.json"),
        )));

        Ok(Self::new(Arc::new(geocoder), Arc::new(forecast), recent).with_timeout(timeout))
    }

    /// Run one query end to end.
    ///
    /// The previous snapshot is cleared as soon as the query starts. On
    /// success the snapshot is stored and the location moves to the front of
    /// the recency list.
    #[instrument(skip(self))]
    pub async fn search(&self, query: Query) -> Result<WeatherSnapshot, WeatherError> {
        query.validate()?;

        let generation = self.begin();
        let result = self.run(&query).await;
        self.finish(generation, result)
    }

    /// Latest published snapshot, if any.
    pub fn snapshot(&self) -> Option<WeatherSnapshot> {
        self.state.lock().snapshot.clone()
    }

    pub fn recent(&self) -> Vec<String> {
        self.state.lock().recent.names().to_vec()
    }

    fn begin(&self) -> u64 {
        let mut state = self.state.lock();
        state.generation += 1;
        state.snapshot = None;
        state.generation
    }

    async fn run(&self, query: &Query) -> Result<WeatherSnapshot, WeatherError> {
        let location = self.bounded("geocoding", self.geocoder.resolve(query)).await?;
        let bundle = self.bounded("forecast", self.forecast.fetch(&location)).await?;
        Ok(normalize(&location, &bundle))
    }

    fn finish(
        &self,
        generation: u64,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let (snapshot, names, store) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!(generation, latest = state.generation, "Dropping stale result");
                return Err(WeatherError::Superseded);
            }

            let snapshot = result?;
            state.snapshot = Some(snapshot.clone());
            state.recent.insert(&snapshot.location.name);
            (snapshot, state.recent.names().to_vec(), state.recent.store())
        };

        // File I/O stays outside the state lock.
        recent::persist(store.as_ref(), &names);
        Ok(snapshot)
    }

    async fn bounded<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, WeatherError>>,
    ) -> Result<T, WeatherError> {
        tokio::time::timeout(self.timeout, call).await.map_err(|_| {
            WeatherError::Network(format!(
                "{what} request timed out after {}ms",
                self.timeout.as_millis()
            ))
        })?
    }
}
