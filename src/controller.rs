//! Page controller
//!
//! Sequences geolocation, geocoding, weather fetch and rendering for the two
//! page flows (initial load and search) and owns the page state machine:
//!
//! `Idle → LocationPending → PlaceResolved → WeatherPending → Rendered`,
//! with `Failed` reachable from any pending state.
//!
//! Each flow takes a ticket when it starts. Under
//! [`SequencePolicy::LatestSubmission`] a flow whose ticket is no longer the
//! newest drops its results instead of writing them to the view.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument};

use crate::config::AppConfig;
use crate::error::ErrorKind;
use crate::format::Formatter;
use crate::geocoding::{GeocodingProvider, MapboxGeocoder};
use crate::geolocation::Geolocator;
use crate::http::JsonFetcher;
use crate::models::{Coordinate, Units, WeatherSnapshot, capitalize_label};
use crate::view::{Region, ViewPort, render_stats, render_temp};
use crate::weather::{OpenWeatherClient, WeatherProvider};
use crate::{Result, WeatherPageError};

/// Source of "now" for the timestamp label
pub type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// Where the page is in its current flow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState {
    Idle,
    LocationPending,
    PlaceResolved,
    WeatherPending,
    Rendered,
    Failed(FailureReason),
}

/// Why the last flow failed, as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReason {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&WeatherPageError> for FailureReason {
    fn from(err: &WeatherPageError) -> Self {
        let message = match err.kind() {
            ErrorKind::Retryable => format!("{} You can try again.", err.user_message()),
            ErrorKind::Terminal => err.user_message(),
        };
        Self {
            kind: err.kind(),
            message,
        }
    }
}

/// How overlapping flows are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencePolicy {
    /// Every flow writes its results; the one completing last wins
    Naive,
    /// Only the most recently started flow may write to the view
    #[default]
    LatestSubmission,
}

/// How a flow ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Both panels were replaced
    Rendered,
    /// Nothing to do (empty search)
    Ignored,
    /// A newer flow started; results were discarded
    Superseded,
}

pub struct PageController<V> {
    geocoder: Arc<dyn GeocodingProvider>,
    weather: Arc<dyn WeatherProvider>,
    view: Mutex<V>,
    state: Mutex<PageState>,
    last_snapshot: Mutex<Option<WeatherSnapshot>>,
    formatter: Formatter,
    units: Units,
    policy: SequencePolicy,
    latest: AtomicU64,
    clock: Clock,
}

impl<V: ViewPort> PageController<V> {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        weather: Arc<dyn WeatherProvider>,
        view: V,
    ) -> Self {
        Self {
            geocoder,
            weather,
            view: Mutex::new(view),
            state: Mutex::new(PageState::Idle),
            last_snapshot: Mutex::new(None),
            formatter: Formatter::default(),
            units: Units::default(),
            policy: SequencePolicy::default(),
            latest: AtomicU64::new(0),
            clock: Arc::new(|| Local::now().fixed_offset()),
        }
    }

    /// Controller wired to the Mapbox and OpenWeather clients from `config`
    pub fn from_config(config: &AppConfig, view: V) -> Result<Self> {
        let (token, key) = config.require_credentials()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("weather-page/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let fetcher = JsonFetcher::with_client(client);
        let geocoder = MapboxGeocoder::new(
            fetcher.clone(),
            &config.providers.geocoding_base_url,
            token,
        );
        let weather = OpenWeatherClient::new(fetcher, &config.providers.weather_base_url, key);

        Ok(Self::new(Arc::new(geocoder), Arc::new(weather), view)
            .with_formatter(Formatter::new(config.locale()?))
            .with_units(config.providers.units))
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn state(&self) -> PageState {
        self.state.lock().await.clone()
    }

    /// Snapshot behind the panels currently on screen
    pub async fn last_snapshot(&self) -> Option<WeatherSnapshot> {
        self.last_snapshot.lock().await.clone()
    }

    /// Run `f` against the view, e.g. to read it or type into the search field
    pub async fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut view = self.view.lock().await;
        f(&mut view)
    }

    /// Clear every region before first paint
    pub async fn init(&self) {
        let mut view = self.view.lock().await;
        for region in Region::ALL {
            view.clear(region);
        }
        *self.state.lock().await = PageState::Idle;
        *self.last_snapshot.lock().await = None;
    }

    /// Initial load: position → place name and time → weather → panels
    #[instrument(skip(self, geolocator))]
    pub async fn load_current_location<L: Geolocator + ?Sized>(
        &self,
        geolocator: &L,
    ) -> Result<FlowOutcome> {
        let ticket = self.begin();
        info!(ticket, "Loading weather for the current location");
        self.transition(ticket, PageState::LocationPending).await;

        let result = self.initial_load_chain(ticket, geolocator).await;
        self.finish(ticket, result).await
    }

    /// Search submission: read and clear the search field, then search
    pub async fn submit_search(&self) -> Result<FlowOutcome> {
        let input = self.view.lock().await.take_search_input();
        self.search(&input).await
    }

    /// Search for `input` as if it had been submitted through the form
    #[instrument(skip(self))]
    pub async fn search(&self, input: &str) -> Result<FlowOutcome> {
        let query = input.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return Ok(FlowOutcome::Ignored);
        }

        let ticket = self.begin();
        info!(ticket, "Searching weather for '{}'", query);
        self.transition(ticket, PageState::LocationPending).await;

        let result = self.search_chain(ticket, query).await;
        self.finish(ticket, result).await
    }

    async fn initial_load_chain<L: Geolocator + ?Sized>(
        &self,
        ticket: u64,
        geolocator: &L,
    ) -> Result<FlowOutcome> {
        let coordinate = geolocator.current_position().await?;
        let place = self.geocoder.reverse_geocode(coordinate).await?;
        let timestamp = self.formatter.format_date(&(self.clock)());

        let labelled = self
            .apply(ticket, |view| {
                view.set_text(Region::Place, place.city());
                view.set_text(Region::Timestamp, &timestamp);
            })
            .await;
        if !labelled {
            return Ok(FlowOutcome::Superseded);
        }
        self.transition(ticket, PageState::PlaceResolved).await;

        self.fetch_and_render(ticket, coordinate).await
    }

    async fn search_chain(&self, ticket: u64, query: &str) -> Result<FlowOutcome> {
        // The geocoder puts the query into the URL path verbatim.
        let encoded = urlencoding::encode(query);
        let coordinate = self
            .geocoder
            .geocode(&encoded)
            .await
            .map_err(|err| match err {
                WeatherPageError::NoResults { .. } => WeatherPageError::no_results(query),
                other => other,
            })?;

        let label = capitalize_label(query);
        if !self
            .apply(ticket, |view| view.set_text(Region::Place, &label))
            .await
        {
            return Ok(FlowOutcome::Superseded);
        }
        self.transition(ticket, PageState::PlaceResolved).await;

        self.fetch_and_render(ticket, coordinate).await
    }

    async fn fetch_and_render(&self, ticket: u64, coordinate: Coordinate) -> Result<FlowOutcome> {
        self.transition(ticket, PageState::WeatherPending).await;
        let snapshot = self.weather.get_weather(coordinate, self.units).await?;

        let Some(mut view) = self.lock_if_current(ticket).await else {
            return Ok(FlowOutcome::Superseded);
        };
        render_stats(&mut *view, &snapshot, &self.formatter);
        render_temp(&mut *view, &snapshot, &self.formatter);
        view.clear(Region::Notice);
        // panels and snapshot change together under one view lock
        *self.last_snapshot.lock().await = Some(snapshot);
        Ok(FlowOutcome::Rendered)
    }

    async fn finish(&self, ticket: u64, result: Result<FlowOutcome>) -> Result<FlowOutcome> {
        match result {
            Ok(FlowOutcome::Rendered) => {
                self.transition(ticket, PageState::Rendered).await;
                info!(ticket, "Weather rendered");
                Ok(FlowOutcome::Rendered)
            }
            Ok(outcome) => {
                debug!(ticket, ?outcome, "Flow ended without rendering");
                Ok(outcome)
            }
            Err(err) => {
                error!(ticket, kind = ?err.kind(), "{}", err);
                let reason = FailureReason::from(&err);
                let shown = self
                    .apply(ticket, |view| view.set_text(Region::Notice, &reason.message))
                    .await;
                if !shown {
                    return Ok(FlowOutcome::Superseded);
                }
                self.transition(ticket, PageState::Failed(reason)).await;
                Err(err)
            }
        }
    }

    fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        match self.policy {
            SequencePolicy::Naive => true,
            SequencePolicy::LatestSubmission => self.latest.load(Ordering::SeqCst) == ticket,
        }
    }

    async fn transition(&self, ticket: u64, next: PageState) {
        let mut state = self.state.lock().await;
        if self.is_current(ticket) {
            debug!(ticket, ?next, "State transition");
            *state = next;
        }
    }

    /// The view, locked, if `ticket` may still write to it
    async fn lock_if_current(&self, ticket: u64) -> Option<MutexGuard<'_, V>> {
        let view = self.view.lock().await;
        if !self.is_current(ticket) {
            debug!(ticket, "Discarding results of a superseded request");
            return None;
        }
        Some(view)
    }

    /// Write to the view if `ticket` may still do so
    async fn apply(&self, ticket: u64, update: impl FnOnce(&mut V)) -> bool {
        match self.lock_if_current(ticket).await {
            Some(mut view) => {
                update(&mut view);
                true
            }
            None => false,
        }
    }
}
