//! Weather detail for one place: current conditions plus a daily forecast.
//!
//! The two requests are tracked independently. Each navigation opens a new
//! [`DetailSession`]; responses carrying an older session are dropped.

use crate::{
    error::WeatherError,
    model::{ForecastEntry, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Forecast steps per day at OpenWeather's 3-hour resolution.
pub const ENTRIES_PER_DAY: usize = 8;

pub const WEATHER_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again.";
pub const FORECAST_ERROR_MESSAGE: &str = "Failed to fetch forecast data. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    NotStarted,
    Loading,
    Loaded(T),
    Errored(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::NotStarted
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            RequestState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies the navigation a response was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    id: u64,
    place: String,
}

impl DetailSession {
    pub fn place(&self) -> &str {
        &self.place
    }
}

/// One entry per day: every `per_day`-th step, starting with the first.
pub fn sample_daily(entries: Vec<ForecastEntry>, per_day: usize) -> Vec<ForecastEntry> {
    entries.into_iter().step_by(per_day.max(1)).collect()
}

#[derive(Debug, Default)]
pub struct WeatherDetail {
    session: Option<DetailSession>,
    next_session_id: u64,
    current: RequestState<WeatherSnapshot>,
    forecast: RequestState<Vec<ForecastEntry>>,
}

impl WeatherDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&self) -> Option<&str> {
        self.session.as_ref().map(DetailSession::place)
    }

    pub fn current(&self) -> &RequestState<WeatherSnapshot> {
        &self.current
    }

    pub fn forecast(&self) -> &RequestState<Vec<ForecastEntry>> {
        &self.forecast
    }

    /// True while either request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.current.is_loading() || self.forecast.is_loading()
    }

    /// Switch to `place`, discarding whatever was shown before.
    pub fn navigate(&mut self, place: impl Into<String>) -> DetailSession {
        let session = DetailSession {
            id: self.next_session_id,
            place: place.into(),
        };
        self.next_session_id += 1;
        self.session = Some(session.clone());
        self.current = RequestState::Loading;
        self.forecast = RequestState::Loading;
        session
    }

    /// Leave the detail view. Late responses are discarded.
    pub fn leave(&mut self) {
        self.session = None;
        self.current = RequestState::NotStarted;
        self.forecast = RequestState::NotStarted;
    }

    fn is_current(&self, session: &DetailSession) -> bool {
        if self.session.as_ref() == Some(session) {
            return true;
        }
        tracing::debug!(place = session.place(), "discarding stale weather response");
        false
    }

    pub fn apply_current(
        &mut self,
        session: &DetailSession,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.current = match result {
            Ok(snapshot) => RequestState::Loaded(snapshot),
            Err(err) => {
                tracing::warn!(place = session.place(), error = %err, "current weather request failed");
                RequestState::Errored(WEATHER_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn apply_forecast(
        &mut self,
        session: &DetailSession,
        result: Result<Vec<ForecastEntry>, WeatherError>,
    ) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.forecast = match result {
            Ok(entries) => RequestState::Loaded(sample_daily(entries, ENTRIES_PER_DAY)),
            Err(err) => {
                tracing::warn!(place = session.place(), error = %err, "forecast request failed");
                RequestState::Errored(FORECAST_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    /// Navigate to `place` and run both requests concurrently.
    pub async fn fetch(&mut self, provider: &dyn WeatherProvider, place: &str) {
        let session = self.navigate(place);
        let (current, forecast) = tokio::join!(provider.current(place), provider.forecast(place));
        self.apply_current(&session, current);
        self.apply_forecast(&session, forecast);
    }
}
