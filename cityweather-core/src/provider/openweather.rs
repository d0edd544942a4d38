use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{WeatherError, truncate_body},
    model::{ConditionKind, ForecastEntry, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OpenWeather over its free `weather` and `forecast` endpoints.
///
/// Values are requested in the API's default units, so temperatures are Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, http: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into(),
            http,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        place: &str,
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);

        tracing::debug!(%url, place, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&[("q", place), ("appid", api_key)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    weather: Vec<OwCondition>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: Option<String>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwCondition>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Option<Vec<OwForecastEntry>>,
}

fn condition_of(weather: &[OwCondition]) -> (ConditionKind, Option<String>) {
    match weather.first() {
        Some(w) => (
            w.main.as_deref().map(ConditionKind::from_tag).unwrap_or_default(),
            w.description.clone(),
        ),
        None => (ConditionKind::Unknown, None),
    }
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let main = parsed.main.ok_or(WeatherError::MissingField("main"))?;
        let (condition, description) = condition_of(&parsed.weather);

        Ok(WeatherSnapshot {
            condition,
            description,
            temp_k: main.temp.ok_or(WeatherError::MissingField("main.temp"))?,
            temp_min_k: main.temp_min.ok_or(WeatherError::MissingField("main.temp_min"))?,
            temp_max_k: main.temp_max.ok_or(WeatherError::MissingField("main.temp_max"))?,
            humidity_pct: main.humidity,
            pressure_hpa: main.pressure,
            wind_speed_mps: parsed.wind.and_then(|w| w.speed),
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let timestamp = entry
            .dt_txt
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, DT_TXT_FORMAT).ok())
            .ok_or(WeatherError::MissingField("list[].dt_txt"))?;
        let main = entry.main.ok_or(WeatherError::MissingField("list[].main"))?;
        let (condition, description) = condition_of(&entry.weather);

        Ok(ForecastEntry {
            timestamp,
            condition,
            description,
            temp_k: main.temp.ok_or(WeatherError::MissingField("list[].main.temp"))?,
            temp_min_k: main.temp_min,
            temp_max_k: main.temp_max,
            pop: entry.pop,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, place: &str) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", place).await?;
        WeatherSnapshot::try_from(parsed)
    }

    async fn forecast(&self, place: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", place).await?;
        parsed
            .list
            .ok_or(WeatherError::MissingField("list"))?
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect()
    }
}
