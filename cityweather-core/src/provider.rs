use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{ForecastEntry, WeatherSnapshot},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of current conditions and forecasts for a place name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, place: &str) -> Result<WeatherSnapshot, WeatherError>;

    /// The full forecast series at the provider's native step.
    async fn forecast(&self, place: &str) -> Result<Vec<ForecastEntry>, WeatherError>;
}
