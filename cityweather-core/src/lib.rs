//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - The city catalog client and the incremental, searchable city loader
//! - The weather provider abstraction and the per-place weather detail state
//! - Display helpers (temperature units, dates, condition assets) and routes
//! - Configuration & credentials handling
//!
//! It is used by `cityweather-cli`, but holds no terminal code and can be
//! reused by other front-ends.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod format;
pub mod loader;
pub mod model;
pub mod provider;
pub mod route;

pub use catalog::{CityCatalog, OpenDataSoftCatalog, PageRequest};
pub use config::Config;
pub use detail::{RequestState, WeatherDetail};
pub use error::{CatalogError, WeatherError};
pub use loader::{CityLoader, LoadState};
pub use model::{CityRecord, ConditionKind, ForecastEntry, SortDirection, SortKey, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use route::Route;
