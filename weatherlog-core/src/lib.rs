//! Core library for the `weatherlog` forecast journal.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location and date-range validation
//! - The OpenWeather provider client and its abstraction
//! - Daily aggregation of raw forecast samples
//! - The SQLite record store and JSON/CSV export
//!
//! It is used by `weatherlog-cli`, but can also be reused by other binaries
//! or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod validate;

pub use aggregate::{MAX_DAILY_ENTRIES, daily_summaries};
pub use config::Config;
pub use error::{Error, Result};
pub use export::Exporter;
pub use location::{LocationKind, LocationSpec, confirm_location};
pub use model::{CurrentWeather, DailyWeather, Forecast, RawForecastSample, Units, WeatherRecord};
pub use pipeline::{CreateOutcome, CreatedDay, create_records};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use store::WeatherStore;
pub use validate::{DateRange, FORECAST_HORIZON_DAYS, parse_date, validate_date};
