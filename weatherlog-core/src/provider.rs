use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::Result,
    location::LocationSpec,
    model::{CurrentWeather, Forecast, Units},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// The external forecast/current-weather source pair.
///
/// Both calls block the flow they run in; a failure aborts the caller's
/// operation and is never retried.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// One current-conditions snapshot for the location.
    async fn current(&self, location: &LocationSpec, units: Units) -> Result<CurrentWeather>;

    /// Ordered fixed-interval samples over the provider's forecast horizon.
    async fn forecast(&self, location: &LocationSpec, units: Units) -> Result<Forecast>;
}

/// Construct the provider from config (API key, base URLs).
pub fn provider_from_config(config: &Config) -> Result<OpenWeatherProvider> {
    OpenWeatherProvider::from_config(config)
}
