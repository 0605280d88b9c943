use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::location::LocationKind;

/// Unit system forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = crate::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(crate::Error::InvalidInput(format!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            ))),
        }
    }
}

/// One fixed-interval (~3 h) forecast entry as returned by the provider.
/// Transient: lives only for the duration of a single create-flow.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    /// Precipitation probability, 0.0..=1.0.
    pub pop: f64,
}

/// Full forecast response: ordered samples plus the response-wide metadata
/// needed to localize them.
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Canonical "City, CountryCode" reported by the provider.
    pub city: String,
    /// Offset from UTC, in seconds, for the queried location.
    pub timezone_offset_secs: i32,
    pub samples: Vec<RawForecastSample>,
}

/// One calendar day collapsed from that day's raw samples.
///
/// Never persisted directly; folded into a [`WeatherRecord`] by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    /// Temperature of the representative sample.
    pub temp: f64,
    /// Minimum over all of the day's samples.
    pub temp_min: f64,
    /// Maximum over all of the day's samples.
    pub temp_max: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    /// Precipitation probability of the representative sample, in percent.
    pub pop: u8,
    /// Representative sample's timestamp rendered in the location's
    /// local time, e.g. "Tue, Jan 02 03:00 PM".
    pub local_time: String,
}

/// A persisted daily summary. One record covers exactly one day, so
/// `start_date == end_date` always holds in the current scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub label: String,
    pub location_type: LocationKind,
    /// Normalized location string, e.g. "10001,US" or "40.7128,-74.006".
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub pop: u8,
    pub local_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Current-conditions snapshot, used by the location resolver to confirm a
/// place exists and by the instant-lookup view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Canonical "City, CountryCode".
    pub location_name: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub pressure: u32,
    pub humidity: u8,
    /// Meters; the provider omits it in some regions.
    pub visibility: Option<u32>,
    pub clouds_pct: u8,
    pub sunrise: String,
    pub sunset: String,
    pub local_time: String,
}
