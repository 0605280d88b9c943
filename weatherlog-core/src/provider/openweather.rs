use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    aggregate::{LOCAL_TIME_FORMAT, local_naive},
    config::Config,
    error::{Error, Result},
    location::LocationSpec,
    model::{CurrentWeather, Forecast, RawForecastSample, Units},
};

use super::WeatherProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CLOCK_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    weather_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, weather_url: String, forecast_url: String) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { api_key, weather_url, forecast_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key()?,
            config.weather_url.clone(),
            config.forecast_url.clone(),
        )
    }

    /// Query parameters identifying the location, keyed by its tag.
    fn location_params(location: &LocationSpec) -> Vec<(&'static str, String)> {
        match location {
            LocationSpec::City(name) => vec![("q", name.clone())],
            LocationSpec::Zip(zip) => vec![("zip", zip.clone())],
            LocationSpec::LatLon { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }

    async fn fetch(&self, url: &str, location: &LocationSpec, units: Units) -> Result<String> {
        let mut params = Self::location_params(location);
        params.push(("appid", self.api_key.clone()));
        params.push(("units", units.as_str().to_string()));

        debug!(%location, url, "querying OpenWeather");

        let res = self.http.get(url).query(&params).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(provider_error(status, &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &LocationSpec, units: Units) -> Result<CurrentWeather> {
        let body = self.fetch(&self.weather_url, location, units).await?;
        current_from_body(&body)
    }

    async fn forecast(&self, location: &LocationSpec, units: Units) -> Result<Forecast> {
        let body = self.fetch(&self.forecast_url, location, units).await?;
        forecast_from_body(&body)
    }
}

/// Surface the provider's own `message` field when the response carries one.
fn provider_error(status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(OwErrorBody { message: Some(message) }) => Error::Provider(message),
        _ => Error::Provider(format!("status {status}: {}", truncate_body(body))),
    }
}

fn current_from_body(body: &str) -> Result<CurrentWeather> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("unexpected current-weather payload: {e}")))?;

    let weather = parsed.weather.into_iter().next().unwrap_or_default();
    let clock = |ts: i64| match unix_to_utc(ts) {
        Some(dt) => local_naive(dt, parsed.timezone).format(CLOCK_FORMAT).to_string(),
        None => String::new(),
    };
    let local_time = match unix_to_utc(parsed.dt) {
        Some(dt) => local_naive(dt, parsed.timezone).format(LOCAL_TIME_FORMAT).to_string(),
        None => String::new(),
    };

    Ok(CurrentWeather {
        location_name: format!("{}, {}", parsed.name, parsed.sys.country),
        temp: parsed.main.temp,
        temp_min: parsed.main.temp_min,
        temp_max: parsed.main.temp_max,
        feels_like: parsed.main.feels_like,
        description: weather.description,
        icon: weather.icon,
        wind_speed: parsed.wind.speed,
        pressure: parsed.main.pressure,
        humidity: parsed.main.humidity,
        visibility: parsed.visibility,
        clouds_pct: parsed.clouds.all,
        sunrise: clock(parsed.sys.sunrise),
        sunset: clock(parsed.sys.sunset),
        local_time,
    })
}

fn forecast_from_body(body: &str) -> Result<Forecast> {
    let parsed: OwForecastResponse = serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("unexpected forecast payload: {e}")))?;

    let mut samples: Vec<RawForecastSample> = parsed
        .list
        .into_iter()
        .filter_map(|entry| {
            let timestamp = unix_to_utc(entry.dt)?;
            let weather = entry.weather.into_iter().next().unwrap_or_default();
            Some(RawForecastSample {
                timestamp,
                temp: entry.main.temp,
                feels_like: entry.main.feels_like,
                temp_min: Some(entry.main.temp_min),
                temp_max: Some(entry.main.temp_max),
                description: weather.description,
                icon: weather.icon,
                wind_speed: entry.wind.speed,
                pop: entry.pop.unwrap_or(0.0),
            })
        })
        .collect();
    samples.sort_by_key(|s| s.timestamp);

    Ok(Forecast {
        city: format!("{}, {}", parsed.city.name, parsed.city.country),
        timezone_offset_secs: parsed.city.timezone,
        samples,
    })
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    pressure: u32,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize, Default)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    visibility: Option<u32>,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_BODY: &str = r#"{
        "name": "New York",
        "dt": 1704207600,
        "timezone": -18000,
        "main": {"temp": 3.4, "feels_like": 0.1, "temp_min": 1.2, "temp_max": 5.6,
                 "pressure": 1021, "humidity": 63},
        "weather": [{"description": "scattered clouds", "icon": "03d"}],
        "wind": {"speed": 4.1},
        "clouds": {"all": 40},
        "visibility": 10000,
        "sys": {"country": "US", "sunrise": 1704198420, "sunset": 1704232080}
    }"#;

    #[test]
    fn parses_current_snapshot() {
        let current = current_from_body(CURRENT_BODY).unwrap();
        assert_eq!(current.location_name, "New York, US");
        assert_eq!(current.temp, 3.4);
        assert_eq!(current.humidity, 63);
        assert_eq!(current.visibility, Some(10000));
        assert_eq!(current.clouds_pct, 40);
        // 1704207600 UTC is 10:00 AM in UTC-5.
        assert_eq!(current.local_time, "Tue, Jan 02 10:00 AM");
        assert_eq!(current.sunrise, "07:27 AM");
    }

    #[test]
    fn parses_forecast_samples_and_metadata() {
        let body = r#"{
            "city": {"name": "New York", "country": "US", "timezone": -18000},
            "list": [
                {"dt": 1704218400,
                 "main": {"temp": 5.0, "feels_like": 2.2, "temp_min": 4.0, "temp_max": 5.5},
                 "weather": [{"description": "clear sky", "icon": "01d"}],
                 "wind": {"speed": 3.0},
                 "pop": 0.4},
                {"dt": 1704207600,
                 "main": {"temp": 3.4, "feels_like": 0.1, "temp_min": 3.0, "temp_max": 3.9},
                 "weather": [{"description": "mist", "icon": "50d"}],
                 "wind": {"speed": 2.0}}
            ]
        }"#;

        let forecast = forecast_from_body(body).unwrap();
        assert_eq!(forecast.city, "New York, US");
        assert_eq!(forecast.timezone_offset_secs, -18000);
        assert_eq!(forecast.samples.len(), 2);
        // Samples come back sorted by timestamp.
        assert_eq!(forecast.samples[0].description, "mist");
        assert_eq!(forecast.samples[0].pop, 0.0);
        assert_eq!(forecast.samples[1].pop, 0.4);
    }

    #[test]
    fn error_body_message_is_surfaced_verbatim() {
        let err = provider_error(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"cod": "404", "message": "city not found"}"#,
        );
        assert!(err.to_string().contains("city not found"));
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let err = provider_error(reqwest::StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn malformed_payload_is_a_provider_error() {
        let err = current_from_body(r#"{"name": "X"}"#).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }
}
