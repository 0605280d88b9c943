//! The create-flow: validate, fetch, aggregate, persist.

use tracing::info;

use crate::{
    aggregate::daily_summaries,
    error::{Error, Result},
    location::{LocationSpec, confirm_location},
    model::{DailyWeather, Units},
    provider::WeatherProvider,
    store::WeatherStore,
    validate::DateRange,
};

/// One persisted day of a create-flow.
#[derive(Debug, Clone)]
pub struct CreatedDay {
    pub id: i64,
    pub day: DailyWeather,
}

/// Result of a successful create-flow.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// Canonical "City, CountryCode" the location resolved to.
    pub location_name: String,
    pub created: Vec<CreatedDay>,
}

/// Run the full create-flow: confirm the location, fetch the forecast,
/// collapse it to daily summaries and persist one record per covered day.
///
/// All validation and both provider calls happen before the first write, so
/// a failure leaves the store untouched. Multi-day creates suffix the label
/// with "- Day N".
pub async fn create_records(
    provider: &dyn WeatherProvider,
    store: &WeatherStore,
    units: Units,
    label: &str,
    location: &LocationSpec,
    range: &DateRange,
) -> Result<CreateOutcome> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::InvalidInput("Label cannot be empty".to_string()));
    }

    let location_name = confirm_location(provider, location, units).await?;
    info!(%location, %location_name, "location confirmed");

    let forecast = provider.forecast(location, units).await?;
    let days = daily_summaries(
        &forecast.samples,
        range.start(),
        range.end(),
        forecast.timezone_offset_secs,
    );
    if days.is_empty() {
        return Err(Error::InvalidInput(
            "No forecast data available for the requested date range".to_string(),
        ));
    }

    let multi_day = days.len() > 1;
    let mut created = Vec::with_capacity(days.len());
    for (i, day) in days.into_iter().enumerate() {
        let day_label = if multi_day {
            format!("{label} - Day {}", i + 1)
        } else {
            label.to_string()
        };
        let id = store.create(&day_label, location, &day)?;
        created.push(CreatedDay { id, day });
    }

    info!(count = created.len(), %location_name, "create-flow finished");
    Ok(CreateOutcome { location_name, created })
}
