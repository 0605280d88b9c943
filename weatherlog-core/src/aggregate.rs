//! Collapses fixed-interval forecast samples into one summary per day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::model::{DailyWeather, RawForecastSample};

/// Hard cap on emitted summaries, independent of the requested range.
pub const MAX_DAILY_ENTRIES: usize = 7;

pub(crate) const LOCAL_TIME_FORMAT: &str = "%a, %b %d %I:%M %p";

/// Shift a UTC timestamp into the location's wall clock.
pub(crate) fn local_naive(ts: DateTime<Utc>, offset_secs: i32) -> NaiveDateTime {
    (ts + Duration::seconds(i64::from(offset_secs))).naive_utc()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Reduce `samples` to at most one [`DailyWeather`] per calendar date in
/// `[start, end]`, chronologically ordered.
///
/// Grouping is by the sample's *local* calendar date under
/// `timezone_offset_secs`. Dates with no samples are skipped. Per day, the
/// representative sample is the one whose local hour is closest to 12:00,
/// ties broken by earliest timestamp; min/max temperatures span all of the
/// day's samples, every other field comes from the representative alone.
pub fn daily_summaries(
    samples: &[RawForecastSample],
    start: NaiveDate,
    end: NaiveDate,
    timezone_offset_secs: i32,
) -> Vec<DailyWeather> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&RawForecastSample>> = BTreeMap::new();
    for sample in samples {
        let date = local_naive(sample.timestamp, timezone_offset_secs).date();
        by_date.entry(date).or_default().push(sample);
    }

    let mut days = Vec::new();
    let mut date = start;
    while date <= end && days.len() < MAX_DAILY_ENTRIES {
        if let Some(group) = by_date.get(&date) {
            days.push(summarize_day(date, group, timezone_offset_secs));
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    days
}

fn summarize_day(
    date: NaiveDate,
    group: &[&RawForecastSample],
    timezone_offset_secs: i32,
) -> DailyWeather {
    let representative = group
        .iter()
        .min_by_key(|s| {
            let hour = local_naive(s.timestamp, timezone_offset_secs).hour();
            (hour.abs_diff(12), s.timestamp)
        })
        .copied()
        .expect("date groups are never empty");

    let temp_min = group.iter().map(|s| s.temp).fold(f64::INFINITY, f64::min);
    let temp_max = group.iter().map(|s| s.temp).fold(f64::NEG_INFINITY, f64::max);

    let local = local_naive(representative.timestamp, timezone_offset_secs);

    DailyWeather {
        date,
        temp: round1(representative.temp),
        temp_min: round1(temp_min),
        temp_max: round1(temp_max),
        feels_like: round1(representative.feels_like),
        description: representative.description.clone(),
        icon: representative.icon.clone(),
        wind_speed: round1(representative.wind_speed),
        pop: ((representative.pop * 100.0).round() as u8).min(100),
        local_time: local.format(LOCAL_TIME_FORMAT).to_string(),
    }
}
