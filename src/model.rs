//! Provider-shaped forecast data and the flat unified record.
//!
//! `ForecastTriple` is what a weather source hands over after normalizing
//! its wire format. `UnifiedRecord` is the flattened view every classifier,
//! insight and alert generator reads. [`map_to_unified`] is the only place
//! that knows how one becomes the other.

use serde::Serialize;

use crate::normalize::{mean, round1};

/* ============================ Provider triple ============================ */

/// Instantaneous conditions at the current hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub gust: Option<f64>,
    pub wind_direction: Option<f64>,
    pub precipitation: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub uv_index: Option<f64>,
    pub cloudcover: Option<f64>,
    pub dewpoint: Option<f64>,
    /// Metres.
    pub visibility: Option<f64>,
    /// WMO weather interpretation code.
    pub status_code: Option<i64>,
}

/// Parallel hourly arrays; the same index is the same hour in every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub apparent_temperature: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_gusts_10m: Vec<Option<f64>>,
    pub winddirection_10m: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
    pub pressure_msl: Vec<Option<f64>>,
    pub shortwave_radiation: Vec<Option<f64>>,
    pub uv_index: Vec<Option<f64>>,
    pub cloudcover: Vec<Option<f64>>,
    pub dewpoint_2m: Vec<Option<f64>>,
    pub visibility: Vec<Option<f64>>,
}

impl HourlySeries {
    /// Entries of `column` whose timestamp starts with `date_prefix`.
    /// Missing readings count as `0.0`, matching how daily totals are built.
    pub fn entries_on(&self, column: &[Option<f64>], date_prefix: &str) -> Vec<f64> {
        self.time
            .iter()
            .zip(column)
            .filter(|(t, _)| t.starts_with(date_prefix))
            .map(|(_, v)| v.unwrap_or(0.0))
            .collect()
    }

    /// Number of hours in the series that fall on `date_prefix`.
    pub fn hours_on(&self, date_prefix: &str) -> usize {
        self.time
            .iter()
            .filter(|t| t.get(..10).is_some_and(|d| d == date_prefix))
            .count()
    }

    /// Value of `column` at the hour whose timestamp equals `key` exactly.
    pub fn value_at(&self, column: &[Option<f64>], key: &str) -> Option<f64> {
        let idx = self.time.iter().position(|t| t == key)?;
        column.get(idx).copied().flatten()
    }
}

/// Running means over the whole hourly series, plus the series itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyAggregates {
    pub avg_temperature: Option<f64>,
    pub avg_apparent_temperature: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub avg_gust: Option<f64>,
    pub avg_precipitation: Option<f64>,
    pub avg_precipitation_probability: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_solar_radiation: Option<f64>,
    pub avg_uv_index: Option<f64>,
    pub avg_cloudcover: Option<f64>,
    pub avg_dewpoint: Option<f64>,
    pub avg_visibility: Option<f64>,
    pub series: HourlySeries,
}

impl HourlyAggregates {
    /// Derives every running mean from `series`.
    pub fn from_series(series: HourlySeries) -> Self {
        let avg = |col: &[Option<f64>]| round1(mean(col.iter().copied()));
        Self {
            avg_temperature: avg(&series.temperature_2m),
            avg_apparent_temperature: avg(&series.apparent_temperature),
            avg_wind_speed: avg(&series.wind_speed_10m),
            avg_gust: avg(&series.wind_gusts_10m),
            avg_precipitation: avg(&series.precipitation),
            avg_precipitation_probability: avg(&series.precipitation_probability),
            avg_humidity: avg(&series.relative_humidity_2m),
            avg_pressure: avg(&series.pressure_msl),
            avg_solar_radiation: avg(&series.shortwave_radiation),
            avg_uv_index: avg(&series.uv_index),
            avg_cloudcover: avg(&series.cloudcover),
            avg_dewpoint: avg(&series.dewpoint_2m),
            avg_visibility: avg(&series.visibility),
            series,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_mean: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub precipitation_probability_mean: Vec<Option<f64>>,
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
    pub pressure_msl_mean: Vec<Option<f64>>,
    pub shortwave_radiation_sum: Vec<Option<f64>>,
    pub uv_index_max: Vec<Option<f64>>,
    pub cloudcover_mean: Vec<Option<f64>>,
    pub dewpoint_2m_mean: Vec<Option<f64>>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
}

/// Today's daily aggregates (first element of each daily array).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyAggregates {
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub solar_radiation_sum: Option<f64>,
    pub uv_index_max: Option<f64>,
    pub cloudcover_mean: Option<f64>,
    pub dewpoint_mean: Option<f64>,
    pub visibility: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub series: DailySeries,
}

/// One upstream response: current, hourly and daily scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTriple {
    pub current: CurrentConditions,
    pub hourly: HourlyAggregates,
    pub daily: DailyAggregates,
}

/* ============================ Unified record ============================ */

/// Flat view keyed by scope suffix: `_now` instantaneous, `_hourly` running
/// hourly mean, `_day`/`_mean` daily aggregate. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnifiedRecord {
    pub temperature_now: Option<f64>,
    pub apparent_temperature_now: Option<f64>,
    pub humidity_now: Option<f64>,
    pub pressure_now: Option<f64>,
    pub wind_speed_now: Option<f64>,
    pub gust_now: Option<f64>,
    pub wind_direction_now: Option<f64>,
    pub solar_radiation_now: Option<f64>,
    pub uv_index_now: Option<f64>,
    pub precipitation_now: Option<f64>,
    pub precipitation_probability_now: Option<f64>,
    pub cloudcover_now: Option<f64>,
    pub dewpoint_now: Option<f64>,
    pub visibility_now: Option<f64>,
    pub status_code_now: Option<i64>,

    pub temperature_hourly: Option<f64>,
    pub apparent_temperature_hourly: Option<f64>,
    pub humidity_hourly: Option<f64>,
    pub pressure_hourly: Option<f64>,
    pub wind_speed_hourly: Option<f64>,
    pub gust_hourly: Option<f64>,
    pub precipitation_hourly: Option<f64>,
    pub precipitation_probability_hourly: Option<f64>,
    pub uv_index_hourly: Option<f64>,
    pub solar_radiation_hourly: Option<f64>,
    pub cloudcover_hourly: Option<f64>,
    pub dewpoint_hourly: Option<f64>,
    pub visibility_hourly: Option<f64>,

    pub temperature_min_day: Option<f64>,
    pub temperature_max_day: Option<f64>,
    pub temperature_day: Option<f64>,
    pub precipitation_sum_day: Option<f64>,
    pub precipitation_probability_day: Option<f64>,
    pub humidity_day: Option<f64>,
    pub pressure_day: Option<f64>,
    pub solar_radiation_sum_day: Option<f64>,
    pub uv_index_max_day: Option<f64>,
    pub cloudcover_mean: Option<f64>,
    pub dewpoint_mean: Option<f64>,
    pub visibility_day: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,

    pub hourly_series: HourlySeries,
}

/// The rename table: each unified field has exactly one provider source.
pub fn map_to_unified(triple: &ForecastTriple) -> UnifiedRecord {
    let ForecastTriple { current: c, hourly: h, daily: d } = triple;
    UnifiedRecord {
        temperature_now: c.temperature,
        apparent_temperature_now: c.apparent_temperature,
        humidity_now: c.humidity,
        pressure_now: c.pressure,
        wind_speed_now: c.wind_speed,
        gust_now: c.gust,
        wind_direction_now: c.wind_direction,
        solar_radiation_now: c.solar_radiation,
        uv_index_now: c.uv_index,
        precipitation_now: c.precipitation,
        precipitation_probability_now: c.precipitation_probability,
        cloudcover_now: c.cloudcover,
        dewpoint_now: c.dewpoint,
        visibility_now: c.visibility,
        status_code_now: c.status_code,

        temperature_hourly: h.avg_temperature,
        apparent_temperature_hourly: h.avg_apparent_temperature,
        humidity_hourly: h.avg_humidity,
        pressure_hourly: h.avg_pressure,
        wind_speed_hourly: h.avg_wind_speed,
        gust_hourly: h.avg_gust,
        precipitation_hourly: h.avg_precipitation,
        precipitation_probability_hourly: h.avg_precipitation_probability,
        uv_index_hourly: h.avg_uv_index,
        solar_radiation_hourly: h.avg_solar_radiation,
        cloudcover_hourly: h.avg_cloudcover,
        dewpoint_hourly: h.avg_dewpoint,
        visibility_hourly: h.avg_visibility,

        temperature_min_day: d.temperature_min,
        temperature_max_day: d.temperature_max,
        temperature_day: d.avg_temperature,
        precipitation_sum_day: d.precipitation_sum,
        precipitation_probability_day: d.precipitation_probability,
        humidity_day: d.avg_humidity,
        pressure_day: d.avg_pressure,
        solar_radiation_sum_day: d.solar_radiation_sum,
        uv_index_max_day: d.uv_index_max,
        cloudcover_mean: d.cloudcover_mean,
        dewpoint_mean: d.dewpoint_mean,
        visibility_day: d.visibility,
        sunrise: d.sunrise.clone(),
        sunset: d.sunset.clone(),

        hourly_series: h.series.clone(),
    }
}
