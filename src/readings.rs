//! Argument bundles for the insight and alert generators.
//!
//! Each generator reads a handful of optional inputs. Callers fill the
//! fields they have and leave the rest to `Default`, so a generator can be
//! driven from the full unified record or from one scope of it.

use serde::Serialize;

use crate::classify::Terrain;
use crate::model::UnifiedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureReading {
    pub temp: Option<f64>,
    pub feels: Option<f64>,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub avg_temp: Option<f64>,
    pub avg_temp_hour: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RainReading {
    pub rain: Option<f64>,
    pub rain_prob: Option<f64>,
    pub avg_rain: Option<f64>,
    pub avg_rain_hour: Option<f64>,
    pub rain_total_day: Option<f64>,
    pub gust: Option<f64>,
    pub terrain: Terrain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindReading {
    pub speed: Option<f64>,
    pub gust: Option<f64>,
    pub avg_speed: Option<f64>,
    pub direction: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolarUvReading {
    pub solar: Option<f64>,
    pub avg_solar: Option<f64>,
    pub uv: Option<f64>,
    pub avg_uv: Option<f64>,
    pub uv_max_day: Option<f64>,
}

/// Instantaneous slice of the unified record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CurrentScope {
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub avg_temperature_hourly: Option<f64>,
    pub rain: Option<f64>,
    pub rain_prob: Option<f64>,
    pub avg_precipitation_hourly: Option<f64>,
    pub wind_speed: Option<f64>,
    pub gust: Option<f64>,
    pub wind_direction: Option<f64>,
    pub cloudcover: Option<f64>,
    pub dewpoint: Option<f64>,
    pub visibility: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub solar: Option<f64>,
    pub uv: Option<f64>,
    pub uv_max_day: Option<f64>,
    #[serde(skip)]
    pub terrain: Terrain,
}

impl CurrentScope {
    pub fn from_unified(u: &UnifiedRecord, terrain: Terrain) -> Self {
        Self {
            temperature: u.temperature_now,
            apparent_temperature: u.apparent_temperature_now,
            avg_temperature_hourly: u.temperature_hourly,
            rain: u.precipitation_now,
            rain_prob: u.precipitation_probability_now,
            avg_precipitation_hourly: u.precipitation_hourly,
            wind_speed: u.wind_speed_now,
            gust: u.gust_now,
            wind_direction: u.wind_direction_now,
            cloudcover: u.cloudcover_now,
            dewpoint: u.dewpoint_now,
            visibility: u.visibility_now,
            humidity: u.humidity_now,
            pressure: u.pressure_now,
            solar: u.solar_radiation_now,
            uv: u.uv_index_now,
            uv_max_day: u.uv_index_max_day,
            terrain,
        }
    }
}

/// Whole-day slice of the unified record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverviewScope {
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub rain_prob_day: Option<f64>,
    pub rain_total_day: Option<f64>,
    pub avg_rain: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub cloudcover_mean: Option<f64>,
    pub dewpoint_mean: Option<f64>,
    pub visibility: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_solar: Option<f64>,
    pub avg_uv: Option<f64>,
    pub uv_max_day: Option<f64>,
    #[serde(skip)]
    pub terrain: Terrain,
}

impl OverviewScope {
    pub fn from_unified(u: &UnifiedRecord, terrain: Terrain) -> Self {
        Self {
            tmin: u.temperature_min_day,
            tmax: u.temperature_max_day,
            avg_temperature: u.temperature_day,
            avg_wind_speed: u.wind_speed_hourly,
            rain_prob_day: u.precipitation_probability_day,
            rain_total_day: u.precipitation_sum_day,
            avg_rain: u.precipitation_hourly,
            avg_humidity: u.humidity_day,
            cloudcover_mean: u.cloudcover_mean,
            dewpoint_mean: u.dewpoint_mean,
            visibility: u.visibility_day.or(u.visibility_hourly),
            avg_pressure: u.pressure_day,
            avg_solar: u.solar_radiation_hourly,
            avg_uv: u.uv_index_hourly,
            uv_max_day: u.uv_index_max_day,
            terrain,
        }
    }
}
