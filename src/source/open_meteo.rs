//! Open-Meteo forecast client and wire-format normalization.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::WeatherSource;
use super::cache::TtlCache;
use crate::clock::parse_naive;
use crate::config::OpenMeteoConfig;
use crate::error::SourceError;
use crate::model::{
    CurrentConditions, DailyAggregates, DailySeries, ForecastTriple, HourlyAggregates, HourlySeries,
};
use crate::normalize::{round1, to_float};

const HOURLY_FIELDS: &str = "temperature_2m,apparent_temperature,precipitation,\
precipitation_probability,wind_speed_10m,wind_gusts_10m,winddirection_10m,\
relative_humidity_2m,pressure_msl,shortwave_radiation,uv_index,cloudcover,dewpoint_2m,visibility";

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
precipitation_sum,precipitation_probability_mean,relative_humidity_2m_mean,pressure_msl_mean,\
shortwave_radiation_sum,uv_index_max,sunrise,sunset,cloudcover_mean,dewpoint_2m_mean";

/* ============================ Wire types ============================ */

// Leaves stay as `Value` so a malformed field degrades to `None` instead of
// failing the whole document.

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RawForecast {
    pub current_weather: Option<RawCurrentWeather>,
    pub hourly: Option<RawHourly>,
    pub daily: Option<RawDaily>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RawCurrentWeather {
    pub temperature: Value,
    pub windspeed: Value,
    pub windgusts: Value,
    pub winddirection: Value,
    pub weathercode: Value,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RawHourly {
    pub time: Value,
    pub temperature_2m: Value,
    pub apparent_temperature: Value,
    pub precipitation: Value,
    pub precipitation_probability: Value,
    pub wind_speed_10m: Value,
    pub wind_gusts_10m: Value,
    pub winddirection_10m: Value,
    pub relative_humidity_2m: Value,
    pub pressure_msl: Value,
    pub shortwave_radiation: Value,
    pub uv_index: Value,
    pub cloudcover: Value,
    pub dewpoint_2m: Value,
    pub visibility: Value,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RawDaily {
    pub time: Value,
    pub temperature_2m_max: Value,
    pub temperature_2m_min: Value,
    pub temperature_2m_mean: Value,
    pub precipitation_sum: Value,
    pub precipitation_probability_mean: Value,
    pub relative_humidity_2m_mean: Value,
    pub pressure_msl_mean: Value,
    pub shortwave_radiation_sum: Value,
    pub uv_index_max: Value,
    pub sunrise: Value,
    pub sunset: Value,
    pub cloudcover_mean: Value,
    pub dewpoint_2m_mean: Value,
    pub visibility: Value,
}

/* ============================ Normalization ============================ */

fn column(v: &Value) -> Vec<Option<f64>> {
    v.as_array()
        .map(|items| items.iter().map(to_float).collect())
        .unwrap_or_default()
}

fn texts(v: &Value) -> Vec<Option<String>> {
    v.as_array()
        .map(|items| items.iter().map(|x| x.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

/// First element of a daily array (a bare scalar is accepted too).
fn first(v: &Value) -> Option<f64> {
    let leaf = match v {
        Value::Array(items) => items.first()?,
        other => other,
    };
    round1(to_float(leaf))
}

fn first_text(v: &Value) -> Option<String> {
    match v {
        Value::Array(items) => items.first()?.as_str().map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Index of the hourly slot for `now`. Series timestamps are naive UTC:
/// an exact match on the current UTC hour wins, otherwise the closest
/// parseable entry.
pub fn nearest_hour_index(times: &[String], now: &DateTime<FixedOffset>) -> Option<usize> {
    let hour: NaiveDateTime = now
        .with_timezone(&Utc)
        .naive_utc()
        .with_minute(0)?
        .with_second(0)?
        .with_nanosecond(0)?;
    let key = hour.format("%Y-%m-%dT%H:%M").to_string();

    if let Some(i) = times.iter().position(|t| *t == key) {
        return Some(i);
    }
    times
        .iter()
        .enumerate()
        .filter_map(|(i, t)| parse_naive(t).map(|dt| (i, (dt - hour).num_seconds().abs())))
        .min_by_key(|(_, distance)| *distance)
        .map(|(i, _)| i)
}

fn hourly_series(h: &RawHourly) -> HourlySeries {
    HourlySeries {
        time: texts(&h.time).into_iter().map(Option::unwrap_or_default).collect(),
        temperature_2m: column(&h.temperature_2m),
        apparent_temperature: column(&h.apparent_temperature),
        wind_speed_10m: column(&h.wind_speed_10m),
        wind_gusts_10m: column(&h.wind_gusts_10m),
        winddirection_10m: column(&h.winddirection_10m),
        precipitation: column(&h.precipitation),
        precipitation_probability: column(&h.precipitation_probability),
        relative_humidity_2m: column(&h.relative_humidity_2m),
        pressure_msl: column(&h.pressure_msl),
        shortwave_radiation: column(&h.shortwave_radiation),
        uv_index: column(&h.uv_index),
        cloudcover: column(&h.cloudcover),
        dewpoint_2m: column(&h.dewpoint_2m),
        visibility: column(&h.visibility),
    }
}

/// Turns one Open-Meteo response into the provider triple.
pub fn normalize_response(raw: &RawForecast, now: &DateTime<FixedOffset>) -> ForecastTriple {
    let cw = raw.current_weather.clone().unwrap_or_default();
    let h = raw.hourly.clone().unwrap_or_default();
    let d = raw.daily.clone().unwrap_or_default();

    let series = hourly_series(&h);
    let idx = nearest_hour_index(&series.time, now);
    debug!(?idx, hours = series.time.len(), "selected current hourly index");
    let at = |col: &[Option<f64>]| round1(idx.and_then(|i| col.get(i).copied().flatten()));

    let wind_speed = to_float(&cw.windspeed);
    let current = CurrentConditions {
        temperature: round1(to_float(&cw.temperature)),
        apparent_temperature: at(&series.apparent_temperature),
        wind_speed: round1(wind_speed),
        gust: round1(to_float(&cw.windgusts).or(wind_speed)),
        wind_direction: round1(to_float(&cw.winddirection)),
        precipitation: at(&series.precipitation),
        precipitation_probability: at(&series.precipitation_probability),
        humidity: at(&series.relative_humidity_2m),
        pressure: at(&series.pressure_msl),
        solar_radiation: at(&series.shortwave_radiation),
        uv_index: at(&series.uv_index),
        cloudcover: at(&series.cloudcover),
        dewpoint: at(&series.dewpoint_2m),
        visibility: at(&series.visibility),
        status_code: to_float(&cw.weathercode).map(|c| c.round() as i64),
    };

    // Daily total falls back, only when missing, to the first day's hourly entries.
    let first_day = first_text(&d.time).unwrap_or_default();
    let precipitation_sum = first(&d.precipitation_sum).or_else(|| {
        if series.precipitation.is_empty() {
            return None;
        }
        let day_prefix = first_day.get(..10).unwrap_or(&first_day);
        round1(Some(series.entries_on(&series.precipitation, day_prefix).iter().sum::<f64>()))
    });

    let daily = DailyAggregates {
        temperature_min: first(&d.temperature_2m_min),
        temperature_max: first(&d.temperature_2m_max),
        avg_temperature: first(&d.temperature_2m_mean),
        precipitation_sum,
        precipitation_probability: first(&d.precipitation_probability_mean),
        avg_humidity: first(&d.relative_humidity_2m_mean),
        avg_pressure: first(&d.pressure_msl_mean),
        solar_radiation_sum: first(&d.shortwave_radiation_sum),
        uv_index_max: first(&d.uv_index_max),
        cloudcover_mean: first(&d.cloudcover_mean),
        dewpoint_mean: first(&d.dewpoint_2m_mean),
        visibility: first(&d.visibility),
        sunrise: first_text(&d.sunrise),
        sunset: first_text(&d.sunset),
        series: DailySeries {
            time: texts(&d.time).into_iter().map(Option::unwrap_or_default).collect(),
            temperature_2m_min: column(&d.temperature_2m_min),
            temperature_2m_max: column(&d.temperature_2m_max),
            temperature_2m_mean: column(&d.temperature_2m_mean),
            precipitation_sum: column(&d.precipitation_sum),
            precipitation_probability_mean: column(&d.precipitation_probability_mean),
            relative_humidity_2m_mean: column(&d.relative_humidity_2m_mean),
            pressure_msl_mean: column(&d.pressure_msl_mean),
            shortwave_radiation_sum: column(&d.shortwave_radiation_sum),
            uv_index_max: column(&d.uv_index_max),
            cloudcover_mean: column(&d.cloudcover_mean),
            dewpoint_2m_mean: column(&d.dewpoint_2m_mean),
            sunrise: texts(&d.sunrise),
            sunset: texts(&d.sunset),
        },
    };

    ForecastTriple {
        current,
        hourly: HourlyAggregates::from_series(series),
        daily,
    }
}

/* ============================ HTTP ============================ */

pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, SourceError> {
    let resp = http
        .get(url)
        .header("Accept", "application/json")
        .query(query)
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Malformed(e.to_string()))
}

fn cache_key(lat: f64, lon: f64) -> String {
    format!("{lat:.4},{lon:.4}")
}

pub struct OpenMeteoClient {
    http: Client,
    config: OpenMeteoConfig,
    cache: TtlCache<RawForecast>,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig, cache: TtlCache<RawForecast>) -> Result<Self, SourceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config, cache })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    async fn fetch_raw(&self, lat: f64, lon: f64) -> Result<RawForecast, SourceError> {
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current_weather", "true".to_string()),
            ("wind_speed_unit", "ms".to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
        ];
        get_json(&self.http, &self.config.forecast_url, &query).await
    }
}

impl WeatherSource for OpenMeteoClient {
    async fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        now: DateTime<FixedOffset>,
    ) -> Result<ForecastTriple, SourceError> {
        let key = cache_key(lat, lon);
        // The raw response is cached; the current slot depends on `now`.
        let raw = match self.cache.get(&key) {
            Some(hit) => {
                debug!(%key, "forecast cache hit");
                hit
            }
            None => {
                debug!(%key, "forecast cache miss");
                info!(lat, lon, "fetching Open-Meteo forecast");
                let raw = self.fetch_raw(lat, lon).await?;
                self.cache.insert(key, raw.clone());
                raw
            }
        };

        let triple = normalize_response(&raw, &now);
        debug!(lat, lon, hours = triple.hourly.series.time.len(), "forecast normalized");
        Ok(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::vn_offset;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw(v: Value) -> RawForecast {
        serde_json::from_value(v).unwrap()
    }

    // 14:20 in Hanoi is 07:20 UTC.
    fn now() -> DateTime<FixedOffset> {
        vn_offset().with_ymd_and_hms(2025, 6, 2, 14, 20, 0).unwrap()
    }

    #[test]
    fn test_nearest_index_exact_then_closest() {
        let times: Vec<String> = ["2025-06-02T06:00", "2025-06-02T07:00", "2025-06-02T08:00"]
            .map(String::from)
            .to_vec();
        assert_eq!(nearest_hour_index(&times, &now()), Some(1));

        let sparse: Vec<String> = ["junk", "2025-06-02T03:00", "2025-06-02T09:00"]
            .map(String::from)
            .to_vec();
        assert_eq!(nearest_hour_index(&sparse, &now()), Some(2));
        assert_eq!(nearest_hour_index(&[], &now()), None);
    }

    #[test]
    fn test_current_reads_hourly_at_index_and_gust_falls_back() {
        let triple = normalize_response(
            &raw(json!({
                "current_weather": {"temperature": 33.44, "windspeed": 4.0, "winddirection": 120, "weathercode": 3},
                "hourly": {
                    "time": ["2025-06-02T06:00", "2025-06-02T07:00"],
                    "relative_humidity_2m": [70, 75],
                    "precipitation": [0.0, "1.25"],
                    "visibility": [24000, null]
                }
            })),
            &now(),
        );
        let c = &triple.current;
        assert_eq!(c.temperature, Some(33.4));
        assert_eq!(c.gust, Some(4.0));
        assert_eq!(c.humidity, Some(75.0));
        assert_eq!(c.precipitation, Some(1.3));
        assert_eq!(c.visibility, None);
        assert_eq!(c.status_code, Some(3));
        assert_eq!(triple.hourly.avg_humidity, Some(72.5));
    }

    #[test]
    fn test_garbage_leaves_degrade_to_none() {
        let triple = normalize_response(
            &raw(json!({
                "current_weather": {"temperature": "hot", "windspeed": true, "weathercode": null},
                "hourly": {"time": ["2025-06-02T07:00"], "temperature_2m": ["x"], "uv_index": {"a": 1}},
                "daily": {"temperature_2m_max": [], "uv_index_max": "abc"}
            })),
            &now(),
        );
        assert_eq!(triple.current.temperature, None);
        assert_eq!(triple.current.wind_speed, None);
        assert_eq!(triple.current.status_code, None);
        assert_eq!(triple.hourly.avg_temperature, None);
        assert!(triple.hourly.series.uv_index.is_empty());
        assert_eq!(triple.daily.temperature_max, None);
        assert_eq!(triple.daily.uv_index_max, None);
    }

    #[test]
    fn test_daily_precipitation_falls_back_only_when_missing() {
        let hourly = json!({
            "time": ["2025-06-01T23:00", "2025-06-02T00:00", "2025-06-02T01:00"],
            "precipitation": [5.0, 1.5, 2.0]
        });
        let missing = normalize_response(
            &raw(json!({"hourly": hourly, "daily": {"time": ["2025-06-02"], "precipitation_sum": [null]}})),
            &now(),
        );
        assert_eq!(missing.daily.precipitation_sum, Some(3.5));

        let zero = normalize_response(
            &raw(json!({"hourly": hourly, "daily": {"time": ["2025-06-02"], "precipitation_sum": [0.0]}})),
            &now(),
        );
        assert_eq!(zero.daily.precipitation_sum, Some(0.0));
    }

    #[test]
    fn test_sun_times_kept_raw() {
        let triple = normalize_response(
            &raw(json!({"daily": {"sunrise": ["2025-06-01T22:15"], "sunset": [null]}})),
            &now(),
        );
        assert_eq!(triple.daily.sunrise.as_deref(), Some("2025-06-01T22:15"));
        assert_eq!(triple.daily.sunset, None);
    }

    #[test]
    fn test_cache_key_precision() {
        assert_eq!(cache_key(21.028511, 105.804817), "21.0285,105.8048");
    }

    #[tokio::test]
    async fn test_cached_response_is_renormalized_for_each_now() {
        let cache = TtlCache::new(Duration::from_secs(600));
        cache.insert(
            cache_key(21.0285, 105.8542),
            raw(json!({
                "hourly": {
                    "time": ["2025-06-02T06:00", "2025-06-02T07:00"],
                    "relative_humidity_2m": [70, 75]
                }
            })),
        );
        let client = OpenMeteoClient::new(OpenMeteoConfig::default(), cache).unwrap();

        let early = vn_offset().with_ymd_and_hms(2025, 6, 2, 13, 10, 0).unwrap();
        let first = client.fetch_forecast(21.0285, 105.8542, early).await.unwrap();
        let second = client.fetch_forecast(21.0285, 105.8542, now()).await.unwrap();

        assert_eq!(first.current.humidity, Some(70.0));
        assert_eq!(second.current.humidity, Some(75.0));
        assert_eq!(client.cache.len(), 1);
    }
}
