//! "Tổng quan trong ngày": the daily block.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::current::display_status;
use super::{Block, SOURCE_NAME};
use crate::classify::Region;
use crate::classify::cloud_dew::CloudDew;
use crate::classify::humidity::{adjust_feels_by_humidity, classify_humidity};
use crate::classify::pressure::classify_pressure;
use crate::classify::rain::{classify_rain_level, interpret_rain_probability};
use crate::classify::solar_uv::{SOLAR_NIGHT, UV_NIGHT, classify_solar, classify_uv, format_solar_sum};
use crate::classify::temperature::{
    classify_temp_level, compute_avg_temp, compute_diurnal_range, compute_hourly_anomaly,
};
use crate::classify::wind::{classify_wind_beaufort, classify_wind_level};
use crate::clock::{is_night, local_display, observation_stamp, today_prefix};
use crate::model::{HourlySeries, UnifiedRecord};
use crate::normalize::{label_or_dash, max_present, mean, num, round1};

/// Daily-scope inputs of the overview block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewInput {
    pub status_text: String,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub avg_temperature_hourly: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub precipitation_now: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub wind_gusts_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub solar_radiation_sum: Option<f64>,
    pub avg_solar: Option<f64>,
    pub avg_uv: Option<f64>,
    pub uv_max_day: Option<f64>,
    pub cloudcover_mean: Option<f64>,
    pub dewpoint_mean: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub series: HourlySeries,
}

impl OverviewInput {
    /// Daily fields of the record. The hourly mean stands in for the daily
    /// mean wind, and the day's wind and gust maxima come from the series.
    pub fn from_unified(u: &UnifiedRecord, status_text: &str) -> Self {
        let series = &u.hourly_series;
        Self {
            status_text: status_text.to_string(),
            tmin: u.temperature_min_day,
            tmax: u.temperature_max_day,
            avg_temperature: u.temperature_day,
            avg_temperature_hourly: u.temperature_hourly,
            precipitation_sum: u.precipitation_sum_day,
            precipitation_now: u.precipitation_now,
            precipitation_probability: u.precipitation_probability_day,
            avg_wind_speed: u.wind_speed_hourly,
            wind_speed_max: max_present(&series.wind_speed_10m),
            wind_gusts_max: max_present(&series.wind_gusts_10m),
            humidity: u.humidity_day,
            pressure: u.pressure_day,
            solar_radiation_sum: u.solar_radiation_sum_day,
            avg_solar: u.solar_radiation_hourly,
            avg_uv: u.uv_index_hourly,
            uv_max_day: u.uv_index_max_day,
            cloudcover_mean: u.cloudcover_mean,
            dewpoint_mean: u.dewpoint_mean,
            sunrise: u.sunrise.clone(),
            sunset: u.sunset.clone(),
            series: series.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewValues {
    pub status_text: String,
    pub is_night: bool,

    pub avg_temperature_day: Option<f64>,
    pub temperature_min_day: Option<f64>,
    pub temperature_max_day: Option<f64>,
    pub diurnal_range: Option<f64>,
    pub hourly_anomaly_ratio: Option<f64>,
    pub temp_level: Option<&'static str>,

    pub precipitation_sum_day: Option<f64>,
    pub avg_precipitation_day: Option<f64>,
    pub rain_level: Option<&'static str>,
    pub precipitation_probability_day: Option<f64>,
    pub rain_probability_text: Option<&'static str>,

    pub avg_wind_speed_day: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub wind_gusts_max: Option<f64>,
    pub wind_level: Option<u8>,
    pub wind_level_desc: Option<&'static str>,

    pub cloudcover_mean: Option<f64>,
    pub cloudcover_level: Option<&'static str>,
    pub dewpoint_mean: Option<f64>,
    pub dewpoint_level: Option<&'static str>,

    pub humidity_day: Option<f64>,
    pub humidity_level: Option<&'static str>,
    pub adjusted_feels_by_humidity: Option<f64>,

    pub pressure_day: Option<f64>,
    pub pressure_level: Option<&'static str>,

    pub avg_solar_day: Option<f64>,
    pub solar_sum_day: Option<f64>,
    pub solar_level: Option<&'static str>,
    pub avg_uv_day: Option<f64>,
    pub uv_max_day: Option<f64>,
    pub uv_level_avg: Option<&'static str>,
    pub uv_level_max: Option<&'static str>,

    /// Local display form, `HH:MM, dd/mm/YYYY`.
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Daily rainfall total and its per-hour average.
///
/// The total is the daily sum, else today's hourly entries summed, else the
/// current reading when it is positive. A zero or missing sum with an hourly
/// series but no entries for today becomes `None`. The average divides by
/// the number of today's hourly entries, or by 24 when there are none.
fn daily_rain(input: &OverviewInput, today: &str) -> (Option<f64>, Option<f64>) {
    let series = &input.series;
    let mut total = input.precipitation_sum;
    let mut entries = 0usize;

    if total.is_none_or(|s| s == 0.0) && !series.precipitation.is_empty() {
        let today_values = series.entries_on(&series.precipitation, today);
        entries = today_values.len();
        total = (!today_values.is_empty()).then(|| today_values.iter().sum());
    }
    if total.is_none_or(|s| s == 0.0) {
        if let Some(now) = input.precipitation_now.filter(|r| *r > 0.0) {
            total = Some(now);
        }
    }

    let hours = if entries > 0 { entries } else { series.hours_on(today) };
    let avg = total.map(|t| if hours > 0 { t / hours as f64 } else { t / 24.0 });
    (round1(total), round1(avg))
}

pub fn build_overview_block(
    input: &OverviewInput,
    region: Region,
    now: &DateTime<FixedOffset>,
) -> Block<OverviewValues> {
    let today = today_prefix(now);
    let series = &input.series;

    // Temperature
    let avg_temp = compute_avg_temp(input.avg_temperature, input.tmin, input.tmax);
    let diurnal = compute_diurnal_range(input.tmin, input.tmax);
    let anomaly = compute_hourly_anomaly(avg_temp, input.avg_temperature_hourly);
    let temp_level = classify_temp_level(avg_temp, region);

    // Rain
    let (rain_sum, rain_avg) = daily_rain(input, &today);
    let rain_level = classify_rain_level(rain_sum);
    let rain_prob = input.precipitation_probability.or_else(|| {
        let probs = series.entries_on(&series.precipitation_probability, &today);
        mean(probs.into_iter().map(Some))
    });
    let rain_prob_text = interpret_rain_probability(rain_prob);

    // Wind
    let avg_wspd = input.avg_wind_speed;
    let beaufort = classify_wind_beaufort(avg_wspd, None);
    let wind_level_desc = classify_wind_level(avg_wspd, None, region);

    let cloud_dew = CloudDew::new(input.cloudcover_mean, input.dewpoint_mean);

    let humidity_level = classify_humidity(input.humidity);
    let feels_humidity = adjust_feels_by_humidity(avg_temp, input.tmax, input.humidity, region);
    let pressure_level = classify_pressure(input.pressure, region);

    let night = is_night(now);
    let sunrise = input.sunrise.as_deref().filter(|s| !s.is_empty()).map(local_display);
    let sunset = input.sunset.as_deref().filter(|s| !s.is_empty()).map(local_display);

    /* ---------------------------- lines ---------------------------- */

    let mut lines = vec![
        format!("🌤️ Dự báo: {}", display_status(&input.status_text)),
        format!("🕒 Thời gian quan trắc: {}", observation_stamp(now)),
        format!("📄 Nguồn dữ liệu: {SOURCE_NAME}"),
        String::new(),
    ];

    if let (Some(lo), Some(hi)) = (input.tmin, input.tmax) {
        lines.push(format!("🌡️ Dao động ngày: {}°C / {}°C", num(lo), num(hi)));
    }
    if let Some(t) = avg_temp {
        lines.push(format!("🌡️ Nhiệt độ trung bình ngày: {}°C", num(t)));
    }
    if let Some(r) = diurnal {
        lines.push(format!("📈 Biên độ nhiệt ngày: {}°C", num(r)));
    }
    if let Some(a) = anomaly {
        lines.push(format!("⏱️ Lệch theo giờ: {}× (so với trung bình giờ)", num(a)));
    }
    if let Some(level) = temp_level {
        lines.push(format!("🏷️ Mức độ nhiệt độ: {level}"));
    }

    if let Some(avg) = rain_avg {
        lines.push(format!("🌦️ Lượng mưa trung bình ngày: {} mm/h", num(avg)));
    }
    if let Some(p) = rain_prob {
        lines.push(format!(
            "📊 Xác suất mưa trung bình ngày: {}% ({})",
            p.round() as i64,
            label_or_dash(rain_prob_text)
        ));
    }
    if let Some(sum) = rain_sum {
        lines.push(format!("🌧️ Tổng lượng mưa ngày: {} mm", num(sum)));
    }
    if let Some(level) = rain_level {
        lines.push(format!("🏷️ Mức độ mưa: {level}"));
    }

    if let Some(w) = avg_wspd {
        lines.push(format!("💨 Gió trung bình ngày: {} m/s", num(w)));
    }
    if let Some(w) = input.wind_speed_max {
        lines.push(format!("💨 Gió cực đại ngày: {} m/s", num(w)));
    }
    if let Some(g) = input.wind_gusts_max {
        lines.push(format!("💨 Gió giật cực đại ngày: {} m/s", num(g)));
    }
    if let Some(force) = beaufort {
        lines.push(format!("🌀 Cấp gió Beaufort trung bình: {force}"));
    }
    if let Some(desc) = wind_level_desc {
        lines.push(format!("🍃 Mức độ gió: {desc}"));
    }

    if let Some(c) = cloud_dew.cloudcover {
        lines.push(format!(
            "☁️ Độ che phủ mây trung bình: {}% ({})",
            num(c),
            label_or_dash(cloud_dew.cloudcover_level)
        ));
    }
    if let Some(d) = cloud_dew.dewpoint {
        lines.push(format!(
            "🌫️ Điểm sương trung bình: {}°C ({})",
            num(d),
            label_or_dash(cloud_dew.dewpoint_level)
        ));
    }

    if let Some(h) = input.humidity {
        lines.push(format!("💧 Độ ẩm trung bình ngày: {}% ({})", num(h), label_or_dash(humidity_level)));
    }
    if let Some(f) = feels_humidity {
        lines.push(format!("🤔 Cảm giác thực tế (điều chỉnh theo độ ẩm): {}°C", num(f)));
    }

    if let Some(p) = input.pressure {
        lines.push(format!("⚖️ Áp suất trung bình ngày: {} hPa ({})", num(p), label_or_dash(pressure_level)));
    }

    let avg_uv = round1(input.avg_uv);
    let uv_max = round1(input.uv_max_day);
    let (solar_level, uv_level_avg, uv_level_max) = if night {
        lines.push("🔆 Năng lượng bức xạ tích lũy trong ngày: 0 Wh/m² (🌙 Ban đêm)".to_string());
        lines.push("☀️ UV tối đa: 0 (🌙 Ban đêm, UV = 0)".to_string());
        (Some(SOLAR_NIGHT), Some(UV_NIGHT), Some(UV_NIGHT))
    } else {
        let solar_level = classify_solar(Some(input.avg_solar.unwrap_or(0.0)), region, None, false);
        let solar_sum = match input.solar_radiation_sum {
            Some(_) => format_solar_sum(input.solar_radiation_sum),
            None => "0 Wh/m²".to_string(),
        };
        lines.push(format!("🔆 Năng lượng bức xạ tích lũy trong ngày: {solar_sum}"));

        let uv_level_avg = classify_uv(avg_uv, None, None, false);
        if let Some(v) = avg_uv {
            lines.push(format!("☀️ UV trung bình ngày: {} ({})", num(v), label_or_dash(uv_level_avg)));
        }

        let max_shown = uv_max.unwrap_or(0.0);
        let uv_level_max = classify_uv(Some(max_shown), None, None, false);
        lines.push(format!("☀️ UV tối đa trong ngày: {} ({})", num(max_shown), label_or_dash(uv_level_max)));
        (solar_level, uv_level_avg, uv_level_max)
    };

    if let Some(s) = &sunrise {
        lines.push(format!("🌅 Mặt trời mọc: {s}"));
    }
    if let Some(s) = &sunset {
        lines.push(format!("🌇 Mặt trời lặn: {s}"));
    }

    let values = OverviewValues {
        status_text: input.status_text.clone(),
        is_night: night,
        avg_temperature_day: avg_temp,
        temperature_min_day: round1(input.tmin),
        temperature_max_day: round1(input.tmax),
        diurnal_range: diurnal,
        hourly_anomaly_ratio: anomaly,
        temp_level,
        precipitation_sum_day: rain_sum,
        avg_precipitation_day: rain_avg,
        rain_level,
        precipitation_probability_day: round1(rain_prob),
        rain_probability_text: rain_prob_text,
        avg_wind_speed_day: round1(avg_wspd),
        wind_speed_max: round1(input.wind_speed_max),
        wind_gusts_max: round1(input.wind_gusts_max),
        wind_level: beaufort,
        wind_level_desc,
        cloudcover_mean: cloud_dew.cloudcover,
        cloudcover_level: cloud_dew.cloudcover_level,
        dewpoint_mean: cloud_dew.dewpoint,
        dewpoint_level: cloud_dew.dewpoint_level,
        humidity_day: round1(input.humidity),
        humidity_level,
        adjusted_feels_by_humidity: feels_humidity,
        pressure_day: round1(input.pressure),
        pressure_level,
        avg_solar_day: round1(input.avg_solar),
        solar_sum_day: round1(input.solar_radiation_sum),
        solar_level,
        avg_uv_day: avg_uv,
        uv_max_day: uv_max,
        uv_level_avg,
        uv_level_max,
        sunrise,
        sunset,
    };

    Block { lines, values }
}
