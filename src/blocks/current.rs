//! "Tình hình hiện tại": the instantaneous block.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::{Block, SOURCE_NAME};
use crate::classify::Region;
use crate::classify::cloud_dew::CloudDew;
use crate::classify::humidity::{adjust_feels_by_humidity, classify_humidity};
use crate::classify::pressure::classify_pressure;
use crate::classify::rain::{classify_rain_level, compute_rain_intensity, interpret_rain_probability};
use crate::classify::solar_uv::{SOLAR_NIGHT, UV_NIGHT, classify_solar, classify_uv};
use crate::classify::temperature::{
    classify_temp_level, compute_adjusted_feels, compute_avg_temp, compute_diurnal_range,
    compute_feels_gap, compute_hourly_anomaly,
};
use crate::classify::visibility::classify_visibility;
use crate::classify::wind::{
    adjust_feels_by_wind, classify_wind_beaufort, classify_wind_level, compute_effective_wind,
    interpret_gust, wind_direction_to_text,
};
use crate::clock::{hour_key, is_night, observation_stamp};
use crate::model::UnifiedRecord;
use crate::normalize::{fmt_opt, label_or_dash, num, round1};

/// Every figure the current block computed, rounded to one decimal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentValues {
    pub status_text: String,
    pub is_night: bool,

    pub temperature_now: Option<f64>,
    pub apparent_temperature_now: Option<f64>,
    pub adjusted_feels: Option<f64>,
    pub feels_gap: Option<f64>,
    pub diurnal_range: Option<f64>,
    pub hourly_anomaly_ratio: Option<f64>,
    pub avg_temperature_day: Option<f64>,
    pub temperature_min_day: Option<f64>,
    pub temperature_max_day: Option<f64>,
    pub temp_level: Option<&'static str>,

    pub rain_now: Option<f64>,
    pub rain_probability_now: Option<f64>,
    pub rain_probability_text: Option<&'static str>,
    pub intensity_ratio_now: Option<f64>,
    pub rain_level: Option<&'static str>,

    pub wind_speed_now: Option<f64>,
    pub gust_now: Option<f64>,
    pub effective_wind: Option<f64>,
    pub feels_by_wind: Option<f64>,
    pub wind_level: Option<u8>,
    pub wind_level_desc: Option<&'static str>,
    pub gust_text: Option<&'static str>,
    pub wind_direction_now: Option<f64>,
    pub wind_direction_text: Option<&'static str>,

    pub cloudcover_now: Option<f64>,
    pub cloudcover_level: Option<&'static str>,
    pub dewpoint_now: Option<f64>,
    pub dewpoint_level: Option<&'static str>,

    pub visibility_now_km: Option<f64>,
    pub visibility_level: Option<&'static str>,

    pub humidity_now: Option<f64>,
    pub humidity_level: Option<&'static str>,
    pub adjusted_feels_by_humidity: Option<f64>,

    pub pressure_now: Option<f64>,
    pub pressure_level: Option<&'static str>,

    /// Forced to `0.0` at night.
    pub solar_now: Option<f64>,
    pub solar_level: Option<&'static str>,
    /// Forced to `0.0` at night.
    pub uv_now: Option<f64>,
    pub uv_level_now: Option<&'static str>,
}

/// Builds the current block. Each reading falls back from the instant
/// value to the hourly mean (and for some, the daily aggregate). Lines whose
/// value is missing are left out, except visibility and solar/UV which
/// always render.
pub fn build_current_block(
    u: &UnifiedRecord,
    status_text: &str,
    wind_unit: &str,
    region: Region,
    now: &DateTime<FixedOffset>,
) -> Block<CurrentValues> {
    let temp = u.temperature_now.or(u.temperature_hourly).or(u.temperature_day);
    let feels = u.apparent_temperature_now.or(u.apparent_temperature_hourly);
    let wspd = u.wind_speed_now.or(u.wind_speed_hourly);
    let gust = u.gust_now.or(u.gust_hourly);
    let rh = u.humidity_now.or(u.humidity_hourly).or(u.humidity_day);
    let pmsl = u.pressure_now.or(u.pressure_hourly).or(u.pressure_day);
    let solar = u.solar_radiation_now.or(u.solar_radiation_hourly);
    let uv = u.uv_index_now.or(u.uv_index_hourly);
    let rain = u.precipitation_now.or_else(|| {
        let series = &u.hourly_series;
        series.value_at(&series.precipitation, &hour_key(now))
    });
    let rain_prob = u
        .precipitation_probability_now
        .or(u.precipitation_probability_hourly)
        .or(u.precipitation_probability_day);
    let wind_dir = u.wind_direction_now;
    let cloud = u.cloudcover_now.or(u.cloudcover_hourly);
    let dew = u.dewpoint_now.or(u.dewpoint_hourly);
    let (tmin, tmax) = (u.temperature_min_day, u.temperature_max_day);

    // Temperature
    let adjusted_feels = compute_adjusted_feels(temp, feels, wspd, rh);
    let hourly_anomaly = compute_hourly_anomaly(temp, u.temperature_hourly);
    let temp_level = classify_temp_level(temp, region);

    // Rain
    let intensity = compute_rain_intensity(rain, u.precipitation_hourly);
    let rain_level = classify_rain_level(rain);
    let rain_prob_text = interpret_rain_probability(rain_prob);

    // Wind
    let beaufort = classify_wind_beaufort(wspd, None);
    let wind_level_desc = classify_wind_level(wspd, gust, region);
    let gust_text = interpret_gust(gust, wspd, region);
    let wind_dir_text = wind_direction_to_text(wind_dir);

    let cloud_dew = CloudDew::new(cloud, dew);

    // Visibility arrives in metres.
    let vis_km = round1(u.visibility_now.map(|m| m / 1000.0));
    let vis_level = classify_visibility(vis_km);

    let humidity_level = classify_humidity(rh);
    let feels_humidity = adjust_feels_by_humidity(temp, feels, rh, region);
    let pressure_level = classify_pressure(pmsl, region);

    let night = is_night(now);

    /* ---------------------------- lines ---------------------------- */

    let mut lines = vec![
        format!("🌤️ Trạng thái: {}", display_status(status_text)),
        format!("🕒 Thời gian quan trắc: {}", observation_stamp(now)),
        format!("📄 Nguồn dữ liệu: {SOURCE_NAME}"),
        String::new(),
    ];

    if let Some(t) = temp {
        lines.push(format!("🌡️ Nhiệt độ hiện tại: {}°C", num(t)));
    }
    if let Some(f) = adjusted_feels {
        lines.push(format!("🙂 Cảm giác thực tế: {}°C", num(f)));
    }
    if let Some(a) = hourly_anomaly {
        lines.push(format!("⏱️ So với trung bình giờ: {}×", num(a)));
    }
    if let Some(level) = temp_level {
        lines.push(format!("🏷️ Mức độ nhiệt độ: {level}"));
    }

    if let Some(r) = rain {
        lines.push(format!("🌧️ Lượng mưa hiện tại: {} mm/h", num(r)));
    }
    if let Some(p) = rain_prob {
        lines.push(format!(
            "📊 Xác suất mưa hiện tại: {}% ({})",
            num(p),
            label_or_dash(rain_prob_text)
        ));
    }
    if let Some(x) = intensity {
        lines.push(format!("⏱️ Cường độ mưa hiện tại: {}× so với trung bình giờ", num(x)));
    }
    if let Some(level) = rain_level {
        lines.push(format!("🏷️ Mức độ mưa: {level}"));
    }

    if let Some(w) = wspd {
        let unit = format!(" {wind_unit}");
        lines.push(format!(
            "💨 Gió hiện tại: {} ({}) (giật {}, {})",
            fmt_opt(Some(w), &unit),
            fmt_opt(Some(w * 3.6), " km/h"),
            fmt_opt(gust, &unit),
            fmt_opt(gust.map(|g| g * 3.6), " km/h"),
        ));
    }
    if let Some(force) = beaufort {
        lines.push(format!("🌀 Cấp gió Beaufort: {force}"));
    }
    if let Some(text) = gust_text {
        lines.push(text.to_string());
    }
    if let Some(desc) = wind_level_desc {
        lines.push(format!("🍃 Mức độ gió: {desc}"));
    }
    if let Some(d) = wind_dir {
        lines.push(format!("↔️ Hướng gió: {}° ({})", num(d), label_or_dash(wind_dir_text)));
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

    match vis_km {
        Some(km) => {
            lines.push(format!("👀 Tầm nhìn hiện tại: {} km", num(km)));
            if let Some(level) = vis_level {
                lines.push(format!("🏷️ Mức độ tầm nhìn: {level}"));
            }
        }
        None => {
            lines.push("👀 Tầm nhìn hiện tại: — km".to_string());
            lines.push("🏷️ Mức độ tầm nhìn: —".to_string());
        }
    }

    if let Some(h) = rh {
        lines.push(format!("💧 Độ ẩm hiện tại: {}% ({})", num(h), label_or_dash(humidity_level)));
    }
    if let Some(f) = feels_humidity {
        lines.push(format!("🤔 Cảm giác thực tế (điều chỉnh theo độ ẩm): {}°C", num(f)));
    }

    if let Some(p) = pmsl {
        lines.push(format!("⚖️ Áp suất hiện tại: {} hPa ({})", num(p), label_or_dash(pressure_level)));
    }

    let (solar_now, solar_level, uv_now, uv_level_now) = if night {
        lines.push("🔆 Bức xạ mặt trời hiện tại: 0 W/m² (🌙 Ban đêm)".to_string());
        lines.push("☀️ UV hiện tại: 0 (🌙 Ban đêm)".to_string());
        (Some(0.0), Some(SOLAR_NIGHT), Some(0.0), Some(UV_NIGHT))
    } else {
        let solar_val = round1(solar);
        let solar_level = classify_solar(solar_val, region, cloud, false);
        match solar_val {
            Some(s) => lines.push(format!(
                "🔆 Bức xạ mặt trời hiện tại: {} W/m² ({})",
                num(s),
                label_or_dash(solar_level)
            )),
            None => lines.push("🔆 Bức xạ mặt trời hiện tại: — W/m²".to_string()),
        }

        let uv_val = round1(uv);
        let uv_level = classify_uv(uv_val, rain, cloud, false);
        match uv_val {
            Some(v) => lines.push(format!("☀️ UV hiện tại: {} ({})", num(v), label_or_dash(uv_level))),
            None => lines.push("☀️ UV hiện tại: —".to_string()),
        }
        (solar_val, solar_level, uv_val, uv_level)
    };

    let values = CurrentValues {
        status_text: status_text.to_string(),
        is_night: night,
        temperature_now: round1(temp),
        apparent_temperature_now: round1(feels),
        adjusted_feels,
        feels_gap: compute_feels_gap(temp, feels, wspd, rh),
        diurnal_range: compute_diurnal_range(tmin, tmax),
        hourly_anomaly_ratio: hourly_anomaly,
        avg_temperature_day: compute_avg_temp(u.temperature_day, tmin, tmax),
        temperature_min_day: round1(tmin),
        temperature_max_day: round1(tmax),
        temp_level,
        rain_now: round1(rain),
        rain_probability_now: round1(rain_prob),
        rain_probability_text: rain_prob_text,
        intensity_ratio_now: intensity,
        rain_level,
        wind_speed_now: round1(wspd),
        gust_now: round1(gust),
        effective_wind: compute_effective_wind(wspd, gust),
        feels_by_wind: adjust_feels_by_wind(temp, feels, wspd, gust, region),
        wind_level: beaufort,
        wind_level_desc,
        gust_text,
        wind_direction_now: round1(wind_dir),
        wind_direction_text: wind_dir_text,
        cloudcover_now: cloud_dew.cloudcover,
        cloudcover_level: cloud_dew.cloudcover_level,
        dewpoint_now: cloud_dew.dewpoint,
        dewpoint_level: cloud_dew.dewpoint_level,
        visibility_now_km: vis_km,
        visibility_level: vis_level,
        humidity_now: round1(rh),
        humidity_level,
        adjusted_feels_by_humidity: feels_humidity,
        pressure_now: round1(pmsl),
        pressure_level,
        solar_now,
        solar_level,
        uv_now,
        uv_level_now,
    };

    Block { lines, values }
}

pub(crate) fn display_status(status_text: &str) -> &str {
    if status_text.is_empty() { crate::normalize::DASH } else { status_text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::vn_offset;
    use crate::model::HourlySeries;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<FixedOffset> {
        vn_offset().with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    fn hot_humid() -> UnifiedRecord {
        UnifiedRecord {
            temperature_now: Some(36.0),
            apparent_temperature_now: Some(41.0),
            humidity_now: Some(92.0),
            wind_speed_now: Some(5.0),
            gust_now: Some(25.0),
            precipitation_now: Some(0.0),
            solar_radiation_now: Some(650.0),
            uv_index_now: Some(8.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_hot_humid_gusty_lines() {
        let block = build_current_block(&hot_humid(), "Ít mây", "m/s", Region::North, &at(14));
        let text = block.text();
        assert!(text.contains("🏷️ Mức độ nhiệt độ: 🌡️ Rất nóng (≥35°C)"));
        assert!(text.contains("💧 Độ ẩm hiện tại: 92.0% (💧 Độ ẩm rất cao"));
        assert!(text.contains("⚠️ Gió giật mạnh hơn nhiều so với gió trung bình."));
        assert!(text.contains("🏷️ Mức độ mưa: 🙂 Không mưa."));
        assert!(text.contains("💨 Gió hiện tại: 5.0 m/s (18.0 km/h) (giật 25.0 m/s, 90.0 km/h)"));
        assert_eq!(block.lines[0], "🌤️ Trạng thái: Ít mây");
        assert_eq!(block.lines[3], "");
        assert_eq!(block.values.temperature_now, Some(36.0));
        assert!(!block.values.is_night);
    }

    #[test]
    fn test_night_forces_zero_solar_and_uv() {
        let block = build_current_block(&hot_humid(), "Ít mây", "m/s", Region::North, &at(21));
        let text = block.text();
        assert!(text.contains("🔆 Bức xạ mặt trời hiện tại: 0 W/m² (🌙 Ban đêm)"));
        assert!(text.contains("☀️ UV hiện tại: 0 (🌙 Ban đêm)"));
        assert_eq!(block.values.solar_now, Some(0.0));
        assert_eq!(block.values.uv_now, Some(0.0));
        assert_eq!(block.values.uv_level_now, Some(UV_NIGHT));
    }

    #[test]
    fn test_rain_falls_back_to_series_at_current_hour() {
        let u = UnifiedRecord {
            hourly_series: HourlySeries {
                time: vec!["2025-06-02T13:00".into(), "2025-06-02T14:00".into()],
                precipitation: vec![Some(1.0), Some(7.5)],
                ..Default::default()
            },
            ..Default::default()
        };
        let block = build_current_block(&u, "", "m/s", Region::North, &at(14));
        assert_eq!(block.values.rain_now, Some(7.5));
        assert!(block.text().contains("🌧️ Lượng mưa hiện tại: 7.5 mm/h"));
    }

    #[test]
    fn test_zero_reading_is_not_skipped_by_fallback() {
        let u = UnifiedRecord {
            temperature_now: Some(0.0),
            temperature_hourly: Some(12.0),
            ..Default::default()
        };
        let block = build_current_block(&u, "", "m/s", Region::North, &at(9));
        assert_eq!(block.values.temperature_now, Some(0.0));
    }

    #[test]
    fn test_empty_record_keeps_placeholder_lines() {
        let block = build_current_block(&UnifiedRecord::default(), "", "m/s", Region::North, &at(10));
        assert_eq!(block.lines[0], "🌤️ Trạng thái: —");
        assert_eq!(
            &block.lines[4..],
            [
                "👀 Tầm nhìn hiện tại: — km",
                "🏷️ Mức độ tầm nhìn: —",
                "🔆 Bức xạ mặt trời hiện tại: — W/m²",
                "☀️ UV hiện tại: —",
            ]
        );
    }

    #[test]
    fn test_visibility_converted_from_metres() {
        let u = UnifiedRecord {
            visibility_now: Some(24_140.0),
            ..Default::default()
        };
        let block = build_current_block(&u, "", "m/s", Region::North, &at(10));
        assert_eq!(block.values.visibility_now_km, Some(24.1));
        assert!(block.text().contains("👀 Tầm nhìn hiện tại: 24.1 km"));
    }
}
