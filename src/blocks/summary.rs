//! "Kết luận bản tin": headline figures side by side, then the insight and
//! alert lists.

use chrono::{DateTime, FixedOffset};

use super::SOURCE_NAME;
use super::current::CurrentValues;
use super::overview::OverviewValues;
use crate::classify::solar_uv::format_solar_sum;
use crate::clock::observation_stamp;
use crate::normalize::{DASH, fmt_or_dash_unit};

pub const INSIGHTS_HEADER: &str = "📌 NHẬN ĐỊNH NỔI BẬT";
pub const ALERTS_HEADER: &str = "⚠️ CẢNH BÁO QUAN TRỌNG";

pub fn build_summary(
    cv: &CurrentValues,
    ov: &OverviewValues,
    insights: &[String],
    alerts: &[String],
    now: &DateTime<FixedOffset>,
) -> String {
    let v = fmt_or_dash_unit;
    let status = [cv.status_text.as_str(), ov.status_text.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(DASH);
    let solar_sum = match ov.solar_sum_day {
        Some(_) => format_solar_sum(ov.solar_sum_day),
        None => DASH.to_string(),
    };

    let mut lines = vec![
        format!("📋 Kết luận: {status}"),
        format!("🕒 Thời gian quan trắc: {}", observation_stamp(now)),
        format!("📄 Nguồn dữ liệu: {SOURCE_NAME}"),
        String::new(),
        format!(
            "🌡️ Nhiệt độ hiện tại: {} (trung bình ngày: {})",
            v(cv.temperature_now, "°C"),
            v(ov.avg_temperature_day, "°C")
        ),
        format!(
            "🌡️ Dao động ngày: {} – {}",
            v(ov.temperature_min_day, "°C"),
            v(ov.temperature_max_day, "°C")
        ),
        format!(
            "🌧️ Lượng mưa hiện tại: {}, Tổng ngày: {}",
            v(cv.rain_now, " mm/h"),
            v(ov.precipitation_sum_day, " mm")
        ),
        format!("🌦️ Lượng mưa trung bình ngày: {}", v(ov.avg_precipitation_day, " mm/h")),
        format!(
            "💨 Gió hiện tại: {} (giật {}), Trung bình ngày: {}, Cực đại ngày: {}",
            v(cv.wind_speed_now, " m/s"),
            v(cv.gust_now, " m/s"),
            v(ov.avg_wind_speed_day, " m/s"),
            v(ov.wind_speed_max, " m/s")
        ),
        format!("💨 Gió giật cực đại ngày: {}", v(ov.wind_gusts_max, " m/s")),
        format!(
            "☁️ Mây hiện tại: {}, Trung bình ngày: {}",
            v(cv.cloudcover_now, "%"),
            v(ov.cloudcover_mean, "%")
        ),
        format!(
            "🌫️ Điểm sương hiện tại: {}, Trung bình ngày: {}",
            v(cv.dewpoint_now, "°C"),
            v(ov.dewpoint_mean, "°C")
        ),
        format!("👀 Tầm nhìn hiện tại: {}", v(cv.visibility_now_km, " km")),
        format!(
            "💧 Độ ẩm hiện tại: {}, Trung bình ngày: {}",
            v(cv.humidity_now, "%"),
            v(ov.humidity_day, "%")
        ),
        format!(
            "⚖️ Áp suất hiện tại: {}, Trung bình ngày: {}",
            v(cv.pressure_now, " hPa"),
            v(ov.pressure_day, " hPa")
        ),
        format!(
            "🔆 Bức xạ hiện tại: {}, Tổng ngày tích lũy: {solar_sum}",
            v(cv.solar_now, " W/m²")
        ),
        format!(
            "☀️ UV hiện tại: {}, Tối đa ngày: {}",
            v(cv.uv_now, ""),
            v(ov.uv_max_day, "")
        ),
        format!(
            "🌅 Mặt trời mọc: {}, 🌇 Mặt trời lặn: {}",
            ov.sunrise.as_deref().unwrap_or(DASH),
            ov.sunset.as_deref().unwrap_or(DASH)
        ),
        String::new(),
    ];

    if !insights.is_empty() {
        lines.push(INSIGHTS_HEADER.to_string());
        lines.extend(insights.iter().map(|i| format!("🔎 {i}")));
        lines.push(String::new());
    }
    if !alerts.is_empty() {
        lines.push(ALERTS_HEADER.to_string());
        lines.extend(alerts.iter().map(|a| format!("⚠️ {a}")));
    }

    lines.join("\n")
}
