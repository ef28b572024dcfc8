//! Threshold-gated warnings and their keyword categories.
//!
//! Most generators stay silent unless a threshold is crossed. Solar and UV
//! are the exception: they always report, either a warning or an explicit
//! all-clear, for every input that is present.

use serde::Serialize;

use crate::classify::Terrain;
use crate::classify::visibility::visibility_km;
use crate::model::UnifiedRecord;
use crate::readings::{
    CurrentScope, OverviewScope, RainReading, SolarUvReading, TemperatureReading, WindReading,
};

pub const CURRENT_HEADER: &str = "⏱️ CẢNH BÁO TÌNH HÌNH HIỆN TẠI:";
pub const CURRENT_FALLBACK: &str = "✅ Không có cảnh báo đặc biệt cho tình hình hiện tại.";
pub const OVERVIEW_HEADER: &str = "📅 CẢNH BÁO TỔNG QUAN TRONG NGÀY:";
pub const OVERVIEW_FALLBACK: &str = "✅ Không có cảnh báo đặc biệt cho tổng quan trong ngày.";

/* ============================ Per variable ============================ */

pub fn generate_temperature_alerts(r: &TemperatureReading) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();

    if let Some(t) = r.temp {
        if t >= 45.0 {
            out.push("⚠️ Nhiệt độ cực cao (≥45°C): nguy cơ sốc nhiệt nghiêm trọng, cần hạn chế ra ngoài.");
        } else if t >= 40.0 {
            out.push("⚠️ Nắng nóng gay gắt (≥40°C), oi bức, dễ kiệt sức.");
        } else if t >= 35.0 {
            out.push("⚠️ Thời tiết nóng (≥35°C), gây khó chịu, cần hạn chế ra ngoài.");
        }

        if t <= 7.0 {
            out.push("⚠️ Rét buốt cực đoan (≤7°C): nguy cơ hạ thân nhiệt, cực kỳ nguy hiểm.");
        } else if t <= 10.0 {
            out.push("⚠️ Rét hại (≤10°C): rất nguy hiểm, cần giữ ấm nghiêm ngặt.");
        } else if t <= 12.0 {
            out.push("⚠️ Rét đậm (≤12°C): nguy cơ hạ thân nhiệt, cần giữ ấm cơ thể.");
        } else if t <= 15.0 {
            out.push("⚠️ Rét nhẹ (≤15°C): dễ ảnh hưởng sức khỏe người già và trẻ nhỏ.");
        } else if t <= 18.0 {
            out.push("⚠️ Trời lạnh (≤18°C): nhiều người cảm thấy run, cần mặc ấm.");
        }
    }

    if let (Some(lo), Some(hi)) = (r.tmin, r.tmax) {
        if hi - lo >= 15.0 {
            out.push("⚠️ Dao động nhiệt độ lớn trong ngày, dễ gây mệt mỏi.");
        }
    }

    if let (Some(t), Some(avg)) = (r.temp, r.avg_temp) {
        if (t - avg).abs() >= 7.0 {
            out.push("⚠️ Nhiệt độ hiện tại lệch nhiều so với trung bình ngày, thời tiết biến động bất thường.");
        }
    }

    if let (Some(t), Some(f)) = (r.temp, r.feels) {
        if (f - t).abs() >= 5.0 {
            out.push("⚠️ Cảm giác thực tế khác biệt lớn so với nhiệt độ, dễ gây khó chịu.");
        }
    }

    if let (Some(t), Some(avg_hour)) = (r.temp, r.avg_temp_hour.filter(|a| *a > 0.0)) {
        let ratio = t / avg_hour;
        if ratio >= 1.3 {
            out.push("⚠️ Nhiệt độ hiện tại cao hơn nhiều so với trung bình giờ, thời tiết biến động bất thường.");
        } else if ratio <= 0.7 {
            out.push("⚠️ Nhiệt độ hiện tại thấp hơn nhiều so với trung bình giờ, nguy cơ lạnh đột ngột.");
        }
    }

    out.into_iter().map(String::from).collect()
}

pub fn generate_rain_alerts(r: &RainReading) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();
    let hour_ratio = match (r.rain, r.avg_rain_hour.filter(|a| *a > 0.0)) {
        (Some(rain), Some(avg)) => Some(rain / avg),
        _ => None,
    };

    if r.rain.is_some_and(|v| v >= 20.0) {
        out.push("⚠️ Mưa lớn, nguy cơ ngập úng và lũ quét.");
    }
    if r.rain_prob.is_some_and(|p| p >= 70.0) {
        out.push("⚠️ Xác suất mưa cao, nên chuẩn bị áo mưa/ô.");
    }
    match hour_ratio {
        Some(x) if x >= 3.0 => {
            out.push("⚠️ Lượng mưa hiện tại gấp nhiều lần trung bình giờ, mưa dồn dập bất thường.")
        }
        Some(x) if x <= 0.3 => {
            out.push("⚠️ Lượng mưa hiện tại thấp hơn nhiều so với trung bình giờ, mưa phân bố không đều.")
        }
        _ => {}
    }
    if r.avg_rain.is_some_and(|v| v >= 30.0) {
        out.push("⚠️ Lượng mưa trung bình trong ngày cao, nguy cơ ngập úng kéo dài.");
    }
    if r.rain_total_day.is_some_and(|v| v >= 50.0) {
        out.push("⚠️ Tổng lượng mưa trong ngày rất cao, nguy cơ ngập úng và lũ diện rộng.");
    }
    if r.rain.is_some_and(|v| v >= 50.0) && r.gust.is_some_and(|g| g >= 20.0) {
        out.push("⚠️ Mưa lớn kèm gió mạnh: nguy cơ bão, cần cảnh giác cao.");
    }
    if r.terrain.is_steep() && hour_ratio.is_some_and(|x| x >= 3.0) {
        out.push("⚠️ Mưa dồn dập theo giờ tại khu vực địa hình dốc/núi: nguy cơ lũ quét và sạt lở đất rất cao.");
    }

    out.into_iter().map(String::from).collect()
}

/// Speed ladder on Beaufort forces 6/8/10/12/14, a gust warning, a daily
/// average check and, when a bearing is given, the prevailing-wind note.
pub fn generate_wind_alerts(r: &WindReading) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(w) = r.speed {
        let force = if w >= 41.5 {
            Some("⚠️ Gió cấp 14 (≥41.5 m/s): bão rất mạnh, cực kỳ nguy hiểm.")
        } else if w >= 32.7 {
            Some("⚠️ Gió cấp 12 (≥32.7 m/s): bão mạnh, cần trú ẩn an toàn.")
        } else if w >= 24.5 {
            Some("⚠️ Gió cấp 10 (≥24.5 m/s): có dấu hiệu bão, cần phòng tránh.")
        } else if w >= 17.2 {
            Some("⚠️ Gió cấp 8 (≥17.2 m/s): gió rất mạnh, nguy hiểm cho tàu thuyền và công trình ven biển.")
        } else if w >= 10.8 {
            Some("⚠️ Gió cấp 6 (≥10.8 m/s): gió mạnh, nguy hiểm cho tàu thuyền nhỏ.")
        } else {
            None
        };
        out.extend(force.map(String::from));
    }

    if let Some(g) = r.gust.filter(|g| *g >= 20.0) {
        out.push(format!(
            "⚠️ Gió giật mạnh {g:.1} m/s ≈ {:.1} km/h, cần hạn chế ra ngoài.",
            g * 3.6
        ));
    }

    if let Some(avg) = r.avg_speed {
        if avg >= 30.0 {
            out.push("⚠️ Gió trung bình mạnh trong ngày (≥30 m/s): nguy hiểm cho tàu thuyền và hoạt động ngoài trời.".to_string());
        } else if avg >= 24.5 {
            out.push("⚠️ Gió trung bình cao trong ngày (≥24.5 m/s): có dấu hiệu bão, cần cảnh giác.".to_string());
        }
    }

    if let Some(d) = r.direction {
        let note = match d {
            d if (0.0..45.0).contains(&d) || d >= 315.0 => Some("ℹ️ Gió Bắc: thường mang không khí lạnh, dễ gây rét."),
            d if d < 90.0 && d >= 45.0 => Some("ℹ️ Gió Đông Bắc: thường kèm thời tiết lạnh và khô."),
            d if d < 135.0 && d >= 90.0 => Some("ℹ️ Gió Đông: mang hơi ẩm từ biển, dễ gây oi bức."),
            d if d < 180.0 && d >= 135.0 => Some("ℹ️ Gió Đông Nam: mang theo hơi ẩm, dễ gây oi bức."),
            d if d < 225.0 && d >= 180.0 => Some("ℹ️ Gió Nam: thường mang không khí nóng ẩm."),
            d if d < 270.0 && d >= 225.0 => Some("ℹ️ Gió Tây Nam: thường kèm mưa lớn, nguy cơ bão nhiệt đới."),
            d if d < 315.0 && d >= 270.0 => Some("ℹ️ Gió Tây: khô nóng, dễ gây oi bức."),
            _ => None,
        };
        out.extend(note.map(String::from));
    }

    out
}

pub fn generate_cloud_alerts(cloud: Option<f64>, avg_cloud: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    match cloud {
        Some(c) if c >= 90.0 => out.push("⚠️ Trời u ám, mây dày đặc (≥90%), ánh sáng hạn chế, ảnh hưởng hoạt động ngoài trời."),
        Some(c) if c <= 10.0 => out.push("ℹ️ Trời quang đãng, hầu như không có mây, cần lưu ý nắng gắt."),
        _ => {}
    }
    if avg_cloud.is_some_and(|c| c >= 85.0) {
        out.push("⚠️ Độ che phủ mây trung bình ngày rất cao, trời u ám kéo dài.");
    }
    out.into_iter().map(String::from).collect()
}

pub fn generate_dewpoint_alerts(dew: Option<f64>, avg_dew: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    match dew {
        Some(d) if d >= 24.0 => out.push("⚠️ Điểm sương rất cao (≥24°C): không khí ngột ngạt, nguy cơ oi bức và sốc nhiệt."),
        Some(d) if d <= 5.0 => out.push("⚠️ Điểm sương rất thấp (≤5°C): không khí khô hanh, dễ gây bệnh hô hấp."),
        _ => {}
    }
    if avg_dew.is_some_and(|d| d >= 22.0) {
        out.push("⚠️ Điểm sương trung bình ngày cao (≥22°C): không khí ẩm ướt, dễ oi bức.");
    }
    out.into_iter().map(String::from).collect()
}

/// Accepts km or metres (values above 100 are taken as metres).
pub fn generate_visibility_alerts(vis: Option<f64>) -> Vec<String> {
    let line = match vis.map(visibility_km) {
        Some(km) if km < 1.0 => "⚠️ Tầm nhìn rất hạn chế (<1 km), nguy hiểm khi di chuyển.",
        Some(km) if km < 5.0 => "⚠️ Tầm nhìn kém (<5 km), cần thận trọng khi lái xe.",
        _ => return Vec::new(),
    };
    vec![line.to_string()]
}

pub fn generate_humidity_alerts(rh: Option<f64>, avg_rh: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    match rh {
        Some(h) if h >= 90.0 => out.push("⚠️ Độ ẩm hiện tại rất cao (≥90%), không khí ngột ngạt, dễ gây oi bức."),
        Some(h) if h <= 30.0 => out.push("⚠️ Độ ẩm hiện tại rất thấp (≤30%), không khí khô hanh, dễ gây bệnh hô hấp."),
        _ => {}
    }
    match avg_rh {
        Some(h) if h >= 85.0 => out.push("⚠️ Độ ẩm trung bình ngày cao (≥85%), không khí ẩm ướt kéo dài."),
        Some(h) if h <= 35.0 => out.push("⚠️ Độ ẩm trung bình ngày thấp (≤35%), không khí khô hanh kéo dài."),
        _ => {}
    }
    out.into_iter().map(String::from).collect()
}

pub fn generate_pressure_alerts(pmsl: Option<f64>, avg_pmsl: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    match pmsl {
        Some(p) if p < 1000.0 => out.push("⚠️ Áp suất thấp (<1000 hPa), có thể ảnh hưởng sức khỏe người già và trẻ nhỏ."),
        Some(p) if p > 1025.0 => out.push("⚠️ Áp suất cao bất thường (>1025 hPa), có thể gây khó chịu, đau đầu hoặc ảnh hưởng tuần hoàn."),
        _ => {}
    }
    match avg_pmsl {
        Some(p) if p < 1000.0 => out.push("⚠️ Áp suất trung bình ngày thấp (<1000 hPa), có thể ảnh hưởng sức khỏe."),
        Some(p) if p > 1025.0 => out.push("⚠️ Áp suất trung bình ngày cao (>1025 hPa), có thể ảnh hưởng sức khỏe tim mạch."),
        _ => {}
    }
    out.into_iter().map(String::from).collect()
}

pub fn generate_solar_alerts(solar: Option<f64>, avg_solar: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(s) = solar {
        out.push(if s >= 800.0 {
            "⚠️ Bức xạ mặt trời cao (≥800 W/m²), nguy cơ cháy nắng và ảnh hưởng sức khỏe."
        } else {
            "🙂 Bức xạ mặt trời hiện tại thấp, an toàn khi ra ngoài."
        });
    }
    if let Some(avg) = avg_solar {
        out.push(if avg >= 600.0 {
            "⚠️ Bức xạ mặt trời trung bình ngày cao (≥600 W/m²), cần hạn chế phơi nắng lâu."
        } else {
            "🙂 Bức xạ mặt trời trung bình ngày thấp, không gây nguy hại."
        });
    }
    out.into_iter().map(String::from).collect()
}

pub fn generate_uv_alerts(r: &SolarUvReading) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(u) = r.uv {
        out.push(if u >= 7.0 {
            "⚠️ Chỉ số UV rất cao (≥7), cần bảo vệ da khi ra nắng."
        } else {
            "🙂 Chỉ số UV hiện tại thấp, an toàn khi ra ngoài."
        });
    }
    if let Some(avg) = r.avg_uv {
        out.push(if avg >= 5.0 {
            "⚠️ UV trung bình cao trong ngày (≥5), cần bảo vệ da khi hoạt động ngoài trời."
        } else {
            "🙂 UV trung bình ngày thấp, không gây nguy hại."
        });
    }
    if let Some(max) = r.uv_max_day {
        out.push(if max >= 11.0 {
            "⚠️ UV tối đa trong ngày ở mức cực đoan (≥11), tránh nắng hoàn toàn."
        } else if max >= 8.0 {
            "⚠️ UV tối đa trong ngày rất cao (≥8), hạn chế ra ngoài, che chắn da."
        } else if max >= 6.0 {
            "ℹ️ UV tối đa trong ngày cao (≥6), nên dùng kem chống nắng."
        } else {
            "🙂 UV tối đa trong ngày thấp, khá an toàn."
        });
    }
    out.into_iter().map(String::from).collect()
}

/* ============================ Aggregators ============================ */

/// Every alert over the full record. No wind bearing is passed here, so
/// prevailing-wind notes stay out of the ranked list.
pub fn generate_all_alerts(u: &UnifiedRecord, terrain: Terrain) -> Vec<String> {
    let mut out = Vec::new();
    out.extend(generate_temperature_alerts(&TemperatureReading {
        temp: u.temperature_now,
        feels: u.apparent_temperature_now,
        tmin: u.temperature_min_day,
        tmax: u.temperature_max_day,
        avg_temp: u.temperature_day,
        avg_temp_hour: u.temperature_hourly,
    }));
    out.extend(generate_rain_alerts(&RainReading {
        rain: u.precipitation_now,
        rain_prob: u.precipitation_probability_now,
        avg_rain: None,
        avg_rain_hour: u.precipitation_hourly,
        rain_total_day: u.precipitation_sum_day,
        gust: u.gust_now,
        terrain,
    }));
    out.extend(generate_wind_alerts(&WindReading {
        speed: u.wind_speed_now,
        gust: u.gust_now,
        avg_speed: u.wind_speed_hourly,
        direction: None,
    }));
    out.extend(generate_cloud_alerts(u.cloudcover_now, u.cloudcover_mean));
    out.extend(generate_dewpoint_alerts(u.dewpoint_now, u.dewpoint_mean));
    out.extend(generate_visibility_alerts(u.visibility_now));
    out.extend(generate_humidity_alerts(u.humidity_now, u.humidity_day));
    out.extend(generate_pressure_alerts(u.pressure_now, u.pressure_day));
    out.extend(generate_solar_alerts(u.solar_radiation_now, u.solar_radiation_hourly));
    out.extend(generate_uv_alerts(&SolarUvReading {
        uv: u.uv_index_now,
        avg_uv: u.uv_index_hourly,
        uv_max_day: u.uv_index_max_day,
        ..Default::default()
    }));
    out
}

/// Header, every alert re-prefixed with a warning glyph, then the all-clear
/// line if nothing was raised.
fn scoped(header: &str, fallback: &str, body: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(header.to_string());
    out.extend(body.into_iter().map(|a| format!("⚠️ {a}")));
    if out.len() <= 1 {
        out.push(fallback.to_string());
    }
    out
}

pub fn generate_current_alerts(s: &CurrentScope) -> Vec<String> {
    let mut body = Vec::new();
    body.extend(generate_temperature_alerts(&TemperatureReading {
        temp: s.temperature,
        feels: s.apparent_temperature,
        avg_temp_hour: s.avg_temperature_hourly,
        ..Default::default()
    }));
    body.extend(generate_rain_alerts(&RainReading {
        rain: s.rain,
        rain_prob: s.rain_prob,
        avg_rain_hour: s.avg_precipitation_hourly,
        gust: s.gust,
        terrain: s.terrain,
        ..Default::default()
    }));
    body.extend(generate_wind_alerts(&WindReading {
        speed: s.wind_speed,
        gust: s.gust,
        ..Default::default()
    }));
    body.extend(generate_cloud_alerts(s.cloudcover, None));
    body.extend(generate_dewpoint_alerts(s.dewpoint, None));
    body.extend(generate_visibility_alerts(s.visibility));
    body.extend(generate_humidity_alerts(s.humidity, None));
    body.extend(generate_pressure_alerts(s.pressure, None));
    body.extend(generate_solar_alerts(s.solar, None));
    body.extend(generate_uv_alerts(&SolarUvReading {
        uv: s.uv,
        ..Default::default()
    }));
    scoped(CURRENT_HEADER, CURRENT_FALLBACK, body)
}

pub fn generate_overview_alerts(s: &OverviewScope) -> Vec<String> {
    let mut body = Vec::new();
    body.extend(generate_temperature_alerts(&TemperatureReading {
        tmin: s.tmin,
        tmax: s.tmax,
        avg_temp: s.avg_temperature,
        ..Default::default()
    }));
    body.extend(generate_rain_alerts(&RainReading {
        rain_total_day: s.rain_total_day,
        avg_rain: s.avg_rain,
        terrain: s.terrain,
        ..Default::default()
    }));
    body.extend(generate_wind_alerts(&WindReading {
        avg_speed: s.avg_wind_speed,
        ..Default::default()
    }));
    body.extend(generate_cloud_alerts(None, s.cloudcover_mean));
    body.extend(generate_dewpoint_alerts(None, s.dewpoint_mean));
    body.extend(generate_visibility_alerts(s.visibility));
    body.extend(generate_humidity_alerts(None, s.avg_humidity));
    body.extend(generate_pressure_alerts(None, s.avg_pressure));
    body.extend(generate_solar_alerts(None, s.avg_solar));
    body.extend(generate_uv_alerts(&SolarUvReading {
        avg_uv: s.avg_uv,
        uv_max_day: s.uv_max_day,
        ..Default::default()
    }));
    scoped(OVERVIEW_HEADER, OVERVIEW_FALLBACK, body)
}

/* ============================ Categories ============================ */

const TEMP_KEYS: &[&str] = &["nhiệt độ", "sốc nhiệt", "hạ thân nhiệt", "nắng nóng", "nóng", "lạnh", "rét"];
const RAIN_KEYS: &[&str] = &["mưa", "lũ", "ngập", "mưa rào", "mưa to", "mưa đá", "dông", "giông"];
const WIND_KEYS: &[&str] = &["gió", "bão", "giật", "gió mạnh", "gió giật", "cấp gió"];
const HUMIDITY_KEYS: &[&str] = &["độ ẩm", "nồm", "ẩm mốc", "khô hạn", "ẩm ướt"];
const PRESSURE_KEYS: &[&str] = &["áp suất", "áp thấp", "cao áp", "baro", "barometric"];
const UV_KEYS: &[&str] = &["uv", "cháy nắng", "tia uv", "tia cực tím"];
const SOLAR_KEYS: &[&str] = &["bức xạ", "solar", "w/m²", "radiation"];

/// Alerts bucketed by keyword. Buckets overlap: one alert may appear in several.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedAlerts {
    pub temp: Vec<String>,
    pub rain: Vec<String>,
    pub wind: Vec<String>,
    pub humidity: Vec<String>,
    pub pressure: Vec<String>,
    pub uv: Vec<String>,
    pub solar: Vec<String>,
}

pub fn categorize_alerts(alerts: &[String]) -> CategorizedAlerts {
    let mut cats = CategorizedAlerts::default();
    for alert in alerts {
        let low = alert.to_lowercase();
        let has_any = |keys: &[&str]| keys.iter().any(|k| low.contains(k));
        let buckets: [(&[&str], &mut Vec<String>); 7] = [
            (TEMP_KEYS, &mut cats.temp),
            (RAIN_KEYS, &mut cats.rain),
            (WIND_KEYS, &mut cats.wind),
            (HUMIDITY_KEYS, &mut cats.humidity),
            (PRESSURE_KEYS, &mut cats.pressure),
            (UV_KEYS, &mut cats.uv),
            (SOLAR_KEYS, &mut cats.solar),
        ];
        for (keys, bucket) in buckets {
            if has_any(keys) {
                bucket.push(alert.clone());
            }
        }
    }
    cats
}
