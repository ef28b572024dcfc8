//! Descriptive sentences per variable.
//!
//! Unlike alerts, an insight is emitted whenever its input is present, even
//! when conditions are unremarkable. Aggregators always walk the variables in
//! the same order: temperature, rain, rain probability, wind, wind direction,
//! cloud, dew point, visibility, humidity, pressure, solar/UV.

use crate::classify::visibility::visibility_km;
use crate::classify::wind::wind_direction_to_text;
use crate::model::UnifiedRecord;
use crate::normalize::num;
use crate::readings::{
    CurrentScope, OverviewScope, SolarUvReading, TemperatureReading, WindReading,
};

pub const CURRENT_HEADER: &str = "⏱️ NHẬN ĐỊNH TÌNH HÌNH HIỆN TẠI:";
pub const CURRENT_FALLBACK: &str = "ℹ️ Không có nhận định đặc biệt cho tình hình hiện tại.";
pub const OVERVIEW_HEADER: &str = "📅 NHẬN ĐỊNH TỔNG QUAN TRONG NGÀY:";
pub const OVERVIEW_FALLBACK: &str = "ℹ️ Không có nhận định đặc biệt cho tổng quan trong ngày.";

/* ============================ Per variable ============================ */

pub fn interpret_temperature(r: &TemperatureReading) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(t) = r.temp {
        let band = if t >= 45.0 {
            "🔥 Nhiệt độ cực cao (≥45°C), nguy cơ sốc nhiệt nghiêm trọng."
        } else if t >= 40.0 {
            "🔥 Nhiệt độ rất cao (40–44°C), dễ gây oi bức."
        } else if t >= 35.0 {
            "🔥 Nắng nóng mạnh (35–39°C)."
        } else if t >= 30.0 {
            "🔥 Thời tiết nóng (30–34°C)."
        } else if t >= 25.0 {
            "🙂 Nhiệt độ ôn hòa, khá dễ chịu."
        } else if t >= 20.0 {
            "❄️ Thời tiết hơi lạnh (20–24°C)."
        } else if t >= 15.0 {
            "❄️ Trời lạnh (15–19°C), cần giữ ấm."
        } else {
            "❄️ Rét đậm (<15°C), nguy cơ hạ thân nhiệt."
        };
        out.push(band.to_string());
    }

    if let (Some(t), Some(f)) = (r.temp, r.feels) {
        let diff = f - t;
        if diff.abs() >= 3.0 {
            let sign = if diff > 0.0 { "nóng hơn" } else { "lạnh hơn" };
            out.push(format!(
                "🤔 Cảm giác thực tế {sign} {}°C so với nhiệt độ đo được.",
                num(diff.abs())
            ));
        } else {
            out.push("🙂 Cảm giác thực tế tương đồng với nhiệt độ đo được.".to_string());
        }
    }

    let mut avg_temp = r.avg_temp;
    if let (Some(lo), Some(hi)) = (r.tmin, r.tmax) {
        if hi - lo >= 10.0 {
            out.push("📈 Biên độ nhiệt trong ngày lớn, thời tiết thay đổi rõ rệt.".to_string());
        } else {
            out.push("📉 Biên độ nhiệt trong ngày nhỏ, biến thiên nhẹ.".to_string());
        }
        avg_temp = avg_temp.or(Some((lo + hi) / 2.0));
    }

    if let Some(avg) = avg_temp {
        out.push(format!("🌡️ Nhiệt độ trung bình ngày khoảng {}°C.", num(avg)));
    }

    if let (Some(t), Some(avg_hour)) = (r.temp, r.avg_temp_hour.filter(|a| *a > 0.0)) {
        let ratio = t / avg_hour;
        let line = if ratio >= 1.3 {
            "⚠️ Nhiệt độ hiện tại cao hơn đáng kể so với trung bình giờ."
        } else if ratio <= 0.7 {
            "⚠️ Nhiệt độ hiện tại thấp hơn đáng kể so với trung bình giờ."
        } else {
            "ℹ️ Nhiệt độ gần mức trung bình giờ."
        };
        out.push(line.to_string());
    }

    out
}

pub fn interpret_rain(rain: Option<f64>, rain_total_day: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(r) = rain {
        out.push(format!("🌧️ Lượng mưa hiện tại {} mm/h.", num(r)));
    }
    if let Some(total) = rain_total_day {
        out.push(format!("🌦️ Tổng lượng mưa ngày {} mm.", num(total)));
    }
    out
}

pub fn interpret_rain_probability(prob: Option<f64>) -> Vec<String> {
    let Some(p) = prob else { return Vec::new() };
    let line = if p >= 70.0 {
        format!("⚠️ Xác suất mưa cao ({p:.0}%), nên chuẩn bị áo mưa.")
    } else if p >= 40.0 {
        format!("ℹ️ Khả năng có mưa ({p:.0}%), theo dõi radar mưa.")
    } else {
        format!("🙂 Xác suất mưa thấp ({p:.0}%).")
    };
    vec![line]
}

pub fn interpret_wind(r: &WindReading) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(w) = r.speed {
        out.push(format!("💨 Gió hiện tại {} m/s.", num(w)));
        let storm = if w >= 50.5 {
            Some("⚠️ Gió rất mạnh (≥50.5 m/s), cực kỳ nguy hiểm.")
        } else if w >= 45.7 {
            Some("⚠️ Bão mạnh (≥45.7 m/s).")
        } else if w >= 40.5 {
            Some("⚠️ Có dấu hiệu bão (≥40.5 m/s).")
        } else if w >= 35.2 {
            Some("⚠️ Gió rất mạnh (≥35.2 m/s).")
        } else if w >= 30.8 {
            Some("⚠️ Gió mạnh (≥30.8 m/s).")
        } else {
            None
        };
        out.extend(storm.map(str::to_string));
    }
    if let Some(g) = r.gust {
        out.push(format!("🌬️ Gió giật {} m/s.", num(g)));
    }
    if let Some(avg) = r.avg_speed {
        out.push(format!("🍃 Gió trung bình ngày {} m/s.", num(avg)));
    }
    out
}

pub fn interpret_wind_direction(deg: Option<f64>) -> Vec<String> {
    let Some(d) = deg else { return Vec::new() };
    // Out-of-range bearings read as north.
    let name = if (0.0..360.0).contains(&d) {
        wind_direction_to_text(Some(d)).unwrap_or("Bắc")
    } else {
        "Bắc"
    };
    vec![
        format!("↔️ Hướng gió hiện tại {}°.", num(d)),
        format!("🌬️ Gió {name}."),
    ]
}

/// Uses its own 95/85/50 ladder, distinct from the block classifier.
pub fn interpret_cloudcover(cloud: Option<f64>, avg_cloud: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(c) = cloud {
        out.push(format!("☁️ Độ che phủ mây hiện tại {c:.0}%."));
        let line = if c >= 95.0 {
            "☁️ Trời u ám, mây dày đặc."
        } else if c >= 85.0 {
            "☁️ Nhiều mây, ánh sáng mặt trời hạn chế."
        } else if c >= 50.0 {
            "⛅ Mây vừa phải, trời khá thoáng."
        } else {
            "☀️ Trời quang đãng, hầu như không có mây."
        };
        out.push(line.to_string());
    }
    if let Some(avg) = avg_cloud {
        out.push(format!("☁️ Độ che phủ mây trung bình ngày {avg:.0}%."));
    }
    out
}

pub fn interpret_dewpoint(dew: Option<f64>, avg_dew: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(d) = dew {
        out.push(format!("🌡️ Điểm sương hiện tại {}°C.", num(d)));
        let line = if d >= 24.0 {
            "🔥 Điểm sương rất cao (≥24°C), không khí ngột ngạt, oi bức."
        } else if d >= 20.0 {
            "🌫️ Điểm sương cao (20–23°C), không khí ẩm, dễ đổ mồ hôi."
        } else if d >= 15.0 {
            "🙂 Điểm sương trung bình (15–19°C), không khí dễ chịu."
        } else if d >= 10.0 {
            "🍃 Điểm sương thấp (10–14°C), không khí khô ráo."
        } else {
            "❄️ Điểm sương rất thấp (<10°C), không khí khô hanh."
        };
        out.push(line.to_string());
    }
    if let Some(avg) = avg_dew {
        out.push(format!("🌡️ Điểm sương trung bình ngày {}°C.", num(avg)));
    }
    out
}

pub fn interpret_visibility(vis: Option<f64>) -> Vec<String> {
    let Some(raw) = vis else { return Vec::new() };
    let km = visibility_km(raw);
    let line = if km < 1.0 {
        "⚠️ Tầm nhìn rất hạn chế (<1 km), nguy hiểm khi di chuyển."
    } else if km < 5.0 {
        "⚠️ Tầm nhìn kém (<5 km), cần thận trọng khi lái xe."
    } else if km < 10.0 {
        "ℹ️ Tầm nhìn trung bình."
    } else {
        "🙂 Tầm nhìn xa, điều kiện thuận lợi."
    };
    vec![format!("👁️ Tầm nhìn hiện tại {} km.", num(km)), line.to_string()]
}

pub fn interpret_humidity(rh: Option<f64>, avg_rh: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(h) = rh {
        out.push(format!("💧 Độ ẩm hiện tại {h:.0}%."));
        let line = if h >= 95.0 {
            "⚠️ Độ ẩm rất cao (≥95%), dễ nồm ẩm, không khí bí, đồ đạc ẩm mốc."
        } else if h >= 85.0 {
            "⚠️ Độ ẩm cao (85–94%), nguy cơ nồm ẩm."
        } else if h >= 60.0 {
            "ℹ️ Độ ẩm trung bình (60–84%), khá dễ chịu."
        } else {
            "⚠️ Độ ẩm thấp (<60%), không khí khô hanh, dễ gây khô da và bệnh hô hấp."
        };
        out.push(line.to_string());
    }
    if let Some(avg) = avg_rh {
        out.push(format!("💧 Độ ẩm trung bình ngày {avg:.0}%."));
    }
    out
}

pub fn interpret_pressure(pmsl: Option<f64>, avg_pmsl: Option<f64>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(p) = pmsl {
        out.push(format!("⚖️ Áp suất hiện tại {p:.0} hPa."));
        let line = if p < 1000.0 {
            "⚠️ Áp suất thấp, có thể ảnh hưởng sức khỏe người già và trẻ nhỏ."
        } else if p > 1025.0 {
            "⚠️ Áp suất cao bất thường, có thể gây khó chịu, đau đầu hoặc ảnh hưởng tuần hoàn."
        } else {
            "ℹ️ Áp suất trong khoảng bình thường (1000–1025 hPa)."
        };
        out.push(line.to_string());
    }
    if let Some(avg) = avg_pmsl {
        out.push(format!("⚖️ Áp suất trung bình ngày {avg:.0} hPa."));
        let line = if avg < 1000.0 {
            "⚠️ Áp suất trung bình thấp trong ngày, có thể ảnh hưởng sức khỏe."
        } else if avg > 1025.0 {
            "⚠️ Áp suất trung bình cao trong ngày, có thể ảnh hưởng sức khỏe tim mạch."
        } else {
            "ℹ️ Áp suất trung bình trong khoảng bình thường (1000–1025 hPa)."
        };
        out.push(line.to_string());
    }
    out
}

pub fn interpret_solar_uv(r: &SolarUvReading) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(s) = r.solar {
        out.push(format!("🔆 Bức xạ mặt trời hiện tại {s:.0} W/m²."));
        let line = if s >= 800.0 {
            "⚠️ Bức xạ mặt trời cao, nguy cơ cháy nắng và ảnh hưởng sức khỏe."
        } else if s >= 400.0 {
            "ℹ️ Bức xạ mặt trời trung bình, có thể phơi nắng vừa phải."
        } else {
            "🔆 Bức xạ mặt trời yếu (<400 W/m²)."
        };
        out.push(line.to_string());
    }

    if let Some(avg) = r.avg_solar {
        out.push(format!("🔆 Bức xạ mặt trời trung bình ngày {avg:.0} W/m²."));
        if avg >= 600.0 {
            out.push("⚠️ Bức xạ mặt trời trung bình cao trong ngày, cần hạn chế phơi nắng lâu.".to_string());
        }
    }

    if let Some(u) = r.uv {
        out.push(format!("☀️ UV hiện tại {}.", num(u)));
        let line = if u >= 11.0 {
            "☀️ UV cực đoan (≥11), tránh nắng hoàn toàn."
        } else if u >= 8.0 {
            "🚨 UV rất cao (8–10), cần bảo vệ da và mắt."
        } else if u >= 6.0 {
            "⚠️ UV cao (6–7), nên dùng kem chống nắng."
        } else if u >= 3.0 {
            "ℹ️ UV trung bình (3–5), cần lưu ý khi ra ngoài lâu."
        } else {
            "🙂 UV thấp (0–2), an toàn khi ra ngoài."
        };
        out.push(line.to_string());
    }

    if let Some(avg) = r.avg_uv {
        out.push(format!("☀️ UV trung bình ngày {}.", num(avg)));
        if avg >= 8.0 {
            out.push("⚠️ UV trung bình rất cao trong ngày, cần bảo vệ da khi hoạt động ngoài trời.".to_string());
        } else if avg >= 6.0 {
            out.push("⚠️ UV trung bình cao trong ngày, nên dùng kem chống nắng.".to_string());
        }
    }

    if let Some(max) = r.uv_max_day {
        out.push(format!("☀️ UV tối đa trong ngày {}.", num(max)));
        let line = if max >= 11.0 {
            "☀️ UV tối đa cực đoan trong ngày, nguy cơ cháy nắng mạnh."
        } else if max >= 8.0 {
            "🚨 UV tối đa rất cao trong ngày, cần bảo vệ da và mắt."
        } else if max >= 6.0 {
            "⚠️ UV tối đa cao trong ngày, nên dùng kem chống nắng."
        } else if max >= 3.0 {
            "ℹ️ UV tối đa trung bình trong ngày, cần lưu ý khi ra ngoài lâu."
        } else {
            "🙂 UV tối đa thấp trong ngày, khá an toàn."
        };
        out.push(line.to_string());
    }

    out
}

/* ============================ Aggregators ============================ */

/// Every insight over the full record.
pub fn generate_all_insights(u: &UnifiedRecord) -> Vec<String> {
    let mut out = Vec::new();
    out.extend(interpret_temperature(&TemperatureReading {
        temp: u.temperature_now,
        feels: u.apparent_temperature_now,
        tmin: u.temperature_min_day,
        tmax: u.temperature_max_day,
        avg_temp: u.temperature_day,
        avg_temp_hour: u.temperature_hourly,
    }));
    out.extend(interpret_rain(u.precipitation_now, u.precipitation_sum_day));
    out.extend(interpret_rain_probability(u.precipitation_probability_now));
    out.extend(interpret_rain_probability(u.precipitation_probability_day));
    out.extend(interpret_wind(&WindReading {
        speed: u.wind_speed_now,
        gust: u.gust_now,
        avg_speed: u.wind_speed_hourly,
        direction: None,
    }));
    out.extend(interpret_wind_direction(u.wind_direction_now));
    out.extend(interpret_cloudcover(u.cloudcover_now, u.cloudcover_mean));
    out.extend(interpret_dewpoint(u.dewpoint_now, u.dewpoint_mean));
    out.extend(interpret_visibility(u.visibility_now));
    out.extend(interpret_humidity(u.humidity_now, u.humidity_day));
    out.extend(interpret_pressure(u.pressure_now, u.pressure_day));
    out.extend(interpret_solar_uv(&SolarUvReading {
        solar: u.solar_radiation_now,
        avg_solar: u.solar_radiation_hourly,
        uv: u.uv_index_now,
        avg_uv: u.uv_index_hourly,
        uv_max_day: u.uv_index_max_day,
    }));
    out
}

fn with_header(header: &str, fallback: &str, body: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(header.to_string());
    out.extend(body);
    if out.len() <= 1 {
        out.push(fallback.to_string());
    }
    out
}

pub fn generate_current_insights(s: &CurrentScope) -> Vec<String> {
    let mut body = Vec::new();
    body.extend(interpret_temperature(&TemperatureReading {
        temp: s.temperature,
        feels: s.apparent_temperature,
        avg_temp_hour: s.avg_temperature_hourly,
        ..Default::default()
    }));
    body.extend(interpret_rain(s.rain, None));
    body.extend(interpret_rain_probability(s.rain_prob));
    body.extend(interpret_wind(&WindReading {
        speed: s.wind_speed,
        gust: s.gust,
        ..Default::default()
    }));
    body.extend(interpret_wind_direction(s.wind_direction));
    body.extend(interpret_cloudcover(s.cloudcover, None));
    body.extend(interpret_dewpoint(s.dewpoint, None));
    body.extend(interpret_visibility(s.visibility));
    body.extend(interpret_humidity(s.humidity, None));
    body.extend(interpret_pressure(s.pressure, None));
    body.extend(interpret_solar_uv(&SolarUvReading {
        solar: s.solar,
        uv: s.uv,
        uv_max_day: s.uv_max_day,
        ..Default::default()
    }));
    with_header(CURRENT_HEADER, CURRENT_FALLBACK, body)
}

pub fn generate_overview_insights(s: &OverviewScope) -> Vec<String> {
    let mut body = Vec::new();
    body.extend(interpret_temperature(&TemperatureReading {
        tmin: s.tmin,
        tmax: s.tmax,
        avg_temp: s.avg_temperature,
        ..Default::default()
    }));
    body.extend(interpret_rain(None, s.rain_total_day));
    body.extend(interpret_rain_probability(s.rain_prob_day));
    body.extend(interpret_wind(&WindReading {
        avg_speed: s.avg_wind_speed,
        ..Default::default()
    }));
    body.extend(interpret_cloudcover(None, s.cloudcover_mean));
    body.extend(interpret_dewpoint(None, s.dewpoint_mean));
    body.extend(interpret_visibility(s.visibility));
    body.extend(interpret_humidity(None, s.avg_humidity));
    body.extend(interpret_pressure(None, s.avg_pressure));
    body.extend(interpret_solar_uv(&SolarUvReading {
        avg_solar: s.avg_solar,
        avg_uv: s.avg_uv,
        uv_max_day: s.uv_max_day,
        ..Default::default()
    }));
    with_header(OVERVIEW_HEADER, OVERVIEW_FALLBACK, body)
}
