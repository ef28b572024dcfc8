//! Solar radiation and UV. Night overrides every other input.

use super::Region;
use crate::normalize::{num, round_tenth};

pub const SOLAR_NIGHT: &str = "🌙 Ban đêm, không có bức xạ mặt trời.";
pub const UV_NIGHT: &str = "🌙 Ban đêm, chỉ số UV bằng 0.";

pub fn classify_solar(
    solar: Option<f64>,
    region: Region,
    cloudcover: Option<f64>,
    is_night: bool,
) -> Option<&'static str> {
    if is_night {
        return Some(SOLAR_NIGHT);
    }
    let s = solar.filter(|s| *s >= 0.0)?;

    match cloudcover {
        Some(c) if c >= 90.0 => return Some("🔆 Bức xạ mặt trời rất thấp do mây dày đặc."),
        Some(c) if c >= 70.0 => return Some("🔆 Bức xạ mặt trời thấp do mây che phủ nhiều."),
        _ => {}
    }

    Some(match region {
        Region::North if s >= 800.0 => "🔆 Bức xạ mặt trời rất mạnh (≥800 W/m²), trời nắng gắt.",
        Region::North if s >= 400.0 => "🔆 Bức xạ mặt trời trung bình (400–800 W/m²).",
        Region::North => "🔆 Bức xạ mặt trời yếu (<400 W/m²).",
        Region::CentralSouth if s >= 700.0 => "🔆 Bức xạ mặt trời mạnh (≥700 W/m²).",
        Region::CentralSouth if s >= 350.0 => "🔆 Bức xạ mặt trời trung bình (350–700 W/m²).",
        Region::CentralSouth => "🔆 Bức xạ mặt trời yếu (<350 W/m²).",
    })
}

/// UV after attenuation: any rain removes 2, cloud ≥70% removes 1 (≥90% removes 2).
pub fn effective_uv(uv: f64, precipitation: Option<f64>, cloudcover: Option<f64>) -> f64 {
    let mut reduction = 0.0;
    if precipitation.is_some_and(|r| r > 0.0) {
        reduction += 2.0;
    }
    match cloudcover {
        Some(c) if c >= 90.0 => reduction += 2.0,
        Some(c) if c >= 70.0 => reduction += 1.0,
        _ => {}
    }
    (uv - reduction).max(0.0)
}

pub fn classify_uv(
    uv: Option<f64>,
    precipitation: Option<f64>,
    cloudcover: Option<f64>,
    is_night: bool,
) -> Option<&'static str> {
    if is_night {
        return Some(UV_NIGHT);
    }
    let u = effective_uv(uv.filter(|u| *u >= 0.0)?, precipitation, cloudcover);
    Some(if u >= 11.0 {
        "☀️ UV cực đoan (≥11), tránh nắng hoàn toàn."
    } else if u >= 8.0 {
        "☀️ UV rất cao (8–10), cần bảo vệ da và mắt."
    } else if u >= 6.0 {
        "☀️ UV cao (6–7), nên dùng kem chống nắng."
    } else if u >= 3.0 {
        "ℹ️ UV trung bình (3–5), cần lưu ý khi ra ngoài lâu."
    } else {
        "🙂 UV thấp (0–2), an toàn khi ra ngoài."
    })
}

/// Daily accumulated radiation, switching to kWh/m² from 1000 Wh/m².
pub fn format_solar_sum(sum: Option<f64>) -> String {
    let Some(v) = sum.map(round_tenth) else {
        return "0 Wh/m² (không có số liệu)".to_string();
    };
    if v < 1000.0 {
        format!("{} Wh/m² (tổng tích lũy ngày)", num(v))
    } else {
        format!("{} kWh/m² (tổng tích lũy ngày)", num(v / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_overrides_everything() {
        for value in [None, Some(0.0), Some(1200.0)] {
            assert_eq!(classify_solar(value, Region::North, Some(0.0), true), Some(SOLAR_NIGHT));
            assert_eq!(classify_uv(value, None, None, true), Some(UV_NIGHT));
        }
    }

    #[test]
    fn test_solar_cloud_override_then_region() {
        assert!(classify_solar(Some(900.0), Region::North, Some(95.0), false).unwrap().contains("rất thấp"));
        assert!(classify_solar(Some(900.0), Region::North, Some(75.0), false).unwrap().contains("thấp do mây"));
        assert!(classify_solar(Some(900.0), Region::North, Some(10.0), false).unwrap().contains("≥800"));
        assert!(classify_solar(Some(750.0), Region::North, None, false).unwrap().contains("400–800"));
        assert!(classify_solar(Some(750.0), Region::CentralSouth, None, false).unwrap().contains("≥700"));
        assert!(classify_solar(Some(300.0), Region::CentralSouth, None, false).unwrap().contains("<350"));
        assert_eq!(classify_solar(Some(-1.0), Region::North, None, false), None);
        assert_eq!(classify_solar(None, Region::North, None, false), None);
    }

    #[test]
    fn test_uv_attenuation_stacks_and_floors() {
        assert_eq!(effective_uv(9.0, Some(1.0), Some(95.0)), 5.0);
        assert_eq!(effective_uv(9.0, Some(0.0), Some(75.0)), 8.0);
        assert_eq!(effective_uv(1.0, Some(3.0), Some(95.0)), 0.0);
        assert!(classify_uv(Some(9.0), Some(1.0), Some(95.0), false).unwrap().contains("3–5"));
        assert!(classify_uv(Some(11.0), None, None, false).unwrap().contains("≥11"));
        assert!(classify_uv(Some(2.0), None, None, false).unwrap().contains("0–2"));
        assert_eq!(classify_uv(Some(-0.5), None, None, false), None);
    }

    #[test]
    fn test_solar_sum_formatting() {
        assert_eq!(format_solar_sum(Some(850.0)), "850.0 Wh/m² (tổng tích lũy ngày)");
        assert_eq!(format_solar_sum(Some(21_540.0)), "21.5 kWh/m² (tổng tích lũy ngày)");
        assert_eq!(format_solar_sum(None), "0 Wh/m² (không có số liệu)");
    }
}
