//! Wind classification. Every speed is m/s.

use super::Region;
use crate::normalize::round1;

const COMPASS_VI: [&str; 8] = [
    "Bắc", "Đông Bắc", "Đông", "Đông Nam", "Nam", "Tây Nam", "Tây", "Tây Bắc",
];

/// Upper bounds (exclusive) of Beaufort forces 0..=11; anything above is 12.
const BEAUFORT_UPPER: [f64; 12] = [
    0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

/// Perceived wind: `0.7·speed + 0.3·min(gust, 1.5·speed)`. A missing gust
/// collapses to the sustained speed.
pub fn compute_effective_wind(speed: Option<f64>, gust: Option<f64>) -> Option<f64> {
    let w = speed?;
    let g_eff = gust.map_or(w, |g| g.min(w * 1.5));
    round1(Some(0.7 * w + 0.3 * g_eff))
}

/// Tiers on the effective wind. Monsoon-exposed northerners notice wind later.
pub fn classify_wind_level(speed: Option<f64>, gust: Option<f64>, region: Region) -> Option<&'static str> {
    let eff = compute_effective_wind(speed, gust)?;
    let (very_strong, strong, moderate) = if region.is_north() {
        (20.0, 12.0, 6.0)
    } else {
        (15.0, 8.0, 4.0)
    };
    Some(if eff >= very_strong {
        "💨 Gió rất mạnh, nguy hiểm khi di chuyển ngoài trời."
    } else if eff >= strong {
        "💨 Gió mạnh, có thể gây khó khăn khi đi lại."
    } else if eff >= moderate {
        "🍃 Gió vừa, cảm nhận rõ rệt."
    } else if eff > 0.0 {
        "🍃 Gió nhẹ, thoáng mát."
    } else {
        "🙂 Lặng gió."
    })
}

/// Beaufort force of the sustained wind: the average when known, else the instant reading.
pub fn classify_wind_beaufort(speed: Option<f64>, avg_speed: Option<f64>) -> Option<u8> {
    let sustained = avg_speed.or(speed)?;
    let force = BEAUFORT_UPPER
        .iter()
        .position(|upper| sustained < *upper)
        .unwrap_or(BEAUFORT_UPPER.len());
    u8::try_from(force).ok()
}

pub fn interpret_gust(gust: Option<f64>, speed: Option<f64>, region: Region) -> Option<&'static str> {
    let (g, w) = (gust?, speed?);
    let (floor, strong_ratio, notable_ratio) = if region.is_north() {
        (6.0, 1.6, 1.3)
    } else {
        (5.0, 1.4, 1.2)
    };
    Some(if g >= f64::max(floor, w * strong_ratio) {
        "⚠️ Gió giật mạnh hơn nhiều so với gió trung bình."
    } else if g >= w * notable_ratio {
        "ℹ️ Có gió giật, cần chú ý."
    } else {
        "🙂 Gió giật không đáng kể."
    })
}

/// Eight-point compass name, `floor((deg + 22.5) / 45) mod 8`.
pub fn wind_direction_to_text(deg: Option<f64>) -> Option<&'static str> {
    let d = deg?;
    let idx = (((d + 22.5).rem_euclid(360.0)) / 45.0).floor() as usize;
    COMPASS_VI.get(idx % COMPASS_VI.len()).copied()
}

/// Apparent temperature lowered by a quarter of the effective wind.
/// The drop is capped at 6 (north) or 5 (elsewhere), 7 elsewhere when ≤20°C.
pub fn adjust_feels_by_wind(
    temp: Option<f64>,
    feels: Option<f64>,
    speed: Option<f64>,
    gust: Option<f64>,
    region: Region,
) -> Option<f64> {
    let (t, f) = (temp?, feels?);
    let eff = compute_effective_wind(speed, gust)?;
    let max_drop = match region {
        Region::North => 6.0,
        Region::CentralSouth if t <= 20.0 => 7.0,
        Region::CentralSouth => 5.0,
    };
    round1(Some(f - (eff / 4.0).min(max_drop)))
}
