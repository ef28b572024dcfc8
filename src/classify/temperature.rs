use super::Region;
use crate::normalize::round1;

/// Daily mean, or the midpoint of min and max when the mean is missing.
pub fn compute_avg_temp(avg: Option<f64>, tmin: Option<f64>, tmax: Option<f64>) -> Option<f64> {
    if avg.is_some() {
        return round1(avg);
    }
    match (tmin, tmax) {
        (Some(lo), Some(hi)) => round1(Some((lo + hi) / 2.0)),
        _ => None,
    }
}

/// Apparent temperature corrected for wind chill and damp cold.
///
/// Wind above 2 m/s removes `wind / 4`, capped at 6 when the air is warmer
/// than 20°C. Cool (≤22°C) saturated air (≥85%) removes another degree.
pub fn compute_adjusted_feels(
    temp: Option<f64>,
    feels: Option<f64>,
    wind: Option<f64>,
    humidity: Option<f64>,
) -> Option<f64> {
    let (t, mut adjusted) = (temp?, feels?);

    if let Some(w) = wind.filter(|w| *w > 2.0) {
        let mut reduction = w / 4.0;
        if t > 20.0 {
            reduction = reduction.min(6.0);
        }
        adjusted -= reduction;
    }
    if t <= 22.0 && humidity.is_some_and(|h| h >= 85.0) {
        adjusted -= 1.0;
    }
    round1(Some(adjusted))
}

pub fn compute_feels_gap(
    temp: Option<f64>,
    feels: Option<f64>,
    wind: Option<f64>,
    humidity: Option<f64>,
) -> Option<f64> {
    let adjusted = compute_adjusted_feels(temp, feels, wind, humidity)?;
    round1(Some(adjusted - temp?))
}

pub fn compute_diurnal_range(tmin: Option<f64>, tmax: Option<f64>) -> Option<f64> {
    round1(Some(tmax? - tmin?))
}

/// Ratio of the reading to the hourly mean; undefined for a non-positive mean.
pub fn compute_hourly_anomaly(temp: Option<f64>, avg_hour: Option<f64>) -> Option<f64> {
    let avg = avg_hour.filter(|a| *a > 0.0)?;
    round1(Some(temp? / avg))
}

/// Eight tiers. The warm half is shared; the north tolerates cold better,
/// so its "cool" band starts at 18°C instead of 20°C.
pub fn classify_temp_level(temp: Option<f64>, region: Region) -> Option<&'static str> {
    let t = temp?;
    let label = if t >= 40.0 {
        "🔥 Cực kỳ nóng (≥40°C)"
    } else if t >= 35.0 {
        "🌡️ Rất nóng (≥35°C)"
    } else if t >= 30.0 {
        "☀️ Nóng (30–34°C)"
    } else if t >= 25.0 {
        "🙂 Ấm áp (25–29°C)"
    } else if region.is_north() {
        if t >= 18.0 {
            "🌤️ Mát mẻ (18–24°C)"
        } else if t >= 10.0 {
            "🥶 Lạnh (10–17°C)"
        } else if t > 0.0 {
            "❄️ Rất lạnh (1–9°C)"
        } else {
            "🧊 Cực lạnh (≤0°C)"
        }
    } else if t >= 20.0 {
        "🌤️ Mát mẻ (20–24°C)"
    } else if t >= 15.0 {
        "🥶 Lạnh (15–19°C)"
    } else if t > 0.0 {
        "❄️ Rất lạnh (1–14°C)"
    } else {
        "🧊 Cực lạnh (≤0°C)"
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_temp_level_shared_warm_tiers() {
        for region in [Region::North, Region::CentralSouth] {
            assert_eq!(classify_temp_level(Some(40.0), region), Some("🔥 Cực kỳ nóng (≥40°C)"));
            assert_eq!(classify_temp_level(Some(36.0), region), Some("🌡️ Rất nóng (≥35°C)"));
            assert_eq!(classify_temp_level(Some(30.0), region), Some("☀️ Nóng (30–34°C)"));
            assert_eq!(classify_temp_level(Some(25.0), region), Some("🙂 Ấm áp (25–29°C)"));
        }
    }

    #[test]
    fn test_temp_level_regional_cold_boundary() {
        assert_eq!(classify_temp_level(Some(19.0), Region::North), Some("🌤️ Mát mẻ (18–24°C)"));
        assert_eq!(classify_temp_level(Some(19.0), Region::CentralSouth), Some("🥶 Lạnh (15–19°C)"));
        assert_eq!(classify_temp_level(Some(12.0), Region::North), Some("🥶 Lạnh (10–17°C)"));
        assert_eq!(classify_temp_level(Some(12.0), Region::CentralSouth), Some("❄️ Rất lạnh (1–14°C)"));
        assert_eq!(classify_temp_level(Some(0.0), Region::North), Some("🧊 Cực lạnh (≤0°C)"));
        assert_eq!(classify_temp_level(None, Region::North), None);
    }

    #[test]
    fn test_adjusted_feels_wind_chill_and_damp_cold() {
        // 40 m/s would remove 10°C; the cap holds it to 6 above 20°C.
        assert_relative_eq!(compute_adjusted_feels(Some(30.0), Some(33.0), Some(40.0), None).unwrap(), 27.0);
        // Below 20°C the cap does not apply.
        assert_relative_eq!(compute_adjusted_feels(Some(15.0), Some(15.0), Some(40.0), None).unwrap(), 5.0);
        // Light wind is ignored; damp cold removes a degree.
        assert_relative_eq!(compute_adjusted_feels(Some(20.0), Some(19.0), Some(2.0), Some(90.0)).unwrap(), 18.0);
        assert_eq!(compute_adjusted_feels(None, Some(19.0), None, None), None);
    }

    #[test]
    fn test_derived_metrics() {
        assert_relative_eq!(compute_feels_gap(Some(30.0), Some(33.0), Some(8.0), None).unwrap(), 1.0);
        assert_relative_eq!(compute_diurnal_range(Some(24.5), Some(33.0)).unwrap(), 8.5);
        assert_relative_eq!(compute_hourly_anomaly(Some(36.0), Some(30.0)).unwrap(), 1.2);
        assert_eq!(compute_hourly_anomaly(Some(36.0), Some(0.0)), None);
        assert_eq!(compute_hourly_anomaly(Some(36.0), Some(-2.0)), None);
        assert_relative_eq!(compute_avg_temp(None, Some(24.0), Some(33.0)).unwrap(), 28.5);
        assert_relative_eq!(compute_avg_temp(Some(27.04), Some(24.0), Some(33.0)).unwrap(), 27.0);
        assert_eq!(compute_avg_temp(None, Some(24.0), None), None);
    }
}
