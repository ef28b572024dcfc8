use crate::normalize::round1;

/// Classifies visibility in km, after rounding to one decimal.
pub fn classify_visibility(km: Option<f64>) -> Option<&'static str> {
    let v = round1(km)?;
    Some(if v >= 10.0 {
        "👀 Tầm nhìn xa, điều kiện lý tưởng."
    } else if v >= 5.0 {
        "👀 Tầm nhìn tốt, ít ảnh hưởng giao thông."
    } else if v >= 2.0 {
        "⚠️ Tầm nhìn hạn chế, cần thận trọng khi lái xe."
    } else if v >= 1.0 {
        "⚠️ Tầm nhìn kém, nguy hiểm cho giao thông."
    } else {
        "🚨 Tầm nhìn rất kém (<1 km), nguy cơ cao tai nạn."
    })
}

/// Providers disagree on units; anything above 100 is taken as metres.
pub fn visibility_km(raw: f64) -> f64 {
    if raw > 100.0 { raw / 1000.0 } else { raw }
}
