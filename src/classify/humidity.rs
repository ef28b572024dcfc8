use super::Region;
use crate::normalize::round1;

pub fn classify_humidity(rh: Option<f64>) -> Option<&'static str> {
    let r = rh?;
    Some(if r >= 90.0 {
        "💧 Độ ẩm rất cao (≥90%), dễ nồm ẩm, không khí bí, đồ đạc ẩm mốc."
    } else if r >= 70.0 {
        "💧 Độ ẩm cao (≥70%), cảm giác ẩm ướt, khó thoát mồ hôi."
    } else if r <= 30.0 {
        "🔥 Độ ẩm thấp (≤30%), dễ khô da, tăng nguy cơ kích ứng."
    } else {
        "🙂 Độ ẩm ở mức trung bình, tương đối dễ chịu."
    })
}

/// Additive humidity corrections to the apparent temperature. The three
/// conditions are independent and may stack.
pub fn adjust_feels_by_humidity(
    temp: Option<f64>,
    feels: Option<f64>,
    humidity: Option<f64>,
    region: Region,
) -> Option<f64> {
    let (t, mut adjusted) = (temp?, feels?);
    let (damp_cold, muggy, dry) = if region.is_north() {
        (-1.5, 0.5, -0.5)
    } else {
        (-1.0, 1.0, -0.3)
    };

    if let Some(h) = humidity {
        if h >= 90.0 && t <= 22.0 {
            adjusted += damp_cold;
        }
        if h >= 70.0 && t > 25.0 {
            adjusted += muggy;
        }
        if h <= 30.0 {
            adjusted += dry;
        }
    }
    round1(Some(adjusted))
}
