use crate::normalize::round1;

/// Rain tiers by instantaneous rate (mm/h). Boundaries belong to the upper tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RainLevel {
    Dry,
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
}

impl RainLevel {
    /// Classifies the raw, unrounded rate.
    pub fn from_rate(mm: f64) -> Self {
        if mm >= 50.0 {
            RainLevel::VeryHeavy
        } else if mm >= 20.0 {
            RainLevel::Heavy
        } else if mm >= 5.0 {
            RainLevel::Moderate
        } else if mm > 0.0 {
            RainLevel::Light
        } else {
            RainLevel::Dry
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RainLevel::VeryHeavy => "🌧️ Mưa rất lớn, nguy cơ ngập úng và lũ diện rộng.",
            RainLevel::Heavy => "🌧️ Mưa lớn, cần cảnh giác ngập úng.",
            RainLevel::Moderate => "🌦️ Mưa vừa, ảnh hưởng sinh hoạt ngoài trời.",
            RainLevel::Light => "☔ Mưa nhẹ, ít ảnh hưởng.",
            RainLevel::Dry => "🙂 Không mưa.",
        }
    }
}

pub fn classify_rain_level(rain: Option<f64>) -> Option<&'static str> {
    rain.map(|r| RainLevel::from_rate(r).label())
}

/// Current rate relative to the hourly mean.
pub fn compute_rain_intensity(rain: Option<f64>, avg_rain_hour: Option<f64>) -> Option<f64> {
    let avg = avg_rain_hour.filter(|a| *a > 0.0)?;
    round1(Some(rain? / avg))
}

pub fn interpret_rain_probability(prob: Option<f64>) -> Option<&'static str> {
    let p = prob?;
    Some(if p >= 70.0 {
        "⚠️ Xác suất mưa cao, nên chuẩn bị áo mưa/ô."
    } else if p >= 40.0 {
        "ℹ️ Khả năng có mưa, cần theo dõi."
    } else {
        "✅ Khả năng mưa thấp."
    })
}
