use serde::Serialize;

use crate::normalize::round1;

pub fn classify_cloudcover(cloud: Option<f64>) -> Option<&'static str> {
    let c = cloud?;
    Some(if c >= 90.0 {
        "☁️ Trời u ám, mây dày đặc."
    } else if c >= 60.0 {
        "☁️ Nhiều mây, ánh sáng mặt trời hạn chế."
    } else if c >= 30.0 {
        "⛅ Ít mây, trời khá thoáng."
    } else {
        "☀️ Trời quang đãng, hầu như không có mây."
    })
}

pub fn classify_dewpoint(dew: Option<f64>) -> Option<&'static str> {
    let d = dew?;
    Some(if d >= 24.0 {
        "💧 Điểm sương rất cao, không khí ngột ngạt, dễ cảm thấy oi bức."
    } else if d >= 20.0 {
        "💧 Điểm sương cao, không khí ẩm, dễ đổ mồ hôi."
    } else if d >= 16.0 {
        "💧 Điểm sương trung bình, không khí dễ chịu."
    } else if d >= 10.0 {
        "💧 Điểm sương thấp, không khí khô ráo."
    } else {
        "💧 Điểm sương rất thấp, không khí khô hanh."
    })
}

/// Rounded cloud cover and dew point with their labels, shared by both blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CloudDew {
    pub cloudcover: Option<f64>,
    pub cloudcover_level: Option<&'static str>,
    pub dewpoint: Option<f64>,
    pub dewpoint_level: Option<&'static str>,
}

impl CloudDew {
    pub fn new(cloud: Option<f64>, dew: Option<f64>) -> Self {
        Self {
            cloudcover: round1(cloud),
            cloudcover_level: classify_cloudcover(cloud),
            dewpoint: round1(dew),
            dewpoint_level: classify_dewpoint(dew),
        }
    }
}
