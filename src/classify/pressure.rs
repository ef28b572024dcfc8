use super::Region;

pub fn classify_pressure(pmsl: Option<f64>, region: Region) -> Option<&'static str> {
    let p = pmsl?;
    let label = match region {
        Region::North if p >= 1025.0 => "⚖️ Áp suất cao (≥1025 hPa), thời tiết thường ổn định, trời quang.",
        Region::North if p <= 1000.0 => "⚠️ Áp suất thấp (≤1000 hPa), dễ xuất hiện mưa, dông hoặc thời tiết bất ổn.",
        Region::CentralSouth if p >= 1020.0 => "⚖️ Áp suất cao (≥1020 hPa), thời tiết thường ổn định.",
        Region::CentralSouth if p <= 1005.0 => "⚠️ Áp suất thấp (≤1005 hPa), dễ xuất hiện mưa, dông.",
        _ => "🙂 Áp suất ở mức trung bình, thời tiết tương đối ổn định.",
    };
    Some(label)
}
