//! Wall-clock access and Vietnam-local time formatting.
//!
//! Builders never read the system clock themselves. They take a
//! `now: DateTime<FixedOffset>` so tests can pin day/night and "today".

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, Timelike, Utc};

/// Asia/Ho_Chi_Minh has no DST; a fixed +07:00 is exact.
pub const VN_UTC_OFFSET_SECS: i32 = 7 * 3600;

const WEEKDAYS_VI: [&str; 7] = [
    "Thứ Hai", "Thứ Ba", "Thứ Tư", "Thứ Năm", "Thứ Sáu", "Thứ Bảy", "Chủ Nhật",
];

pub fn vn_offset() -> FixedOffset {
    FixedOffset::east_opt(VN_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Real time, expressed in UTC+7.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&vn_offset())
    }
}

/// Day is 06:00 (inclusive) to 18:00 (exclusive) local time.
pub fn is_night(now: &DateTime<FixedOffset>) -> bool {
    let h = now.hour();
    !(6..18).contains(&h)
}

/// `HH:MM • <weekday>, dd/mm/YYYY`
pub fn observation_stamp(now: &DateTime<FixedOffset>) -> String {
    let weekday = WEEKDAYS_VI[now.weekday().num_days_from_monday() as usize];
    format!("{} • {weekday}, {}", now.format("%H:%M"), now.format("%d/%m/%Y"))
}

/// ISO date used to pick "today" out of hourly series by prefix.
pub fn today_prefix(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Series timestamp of the current local hour, e.g. `2025-06-01T14:00`.
pub fn hour_key(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%dT%H:00").to_string()
}

/// Parses ISO-8601 with or without a zone; zoneless input is taken as UTC.
pub fn parse_iso(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    parse_naive(raw).map(|n| n.and_utc().fixed_offset())
}

pub fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
}

/// Sunrise/sunset display in local time; unparseable input is echoed as-is.
pub fn local_display(raw: &str) -> String {
    match parse_iso(raw) {
        Some(dt) => dt.with_timezone(&vn_offset()).format("%H:%M, %d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}
