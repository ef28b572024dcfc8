//! Bulletin composition: blocks, insights, alerts, severity ranking and icon.

use chrono::{DateTime, FixedOffset};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::alerts::{
    CategorizedAlerts, categorize_alerts, generate_all_alerts, generate_current_alerts,
    generate_overview_alerts,
};
use crate::blocks::{
    CurrentValues, OverviewInput, OverviewValues, build_current_block, build_overview_block,
    build_summary,
};
use crate::classify::{Region, Terrain};
use crate::error::SourceError;
use crate::insights::{generate_all_insights, generate_current_insights, generate_overview_insights};
use crate::model::{
    CurrentConditions, DailyAggregates, ForecastTriple, HourlyAggregates, UnifiedRecord,
    map_to_unified,
};
use crate::normalize::DASH;
use crate::readings::{CurrentScope, OverviewScope};
use crate::source::{Location, WeatherSource};

const WIND_UNIT: &str = "m/s";

/* ============================ Status & icon ============================ */

/// Vietnamese phrase for a WMO weather code; unmapped codes are a dash.
pub fn code_to_text(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "Quang mây",
        Some(1) => "Ít mây",
        Some(2) => "Mây vừa",
        Some(3) => "Nhiều mây",
        Some(45) => "Sương mù",
        Some(48) => "Sương mù (sương đóng băng)",
        Some(51) => "Mưa phùn nhẹ",
        Some(53) => "Mưa phùn vừa",
        Some(55) => "Mưa phùn nặng",
        Some(61) => "Mưa nhẹ",
        Some(63) => "Mưa vừa",
        Some(65) => "Mưa to",
        Some(80) => "Mưa rào nhẹ",
        Some(81) => "Mưa rào vừa",
        Some(82) => "Mưa rào nặng",
        Some(95) => "Dông",
        Some(96) => "Dông (mưa đá nhẹ)",
        Some(99) => "Dông (mưa đá mạnh)",
        _ => DASH,
    }
}

/// Serialized as its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletinIcon {
    Sun,
    Cloud,
    Rain,
    Snow,
    Storm,
    DangerRed,
    WarningOrange,
    InfoGreen,
    Default,
}

impl BulletinIcon {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Sun => "sun.ico",
            Self::Cloud => "cloud.ico",
            Self::Rain => "rain.ico",
            Self::Snow => "snow.ico",
            Self::Storm => "storm.ico",
            Self::DangerRed => "danger_red.ico",
            Self::WarningOrange => "warning_orange.ico",
            Self::InfoGreen => "info_green.ico",
            Self::Default => "default.ico",
        }
    }
}

impl Serialize for BulletinIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.file_name())
    }
}

const STATUS_ICONS: &[(&[&str], BulletinIcon)] = &[
    (&["nắng", "quang", "sun"], BulletinIcon::Sun),
    (&["mây", "cloud"], BulletinIcon::Cloud),
    (&["mưa", "rain"], BulletinIcon::Rain),
    (&["tuyết", "snow"], BulletinIcon::Snow),
    (&["dông", "storm"], BulletinIcon::Storm),
];

const FALLBACK_ICONS: [BulletinIcon; 3] = [BulletinIcon::Sun, BulletinIcon::Cloud, BulletinIcon::Rain];

/// Weather icon from the status phrase. Unrecognized non-empty phrases get
/// a pick from `rng` among sun, cloud and rain.
pub fn choose_weather_icon(status: &str, rng: &mut impl Rng) -> BulletinIcon {
    if status.is_empty() {
        return BulletinIcon::Default;
    }
    let low = status.to_lowercase();
    STATUS_ICONS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| low.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or_else(|| FALLBACK_ICONS.choose(rng).copied().unwrap_or(BulletinIcon::Sun))
}

/* ============================ Severity ============================ */

pub const SAFE_LABEL: &str = "⚪ An toàn";

/// Evaluated top to bottom; the first keyword contained in the alert wins.
pub const SEVERITY_TABLE: &[(&str, u8, &str)] = &[
    ("lũ quét", 3, "🔴 Rất nguy hiểm"),
    ("sạt lở", 3, "🔴 Rất nguy hiểm"),
    ("bão", 3, "🔴 Rất nguy hiểm"),
    ("sốc nhiệt", 2, "🟠 Nguy hiểm vừa"),
    ("cháy nắng", 2, "🟠 Nguy hiểm vừa"),
    ("hạ thân nhiệt", 2, "🟠 Nguy hiểm vừa"),
    ("sương mù", 1, "🟢 Nhẹ"),
];

pub fn alert_severity(alert: &str) -> (u8, &'static str) {
    let low = alert.to_lowercase();
    SEVERITY_TABLE
        .iter()
        .find(|(kw, _, _)| low.contains(kw))
        .map(|&(_, score, label)| (score, label))
        .unwrap_or((0, SAFE_LABEL))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedAlert {
    pub score: u8,
    pub label: &'static str,
    pub text: String,
}

impl RankedAlert {
    pub fn display(&self) -> String {
        format!("{} - {}", self.label, self.text)
    }
}

/// Scores every alert and sorts by descending score. The sort is stable,
/// so equal scores keep generation order.
pub fn rank_alerts(alerts: &[String]) -> Vec<RankedAlert> {
    let mut ranked: Vec<RankedAlert> = alerts
        .iter()
        .map(|a| {
            let (score, label) = alert_severity(a);
            RankedAlert { score, label, text: a.clone() }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

fn severity_icon(score: u8, status: &str, rng: &mut impl Rng) -> (BulletinIcon, &'static str) {
    match score {
        3 => (BulletinIcon::DangerRed, "🔴"),
        2 => (BulletinIcon::WarningOrange, "🟠"),
        1 => (BulletinIcon::InfoGreen, "🟢"),
        _ => (choose_weather_icon(status, rng), "⚪"),
    }
}

/* ============================ Bulletin ============================ */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulletinOptions {
    pub region: Region,
    pub terrain: Terrain,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletinData {
    pub current: CurrentConditions,
    pub hourly: HourlyAggregates,
    pub daily: DailyAggregates,
    pub unified: UnifiedRecord,
    pub loc: Location,
    pub current_values: CurrentValues,
    pub overview_values: OverviewValues,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bulletin {
    pub text: String,
    pub icon: BulletinIcon,
    pub current_block: String,
    pub overview_block: String,
    pub summary_block: String,
    pub insights: Vec<String>,
    pub alerts: Vec<String>,
    pub categorized_alerts: CategorizedAlerts,
    pub highlighted: Vec<RankedAlert>,
    pub severity_score: u8,
    pub severity_label: &'static str,
    pub current_insights: Vec<String>,
    pub overview_insights: Vec<String>,
    pub current_alerts: Vec<String>,
    pub overview_alerts: Vec<String>,
    pub data: BulletinData,
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { DASH } else { s }
}

/// Composes a bulletin from an already fetched forecast. Pure apart from
/// the icon fallback, which draws from `rng`.
pub fn compose_bulletin(
    triple: &ForecastTriple,
    loc: &Location,
    now: &DateTime<FixedOffset>,
    opts: &BulletinOptions,
    rng: &mut impl Rng,
) -> Bulletin {
    let unified = map_to_unified(triple);
    let status_text = code_to_text(unified.status_code_now);

    let current = build_current_block(&unified, status_text, WIND_UNIT, opts.region, now);
    let overview_input = OverviewInput::from_unified(&unified, status_text);
    let overview = build_overview_block(&overview_input, opts.region, now);

    let insights = generate_all_insights(&unified);
    let alerts = generate_all_alerts(&unified, opts.terrain);

    let current_scope = CurrentScope::from_unified(&unified, opts.terrain);
    let overview_scope = OverviewScope::from_unified(&unified, opts.terrain);

    let current_block = current.text();
    let overview_block = overview.text();
    let summary_block = build_summary(&current.values, &overview.values, &insights, &alerts, now);

    let categorized_alerts = categorize_alerts(&alerts);
    let ranked = rank_alerts(&alerts);
    let highlighted: Vec<RankedAlert> = ranked.into_iter().take(2).collect();

    let (highlight_text, severity_score, severity_label) = match highlighted.first() {
        Some(top) => {
            let lines: Vec<String> = highlighted.iter().map(RankedAlert::display).collect();
            (format!("🚨 Cảnh báo nổi bật:\n{}", lines.join("\n")), top.score, top.label)
        }
        None => ("✅ Không có cảnh báo nổi bật.".to_string(), 0, SAFE_LABEL),
    };
    let (icon, severity_emoji) = severity_icon(severity_score, status_text, rng);

    let text = format!(
        "# 📰 BẢN TIN THỜI TIẾT\n\n\
         ## ⏱️ TÌNH HÌNH HIỆN TẠI\n{}\n\n\
         ## 📅 TỔNG QUAN TRONG NGÀY\n{}\n\n\
         ## 🎯 KẾT LUẬN BẢN TIN\n{}\n\n\
         {severity_emoji} {highlight_text}\n\
         📊 Đánh giá tổng quan: {severity_label}",
        or_dash(&current_block),
        or_dash(&overview_block),
        or_dash(&summary_block),
    );

    debug!(
        location = %loc.name,
        alerts = alerts.len(),
        severity = severity_score,
        icon = icon.file_name(),
        "bulletin composed"
    );

    Bulletin {
        text,
        icon,
        current_block,
        overview_block,
        summary_block,
        current_insights: generate_current_insights(&current_scope),
        overview_insights: generate_overview_insights(&overview_scope),
        current_alerts: generate_current_alerts(&current_scope),
        overview_alerts: generate_overview_alerts(&overview_scope),
        insights,
        alerts,
        categorized_alerts,
        highlighted,
        severity_score,
        severity_label,
        data: BulletinData {
            current: triple.current.clone(),
            hourly: triple.hourly.clone(),
            daily: triple.daily.clone(),
            unified,
            loc: loc.clone(),
            current_values: current.values,
            overview_values: overview.values,
        },
    }
}

/// Fetches the forecast for `loc` and composes its bulletin. A fetch
/// failure is returned before any composition happens.
pub async fn build_bulletin(
    source: &impl WeatherSource,
    loc: &Location,
    now: DateTime<FixedOffset>,
    opts: &BulletinOptions,
    rng: &mut impl Rng,
) -> Result<Bulletin, SourceError> {
    let triple = source.fetch_forecast(loc.latitude, loc.longitude, now).await?;
    Ok(compose_bulletin(&triple, loc, &now, opts, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_code_to_text() {
        assert_eq!(code_to_text(Some(0)), "Quang mây");
        assert_eq!(code_to_text(Some(96)), "Dông (mưa đá nhẹ)");
        assert_eq!(code_to_text(Some(7)), "—");
        assert_eq!(code_to_text(None), "—");
    }

    #[test]
    fn test_choose_weather_icon_keywords_in_order() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_weather_icon("", &mut rng), BulletinIcon::Default);
        assert_eq!(choose_weather_icon("Quang mây", &mut rng), BulletinIcon::Sun);
        assert_eq!(choose_weather_icon("Nhiều mây", &mut rng), BulletinIcon::Cloud);
        assert_eq!(choose_weather_icon("Mưa rào nặng", &mut rng), BulletinIcon::Rain);
        assert_eq!(choose_weather_icon("Dông (mưa đá mạnh)", &mut rng), BulletinIcon::Rain);
        assert_eq!(choose_weather_icon("Dông", &mut rng), BulletinIcon::Storm);
        assert_eq!(choose_weather_icon("Snow showers", &mut rng), BulletinIcon::Snow);
    }

    #[test]
    fn test_unrecognized_status_is_seeded_pick() {
        let a = choose_weather_icon("Sương mù", &mut StdRng::seed_from_u64(42));
        let b = choose_weather_icon("Sương mù", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(FALLBACK_ICONS.contains(&a));
    }

    #[test]
    fn test_severity_first_match_in_declared_order() {
        assert_eq!(alert_severity("Nguy cơ LŨ QUÉT và sạt lở"), (3, "🔴 Rất nguy hiểm"));
        assert_eq!(alert_severity("Nguy cơ sốc nhiệt"), (2, "🟠 Nguy hiểm vừa"));
        assert_eq!(alert_severity("Sương mù dày"), (1, "🟢 Nhẹ"));
        assert_eq!(alert_severity("Trời đẹp"), (0, SAFE_LABEL));
    }

    #[test]
    fn test_rank_alerts_stable_descending() {
        let alerts: Vec<String> = [
            "cảnh báo sương mù buổi sáng",
            "gió nhẹ",
            "cảnh báo lũ quét vùng núi",
            "cảnh báo sương mù ven sông",
        ]
        .map(String::from)
        .to_vec();
        let ranked = rank_alerts(&alerts);
        let texts: Vec<&str> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "cảnh báo lũ quét vùng núi",
                "cảnh báo sương mù buổi sáng",
                "cảnh báo sương mù ven sông",
                "gió nhẹ",
            ]
        );
        assert_eq!(ranked[0].display(), "🔴 Rất nguy hiểm - cảnh báo lũ quét vùng núi");
    }

    #[test]
    fn test_severity_icon_ladder() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(severity_icon(3, "", &mut rng), (BulletinIcon::DangerRed, "🔴"));
        assert_eq!(severity_icon(2, "", &mut rng), (BulletinIcon::WarningOrange, "🟠"));
        assert_eq!(severity_icon(1, "", &mut rng), (BulletinIcon::InfoGreen, "🟢"));
        assert_eq!(severity_icon(0, "", &mut rng), (BulletinIcon::Default, "⚪"));
    }

    #[test]
    fn test_icon_serializes_as_file_name() {
        let json = serde_json::to_string(&BulletinIcon::WarningOrange).unwrap();
        assert_eq!(json, "\"warning_orange.ico\"");
        assert_eq!(BulletinIcon::WarningOrange.file_name(), "warning_orange.ico");

        let all = [
            BulletinIcon::Sun,
            BulletinIcon::Cloud,
            BulletinIcon::Rain,
            BulletinIcon::Snow,
            BulletinIcon::Storm,
            BulletinIcon::DangerRed,
            BulletinIcon::WarningOrange,
            BulletinIcon::InfoGreen,
            BulletinIcon::Default,
        ];
        for icon in all {
            assert_eq!(serde_json::to_value(icon).unwrap(), icon.file_name());
        }
    }

    #[test]
    fn test_compose_empty_forecast_never_panics() {
        let now = crate::clock::vn_offset()
            .with_ymd_and_hms(2025, 6, 2, 10, 0, 0)
            .unwrap();
        let b = compose_bulletin(
            &ForecastTriple::default(),
            &Location::default(),
            &now,
            &BulletinOptions::default(),
            &mut StdRng::seed_from_u64(7),
        );
        assert!(b.text.starts_with("# 📰 BẢN TIN THỜI TIẾT"));
        assert!(b.text.ends_with("📊 Đánh giá tổng quan: ⚪ An toàn"));
        assert_eq!(b.severity_score, 0);
        assert!(b.highlighted.is_empty());
        assert!(FALLBACK_ICONS.contains(&b.icon));
    }
}
