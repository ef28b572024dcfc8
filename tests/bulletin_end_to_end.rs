use approx::assert_relative_eq;
use chrono::{DateTime, FixedOffset, TimeZone};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

use vn_weather_bulletin::bulletin::{BulletinIcon, BulletinOptions, build_bulletin, rank_alerts};
use vn_weather_bulletin::clock::vn_offset;
use vn_weather_bulletin::model::ForecastTriple;
use vn_weather_bulletin::normalize::round1;
use vn_weather_bulletin::source::{Location, RawForecast, WeatherSource, normalize_response};
use vn_weather_bulletin::SourceError;

/// Serves a canned Open-Meteo document through the real normalizer.
struct FixtureSource(Value);

impl WeatherSource for FixtureSource {
    async fn fetch_forecast(
        &self,
        _lat: f64,
        _lon: f64,
        now: DateTime<FixedOffset>,
    ) -> Result<ForecastTriple, SourceError> {
        let raw: RawForecast = serde_json::from_value(self.0.clone())
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(normalize_response(&raw, &now))
    }
}

struct DownSource;

impl WeatherSource for DownSource {
    async fn fetch_forecast(
        &self,
        _lat: f64,
        _lon: f64,
        _now: DateTime<FixedOffset>,
    ) -> Result<ForecastTriple, SourceError> {
        Err(SourceError::Status(503))
    }
}

fn local(h: u32, m: u32) -> DateTime<FixedOffset> {
    vn_offset().with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
}

fn hanoi() -> Location {
    Location {
        name: "Hà Nội".into(),
        latitude: 21.0285,
        longitude: 105.8542,
        country: Some("Việt Nam".into()),
        admin1: Some("Hà Nội".into()),
    }
}

/// 36°C, RH 92%, wind 5 m/s gusting 25 m/s, dry. Hourly times are UTC, so
/// 14:20 local selects the 07:00 slot.
fn hot_humid_gusty() -> Value {
    json!({
        "current_weather": {
            "temperature": 36.0, "windspeed": 5.0, "windgusts": 25.0,
            "winddirection": 90, "weathercode": 1
        },
        "hourly": {
            "time": ["2025-06-02T05:00", "2025-06-02T06:00", "2025-06-02T07:00", "2025-06-02T08:00"],
            "temperature_2m": [33.0, 34.0, 36.0, 35.0],
            "apparent_temperature": [38.0, 40.0, 42.0, 41.0],
            "precipitation": [0.0, 0.0, 0.0, 0.0],
            "precipitation_probability": [10, 10, 20, 20],
            "wind_speed_10m": [4.0, 4.5, 5.0, 5.5],
            "wind_gusts_10m": [10.0, 15.0, 25.0, 18.0],
            "winddirection_10m": [90, 90, 90, 90],
            "relative_humidity_2m": [85, 88, 92, 90],
            "pressure_msl": [1008, 1008, 1007, 1007],
            "shortwave_radiation": [500, 600, 650, 620],
            "uv_index": [6, 7, 8, 7],
            "cloudcover": [40, 40, 45, 50],
            "dewpoint_2m": [24, 25, 25, 25],
            "visibility": [20000, 20000, 18000, 18000]
        },
        "daily": {
            "time": ["2025-06-02"],
            "temperature_2m_max": [37.0],
            "temperature_2m_min": [27.0],
            "temperature_2m_mean": [32.0],
            "precipitation_sum": [0.0],
            "precipitation_probability_mean": [20],
            "relative_humidity_2m_mean": [80],
            "pressure_msl_mean": [1008],
            "shortwave_radiation_sum": [5200],
            "uv_index_max": [9],
            "sunrise": ["2025-06-01T22:15"],
            "sunset": ["2025-06-02T11:38"],
            "cloudcover_mean": [45],
            "dewpoint_2m_mean": [25]
        }
    })
}

#[tokio::test]
async fn hot_humid_gusty_day_is_an_orange_bulletin() {
    let b = build_bulletin(
        &FixtureSource(hot_humid_gusty()),
        &hanoi(),
        local(14, 20),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .await
    .unwrap();

    assert!(b.current_block.contains("🏷️ Mức độ nhiệt độ: 🌡️ Rất nóng (≥35°C)"));
    assert!(b.current_block.contains("💧 Độ ẩm hiện tại: 92.0% (💧 Độ ẩm rất cao"));
    assert!(b.current_block.contains("⚠️ Gió giật mạnh hơn nhiều so với gió trung bình."));
    assert!(b.current_block.contains("🏷️ Mức độ mưa: 🙂 Không mưa."));
    assert!(b.alerts.contains(&"⚠️ Gió giật mạnh 25.0 m/s ≈ 90.0 km/h, cần hạn chế ra ngoài.".to_string()));

    assert_eq!(b.icon, BulletinIcon::WarningOrange);
    assert_eq!(b.severity_score, 2);
    assert!(b.highlighted[0].text.contains("sốc nhiệt"));
    assert!(b.text.contains("🟠 🚨 Cảnh báo nổi bật:\n🟠 Nguy hiểm vừa - "));
    assert!(b.text.ends_with("📊 Đánh giá tổng quan: 🟠 Nguy hiểm vừa"));

    assert!(!b.categorized_alerts.wind.is_empty());
    assert!(!b.categorized_alerts.humidity.is_empty());
    assert_eq!(b.data.loc.name, "Hà Nội");
    assert_eq!(b.data.overview_values.sunrise.as_deref(), Some("05:15, 02/06/2025"));
}

#[tokio::test]
async fn bulletin_sections_appear_in_order() {
    let b = build_bulletin(
        &FixtureSource(hot_humid_gusty()),
        &hanoi(),
        local(14, 20),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .await
    .unwrap();

    let headers = [
        "# 📰 BẢN TIN THỜI TIẾT",
        "## ⏱️ TÌNH HÌNH HIỆN TẠI",
        "## 📅 TỔNG QUAN TRONG NGÀY",
        "## 🎯 KẾT LUẬN BẢN TIN",
        "📊 Đánh giá tổng quan:",
    ];
    let positions: Vec<usize> = headers.iter().map(|h| b.text.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(b.current_insights[0], "⏱️ NHẬN ĐỊNH TÌNH HÌNH HIỆN TẠI:");
    assert_eq!(b.overview_alerts[0], "📅 CẢNH BÁO TỔNG QUAN TRONG NGÀY:");
}

#[tokio::test]
async fn night_forces_solar_and_uv_to_zero() {
    let b = build_bulletin(
        &FixtureSource(hot_humid_gusty()),
        &hanoi(),
        local(22, 0),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .await
    .unwrap();

    let cv = &b.data.current_values;
    assert!(cv.is_night);
    assert_eq!(cv.solar_now, Some(0.0));
    assert_eq!(cv.uv_now, Some(0.0));
    assert!(b.current_block.contains("🔆 Bức xạ mặt trời hiện tại: 0 W/m² (🌙 Ban đêm)"));
    assert!(b.current_block.contains("☀️ UV hiện tại: 0 (🌙 Ban đêm)"));
}

#[tokio::test]
async fn overview_rain_falls_back_to_todays_hourly_entries() {
    let payload = json!({
        "hourly": {
            "time": ["2025-06-02T00:00", "2025-06-02T01:00", "2025-06-02T02:00"],
            "precipitation": [1.0, 2.0, 0.0]
        },
        "daily": {"time": ["2025-06-02"], "precipitation_sum": [0.0]}
    });
    let b = build_bulletin(
        &FixtureSource(payload),
        &hanoi(),
        local(14, 20),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .await
    .unwrap();

    let ov = &b.data.overview_values;
    assert_relative_eq!(ov.precipitation_sum_day.unwrap(), 3.0);
    assert_relative_eq!(ov.avg_precipitation_day.unwrap(), 1.0);
}

/// First number after `marker` on the first line containing `label`.
fn figure(block: &str, label: &str, marker: &str) -> f64 {
    let line = block
        .lines()
        .find(|l| l.contains(label))
        .unwrap_or_else(|| panic!("no line with {label:?} in:\n{block}"));
    let (_, rest) = line
        .split_once(marker)
        .unwrap_or_else(|| panic!("no {marker:?} in {line:?}"));
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().unwrap_or_else(|_| panic!("no number after {marker:?} in {line:?}"))
}

fn rounded(raw: f64) -> f64 {
    round1(Some(raw)).unwrap()
}

#[tokio::test]
async fn rendered_figures_match_one_decimal_rounding() {
    let payload = json!({
        "current_weather": {"temperature": 36.25, "windspeed": 5.15, "winddirection": 90, "weathercode": 1},
        "hourly": {
            "time": ["2025-06-02T07:00"],
            "precipitation": [0.15],
            "wind_speed_10m": [5.15],
            "relative_humidity_2m": [92.35],
            "pressure_msl": [1007.45]
        },
        "daily": {
            "time": ["2025-06-02"],
            "temperature_2m_max": [37.25],
            "temperature_2m_min": [27.15],
            "precipitation_sum": [12.25],
            "relative_humidity_2m_mean": [80.45],
            "pressure_msl_mean": [1008.35]
        }
    });
    let b = build_bulletin(
        &FixtureSource(payload),
        &hanoi(),
        local(14, 20),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .await
    .unwrap();
    let (cur, ov, sum) = (&b.current_block, &b.overview_block, &b.summary_block);

    // Current block against the summary's "current" half.
    let current = [
        ("Nhiệt độ hiện tại:", 36.25),
        ("Lượng mưa hiện tại:", 0.15),
        ("Gió hiện tại:", 5.15),
        ("Độ ẩm hiện tại:", 92.35),
        ("Áp suất hiện tại:", 1007.45),
    ];
    for (label, raw) in current {
        let shown = figure(cur, label, label);
        assert_relative_eq!(shown, rounded(raw));
        assert_relative_eq!(figure(sum, label, label), shown);
    }

    // Overview block against the summary's daily half.
    assert_relative_eq!(figure(ov, "Dao động ngày:", "Dao động ngày:"), rounded(27.15));
    assert_relative_eq!(figure(ov, "Dao động ngày:", "/"), rounded(37.25));
    assert_relative_eq!(figure(sum, "Dao động ngày:", "Dao động ngày:"), rounded(27.15));
    assert_relative_eq!(figure(sum, "Dao động ngày:", "–"), rounded(37.25));

    assert_relative_eq!(figure(ov, "Tổng lượng mưa ngày:", ":"), rounded(12.25));
    assert_relative_eq!(figure(sum, "Lượng mưa hiện tại:", "Tổng ngày:"), rounded(12.25));
    assert_relative_eq!(figure(ov, "Gió trung bình ngày:", ":"), rounded(5.15));
    assert_relative_eq!(figure(sum, "Gió hiện tại:", "Trung bình ngày:"), rounded(5.15));
    assert_relative_eq!(figure(ov, "Độ ẩm trung bình ngày:", ":"), rounded(80.45));
    assert_relative_eq!(figure(sum, "Độ ẩm hiện tại:", "Trung bình ngày:"), rounded(80.45));
    assert_relative_eq!(figure(ov, "Áp suất trung bình ngày:", ":"), rounded(1008.35));
    assert_relative_eq!(figure(sum, "Áp suất hiện tại:", "Trung bình ngày:"), rounded(1008.35));

    let cv = &b.data.current_values;
    assert_eq!(cv.temperature_now, round1(Some(36.25)));
    assert_eq!(b.data.overview_values.precipitation_sum_day, round1(Some(12.25)));
}

#[tokio::test]
async fn garbage_payload_degrades_without_panicking() {
    let payload = json!({
        "current_weather": {"temperature": "n/a", "windspeed": [], "weathercode": "x"},
        "hourly": {"time": "not-a-list", "temperature_2m": [true, null, "abc"]},
        "daily": {"temperature_2m_max": {"oops": 1}, "sunrise": ["sáng sớm"], "uv_index_max": ["NaN"]}
    });
    let b = build_bulletin(
        &FixtureSource(payload),
        &hanoi(),
        local(9, 0),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(3),
    )
    .await
    .unwrap();

    assert!(!b.current_block.contains("Nhiệt độ hiện tại"));
    assert!(b.current_block.contains("🌤️ Trạng thái: —"));
    assert!(b.current_block.contains("👀 Tầm nhìn hiện tại: — km"));
    assert_eq!(b.data.overview_values.sunrise.as_deref(), Some("sáng sớm"));
    assert!(b.alerts.is_empty());
    assert_eq!(b.severity_score, 0);
    assert!(matches!(b.icon, BulletinIcon::Sun | BulletinIcon::Cloud | BulletinIcon::Rain));
}

#[tokio::test]
async fn same_seed_same_fallback_icon() {
    let build = |seed| async move {
        build_bulletin(
            &FixtureSource(json!({"current_weather": {"weathercode": 45}})),
            &hanoi(),
            local(9, 0),
            &BulletinOptions::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .await
        .unwrap()
        .icon
    };
    assert_eq!(build(11).await, build(11).await);
}

#[tokio::test]
async fn fetch_failure_surfaces_before_composition() {
    let err = build_bulletin(
        &DownSource,
        &hanoi(),
        local(9, 0),
        &BulletinOptions::default(),
        &mut StdRng::seed_from_u64(0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SourceError::Status(503)));
}

#[test]
fn flood_outranks_fog() {
    let alerts = vec![
        "⚠️ Cảnh báo sương mù dày đặc buổi sáng.".to_string(),
        "⚠️ Cảnh báo lũ quét tại vùng núi.".to_string(),
    ];
    let ranked = rank_alerts(&alerts);
    assert_eq!(ranked[0].score, 3);
    assert!(ranked[0].text.contains("lũ quét"));
    assert_eq!(ranked[1].score, 1);
    assert!(ranked[1].text.contains("sương mù"));
}
