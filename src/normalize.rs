//! Numeric coercion and display formatting shared by every component.
//!
//! Upstream leaves arrive as loosely typed JSON. Everything numeric goes
//! through [`to_float`] once, and every displayed number goes through
//! [`round1`], so a malformed field can only ever disappear from the output.

use serde_json::Value;

/// Placeholder rendered wherever a value is absent.
pub const DASH: &str = "—";

/// Lenient coercion: JSON numbers and numeric strings pass, everything else
/// (null, bool, arrays, garbage text, non-finite values) becomes `None`.
pub fn to_float(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

/// Rounds to one decimal place; `None` passes through.
pub fn round1(value: Option<f64>) -> Option<f64> {
    value.map(round_tenth)
}

/// Half away from zero, with `-0.0` folded into `0.0`.
pub fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0 + 0.0
}

/* ============================ Display ============================ */

/// One-decimal number, e.g. `36.0`.
pub fn num(v: f64) -> String {
    format!("{:.1}", round_tenth(v))
}

/// One-decimal number with unit, or the dash placeholder.
pub fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{unit}", num(v)),
        None => DASH.to_string(),
    }
}

/// Like [`fmt_opt`] but keeps the unit after the dash (`— km`).
pub fn fmt_or_dash_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{unit}", num(v)),
        None => format!("{DASH}{unit}"),
    }
}

pub fn label_or_dash(label: Option<&str>) -> &str {
    label.unwrap_or(DASH)
}

/// Mean of the present values, `None` when nothing is present.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Maximum of the present values, `None` when nothing is present.
pub fn max_present(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_float_accepts_numbers_and_numeric_strings() {
        assert_eq!(to_float(&json!(3)), Some(3.0));
        assert_eq!(to_float(&json!(-1.25)), Some(-1.25));
        assert_eq!(to_float(&json!(" 12.5 ")), Some(12.5));
    }

    #[test]
    fn test_to_float_degrades_garbage_to_none() {
        for garbage in [json!(null), json!("abc"), json!(true), json!([1, 2]), json!({"a": 1}), json!("")] {
            assert_eq!(to_float(&garbage), None, "{garbage} should coerce to None");
        }
        assert_eq!(to_float(&json!("NaN")), None);
        assert_eq!(to_float(&json!("inf")), None);
    }

    #[test]
    fn test_to_float_is_idempotent() {
        for v in [json!(1.5), json!("7"), json!(null), json!("x"), json!(0)] {
            let once = to_float(&v);
            assert_eq!(to_float(&json!(once)), once);
        }
    }

    #[test]
    fn test_round1_and_negative_zero() {
        assert_eq!(round1(None), None);
        assert_eq!(round1(Some(36.04)), Some(36.0));
        assert_eq!(round1(Some(1.26)), Some(1.3));
        assert_eq!(num(-0.04), "0.0");
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(fmt_opt(Some(5.0), " m/s"), "5.0 m/s");
        assert_eq!(fmt_opt(None, " m/s"), "—");
        assert_eq!(fmt_or_dash_unit(None, " km"), "— km");
        assert_eq!(label_or_dash(None), "—");
    }

    #[test]
    fn test_mean_and_max_skip_missing() {
        assert_eq!(mean([Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean(Vec::<Option<f64>>::new()), None);
        assert_eq!(max_present(&[None, Some(4.0), Some(9.5), None]), Some(9.5));
        assert_eq!(max_present(&[None, None]), None);
    }
}
