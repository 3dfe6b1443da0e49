//! Field normalizers - raw extracted JSON values to canonical fields.
//!
//! Every function here is total: a value that cannot be normalized becomes
//! `None` (or the supplied default). Extraction output is noisy by nature,
//! so nothing in this module reports an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::types::codes::CodeSet;
use crate::types::config::NormalizeOptions;

lazy_static! {
    static ref ISO_DATE_REGEX: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();

    // DD/MM/YYYY or MM/DD/YYYY, also with '-' or '.' separators
    static ref NUMERIC_DATE_REGEX: Regex =
        Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})$").unwrap();

    static ref TIME_REGEX: Regex = Regex::new(r"^\d{2}:\d{2}$").unwrap();

    static ref IATA_REGEX: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();

    // RFC 5322 simplified, applied after lowercasing
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}$"
    ).unwrap();
}

/// Date-time layouts tried after the explicit formats.
const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date layouts tried after the explicit formats.
const GENERIC_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%a, %d %b %Y",
];

static NULL: Value = Value::Null;

/// First non-null value among `keys` on a JSON object.
///
/// Resolves field aliases at the ingestion boundary: `pick(raw, &["client",
/// "cliente"])`. Returns `Null` when no key is present or `raw` is not an
/// object.
pub fn pick<'a>(raw: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
        .unwrap_or(&NULL)
}

/// Trimmed string, or `None` for empty strings and non-strings.
pub fn normalize_string(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trimmed, uppercased string.
pub fn normalize_upper(value: &Value) -> Option<String> {
    normalize_string(value).map(|s| s.to_uppercase())
}

/// Identifier such as a document or phone number.
///
/// Like [`normalize_string`], but integral numbers are accepted and rendered
/// without a fraction: `12345678` and `12345678.0` both give `"12345678"`.
pub fn normalize_identifier(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        Some(format!("{}", f as i64))
                    }
                    _ => Some(n.to_string()),
                }
            }
        }
        _ => normalize_string(value),
    }
}

/// Calendar date from any of the accepted input layouts.
///
/// Accepted: `YYYY-MM-DD`, `DD/MM/YYYY`, `MM/DD/YYYY`, ISO/RFC 3339
/// date-times, unpadded `YYYY-M-D` and a handful of common written forms.
/// `NN/NN/YYYY` (also with `-` or `.` separators) with one component above
/// 12 is read unambiguously; otherwise `options.prefer_day_first` decides. Lexically invalid dates (day 32,
/// February 30) are `None`.
pub fn normalize_date(value: &Value, options: NormalizeOptions) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_REGEX.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = NUMERIC_DATE_REGEX.captures(text) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;

        let day_first = if first > 12 {
            true
        } else if second > 12 {
            false
        } else {
            options.prefer_day_first
        };

        return if day_first {
            NaiveDate::from_ymd_opt(year, second, first)
        } else {
            NaiveDate::from_ymd_opt(year, first, second)
        };
    }

    parse_generic_date(text)
}

fn parse_generic_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })
}

/// `HH:MM`, exactly. Anything else is `None`.
pub fn normalize_time(value: &Value) -> Option<String> {
    let text = value.as_str()?.trim();
    if TIME_REGEX.is_match(text) {
        Some(text.to_string())
    } else {
        None
    }
}

/// Three-letter IATA code, uppercased.
pub fn normalize_iata(value: &Value) -> Option<String> {
    let code = value.as_str()?.trim().to_uppercase();
    if IATA_REGEX.is_match(&code) {
        Some(code)
    } else {
        None
    }
}

/// Lowercased email address with a plausible shape.
pub fn normalize_email(value: &Value) -> Option<String> {
    let email = value.as_str()?.trim().to_lowercase();
    if EMAIL_REGEX.is_match(&email) {
        Some(email)
    } else {
        None
    }
}

/// Case-insensitive match against `allowed`, returning the member as spelled
/// in `allowed`. Unmatched or non-string values give `default`.
pub fn normalize_enum(value: &Value, allowed: &[&str], default: Option<&str>) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .and_then(|text| {
            allowed
                .iter()
                .find(|member| member.eq_ignore_ascii_case(text))
        })
        .map(|member| member.to_string())
        .or_else(|| default.map(str::to_string))
}

/// Typed counterpart of [`normalize_enum`] for a [`CodeSet`], aliases included.
pub fn normalize_code<T: CodeSet>(value: &Value, default: Option<T>) -> Option<T> {
    value.as_str().and_then(T::from_code).or(default)
}

/// Finite number from a JSON number or a numeric string.
///
/// Strings may use a decimal comma (`"1234,5"`) when they carry no dot.
pub fn normalize_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let text = s.trim();
            let text = if text.contains('.') {
                text.to_string()
            } else {
                text.replace(',', ".")
            };
            text.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Non-negative integer count. Fractions are truncated, negatives clamp to 0.
pub fn normalize_count(value: &Value) -> Option<u32> {
    normalize_number(value).map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32)
}

/// Confidence in `[0, 1]`; non-numeric values give `default`.
pub fn normalize_confidence(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map_or(default, |c| c.clamp(0.0, 1.0)),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codes::{PassengerType, Sex};
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string(&json!("  Ana ")), Some("Ana".to_string()));
        assert_eq!(normalize_string(&json!("   ")), None);
        assert_eq!(normalize_string(&json!(42)), None);
        assert_eq!(normalize_string(&Value::Null), None);
    }

    #[test]
    fn test_normalize_identifier_accepts_integers() {
        assert_eq!(normalize_identifier(&json!(30123456)), Some("30123456".to_string()));
        assert_eq!(normalize_identifier(&json!(30123456.0)), Some("30123456".to_string()));
        assert_eq!(normalize_identifier(&json!(12.5)), Some("12.5".to_string()));
        assert_eq!(normalize_identifier(&json!(" AB123 ")), Some("AB123".to_string()));
        assert_eq!(normalize_identifier(&json!(true)), None);
    }

    #[test]
    fn test_normalize_date_iso() {
        let opts = NormalizeOptions::default();
        assert_eq!(normalize_date(&json!("2026-01-10"), opts), date(2026, 1, 10));
        assert_eq!(normalize_date(&json!("2026-01-32"), opts), None);
        assert_eq!(normalize_date(&json!("2026-02-30"), opts), None);
    }

    #[test]
    fn test_normalize_date_unambiguous_slash() {
        let opts = NormalizeOptions::default();
        assert_eq!(normalize_date(&json!("25/12/2026"), opts), date(2026, 12, 25));
        assert_eq!(normalize_date(&json!("12/25/2026"), opts), date(2026, 12, 25));
        assert_eq!(normalize_date(&json!("32/01/2026"), opts), None);
    }

    #[test]
    fn test_normalize_date_ambiguous_follows_option() {
        assert_eq!(
            normalize_date(&json!("03/04/2026"), NormalizeOptions::default()),
            date(2026, 4, 3)
        );
        assert_eq!(
            normalize_date(&json!("03/04/2026"), NormalizeOptions::month_first()),
            date(2026, 3, 4)
        );
    }

    #[test]
    fn test_normalize_date_dash_and_dot_follow_option() {
        assert_eq!(
            normalize_date(&json!("03-04-2026"), NormalizeOptions::default()),
            date(2026, 4, 3)
        );
        assert_eq!(
            normalize_date(&json!("03-04-2026"), NormalizeOptions::month_first()),
            date(2026, 3, 4)
        );
        assert_eq!(
            normalize_date(&json!("25.12.2026"), NormalizeOptions::month_first()),
            date(2026, 12, 25)
        );
    }

    #[test]
    fn test_normalize_date_generic_forms() {
        let opts = NormalizeOptions::default();
        assert_eq!(
            normalize_date(&json!("2026-03-15T10:30:00Z"), opts),
            date(2026, 3, 15)
        );
        assert_eq!(normalize_date(&json!("2026/03/15"), opts), date(2026, 3, 15));
        assert_eq!(normalize_date(&json!("2026-1-5"), opts), date(2026, 1, 5));
        assert_eq!(normalize_date(&json!("2026-1-32"), opts), None);
        assert_eq!(normalize_date(&json!("15 Mar 2026"), opts), date(2026, 3, 15));
        assert_eq!(normalize_date(&json!("March 15, 2026"), opts), date(2026, 3, 15));
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        let opts = NormalizeOptions::default();
        assert_eq!(normalize_date(&json!("next tuesday"), opts), None);
        assert_eq!(normalize_date(&json!(""), opts), None);
        assert_eq!(normalize_date(&json!(20260110), opts), None);
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time(&json!("09:05")), Some("09:05".to_string()));
        assert_eq!(normalize_time(&json!("9:05")), None);
        assert_eq!(normalize_time(&json!("09:05:00")), None);
    }

    #[test]
    fn test_normalize_iata() {
        assert_eq!(normalize_iata(&json!(" gru ")), Some("GRU".to_string()));
        assert_eq!(normalize_iata(&json!("GRUX")), None);
        assert_eq!(normalize_iata(&json!("G1U")), None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(&json!(" Ventas@Agencia.COM.ar ")),
            Some("ventas@agencia.com.ar".to_string())
        );
        assert_eq!(normalize_email(&json!("not-an-email")), None);
        assert_eq!(normalize_email(&json!("a@b")), None);
    }

    #[test]
    fn test_normalize_enum() {
        let allowed = ["OK", "RQ", "CX"];
        assert_eq!(normalize_enum(&json!("rq"), &allowed, None), Some("RQ".to_string()));
        assert_eq!(normalize_enum(&json!("zz"), &allowed, None), None);
        assert_eq!(
            normalize_enum(&json!("zz"), &allowed, Some("OK")),
            Some("OK".to_string())
        );
        assert_eq!(
            normalize_enum(&Value::Null, &allowed, Some("OK")),
            Some("OK".to_string())
        );
    }

    #[test]
    fn test_normalize_code_with_alias_and_default() {
        assert_eq!(
            normalize_code(&json!("ADT"), Some(PassengerType::Adult)),
            Some(PassengerType::Adult)
        );
        assert_eq!(
            normalize_code(&json!("chd"), Some(PassengerType::Adult)),
            Some(PassengerType::Child)
        );
        assert_eq!(normalize_code::<Sex>(&json!("X"), None), None);
    }

    #[test]
    fn test_normalize_number_and_count() {
        assert_eq!(normalize_number(&json!(1.5)), Some(1.5));
        assert_eq!(normalize_number(&json!("1234,5")), Some(1234.5));
        assert_eq!(normalize_number(&json!("abc")), None);
        assert_eq!(normalize_count(&json!(-3)), Some(0));
        assert_eq!(normalize_count(&json!("2")), Some(2));
        assert_eq!(normalize_count(&json!(2.9)), Some(2));
    }

    #[test]
    fn test_normalize_confidence() {
        assert_eq!(normalize_confidence(&json!(1.7), 0.5), 1.0);
        assert_eq!(normalize_confidence(&json!(-0.2), 0.5), 0.0);
        assert_eq!(normalize_confidence(&json!(0.8), 0.5), 0.8);
        assert_eq!(normalize_confidence(&json!("high"), 0.5), 0.5);
    }

    #[test]
    fn test_pick_skips_nulls_and_missing_keys() {
        let raw = json!({"client": null, "cliente": "Acme"});
        assert_eq!(pick(&raw, &["client", "cliente"]), &json!("Acme"));
        assert!(pick(&raw, &["seller"]).is_null());
        assert!(pick(&json!([1, 2]), &["client"]).is_null());
    }
}
