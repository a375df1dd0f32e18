// -----------------------------------------------
// FIELD ALIASES
// -----------------------------------------------
// Vendor payloads spell the same field several ways. Every logical field maps
// to an ordered alias list; the first alias present and parseable wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

pub const EXPIRATION_ALIASES: &[&str] = &["expirationDate", "expiry", "expiration"];
pub const TYPE_ALIASES: &[&str] = &["type", "contractType"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Strike,
    Bid,
    Ask,
    Delta,
    Gamma,
    Vega,
    Theta,
    ImpliedVolatility,
}

impl NumericField {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            NumericField::Strike => &["strike", "strikePrice"],
            NumericField::Bid => &["bid", "b"],
            NumericField::Ask => &["ask", "a"],
            NumericField::Delta => &["delta", "Delta"],
            NumericField::Gamma => &["gamma", "Gamma"],
            NumericField::Vega => &["vega", "Vega"],
            NumericField::Theta => &["theta", "Theta"],
            NumericField::ImpliedVolatility => &["impliedVolatility", "impliedVol", "iv", "IV"],
        }
    }

    /// Read this field from a raw contract entry; None when no alias yields a number
    pub fn read(self, entry: &Map<String, Value>) -> Option<f64> {
        probe_number(entry, self.aliases())
    }
}

/// First alias holding a finite number (native or numeric string)
pub fn probe_number(entry: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|name| entry.get(*name))
        .find_map(number_from)
}

/// First alias holding a string value
pub fn probe_text<'a>(entry: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|name| entry.get(*name))
        .find_map(Value::as_str)
}

/// First alias holding a string that parses as a date
pub fn probe_expiration(block: &Map<String, Value>) -> Option<NaiveDate> {
    EXPIRATION_ALIASES
        .iter()
        .filter_map(|name| block.get(*name))
        .filter_map(Value::as_str)
        .find_map(parse_date)
}

fn number_from(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse a vendor date string; time-of-day and offsets are dropped
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_probe_number_alias_priority() {
        let entry = obj(json!({ "strikePrice": 105.0, "strike": 100.0 }));
        assert_eq!(NumericField::Strike.read(&entry), Some(100.0));

        let entry = obj(json!({ "strikePrice": 105.0 }));
        assert_eq!(NumericField::Strike.read(&entry), Some(105.0));
    }

    #[test]
    fn test_probe_number_numeric_strings() {
        let entry = obj(json!({ "bid": "12.5", "ask": " 1,250 " }));
        assert_eq!(NumericField::Bid.read(&entry), Some(12.5));
        assert_eq!(NumericField::Ask.read(&entry), Some(1250.0));
    }

    #[test]
    fn test_probe_number_falls_through_unparseable() {
        // "iv" is garbage, "IV" is next in line
        let entry = obj(json!({ "iv": "n/a", "IV": 0.42 }));
        assert_eq!(NumericField::ImpliedVolatility.read(&entry), Some(0.42));

        let entry = obj(json!({ "delta": null, "Delta": true }));
        assert_eq!(NumericField::Delta.read(&entry), None);
    }

    #[test]
    fn test_probe_number_rejects_non_finite() {
        let entry = obj(json!({ "gamma": "NaN", "vega": "inf" }));
        assert_eq!(NumericField::Gamma.read(&entry), None);
        assert_eq!(NumericField::Vega.read(&entry), None);
    }

    #[test]
    fn test_probe_text_skips_non_strings() {
        let entry = obj(json!({ "type": 1, "contractType": "put" }));
        assert_eq!(probe_text(&entry, TYPE_ALIASES), Some("put"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 19);
        assert_eq!(parse_date("2025-12-19"), expected);
        assert_eq!(parse_date("19-Dec-2025"), expected);
        assert_eq!(parse_date("12/19/2025"), expected);
        assert_eq!(parse_date("2025/12/19"), expected);
        assert_eq!(parse_date("2025-12-19T16:00:00"), expected);
        assert_eq!(parse_date("2025-12-19T16:00:00Z"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_date_loose_vendor_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 19);
        assert_eq!(parse_date("2025-12-19 16:00"), expected);
        assert_eq!(parse_date("2025-12-19T16:00"), expected);
        assert_eq!(parse_date("Dec 19, 2025"), expected);
        assert_eq!(parse_date(" Dec 19, 2025 "), expected);
        assert_eq!(parse_date("2025-12-19 25:00"), None);
    }

    #[test]
    fn test_probe_expiration_aliases() {
        let block = obj(json!({ "expirationDate": "soon", "expiry": "2026-01-16" }));
        assert_eq!(probe_expiration(&block), NaiveDate::from_ymd_opt(2026, 1, 16));

        let block = obj(json!({ "expiration": 20260116 }));
        assert_eq!(probe_expiration(&block), None);
    }
}
