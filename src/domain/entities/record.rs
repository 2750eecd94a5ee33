use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read access to one row of a report.
///
/// Field keys are strings taken from the view configuration. `number` and
/// `timestamp` fall back to parsing the textual value, so most records only
/// need `record_id` and `text`.
pub trait ReportRecord {
    fn record_id(&self) -> Option<String>;

    fn text(&self, key: &str) -> Option<String>;

    fn number(&self, key: &str) -> Option<f64> {
        self.text(key).and_then(|value| parse_number(&value))
    }

    fn timestamp(&self, key: &str) -> Option<NaiveDateTime> {
        self.text(key).and_then(|value| parse_timestamp(&value))
    }
}

/// A record as delivered by the backend: a JSON object with no fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRecord(Map<String, Value>);

impl JsonRecord {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Dotted keys walk into nested objects, so `supplier.name` reads the
    /// embedded supplier.
    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }
        let mut parts = key.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

impl From<Map<String, Value>> for JsonRecord {
    fn from(value: Map<String, Value>) -> Self {
        JsonRecord(value)
    }
}

impl ReportRecord for JsonRecord {
    fn record_id(&self) -> Option<String> {
        self.text("id")
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.lookup(key)? {
            Value::Number(value) => value.as_f64(),
            Value::String(value) => parse_number(value),
            _ => None,
        }
    }
}

pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Shortest decimal rendering: integral values lose their fraction and
/// trailing zeros are dropped. Non-finite values render empty.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Accepts the timestamp shapes the backend emits. Offsets are normalised to
/// UTC before the offset is dropped.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
