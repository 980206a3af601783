//! Coercion of untrusted backend payloads into validated records.
//!
//! Nothing here fails: anything that does not look like data is dropped or
//! read as zero.

use serde_json::Value;

use crate::models::{RawEntry, RawMonthRecord, School};

impl RawMonthRecord {
    pub fn from_json(payload: &Value) -> Self {
        let Some(items) = payload.as_array() else {
            return Self::default();
        };

        let entries = items.iter().filter_map(parse_entry).collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(item: &Value) -> Option<RawEntry> {
    let object = item.as_object()?;
    let dimension_name = object
        .get("dimension_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    Some(RawEntry {
        dimension_name: dimension_name.to_string(),
        percentage: object
            .get("wellness_percentage")
            .map(parse_percentage)
            .unwrap_or(0.0),
        color: object
            .get("color")
            .and_then(Value::as_str)
            .and_then(parse_color),
    })
}

/// Numbers and numeric strings pass through; everything else reads as zero.
pub fn parse_percentage(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Accepts `#RGB` and `#RRGGBB`.
pub fn parse_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#')?;
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| trimmed.to_string())
}

/// Reads the school list; entries without an id are dropped.
pub fn parse_schools(payload: &Value) -> Vec<School> {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = match item.get("id")? {
                Value::String(text) => text.trim().to_string(),
                Value::Number(number) => number.to_string(),
                _ => return None,
            };
            if id.is_empty() {
                return None;
            }
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| id.clone());
            Some(School { id, name })
        })
        .collect()
}
