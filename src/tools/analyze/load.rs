use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::types::InputRecord;
use crate::error::{ProwlError, Result};
use crate::types::{parse_timestamp, RawItemRecord};

const RECORD_FIELDS: &[&str] = &[
    "url",
    "title",
    "price",
    "origin",
    "shop_name",
    "description",
    "scrape_time",
    "raw_text_snippet",
];

// Recomputed on every pass.
const DERIVED_FIELDS: &[&str] = &["desc_len", "comp_group", "score"];

/// Turn a parsed artifact into input records.
///
/// The artifact must be a JSON array. Non-object entries are skipped; every
/// field of an object is optional and a missing or unreadable `scrape_time`
/// is stamped with `now`.
pub(super) fn records_from_value(value: Value, now: DateTime<Utc>) -> Result<Vec<InputRecord>> {
    let Value::Array(items) = value else {
        return Err(ProwlError::InvalidParams(
            "input artifact must be a JSON array of records".into(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => records.push(record_from_fields(fields, now, index)),
            other => tracing::warn!(index, kind = kind_of(&other), "skipping non-object record"),
        }
    }
    Ok(records)
}

fn record_from_fields(mut fields: Map<String, Value>, now: DateTime<Utc>, index: usize) -> InputRecord {
    let scrape_time = match fields.get("scrape_time") {
        None | Some(Value::Null) => now,
        Some(value) => match value.as_str().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                tracing::warn!(index, "unreadable scrape_time; stamping with processing time");
                now
            }
        },
    };

    let record = RawItemRecord {
        url: text_field(&fields, "url"),
        title: text_field(&fields, "title"),
        price: price_field(&fields),
        origin: text_field(&fields, "origin"),
        shop_name: text_field(&fields, "shop_name"),
        description: fields
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        scrape_time,
        raw_text_snippet: text_field(&fields, "raw_text_snippet"),
    };

    fields.retain(|key, _| !is_owned_field(key));
    InputRecord {
        record,
        extra: fields,
    }
}

fn is_owned_field(key: &str) -> bool {
    RECORD_FIELDS.contains(&key) || DERIVED_FIELDS.contains(&key) || key.starts_with("kw_")
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn price_field(fields: &Map<String, Value>) -> Option<f64> {
    let price = match fields.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
