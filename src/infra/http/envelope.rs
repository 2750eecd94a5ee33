use serde_json::Value;

use crate::domain::entities::record::JsonRecord;
use crate::usecase::ports::fetcher::FetchError;

const ENVELOPE_KEYS: [&str; 2] = ["items", "data"];

/// Accepts a bare JSON array or an object carrying the array under `items`
/// or `data`. Array elements that are not objects are skipped.
pub fn decode_records(body: &str) -> Result<Vec<JsonRecord>, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| FetchError::MalformedResponse(format!("invalid json: {err}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut fields) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match fields.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                FetchError::MalformedResponse("object without an items/data array".to_string())
            })?,
        other => {
            return Err(FetchError::MalformedResponse(format!(
                "expected array or object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let total = items.len();
    let records = items
        .into_iter()
        .filter_map(JsonRecord::from_value)
        .collect::<Vec<_>>();
    if records.len() < total {
        log::warn!(
            "skipped {} non-object entries in response",
            total - records.len()
        );
    }
    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
