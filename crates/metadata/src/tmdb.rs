//! Mapping of TMDB v3 object responses (`/3/movie/{id}`, `/3/tv/{id}`).
//!
//! The proxy may add `locked_*` fields next to the public ones. Locked values
//! always win; movies use `title`/`release_date`, series use
//! `name`/`first_air_date`, and both shapes go through the same lookup order.

use serde_json::Value;

use crate::{MetadataRecord, MetadataRequest, ResolveFailure};

const TITLE_KEYS: [&str; 4] = ["locked_title", "locked_name", "title", "name"];
const ORIGINAL_TITLE_KEYS: [&str; 4] = [
    "locked_original_title",
    "locked_original_name",
    "original_title",
    "original_name",
];
const DATE_KEYS: [&str; 2] = ["release_date", "first_air_date"];

/// Build a record from a decoded response body. The id and language are
/// echoed from the request, never taken from the body.
pub fn record_from_json(
    data: &Value,
    request: &MetadataRequest,
) -> Result<MetadataRecord, ResolveFailure> {
    if !data.is_object() {
        return Err(ResolveFailure::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(data)
        )));
    }

    Ok(MetadataRecord {
        title: first_non_empty(data, &TITLE_KEYS).to_string(),
        original_title: first_non_empty(data, &ORIGINAL_TITLE_KEYS).to_string(),
        year: first_non_empty(data, &DATE_KEYS).chars().take(4).collect(),
        overview: string_field(data, "overview").unwrap_or_default().to_string(),
        poster_path: string_field(data, "poster_path")
            .unwrap_or_default()
            .to_string(),
        external_id: request.external_id().to_string(),
        language: request.language().to_string(),
    })
}

fn first_non_empty<'a>(data: &'a Value, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| string_field(data, key))
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

// Non-string values (null, numbers) count as absent.
fn string_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
