use serde::{Deserialize, Serialize};
use serde_json::Value;

// Serper response (only what we read)
//  ├── searchParameters
//  │    └── q
//  └── organic[]
//       ├── title
//       ├── link
//       ├── snippet
//       └── position
//
// `organic` entries are kept as raw values; their shape varies by result and
// they are normalised by `ListingRecord::from_raw`.

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hl: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_array")]
    pub organic: Vec<Value>,
}

/// A missing, null or non-array `organic` field reads as no results.
fn lenient_array<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}
