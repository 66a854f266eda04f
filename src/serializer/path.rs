//
//  redmine-api
//  serializer/path.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request path construction.
//!
//! Redmine expects repeated-key array syntax in query strings
//! (`tracker_id[]=1&tracker_id[]=2`), never indexed syntax
//! (`tracker_id[0]=1`). [`build_path`] produces PHP-style nested query strings
//! and strips every purely numeric index from the keys. Values are left alone.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use super::Params;

/// Matches an encoded numeric array index such as `%5B0%5D`.
static NUMERIC_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)%5B[0-9]+%5D").expect("numeric index pattern is valid"));

/// Combines a resource path with query parameters.
///
/// Returns `base_path` unchanged when `params` is empty. Otherwise the
/// parameters are appended as a query string where nested mappings become
/// `key[sub]=value`, sequences become `key[]=value`, booleans become `1`/`0`
/// and nulls are skipped.
///
/// The base path is not validated.
///
/// # Example
///
/// ```rust
/// use redmine_api::serializer::build_path;
/// use serde_json::json;
///
/// let params = json!({"f": ["spent_on"], "op": {"spent_on": "><"}});
/// let path = build_path("/time_entries.json", params.as_object().unwrap());
///
/// assert_eq!(path, "/time_entries.json?f%5B%5D=spent_on&op%5Bspent_on%5D=%3E%3C");
/// ```
pub fn build_path(base_path: &str, params: &Params) -> String {
    if params.is_empty() {
        return base_path.to_string();
    }

    let mut pairs = Vec::new();
    for (key, value) in params {
        encode_pairs(key, value, &mut pairs);
    }

    format!("{}?{}", base_path, pairs.join("&"))
}

fn encode_pairs(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                encode_pairs(&format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                encode_pairs(&format!("{}[{}]", prefix, index), nested, pairs);
            }
        }
        Value::Bool(flag) => pairs.push(pair(prefix, &u8::from(*flag).to_string())),
        Value::Number(number) => pairs.push(pair(prefix, &number.to_string())),
        Value::String(text) => pairs.push(pair(prefix, &encode(text))),
    }
}

fn pair(key: &str, encoded_value: &str) -> String {
    let key = encode(key);
    format!("{}={}", NUMERIC_INDEX.replace_all(&key, "%5B%5D"), encoded_value)
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}
