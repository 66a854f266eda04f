//
//  redmine-api
//  serializer/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON structural serializer.
//!
//! Decoding is strict: trailing characters, raw control characters inside
//! strings, nesting beyond serde_json's recursion limit and ordinary syntax
//! errors are all rejected with a [`SerializerError`].

use serde::Serialize;
use serde_json::error::Category;
use serde_json::Value;

use super::SerializerError;

/// A JSON document together with its decoded form.
///
/// Instances are created only through [`from_json`](Self::from_json),
/// [`from_value`](Self::from_value) or
/// [`from_serializable`](Self::from_serializable) and are immutable afterwards.
///
/// # Example
///
/// ```rust
/// use redmine_api::serializer::JsonSerializer;
/// use serde_json::json;
///
/// let serializer = JsonSerializer::from_value(json!({"relation": {"issue_to_id": 7}}))?;
/// assert_eq!(serializer.encoded(), r#"{"relation":{"issue_to_id":7}}"#);
///
/// let err = JsonSerializer::from_json(r#"{"foo_bar":"#).unwrap_err();
/// assert!(err.to_string().contains("Syntax error"));
/// # Ok::<(), redmine_api::serializer::SerializerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    encoded: String,
    normalized: Value,
}

impl JsonSerializer {
    /// Decodes a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a [`SerializerError`] naming the failure category (`Syntax
    /// error`, `Data error`, ...) and serde_json's description of the problem.
    pub fn from_json(data: &str) -> Result<Self, SerializerError> {
        let normalized: Value = serde_json::from_str(data).map_err(|e| {
            SerializerError::new(format!(
                "{} while decoding JSON: {}",
                category_name(&e),
                e
            ))
        })?;

        Ok(Self {
            encoded: data.to_string(),
            normalized,
        })
    }

    /// Encodes a normalized value.
    pub fn from_value(normalized: Value) -> Result<Self, SerializerError> {
        let encoded = serde_json::to_string(&normalized).map_err(encode_error)?;
        Ok(Self {
            encoded,
            normalized,
        })
    }

    /// Encodes any serializable value.
    ///
    /// # Errors
    ///
    /// Fails for values JSON cannot represent, such as maps keyed by
    /// sequences.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, SerializerError> {
        let normalized = serde_json::to_value(value).map_err(encode_error)?;
        Self::from_value(normalized)
    }

    /// The JSON text.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The decoded value.
    pub fn normalized(&self) -> &Value {
        &self.normalized
    }

    /// Consumes the serializer and returns the normalized value.
    pub fn into_normalized(self) -> Value {
        self.normalized
    }
}

fn encode_error(e: serde_json::Error) -> SerializerError {
    SerializerError::new(format!(
        "{} while encoding JSON: {}",
        category_name(&e),
        e
    ))
}

fn category_name(e: &serde_json::Error) -> &'static str {
    match e.classify() {
        Category::Syntax | Category::Eof => "Syntax error",
        Category::Data => "Data error",
        Category::Io => "I/O error",
    }
}
