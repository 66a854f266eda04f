//
//  redmine-api
//  serializer/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Wire Format Serializers
//!
//! This module converts between the in-memory representation of request and
//! response data and the formats the Redmine server speaks on the wire.
//!
//! ## Normalized Values
//!
//! Both structural serializers produce and consume the same shape: a
//! [`serde_json::Value`] tree. The crate enables serde_json's `preserve_order`
//! feature, so mapping keys keep their insertion order. That order matters for
//! XML, where it becomes the order of child elements.
//!
//! ## Components
//!
//! - [`path`]: Builds request paths with PHP-style nested query strings
//! - [`json`]: Strict JSON decoding and encoding
//! - [`xml`]: XML decoding plus the Redmine-specific array, custom field and
//!   upload encodings
//!
//! ## Example
//!
//! ```rust
//! use redmine_api::serializer::{JsonSerializer, XmlSerializer};
//! use serde_json::json;
//!
//! let xml = XmlSerializer::from_value(json!({"group": {"name": "Developers"}}))?;
//! assert!(xml.encoded().contains("<name>Developers</name>"));
//!
//! let decoded = JsonSerializer::from_json(r#"{"issue":{"id":1}}"#)?;
//! assert_eq!(decoded.normalized()["issue"]["id"], 1);
//! # Ok::<(), redmine_api::serializer::SerializerError>(())
//! ```

pub mod json;
pub mod path;
pub mod xml;

pub use json::JsonSerializer;
pub use path::build_path;
pub use xml::XmlSerializer;

use thiserror::Error;

/// A parameter mapping as accepted by the resource APIs.
///
/// Keys keep their insertion order, which is the order of the resulting XML
/// child elements.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Error raised when data cannot be decoded from, or encoded to, a wire format.
///
/// The message carries every diagnostic the underlying parser or writer
/// reported, so a single error describes the whole failure.
///
/// # Example
///
/// ```rust
/// use redmine_api::serializer::XmlSerializer;
///
/// let err = XmlSerializer::from_xml("").unwrap_err();
/// assert!(err.to_string().contains("could not be parsed as XML"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SerializerError {
    message: String,
}

impl SerializerError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the full error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
