//
//  redmine-api
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Redmine resource APIs
//!
//! This module provides the error type and the helpers every resource API is
//! built on: decoding the last response, sending XML or JSON bodies, and
//! preparing parameter mappings.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all resource operations
//! - [`Client::last_response_as_value`] - Decodes the last response by its content type
//! - [`Client::retrieve_data`] and [`Client::list_names`] - Offset/limit pagination
//!
//! # Example
//!
//! ```rust,no_run
//! use redmine_api::api::{ApiError, Client};
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! match client.group().create(json!({"description": "no name"})) {
//!     Err(ApiError::MissingParameter(names)) => println!("Missing: {}", names.join(", ")),
//!     Err(e) => println!("Error: {}", e),
//!     Ok(group) => println!("Created {}", group),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use super::Client;
use crate::http::ClientError;
use crate::serializer::{JsonSerializer, Params, SerializerError, XmlSerializer};

mod pagination;

/// Unified error type for all Redmine resource operations.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Serializer` | A body could not be encoded or a response decoded |
/// | `Client` | The HTTP exchange failed |
/// | `InvalidParameter` | A parameter value is not allowed |
/// | `MissingParameter` | Mandatory parameters are absent |
/// | `UnexpectedResponse` | The server answered with an error status or an unexpected format |
///
/// Parameter checks run before any request is sent.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Encoding or decoding failed.
    #[error(transparent)]
    Serializer(#[from] SerializerError),

    /// The transport could not complete the request.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A parameter has a value Redmine does not accept.
    ///
    /// # Parameters
    ///
    /// - `0` - Description of the offending parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mandatory parameters were not given.
    ///
    /// # Parameters
    ///
    /// - `0` - Names of every missing parameter
    #[error("Missing mandatory parameters: {}", .0.join(", "))]
    MissingParameter(Vec<String>),

    /// The server's answer was not what the operation expects.
    #[error("Unexpected response (status {status}, content type '{content_type}'): {body}")]
    UnexpectedResponse {
        /// HTTP status code
        status: u16,
        /// `Content-Type` header of the response
        content_type: String,
        /// Response body as text
        body: String,
    },
}

impl ApiError {
    /// HTTP status of an unexpected response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Client {
    /// Decodes the last response according to its content type.
    ///
    /// `application/json` bodies are decoded as JSON, `application/xml` and
    /// `text/xml` bodies as XML. An empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedResponse`] for any other content type
    /// - [`ApiError::Serializer`] if the body is not valid JSON or XML
    pub fn last_response_as_value(&self) -> Result<Value, ApiError> {
        let body = self.last_response_body();
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let content_type = self.last_response_content_type();
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => Ok(JsonSerializer::from_json(&body)?.into_normalized()),
            "application/xml" | "text/xml" => Ok(XmlSerializer::from_xml(&body)?.into_normalized()),
            _ => Err(self.unexpected_response()),
        }
    }

    pub(crate) fn unexpected_response(&self) -> ApiError {
        ApiError::UnexpectedResponse {
            status: self.last_response_status_code(),
            content_type: self.last_response_content_type(),
            body: self.last_response_body(),
        }
    }

    /// Turns a failed request into [`ApiError::UnexpectedResponse`].
    pub(crate) fn ensure_success(&self, success: bool) -> Result<(), ApiError> {
        if success {
            Ok(())
        } else {
            Err(self.unexpected_response())
        }
    }

    /// Fails unless the last response has exactly `status`.
    pub(crate) fn ensure_status(&self, status: u16) -> Result<(), ApiError> {
        if self.last_response_status_code() == status {
            Ok(())
        } else {
            Err(self.unexpected_response())
        }
    }

    /// GETs `path` and decodes the response.
    pub(crate) fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        let success = self.request_get(path)?;
        self.ensure_success(success)?;
        self.last_response_as_value()
    }

    /// POSTs `{root: params}` as XML and decodes the response.
    pub(crate) fn post_xml(&self, path: &str, root: &str, params: Params) -> Result<Value, ApiError> {
        self.post_xml_document(path, wrap(root, params))
    }

    /// POSTs a complete XML document, such as `{"user_id": 5}`.
    pub(crate) fn post_xml_document(&self, path: &str, document: Value) -> Result<Value, ApiError> {
        let body = XmlSerializer::from_value(document)?;
        let success = self.request_post(path, body.encoded())?;
        self.ensure_success(success)?;
        self.last_response_as_value()
    }

    /// PUTs `{root: params}` as XML.
    pub(crate) fn put_xml(&self, path: &str, root: &str, params: Params) -> Result<Value, ApiError> {
        let body = XmlSerializer::from_value(wrap(root, params))?;
        let success = self.request_put(path, body.encoded())?;
        self.ensure_success(success)?;
        self.last_response_as_value()
    }

    /// POSTs `{root: params}` as JSON and decodes the response.
    pub(crate) fn post_json(&self, path: &str, root: &str, params: Params) -> Result<Value, ApiError> {
        let body = JsonSerializer::from_value(wrap(root, params))?;
        let success = self.request_post(path, body.encoded())?;
        self.ensure_success(success)?;
        self.last_response_as_value()
    }

    /// PUTs `{root: params}` as JSON.
    pub(crate) fn put_json(&self, path: &str, root: &str, params: Params) -> Result<(), ApiError> {
        let body = JsonSerializer::from_value(wrap(root, params))?;
        let success = self.request_put(path, body.encoded())?;
        self.ensure_success(success)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<(), ApiError> {
        let success = self.request_delete(path)?;
        self.ensure_success(success)
    }
}

fn wrap(root: &str, params: Params) -> Value {
    let mut document = Map::new();
    document.insert(root.to_string(), Value::Object(params));
    Value::Object(document)
}

/// Converts caller-supplied parameters into a mapping.
///
/// `Value::Null` means "no parameters".
pub(crate) fn into_params(params: Value) -> Result<Params, ApiError> {
    match params {
        Value::Null => Ok(Params::new()),
        Value::Object(map) => Ok(map),
        other => Err(ApiError::InvalidParameter(format!(
            "parameters must be a mapping, got {}",
            other
        ))),
    }
}

/// Merges `params` over `defaults` and drops null values.
///
/// Default keys come first, in the given order.
pub(crate) fn sanitize_params(defaults: &[&str], params: Params) -> Params {
    let mut merged = Params::new();
    for key in defaults {
        merged.insert((*key).to_string(), Value::Null);
    }
    for (key, value) in params {
        merged.insert(key, value);
    }
    merged.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Fails with every name in `required` that is absent or null in `params`.
pub(crate) fn require(params: &Params, required: &[&str]) -> Result<(), ApiError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| params.get(**key).map_or(true, Value::is_null))
        .map(|key| (*key).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingParameter(missing))
    }
}

/// Joins a sequence `include` parameter into Redmine's comma-separated form.
pub(crate) fn join_include(params: &mut Params) {
    let joined = match params.get("include") {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect::<Vec<_>>().join(","),
        _ => return,
    };
    params.insert("include".to_string(), Value::String(joined));
}

/// Encodes one path segment, such as a project identifier or wiki page title.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Reads a number from a JSON number or a numeric string.
pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a scalar as text.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response, Transport};
    use serde_json::json;

    struct Fixed(Response);

    impl Transport for Fixed {
        fn request(&self, _request: Request) -> Result<Response, ClientError> {
            Ok(self.0.clone())
        }

        fn set_impersonated_user(&mut self, _login: Option<String>) {}
    }

    fn client_answering(status: u16, content_type: &str, body: &str) -> Client {
        Client::from_transport(Fixed(Response::new(status, content_type, body)))
    }

    #[test]
    fn test_decode_json_response() {
        let client = client_answering(200, "application/json; charset=utf-8", r#"{"issue":{"id":3}}"#);
        client.request_get("/issues/3.json").unwrap();

        assert_eq!(client.last_response_as_value().unwrap(), json!({"issue": {"id": 3}}));
    }

    #[test]
    fn test_decode_xml_response() {
        let client = client_answering(201, "application/xml", "<group><id>6</id></group>");
        client.request_post("/groups.xml", "<group/>").unwrap();

        assert_eq!(client.last_response_as_value().unwrap(), json!({"group": {"id": "6"}}));
    }

    #[test]
    fn test_decode_unknown_content_type() {
        let client = client_answering(200, "text/html", "<html></html>");
        client.request_get("/").unwrap();

        let err = client.last_response_as_value().unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse { status: 200, .. }));
    }

    #[test]
    fn test_empty_body_is_null() {
        let client = client_answering(204, "", "");
        client.request_put("/issues/1.xml", "<issue/>").unwrap();

        assert_eq!(client.last_response_as_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_error_status_becomes_unexpected_response() {
        let client = client_answering(422, "application/json", r#"{"errors":["Name cannot be blank"]}"#);

        let err = client.get_value("/groups.json").unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("Name cannot be blank"));
    }

    #[test]
    fn test_sanitize_params_orders_defaults_first() {
        let params = into_params(json!({"extra": 1, "hours": 2, "comments": null})).unwrap();
        let sanitized = sanitize_params(&["issue_id", "hours", "comments"], params);

        let keys: Vec<&str> = sanitized.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hours", "extra"]);
    }

    #[test]
    fn test_require_lists_all_missing() {
        let params = into_params(json!({"login": "jsmith", "mail": null})).unwrap();
        let err = require(&params, &["login", "lastname", "firstname", "mail"]).unwrap_err();

        match err {
            ApiError::MissingParameter(names) => assert_eq!(names, vec!["lastname", "firstname", "mail"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_into_params_rejects_scalars() {
        assert!(into_params(Value::Null).unwrap().is_empty());
        assert!(matches!(into_params(json!([1])), Err(ApiError::InvalidParameter(_))));
    }

    #[test]
    fn test_join_include() {
        let mut params = into_params(json!({"include": ["journals", "watchers"]})).unwrap();
        join_include(&mut params);
        assert_eq!(params["include"], "journals,watchers");

        let mut params = into_params(json!({"include": "children"})).unwrap();
        join_include(&mut params);
        assert_eq!(params["include"], "children");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("Start Page"), "Start%20Page");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(segment("my-project_1"), "my-project_1");
    }
}
