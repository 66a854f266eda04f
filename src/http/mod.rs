//
//  redmine-api
//  http/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transport Layer
//!
//! This module defines the narrow interface between the request/response
//! facade and the code that actually talks HTTP. The facade builds a
//! [`Request`], hands it to a [`Transport`] and stores the returned
//! [`Response`]; it never sees a socket or a client library type.
//!
//! ## Transports
//!
//! - [`NativeTransport`]: Built directly on `reqwest::blocking`, with
//!   configurable timeouts and default headers
//! - [`HttpClientTransport`]: Delegates to any [`HttpClient`] speaking the
//!   standard `http` crate types
//!
//! Both send the same authentication headers and produce identical
//! [`Response`] values for identical requests.
//!
//! ## Errors
//!
//! A [`ClientError`] means the exchange itself failed (no connection, a
//! timeout, a TLS failure, ...). HTTP error statuses are not errors at this
//! layer; they come back as ordinary responses.

mod native;
mod pluggable;

pub use native::{NativeTransport, NativeTransportBuilder};
pub use pluggable::{HttpClient, HttpClientTransport};

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Header carrying a Redmine API key.
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Header asking Redmine to act as another user (administrators only).
pub const SWITCH_USER_HEADER: &str = "X-Redmine-Switch-User";

/// Longest request body still considered as a possible local file path.
const MAX_UPLOAD_PATH_LEN: usize = 4096;

/// Error raised when an HTTP exchange could not be completed.
///
/// # Variants
///
/// | Variant | Cause |
/// |---------|-------|
/// | `Connection` | Host unreachable, connection refused, DNS failure |
/// | `Timeout` | Connect or read timeout elapsed |
/// | `Tls` | Certificate or handshake failure |
/// | `Io` | Local I/O failure |
/// | `InvalidUrl` | The server URL or request path is not a valid URL |
/// | `InvalidHeader` | A header name or value cannot be sent |
/// | `Request` | Any other failure reported by the HTTP library |
/// | `Other` | Failure reported by an injected [`HttpClient`] |
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let message = error_chain(&e);

        if e.is_timeout() {
            Self::Timeout(message)
        } else if e.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("certificate") || lower.contains("tls") || lower.contains("handshake") {
                Self::Tls(message)
            } else {
                Self::Connection(message)
            }
        } else if e.is_builder() && e.url().is_none() {
            Self::InvalidUrl(message)
        } else {
            Self::Request(message)
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

/// Joins an error and all of its sources into one line.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// HTTP methods used by the Redmine REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// A request ready to be sent by a [`Transport`].
///
/// The content type is derived from the path when the request is created:
///
/// | Path | Content type |
/// |------|--------------|
/// | `/uploads.json`, `/uploads.xml` | `application/octet-stream` |
/// | `*.json` | `application/json` |
/// | `*.xml` | `text/xml` |
/// | anything else | none |
///
/// # Example
///
/// ```rust
/// use redmine_api::http::{Method, Request};
///
/// let request = Request::new(Method::Post, "/issues.xml", "<issue/>");
/// assert_eq!(request.content_type(), "text/xml");
///
/// let upload = Request::new(Method::Post, "/uploads.json?filename=a.png", vec![0x89, 0x50]);
/// assert_eq!(upload.content_type(), "application/octet-stream");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    content_type: String,
    content: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        let content_type = content_type_for(&path).to_string();
        Self {
            method,
            path,
            content_type,
            content: content.into(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the server URL, including any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Content type header value, empty when none applies.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Whether this request targets the file upload endpoint.
    pub fn is_upload(&self) -> bool {
        is_upload_path(&self.path)
    }
}

/// A response as returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    content_type: String,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status_code: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The `Content-Type` header, empty if the server sent none.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// True for statuses below 400.
    pub fn is_success(&self) -> bool {
        self.status_code < 400
    }
}

/// Sends requests to a Redmine server.
///
/// Implementations own the server URL and credentials and add the matching
/// authentication headers to every request.
///
/// # Example
///
/// ```rust
/// use redmine_api::http::{ClientError, Request, Response, Transport};
///
/// struct Canned;
///
/// impl Transport for Canned {
///     fn request(&self, _request: Request) -> Result<Response, ClientError> {
///         Ok(Response::new(200, "application/json", r#"{"issues":[]}"#))
///     }
///
///     fn set_impersonated_user(&mut self, _login: Option<String>) {}
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] only when no response could be obtained.
    fn request(&self, request: Request) -> Result<Response, ClientError>;

    /// Sets or clears the login sent in [`SWITCH_USER_HEADER`].
    fn set_impersonated_user(&mut self, login: Option<String>);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn request(&self, request: Request) -> Result<Response, ClientError> {
        (**self).request(request)
    }

    fn set_impersonated_user(&mut self, login: Option<String>) {
        (**self).set_impersonated_user(login)
    }
}

fn request_path(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn is_upload_path(path: &str) -> bool {
    matches!(request_path(path), "/uploads.json" | "/uploads.xml")
}

fn content_type_for(path: &str) -> &'static str {
    let path = request_path(path);
    if is_upload_path(path) {
        "application/octet-stream"
    } else if path.ends_with(".json") {
        "application/json"
    } else if path.ends_with(".xml") {
        "text/xml"
    } else {
        ""
    }
}

/// Returns the bytes to send for a request.
///
/// Uploads whose body names a readable local file send that file's contents
/// instead. This is deprecated in favour of passing the file contents.
pub(crate) fn request_body(request: &Request) -> Vec<u8> {
    if !request.method.has_body() || !request.is_upload() {
        return request.content.clone();
    }

    let Some(path) = upload_file_path(&request.content) else {
        return request.content.clone();
    };

    match fs::read(path) {
        Ok(contents) => {
            warn!(
                file = %path.display(),
                "Uploading a file by its path is deprecated, pass the file contents instead"
            );
            contents
        }
        Err(_) => request.content.clone(),
    }
}

fn upload_file_path(content: &[u8]) -> Option<&Path> {
    if content.is_empty() || content.len() > MAX_UPLOAD_PATH_LEN || content.contains(&0) {
        return None;
    }
    let text = std::str::from_utf8(content).ok()?;
    let path = Path::new(text);
    path.is_file().then_some(path)
}
