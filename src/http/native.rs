//
//  redmine-api
//  http/native.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Transport built directly on `reqwest::blocking`.

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use super::{request_body, ClientError, Method, Request, Response, Transport, SWITCH_USER_HEADER};
use crate::auth::Auth;

type Configure = Box<dyn FnOnce(ClientBuilder) -> ClientBuilder + Send>;

/// A [`Transport`] owning a blocking reqwest client.
///
/// Redirects are never followed, so a redirect status reaches the caller as
/// an ordinary response.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use redmine_api::auth::Auth;
/// use redmine_api::http::{Method, NativeTransport, Request, Transport};
///
/// let transport = NativeTransport::builder("https://redmine.example.com", Auth::api_key("secret"))
///     .timeout(Duration::from_secs(10))
///     .header("X-Request-Source", "nightly-sync")
///     .build()?;
///
/// let response = transport.request(Request::new(Method::Get, "/issues.json", ""))?;
/// println!("{}", response.status_code());
/// # Ok::<(), redmine_api::http::ClientError>(())
/// ```
pub struct NativeTransport {
    base_url: String,
    auth: Auth,
    impersonated_user: Option<String>,
    http: Client,
}

impl NativeTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self, ClientError> {
        Self::builder(base_url, auth).build()
    }

    pub fn builder(base_url: &str, auth: Auth) -> NativeTransportBuilder {
        NativeTransportBuilder::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for NativeTransport {
    fn request(&self, request: Request) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, request.path());
        let mut builder = self.http.request(Self::method(request.method()), &url);
        builder = self.auth.apply_to_request(builder);

        if let Some(login) = &self.impersonated_user {
            builder = builder.header(SWITCH_USER_HEADER, login);
        }
        if !request.content_type().is_empty() {
            builder = builder.header(CONTENT_TYPE, request.content_type());
        }
        if request.method().has_body() {
            builder = builder.body(request_body(&request));
        }

        debug!(method = %request.method(), url = %url, "Sending request");

        let response = builder.send()?;
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes()?.to_vec();

        debug!(status = status_code, content_type = %content_type, bytes = body.len(), "Received response");

        Ok(Response::new(status_code, content_type, body))
    }

    fn set_impersonated_user(&mut self, login: Option<String>) {
        self.impersonated_user = login;
    }
}

/// Builder for [`NativeTransport`].
pub struct NativeTransportBuilder {
    base_url: String,
    auth: Auth,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    configure: Vec<Configure>,
}

impl NativeTransportBuilder {
    pub fn new(base_url: &str, auth: Auth) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth,
            timeout: None,
            connect_timeout: None,
            headers: Vec::new(),
            configure: Vec::new(),
        }
    }

    /// Total time allowed for one request, response body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Applies arbitrary reqwest client settings, such as proxies or custom
    /// root certificates.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_api::auth::Auth;
    /// use redmine_api::http::NativeTransport;
    ///
    /// let transport = NativeTransport::builder("https://redmine.example.com", Auth::Anonymous)
    ///     .configure(|builder| builder.danger_accept_invalid_certs(true))
    ///     .build();
    /// assert!(transport.is_ok());
    /// ```
    pub fn configure<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(ClientBuilder) -> ClientBuilder + Send + 'static,
    {
        self.configure.push(Box::new(configure));
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] if the base URL does not parse
    /// - [`ClientError::InvalidHeader`] if a default header is malformed
    /// - [`ClientError::Request`] if reqwest rejects the configuration
    pub fn build(self) -> Result<NativeTransport, ClientError> {
        Url::parse(&self.base_url)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.append(name, value);
        }

        let mut builder = Client::builder()
            .user_agent(format!("redmine-api/{}", crate::VERSION))
            .redirect(Policy::none())
            .default_headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        for configure in self.configure {
            builder = configure(builder);
        }

        Ok(NativeTransport {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            auth: self.auth,
            impersonated_user: None,
            http: builder.build()?,
        })
    }
}
