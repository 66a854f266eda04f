//
//  redmine-api
//  http/pluggable.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Transport delegating to an injected HTTP client.
//!
//! Any client able to send an `http::Request<Vec<u8>>` and return an
//! `http::Response<Vec<u8>>` can be used by implementing [`HttpClient`]. An
//! implementation for `reqwest::blocking::Client` is provided.

use tracing::debug;
use url::Url;

use super::{request_body, ClientError, Method, Request, Response, Transport, SWITCH_USER_HEADER};
use crate::auth::Auth;

/// A synchronous HTTP client speaking the standard `http` types.
///
/// # Example
///
/// ```rust
/// use redmine_api::http::{ClientError, HttpClient};
///
/// struct Offline;
///
/// impl HttpClient for Offline {
///     fn execute(
///         &self,
///         _request: http::Request<Vec<u8>>,
///     ) -> Result<http::Response<Vec<u8>>, ClientError> {
///         Err(ClientError::Connection("offline".to_string()))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the full response.
    ///
    /// # Errors
    ///
    /// Return a [`ClientError`] only when no response was received. Error
    /// statuses must be returned as responses.
    fn execute(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>, ClientError>;
}

impl HttpClient for reqwest::blocking::Client {
    fn execute(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>, ClientError> {
        let request = reqwest::blocking::Request::try_from(request)?;
        let response = reqwest::blocking::Client::execute(self, request)?;

        let mut builder = http::Response::builder().status(response.status().as_u16());
        for (name, value) in response.headers() {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
        let body = response.bytes()?.to_vec();

        builder.body(body).map_err(|e| ClientError::Other(Box::new(e)))
    }
}

/// A [`Transport`] sending requests through an [`HttpClient`].
///
/// # Example
///
/// ```rust
/// use redmine_api::auth::Auth;
/// use redmine_api::http::HttpClientTransport;
///
/// let transport = HttpClientTransport::new(
///     "https://redmine.example.com",
///     Auth::api_key("secret"),
///     reqwest::blocking::Client::new(),
/// )?;
/// # Ok::<(), redmine_api::http::ClientError>(())
/// ```
pub struct HttpClientTransport<C> {
    base_url: String,
    auth: Auth,
    impersonated_user: Option<String>,
    client: C,
}

impl<C: HttpClient> HttpClientTransport<C> {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, auth: Auth, client: C) -> Result<Self, ClientError> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            impersonated_user: None,
            client,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn build_request(&self, request: &Request) -> Result<http::Request<Vec<u8>>, ClientError> {
        let method = match request.method() {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        };

        let mut builder = http::Request::builder()
            .method(method)
            .uri(format!("{}{}", self.base_url, request.path()))
            .header(http::header::USER_AGENT, format!("redmine-api/{}", crate::VERSION));

        for (name, value) in self.auth.headers() {
            builder = builder.header(name, value);
        }
        if let Some(login) = &self.impersonated_user {
            builder = builder.header(SWITCH_USER_HEADER, login.as_str());
        }
        if !request.content_type().is_empty() {
            builder = builder.header(http::header::CONTENT_TYPE, request.content_type());
        }

        let body = if request.method().has_body() {
            request_body(request)
        } else {
            Vec::new()
        };

        builder.body(body).map_err(|e| {
            if e.is::<http::uri::InvalidUri>() {
                ClientError::InvalidUrl(e.to_string())
            } else {
                ClientError::InvalidHeader(e.to_string())
            }
        })
    }
}

impl<C: HttpClient> Transport for HttpClientTransport<C> {
    fn request(&self, request: Request) -> Result<Response, ClientError> {
        let http_request = self.build_request(&request)?;

        debug!(method = %request.method(), uri = %http_request.uri(), "Sending request");

        let response = self.client.execute(http_request)?;
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.into_body();

        debug!(status = status_code, content_type = %content_type, bytes = body.len(), "Received response");

        Ok(Response::new(status_code, content_type, body))
    }

    fn set_impersonated_user(&mut self, login: Option<String>) {
        self.impersonated_user = login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records requests and answers with a fixed response.
    struct Recorder {
        requests: Mutex<Vec<http::Request<Vec<u8>>>>,
    }

    impl HttpClient for Recorder {
        fn execute(&self, request: http::Request<Vec<u8>>) -> Result<http::Response<Vec<u8>>, ClientError> {
            self.requests.lock().unwrap().push(request);
            Ok(http::Response::builder()
                .status(201)
                .header("Content-Type", "application/json; charset=utf-8")
                .body(br#"{"issue":{"id":1}}"#.to_vec())
                .unwrap())
        }
    }

    fn transport(auth: Auth) -> HttpClientTransport<Recorder> {
        let recorder = Recorder {
            requests: Mutex::new(Vec::new()),
        };
        HttpClientTransport::new("https://redmine.example.com/", auth, recorder).unwrap()
    }

    #[test]
    fn test_request_headers_and_body() {
        let mut transport = transport(Auth::api_key("key"));
        transport.set_impersonated_user(Some("jsmith".to_string()));

        let response = transport
            .request(Request::new(Method::Post, "/issues.xml", "<issue/>"))
            .unwrap();

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.content_type(), "application/json; charset=utf-8");
        assert_eq!(response.text(), r#"{"issue":{"id":1}}"#);

        let requests = transport.client().requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(*sent.method(), http::Method::POST);
        assert_eq!(sent.uri(), "https://redmine.example.com/issues.xml");
        assert_eq!(sent.headers()["X-Redmine-API-Key"], "key");
        assert_eq!(sent.headers()["X-Redmine-Switch-User"], "jsmith");
        assert_eq!(sent.headers()["Content-Type"], "text/xml");
        assert_eq!(sent.body(), b"<issue/>");
    }

    #[test]
    fn test_get_sends_no_body() {
        let transport = transport(Auth::basic("jsmith", "pass"));
        transport
            .request(Request::new(Method::Get, "/issues.json?limit=1", "ignored"))
            .unwrap();

        let requests = transport.client().requests.lock().unwrap();
        assert!(requests[0].body().is_empty());
        assert_eq!(requests[0].headers()["Authorization"], "Basic anNtaXRoOnBhc3M=");
        assert!(requests[0].headers().get("X-Redmine-Switch-User").is_none());
    }
}
