//
//  redmine-api
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request/Response Facade
//!
//! [`Client`] is the single entry point the resource APIs use to talk to a
//! Redmine server. It turns a method, a path and a body into a
//! [`Request`], passes it to the configured [`Transport`] and keeps the
//! [`Response`] as the "last response" for the caller to inspect.
//!
//! ## Features
//!
//! - Content type chosen from the path suffix (`.json`, `.xml`, uploads)
//! - Interchangeable transports (native reqwest or an injected client)
//! - User impersonation through `X-Redmine-Switch-User`
//! - Responses are stored undecoded; decoding happens on demand
//!
//! ## Example
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! if client.request_get("/issues.json?limit=1")? {
//!     println!("{}", client.last_response_body());
//! } else {
//!     eprintln!("Request failed with status {}", client.last_response_status_code());
//! }
//! # Ok::<(), redmine_api::http::ClientError>(())
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::auth::Auth;
use crate::http::{
    ClientError, HttpClient, HttpClientTransport, Method, NativeTransport, Request, Response,
    Transport,
};

/// A Redmine API client.
///
/// `Client` is `Send + Sync` and can be shared between threads. The last
/// response is shared state, however: when one instance serves concurrent
/// calls, the last-response accessors return whichever response was stored
/// most recently, in no defined order. Use one client per thread if you need
/// to read the response of your own call.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use std::time::Duration;
/// use redmine_api::api::Client;
/// use redmine_api::auth::Auth;
/// use redmine_api::http::NativeTransport;
///
/// // Native transport with defaults
/// let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
///
/// // Any reqwest client through the pluggable transport
/// let client = Client::with_http_client(
///     "https://redmine.example.com",
///     Auth::basic("jsmith", "password"),
///     reqwest::blocking::Client::new(),
/// )?;
///
/// // A configured transport
/// let transport = NativeTransport::builder("https://redmine.example.com", Auth::Anonymous)
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// let client = Client::from_transport(transport);
/// # Ok::<(), redmine_api::http::ClientError>(())
/// ```
pub struct Client {
    transport: Box<dyn Transport>,
    last_response: Mutex<Option<Response>>,
}

impl Client {
    /// Creates a client using [`NativeTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `url` is not an absolute URL.
    pub fn native(url: &str, auth: Auth) -> Result<Self, ClientError> {
        Ok(Self::from_transport(NativeTransport::new(url, auth)?))
    }

    /// Creates a client sending requests through `client`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `url` is not an absolute URL.
    pub fn with_http_client<C>(url: &str, auth: Auth, client: C) -> Result<Self, ClientError>
    where
        C: HttpClient + 'static,
    {
        Ok(Self::from_transport(HttpClientTransport::new(url, auth, client)?))
    }

    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            last_response: Mutex::new(None),
        }
    }

    /// Sends a GET request.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the server answered with a status below 400, `Ok(false)`
    /// for any 4xx or 5xx status.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] if no response was received. The previous
    /// last response is kept in that case.
    pub fn request_get(&self, path: &str) -> Result<bool, ClientError> {
        self.run_request(Method::Get, path, Vec::new())
    }

    /// Sends a POST request with `body`.
    pub fn request_post(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<bool, ClientError> {
        self.run_request(Method::Post, path, body.into())
    }

    /// Sends a PUT request with `body`.
    pub fn request_put(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<bool, ClientError> {
        self.run_request(Method::Put, path, body.into())
    }

    /// Sends a DELETE request.
    pub fn request_delete(&self, path: &str) -> Result<bool, ClientError> {
        self.run_request(Method::Delete, path, Vec::new())
    }

    fn run_request(&self, method: Method, path: &str, body: Vec<u8>) -> Result<bool, ClientError> {
        let response = self.transport.request(Request::new(method, path, body))?;
        let success = response.is_success();

        debug!(%method, path, status = response.status_code(), success, "Stored last response");

        *self.lock_last_response() = Some(response);
        Ok(success)
    }

    fn lock_last_response(&self) -> MutexGuard<'_, Option<Response>> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Status code of the last response, `0` before any request.
    pub fn last_response_status_code(&self) -> u16 {
        self.lock_last_response()
            .as_ref()
            .map_or(0, Response::status_code)
    }

    /// Content type of the last response, empty before any request.
    pub fn last_response_content_type(&self) -> String {
        self.lock_last_response()
            .as_ref()
            .map(|response| response.content_type().to_string())
            .unwrap_or_default()
    }

    /// Body of the last response as text, empty before any request.
    pub fn last_response_body(&self) -> String {
        self.lock_last_response()
            .as_ref()
            .map(Response::text)
            .unwrap_or_default()
    }

    /// Body of the last response as raw bytes.
    pub fn last_response_bytes(&self) -> Vec<u8> {
        self.lock_last_response()
            .as_ref()
            .map(|response| response.body().to_vec())
            .unwrap_or_default()
    }

    /// A copy of the last response, if any.
    pub fn last_response(&self) -> Option<Response> {
        self.lock_last_response().clone()
    }

    /// Sends all following requests on behalf of `login`.
    ///
    /// Requires an administrator account.
    pub fn start_impersonate_user(&mut self, login: &str) {
        self.transport.set_impersonated_user(Some(login.to_string()));
    }

    pub fn stop_impersonate_user(&mut self) {
        self.transport.set_impersonated_user(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Scripted {
        responses: Arc<Mutex<VecDeque<Result<Response, String>>>>,
        requests: Arc<Mutex<Vec<(Request, Option<String>)>>>,
        impersonated: Option<String>,
    }

    impl Transport for Scripted {
        fn request(&self, request: Request) -> Result<Response, ClientError> {
            self.requests
                .lock()
                .unwrap()
                .push((request, self.impersonated.clone()));
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(ClientError::Connection(message)),
                None => Ok(Response::new(200, "", "")),
            }
        }

        fn set_impersonated_user(&mut self, login: Option<String>) {
            self.impersonated = login;
        }
    }

    #[test]
    fn test_no_response_yet() {
        let client = Client::from_transport(Scripted::default());

        assert_eq!(client.last_response_status_code(), 0);
        assert_eq!(client.last_response_content_type(), "");
        assert_eq!(client.last_response_body(), "");
        assert!(client.last_response().is_none());
    }

    #[test]
    fn test_success_boundaries() {
        let transport = Scripted::default();
        {
            let mut responses = transport.responses.lock().unwrap();
            responses.push_back(Ok(Response::new(201, "application/json", "{}")));
            responses.push_back(Ok(Response::new(404, "text/html", "Not found")));
            responses.push_back(Ok(Response::new(500, "", "")));
        }
        let client = Client::from_transport(transport);

        assert!(client.request_post("/issues.json", "{}").unwrap());
        assert!(!client.request_get("/issues/99.json").unwrap());
        assert_eq!(client.last_response_status_code(), 404);
        assert_eq!(client.last_response_body(), "Not found");
        assert!(!client.request_delete("/issues/1.xml").unwrap());
    }

    #[test]
    fn test_last_response_replaced_wholesale() {
        let transport = Scripted::default();
        {
            let mut responses = transport.responses.lock().unwrap();
            responses.push_back(Ok(Response::new(200, "application/json", r#"{"a":1}"#)));
            responses.push_back(Ok(Response::new(204, "", "")));
        }
        let client = Client::from_transport(transport);

        client.request_get("/a.json").unwrap();
        client.request_put("/a.xml", "<a/>").unwrap();

        assert_eq!(client.last_response_status_code(), 204);
        assert_eq!(client.last_response_content_type(), "");
        assert_eq!(client.last_response_body(), "");
    }

    #[test]
    fn test_transport_error_keeps_previous_response() {
        let transport = Scripted::default();
        {
            let mut responses = transport.responses.lock().unwrap();
            responses.push_back(Ok(Response::new(200, "application/json", "[]")));
            responses.push_back(Err("refused".to_string()));
        }
        let client = Client::from_transport(transport);

        client.request_get("/a.json").unwrap();
        let err = client.request_get("/b.json").unwrap_err();

        assert!(matches!(err, ClientError::Connection(_)));
        assert_eq!(client.last_response_body(), "[]");
    }

    #[test]
    fn test_impersonation() {
        let transport = Scripted::default();
        let requests = transport.requests.clone();
        let mut client = Client::from_transport(transport);

        client.start_impersonate_user("jsmith");
        client.request_get("/users/current.json").unwrap();
        client.stop_impersonate_user();
        client.request_get("/users/current.json").unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].1.as_deref(), Some("jsmith"));
        assert_eq!(requests[1].1, None);
    }

    #[test]
    fn test_requests_carry_path_content_type() {
        let transport = Scripted::default();
        let requests = transport.requests.clone();
        let client = Client::from_transport(transport);

        client.request_post("/uploads.json?filename=a.png", vec![1u8, 2, 3]).unwrap();
        client.request_post("/issues.xml", "<issue/>").unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].0.content_type(), "application/octet-stream");
        assert_eq!(requests[0].0.content(), &[1u8, 2, 3]);
        assert_eq!(requests[1].0.content_type(), "text/xml");
        assert_eq!(requests[1].0.method(), Method::Post);
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
