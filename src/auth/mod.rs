//
//  redmine-api
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Redmine accepts two kinds of credentials on its REST API:
//!
//! - **API key**: Sent in the `X-Redmine-API-Key` header. The native transport
//!   also sends it as the HTTP Basic username with a random numeric password,
//!   which older Redmine versions expect.
//! - **Username and password**: Standard HTTP Basic authentication.
//!
//! Requests without credentials are allowed and see only public data.
//!
//! ## Example
//!
//! ```rust
//! use redmine_api::auth::Auth;
//!
//! let auth = Auth::api_key("0ef1c2d3");
//! assert!(auth.is_api_key());
//!
//! let headers = Auth::basic("admin", "secret").headers();
//! assert_eq!(headers[0].0, "Authorization");
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;
use reqwest::blocking::RequestBuilder;

use crate::http::API_KEY_HEADER;

/// Credentials used for every request of a client.
///
/// # Variants
///
/// - `ApiKey`: The key shown on the user's "My account" page
/// - `Basic`: A login and password
/// - `Anonymous`: No credentials
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Auth {
    /// Redmine API key.
    ApiKey(String),
    /// HTTP Basic authentication.
    Basic {
        /// The Redmine login.
        username: String,
        /// The user's password.
        password: String,
    },
    /// No authentication.
    #[default]
    Anonymous,
}

impl Auth {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_api_key(&self) -> bool {
        matches!(self, Self::ApiKey(_))
    }

    /// Applies the credential to a reqwest request.
    ///
    /// # Parameters
    ///
    /// - `request`: The [`RequestBuilder`] to authenticate.
    ///
    /// # Returns
    ///
    /// The request with the API key header and Basic credentials added. An API
    /// key is sent both as the header and as the Basic username, paired with a
    /// random password in `100000..200000`.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => {
                let password = rand::rng().random_range(100_000..200_000).to_string();
                request
                    .header(API_KEY_HEADER, key)
                    .basic_auth(key, Some(password))
            }
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Anonymous => request,
        }
    }

    /// Returns the authentication headers as name/value pairs.
    ///
    /// Used by transports that build standard `http` requests.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_api::auth::Auth;
    ///
    /// let headers = Auth::basic("jsmith", "pass").headers();
    /// assert_eq!(headers, vec![("Authorization", "Basic anNtaXRoOnBhc3M=".to_string())]);
    ///
    /// assert!(Auth::Anonymous.headers().is_empty());
    /// ```
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::ApiKey(key) => vec![(API_KEY_HEADER, key.clone())],
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{}:{}", username, password));
                vec![("Authorization", format!("Basic {}", encoded))]
            }
            Self::Anonymous => Vec::new(),
        }
    }
}
