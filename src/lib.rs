//
//  redmine-api
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Redmine API Library
//!
//! A client for the Redmine REST API and the library behind the `redmine`
//! command-line tool.
//!
//! ## Overview
//!
//! Redmine exposes its resources as `.json` and `.xml` endpoints. This crate
//! sends requests to those endpoints through a pluggable transport, encodes
//! request bodies and decodes responses into [`serde_json::Value`] whichever
//! format the server answered in.
//!
//! ## Features
//!
//! - **Typed resource APIs**: Projects, issues, users, versions, wikis, time entries and more
//! - **Two formats, one shape**: JSON and XML bodies decode to the same value
//! - **Pagination**: Large `limit`s are fetched in chunks of 100
//! - **Name resolution**: Issues accept project, tracker, status and user names
//! - **Impersonation**: Act as another user with `X-Redmine-Switch-User`
//! - **Pluggable transports**: Built-in reqwest transport or any [`http`]-typed client
//!
//! ## Module Structure
//!
//! - [`api`]: The client facade and the resource APIs
//! - [`auth`]: API key and HTTP Basic credentials
//! - [`http`]: Requests, responses and transports
//! - [`serializer`]: Query paths plus the JSON and XML codecs
//! - [`config`]: Configuration file management for the CLI
//! - [`cli`]: Command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! let issues = client.issue().list(json!({"project_id": "website", "limit": 250}))?;
//! for issue in issues["issues"].as_array().into_iter().flatten() {
//!     println!("#{} {}", issue["id"], issue["subject"]);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Redmine API client and resource APIs.
///
/// [`api::Client`] sends requests through a transport and remembers the last
/// response; the resource APIs build paths and bodies on top of it.
pub mod api;

/// Authentication credentials.
///
/// Supports API keys (`X-Redmine-API-Key`) and HTTP Basic authentication.
pub mod auth;

/// Command-line interface definitions.
pub mod cli;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/redmine/config.toml`
/// - macOS: `~/Library/Application Support/redmine/config.toml`
/// - Windows: `%APPDATA%\redmine\config\config.toml`
pub mod config;

/// HTTP requests, responses and transports.
pub mod http;

/// Query path building and the JSON/XML structural serializers.
pub mod serializer;

/// Re-export of the main CLI struct for convenient access.
pub use cli::Cli;

/// Re-export of the client facade.
///
/// # Example
///
/// ```rust,no_run
/// use redmine_api::{Auth, Client};
///
/// let client = Client::native("https://redmine.example.com", Auth::Anonymous)?;
/// # Ok::<(), redmine_api::http::ClientError>(())
/// ```
pub use api::Client;

/// Re-export of the credentials type.
pub use auth::Auth;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "redmine";

/// Application version constant.
///
/// The current version of the crate, automatically derived from Cargo.toml
/// at compile time using the `CARGO_PKG_VERSION` environment variable.
///
/// # Example
///
/// ```rust
/// use redmine_api::VERSION;
///
/// println!("redmine version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: Connection issues
pub mod exit_codes {
    use crate::api::ApiError;
    use crate::http::ClientError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments, including rejected API parameters.
    pub const USAGE: i32 = 2;

    /// The server answered 401 or 403.
    pub const AUTH_ERROR: i32 = 4;

    /// The server answered 404.
    pub const NOT_FOUND: i32 = 8;

    /// The server could not be reached or did not answer in time.
    pub const CONNECTION: i32 = 32;

    /// Picks the exit code for an error returned by a command.
    ///
    /// The error chain is searched for an [`ApiError`] or [`ClientError`];
    /// anything else maps to [`ERROR`].
    pub fn for_error(error: &anyhow::Error) -> i32 {
        for cause in error.chain() {
            if let Some(api) = cause.downcast_ref::<ApiError>() {
                return match api {
                    ApiError::InvalidParameter(_) | ApiError::MissingParameter(_) => USAGE,
                    ApiError::Client(client) => for_client_error(client),
                    ApiError::UnexpectedResponse { status, .. } => for_status(*status),
                    ApiError::Serializer(_) => ERROR,
                };
            }
            if let Some(client) = cause.downcast_ref::<ClientError>() {
                return for_client_error(client);
            }
        }
        ERROR
    }

    fn for_client_error(error: &ClientError) -> i32 {
        match error {
            ClientError::Connection(_) | ClientError::Timeout(_) | ClientError::Tls(_) => CONNECTION,
            ClientError::InvalidUrl(_) | ClientError::InvalidHeader(_) => USAGE,
            _ => ERROR,
        }
    }

    fn for_status(status: u16) -> i32 {
        match status {
            401 | 403 => AUTH_ERROR,
            404 => NOT_FOUND,
            _ => ERROR,
        }
    }

}
