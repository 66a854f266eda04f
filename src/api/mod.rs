//
//  redmine-api
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the client for Redmine's REST API and one typed API
//! per resource.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: The request/response facade over a [`Transport`](crate::http::Transport)
//! - [`common`]: Error type, response decoding and pagination helpers
//! - [`resources`]: Projects, issues, users, versions, wikis and the other resources
//!
//! ## Usage
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! let projects = client.project().list_names()?;
//! for (id, name) in &projects {
//!     println!("{:>5} {}", id, name);
//! }
//!
//! let issue = client.issue().show(42, json!({"include": ["journals"]}))?;
//! println!("{}", issue["issue"]["subject"]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Resource operations return [`ApiError`]:
//!
//! - `MissingParameter` / `InvalidParameter`: rejected before any request
//! - `UnexpectedResponse`: 4xx/5xx status or an undecodable content type
//! - `Client`: the HTTP exchange failed
//! - `Serializer`: a body could not be encoded or decoded

/// Request/response facade.
pub mod client;

/// Shared error type, response decoding and pagination.
pub mod common;

/// Per-resource APIs.
pub mod resources;

pub use client::Client;
pub use common::ApiError;
pub use resources::{Api, ApiName};
