//
//  redmine-api
//  api/resources/attachment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Attachments and file uploads.
//!
//! Attaching a file is a two-step process: [`AttachmentApi::upload`] sends
//! the raw bytes and returns a token, which is then referenced from an
//! `uploads` entry when creating or updating an issue, a project file or a
//! wiki page.
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! let upload = client.attachment().upload(std::fs::read("report.pdf")?, json!({"filename": "report.pdf"}))?;
//! let token = upload["upload"]["token"].as_str().unwrap_or_default().to_string();
//!
//! client.issue().attach(42, json!({"token": token, "filename": "report.pdf"}))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use serde_json::{json, Value};

use crate::api::common::into_params;
use crate::api::{ApiError, Client};
use crate::serializer::{build_path, JsonSerializer};

/// Attachment operations.
pub struct AttachmentApi<'a> {
    client: &'a Client,
}

impl<'a> AttachmentApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Returns the attachment's metadata.
    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/attachments/{}.json", id))
    }

    /// Downloads the attachment's content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] if the server refuses the
    /// download (for example with a 404).
    pub fn download(&self, id: u64) -> Result<Vec<u8>, ApiError> {
        let success = self.client.request_get(&format!("/attachments/download/{}", id))?;
        self.client.ensure_success(success)?;
        Ok(self.client.last_response_bytes())
    }

    /// Uploads file content and returns `{"upload": {"id": .., "token": ..}}`.
    ///
    /// # Parameters
    ///
    /// * `content` - The raw file bytes
    /// * `params` - Query parameters, usually `filename`
    pub fn upload(&self, content: impl Into<Vec<u8>>, params: Value) -> Result<Value, ApiError> {
        let params = into_params(params)?;
        let success = self
            .client
            .request_post(&build_path("/uploads.json", &params), content)?;
        self.client.ensure_success(success)?;
        self.client.last_response_as_value()
    }

    /// Updates an attachment's filename or description.
    ///
    /// Redmine answers a successful update with `204 No Content`; any other
    /// status is an [`ApiError::UnexpectedResponse`].
    pub fn update(&self, id: u64, params: Value) -> Result<(), ApiError> {
        let body = JsonSerializer::from_value(json!({"attachment": into_params(params)?}))?;
        self.client
            .request_put(&format!("/attachments/{}.json", id), body.encoded())?;
        self.client.ensure_status(204)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/attachments/{}.xml", id))
    }
}
