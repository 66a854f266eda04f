//
//  redmine-api
//  api/resources/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects.
//!
//! Projects are addressed by numeric id or by identifier (`"my-project"`).
//!
//! # Example
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! client.project().create(json!({
//!     "name": "Website",
//!     "identifier": "website",
//!     "tracker_ids": [1, 2],
//!     "enabled_module_names": ["issue_tracking", "wiki"],
//! }))?;
//!
//! client.project().archive("website")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::{into_params, join_include, require, sanitize_params, segment};
use crate::api::{ApiError, Client};
use crate::serializer::build_path;

/// Included by [`ProjectApi::show`] unless the caller asks for something else.
const DEFAULT_INCLUDE: &str = "trackers,issue_categories,attachments,relations";

pub struct ProjectApi<'a> {
    client: &'a Client,
}

impl<'a> ProjectApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/projects.json", into_params(params)?)
    }

    /// Project names keyed by id.
    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names("/projects.json", "projects", "name")
    }

    /// Returns the id of the project called `name`, if there is one.
    pub fn get_id_by_name(&self, name: &str) -> Result<Option<u64>, ApiError> {
        self.client.id_by_name("/projects.json", "projects", "name", name)
    }

    /// Returns a project.
    ///
    /// Without an `include` parameter the project's trackers, issue
    /// categories, attachments and relations are included.
    pub fn show(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        let mut params = into_params(params)?;
        join_include(&mut params);
        params
            .entry("include")
            .or_insert_with(|| Value::String(DEFAULT_INCLUDE.to_string()));

        self.client.get_value(&build_path(
            &format!("/projects/{}.json", segment(project)),
            &params,
        ))
    }

    /// Creates a project. `name` and `identifier` are mandatory.
    pub fn create(&self, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "identifier", "description"], into_params(params)?);
        require(&params, &["name", "identifier"])?;
        self.client.post_xml("/projects.xml", "project", params)
    }

    pub fn update(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "identifier", "description"], into_params(params)?);
        self.client.put_xml(
            &format!("/projects/{}.xml", segment(project)),
            "project",
            params,
        )
    }

    /// Archives a project (Redmine 5.0 and later).
    pub fn archive(&self, project: &str) -> Result<(), ApiError> {
        self.change_state(project, "archive")
    }

    pub fn unarchive(&self, project: &str) -> Result<(), ApiError> {
        self.change_state(project, "unarchive")
    }

    /// Closes a project (Redmine 5.1 and later).
    pub fn close(&self, project: &str) -> Result<(), ApiError> {
        self.change_state(project, "close")
    }

    pub fn reopen(&self, project: &str) -> Result<(), ApiError> {
        self.change_state(project, "reopen")
    }

    /// Sends an empty PUT to a state action. Anything but 204 is an error.
    fn change_state(&self, project: &str, action: &str) -> Result<(), ApiError> {
        self.client
            .request_put(&format!("/projects/{}/{}.xml", segment(project), action), "")?;
        self.client.ensure_status(204)
    }

    pub fn remove(&self, project: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/projects/{}.xml", segment(project)))
    }
}
