//
//  redmine-api
//  api/resources/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Issues
//!
//! Besides plain CRUD this API resolves human-readable names to ids before
//! creating or updating an issue:
//!
//! | Parameter | Becomes | Looked up through |
//! |-----------|---------|-------------------|
//! | `project` | `project_id` | project names |
//! | `category` | `category_id` | categories of the issue's project |
//! | `status` | `status_id` | issue status names |
//! | `tracker` | `tracker_id` | tracker names |
//! | `assigned_to` | `assigned_to_id` | user logins |
//! | `author` | `author_id` | user logins |
//!
//! Each lookup lists the matching collection, so prefer ids in bulk jobs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use redmine_api::api::Client;
//! use redmine_api::auth::Auth;
//! use serde_json::json;
//!
//! let client = Client::native("https://redmine.example.com", Auth::api_key("secret"))?;
//!
//! let created = client.issue().create(json!({
//!     "project": "Website",
//!     "tracker": "Bug",
//!     "subject": "Login page returns 500",
//!     "assigned_to": "jsmith",
//!     "watcher_user_ids": [3, 4],
//!     "custom_fields": [{"id": 2, "value": "production"}],
//! }))?;
//!
//! client.issue().add_note_to_issue(42, "Deployed a fix", false)?;
//! client.issue().set_issue_status(42, "Resolved")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use serde_json::{json, Value};

use crate::api::common::{as_text, into_params, join_include, sanitize_params};
use crate::api::{ApiError, Client};
use crate::serializer::{build_path, Params};

const CREATE_DEFAULTS: &[&str] = &[
    "subject",
    "description",
    "project_id",
    "category_id",
    "priority_id",
    "status_id",
    "tracker_id",
    "assigned_to_id",
    "author_id",
    "due_date",
    "start_date",
    "watcher_user_ids",
    "fixed_version_id",
];

const UPDATE_DEFAULTS: &[&str] = &[
    "subject",
    "notes",
    "private_notes",
    "category_id",
    "priority_id",
    "status_id",
    "tracker_id",
    "assigned_to_id",
    "due_date",
];

/// Issue operations.
pub struct IssueApi<'a> {
    client: &'a Client,
}

impl<'a> IssueApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists issues.
    ///
    /// # Parameters
    ///
    /// * `params` - Filters (`project_id`, `status_id`, `tracker_id`,
    ///   `assigned_to_id`, `sort`, custom field filters such as `cf_1`, ...)
    ///   and pagination (`limit`, `offset`)
    ///
    /// # Returns
    ///
    /// The merged `{"issues": [...], "total_count": .., ...}` value.
    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/issues.json", into_params(params)?)
    }

    /// Returns an issue.
    ///
    /// `include` may list `children`, `attachments`, `relations`,
    /// `changesets`, `journals`, `watchers` and `allowed_statuses`, either as
    /// a sequence or as a comma-separated string.
    pub fn show(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let mut params = into_params(params)?;
        join_include(&mut params);
        self.client
            .get_value(&build_path(&format!("/issues/{}.json", id), &params))
    }

    /// Creates an issue, resolving names to ids first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] if a name cannot be resolved.
    pub fn create(&self, params: Value) -> Result<Value, ApiError> {
        let params = self.resolve_names(into_params(params)?)?;
        let params = sanitize_params(CREATE_DEFAULTS, params);
        self.client.post_xml("/issues.xml", "issue", params)
    }

    /// Updates an issue, resolving names to ids first.
    ///
    /// An empty `assigned_to_id` unassigns the issue.
    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = self.resolve_names(into_params(params)?)?;
        let params = sanitize_params(UPDATE_DEFAULTS, params);
        self.client
            .put_xml(&format!("/issues/{}.xml", id), "issue", params)
    }

    pub fn add_watcher(&self, issue_id: u64, user_id: u64) -> Result<Value, ApiError> {
        self.client.post_xml_document(
            &format!("/issues/{}/watchers.xml", issue_id),
            json!({"user_id": user_id}),
        )
    }

    pub fn remove_watcher(&self, issue_id: u64, user_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/issues/{}/watchers/{}.xml", issue_id, user_id))
    }

    /// Moves an issue to the status called `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] if no status has that name.
    pub fn set_issue_status(&self, id: u64, status: &str) -> Result<Value, ApiError> {
        let status_id = self
            .client
            .issue_status()
            .get_id_by_name(status)?
            .ok_or_else(|| unknown_name("status", status))?;

        self.update(id, json!({"status_id": status_id}))
    }

    /// Adds a journal note.
    pub fn add_note_to_issue(&self, id: u64, note: &str, private_note: bool) -> Result<Value, ApiError> {
        self.update(id, json!({"notes": note, "private_notes": private_note}))
    }

    /// Attaches one uploaded file, given as an upload descriptor
    /// (`{"token": .., "filename": .., "content_type": .., "description": ..}`).
    pub fn attach(&self, id: u64, attachment: Value) -> Result<(), ApiError> {
        self.attach_many(id, vec![attachment])
    }

    /// Attaches several uploaded files in one update.
    pub fn attach_many(&self, id: u64, attachments: Vec<Value>) -> Result<(), ApiError> {
        let mut params = Params::new();
        params.insert("uploads".to_string(), Value::Array(attachments));
        self.client
            .put_json(&format!("/issues/{}.json", id), "issue", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/issues/{}.xml", id))
    }

    /// Replaces name parameters by the matching id parameters.
    fn resolve_names(&self, mut params: Params) -> Result<Params, ApiError> {
        if let Some(project) = take_name(&mut params, "project")? {
            let id = self
                .client
                .project()
                .get_id_by_name(&project)?
                .ok_or_else(|| unknown_name("project", &project))?;
            params.insert("project_id".to_string(), id.into());
        }

        if let Some(category) = take_name(&mut params, "category")? {
            let project = params
                .get("project_id")
                .and_then(as_text)
                .ok_or_else(|| ApiError::MissingParameter(vec!["project or project_id".to_string()]))?;
            let id = self
                .client
                .issue_category()
                .get_id_by_name(&project, &category)?
                .ok_or_else(|| unknown_name("category", &category))?;
            params.insert("category_id".to_string(), id.into());
        }

        if let Some(status) = take_name(&mut params, "status")? {
            let id = self
                .client
                .issue_status()
                .get_id_by_name(&status)?
                .ok_or_else(|| unknown_name("status", &status))?;
            params.insert("status_id".to_string(), id.into());
        }

        if let Some(tracker) = take_name(&mut params, "tracker")? {
            let id = self
                .client
                .tracker()
                .get_id_by_name(&tracker)?
                .ok_or_else(|| unknown_name("tracker", &tracker))?;
            params.insert("tracker_id".to_string(), id.into());
        }

        for (key, id_key) in [("assigned_to", "assigned_to_id"), ("author", "author_id")] {
            if let Some(login) = take_name(&mut params, key)? {
                let id = self
                    .client
                    .user()
                    .get_id_by_username(&login)?
                    .ok_or_else(|| unknown_name(key, &login))?;
                params.insert(id_key.to_string(), id.into());
            }
        }

        Ok(params)
    }
}

/// Removes `key` from `params` and returns it as text. Nulls count as absent.
fn take_name(params: &mut Params, key: &str) -> Result<Option<String>, ApiError> {
    match params.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_text(&value)
            .map(Some)
            .ok_or_else(|| ApiError::InvalidParameter(format!("{} must be a name, got {}", key, value))),
    }
}

fn unknown_name(kind: &str, name: &str) -> ApiError {
    ApiError::InvalidParameter(format!("unknown {} '{}'", kind, name))
}
