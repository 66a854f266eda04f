//
//  redmine-api
//  api/resources/time_entry.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Time tracking.

use serde_json::Value;

use crate::api::common::{into_params, sanitize_params};
use crate::api::{ApiError, Client};

pub struct TimeEntryApi<'a> {
    client: &'a Client,
}

impl<'a> TimeEntryApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists time entries.
    ///
    /// Filters such as `project_id`, `user_id`, `from` and `to` are passed
    /// through, as are Redmine's generic filters (`f[]`, `op[..]`, `v[..][]`).
    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/time_entries.json", into_params(params)?)
    }

    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/time_entries/{}.json", id))
    }

    /// Logs time.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] unless `hours` and one of
    /// `issue_id` or `project_id` are given.
    pub fn create(&self, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["issue_id", "project_id", "spent_on", "hours", "activity_id", "comments"],
            into_params(params)?,
        );

        let mut missing = Vec::new();
        if !params.contains_key("issue_id") && !params.contains_key("project_id") {
            missing.push("issue_id or project_id".to_string());
        }
        if !params.contains_key("hours") {
            missing.push("hours".to_string());
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingParameter(missing));
        }

        self.client.post_xml("/time_entries.xml", "time_entry", params)
    }

    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["issue_id", "spent_on", "hours", "activity_id", "comments"],
            into_params(params)?,
        );
        self.client
            .put_xml(&format!("/time_entries/{}.xml", id), "time_entry", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/time_entries/{}.xml", id))
    }
}
