//
//  redmine-api
//  api/resources/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project versions (milestones).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::{as_text, into_params, require, sanitize_params, segment};
use crate::api::{ApiError, Client};
use crate::serializer::Params;

const STATUSES: &[&str] = &["open", "locked", "closed"];
const SHARINGS: &[&str] = &["none", "descendants", "hierarchy", "tree", "system"];

pub struct VersionApi<'a> {
    client: &'a Client,
}

impl<'a> VersionApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn collection(project: &str) -> String {
        format!("/projects/{}/versions.json", segment(project))
    }

    pub fn list_by_project(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        self.client
            .retrieve_data(&Self::collection(project), into_params(params)?)
    }

    /// Version names of `project` keyed by id.
    pub fn list_names_by_project(&self, project: &str) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client
            .list_names(&Self::collection(project), "versions", "name")
    }

    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/versions/{}.json", id))
    }

    /// Creates a version in `project`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingParameter`] if `name` is absent
    /// - [`ApiError::InvalidParameter`] if `status` is not one of `open`,
    ///   `locked`, `closed`, or `sharing` is not one of `none`,
    ///   `descendants`, `hierarchy`, `tree`, `system`
    pub fn create(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["name", "description", "status", "sharing", "due_date", "effective_date"],
            into_params(params)?,
        );
        require(&params, &["name"])?;
        validate(&params)?;

        self.client.post_xml(
            &format!("/projects/{}/versions.xml", segment(project)),
            "version",
            params,
        )
    }

    /// Updates a version. `status` and `sharing` are checked as for
    /// [`create`](Self::create).
    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["name", "description", "status", "sharing", "due_date"],
            into_params(params)?,
        );
        validate(&params)?;

        self.client
            .put_xml(&format!("/versions/{}.xml", id), "version", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/versions/{}.xml", id))
    }
}

fn validate(params: &Params) -> Result<(), ApiError> {
    check_choice(params, "status", STATUSES)?;
    check_choice(params, "sharing", SHARINGS)
}

fn check_choice(params: &Params, key: &str, allowed: &[&str]) -> Result<(), ApiError> {
    let Some(value) = params.get(key) else {
        return Ok(());
    };
    match as_text(value) {
        Some(text) if allowed.contains(&text.as_str()) => Ok(()),
        _ => Err(ApiError::InvalidParameter(format!(
            "{} must be one of {}, got {}",
            key,
            allowed.join(", "),
            value
        ))),
    }
}
