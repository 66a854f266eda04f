//
//  redmine-api
//  api/resources/issue_category.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue categories of a project.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::{into_params, require, sanitize_params, segment};
use crate::api::{ApiError, Client};
use crate::serializer::build_path;

pub struct IssueCategoryApi<'a> {
    client: &'a Client,
}

impl<'a> IssueCategoryApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn collection(project: &str) -> String {
        format!("/projects/{}/issue_categories.json", segment(project))
    }

    /// # Parameters
    ///
    /// * `project` - Project id or identifier
    pub fn list_by_project(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        self.client
            .retrieve_data(&Self::collection(project), into_params(params)?)
    }

    pub fn list_names_by_project(&self, project: &str) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client
            .list_names(&Self::collection(project), "issue_categories", "name")
    }

    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/issue_categories/{}.json", id))
    }

    /// Returns the id of the project's category called `name`.
    pub fn get_id_by_name(&self, project: &str, name: &str) -> Result<Option<u64>, ApiError> {
        self.client
            .id_by_name(&Self::collection(project), "issue_categories", "name", name)
    }

    /// Creates a category in `project`. `name` is mandatory.
    pub fn create(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "assigned_to_id"], into_params(params)?);
        require(&params, &["name"])?;
        self.client.post_xml(
            &format!("/projects/{}/issue_categories.xml", segment(project)),
            "issue_category",
            params,
        )
    }

    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "assigned_to_id"], into_params(params)?);
        self.client
            .put_xml(&format!("/issue_categories/{}.xml", id), "issue_category", params)
    }

    /// Deletes a category.
    ///
    /// Issues still using it can be moved to another category with
    /// `reassign_to_id`.
    pub fn remove(&self, id: u64, params: Value) -> Result<(), ApiError> {
        let params = into_params(params)?;
        self.client
            .delete(&build_path(&format!("/issue_categories/{}.xml", id), &params))
    }
}
