//
//  redmine-api
//  api/resources/news.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde_json::Value;

use crate::api::common::{into_params, segment};
use crate::api::{ApiError, Client};

/// News items, across all projects or for one project.
pub struct NewsApi<'a> {
    client: &'a Client,
}

impl<'a> NewsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/news.json", into_params(params)?)
    }

    /// # Parameters
    ///
    /// * `project` - Project id or identifier
    /// * `params` - Pagination parameters
    pub fn list_by_project(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data(
            &format!("/projects/{}/news.json", segment(project)),
            into_params(params)?,
        )
    }
}
