//
//  redmine-api
//  api/resources/issue_status.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue statuses.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

pub struct IssueStatusApi<'a> {
    client: &'a Client,
}

impl<'a> IssueStatusApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/issue_statuses.json", into_params(params)?)
    }

    /// Status names keyed by id.
    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client
            .list_names("/issue_statuses.json", "issue_statuses", "name")
    }

    /// Returns the id of the status called `name`, if there is one.
    pub fn get_id_by_name(&self, name: &str) -> Result<Option<u64>, ApiError> {
        self.client
            .id_by_name("/issue_statuses.json", "issue_statuses", "name", name)
    }
}
