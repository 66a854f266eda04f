//
//  redmine-api
//  api/resources/issue_relation.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Relations between issues.
//!
//! Relation types are `relates`, `duplicates`, `duplicated`, `blocks`,
//! `blocked`, `precedes`, `follows`, `copied_to` and `copied_from`. Only
//! `precedes` and `follows` use `delay`.

use serde_json::Value;

use crate::api::common::{into_params, sanitize_params};
use crate::api::{ApiError, Client};

pub struct IssueRelationApi<'a> {
    client: &'a Client,
}

impl<'a> IssueRelationApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list_by_issue_id(&self, issue_id: u64, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data(
            &format!("/issues/{}/relations.json", issue_id),
            into_params(params)?,
        )
    }

    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/relations/{}.json", id))
    }

    /// Relates `issue_id` to `issue_to_id`.
    ///
    /// `relation_type` defaults to `relates`. The request is sent as JSON.
    pub fn create(&self, issue_id: u64, params: Value) -> Result<Value, ApiError> {
        let mut params = sanitize_params(&["relation_type", "issue_to_id", "delay"], into_params(params)?);
        params
            .entry("relation_type")
            .or_insert_with(|| Value::String("relates".to_string()));

        self.client
            .post_json(&format!("/issues/{}/relations.json", issue_id), "relation", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/relations/{}.xml", id))
    }
}
