//
//  redmine-api
//  api/resources/membership.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project memberships.
//!
//! A membership gives a user or a group one or more roles in a project.

use serde_json::Value;
use tracing::debug;

use crate::api::common::{as_u64, into_params, require, sanitize_params, segment};
use crate::api::{ApiError, Client};

pub struct MembershipApi<'a> {
    client: &'a Client,
}

impl<'a> MembershipApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list_by_project(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data(
            &format!("/projects/{}/memberships.json", segment(project)),
            into_params(params)?,
        )
    }

    /// Adds a member to `project`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] unless both `user_id` and
    /// `role_ids` are given.
    pub fn create(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["user_id", "role_ids"], into_params(params)?);
        require(&params, &["user_id", "role_ids"])?;
        self.client.post_xml(
            &format!("/projects/{}/memberships.xml", segment(project)),
            "membership",
            params,
        )
    }

    /// Replaces the roles of a membership. `role_ids` is mandatory.
    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["role_ids"], into_params(params)?);
        require(&params, &["role_ids"])?;
        self.client
            .put_xml(&format!("/memberships/{}.xml", id), "membership", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/memberships/{}.xml", id))
    }

    /// Removes `user_id` from `project`.
    ///
    /// Looks up the user's membership among the project's memberships
    /// (`params` is passed to that listing). Returns `false` when the user is
    /// not a member.
    pub fn remove_member(&self, project: &str, user_id: u64, params: Value) -> Result<bool, ApiError> {
        let memberships = self.list_by_project(project, params)?;
        let Some(memberships) = memberships.get("memberships").and_then(Value::as_array) else {
            return Ok(false);
        };

        let mut removed = false;
        for membership in memberships {
            let id = membership.get("id").and_then(as_u64);
            let member = membership.pointer("/user/id").and_then(as_u64);
            if let (Some(id), Some(member)) = (id, member) {
                if member == user_id {
                    debug!(membership = id, user = user_id, "Removing membership");
                    self.remove(id)?;
                    removed = true;
                }
            }
        }

        Ok(removed)
    }
}
