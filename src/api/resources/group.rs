//
//  redmine-api
//  api/resources/group.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User groups (administrators only).
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
//! let created = client.group().create(json!({"name": "Developers", "user_ids": [3, 5]}))?;
//! client.group().add_user(7, 9)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::api::common::{into_params, join_include, require, sanitize_params};
use crate::api::{ApiError, Client};
use crate::serializer::build_path;

pub struct GroupApi<'a> {
    client: &'a Client,
}

impl<'a> GroupApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/groups.json", into_params(params)?)
    }

    /// Group names keyed by id.
    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names("/groups.json", "groups", "name")
    }

    /// Returns a group. `include` may ask for `users` and `memberships`.
    pub fn show(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let mut params = into_params(params)?;
        join_include(&mut params);
        self.client
            .get_value(&build_path(&format!("/groups/{}.json", id), &params))
    }

    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without sending anything if
    /// `name` is absent.
    pub fn create(&self, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "user_ids"], into_params(params)?);
        require(&params, &["name"])?;
        self.client.post_xml("/groups.xml", "group", params)
    }

    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["name", "user_ids"], into_params(params)?);
        self.client
            .put_xml(&format!("/groups/{}.xml", id), "group", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/groups/{}.xml", id))
    }

    /// Adds a user to the group.
    pub fn add_user(&self, group_id: u64, user_id: u64) -> Result<Value, ApiError> {
        self.client.post_xml_document(
            &format!("/groups/{}/users.xml", group_id),
            json!({"user_id": user_id}),
        )
    }

    pub fn remove_user(&self, group_id: u64, user_id: u64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/groups/{}/users/{}.xml", group_id, user_id))
    }
}
