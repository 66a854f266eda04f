//
//  redmine-api
//  api/resources/user.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User accounts.
//!
//! Listing, creating and deleting users requires an administrator account.
//! [`UserApi::current`] works for any authenticated user.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::{as_text, into_params, require, sanitize_params};
use crate::api::{ApiError, Client};
use crate::serializer::build_path;

/// Always included by [`UserApi::show`].
const SHOW_INCLUDE: [&str; 2] = ["memberships", "groups"];

pub struct UserApi<'a> {
    client: &'a Client,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/users.json", into_params(params)?)
    }

    /// User logins keyed by id.
    pub fn list_logins(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names("/users.json", "users", "login")
    }

    /// Returns the id of the user with `login`, if there is one.
    pub fn get_id_by_username(&self, login: &str) -> Result<Option<u64>, ApiError> {
        self.client.id_by_name("/users.json", "users", "login", login)
    }

    /// Returns the user the client is authenticated as.
    pub fn current(&self, params: Value) -> Result<Value, ApiError> {
        let params = into_params(params)?;
        self.client
            .get_value(&build_path("/users/current.json", &params))
    }

    /// Returns a user with their memberships and groups.
    ///
    /// Values given in `include`, as a sequence or a comma-separated string,
    /// are requested in addition.
    pub fn show(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let mut params = into_params(params)?;

        let mut include: Vec<String> = match params.get("include") {
            Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            _ => Vec::new(),
        };
        for item in SHOW_INCLUDE {
            if !include.iter().any(|existing| existing == item) {
                include.push(item.to_string());
            }
        }
        params.insert("include".to_string(), Value::String(include.join(",")));

        self.client
            .get_value(&build_path(&format!("/users/{}.json", id), &params))
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] listing every absent field among
    /// `login`, `lastname`, `firstname` and `mail`.
    pub fn create(&self, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["login", "password", "lastname", "firstname", "mail"],
            into_params(params)?,
        );
        require(&params, &["login", "lastname", "firstname", "mail"])?;
        self.client.post_xml("/users.xml", "user", params)
    }

    pub fn update(&self, id: u64, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(
            &["login", "firstname", "lastname", "mail"],
            into_params(params)?,
        );
        self.client.put_xml(&format!("/users/{}.xml", id), "user", params)
    }

    pub fn remove(&self, id: u64) -> Result<(), ApiError> {
        self.client.delete(&format!("/users/{}.xml", id))
    }
}
