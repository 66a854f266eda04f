//
//  redmine-api
//  api/resources/role.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Member roles.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

pub struct RoleApi<'a> {
    client: &'a Client,
}

impl<'a> RoleApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/roles.json", into_params(params)?)
    }

    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names("/roles.json", "roles", "name")
    }

    /// Returns a role with its permissions.
    pub fn show(&self, id: u64) -> Result<Value, ApiError> {
        self.client.get_value(&format!("/roles/{}.json", id))
    }
}
