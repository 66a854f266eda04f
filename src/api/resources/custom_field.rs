//
//  redmine-api
//  api/resources/custom_field.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Custom field definitions (administrators only).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

pub struct CustomFieldApi<'a> {
    client: &'a Client,
}

impl<'a> CustomFieldApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/custom_fields.json", into_params(params)?)
    }

    /// Custom field names keyed by id.
    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names("/custom_fields.json", "custom_fields", "name")
    }
}
