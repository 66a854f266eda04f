//
//  redmine-api
//  api/resources/time_entry_activity.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

/// Time entry activity enumeration.
pub struct TimeEntryActivityApi<'a> {
    client: &'a Client,
}

impl<'a> TimeEntryActivityApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client
            .retrieve_data("/enumerations/time_entry_activities.json", into_params(params)?)
    }

    pub fn list_names(&self) -> Result<BTreeMap<u64, String>, ApiError> {
        self.client.list_names(
            "/enumerations/time_entry_activities.json",
            "time_entry_activities",
            "name",
        )
    }
}
