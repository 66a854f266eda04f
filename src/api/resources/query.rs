//
//  redmine-api
//  api/resources/query.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

/// Saved issue queries visible to the current user.
pub struct QueryApi<'a> {
    client: &'a Client,
}

impl<'a> QueryApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data("/queries.json", into_params(params)?)
    }
}
