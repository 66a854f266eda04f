//
//  redmine-api
//  api/resources/issue_priority.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

/// Issue priority enumeration.
pub struct IssuePriorityApi<'a> {
    client: &'a Client,
}

impl<'a> IssuePriorityApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn list(&self, params: Value) -> Result<Value, ApiError> {
        self.client
            .retrieve_data("/enumerations/issue_priorities.json", into_params(params)?)
    }
}
