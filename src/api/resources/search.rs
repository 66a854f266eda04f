//
//  redmine-api
//  api/resources/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Full-text search across issues, wiki pages, news and other objects.

use serde_json::Value;

use crate::api::common::into_params;
use crate::api::{ApiError, Client};

pub struct SearchApi<'a> {
    client: &'a Client,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Searches for `query`.
    ///
    /// `params` may restrict the scope (`scope`, `all_words`, `titles_only`,
    /// `issues`, `wiki_pages`, ...) and paginate with `limit` and `offset`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_api::api::Client;
    /// use redmine_api::auth::Auth;
    /// use serde_json::json;
    ///
    /// let client = Client::native("https://redmine.example.com", Auth::Anonymous)?;
    /// let results = client.search().search("segfault", json!({"issues": 1, "limit": 10}))?;
    /// println!("{}", results["total_count"]);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn search(&self, query: &str, params: Value) -> Result<Value, ApiError> {
        let mut params = into_params(params)?;
        params.insert("q".to_string(), Value::String(query.to_string()));
        self.client.retrieve_data("/search.json", params)
    }
}
