//
//  redmine-api
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Offset-based Pagination for Redmine Collections
//!
//! Redmine list endpoints accept `limit` and `offset` query parameters and
//! answer with `total_count`, `offset` and `limit` next to the items:
//!
//! ```json
//! {"issues": [...], "total_count": 2595, "offset": 0, "limit": 25}
//! ```
//!
//! The server caps `limit` at 100, so larger requests are split into chunks.
//!
//! # Overview
//!
//! | Helper | Result |
//! |--------|--------|
//! | [`Client::retrieve_data`] | Merged pages as one value |
//! | [`Client::list_names`] | Every item's id mapped to one of its fields |

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::{as_text, as_u64, sanitize_params, ApiError};
use crate::api::Client;
use crate::serializer::{build_path, Params};

const DEFAULT_LIMIT: u64 = 25;

/// Largest page Redmine serves.
const MAX_PAGE_SIZE: u64 = 100;

impl Client {
    /// Fetches a collection, following pagination as needed.
    ///
    /// Without parameters a single GET is sent. Otherwise `limit` (default 25)
    /// items starting at `offset` (default 0) are fetched in chunks of at most
    /// 100. Sequences of every page are concatenated and other fields take
    /// the value of the last page. Fetching stops early on an empty page, a
    /// page without `limit`, or once `total_count` is reached.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidParameter`] if `limit` or `offset` is not a number
    /// - [`ApiError::UnexpectedResponse`] if any page request fails
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_api::api::Client;
    /// use redmine_api::auth::Auth;
    /// use serde_json::json;
    ///
    /// let client = Client::native("https://redmine.example.com", Auth::Anonymous)?;
    /// let params = json!({"limit": 250, "status_id": "open"});
    /// let issues = client.retrieve_data("/issues.json", params.as_object().cloned().unwrap_or_default())?;
    /// println!("{} issues", issues["issues"].as_array().map_or(0, Vec::len));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn retrieve_data(&self, endpoint: &str, params: Params) -> Result<Value, ApiError> {
        if params.is_empty() {
            return self.get_value(endpoint);
        }

        let mut params = sanitize_params(&["limit", "offset"], params);
        let mut remaining = read_count(&params, "limit", DEFAULT_LIMIT)?;
        let mut offset = read_count(&params, "offset", 0)?;
        let mut data = Map::new();

        while remaining > 0 {
            let page_size = remaining.min(MAX_PAGE_SIZE);
            remaining -= page_size;

            params.insert("limit".to_string(), page_size.into());
            params.insert("offset".to_string(), offset.into());
            debug!(endpoint, limit = page_size, offset, "Fetching page");

            let page = match self.get_value(&build_path(endpoint, &params))? {
                Value::Object(page) => page,
                _ => Map::new(),
            };
            offset += page_size;

            let last_page = page.is_empty()
                || !page.contains_key("limit")
                || page
                    .get("total_count")
                    .and_then(as_u64)
                    .is_some_and(|total| offset >= total);

            merge_page(&mut data, page);
            if last_page {
                break;
            }
        }

        Ok(Value::Object(data))
    }

    /// Maps the id of every item of a collection to its `value_key` field.
    ///
    /// Pages of 100 items are requested until `total_count` items have been
    /// seen or a page comes back empty.
    ///
    /// # Parameters
    ///
    /// * `endpoint` - The collection path, e.g. `/projects.json`
    /// * `list_key` - The key holding the items, e.g. `projects`
    /// * `value_key` - The item field to collect, e.g. `name`
    pub fn list_names(
        &self,
        endpoint: &str,
        list_key: &str,
        value_key: &str,
    ) -> Result<BTreeMap<u64, String>, ApiError> {
        let mut names = BTreeMap::new();
        let mut offset = 0;

        loop {
            let mut params = Params::new();
            params.insert("limit".to_string(), MAX_PAGE_SIZE.into());
            params.insert("offset".to_string(), offset.into());

            let page = self.get_value(&build_path(endpoint, &params))?;
            let items = match page.get(list_key) {
                Some(Value::Array(items)) if !items.is_empty() => items,
                _ => break,
            };

            for item in items {
                let id = item.get("id").and_then(as_u64);
                let value = item.get(value_key).and_then(as_text);
                if let (Some(id), Some(value)) = (id, value) {
                    names.insert(id, value);
                }
            }

            offset += MAX_PAGE_SIZE;
            match page.get("total_count").and_then(as_u64) {
                Some(total) if offset < total => {}
                _ => break,
            }
        }

        Ok(names)
    }

    /// Looks up the id of the item whose `value_key` equals `name`.
    pub(crate) fn id_by_name(
        &self,
        endpoint: &str,
        list_key: &str,
        value_key: &str,
        name: &str,
    ) -> Result<Option<u64>, ApiError> {
        let names = self.list_names(endpoint, list_key, value_key)?;
        Ok(names
            .into_iter()
            .find_map(|(id, value)| (value == name).then_some(id)))
    }
}

fn read_count(params: &Params, key: &str, default: u64) -> Result<u64, ApiError> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => as_u64(value).ok_or_else(|| {
            ApiError::InvalidParameter(format!("'{}' must be a non-negative integer, got {}", key, value))
        }),
    }
}

/// Appends sequences and overwrites every other field.
fn merge_page(data: &mut Map<String, Value>, page: Map<String, Value>) {
    for (key, value) in page {
        match value {
            Value::Array(items) => match data.get_mut(&key) {
                Some(Value::Array(existing)) => existing.extend(items),
                _ => {
                    data.insert(key, Value::Array(items));
                }
            },
            other => {
                data.insert(key, other);
            }
        }
    }
}
