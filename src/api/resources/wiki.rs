//
//  redmine-api
//  api/resources/wiki.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project wiki pages.
//!
//! Pages are addressed by title. Redmine creates a page on the first PUT to
//! its title, so [`WikiApi::create`] and [`WikiApi::update`] send the same
//! request.

use serde_json::Value;

use crate::api::common::{into_params, sanitize_params, segment};
use crate::api::{ApiError, Client};

pub struct WikiApi<'a> {
    client: &'a Client,
}

impl<'a> WikiApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists the titles of every page in the project's wiki.
    pub fn list_by_project(&self, project: &str, params: Value) -> Result<Value, ApiError> {
        self.client.retrieve_data(
            &format!("/projects/{}/wiki/index.json", segment(project)),
            into_params(params)?,
        )
    }

    /// Returns a page with its attachments, optionally at an older `version`.
    pub fn show(&self, project: &str, page: &str, version: Option<u64>) -> Result<Value, ApiError> {
        let path = match version {
            Some(version) => format!(
                "/projects/{}/wiki/{}/{}.json?include=attachments",
                segment(project),
                segment(page),
                version
            ),
            None => format!(
                "/projects/{}/wiki/{}.json?include=attachments",
                segment(project),
                segment(page)
            ),
        };
        self.client.get_value(&path)
    }

    /// Creates a page. Accepts `text`, `comments`, `version` and `uploads`.
    pub fn create(&self, project: &str, page: &str, params: Value) -> Result<Value, ApiError> {
        self.save(project, page, params)
    }

    /// Updates a page.
    ///
    /// Passing the `version` the edit was based on makes Redmine reject the
    /// update with a conflict if the page changed in the meantime.
    pub fn update(&self, project: &str, page: &str, params: Value) -> Result<Value, ApiError> {
        self.save(project, page, params)
    }

    fn save(&self, project: &str, page: &str, params: Value) -> Result<Value, ApiError> {
        let params = sanitize_params(&["text", "comments", "version"], into_params(params)?);
        self.client
            .put_xml(&page_path(project, page), "wiki_page", params)
    }

    pub fn remove(&self, project: &str, page: &str) -> Result<(), ApiError> {
        self.client.delete(&page_path(project, page))
    }
}

fn page_path(project: &str, page: &str) -> String {
    format!("/projects/{}/wiki/{}.xml", segment(project), segment(page))
}
