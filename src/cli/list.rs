//
//  redmine-api
//  cli/list.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Name listing command
//!
//! Prints the id and name of every item of a resource, which is handy for
//! finding the ids other commands and scripts need.
//!
//! ```bash
//! redmine list project
//! redmine list tracker --json
//! redmine list version --project website
//! ```

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;
use serde_json::{json, Value};

use crate::api::{Api, ApiName, Client};

use super::GlobalOptions;

/// List the names of a resource
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Resource to list (project, tracker, user, issue-status, version, ...)
    pub resource: String,

    /// Project id or identifier (required for issue-category and version)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Maximum number of issues or time entries to list
    #[arg(long, short = 'L', default_value = "25")]
    pub limit: u64,
}

impl ListCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let name: ApiName = self.resource.parse()?;
        let client = global.client()?;
        let names = self.collect(&client, name)?;

        if global.json {
            let object: serde_json::Map<String, Value> = names
                .iter()
                .map(|(id, name)| (id.to_string(), Value::String(name.clone())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&object)?);
            return Ok(());
        }

        if names.is_empty() {
            println!("No {} found.", name);
            return Ok(());
        }

        println!("{}", render_table(&names));
        println!(
            "{} {} item(s)",
            style("→").cyan(),
            style(names.len()).bold()
        );
        Ok(())
    }

    /// Fetches the id to name map for `name`.
    fn collect(&self, client: &Client, name: ApiName) -> Result<BTreeMap<u64, String>> {
        let names = match client.api(name) {
            Api::CustomFields(api) => api.list_names()?,
            Api::Group(api) => api.list_names()?,
            Api::IssueStatus(api) => api.list_names()?,
            Api::Project(api) => api.list_names()?,
            Api::Role(api) => api.list_names()?,
            Api::TimeEntryActivity(api) => api.list_names()?,
            Api::Tracker(api) => api.list_names()?,
            Api::User(api) => api.list_logins()?,
            Api::IssueCategory(api) => api.list_names_by_project(self.require_project(name)?)?,
            Api::Version(api) => api.list_names_by_project(self.require_project(name)?)?,
            Api::IssuePriority(api) => names_from(&api.list(Value::Null)?, "issue_priorities", "name"),
            Api::Query(api) => names_from(&api.list(Value::Null)?, "queries", "name"),
            Api::News(api) => {
                let news = match &self.project {
                    Some(project) => api.list_by_project(project, Value::Null)?,
                    None => api.list(Value::Null)?,
                };
                names_from(&news, "news", "title")
            }
            Api::Issue(api) => {
                let mut params = json!({"limit": self.limit});
                if let Some(project) = &self.project {
                    params["project_id"] = Value::String(project.clone());
                }
                names_from(&api.list(params)?, "issues", "subject")
            }
            Api::TimeEntry(api) => {
                let mut params = json!({"limit": self.limit});
                if let Some(project) = &self.project {
                    params["project_id"] = Value::String(project.clone());
                }
                names_from(&api.list(params)?, "time_entries", "comments")
            }
            Api::Attachment(_)
            | Api::IssueRelation(_)
            | Api::Membership(_)
            | Api::Search(_)
            | Api::Wiki(_) => bail!("'{}' cannot be listed by name", name),
        };

        Ok(names)
    }

    fn require_project(&self, name: ApiName) -> Result<&str> {
        match self.project.as_deref() {
            Some(project) => Ok(project),
            None => bail!("Listing {} requires --project", name),
        }
    }
}

/// Maps `id` to `field` for every item under `key`.
fn names_from(data: &Value, key: &str, field: &str) -> BTreeMap<u64, String> {
    data.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let id = item.get("id")?.as_u64()?;
            let name = match item.get(field)? {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Some((id, name))
        })
        .collect()
}

fn render_table(names: &BTreeMap<u64, String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    if console::colors_enabled() {
        table.set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["ID", "Name"]);
    }

    for (id, name) in names {
        table.add_row(vec![id.to_string(), name.clone()]);
    }
    table
}
