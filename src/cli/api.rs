//
//  redmine-api
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends one raw request to the Redmine REST API. It's useful for endpoints
//! that have no dedicated API in the library or for debugging.
//!
//! Fields given with `-F` become the query string of a GET or DELETE and the
//! body of a POST or PUT. The body is XML when the path ends in `.xml` and
//! JSON otherwise. Dotted keys nest, so `-F issue.subject=Crash` yields
//! `{"issue": {"subject": "Crash"}}`.
//!
//! ## Examples
//!
//! ```bash
//! # Fetch an issue
//! redmine api /issues/42.json -F include=journals
//!
//! # Create an issue through the XML endpoint
//! redmine api -X POST /issues.xml \
//!     -F issue.project_id=1 -F issue.subject="Login fails"
//!
//! # Upload a file
//! redmine api -X POST "/uploads.json?filename=report.pdf" --input report.pdf
//! ```

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use serde_json::{Map, Value};

use crate::http::Method;
use crate::serializer::{build_path, JsonSerializer, XmlSerializer};

use super::GlobalOptions;

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API path (e.g., /issues.json)
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request fields (key=value, can be nested with dots)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Raw field values (not type-converted, strings only)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read the request body from a file (- for stdin)
    #[arg(long, short = 'f', conflicts_with_all = ["field", "raw_field"])]
    pub input: Option<String>,

    /// Include the response status and content type in the output
    #[arg(long, short = 'i')]
    pub include: bool,

    /// Suppress output (only fail on error)
    #[arg(long)]
    pub silent: bool,
}

impl ApiCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let method = self.parse_method()?;
        let fields = self.build_fields()?;
        let (path, body) = self.prepare(method, fields)?;

        let client = global.client()?;
        let success = match method {
            Method::Get => client.request_get(&path)?,
            Method::Post => client.request_post(&path, body)?,
            Method::Put => client.request_put(&path, body)?,
            Method::Delete => client.request_delete(&path)?,
        };

        let status = client.last_response_status_code();
        if self.include {
            println!("{} {}", style("HTTP").dim(), status);
            println!("Content-Type: {}", client.last_response_content_type());
            println!();
        }

        if !self.silent {
            if global.json {
                let value = client.last_response_as_value()?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_body(&client.last_response_body());
            }
        }

        if !success {
            bail!("Request failed with status {}", status);
        }

        Ok(())
    }

    fn parse_method(&self) -> Result<Method> {
        self.method
            .parse::<Method>()
            .map_err(|_| anyhow::anyhow!("Unsupported HTTP method: {}", self.method))
    }

    /// Splits the fields into the final path and request body.
    fn prepare(&self, method: Method, fields: Map<String, Value>) -> Result<(String, Vec<u8>)> {
        let endpoint = if self.endpoint.starts_with('/') {
            self.endpoint.clone()
        } else {
            format!("/{}", self.endpoint)
        };

        if !method.has_body() {
            if self.input.is_some() {
                bail!("--input cannot be used with {}", method);
            }
            return Ok((build_path(&endpoint, &fields), Vec::new()));
        }

        if let Some(input) = &self.input {
            return Ok((endpoint, read_input(input)?));
        }

        if fields.is_empty() {
            return Ok((endpoint, Vec::new()));
        }

        let body = if path_without_query(&endpoint).ends_with(".xml") {
            XmlSerializer::from_value(Value::Object(fields))?
                .encoded()
                .to_string()
        } else {
            JsonSerializer::from_value(Value::Object(fields))?
                .encoded()
                .to_string()
        };

        Ok((endpoint, body.into_bytes()))
    }

    fn build_fields(&self) -> Result<Map<String, Value>> {
        let mut fields = Map::new();

        for field in &self.field {
            let (key, value) = parse_field(field)?;
            set_nested_value(&mut fields, &key, value);
        }

        for field in &self.raw_field {
            let (key, value) = split_field(field)?;
            set_nested_value(&mut fields, key, Value::String(value.to_string()));
        }

        Ok(fields)
    }
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read request body from stdin")?;
        Ok(buffer)
    } else {
        fs::read(input).with_context(|| format!("Failed to read request body from {}", input))
    }
}

fn path_without_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Pretty-prints JSON bodies, everything else verbatim.
fn print_body(body: &str) {
    if body.is_empty() {
        return;
    }

    match JsonSerializer::from_json(body) {
        Ok(json) => match serde_json::to_string_pretty(json.normalized()) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", body),
        },
        Err(_) => println!("{}", body.trim_end()),
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

/// Parses `key=value`, converting literals, numbers and JSON collections.
fn parse_field(field: &str) -> Result<(String, Value)> {
    let (key, raw) = split_field(field)?;

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    };

    Ok((key.to_string(), value))
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let nested = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !nested.is_object() {
                *nested = Value::Object(Map::new());
            }
            if let Value::Object(nested) = nested {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(endpoint: &str, fields: &[&str]) -> ApiCommand {
        ApiCommand {
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            field: fields.iter().map(|f| f.to_string()).collect(),
            raw_field: Vec::new(),
            input: None,
            include: false,
            silent: false,
        }
    }

    #[test]
    fn test_parse_field_types() {
        assert_eq!(parse_field("a=1").unwrap().1, json!(1));
        assert_eq!(parse_field("a=1.5").unwrap().1, json!(1.5));
        assert_eq!(parse_field("a=true").unwrap().1, json!(true));
        assert_eq!(parse_field("a=null").unwrap().1, Value::Null);
        assert_eq!(parse_field("a=[1,2]").unwrap().1, json!([1, 2]));
        assert_eq!(parse_field("a=x=y").unwrap().1, json!("x=y"));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=1").is_err());
    }

    #[test]
    fn test_nested_fields() {
        let cmd = command("/issues.json", &["issue.subject=Crash", "issue.project_id=1"]);
        let fields = cmd.build_fields().unwrap();
        assert_eq!(
            Value::Object(fields),
            json!({"issue": {"subject": "Crash", "project_id": 1}})
        );
    }

    #[test]
    fn test_get_fields_become_query() {
        let cmd = command("issues.json", &["project_id=1", "limit=5"]);
        let fields = cmd.build_fields().unwrap();
        let (path, body) = cmd.prepare(Method::Get, fields).unwrap();

        assert_eq!(path, "/issues.json?project_id=1&limit=5");
        assert!(body.is_empty());
    }

    #[test]
    fn test_post_fields_follow_path_suffix() {
        let cmd = command("/issues.xml", &["issue.subject=Crash"]);
        let (_, body) = cmd.prepare(Method::Post, cmd.build_fields().unwrap()).unwrap();
        let body = String::from_utf8(body).unwrap();
        assert!(body.starts_with("<?xml version=\"1.0\"?>"));
        assert!(body.contains("<subject>Crash</subject>"));

        let cmd = command("/issues.json", &["issue.subject=Crash"]);
        let (_, body) = cmd.prepare(Method::Put, cmd.build_fields().unwrap()).unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({"issue": {"subject": "Crash"}})
        );
    }

    #[test]
    fn test_input_file_is_sent_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.bin");
        fs::write(&path, b"\x00\x01raw").unwrap();

        let mut cmd = command("/uploads.json?filename=a.bin", &[]);
        cmd.input = Some(path.display().to_string());

        let (endpoint, body) = cmd.prepare(Method::Post, Map::new()).unwrap();
        assert_eq!(endpoint, "/uploads.json?filename=a.bin");
        assert_eq!(body, b"\x00\x01raw");

        assert!(cmd.prepare(Method::Get, Map::new()).is_err());
    }

    #[test]
    fn test_unsupported_method() {
        let mut cmd = command("/issues.json", &[]);
        cmd.method = "PATCH".to_string();
        assert!(cmd.parse_method().is_err());

        cmd.method = "delete".to_string();
        assert_eq!(cmd.parse_method().unwrap(), Method::Delete);
    }
}
