//
//  redmine-api
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod config;
mod list;

pub use api::ApiCommand;
pub use config::ConfigCommand;
pub use list::ListCommand;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::api::Client;
use crate::config::Config;
use crate::http::NativeTransport;

/// Redmine CLI - Work with a Redmine server from the command line
#[derive(Parser, Debug)]
#[command(
    name = "redmine",
    version,
    about = "Work with a Redmine server from the command line",
    long_about = "redmine talks to the Redmine REST API.\n\n\
                  It sends raw API requests and lists the names of projects, trackers, users and more.",
    propagate_version = true,
    after_help = "Use 'redmine <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// How requests reach the server
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportKind {
    /// Built-in reqwest transport
    #[default]
    Native,
    /// Pluggable transport over a plain HTTP client
    Http,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Redmine base URL
    #[arg(long, global = true, env = "REDMINE_URL")]
    pub url: Option<String>,

    /// API key (sent as X-Redmine-API-Key)
    #[arg(long, global = true, env = "REDMINE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(long, short = 'u', global = true, env = "REDMINE_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(long, global = true, env = "REDMINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Act as another user (administrators only)
    #[arg(long, global = true)]
    pub impersonate: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Transport used to send requests
    #[arg(long, global = true, value_enum, default_value_t = TransportKind::Native)]
    pub transport: TransportKind,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Loads the configuration file and applies the flags on top of it.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        config.merge(Config {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            impersonate: self.impersonate.clone(),
            timeout: self.timeout,
        });
        Ok(config)
    }

    /// Builds a client from the effective configuration.
    pub fn client(&self) -> Result<Client> {
        let config = self.config()?;
        let url = config.require_url()?;
        let auth = config.auth();
        debug!(url, transport = ?self.transport, "Creating client");

        let mut client = match self.transport {
            TransportKind::Native => {
                let mut builder = NativeTransport::builder(url, auth);
                if let Some(timeout) = config.timeout() {
                    builder = builder.timeout(timeout);
                }
                Client::from_transport(builder.build()?)
            }
            TransportKind::Http => {
                let http = reqwest::blocking::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .timeout(config.timeout().unwrap_or(Duration::from_secs(30)))
                    .build()
                    .context("Failed to create HTTP client")?;
                Client::with_http_client(url, auth, http)?
            }
        };

        if let Some(login) = config.impersonate.as_deref().filter(|l| !l.is_empty()) {
            client.start_impersonate_user(login);
        }

        Ok(client)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make API requests
    Api(ApiCommand),

    /// List the names of a resource
    #[command(visible_alias = "ls")]
    List(ListCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Print version information
    Version,
}
