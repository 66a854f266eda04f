//
//  redmine-api
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration command
//!
//! Reads and writes the values of the configuration file.
//!
//! ```bash
//! redmine config set url https://redmine.example.com
//! redmine config set api_key 0123456789abcdef
//! redmine config list
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, KEYS};

use super::GlobalOptions;

/// Keys whose values are masked by `config list`.
const SECRET_KEYS: &[&str] = &["api_key", "password"];

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Remove a configuration value
    Unset(UnsetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// New value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key
    pub key: String,
}

impl ConfigCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Unset(args) => self.unset(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let value = config.get(&args.key)?;

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }

        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load()?;
        config.set(&args.key, args.value.clone())?;
        config.save()?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                display_value(&args.key, Some(&args.value))
            );
        }

        Ok(())
    }

    fn unset(&self, args: &UnsetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = Config::load()?;
        config.unset(&args.key)?;
        config.save()?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{} Unset {}", style("✓").green(), style(&args.key).cyan());
        }

        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;

        if global.json {
            let mut result = serde_json::Map::new();
            for key in KEYS {
                let value = config.get(key)?;
                result.insert(
                    key.to_string(),
                    serde_json::to_value(display_value(key, value.as_deref()))?,
                );
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        println!();
        println!("{}", style("Configuration").bold());
        println!("{}", "-".repeat(50));
        for key in KEYS {
            let value = config.get(key)?;
            println!("  {}: {}", style(key).cyan(), display_value(key, value.as_deref()));
        }
        println!();

        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let config_path = Config::config_path()?;

        if global.json {
            let result = serde_json::json!({
                "path": config_path.display().to_string(),
                "exists": config_path.exists(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", config_path.display());
        }

        Ok(())
    }
}

/// Masks secrets and shows unset values as `-`.
fn display_value(key: &str, value: Option<&str>) -> String {
    match value {
        None => "-".to_string(),
        Some(_) if SECRET_KEYS.contains(&key) => "********".to_string(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_masks_secrets() {
        assert_eq!(display_value("api_key", Some("abc")), "********");
        assert_eq!(display_value("password", Some("abc")), "********");
        assert_eq!(display_value("url", Some("https://r.example.com")), "https://r.example.com");
        assert_eq!(display_value("timeout", None), "-");
    }
}
