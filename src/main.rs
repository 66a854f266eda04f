//
//  redmine-api
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use redmine_api::cli::{Cli, Commands};
use redmine_api::exit_codes;

fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("REDMINE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Api(cmd) => cmd.run(&cli.global),
        Commands::List(cmd) => cmd.run(&cli.global),
        Commands::Config(cmd) => cmd.run(&cli.global),
        Commands::Version => {
            println!("redmine version {}", redmine_api::VERSION);
            Ok(())
        }
    }
}
