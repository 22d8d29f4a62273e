// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sokoni - an always-on WhatsApp assistant for small storefronts.
//!
//! This is the binary entry point for the Sokoni bot.

mod doctor;
mod serve;

use clap::{Parser, Subcommand};

/// Sokoni - an always-on WhatsApp assistant for small storefronts.
#[derive(Parser, Debug)]
#[command(name = "sokoni", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Sokoni bot.
    Serve,
    /// Check configuration, storage, and bridge connectivity.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match sokoni_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            sokoni_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor) => doctor::run_doctor(config).await,
        None => {
            println!("sokoni: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
