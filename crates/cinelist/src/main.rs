// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cinelist - a Telegram bot for keeping track of films and collections.
//!
//! This is the binary entry point.

mod serve;
mod shutdown;

use std::path::PathBuf;

use cinelist_config::CinelistConfig;
use clap::{Parser, Subcommand};

/// Cinelist - a Telegram bot for keeping track of films and collections.
#[derive(Parser, Debug)]
#[command(name = "cinelist", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the bot: long-poll Telegram and answer every user.
    Serve,
    /// Load and validate the configuration, then print a summary.
    CheckConfig,
}

fn load(path: Option<&PathBuf>) -> CinelistConfig {
    let loaded = match path {
        Some(path) => cinelist_config::load_and_validate_path(path),
        None => cinelist_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            cinelist_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn summary(config: &CinelistConfig) -> String {
    let token = if config.telegram.bot_token.is_some() {
        "set"
    } else {
        "missing"
    };
    let allowed = if config.telegram.allowed_users.is_empty() {
        "everyone".to_string()
    } else {
        config.telegram.allowed_users.join(", ")
    };
    format!(
        "bot.name          = {}\n\
         bot.log_level     = {}\n\
         telegram.token    = {token}\n\
         telegram.allowed  = {allowed}\n\
         backend.base_url  = {}\n\
         storage.database  = {}\n\
         dialog.page_size  = {} (max {})",
        config.bot.name,
        config.bot.log_level,
        config.backend.base_url,
        config.storage.database_path,
        config.dialog.default_page_size,
        config.dialog.max_page_size,
    )
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load(cli.config.as_ref());

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!("cinelist: configuration is valid");
            println!("{}", summary(&config));
        }
        None => {
            println!("cinelist: use --help for available commands");
        }
    }
}
