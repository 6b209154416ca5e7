// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbrief - prioritized briefings of unread chats.
//!
//! This is the binary entry point.

mod brief;
mod snapshot;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use inbrief_config::InbriefConfig;

/// Inbrief - prioritized briefings of unread chats.
#[derive(Parser, Debug)]
#[command(name = "inbrief", version, about, long_about = None)]
struct Cli {
    /// Explicit config file, used instead of the XDG search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a briefing from a chat snapshot.
    Brief(brief::BriefArgs),
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => inbrief_config::load_and_validate_path(path),
        None => inbrief_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            inbrief_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    match cli.command {
        Some(Commands::Brief(args)) => {
            if let Err(e) = brief::run_brief(&config, &args).await {
                eprintln!("inbrief: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match render_config(&config) {
            Ok(toml) => print!("{toml}"),
            Err(e) => {
                eprintln!("inbrief: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("inbrief: use --help for available commands");
        }
    }
}

/// Effective configuration as TOML with the API key redacted.
fn render_config(config: &InbriefConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("[REDACTED]".to_string());
    }
    toml::to_string_pretty(&shown)
}

/// Logs go to stderr so stdout carries only the briefing.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inbrief={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
