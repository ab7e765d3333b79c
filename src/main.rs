//! λόγος — a wiki server for literate programming.
//!
//! Documents are noweb sources submitted over HTTP, persisted under a
//! source root, woven into HTML by an external tool, and served back from
//! a destination root.

#![allow(dead_code)]

mod artifact;
mod cli;
mod config;
mod embed;
mod error;
mod ident;
mod logger;
mod session;
mod store;
mod users;
mod utils;
mod weave;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::WikiConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let mut config = WikiConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Serve { interface, port } => {
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
            cli::serve::run(Arc::new(config))
        }
        Commands::Weave { title } => cli::weave::run(&config, title),
        Commands::Check => cli::check::run(&config),
    }
}
