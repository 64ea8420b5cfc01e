//! CLI module for rag-agent
//!
//! Subcommands:
//! - `serve`: HTTP API with background workflows
//! - `ask`: answer one question in-process, reviewing on the terminal

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::LoggingConfig;

/// rag-agent - question answering with retrieval and human approval
#[derive(Parser)]
#[command(name = "rag-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Answer a single question and print the result
    Ask(ask::AskArgs),
}

fn logging_config(config: &AppConfig) -> LoggingConfig {
    LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    }
}
