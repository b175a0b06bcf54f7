/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

pub mod commands;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// Shiptrack CLI
///
/// Serves the deploy tracking API and manages its API keys.
pub struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(long, global = true, env = "SHIPTRACK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the shiptrack server
    Serve,

    /// Create new entities
    Create(CreateCommands),

    /// Rotate keys
    Rotate(RotateCommands),
}

#[derive(Args)]
pub struct CreateCommands {
    #[command(subcommand)]
    pub command: CreateSubcommands,
}

#[derive(Subcommand)]
pub enum CreateSubcommands {
    /// Create an API token for an integration
    Token {
        /// Name of the token
        #[arg(long)]
        name: String,
        /// What the token may report: deploy, snapshot or metrics
        #[arg(long)]
        source: String,
    },
}

#[derive(Args)]
pub struct RotateCommands {
    #[command(subcommand)]
    pub command: RotateSubcommands,
}

#[derive(Subcommand)]
pub enum RotateSubcommands {
    /// Rotate the admin key
    Admin,

    /// Rotate an API token's key
    Token {
        /// UUID of the token
        #[arg(long)]
        id: Uuid,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
