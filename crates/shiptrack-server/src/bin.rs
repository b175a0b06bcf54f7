/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Shiptrack server binary.

use shiptrack_server::cli::{self, commands, Commands, CreateSubcommands, RotateSubcommands};
use shiptrack_utils::config::Settings;
use shiptrack_utils::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::parse_cli();

    let config = Settings::new(cli.config.clone())?;
    logging::init_with_format(&config.log.level, &config.log.format)?;

    match cli.command {
        Commands::Serve => commands::serve(&config).await?,
        Commands::Create(create) => match create.command {
            CreateSubcommands::Token { name, source } => {
                commands::create_token(&config, name, source)?
            }
        },
        Commands::Rotate(rotate) => match rotate.command {
            RotateSubcommands::Admin => commands::rotate_admin(&config)?,
            RotateSubcommands::Token { id } => commands::rotate_token(&config, id)?,
        },
    }

    Ok(())
}
