//! Commands that talk to the tool itself rather than to the bundle manager

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

use crate::cli::commands::{Cli, ConfigCommands};
use crate::client::BundleMgrClient;
use crate::config::CliConfig;
use crate::format::{format_config, format_health, format_success, OutputFormat};

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", format_config(current_config, format)?);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            config.set(&key, &value)?;
            config.save()?;
            println!("{}", format_success(&format!("Set {} = {}", key, value)));
        }
        ConfigCommands::Reset => {
            CliConfig::default().save()?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Handle health command
pub async fn handle_health(client: &BundleMgrClient, format: OutputFormat) -> Result<()> {
    let health = client.health_check().await?;
    println!("{}", format_health(&health, format)?);
    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
