use crate::config::Config;
use anyhow::{Context, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Persist the API endpoint
    SetEndpoint {
        /// Endpoint URL
        endpoint: String,
    },
}

/// `config` is the effective configuration; only file values are saved
pub fn run(command: ConfigCommand, config: Config) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::SetEndpoint { endpoint } => {
            url::Url::parse(&endpoint).with_context(|| format!("invalid endpoint {}", endpoint))?;
            let path = Config::set_endpoint(&endpoint)?;
            println!("Endpoint set to {} in {}", endpoint, path.display());
            Ok(())
        }
    }
}
