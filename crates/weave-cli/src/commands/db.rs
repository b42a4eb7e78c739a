//! Database commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum DbCommands {
    /// Create the database file and apply migrations
    Init,
}

pub fn execute(cmd: DbCommands, config: &AppConfig) -> Result<()> {
    match cmd {
        DbCommands::Init => {
            super::open_db(config)?;
            println!(
                "{} {}",
                "✓".green().bold(),
                format!("Database ready at {}", config.database.path.display())
            );
            Ok(())
        }
    }
}
