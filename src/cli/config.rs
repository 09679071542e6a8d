use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;

use desidub::config::{self, KEYS, Settings};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a value
    Set {
        #[arg(value_parser = KEYS)]
        key: String,
        value: String,
    },
    /// Print the effective settings
    Show,
    /// Delete the configuration file
    Clean,
}

pub fn execute(cmd: Command) -> Result<()> {
    match cmd {
        Command::Set { key, value } => {
            config::save(&key, &value)?;
            println!("{} {key} = {value}", "Saved".green().bold());
        }
        Command::Show => {
            println!("{}", config::config_path().display().cyan().bold());
            for (key, value) in Settings::load().entries() {
                println!("{} = {value}", key.magenta());
            }
        }
        Command::Clean => {
            config::clean()?;
            println!("{}", "Configuration deleted".green().bold());
        }
    }

    Ok(())
}
