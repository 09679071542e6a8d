use std::process::ExitCode;

use owo_colors::OwoColorize;

mod cli;
#[cfg(feature = "table")]
mod tui;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", format!("[ERROR] {err:#}").red());
            ExitCode::FAILURE
        }
    }
}
