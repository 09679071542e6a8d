use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::stream::StreamExt;
use tokio_stream as stream;
use tracing::debug;

use desidub::config::Settings;
use desidub::fetcher::Fetcher;
use desidub::logging;
use desidub::models::{Envelope, Record};
use desidub::provider::{Provider, Resource};

#[cfg(feature = "table")]
use crate::tui;

mod config;

/// Structured records from desidubanime pages
#[derive(Parser, Debug)]
#[command(author, version, about, arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Render records as tables instead of JSON
    #[cfg(feature = "table")]
    #[arg(short, long, global = true)]
    table: bool,

    /// Override the configured site root
    #[arg(long, global = true, env = "DESIDUB_BASE_URL")]
    base_url: Option<String>,

    /// Maximum number of pages fetched at the same time
    #[arg(
        short = 'm',
        long = "max-concurrent",
        value_name = "MAX",
        default_value = "8",
        global = true
    )]
    max_concurrent: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spotlight, trending and latest releases
    Home,
    /// Search the archive
    #[command(alias = "s")]
    Search {
        #[arg(required = true)]
        query: Vec<String>,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Details and episodes of one or more anime
    #[command(alias = "i")]
    Info {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Player sources of one or more episodes
    #[command(alias = "w")]
    Watch {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Read or change the configuration file
    #[command(subcommand)]
    Config(config::Command),
}

/// Runs the command line, `false` when any resource failed
pub async fn run() -> Result<bool> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_json)?;

    let resources = match args.command {
        Command::Config(cmd) => return config::execute(cmd).map(|_| true),
        Command::Home => vec![Resource::Home],
        Command::Search { query, page } => vec![Resource::Search {
            query: query.join(" "),
            page,
        }],
        Command::Info { ids } => ids.into_iter().map(|id| Resource::Info { id }).collect(),
        Command::Watch { ids } => ids.into_iter().map(|id| Resource::Watch { id }).collect(),
    };

    let mut settings = Settings::load();
    if let Some(url) = args.base_url {
        settings.base_url = url.trim_end_matches('/').to_string();
    }
    debug!(?settings, "Loaded settings");

    let fetcher = Fetcher::with_user_agent(
        &settings.base_url,
        &settings.user_agent,
        settings.timeout,
    )?;
    let provider = Provider::new(fetcher, &settings.base_url).ttl(settings.ttl);

    let envelopes = stream::iter(&resources)
        .map(|resource| provider.respond(resource))
        .buffered(args.max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;

    #[cfg(feature = "table")]
    let table = args.table;
    #[cfg(not(feature = "table"))]
    let table = false;

    for envelope in &envelopes {
        print(envelope, table)?;
    }

    Ok(envelopes.iter().all(Envelope::is_ok))
}

fn print(envelope: &Envelope<Record>, table: bool) -> Result<()> {
    #[cfg(feature = "table")]
    if table {
        println!("{}", tui::render(envelope));
        return Ok(());
    }

    #[cfg(not(feature = "table"))]
    let _ = table;

    println!("{}", serde_json::to_string_pretty(envelope)?);

    Ok(())
}
