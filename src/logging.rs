use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("warn,desidub={level}"))
}

/// Builds the filter, `RUST_LOG` takes precedence over the command line
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose))
}

/// Installs the global subscriber, events go to stderr.
pub fn init(verbose: bool, json: bool) -> Result<()> {
    let layer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(verbose)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(layer)
        .try_init()
        .context("Unable to initialize logging")
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn test_filter_levels() {
        assert_eq!(default_filter(false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(default_filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
