use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dom::{Node, Page, select_text};
use crate::models::{EncryptedConfig, Source, WatchInfo};

const TITLE_SUFFIX: &str = " - Desi Dub Anime";
const IFRAME_NAME: &str = "Iframe";
const ENCRYPTED_DESCRIPTION: &str = "Encrypted player config. Requires decryption (AES/Salted).";

/// Embeds that never carry a player.
const NON_PLAYER_EMBEDS: [&str; 2] = ["google", "disqus"];

const JS_CONFIGS_MARKER: &str = "var js_configs";

static JS_CONFIGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"var js_configs\s*=\s*["']([^"']+)["']"#).expect("valid js_configs pattern")
});

pub fn parse_watch(markup: &str, id: &str) -> WatchInfo {
    let page = Page::parse(markup);
    let watch = extract_watch(&page.root(), id);

    debug!(id, title = %watch.title, sources = watch.sources.len(), "Parsed watch page");

    watch
}

pub fn extract_watch<N: Node>(root: &N, id: &str) -> WatchInfo {
    let mut sources = iframe_sources(root);
    sources.extend(encrypted_source(root));

    WatchInfo {
        id: id.to_string(),
        title: title(root),
        sources,
    }
}

fn title<N: Node>(root: &N) -> String {
    match select_text(root, "h1") {
        t if t.is_empty() => root
            .select("title")
            .iter()
            .map(Node::text)
            .collect::<String>()
            .replacen(TITLE_SUFFIX, "", 1)
            .trim()
            .to_string(),
        t => t,
    }
}

fn iframe_sources<N: Node>(root: &N) -> Vec<Source> {
    root.select("iframe")
        .iter()
        .filter_map(|iframe| iframe.attr("src").or_else(|| iframe.attr("data-src")))
        .filter(|src| !NON_PLAYER_EMBEDS.iter().any(|e| src.contains(e)))
        .inspect(|src| debug!(src = %src, "Found iframe source"))
        .map(|url| Source::Iframe {
            url,
            name: IFRAME_NAME.to_string(),
        })
        .collect()
}

/// The first `js_configs` assignment, left encrypted.
fn encrypted_source<N: Node>(root: &N) -> Option<Source> {
    let config = root
        .select("script")
        .iter()
        .map(Node::text)
        .filter(|script| script.contains(JS_CONFIGS_MARKER))
        .find_map(|script| {
            JS_CONFIGS
                .captures(&script)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })?;

    debug!("Found js_configs payload");

    Some(Source::Encrypted {
        config: EncryptedConfig::new(config),
        description: ENCRYPTED_DESCRIPTION.to_string(),
    })
}
