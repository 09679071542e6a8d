use std::collections::BTreeMap;

use tracing::debug;

use super::{first_number, leading_number, watch_id};
use crate::dom::{Node, Page, first_attr, first_text, select_text};
use crate::models::{AnimeInfo, Episode};

const TITLE: &str = "h1.entry-title";
const DESCRIPTION: &str = ".entry-content p";
const POSTER: &str = ".entry-content img";

const EPISODE_ITEM: &str = ".episode-list-display-box .episode-list-item";
const EPISODE_NUMBER: &str = "data-episode-search-query";
const EPISODE_TITLE: &str = ".episode-list-item-title";

const CAROUSEL_EPISODE: &str = ".swiper-slide a[href*='/watch/']";

pub fn parse_info(markup: &str, id: &str) -> AnimeInfo {
    let page = Page::parse(markup);
    let info = extract_info(&page.root(), id);

    debug!(id, episodes = info.episodes.len(), "Parsed anime page");

    info
}

pub fn extract_info<N: Node>(root: &N, id: &str) -> AnimeInfo {
    let mut episodes = listed_episodes(root);
    if episodes.is_empty() {
        episodes = carousel_episodes(root);
    }

    AnimeInfo {
        id: id.to_string(),
        title: select_text(root, TITLE),
        description: first_text(root, DESCRIPTION),
        poster: first_attr(root, POSTER, "src"),
        episodes: normalize_episodes(episodes),
    }
}

/// Unique episode numbers in ascending order, the last duplicate wins.
pub fn normalize_episodes(episodes: Vec<Episode>) -> Vec<Episode> {
    episodes
        .into_iter()
        .map(|e| (e.number, e))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

fn listed_episodes<N: Node>(root: &N) -> Vec<Episode> {
    root.select(EPISODE_ITEM)
        .iter()
        .filter_map(|item| {
            let url = item.attr("href")?;
            let number = leading_number(&item.attr(EPISODE_NUMBER)?)?;

            let title = match select_text(item, EPISODE_TITLE) {
                t if t.is_empty() => format!("Episode {number}"),
                t => t,
            };

            Some(Episode {
                number,
                title,
                id: watch_id(&url),
                url,
            })
        })
        .collect()
}

fn carousel_episodes<N: Node>(root: &N) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = vec![];

    for link in root.select(CAROUSEL_EPISODE) {
        let Some(url) = link.attr("href") else {
            continue;
        };

        let title = select_text(&link, "span");
        let number = first_number(&title).unwrap_or(episodes.len() as u32 + 1);

        episodes.push(Episode {
            number,
            title,
            id: watch_id(&url),
            url,
        });
    }

    episodes
}
