//! Extraction rules for each page of the site.
//!
//! Every parser is best-effort: a field that cannot be read degrades the one
//! item it belongs to, never the page.

pub mod home;
pub mod info;
pub mod search;
pub mod watch;

pub use home::parse_home;
pub use info::{normalize_episodes, parse_info};
pub use search::parse_search;
pub use watch::parse_watch;

/// Fields shared by every listing card, as read from the markup
#[derive(Debug, Default)]
pub(crate) struct Card {
    pub title: String,
    pub link: Option<String>,
    pub id: Option<String>,
    pub poster: Option<String>,
}

/// A card that passed [`Card::is_listed`]
#[derive(Debug)]
pub(crate) struct Listing {
    pub id: String,
    pub title: String,
    pub url: String,
    pub poster: Option<String>,
}

impl Card {
    pub fn new(title: String, link: Option<String>, poster: Option<String>) -> Self {
        let id = link.as_deref().and_then(anime_id);

        Self {
            title,
            link,
            id,
            poster,
        }
    }

    /// Falls back to the last path segment when the link has no `/anime/` slug
    pub fn with_segment_fallback(mut self) -> Self {
        if self.id.is_none() {
            self.id = self.link.as_deref().and_then(last_segment);
        }
        self
    }

    /// A card is listed only when both a title and an id could be read
    pub fn is_listed(&self) -> bool {
        !self.title.is_empty() && self.link.is_some() && self.id.is_some()
    }

    pub fn into_listing(self) -> Option<Listing> {
        if !self.is_listed() {
            return None;
        }

        let Card {
            title,
            link,
            id,
            poster,
        } = self;

        Some(Listing {
            id: id?,
            title,
            url: link?,
            poster,
        })
    }
}

/// Slug following `/anime/` in a detail link
pub fn anime_id(link: &str) -> Option<String> {
    segment_after(link, "/anime/")
}

/// Slug following `/watch/` in an episode link
pub fn watch_id(link: &str) -> Option<String> {
    segment_after(link, "/watch/")
}

/// Last non-empty path segment of a link
pub fn last_segment(link: &str) -> Option<String> {
    link.split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_string)
}

fn segment_after(link: &str, marker: &str) -> Option<String> {
    let rest = link.split(marker).nth(1)?;
    let id = rest.strip_suffix('/').unwrap_or(rest);

    (!id.is_empty()).then(|| id.to_string())
}

/// Leading integer of a label, ignoring surrounding whitespace.
///
/// `"12 Episodes"` reads as 12, `"Ep 12"` has no leading digits and reads as
/// nothing.
pub fn leading_number(label: &str) -> Option<u32> {
    let label = label.trim_start();
    let end = label
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(label.len());

    label[..end].parse().ok()
}

/// First run of digits anywhere in a label
pub fn first_number(label: &str) -> Option<u32> {
    let start = label.find(|c: char| c.is_ascii_digit())?;
    leading_number(&label[start..])
}
