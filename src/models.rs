use serde::Serialize;

pub const PROVIDER: &str = "Desidubanime";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Home {
    pub spotlight: Vec<SpotlightItem>,
    pub trending: Vec<TrendingItem>,
    pub latest: Vec<LatestSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub url: String,
    pub is_dub: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestSection {
    pub title: String,
    pub items: Vec<LatestItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_episode: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub page: u32,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimeInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub number: u32,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchInfo {
    pub id: String,
    pub title: String,
    pub sources: Vec<Source>,
}

/// Any record the provider produces, serialized as the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Home(Home),
    Search(SearchPage),
    Info(AnimeInfo),
    Watch(WatchInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    Iframe {
        url: String,
        name: String,
    },
    Encrypted {
        config: EncryptedConfig,
        description: String,
    },
}

impl Source {
    pub fn is_iframe(&self) -> bool {
        matches!(self, Source::Iframe { .. })
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Source::Encrypted { .. })
    }
}

/// Player configuration exactly as the page embeds it.
///
/// The payload is encrypted with a key this crate does not know, so it is
/// only ever passed through. Consumers that hold the key decode it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncryptedConfig(String);

impl EncryptedConfig {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Response wrapper handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub provider: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            provider: PROVIDER,
            status: 200,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            provider: PROVIDER,
            status,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_fields() {
        let item = SpotlightItem {
            id: "naruto".into(),
            title: "Naruto".into(),
            description: String::new(),
            poster: None,
            url: "https://site/anime/naruto/".into(),
            is_dub: true,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["isDub"], json!(true));
        assert!(value.get("poster").is_none());
    }

    #[test]
    fn test_source_tagging() {
        let sources = vec![
            Source::Iframe {
                url: "https://player/embed/1".into(),
                name: "Iframe".into(),
            },
            Source::Encrypted {
                config: EncryptedConfig::new("U2FsdGVkX1"),
                description: "opaque".into(),
            },
        ];

        let value = serde_json::to_value(&sources).unwrap();
        assert_eq!(
            value,
            json!([
                { "type": "iframe", "url": "https://player/embed/1", "name": "Iframe" },
                { "type": "encrypted", "config": "U2FsdGVkX1", "description": "opaque" }
            ])
        );
    }

    #[test]
    fn test_envelope() {
        let ok = Envelope::ok(1);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "provider": "Desidubanime", "status": 200, "data": 1 })
        );

        let failure = Envelope::<u32>::failure(404, "Failed to fetch");
        assert!(!failure.is_ok());
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({ "provider": "Desidubanime", "status": 404, "message": "Failed to fetch" })
        );
    }
}
