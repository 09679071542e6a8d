use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use crate::archive::{parse_home, parse_info, parse_search, parse_watch};
use crate::cache::Cache;
use crate::errors::{Error, Result};
use crate::fetcher::Fetch;
use crate::models::{AnimeInfo, Envelope, Home, Record, SearchPage, WatchInfo};

pub const BASE_URL: &str = "https://www.desidubanime.me";

/// A page of the site a caller can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Home,
    Search { query: String, page: u32 },
    Info { id: String },
    Watch { id: String },
}

impl Resource {
    pub fn cache_key(&self) -> String {
        match self {
            Resource::Home => "home".to_string(),
            Resource::Search { query, page } => format!("search:{query}:{page}"),
            Resource::Info { id } => format!("info:{id}"),
            Resource::Watch { id } => format!("watch:{id}"),
        }
    }

    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');

        match self {
            Resource::Home => format!("{base}/"),
            Resource::Search { query, page } => {
                let query = urlencoding::encode(query);
                format!("{base}/page/{page}/?s={query}")
            }
            Resource::Info { id } => format!("{base}/anime/{id}/"),
            Resource::Watch { id } => format!("{base}/watch/{id}/"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Home => write!(f, "home"),
            Resource::Search { query, page } => write!(f, "search `{query}` (page {page})"),
            Resource::Info { id } => write!(f, "anime `{id}`"),
            Resource::Watch { id } => write!(f, "watch `{id}`"),
        }
    }
}

/// How long each kind of record stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl {
    pub home: Duration,
    pub search: Duration,
    pub info: Duration,
    pub watch: Duration,
}

impl Default for Ttl {
    fn default() -> Self {
        Self {
            home: Duration::from_secs(5 * 60),
            search: Duration::from_secs(10 * 60),
            info: Duration::from_secs(60 * 60),
            watch: Duration::from_secs(10 * 60),
        }
    }
}

impl Ttl {
    pub fn of(&self, resource: &Resource) -> Duration {
        match resource {
            Resource::Home => self.home,
            Resource::Search { .. } => self.search,
            Resource::Info { .. } => self.info,
            Resource::Watch { .. } => self.watch,
        }
    }
}

pub struct Provider<F> {
    fetcher: Arc<F>,
    base_url: String,
    ttl: Ttl,
    home: Cache<Home>,
    search: Cache<SearchPage>,
    info: Cache<AnimeInfo>,
    watch: Cache<WatchInfo>,
}

impl<F> Provider<F>
where
    F: Fetch + 'static,
{
    pub fn new(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl: Ttl::default(),
            home: Cache::new(),
            search: Cache::new(),
            info: Cache::new(),
            watch: Cache::new(),
        }
    }

    pub fn ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn home(&self) -> Result<Home> {
        self.resolve(&self.home, &Resource::Home, parse_home).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        if page < 1 {
            return Err(Error::InvalidPage);
        }

        let resource = Resource::Search {
            query: query.to_string(),
            page,
        };
        let query = query.to_string();

        self.resolve(&self.search, &resource, move |html| {
            parse_search(html, &query, page)
        })
        .await
    }

    pub async fn info(&self, id: &str) -> Result<AnimeInfo> {
        let resource = Resource::Info { id: id.to_string() };
        let id = id.to_string();

        self.resolve(&self.info, &resource, move |html| parse_info(html, &id))
            .await
    }

    /// Unlike the other pages, every failure comes back as [`Error::Handler`].
    pub async fn watch(&self, id: &str) -> Result<WatchInfo> {
        let resource = Resource::Watch { id: id.to_string() };
        let page_id = id.to_string();

        self.resolve(&self.watch, &resource, move |html| {
            parse_watch(html, &page_id)
        })
        .await
        .map_err(|err| {
            error!(id, error = %err, "Error in watch handler");
            err.into_handler_failure()
        })
    }

    /// Resolves any resource into its record.
    pub async fn record(&self, resource: &Resource) -> Result<Record> {
        info!(%resource, "Handling request");

        match resource {
            Resource::Home => self.home().await.map(Record::Home),
            Resource::Search { query, page } => self.search(query, *page).await.map(Record::Search),
            Resource::Info { id } => self.info(id).await.map(Record::Info),
            Resource::Watch { id } => self.watch(id).await.map(Record::Watch),
        }
    }

    /// Like [`Provider::record`], with failures folded into the envelope.
    pub async fn respond(&self, resource: &Resource) -> Envelope<Record> {
        match self.record(resource).await {
            Ok(record) => Envelope::ok(record),
            Err(err) => Envelope::failure(err.status(), err.to_string()),
        }
    }

    /// Resolves a resource into the JSON envelope returned to callers.
    pub async fn handle(&self, resource: &Resource) -> Envelope<Value> {
        let Envelope {
            status,
            data,
            message,
            ..
        } = self.respond(resource).await;

        match data.map(serde_json::to_value).transpose() {
            Ok(Some(data)) => Envelope::ok(data),
            Ok(None) => Envelope::failure(status, message.unwrap_or_default()),
            Err(err) => Envelope::failure(500, err.to_string()),
        }
    }

    /// Drops every cached record.
    pub async fn clear(&self) {
        self.home.clear().await;
        self.search.clear().await;
        self.info.clear().await;
        self.watch.clear().await;
    }

    async fn resolve<V, P>(&self, cache: &Cache<V>, resource: &Resource, parse: P) -> Result<V>
    where
        V: Clone + Send + Sync + 'static,
        P: FnOnce(&str) -> V + Send + 'static,
    {
        let url = resource.url(&self.base_url);
        let fetcher = Arc::clone(&self.fetcher);

        cache
            .get_or_set(&resource.cache_key(), self.ttl.of(resource), move || {
                async move {
                    let html = fetcher.fetch(&url).await?;
                    Ok(parse(&html))
                }
            })
            .await
    }
}
