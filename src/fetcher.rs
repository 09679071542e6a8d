use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use reqwest::{Client, header, header::HeaderValue};
use tracing::{error, info};

use crate::errors::{Error, Result};

/// Transport used by the pipeline to download a page.
pub trait Fetch: Send + Sync {
    /// Body of `url` as text, [`Error::Fetch`] for any non-success status.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

pub struct Fetcher(Client);

impl Fetcher {
    #[rustfmt::skip]
    const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    pub fn new(referrer: &str, timeout: Option<Duration>) -> Result<Self> {
        Self::with_user_agent(referrer, Self::USER_AGENT, timeout)
    }

    pub fn with_user_agent(
        referrer: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(Self::set_headers(referrer)?);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self(builder.build()?))
    }

    fn set_headers(referrer: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        let referrer = HeaderValue::from_str(referrer)
            .map_err(|_| Error::Config(format!("invalid referer `{referrer}`")))?;

        headers.insert(header::ACCEPT, HeaderValue::from_static(Self::ACCEPT));
        headers.insert(header::REFERER, referrer);

        Ok(headers)
    }
}

impl Fetch for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        info!(url, "Fetching");

        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(e, url))?;
        let status = response.status();

        if !status.is_success() {
            error!(url, status = status.as_u16(), "Failed to fetch");

            return Err(Error::Fetch {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| Error::transport(e, url))
    }
}

impl Deref for Fetcher {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
