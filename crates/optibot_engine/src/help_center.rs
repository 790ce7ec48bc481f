use futures_util::StreamExt;
use optibot_logging::bot_debug;
use serde::Deserialize;
use url::Url;

use crate::fetch::{map_reqwest_error, with_trailing_slash};
use crate::ingest::IngestSettings;
use crate::{FailureKind, FetchError};

/// One entry of the help center's `articles.json` listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HelpCenterArticle {
    pub id: u64,
    pub title: Option<String>,
    /// HTML body.
    pub body: Option<String>,
    /// Public page of the article.
    pub html_url: String,
    /// API resource of the article.
    pub url: String,
    pub updated_at: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub outdated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<HelpCenterArticle>,
    /// Absent on the last page.
    pub next_page: Option<String>,
}

pub struct HelpCenterClient {
    base_url: Url,
    per_page: u32,
    max_bytes: u64,
    client: reqwest::Client,
}

impl HelpCenterClient {
    pub fn new(settings: &IngestSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base_url: with_trailing_slash(settings.help_center_url.clone()),
            per_page: settings.per_page,
            max_bytes: settings.max_bytes,
            client,
        })
    }

    /// `{base}/articles.json?page={page}&per_page={n}`.
    pub fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join("articles.json")
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    pub async fn fetch_page(&self, page: u32) -> Result<ArticlePage, FetchError> {
        let url = self.page_url(page)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{url}: {status}"),
            ));
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let total = bytes.len() as u64 + chunk.len() as u64;
            if total > self.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(total),
                    },
                    "article listing too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let listing: ArticlePage = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, format!("{url}: {err}")))?;
        bot_debug!("Listed {} articles from {}", listing.articles.len(), url);
        Ok(listing)
    }
}
