use std::io;
use std::path::PathBuf;
use std::time::Duration;

use optibot_logging::{bot_debug, bot_error, bot_info, bot_warn};
use thiserror::Error;
use url::Url;

use crate::article_file::{article_title, build_article_document, content_hash, ArticleMeta};
use crate::convert::{clean_article_html, Converter, Html2MdConverter};
use crate::help_center::{HelpCenterArticle, HelpCenterClient};
use crate::persist::{ArticleStore, PersistError};
use crate::slug::slugify;
use crate::FetchError;

pub const DEFAULT_USER_AGENT: &str = concat!("OptiBot-Ingest/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Help center root, e.g. `https://support.optisigns.com/hc/en-us`.
    pub help_center_url: Url,
    pub output_dir: PathBuf,
    /// Articles written or confirmed unchanged before the run stops.
    pub max_articles: usize,
    pub max_pages: u32,
    pub per_page: u32,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Cap on one listing page.
    pub max_bytes: u64,
}

impl IngestSettings {
    pub fn new(help_center_url: Url, output_dir: PathBuf) -> Self {
        Self {
            help_center_url,
            output_dir,
            max_articles: 30,
            max_pages: 10,
            per_page: 100,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            redirect_limit: 5,
            max_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleChange {
    Added,
    Updated,
    Unchanged,
}

/// Slugs of one ingest run, split by outcome, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    /// Drafts and outdated articles.
    pub skipped: usize,
    pub pages: u32,
    /// Set when a listing page could not be fetched; pagination stopped there.
    pub listing_error: Option<FetchError>,
}

impl IngestReport {
    pub fn processed(&self) -> usize {
        self.added.len() + self.updated.len() + self.unchanged.len()
    }

    fn record(&mut self, slug: String, change: ArticleChange) {
        match change {
            ArticleChange::Added => self.added.push(slug),
            ArticleChange::Updated => self.updated.push(slug),
            ArticleChange::Unchanged => self.unchanged.push(slug),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to build http client: {0}")]
    Client(#[source] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// Page through the help center listing and write each published article as Markdown.
///
/// An article whose rendered document hashes the same as its existing sidecar
/// is left untouched. A listing failure ends pagination and is reported; a
/// write failure aborts the run.
pub async fn ingest_articles(
    settings: &IngestSettings,
    converter: &dyn Converter,
    scraped_utc: &str,
) -> Result<IngestReport, IngestError> {
    let client = HelpCenterClient::new(settings).map_err(IngestError::Client)?;
    let store = ArticleStore::open(settings.output_dir.clone())?;
    let mut report = IngestReport::default();

    let mut page = 1;
    'pages: loop {
        bot_info!("Fetching article listing page {}", page);
        let listing = match client.fetch_page(page).await {
            Ok(listing) => listing,
            Err(err) => {
                bot_error!("Failed to fetch listing page {}: {}", page, err);
                report.listing_error = Some(err);
                break;
            }
        };
        report.pages = page;

        if listing.articles.is_empty() {
            bot_info!("No more articles");
            break;
        }

        for article in &listing.articles {
            if report.processed() >= settings.max_articles {
                bot_info!("Reached the limit of {} articles", settings.max_articles);
                break 'pages;
            }
            if article.draft || article.outdated {
                bot_debug!("Skipping draft/outdated article {}", article.id);
                report.skipped += 1;
                continue;
            }
            let (slug, change) = save_article(&store, article, converter, scraped_utc)?;
            bot_info!("{:?}: {}", change, slug);
            report.record(slug, change);
        }

        if listing.next_page.is_none() || page >= settings.max_pages {
            break;
        }
        page += 1;
    }

    bot_info!(
        "Ingest finished in {}: {} added, {} updated, {} unchanged, {} skipped",
        store.dir().display(),
        report.added.len(),
        report.updated.len(),
        report.unchanged.len(),
        report.skipped
    );
    Ok(report)
}

/// Run [`ingest_articles`] to completion on a private runtime.
pub fn run_ingest(settings: &IngestSettings, scraped_utc: &str) -> Result<IngestReport, IngestError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(IngestError::Runtime)?;
    runtime.block_on(ingest_articles(settings, &Html2MdConverter, scraped_utc))
}

fn save_article(
    store: &ArticleStore,
    article: &HelpCenterArticle,
    converter: &dyn Converter,
    scraped_utc: &str,
) -> Result<(String, ArticleChange), PersistError> {
    let title = article_title(article);
    let mut slug = slugify(&title);
    if slug.is_empty() {
        slug = format!("article-{}", article.id);
    }

    let body_markdown = match article.body.as_deref().filter(|b| !b.trim().is_empty()) {
        Some(html) => converter
            .to_markdown(&clean_article_html(html))
            .trim()
            .to_string(),
        None => {
            bot_warn!("Article {} ({}) has no body", article.id, title);
            String::new()
        }
    };

    let document = build_article_document(article, &title, &body_markdown);
    let hash = content_hash(&document);
    let change = match store.previous_hash(&slug) {
        Some(previous) if previous == hash => return Ok((slug, ArticleChange::Unchanged)),
        Some(_) => ArticleChange::Updated,
        None => ArticleChange::Added,
    };

    let meta = ArticleMeta {
        id: article.id,
        title,
        slug: slug.clone(),
        html_url: article.html_url.clone(),
        api_url: article.url.clone(),
        updated_at: article.updated_at.clone(),
        content_hash: hash,
        last_scraped: scraped_utc.to_string(),
    };
    store.save(&slug, &document, &meta)?;
    Ok((slug, change))
}
