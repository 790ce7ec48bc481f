use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use optibot_core::{ChatSettings, ResponseTemplate};
use optibot_engine::{ArticleSource, FetchSettings, IngestSettings};
use optibot_logging::bot_info;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "optibot.ron";
pub const DEFAULT_HELP_CENTER_URL: &str = "https://support.optisigns.com/hc/en-us";
pub const DEFAULT_ARTICLES_DIR: &str = "articles";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {path}: {source}")]
    ParseRon {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to parse config file {path}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },
}

/// Everything the app needs to start a session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chat: ChatSettings,
    pub source: ArticleSource,
    pub fetch: FetchSettings,
    pub ingest: IngestSettings,
}

impl AppConfig {
    pub fn with_articles_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(root) = dir {
            self.source = ArticleSource::Directory { root };
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
enum SourceFile {
    Http { base_url: String },
    Directory { path: PathBuf },
}

impl Default for SourceFile {
    fn default() -> Self {
        SourceFile::Directory {
            path: PathBuf::from(DEFAULT_ARTICLES_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
struct FetchFile {
    extension: String,
    connect_timeout_secs: u64,
    request_timeout_secs: Option<u64>,
    max_bytes: u64,
}

impl Default for FetchFile {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            extension: settings.extension,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.map(|t| t.as_secs()),
            max_bytes: settings.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
struct IngestFile {
    help_center_url: String,
    output_dir: Option<PathBuf>,
    max_articles: usize,
    max_pages: u32,
    per_page: u32,
    request_timeout_secs: u64,
}

impl Default for IngestFile {
    fn default() -> Self {
        Self {
            help_center_url: DEFAULT_HELP_CENTER_URL.to_string(),
            output_dir: None,
            max_articles: 30,
            max_pages: 10,
            per_page: 100,
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
struct TemplateFile {
    apology: String,
    intro: String,
    steps: Vec<String>,
    citations_heading: String,
}

impl Default for TemplateFile {
    fn default() -> Self {
        let template = ResponseTemplate::default();
        Self {
            apology: template.apology,
            intro: template.intro,
            steps: template.steps,
            citations_heading: template.citations_heading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
struct ConfigFile {
    source: SourceFile,
    articles: Vec<String>,
    greeting: String,
    placeholder_url_base: String,
    template: TemplateFile,
    fetch: FetchFile,
    ingest: IngestFile,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let chat = ChatSettings::default();
        Self {
            source: SourceFile::default(),
            articles: chat.articles,
            greeting: chat.greeting,
            placeholder_url_base: chat.placeholder_url_base,
            template: TemplateFile::default(),
            fetch: FetchFile::default(),
            ingest: IngestFile::default(),
        }
    }
}

impl ConfigFile {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let source = match self.source {
            SourceFile::Http { base_url } => ArticleSource::Http {
                base_url: parse_url(base_url)?,
            },
            SourceFile::Directory { path } => ArticleSource::Directory { root: path },
        };

        // Ingest feeds the chat, so by default it writes where the chat reads.
        let output_dir = match (self.ingest.output_dir, &source) {
            (Some(dir), _) => dir,
            (None, ArticleSource::Directory { root }) => root.clone(),
            (None, ArticleSource::Http { .. }) => PathBuf::from(DEFAULT_ARTICLES_DIR),
        };
        let ingest = IngestSettings {
            max_articles: self.ingest.max_articles,
            max_pages: self.ingest.max_pages,
            per_page: self.ingest.per_page,
            request_timeout: Duration::from_secs(self.ingest.request_timeout_secs),
            ..IngestSettings::new(parse_url(self.ingest.help_center_url)?, output_dir)
        };

        let fetch = FetchSettings {
            extension: self.fetch.extension,
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: self.fetch.request_timeout_secs.map(Duration::from_secs),
            max_bytes: self.fetch.max_bytes,
            ..FetchSettings::default()
        };

        let chat = ChatSettings {
            articles: self.articles,
            greeting: self.greeting,
            placeholder_url_base: self.placeholder_url_base,
            template: ResponseTemplate {
                apology: self.template.apology,
                intro: self.template.intro,
                steps: self.template.steps,
                citations_heading: self.template.citations_heading,
            },
        };

        Ok(AppConfig {
            chat,
            source,
            fetch,
            ingest,
        })
    }
}

fn parse_url(url: String) -> Result<Url, ConfigError> {
    Url::parse(&url).map_err(|source| ConfigError::InvalidUrl { url, source })
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, `optibot.ron` is used when present
/// and built-in defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                bot_info!("No {} found; using built-in defaults", DEFAULT_CONFIG_FILE);
                return ConfigFile::default().into_config();
            }
            default_path
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
        path: path.clone(),
        source,
    })?;
    let file = parse(&path, &text)?;
    bot_info!(
        "Loaded config from {:?} ({} articles)",
        path,
        file.articles.len()
    );
    file.into_config()
}

fn parse(path: &Path, text: &str) -> Result<ConfigFile, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(text).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    } else {
        ron::from_str(text).map_err(|source| ConfigError::ParseRon {
            path: path.to_path_buf(),
            source,
        })
    }
}
