use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::directory::DirectoryFetcher;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ArticleLoaded {
        identifier: String,
        content: String,
    },
    ArticleFailed {
        identifier: String,
        error: FetchError,
    },
    /// Every attempt of one load batch has finished.
    LoadSettled(LoadReport),
}

/// Identifiers of one load batch, split by outcome, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

/// Where article bodies come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    /// `GET {base_url}/{identifier}.{extension}`.
    Http { base_url: Url },
    /// `{root}/{identifier}.{extension}` on the local filesystem.
    Directory { root: PathBuf },
}

impl ArticleSource {
    pub fn into_fetcher(self, settings: FetchSettings) -> Arc<dyn Fetcher> {
        match self {
            ArticleSource::Http { base_url } => Arc::new(ReqwestFetcher::new(base_url, settings)),
            ArticleSource::Directory { root } => Arc::new(DirectoryFetcher::new(root, settings)),
        }
    }
}

impl fmt::Display for ArticleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleSource::Http { base_url } => write!(f, "{base_url}"),
            ArticleSource::Directory { root } => write!(f, "{}", root.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidIdentifier,
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    NotFound,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidIdentifier => write!(f, "invalid article identifier"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
