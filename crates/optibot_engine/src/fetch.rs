use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc,
};
use std::time::Duration;

use futures_util::StreamExt;
use optibot_logging::bot_debug;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_text;
use crate::{EngineEvent, FailureKind, FetchError};

/// File extension appended to every article identifier.
pub const DEFAULT_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub extension: String,
    pub connect_timeout: Duration,
    /// Whole-request deadline. `None` waits as long as the server does.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Accepted besides any `text/*` type.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec!["application/octet-stream".to_string()],
        }
    }
}

impl FetchSettings {
    /// `{identifier}.{extension}`, refusing identifiers that could escape the base.
    pub(crate) fn file_name(&self, identifier: &str) -> Result<String, FetchError> {
        let suspicious = identifier.is_empty()
            || identifier.contains(&['/', '\\'][..])
            || identifier.starts_with('.')
            || identifier.contains("..");
        if suspicious {
            return Err(FetchError::new(
                FailureKind::InvalidIdentifier,
                format!("refusing article identifier {identifier:?}"),
            ));
        }
        if self.extension.is_empty() {
            Ok(identifier.to_string())
        } else {
            Ok(format!("{identifier}.{}", self.extension))
        }
    }

    pub(crate) fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        let is_text = ct
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"));
        is_text
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    pub(crate) fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        if actual > self.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: Some(actual),
                },
                "article too large",
            ));
        }
        Ok(())
    }
}

/// Receives engine events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Retrieves the raw text of one article.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    base_url: Url,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(base_url: Url, settings: FetchSettings) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            settings,
        }
    }

    pub fn article_url(&self, identifier: &str) -> Result<Url, FetchError> {
        let file_name = self.settings.file_name(identifier)?;
        self.base_url
            .join(&file_name)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn build_client(&self, redirect_counter: Arc<AtomicUsize>) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            let count = attempt.previous().len();
            redirect_counter.store(count, Ordering::Relaxed);
            if count >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .redirect(policy);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let url = self.article_url(identifier)?;
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = self.build_client(redirect_counter.clone())?;

        let response = client.get(url.clone()).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{url}: {status}"),
            ));
        }

        if let Some(content_len) = response.content_length() {
            self.settings.check_size(content_len)?;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.settings.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "article is not text",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            self.settings
                .check_size(bytes.len() as u64 + chunk.len() as u64)?;
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_text(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        bot_debug!(
            "Fetched {} ({} bytes, {}, {} redirects)",
            url,
            bytes.len(),
            decoded.encoding_label,
            redirect_counter.load(Ordering::Relaxed)
        );
        Ok(decoded.text)
    }
}

/// Without a trailing slash `Url::join` would replace the last segment.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{FetchSettings, ReqwestFetcher};
    use crate::FailureKind;
    use url::Url;

    #[test]
    fn article_url_keeps_base_path() {
        let base = Url::parse("http://localhost:8000/kb/articles").unwrap();
        let fetcher = ReqwestFetcher::new(base, FetchSettings::default());
        assert_eq!(
            fetcher.article_url("how-to").unwrap().as_str(),
            "http://localhost:8000/kb/articles/how-to.md"
        );
    }

    #[test]
    fn traversal_identifiers_are_rejected() {
        let settings = FetchSettings::default();
        for bad in ["", "../secret", "a/b", ".hidden", "a\\b"] {
            let err = settings.file_name(bad).unwrap_err();
            assert_eq!(err.kind, FailureKind::InvalidIdentifier, "{bad:?}");
        }
    }

    #[test]
    fn text_types_and_allow_list_are_accepted() {
        let settings = FetchSettings::default();
        assert!(settings.is_content_type_allowed("text/markdown; charset=utf-8"));
        assert!(settings.is_content_type_allowed("TEXT/PLAIN"));
        assert!(settings.is_content_type_allowed("application/octet-stream"));
        assert!(!settings.is_content_type_allowed("image/png"));
        assert!(!settings.is_content_type_allowed("application/json"));
    }
}
