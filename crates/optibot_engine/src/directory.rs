use std::io;
use std::path::PathBuf;

use optibot_logging::bot_debug;

use crate::decode::decode_text;
use crate::fetch::{FetchSettings, Fetcher};
use crate::{FailureKind, FetchError};

/// Reads articles from a local directory, for running without a web server.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
    settings: FetchSettings,
}

impl DirectoryFetcher {
    pub fn new(root: PathBuf, settings: FetchSettings) -> Self {
        Self { root, settings }
    }

    pub fn article_path(&self, identifier: &str) -> Result<PathBuf, FetchError> {
        Ok(self.root.join(self.settings.file_name(identifier)?))
    }
}

#[async_trait::async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let path = self.article_path(identifier)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|err| map_io_error(&path, err))?;
        self.settings.check_size(metadata.len())?;

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| map_io_error(&path, err))?;
        let decoded = decode_text(&bytes, None)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        bot_debug!(
            "Read {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            decoded.encoding_label
        );
        Ok(decoded.text)
    }
}

fn map_io_error(path: &std::path::Path, err: io::Error) -> FetchError {
    let kind = if err.kind() == io::ErrorKind::NotFound {
        FailureKind::NotFound
    } else {
        FailureKind::Io
    };
    FetchError::new(kind, format!("{}: {err}", path.display()))
}
