use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use optibot_logging::bot_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::article_file::ArticleMeta;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode article metadata: {0}")]
    Meta(#[from] serde_json::Error),
}

/// Ensure the output directory exists and is writable; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Directory of ingested articles: `{slug}.md` plus `{slug}.meta.json`.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn open(dir: PathBuf) -> Result<Self, PersistError> {
        ensure_output_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn markdown_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.md"))
    }

    pub fn meta_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.meta.json"))
    }

    /// Content hash recorded by the last ingest of `slug`.
    ///
    /// A missing or unreadable sidecar counts as never ingested.
    pub fn previous_hash(&self, slug: &str) -> Option<String> {
        let path = self.meta_path(slug);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<ArticleMeta>(&text) {
            Ok(meta) => Some(meta.content_hash),
            Err(err) => {
                bot_debug!("Ignoring unreadable {:?}: {}", path, err);
                None
            }
        }
    }

    /// Write the Markdown document, then its sidecar. Each file is replaced atomically.
    pub fn save(&self, slug: &str, document: &str, meta: &ArticleMeta) -> Result<PathBuf, PersistError> {
        let markdown = self.write_atomic(&self.markdown_path(slug), document)?;
        let sidecar = serde_json::to_string_pretty(meta)?;
        self.write_atomic(&self.meta_path(slug), &sidecar)?;
        Ok(markdown)
    }

    fn write_atomic(&self, target: &Path, content: &str) -> Result<PathBuf, PersistError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target.to_path_buf())
    }
}
