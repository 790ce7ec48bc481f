use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::help_center::HelpCenterArticle;

pub const UNTITLED: &str = "Untitled";

/// Sidecar written next to every ingested article as `{slug}.meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub html_url: String,
    pub api_url: String,
    pub updated_at: String,
    /// SHA-256 of the Markdown document, lowercase hex.
    pub content_hash: String,
    pub last_scraped: String,
}

/// Single-line title, or [`UNTITLED`].
pub fn article_title(article: &HelpCenterArticle) -> String {
    let title = article
        .title
        .as_deref()
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Front matter, the `# title` heading and the `**Article URL:**` line, then the body.
///
/// The heading and URL line are what the chat search reads back.
pub fn build_article_document(
    article: &HelpCenterArticle,
    title: &str,
    body_markdown: &str,
) -> String {
    format!(
        "---\ntitle: {title}\narticle_id: {id}\nurl: {url}\nupdated_at: {updated_at}\n---\n\n# {title}\n\n**Article URL:** {url}\n\n{body}\n",
        title = title,
        id = article.id,
        url = article.html_url,
        updated_at = article.updated_at,
        body = body_markdown,
    )
}

pub fn content_hash(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
