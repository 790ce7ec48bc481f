use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, KnowledgeBase};

/// Upper bound on hits (and therefore citations) per query.
pub const MAX_CITATIONS: usize = 3;
/// Number of leading content characters kept in a hit snippet.
pub const SNIPPET_CHARS: usize = 300;
pub const SNIPPET_SUFFIX: &str = "...";

// The label may be closed by a Markdown bold marker, as scraped articles write
// `**Article URL:** https://...`.
static ARTICLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Article URL:(?:\*\*)?\s*(https?://[^\r\n]+)").expect("valid article url regex")
});

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid heading regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl KnowledgeBase {
    /// Case-insensitive substring scan in collection order.
    ///
    /// Stops after [`MAX_CITATIONS`] matches; documents past that point are not
    /// looked at. A blank query matches nothing.
    pub fn search(&self, query: &str, placeholder_url_base: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::with_capacity(MAX_CITATIONS);
        for document in self.documents() {
            if !document.content.to_lowercase().contains(&needle) {
                continue;
            }
            hits.push(SearchHit::from_document(document, placeholder_url_base));
            if hits.len() >= MAX_CITATIONS {
                break;
            }
        }
        hits
    }
}

impl SearchHit {
    pub fn from_document(document: &Document, placeholder_url_base: &str) -> Self {
        let url = extract_article_url(&document.content)
            .unwrap_or_else(|| placeholder_url(placeholder_url_base, &document.identifier));
        let title = extract_heading(&document.content)
            .unwrap_or_else(|| document.identifier.replace('-', " "));

        Self {
            title,
            url,
            snippet: snippet(&document.content),
        }
    }
}

fn extract_article_url(content: &str) -> Option<String> {
    ARTICLE_URL
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn extract_heading(content: &str) -> Option<String> {
    HEADING
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

fn placeholder_url(base: &str, identifier: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), identifier)
}

fn snippet(content: &str) -> String {
    let mut snippet: String = content.chars().take(SNIPPET_CHARS).collect();
    snippet.push_str(SNIPPET_SUFFIX);
    snippet
}

#[cfg(test)]
mod tests {
    use super::{extract_article_url, extract_heading, snippet, SNIPPET_CHARS};

    #[test]
    fn article_url_label_is_case_insensitive() {
        let content = "intro\narticle url:   https://example.com/a  \nrest";
        assert_eq!(
            extract_article_url(content).as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn article_url_accepts_bold_label() {
        let content = "# T\n\n**Article URL:** https://support.example.com/hc/1\n\nBody";
        assert_eq!(
            extract_article_url(content).as_deref(),
            Some("https://support.example.com/hc/1")
        );
    }

    #[test]
    fn article_url_requires_http_scheme() {
        assert_eq!(extract_article_url("Article URL: ftp://example.com/x"), None);
    }

    #[test]
    fn heading_must_start_a_line() {
        assert_eq!(extract_heading("text # not a heading\n## Sub\n"), None);
        assert_eq!(
            extract_heading("intro\n# Real Heading\r\nmore").as_deref(),
            Some("Real Heading")
        );
    }

    #[test]
    fn snippet_counts_characters_not_bytes() {
        let content = "é".repeat(SNIPPET_CHARS + 10);
        let snip = snippet(&content);
        assert_eq!(snip.chars().count(), SNIPPET_CHARS + 3);
        assert!(snip.ends_with("..."));
    }

    #[test]
    fn short_content_still_gets_ellipsis() {
        assert_eq!(snippet("tiny"), "tiny...");
    }
}
