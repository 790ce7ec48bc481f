use crate::template::ResponseTemplate;

/// Article slugs loaded when no manifest overrides them.
pub const DEFAULT_ARTICLES: &[&str] = &[
    "how-to-add-a-youtube-video",
    "add-1-or-multiple-assets-to-many-playlists-at-the-same-time",
];

pub const DEFAULT_GREETING: &str =
    "Xin chào! Tôi là OptiBot mini (demo local). Hỏi tôi về OptiSigns nhé! Ví dụ: How do I add a YouTube video?";

/// Prefix of the citation URL used when an article carries no URL of its own.
pub const DEFAULT_PLACEHOLDER_URL_BASE: &str = "https://support.optisigns.com/hc/en-us/articles";

/// Content data the chat session runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub articles: Vec<String>,
    pub greeting: String,
    pub placeholder_url_base: String,
    pub template: ResponseTemplate,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            articles: DEFAULT_ARTICLES.iter().map(|s| s.to_string()).collect(),
            greeting: DEFAULT_GREETING.to_string(),
            placeholder_url_base: DEFAULT_PLACEHOLDER_URL_BASE.to_string(),
            template: ResponseTemplate::default(),
        }
    }
}
