#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session opened; kicks off the one-time article load.
    SessionStarted,
    /// Engine delivered one article body.
    ArticleLoaded { identifier: String, content: String },
    /// Engine gave up on one article.
    ArticleFailed { identifier: String },
    /// Every fetch attempt has finished, successful or not.
    LoadSettled,
    /// User edited the input line.
    InputChanged(String),
    /// User pressed send.
    MessageSubmitted,
}
