use crate::{ChatMessage, LoadPhase};

/// Borrowed snapshot of a [`ChatState`](crate::ChatState) for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatViewModel<'a> {
    pub phase: LoadPhase,
    pub input: &'a str,
    pub messages: &'a [ChatMessage],
    pub documents_loaded: usize,
    pub failed_articles: &'a [String],
    pub dirty: bool,
}
