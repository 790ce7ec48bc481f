use optibot_logging::bot_debug;

use crate::document::{Document, KnowledgeBase};
use crate::settings::ChatSettings;
use crate::transcript::{Author, ChatMessage, Transcript};
use crate::view_model::ChatViewModel;

/// Where the one-time article load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    NotStarted,
    Loading,
    /// Every fetch attempt has settled; the knowledge base is sealed.
    Ready,
}

/// Everything one chat session owns. Starts empty and is dropped with the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatState {
    settings: ChatSettings,
    knowledge: KnowledgeBase,
    transcript: Transcript,
    input: String,
    phase: LoadPhase,
    failed_articles: Vec<String>,
    dirty: bool,
}

impl ChatState {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> ChatViewModel<'_> {
        ChatViewModel {
            phase: self.phase,
            input: &self.input,
            messages: self.transcript.messages(),
            documents_loaded: self.knowledge.len(),
            failed_articles: &self.failed_articles,
            dirty: self.dirty,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Append a message to the transcript.
    pub fn add_message(&mut self, text: impl Into<String>, author: Author) {
        let message = match author {
            Author::User => ChatMessage::user(text),
            Author::Bot => ChatMessage::bot(text),
        };
        self.transcript.push(message);
        self.dirty = true;
    }

    /// Search the loaded articles and compose the bot's reply.
    pub fn answer(&self, query: &str) -> String {
        let hits = self
            .knowledge
            .search(query, &self.settings.placeholder_url_base);
        bot_debug!(
            "Query matched {} of {} articles",
            hits.len(),
            self.knowledge.len()
        );
        self.settings.template.format(&hits, query)
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    /// Trimmed input, or `None` when it is blank. Clears the input on success.
    pub(crate) fn take_query(&mut self) -> Option<String> {
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.input.clear();
        self.dirty = true;
        Some(query)
    }

    /// Moves `NotStarted` to `Loading` and returns the identifiers to fetch.
    pub(crate) fn begin_loading(&mut self) -> Option<Vec<String>> {
        if self.phase != LoadPhase::NotStarted {
            return None;
        }
        self.phase = LoadPhase::Loading;
        self.dirty = true;
        Some(self.settings.articles.clone())
    }

    pub(crate) fn accept_article(&mut self, identifier: String, content: String) -> bool {
        if self.phase != LoadPhase::Loading {
            return false;
        }
        self.knowledge.push(Document {
            identifier,
            content,
        });
        self.dirty = true;
        true
    }

    pub(crate) fn record_failure(&mut self, identifier: String) {
        if self.phase == LoadPhase::Loading {
            self.failed_articles.push(identifier);
            self.dirty = true;
        }
    }

    pub(crate) fn settle_load(&mut self) -> bool {
        if self.phase != LoadPhase::Loading {
            return false;
        }
        self.phase = LoadPhase::Ready;
        self.dirty = true;
        true
    }
}
