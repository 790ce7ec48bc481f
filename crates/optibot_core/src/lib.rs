//! OptiBot core: knowledge base, search, response formatting and the pure chat
//! state machine.
mod document;
mod effect;
mod msg;
mod search;
mod settings;
mod state;
mod template;
mod transcript;
mod update;
mod view_model;

pub use document::{Document, KnowledgeBase};
pub use effect::Effect;
pub use msg::Msg;
pub use search::{SearchHit, MAX_CITATIONS, SNIPPET_CHARS, SNIPPET_SUFFIX};
pub use settings::{ChatSettings, DEFAULT_ARTICLES, DEFAULT_GREETING, DEFAULT_PLACEHOLDER_URL_BASE};
pub use state::{ChatState, LoadPhase};
pub use template::ResponseTemplate;
pub use transcript::{Author, ChatMessage, Transcript};
pub use update::update;
pub use view_model::ChatViewModel;
