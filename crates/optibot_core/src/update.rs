use optibot_logging::bot_info;

use crate::{Author, ChatState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ChatState, msg: Msg) -> (ChatState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => match state.begin_loading() {
            Some(identifiers) => vec![Effect::LoadArticles { identifiers }],
            None => Vec::new(),
        },
        Msg::ArticleLoaded {
            identifier,
            content,
        } => {
            // Arrivals after the load settled are dropped; the collection is sealed.
            state.accept_article(identifier, content);
            Vec::new()
        }
        Msg::ArticleFailed { identifier } => {
            state.record_failure(identifier);
            Vec::new()
        }
        Msg::LoadSettled => {
            if state.settle_load() {
                bot_info!(
                    "Knowledge base ready: {} articles",
                    state.knowledge().len()
                );
                let greeting = state.settings().greeting.clone();
                state.add_message(greeting, Author::Bot);
            }
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::MessageSubmitted => {
            if let Some(query) = state.take_query() {
                let reply = state.answer(&query);
                state.add_message(query, Author::User);
                state.add_message(reply, Author::Bot);
            }
            Vec::new()
        }
    };

    (state, effects)
}
