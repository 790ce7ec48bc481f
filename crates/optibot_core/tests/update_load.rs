use std::sync::Once;

use optibot_core::{
    update, Author, ChatMessage, ChatSettings, ChatState, Effect, LoadPhase, Msg,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(optibot_logging::initialize_for_tests);
}

fn settings() -> ChatSettings {
    ChatSettings {
        articles: vec!["alpha".to_string(), "beta".to_string()],
        greeting: "Hello!".to_string(),
        ..ChatSettings::default()
    }
}

fn loaded(identifier: &str, content: &str) -> Msg {
    Msg::ArticleLoaded {
        identifier: identifier.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn session_start_requests_configured_articles_once() {
    init_logging();
    let (state, effects) = update(ChatState::new(settings()), Msg::SessionStarted);
    assert_eq!(state.phase(), LoadPhase::Loading);
    assert_eq!(
        effects,
        vec![Effect::LoadArticles {
            identifiers: vec!["alpha".to_string(), "beta".to_string()],
        }]
    );

    let (state, effects) = update(state, Msg::SessionStarted);
    assert_eq!(state.phase(), LoadPhase::Loading);
    assert!(effects.is_empty());
}

#[test]
fn articles_are_kept_in_arrival_order() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    let (state, _) = update(state, loaded("beta", "b"));
    let (state, _) = update(state, loaded("alpha", "a"));

    let ids: Vec<_> = state.knowledge().identifiers().collect();
    assert_eq!(ids, vec!["beta", "alpha"]);
}

#[test]
fn greeting_is_posted_once_when_load_settles() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    assert!(state.transcript().is_empty());

    let (state, _) = update(state, Msg::LoadSettled);
    assert_eq!(state.phase(), LoadPhase::Ready);
    assert_eq!(state.transcript().messages(), &[ChatMessage::bot("Hello!")]);

    let (state, _) = update(state, Msg::LoadSettled);
    assert_eq!(state.transcript().len(), 1);
}

#[test]
fn one_failed_fetch_leaves_the_other_searchable() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    let (state, _) = update(
        state,
        Msg::ArticleFailed {
            identifier: "alpha".to_string(),
        },
    );
    let (state, _) = update(state, loaded("beta", "# Beta\nschedule content"));
    let (state, _) = update(state, Msg::LoadSettled);

    let view = state.view();
    assert_eq!(view.documents_loaded, 1);
    assert_eq!(view.failed_articles, vec!["alpha".to_string()]);
    assert_eq!(view.messages[0], ChatMessage::bot("Hello!"));

    let (state, _) = update(state, Msg::InputChanged("schedule".to_string()));
    let (state, _) = update(state, Msg::MessageSubmitted);
    let reply = state.transcript().messages().last().unwrap();
    assert_eq!(reply.author, Author::Bot);
    assert!(reply.text.contains("- **Article 1:** Beta"));
}

#[test]
fn late_articles_are_ignored_after_settle() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    let (state, _) = update(state, Msg::LoadSettled);
    let (mut state, _) = update(state, loaded("alpha", "late"));

    assert!(state.knowledge().is_empty());
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, loaded("beta", "later"));
    assert!(!state.consume_dirty());
}

#[test]
fn articles_before_session_start_are_ignored() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), loaded("alpha", "early"));
    assert!(state.knowledge().is_empty());
    assert_eq!(state.phase(), LoadPhase::NotStarted);
}

#[test]
fn empty_manifest_still_greets() {
    init_logging();
    let empty = ChatSettings {
        articles: Vec::new(),
        ..settings()
    };
    let (state, effects) = update(ChatState::new(empty), Msg::SessionStarted);
    assert_eq!(
        effects,
        vec![Effect::LoadArticles {
            identifiers: Vec::new()
        }]
    );
    let (state, _) = update(state, Msg::LoadSettled);
    assert_eq!(state.transcript().len(), 1);
}
