use optibot_core::{
    update, Author, ChatMessage, ChatSettings, ChatState, Effect, LoadPhase, Msg,
    ResponseTemplate,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    optibot_logging::initialize_for_tests();
}

const YOUTUBE_DOC: &str =
    "# How to add a YouTube video\n\nArticle URL: https://example.com/youtube\n\nFAQ: how do I add a YouTube video? Paste the YouTube link.";
const PLAYLIST_DOC: &str = "# Playlists\n\nArticle URL: https://example.com/playlists\n\nAssign assets.";

fn settings() -> ChatSettings {
    ChatSettings {
        articles: vec!["youtube".to_string(), "playlists".to_string()],
        ..ChatSettings::default()
    }
}

fn ready_state() -> ChatState {
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    let (state, _) = update(
        state,
        Msg::ArticleLoaded {
            identifier: "youtube".to_string(),
            content: YOUTUBE_DOC.to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::ArticleLoaded {
            identifier: "playlists".to_string(),
            content: PLAYLIST_DOC.to_string(),
        },
    );
    let (mut state, _) = update(state, Msg::LoadSettled);
    assert!(state.consume_dirty());
    state
}

fn send(state: ChatState, text: &str) -> (ChatState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(text.to_string()));
    update(state, Msg::MessageSubmitted)
}

#[test]
fn youtube_question_gets_steps_and_one_citation() {
    init_logging();
    let state = ready_state();
    let before = state.transcript().len();

    let (state, effects) = send(state, "How do I add a YouTube video?");
    assert!(effects.is_empty());

    let new_messages = state.transcript().since(before);
    assert_eq!(new_messages.len(), 2);
    assert_eq!(
        new_messages[0],
        ChatMessage::user("How do I add a YouTube video?")
    );

    let reply = &new_messages[1];
    assert_eq!(reply.author, Author::Bot);
    let template = ResponseTemplate::default();
    assert!(reply.text.contains(&template.steps_block()));
    assert_eq!(reply.text.matches("**Article URL:**").count(), 1);
    assert!(reply
        .text
        .contains("- **Article 1:** How to add a YouTube video"));
    assert!(reply.text.contains("https://example.com/youtube"));
    assert!(!reply.text.contains("https://example.com/playlists"));
}

#[test]
fn submit_clears_input() {
    init_logging();
    let (state, _) = send(ready_state(), "playlists");
    assert_eq!(state.input(), "");
    assert_eq!(state.view().input, "");
}

#[test]
fn user_text_is_trimmed_before_posting() {
    init_logging();
    let state = ready_state();
    let before = state.transcript().len();
    let (state, _) = send(state, "   assign assets  ");
    assert_eq!(
        state.transcript().since(before)[0],
        ChatMessage::user("assign assets")
    );
}

#[test]
fn whitespace_input_is_a_noop() {
    init_logging();
    let state = ready_state();
    let before = state.transcript().len();

    let (mut state, effects) = send(state, "   \t ");
    assert!(effects.is_empty());
    assert_eq!(state.transcript().len(), before);
    assert_eq!(state.input(), "   \t ");

    // Only the input edit marked the state dirty.
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::MessageSubmitted);
    assert!(!state.consume_dirty());
}

#[test]
fn unknown_topic_gets_apology() {
    init_logging();
    let state = ready_state();
    let (state, _) = send(state, "weather forecast");

    let last = state.transcript().messages().last().cloned();
    assert_eq!(
        last,
        Some(ChatMessage::bot(ResponseTemplate::default().apology))
    );
}

#[test]
fn query_before_load_settles_searches_partial_collection() {
    init_logging();
    let (state, _) = update(ChatState::new(settings()), Msg::SessionStarted);
    let (state, _) = update(
        state,
        Msg::ArticleLoaded {
            identifier: "playlists".to_string(),
            content: PLAYLIST_DOC.to_string(),
        },
    );
    assert_eq!(state.phase(), LoadPhase::Loading);

    let (state, _) = send(state, "assets");
    let reply = &state.transcript().messages()[1];
    assert!(reply.text.contains("https://example.com/playlists"));
}

#[test]
fn add_message_appends_and_marks_dirty() {
    let mut state = ChatState::default();
    assert!(!state.consume_dirty());

    state.add_message("hello", Author::User);
    state.add_message("hi there", Author::Bot);

    assert!(state.consume_dirty());
    assert_eq!(
        state.view().messages,
        vec![ChatMessage::user("hello"), ChatMessage::bot("hi there")]
    );
}

#[test]
fn view_borrows_the_transcript() {
    let mut state = ChatState::default();
    state.add_message("hello", Author::User);

    let view = state.view();
    assert!(std::ptr::eq(
        view.messages.as_ptr(),
        state.transcript().messages().as_ptr()
    ));
    assert_eq!(view.messages.len(), 1);
}
