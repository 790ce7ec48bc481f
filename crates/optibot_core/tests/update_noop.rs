use optibot_core::{update, ChatState, Msg};

#[test]
fn load_events_before_session_start_leave_state_untouched() {
    let state = ChatState::default();

    let (next, effects) = update(state.clone(), Msg::LoadSettled);
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(
        next,
        Msg::ArticleFailed {
            identifier: "alpha".to_string(),
        },
    );
    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn blank_submit_leaves_state_untouched() {
    let (state, _) = update(ChatState::default(), Msg::InputChanged("   ".to_string()));
    let (mut state, _) = update(state, Msg::MessageSubmitted);
    let _ = state.consume_dirty();

    let (mut next, effects) = update(state.clone(), Msg::MessageSubmitted);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(state, next);
}
