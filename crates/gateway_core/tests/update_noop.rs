use gateway_core::{update, AppState, Msg};

#[test]
fn noop_and_idle_tick_leave_state_untouched() {
    for msg in [Msg::NoOp, Msg::Tick, Msg::DismissNotifications] {
        let state = AppState::new();
        let (mut next, effects) = update(state.clone(), msg);

        assert_eq!(state, next);
        assert!(effects.is_empty());
        assert!(!next.consume_dirty());
    }
}
