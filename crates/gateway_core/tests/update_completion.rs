use gateway_core::{
    update, AppState, CompletionView, Effect, Msg, Route, ScreenView, SessionSnapshot,
    UploadRecord, TOOLS,
};
use pretty_assertions::assert_eq;

fn record() -> UploadRecord {
    UploadRecord {
        file: "course.zip".to_string(),
        size: 1536,
        name: "Course".to_string(),
        description: "Onboarding module".to_string(),
        tags: "training, , assessment ,beginner".to_string(),
        s3_upload_duration: Some("2.50".to_string()),
    }
}

fn restored(snapshot: SessionSnapshot) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SessionRestored(snapshot));
    state
}

fn completion(state: &AppState) -> CompletionView {
    match state.view().screen {
        ScreenView::Complete(view) => view,
        other => panic!("expected completion screen, got {other:?}"),
    }
}

#[test]
fn summary_totals_recorded_durations() {
    engine_logging::initialize_for_tests();
    let snapshot = SessionSnapshot {
        upload_data: Some(record()),
        time_durations: Some(vec![30.5, 45.2]),
        upload_url: Some("https://cdn.example.com/c/1".to_string()),
    };
    let (state, effects) = update(restored(snapshot), Msg::Navigate(Route::Complete));
    let view = completion(&state);

    assert_eq!(view.processing_time, "1 minutes 16 seconds");
    let summary = view.summary.unwrap();
    assert_eq!(summary.size_label, "1.5 KB");
    assert_eq!(summary.tags, vec!["training", "assessment", "beginner"]);
    assert_eq!(summary.description.as_deref(), Some("Onboarding module"));
    let labels: Vec<_> = view.steps.iter().map(|s| s.duration_label.clone()).collect();
    assert_eq!(
        labels,
        vec![
            Some("30.5 seconds".to_string()),
            Some("45.2 seconds".to_string()),
            None,
            None
        ]
    );

    // Durations are consumed once and the cleared snapshot is persisted.
    assert!(state.session().time_durations.is_none());
    assert_eq!(effects, vec![Effect::PersistSession(state.session().clone())]);
}

#[test]
fn durations_are_consumed_once() {
    engine_logging::initialize_for_tests();
    let snapshot = SessionSnapshot {
        upload_data: Some(record()),
        time_durations: Some(vec![10.0]),
        upload_url: None,
    };
    let (state, _) = update(restored(snapshot), Msg::Navigate(Route::Complete));
    let (state, _) = update(state, Msg::Navigate(Route::Dashboard));
    let (state, effects) = update(state, Msg::Navigate(Route::Complete));

    assert!(effects.is_empty());
    assert_eq!(completion(&state).processing_time, "Not recorded");
}

#[test]
fn missing_record_renders_empty_summary() {
    engine_logging::initialize_for_tests();
    let (state, effects) = update(AppState::new(), Msg::Navigate(Route::Complete));
    let view = completion(&state);

    assert!(effects.is_empty());
    assert!(view.summary.is_none());
    assert!(view.content_url.is_none());
    assert_eq!(view.steps.len(), 4);
}

#[test]
fn copy_link_places_exact_url_and_acknowledges() {
    engine_logging::initialize_for_tests();
    let url = "https://cdn.example.com/content/abc?x=1";
    let snapshot = SessionSnapshot {
        upload_data: Some(record()),
        time_durations: None,
        upload_url: Some(url.to_string()),
    };
    let (state, _) = update(restored(snapshot), Msg::Navigate(Route::Complete));

    let (state, effects) = update(state, Msg::CopyLinkClicked);
    assert_eq!(effects, vec![Effect::CopyToClipboard(url.to_string())]);

    let (state, _) = update(state, Msg::LinkCopied);
    let notifications = state.view().notifications;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Copied!");

    let (_state, effects) = update(state, Msg::OpenLinkClicked);
    assert_eq!(effects, vec![Effect::OpenExternal(url.to_string())]);
}

#[test]
fn link_actions_are_noops_without_url() {
    engine_logging::initialize_for_tests();
    let (state, _) = update(
        restored(SessionSnapshot::for_record(record())),
        Msg::Navigate(Route::Complete),
    );
    let (state, effects) = update(state, Msg::CopyLinkClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::OpenLinkClicked);
    assert!(effects.is_empty());
    assert!(state.view().notifications.is_empty());
}

#[test]
fn link_actions_only_work_on_completion_screen() {
    engine_logging::initialize_for_tests();
    let snapshot = SessionSnapshot {
        upload_data: Some(record()),
        time_durations: None,
        upload_url: Some("https://cdn.example.com/x".to_string()),
    };
    let (state, effects) = update(restored(snapshot), Msg::CopyLinkClicked);
    assert!(effects.is_empty());
    assert_eq!(state.route(), &Route::Dashboard);
}

#[test]
fn notifications_expire_after_their_tick_budget() {
    engine_logging::initialize_for_tests();
    let (mut state, _) = update(AppState::new(), Msg::Navigate(Route::Complete));
    let (next, _) = update(state, Msg::LinkCopied);
    state = next;
    for _ in 0..gateway_core::NOTIFICATION_TICKS - 1 {
        let (next, _) = update(state, Msg::Tick);
        state = next;
    }
    assert_eq!(state.view().notifications.len(), 1);
    let (state, _) = update(state, Msg::Tick);
    assert!(state.view().notifications.is_empty());
}

#[test]
fn only_available_tools_navigate() {
    engine_logging::initialize_for_tests();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Tools));
    match state.view().screen {
        ScreenView::Tools(tools) => {
            assert_eq!(tools.len(), TOOLS.len());
            assert_eq!(tools.iter().filter(|t| t.available).count(), 1);
        }
        other => panic!("expected tool catalog, got {other:?}"),
    }

    let (state, effects) = update(state, Msg::ToolSelected("quizlet".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.route(), &Route::Tools);

    let (state, _) = update(state, Msg::ToolSelected("articulate".to_string()));
    assert_eq!(state.route(), &Route::Articulate);
}

#[test]
fn unknown_paths_render_not_found() {
    engine_logging::initialize_for_tests();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::parse("/settings")));
    assert_eq!(
        state.view().screen,
        ScreenView::NotFound {
            path: "/settings".to_string()
        }
    );
}

#[test]
fn dashboard_shows_latest_upload() {
    engine_logging::initialize_for_tests();
    let state = restored(SessionSnapshot::for_record(record()));
    match state.view().screen {
        ScreenView::Dashboard { latest_upload } => {
            let latest = latest_upload.unwrap();
            assert_eq!(latest.name, "Course");
            assert_eq!(latest.upload_duration.as_deref(), Some("2.50"));
        }
        other => panic!("expected dashboard, got {other:?}"),
    }
}
