use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::catalog::find_tool;
use crate::notification::Notification;
use crate::state::{ChannelState, CompletionSummary, UploadForm};
use crate::status::{Advance, FINALIZE_DELAY};
use crate::{
    AppState, ConnectionId, Effect, FileSource, Msg, Route, SelectedFile, SessionSnapshot,
    StatusProgress, SubmissionId, UploadRecord, DEFAULT_CONTENT_TYPE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::ToolSelected(id) => match find_tool(&id).and_then(|tool| tool.route()) {
            Some(route) => navigate(&mut state, route),
            None => {
                engine_debug!("Tool {:?} is not available", id);
                Vec::new()
            }
        },
        Msg::FileSelected { file, source } => {
            select_file(&mut state, file, source);
            Vec::new()
        }
        Msg::RemoveFileClicked => {
            if state.form.selected_file.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NameChanged(name) => {
            state.form.name = name;
            state.mark_dirty();
            Vec::new()
        }
        Msg::DescriptionChanged(description) => {
            state.form.description = description;
            state.mark_dirty();
            Vec::new()
        }
        Msg::TagsChanged(tags) => {
            state.form.tags = tags;
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SessionRestored(snapshot) => {
            state.session = snapshot;
            state.mark_dirty();
            Vec::new()
        }
        Msg::UploadTargetIssued {
            submission,
            upload_id,
        } => {
            if state.submission == Some(submission) {
                engine_info!(upload = upload_id; "Upload target issued");
                state.upload_id = Some(upload_id);
                open_channel_if_watching(&mut state)
            } else {
                engine_debug!(
                    upload = upload_id;
                    "Ignoring target for superseded submission {}",
                    submission
                );
                Vec::new()
            }
        }
        Msg::UploadFinished {
            submission,
            upload_id,
            duration,
        } => record_upload_duration(&mut state, submission, &upload_id, duration),
        Msg::UploadFailed { submission, reason } => {
            if state.submission == Some(submission) {
                engine_warn!("Background upload failed: {}", reason);
                state.notify(Notification::destructive("Upload failed", reason));
            } else {
                engine_debug!(
                    "Ignoring failure of superseded submission {}: {}",
                    submission,
                    reason
                );
            }
            Vec::new()
        }
        Msg::ChannelOpened {
            connection,
            upload_id,
        } => {
            let awaited = matches!(
                state.channel,
                ChannelState::Opening { connection: opening, .. } if opening == connection
            );
            if awaited {
                state.channel = ChannelState::Open {
                    connection,
                    upload_id,
                };
                if let Some(status) = state.status.as_mut() {
                    status.connection_restarted();
                }
            }
            Vec::new()
        }
        Msg::ChannelMessage {
            connection,
            upload_id,
            text,
            since_open,
        } => apply_channel_message(&mut state, connection, &upload_id, &text, since_open),
        Msg::ChannelClosed {
            connection,
            upload_id,
            reason,
        } => {
            if state.channel.connection() == Some(connection) {
                engine_info!(upload = upload_id; "Push channel closed ({:?})", reason);
                state.channel = ChannelState::Closed;
            } else {
                engine_debug!(upload = upload_id; "Connection {} already released", connection);
            }
            Vec::new()
        }
        Msg::FinalizeDelayElapsed { mount } => {
            let finished_here = state.route == Route::Processing
                && state
                    .status
                    .as_ref()
                    .is_some_and(|status| status.mount() == mount && status.is_finished());
            if finished_here {
                navigate(&mut state, Route::Complete)
            } else {
                engine_debug!("Ignoring finalize timer for mount {}", mount);
                Vec::new()
            }
        }
        Msg::CopyLinkClicked => match completion_link(&state) {
            Some(url) => vec![Effect::CopyToClipboard(url)],
            None => Vec::new(),
        },
        Msg::OpenLinkClicked => match completion_link(&state) {
            Some(url) if url::Url::parse(&url).is_ok() => vec![Effect::OpenExternal(url)],
            Some(url) => {
                engine_warn!("Refusing to open malformed content URL {:?}", url);
                Vec::new()
            }
            None => Vec::new(),
        },
        Msg::LinkCopied => {
            state.notify(Notification::info("Copied!", "Content link copied to clipboard"));
            Vec::new()
        }
        Msg::ActionFailed { title, description } => {
            state.notify(Notification::destructive(title, description));
            Vec::new()
        }
        Msg::DismissNotifications => {
            if !state.notifications.is_empty() {
                state.notifications.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick => {
            state.age_notifications();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Runs unmount hooks for the current screen, switches route, then runs mount
/// hooks for the new one. Navigating to the current route does nothing.
fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    if state.route == route {
        return Vec::new();
    }
    let mut effects = Vec::new();

    if state.route == Route::Processing {
        state.status = None;
        if !state.channel.is_closed() {
            state.channel = ChannelState::Closed;
            effects.push(Effect::CloseChannel);
        }
    }

    engine_debug!("Navigate {} -> {}", state.route, route);
    state.route = route.clone();
    state.mark_dirty();

    match route {
        Route::Articulate => state.form = UploadForm::default(),
        Route::Processing => {
            if state.session.upload_data.is_none() {
                engine_info!("No upload record in session; redirecting to /articulate");
                effects.extend(navigate(state, Route::Articulate));
                return effects;
            }
            state.mounts += 1;
            state.status = Some(StatusProgress::new(state.mounts));
            effects.extend(open_channel_if_watching(state));
        }
        Route::Complete => {
            let durations = state.session.time_durations.take();
            if durations.is_some() {
                effects.push(Effect::PersistSession(state.session.clone()));
            }
            state.completion = CompletionSummary {
                record: state.session.upload_data.clone(),
                durations: durations.unwrap_or_default(),
                content_url: state.session.upload_url.clone(),
            };
        }
        Route::Dashboard | Route::Tools | Route::NotFound(_) => {}
    }
    effects
}

fn open_channel_if_watching(state: &mut AppState) -> Vec<Effect> {
    if state.route != Route::Processing || state.status.is_none() || !state.channel.is_closed() {
        return Vec::new();
    }
    match state.upload_id.clone() {
        Some(upload_id) => {
            state.connections += 1;
            let connection = state.connections;
            state.channel = ChannelState::Opening {
                connection,
                upload_id: upload_id.clone(),
            };
            vec![Effect::OpenChannel {
                connection,
                upload_id,
            }]
        }
        None => Vec::new(),
    }
}

fn select_file(state: &mut AppState, file: SelectedFile, source: FileSource) {
    if !file.name.ends_with(".zip") {
        engine_debug!("Rejected {:?} from {:?}: not a .zip", file.name, source);
        state.notify(Notification::destructive(
            "Invalid file type",
            "Please select a .zip file",
        ));
        return;
    }
    if state.form.name.is_empty() {
        state.form.name = file
            .name
            .strip_suffix(".zip")
            .unwrap_or(&file.name)
            .to_string();
    }
    state.form.selected_file = Some(file);
    state.mark_dirty();
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.route != Route::Articulate {
        return Vec::new();
    }
    let Some(file) = state.form.selected_file.clone() else {
        state.notify(Notification::destructive(
            "No file selected",
            "Please select a .zip file to upload",
        ));
        return Vec::new();
    };
    let name = state.form.name.trim();
    if name.is_empty() {
        state.notify(Notification::destructive(
            "Name required",
            "Please provide a name for your content",
        ));
        return Vec::new();
    }

    let record = UploadRecord {
        file: file.name.clone(),
        size: file.size,
        name: name.to_string(),
        description: state.form.description.clone(),
        tags: state.form.tags.clone(),
        s3_upload_duration: None,
    };
    state.session = SessionSnapshot::for_record(record);
    state.submissions += 1;
    let submission = state.submissions;
    state.submission = Some(submission);
    state.upload_id = None;

    let content_type = file
        .content_type
        .clone()
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let mut effects = vec![Effect::PersistSession(state.session.clone())];
    effects.extend(navigate(state, Route::Processing));
    effects.push(Effect::BeginUpload {
        submission,
        file,
        content_type,
    });
    effects
}

fn record_upload_duration(
    state: &mut AppState,
    submission: SubmissionId,
    upload_id: &str,
    duration: std::time::Duration,
) -> Vec<Effect> {
    if state.submission != Some(submission) || state.upload_id.as_deref() != Some(upload_id) {
        engine_debug!(upload = upload_id; "Ignoring duration for a superseded upload");
        return Vec::new();
    }
    let Some(record) = state.session.upload_data.as_mut() else {
        return Vec::new();
    };
    let seconds = format!("{:.2}", duration.as_secs_f64());
    engine_info!(upload = upload_id; "Direct upload took {}s", seconds);
    record.s3_upload_duration = Some(seconds);
    state.mark_dirty();
    vec![Effect::PersistSession(state.session.clone())]
}

fn apply_channel_message(
    state: &mut AppState,
    connection: ConnectionId,
    upload_id: &str,
    text: &str,
    since_open: std::time::Duration,
) -> Vec<Effect> {
    if state.channel.connection() != Some(connection) {
        engine_debug!(upload = upload_id; "Dropping message from a closed channel");
        return Vec::new();
    }
    let Some(status) = state.status.as_mut() else {
        return Vec::new();
    };

    match status.apply_message(text, since_open) {
        Advance::Unmatched => {
            engine_debug!(upload = upload_id; "Unrecognized push message: {}", text);
            Vec::new()
        }
        Advance::Stale { step, reached } => {
            engine_debug!(
                upload = upload_id;
                "Ignoring message for step {} (already at {})",
                step,
                reached
            );
            Vec::new()
        }
        Advance::Advanced { step } => {
            engine_info!(upload = upload_id; "Reached step {}", step);
            state.mark_dirty();
            Vec::new()
        }
        Advance::Finished => {
            engine_info!(upload = upload_id; "Processing finished");
            let mount = status.mount();
            state.session.time_durations = Some(status.durations().to_vec());
            state.session.upload_url = status.content_url().map(ToOwned::to_owned);
            state.mark_dirty();
            vec![
                Effect::PersistSession(state.session.clone()),
                Effect::ScheduleFinalize {
                    mount,
                    delay: FINALIZE_DELAY,
                },
            ]
        }
    }
}

fn completion_link(state: &AppState) -> Option<String> {
    if state.route != Route::Complete {
        return None;
    }
    state.completion.content_url.clone()
}
