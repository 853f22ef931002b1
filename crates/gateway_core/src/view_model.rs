use crate::format::{format_file_size, format_processing_time, format_step_duration};
use crate::notification::Notification;
use crate::{AppState, Route, StatusProgress, UploadRecord, STEPS, TOOLS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub route: Route,
    pub screen: ScreenView,
    pub notifications: Vec<Notification>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    Dashboard {
        latest_upload: Option<RecordSummaryView>,
    },
    Tools(Vec<ToolView>),
    Upload(UploadFormView),
    /// `None` renders nothing: there is no upload to watch.
    Processing(Option<StatusView>),
    Complete(CompletionView),
    NotFound {
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummaryView {
    pub name: String,
    pub file: String,
    pub size_label: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub upload_duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFormView {
    pub file: Option<FileView>,
    pub name: String,
    pub description: String,
    pub tags: String,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRowView {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub record: RecordSummaryView,
    pub current_step: u8,
    pub percent: u8,
    pub headline: &'static str,
    pub estimate: &'static str,
    pub steps: Vec<StepRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStepView {
    pub name: &'static str,
    pub description: &'static str,
    pub duration_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionView {
    pub summary: Option<RecordSummaryView>,
    pub processing_time: String,
    pub steps: Vec<CompletedStepView>,
    pub content_url: Option<String>,
}

pub(crate) fn build(state: &AppState, dirty: bool) -> AppViewModel {
    let screen = match &state.route {
        Route::Dashboard => ScreenView::Dashboard {
            latest_upload: state.session.upload_data.as_ref().map(record_summary),
        },
        Route::Tools => ScreenView::Tools(
            TOOLS
                .iter()
                .map(|tool| ToolView {
                    id: tool.id,
                    name: tool.name,
                    description: tool.description,
                    available: tool.available,
                })
                .collect(),
        ),
        Route::Articulate => ScreenView::Upload(UploadFormView {
            file: state.form.selected_file.as_ref().map(|file| FileView {
                name: file.name.clone(),
                size_label: format_file_size(file.size),
            }),
            name: state.form.name.clone(),
            description: state.form.description.clone(),
            tags: state.form.tags.clone(),
            can_submit: state.form.can_submit(),
        }),
        Route::Processing => ScreenView::Processing(
            state
                .status
                .as_ref()
                .zip(state.session.upload_data.as_ref())
                .map(|(status, record)| status_view(status, record)),
        ),
        Route::Complete => ScreenView::Complete(completion_view(state)),
        Route::NotFound(path) => ScreenView::NotFound { path: path.clone() },
    };

    AppViewModel {
        route: state.route.clone(),
        screen,
        notifications: state.notifications.clone(),
        dirty,
    }
}

fn record_summary(record: &UploadRecord) -> RecordSummaryView {
    RecordSummaryView {
        name: record.name.clone(),
        file: record.file.clone(),
        size_label: format_file_size(record.size),
        description: Some(record.description.trim())
            .filter(|d| !d.is_empty())
            .map(ToOwned::to_owned),
        tags: record.tag_list(),
        upload_duration: record.s3_upload_duration.clone(),
    }
}

fn status_view(status: &StatusProgress, record: &UploadRecord) -> StatusView {
    let current = status.current_step();
    let finished = status.is_finished();
    let steps = STEPS
        .iter()
        .map(|step| {
            let step_status = if step.id <= status.reached() {
                StepStatus::Complete
            } else if step.id == current {
                StepStatus::Active
            } else {
                StepStatus::Pending
            };
            StepRowView {
                id: step.id,
                name: step.display_name,
                description: step.display_description,
                status: step_status,
            }
        })
        .collect();

    StatusView {
        record: record_summary(record),
        current_step: current,
        percent: status.percent(),
        headline: if finished {
            "Processing complete!"
        } else {
            "Your content is being processed..."
        },
        estimate: if finished { "Complete" } else { "2-3 minutes" },
        steps,
    }
}

fn completion_view(state: &AppState) -> CompletionView {
    let completion = &state.completion;
    let processing_time = if completion.durations.is_empty() {
        "Not recorded".to_string()
    } else {
        format_processing_time(completion.durations.iter().sum())
    };
    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(index, step)| CompletedStepView {
            name: step.display_name,
            description: step.display_description,
            duration_label: completion
                .durations
                .get(index)
                .map(|secs| format_step_duration(*secs)),
        })
        .collect();

    CompletionView {
        summary: completion.record.as_ref().map(record_summary),
        processing_time,
        steps,
        content_url: completion.content_url.clone(),
    }
}
