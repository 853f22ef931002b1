//! Gateway core: pure state machine and view-model helpers.
mod catalog;
mod effect;
mod format;
mod msg;
mod notification;
mod route;
mod session;
mod state;
mod status;
mod steps;
mod update;
mod view_model;

pub use catalog::{find_tool, ToolEntry, TOOLS};
pub use effect::Effect;
pub use format::{format_file_size, format_processing_time, format_step_duration};
pub use msg::{FileSource, Msg, SelectedFile};
pub use notification::{Notification, NotificationVariant, NOTIFICATION_TICKS};
pub use route::Route;
pub use session::{SessionSnapshot, UploadRecord, DEFAULT_CONTENT_TYPE};
pub use state::{AppState, ChannelState, ConnectionId, SubmissionId, UploadId};
pub use status::{extract_content_url, Advance, StatusProgress, FINALIZE_DELAY};
pub use steps::{match_step, StepDefinition, STEPS, TOTAL_STEPS};
pub use update::update;
pub use view_model::{
    AppViewModel, CompletedStepView, CompletionView, FileView, RecordSummaryView, ScreenView,
    StatusView, StepRowView, StepStatus, ToolView, UploadFormView,
};
