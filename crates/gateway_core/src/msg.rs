use std::path::PathBuf;
use std::time::Duration;

use crate::{ConnectionId, Route, SessionSnapshot, SubmissionId, UploadId};

/// A file the user picked or dropped onto the upload screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Picker,
    Drop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User followed a link or typed a path.
    Navigate(Route),
    /// User picked an entry in the tool catalog.
    ToolSelected(String),
    /// User chose a file via the picker or by dropping it.
    FileSelected { file: SelectedFile, source: FileSource },
    RemoveFileClicked,
    NameChanged(String),
    DescriptionChanged(String),
    TagsChanged(String),
    SubmitClicked,
    /// Session store contents loaded at startup.
    SessionRestored(SessionSnapshot),
    /// Backend issued a one-time upload target.
    UploadTargetIssued {
        submission: SubmissionId,
        upload_id: UploadId,
    },
    /// Direct object-storage PUT succeeded.
    UploadFinished {
        submission: SubmissionId,
        upload_id: UploadId,
        duration: Duration,
    },
    /// Any step of the background upload failed.
    UploadFailed {
        submission: SubmissionId,
        reason: String,
    },
    ChannelOpened {
        connection: ConnectionId,
        upload_id: UploadId,
    },
    /// Text frame from the push channel. `since_open` is measured on the
    /// connection's own clock.
    ChannelMessage {
        connection: ConnectionId,
        upload_id: UploadId,
        text: String,
        since_open: Duration,
    },
    ChannelClosed {
        connection: ConnectionId,
        upload_id: UploadId,
        reason: Option<String>,
    },
    /// Delay after the final step ran out for the given status-screen mount.
    FinalizeDelayElapsed { mount: u64 },
    CopyLinkClicked,
    OpenLinkClicked,
    /// Clipboard write succeeded.
    LinkCopied,
    /// A platform action (clipboard, browser) failed.
    ActionFailed { title: String, description: String },
    DismissNotifications,
    /// UI/render tick; ages notifications.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
