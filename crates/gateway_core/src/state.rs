use crate::notification::Notification;
use crate::view_model::{self, AppViewModel};
use crate::{Route, SelectedFile, SessionSnapshot, StatusProgress, UploadRecord};

/// Opaque identifier the backend issues with an upload target.
pub type UploadId = String;

/// Numbers one submit. Background upload events echo it back.
pub type SubmissionId = u64;

/// Numbers one push-channel connection. Every channel event echoes it back.
pub type ConnectionId = u64;

/// Push-channel connection as seen by the core. The engine owns the socket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Closed,
    Opening {
        connection: ConnectionId,
        upload_id: UploadId,
    },
    Open {
        connection: ConnectionId,
        upload_id: UploadId,
    },
}

impl ChannelState {
    pub fn upload_id(&self) -> Option<&str> {
        match self {
            ChannelState::Closed => None,
            ChannelState::Opening { upload_id, .. } | ChannelState::Open { upload_id, .. } => {
                Some(upload_id)
            }
        }
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            ChannelState::Closed => None,
            ChannelState::Opening { connection, .. } | ChannelState::Open { connection, .. } => {
                Some(*connection)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ChannelState::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct UploadForm {
    pub(crate) selected_file: Option<SelectedFile>,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) tags: String,
}

impl UploadForm {
    pub(crate) fn can_submit(&self) -> bool {
        self.selected_file.is_some() && !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct CompletionSummary {
    pub(crate) record: Option<UploadRecord>,
    pub(crate) durations: Vec<f64>,
    pub(crate) content_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) route: Route,
    pub(crate) session: SessionSnapshot,
    pub(crate) form: UploadForm,
    pub(crate) submissions: SubmissionId,
    /// The submit whose background upload the session record describes.
    pub(crate) submission: Option<SubmissionId>,
    pub(crate) upload_id: Option<UploadId>,
    pub(crate) connections: ConnectionId,
    pub(crate) channel: ChannelState,
    pub(crate) status: Option<StatusProgress>,
    pub(crate) mounts: u64,
    pub(crate) completion: CompletionSummary,
    pub(crate) notifications: Vec<Notification>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self, self.dirty)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn session(&self) -> &SessionSnapshot {
        &self.session
    }

    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    pub fn submission(&self) -> Option<SubmissionId> {
        self.submission
    }

    pub fn channel(&self) -> &ChannelState {
        &self.channel
    }

    /// Progress of the mounted status screen, if any.
    pub fn status(&self) -> Option<&StatusProgress> {
        self.status.as_ref()
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
        self.mark_dirty();
    }

    /// Ages notifications by one tick and drops expired ones.
    pub(crate) fn age_notifications(&mut self) {
        let before = self.notifications.len();
        for notification in &mut self.notifications {
            notification.ticks_left = notification.ticks_left.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ticks_left > 0);
        if self.notifications.len() != before {
            self.mark_dirty();
        }
    }
}
