use std::time::Duration;

use crate::{ConnectionId, SelectedFile, SessionSnapshot, SubmissionId, UploadId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Mirror the session snapshot to the session store.
    PersistSession(SessionSnapshot),
    /// Request an upload target, then PUT the file to it.
    BeginUpload {
        submission: SubmissionId,
        file: SelectedFile,
        content_type: String,
    },
    /// Open the push channel for an upload, replacing any open connection.
    OpenChannel {
        connection: ConnectionId,
        upload_id: UploadId,
    },
    CloseChannel,
    /// Send `Msg::FinalizeDelayElapsed { mount }` after `delay`.
    ScheduleFinalize { mount: u64, delay: Duration },
    CopyToClipboard(String),
    OpenExternal(String),
}
