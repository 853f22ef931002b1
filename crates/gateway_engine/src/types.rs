use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type UploadId = String;

/// One-time write target issued by the upload-target service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub upload_id: UploadId,
    pub upload_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TargetRequestBody<'a> {
    pub(crate) filename: &'a str,
}

/// A package to push through the upload-target service and object storage.
/// `submission` is echoed on every upload event so callers can tell exchanges
/// apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub submission: u64,
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

/// Upload events carry the request's `submission`; channel events carry the
/// `connection` number given to `open_channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadTargetIssued {
        submission: u64,
        upload_id: UploadId,
    },
    UploadCompleted {
        submission: u64,
        upload_id: UploadId,
        duration: Duration,
    },
    UploadFailed {
        submission: u64,
        error: UploadError,
    },
    ChannelOpened {
        connection: u64,
        upload_id: UploadId,
    },
    ChannelMessage {
        connection: u64,
        upload_id: UploadId,
        text: String,
        since_open: Duration,
    },
    ChannelClosed {
        connection: u64,
        upload_id: UploadId,
        error: Option<ChannelError>,
    },
    TimerElapsed {
        token: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    RequestTarget,
    ReadFile,
    Put,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::RequestTarget => write!(f, "upload target request"),
            UploadPhase::ReadFile => write!(f, "reading package"),
            UploadPhase::Put => write!(f, "package upload"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{phase} failed: {kind} ({message})")]
pub struct UploadError {
    pub phase: UploadPhase,
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(phase: UploadPhase, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            phase,
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid push endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("push channel connect failed: {0}")]
    Connect(String),
    #[error("push channel protocol error: {0}")]
    Protocol(String),
}
