//! Gateway engine: upload exchange, push channel and session file IO.
mod channel;
mod engine;
mod persist;
mod settings;
mod types;
mod upload;

pub use channel::run_channel;
pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use settings::{GatewaySettings, DEFAULT_API_BASE_URL, DEFAULT_PUSH_ENDPOINT};
pub use types::{
    ChannelError, EngineEvent, FailureKind, UploadError, UploadId, UploadPhase, UploadRequest,
    UploadTarget,
};
pub use upload::{
    guess_content_type, run_upload, ChannelEventSink, EventSink, ReqwestBackend, UploadBackend,
};
