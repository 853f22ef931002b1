use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error};
use tokio_util::sync::CancellationToken;

use crate::channel::run_channel;
use crate::upload::{run_upload, ChannelEventSink, EventSink, ReqwestBackend, UploadBackend};
use crate::{EngineEvent, GatewaySettings, UploadError, UploadId, UploadRequest};

enum EngineCommand {
    BeginUpload(UploadRequest),
    OpenChannel {
        connection: u64,
        upload_id: UploadId,
    },
    CloseChannel,
    ScheduleTimer { token: u64, delay: Duration },
}

/// The push-channel connection currently owned by the engine worker.
struct ActiveChannel {
    connection: u64,
    upload_id: UploadId,
    cancel: CancellationToken,
}

/// Front door to the IO worker. Commands run on a tokio runtime owned by a
/// dedicated thread; results come back as [`EngineEvent`]s via `try_recv`.
/// Clones share the same worker and event queue.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: GatewaySettings) -> Result<Self, UploadError> {
        let backend = Arc::new(ReqwestBackend::new(settings.clone())?);
        Ok(Self::with_backend(settings, backend))
    }

    pub fn with_backend(settings: GatewaySettings, backend: Arc<dyn UploadBackend>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let settings = Arc::new(settings);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut active: Option<ActiveChannel> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::BeginUpload(request) => {
                        let backend = backend.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            run_upload(backend.as_ref(), request, &sink).await;
                        });
                    }
                    EngineCommand::OpenChannel {
                        connection,
                        upload_id,
                    } => {
                        close_active(&mut active);
                        let cancel = CancellationToken::new();
                        let settings = settings.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        let task_cancel = cancel.clone();
                        let task_upload_id = upload_id.clone();
                        runtime.spawn(async move {
                            run_channel(&settings, connection, task_upload_id, &sink, task_cancel)
                                .await;
                        });
                        active = Some(ActiveChannel {
                            connection,
                            upload_id,
                            cancel,
                        });
                    }
                    EngineCommand::CloseChannel => close_active(&mut active),
                    EngineCommand::ScheduleTimer { token, delay } => {
                        let sink = ChannelEventSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            tokio::time::sleep(delay).await;
                            sink.emit(EngineEvent::TimerElapsed { token });
                        });
                    }
                }
            }

            close_active(&mut active);
            runtime.shutdown_timeout(Duration::from_millis(500));
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn begin_upload(&self, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::BeginUpload(request));
    }

    /// Opens a connection for `upload_id`, closing any connection already open.
    /// Its events carry `connection`.
    pub fn open_channel(&self, connection: u64, upload_id: impl Into<UploadId>) {
        let _ = self.cmd_tx.send(EngineCommand::OpenChannel {
            connection,
            upload_id: upload_id.into(),
        });
    }

    pub fn close_channel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CloseChannel);
    }

    /// Emits `EngineEvent::TimerElapsed { token }` once `delay` has passed.
    pub fn schedule_timer(&self, token: u64, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::ScheduleTimer { token, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

fn close_active(active: &mut Option<ActiveChannel>) {
    if let Some(previous) = active.take() {
        engine_debug!(
            upload = previous.upload_id;
            "Releasing push channel connection {}",
            previous.connection
        );
        previous.cancel.cancel();
    }
}
