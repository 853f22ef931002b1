use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info, engine_warn};
use gateway_core::{Effect, Msg};
use gateway_engine::{EngineEvent, EngineHandle, UploadRequest};

use super::app::LoopEvent;
use super::desktop::Desktop;
use super::persistence::SessionStore;

/// Executes core effects against the engine, the session store and the
/// desktop, and feeds engine events back into the app loop as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: SessionStore,
    desktop: Desktop,
    events_tx: mpsc::Sender<LoopEvent>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        store: SessionStore,
        events_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        let runner = Self {
            engine,
            store,
            desktop: Desktop::default(),
            events_tx,
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistSession(snapshot) => {
                    if let Err(err) = self.store.save(&snapshot) {
                        engine_error!("Failed to persist session: {}", err);
                    }
                }
                Effect::BeginUpload {
                    submission,
                    file,
                    content_type,
                } => {
                    engine_info!(
                        "BeginUpload #{} file={} size={} content_type={}",
                        submission,
                        file.name,
                        file.size,
                        content_type
                    );
                    self.engine.begin_upload(UploadRequest {
                        submission,
                        path: file.path,
                        file_name: file.name,
                        content_type,
                    });
                }
                Effect::OpenChannel {
                    connection,
                    upload_id,
                } => self.engine.open_channel(connection, upload_id),
                Effect::CloseChannel => self.engine.close_channel(),
                Effect::ScheduleFinalize { mount, delay } => {
                    self.engine.schedule_timer(mount, delay);
                }
                Effect::CopyToClipboard(text) => {
                    let msg = match self.desktop.copy_text(&text) {
                        Ok(()) => Msg::LinkCopied,
                        Err(err) => {
                            engine_warn!("Copy failed: {}", err);
                            Msg::ActionFailed {
                                title: "Copy failed".to_string(),
                                description: err.to_string(),
                            }
                        }
                    };
                    self.send(msg);
                }
                Effect::OpenExternal(url) => {
                    if let Err(err) = self.desktop.open_url(&url) {
                        engine_warn!("Opening {} failed: {}", url, err);
                        self.send(Msg::ActionFailed {
                            title: "Could not open link".to_string(),
                            description: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn send(&self, msg: Msg) {
        let _ = self.events_tx.send(LoopEvent::Msg(msg));
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let events_tx = self.events_tx.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if events_tx.send(LoopEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadTargetIssued {
            submission,
            upload_id,
        } => Msg::UploadTargetIssued {
            submission,
            upload_id,
        },
        EngineEvent::UploadCompleted {
            submission,
            upload_id,
            duration,
        } => Msg::UploadFinished {
            submission,
            upload_id,
            duration,
        },
        EngineEvent::UploadFailed { submission, error } => Msg::UploadFailed {
            submission,
            reason: error.to_string(),
        },
        EngineEvent::ChannelOpened {
            connection,
            upload_id,
        } => Msg::ChannelOpened {
            connection,
            upload_id,
        },
        EngineEvent::ChannelMessage {
            connection,
            upload_id,
            text,
            since_open,
        } => Msg::ChannelMessage {
            connection,
            upload_id,
            text,
            since_open,
        },
        EngineEvent::ChannelClosed {
            connection,
            upload_id,
            error,
        } => Msg::ChannelClosed {
            connection,
            upload_id,
            reason: error.map(|err| err.to_string()),
        },
        EngineEvent::TimerElapsed { token } => Msg::FinalizeDelayElapsed { mount: token },
    }
}
