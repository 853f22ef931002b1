use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::header::CONTENT_TYPE;

use crate::types::TargetRequestBody;
use crate::{
    EngineEvent, FailureKind, GatewaySettings, UploadError, UploadId, UploadPhase, UploadRequest,
    UploadTarget,
};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The two HTTP exchanges of an upload.
#[async_trait::async_trait]
pub trait UploadBackend: Send + Sync {
    async fn request_target(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadTarget, UploadError>;

    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: GatewaySettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: GatewaySettings) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| {
                UploadError::new(UploadPhase::RequestTarget, FailureKind::Network, err.to_string())
            })?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl UploadBackend for ReqwestBackend {
    async fn request_target(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadTarget, UploadError> {
        let phase = UploadPhase::RequestTarget;
        let url = self.settings.presigned_url_endpoint(content_type)?;
        let body = serde_json::to_vec(&TargetRequestBody {
            filename: file_name,
        })
        .map_err(|err| UploadError::new(phase, FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.settings.request_timeout)
            .body(body)
            .send()
            .await
            .map_err(|err| map_reqwest_error(phase, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                phase,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(phase, err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| UploadError::new(phase, FailureKind::Decode, err.to_string()))
    }

    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), UploadError> {
        let phase = UploadPhase::Put;
        let url = reqwest::Url::parse(upload_url)
            .map_err(|err| UploadError::new(phase, FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .timeout(self.settings.upload_timeout)
            .body(body)
            .send()
            .await
            .map_err(|err| map_reqwest_error(phase, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                phase,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }
}

/// Runs the whole background exchange and reports through `sink`: target
/// issued, then either completed (with wall-clock duration) or failed.
pub async fn run_upload(backend: &dyn UploadBackend, request: UploadRequest, sink: &dyn EventSink) {
    let started = Instant::now();
    match upload_package(backend, &request, sink).await {
        Ok(upload_id) => {
            let duration = started.elapsed();
            engine_info!(upload = upload_id; "Uploaded {} in {:?}", request.file_name, duration);
            sink.emit(EngineEvent::UploadCompleted {
                submission: request.submission,
                upload_id,
                duration,
            });
        }
        Err(error) => {
            engine_warn!("Upload of {} failed: {}", request.file_name, error);
            sink.emit(EngineEvent::UploadFailed {
                submission: request.submission,
                error,
            });
        }
    }
}

async fn upload_package(
    backend: &dyn UploadBackend,
    request: &UploadRequest,
    sink: &dyn EventSink,
) -> Result<UploadId, UploadError> {
    let target = backend
        .request_target(&request.file_name, &request.content_type)
        .await?;
    engine_debug!(upload = target.upload_id; "Upload target issued");
    sink.emit(EngineEvent::UploadTargetIssued {
        submission: request.submission,
        upload_id: target.upload_id.clone(),
    });

    let body = tokio::fs::read(&request.path).await.map_err(|err| {
        UploadError::new(
            UploadPhase::ReadFile,
            FailureKind::Io,
            format!("{}: {err}", request.path.display()),
        )
    })?;
    backend
        .put_object(&target.upload_url, &request.content_type, Bytes::from(body))
        .await?;
    Ok(target.upload_id)
}

/// MIME type for a package path, if its extension is known.
pub fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

fn map_reqwest_error(phase: UploadPhase, err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(phase, FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return UploadError::new(phase, FailureKind::InvalidUrl, err.to_string());
    }
    UploadError::new(phase, FailureKind::Network, err.to_string())
}
