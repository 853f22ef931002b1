use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use gateway_engine::{
    guess_content_type, run_upload, EngineEvent, EventSink, FailureKind, GatewaySettings,
    ReqwestBackend, UploadBackend, UploadPhase, UploadRequest,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_bytes, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(GatewaySettings {
        api_base_url: server.uri(),
        ..GatewaySettings::default()
    })
    .expect("client builds")
}

fn package_file(contents: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".zip")
        .tempfile()
        .expect("temp file");
    file.write_all(contents).expect("write package");
    file
}

async fn mount_target(server: &MockServer, upload_id: &str) {
    let upload_url = format!("{}/bucket/course.zip?signature=abc", server.uri());
    Mock::given(method("POST"))
        .and(path("/presigned-url"))
        .and(query_param("contentType", "application/zip"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "filename": "course.zip" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadId": upload_id,
            "uploadUrl": upload_url,
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn request_target_posts_filename_and_content_type() {
    let server = MockServer::start().await;
    mount_target(&server, "u-123").await;

    let target = backend_for(&server)
        .request_target("course.zip", "application/zip")
        .await
        .expect("target issued");
    assert_eq!(target.upload_id, "u-123");
    assert!(target.upload_url.ends_with("/bucket/course.zip?signature=abc"));
}

#[tokio::test]
async fn request_target_maps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/presigned-url"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .request_target("course.zip", "application/zip")
        .await
        .unwrap_err();
    assert_eq!(err.phase, UploadPhase::RequestTarget);
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn request_target_rejects_unexpected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/presigned-url"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .request_target("course.zip", "application/zip")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn put_object_sends_declared_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/bucket/course.zip"))
        .and(header("content-type", "application/x-zip-compressed"))
        .and(body_bytes(b"PK\x03\x04".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/bucket/course.zip", server.uri());
    backend_for(&server)
        .put_object(
            &url,
            "application/x-zip-compressed",
            bytes::Bytes::from_static(b"PK\x03\x04"),
        )
        .await
        .expect("put ok");
}

#[tokio::test]
async fn put_object_maps_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let url = format!("{}/bucket/course.zip", server.uri());
    let err = backend_for(&server)
        .put_object(&url, "application/zip", bytes::Bytes::new())
        .await
        .unwrap_err();
    assert_eq!(err.phase, UploadPhase::Put);
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
}

#[tokio::test]
async fn run_upload_reports_target_then_completion() {
    let server = MockServer::start().await;
    mount_target(&server, "u-42").await;
    Mock::given(method("PUT"))
        .and(path("/bucket/course.zip"))
        .and(query_param("signature", "abc"))
        .and(header("content-type", "application/zip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let package = package_file(b"zip-bytes");
    let request = UploadRequest {
        submission: 1,
        path: package.path().to_path_buf(),
        file_name: "course.zip".to_string(),
        content_type: "application/zip".to_string(),
    };
    let sink = TestSink::new();
    run_upload(&backend_for(&server), request, &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        EngineEvent::UploadTargetIssued {
            submission: 1,
            upload_id: "u-42".to_string()
        }
    );
    assert!(matches!(
        &events[1],
        EngineEvent::UploadCompleted { submission: 1, upload_id, .. } if upload_id == "u-42"
    ));
}

#[tokio::test]
async fn run_upload_reports_missing_package() {
    let server = MockServer::start().await;
    mount_target(&server, "u-7").await;

    let request = UploadRequest {
        submission: 1,
        path: PathBuf::from("/definitely/not/here/course.zip"),
        file_name: "course.zip".to_string(),
        content_type: "application/zip".to_string(),
    };
    let sink = TestSink::new();
    run_upload(&backend_for(&server), request, &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    match &events[1] {
        EngineEvent::UploadFailed { submission, error: err } => {
            assert_eq!(*submission, 1);
            assert_eq!(err.phase, UploadPhase::ReadFile);
            assert_eq!(err.kind, FailureKind::Io);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn run_upload_stops_when_target_refused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let package = package_file(b"zip-bytes");
    let request = UploadRequest {
        submission: 1,
        path: package.path().to_path_buf(),
        file_name: "course.zip".to_string(),
        content_type: "application/zip".to_string(),
    };
    let sink = TestSink::new();
    run_upload(&backend_for(&server), request, &sink).await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        EngineEvent::UploadFailed { error, .. } if error.kind == FailureKind::HttpStatus(403)
    ));
}

#[test]
fn guesses_zip_content_type() {
    assert_eq!(
        guess_content_type(std::path::Path::new("course.zip")).as_deref(),
        Some("application/zip")
    );
    assert_eq!(guess_content_type(std::path::Path::new("README")), None);
}
