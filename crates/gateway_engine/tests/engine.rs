use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::Bytes;
use gateway_engine::{
    ChannelError, EngineEvent, EngineHandle, GatewaySettings, UploadBackend, UploadError,
    UploadRequest, UploadTarget,
};

#[derive(Default)]
struct FakeBackend {
    puts: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait::async_trait]
impl UploadBackend for FakeBackend {
    async fn request_target(
        &self,
        file_name: &str,
        _content_type: &str,
    ) -> Result<UploadTarget, UploadError> {
        Ok(UploadTarget {
            upload_id: format!("id-{file_name}"),
            upload_url: "https://bucket.example.com/object".to_string(),
        })
    }

    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), UploadError> {
        self.puts.lock().unwrap().push((
            upload_url.to_string(),
            content_type.to_string(),
            body.len(),
        ));
        Ok(())
    }
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event within timeout")
}

#[test]
fn upload_command_reports_through_event_queue() {
    let backend = Arc::new(FakeBackend::default());
    let engine = EngineHandle::with_backend(GatewaySettings::default(), backend.clone());

    let mut package = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
    package.write_all(b"12345").unwrap();
    engine.begin_upload(UploadRequest {
        submission: 3,
        path: package.path().to_path_buf(),
        file_name: "pkg.zip".to_string(),
        content_type: "application/zip".to_string(),
    });

    assert_eq!(
        next_event(&engine),
        EngineEvent::UploadTargetIssued {
            submission: 3,
            upload_id: "id-pkg.zip".to_string()
        }
    );
    assert!(matches!(
        next_event(&engine),
        EngineEvent::UploadCompleted { submission: 3, upload_id, .. } if upload_id == "id-pkg.zip"
    ));
    assert_eq!(
        backend.puts.lock().unwrap().as_slice(),
        &[(
            "https://bucket.example.com/object".to_string(),
            "application/zip".to_string(),
            5
        )]
    );
}

#[test]
fn timers_fire_with_their_token() {
    let engine = EngineHandle::with_backend(
        GatewaySettings::default(),
        Arc::new(FakeBackend::default()),
    );
    let started = Instant::now();
    engine.schedule_timer(7, Duration::from_millis(50));
    assert_eq!(next_event(&engine), EngineEvent::TimerElapsed { token: 7 });
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn channel_with_bad_endpoint_closes_with_error() {
    let settings = GatewaySettings {
        push_endpoint: "not a url".to_string(),
        ..GatewaySettings::default()
    };
    let engine = EngineHandle::with_backend(settings, Arc::new(FakeBackend::default()));
    let clone = engine.clone();
    clone.open_channel(1, "u-5");

    assert!(matches!(
        next_event(&engine),
        EngineEvent::ChannelClosed {
            connection: 1,
            upload_id,
            error: Some(ChannelError::InvalidEndpoint(_)),
        } if upload_id == "u-5"
    ));
    assert!(engine.try_recv().is_none());
}

#[test]
fn each_connection_reports_under_its_own_number() {
    let settings = GatewaySettings {
        push_endpoint: "not a url".to_string(),
        ..GatewaySettings::default()
    };
    let engine = EngineHandle::with_backend(settings, Arc::new(FakeBackend::default()));
    engine.open_channel(1, "u-6");
    engine.open_channel(2, "u-6");

    let mut closed: Vec<u64> = (0..2)
        .map(|_| match next_event(&engine) {
            EngineEvent::ChannelClosed { connection, .. } => connection,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    closed.sort_unstable();
    assert_eq!(closed, vec![1, 2]);
}
