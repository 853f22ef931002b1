use std::time::{Duration, Instant};

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use crate::upload::EventSink;
use crate::{ChannelError, EngineEvent, GatewaySettings, UploadId};

/// Upper bound on waiting for the close frame to go out after cancellation.
const CLOSE_FRAME_TIMEOUT: Duration = Duration::from_millis(500);

/// Holds one push-channel connection open until the server closes it, an error
/// occurs, or `cancel` fires. Always ends with exactly one `ChannelClosed`.
pub async fn run_channel(
    settings: &GatewaySettings,
    connection: u64,
    upload_id: UploadId,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let error = connect_and_relay(settings, connection, &upload_id, sink, &cancel)
        .await
        .err();
    if let Some(err) = &error {
        engine_warn!(upload = upload_id; "Push channel ended: {}", err);
    }
    sink.emit(EngineEvent::ChannelClosed {
        connection,
        upload_id,
        error,
    });
}

async fn connect_and_relay(
    settings: &GatewaySettings,
    connection: u64,
    upload_id: &str,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> Result<(), ChannelError> {
    let url = settings.channel_url(upload_id)?;
    let connect = tokio::time::timeout(settings.connect_timeout, connect_async(url.as_str()));

    let stream = tokio::select! {
        _ = cancel.cancelled() => {
            engine_debug!(upload = upload_id; "Push channel cancelled while connecting");
            return Ok(());
        }
        result = connect => match result {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(err)) => return Err(ChannelError::Connect(err.to_string())),
            Err(_) => return Err(ChannelError::Connect("timed out".to_string())),
        },
    };

    let opened_at = Instant::now();
    engine_info!(upload = upload_id; "Push channel connected");
    sink.emit(EngineEvent::ChannelOpened {
        connection,
        upload_id: upload_id.to_string(),
    });

    let (mut write, mut read) = stream.split();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                engine_debug!(upload = upload_id; "Closing push channel");
                let close = write.send(Message::Close(None));
                if tokio::time::timeout(CLOSE_FRAME_TIMEOUT, close).await.is_err() {
                    engine_debug!(upload = upload_id; "Close frame not flushed in time");
                }
                return Ok(());
            }
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    sink.emit(EngineEvent::ChannelMessage {
                        connection,
                        upload_id: upload_id.to_string(),
                        text: text.as_str().to_owned(),
                        since_open: opened_at.elapsed(),
                    });
                }
                Some(Ok(Message::Close(frame))) => {
                    engine_info!(upload = upload_id; "Push channel closed by server: {:?}", frame);
                    return Ok(());
                }
                Some(Ok(other)) => {
                    engine_debug!(
                        upload = upload_id;
                        "Ignoring non-text frame ({} bytes)",
                        other.len()
                    );
                }
                Some(Err(err)) => return Err(ChannelError::Protocol(err.to_string())),
                None => return Ok(()),
            },
        }
    }
}
