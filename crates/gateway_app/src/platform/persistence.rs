use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info, engine_warn};
use gateway_core::{SessionSnapshot, UploadRecord};
use gateway_engine::{AtomicFileWriter, PersistError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRecord {
    file: String,
    size: u64,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: String,
    #[serde(
        rename = "s3uploadDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    s3_upload_duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    upload_data: Option<PersistedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_durations: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upload_url: Option<String>,
}

impl From<&SessionSnapshot> for PersistedSession {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            upload_data: snapshot.upload_data.as_ref().map(|record| PersistedRecord {
                file: record.file.clone(),
                size: record.size,
                name: record.name.clone(),
                description: record.description.clone(),
                tags: record.tags.clone(),
                s3_upload_duration: record.s3_upload_duration.clone(),
            }),
            time_durations: snapshot.time_durations.clone(),
            upload_url: snapshot.upload_url.clone(),
        }
    }
}

impl From<PersistedRecord> for UploadRecord {
    fn from(record: PersistedRecord) -> Self {
        Self {
            file: record.file,
            size: record.size,
            name: record.name,
            description: record.description,
            tags: record.tags,
            s3_upload_duration: record.s3_upload_duration,
        }
    }
}

/// File-backed mirror of the session snapshot. Lives for one run of the app.
pub struct SessionStore {
    writer: AtomicFileWriter,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(SESSION_FILENAME)
    }

    /// Reads whatever survived from an earlier run. Each key is decoded on
    /// its own; a missing or malformed key reads as absent.
    pub fn load(&self) -> SessionSnapshot {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return SessionSnapshot::default();
            }
            Err(err) => {
                engine_warn!("Failed to read session from {:?}: {}", path, err);
                return SessionSnapshot::default();
            }
        };

        let mut document = match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(map) => map,
            Err(err) => {
                engine_warn!("Ignoring malformed session file {:?}: {}", path, err);
                return SessionSnapshot::default();
            }
        };

        let snapshot = SessionSnapshot {
            upload_data: take_key::<PersistedRecord>(&mut document, "uploadData", &path)
                .map(UploadRecord::from),
            time_durations: take_key(&mut document, "timeDurations", &path),
            upload_url: take_key(&mut document, "uploadUrl", &path),
        };
        if !snapshot.is_empty() {
            engine_info!("Restored session from {:?}", path);
        }
        snapshot
    }

    /// Mirrors `snapshot` to disk. An empty snapshot removes the file.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        if snapshot.is_empty() {
            return self.clear();
        }
        let content = serde_json::to_vec_pretty(&PersistedSession::from(snapshot))?;
        let path = self.writer.write(SESSION_FILENAME, &content)?;
        engine_debug!("Session saved to {:?}", path);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.writer.remove(SESSION_FILENAME)? {
            engine_debug!("Session file removed from {:?}", self.writer.dir());
        }
        Ok(())
    }
}

fn take_key<T: DeserializeOwned>(
    document: &mut Map<String, Value>,
    key: &str,
    path: &Path,
) -> Option<T> {
    let value = document.remove(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            engine_warn!("Ignoring malformed {} in {:?}: {}", key, path, err);
            None
        }
    }
}
