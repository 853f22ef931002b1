/// MIME type sent when the selected file does not carry one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/zip";

/// What the upload screen hands to the status and completion screens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadRecord {
    pub file: String,
    pub size: u64,
    pub name: String,
    pub description: String,
    /// Comma separated, as typed.
    pub tags: String,
    /// Seconds with two decimals, set once the direct upload finished.
    pub s3_upload_duration: Option<String>,
}

impl UploadRecord {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

/// Session-scoped key/value state shared between screens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub upload_data: Option<UploadRecord>,
    /// Per-step seconds, consumed once by the completion screen.
    pub time_durations: Option<Vec<f64>>,
    /// Delivered content URL.
    pub upload_url: Option<String>,
}

impl SessionSnapshot {
    pub fn for_record(record: UploadRecord) -> Self {
        Self {
            upload_data: Some(record),
            time_durations: None,
            upload_url: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.upload_data.is_none() && self.time_durations.is_none() && self.upload_url.is_none()
    }
}
