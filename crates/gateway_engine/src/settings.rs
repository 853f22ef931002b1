use std::time::Duration;

use url::Url;

use crate::{ChannelError, FailureKind, UploadError, UploadPhase};

/// Upload-target service used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
/// Push-notification endpoint; the upload id is appended as a query parameter.
pub const DEFAULT_PUSH_ENDPOINT: &str = "wss://eowjhroeoj.execute-api.us-east-1.amazonaws.com/dev/";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub api_base_url: String,
    pub push_endpoint: String,
    pub connect_timeout: Duration,
    /// Applies to the upload-target request.
    pub request_timeout: Duration,
    /// Applies to the object-storage PUT, which carries the whole package.
    pub upload_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            push_endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(15 * 60),
        }
    }
}

impl GatewaySettings {
    /// `{api_base_url}/presigned-url?contentType=<mime>`
    pub fn presigned_url_endpoint(&self, content_type: &str) -> Result<Url, UploadError> {
        let invalid = |message: String| {
            UploadError::new(UploadPhase::RequestTarget, FailureKind::InvalidUrl, message)
        };
        let mut url = Url::parse(&self.api_base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot be a base URL", self.api_base_url)))?
            .pop_if_empty()
            .push("presigned-url");
        url.query_pairs_mut().append_pair("contentType", content_type);
        Ok(url)
    }

    /// `{push_endpoint}?uploadId=<id>`
    pub fn channel_url(&self, upload_id: &str) -> Result<Url, ChannelError> {
        let mut url = Url::parse(&self.push_endpoint).map_err(|err| {
            ChannelError::InvalidEndpoint(format!("{}: {err}", self.push_endpoint))
        })?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ChannelError::InvalidEndpoint(format!(
                    "unsupported scheme {other}"
                )))
            }
        }
        url.query_pairs_mut().append_pair("uploadId", upload_id);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presigned_endpoint_keeps_base_path_and_encodes_type() {
        let settings = GatewaySettings {
            api_base_url: "https://api.example.com/dev".to_string(),
            ..GatewaySettings::default()
        };
        let url = settings.presigned_url_endpoint("application/zip").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/dev/presigned-url?contentType=application%2Fzip"
        );

        let settings = GatewaySettings {
            api_base_url: "https://api.example.com/dev/".to_string(),
            ..GatewaySettings::default()
        };
        let url = settings.presigned_url_endpoint("application/zip").unwrap();
        assert_eq!(url.path(), "/dev/presigned-url");
    }

    #[test]
    fn channel_url_embeds_upload_id() {
        let url = GatewaySettings::default().channel_url("abc 1").unwrap();
        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.query(), Some("uploadId=abc+1"));
    }

    #[test]
    fn channel_url_rejects_http() {
        let settings = GatewaySettings {
            push_endpoint: "https://example.com".to_string(),
            ..GatewaySettings::default()
        };
        assert!(matches!(
            settings.channel_url("x"),
            Err(ChannelError::InvalidEndpoint(_))
        ));
    }
}
