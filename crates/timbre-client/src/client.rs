use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{CloneRequest, CloneResponse};

/// Typed client for the timbre voice-clone server
#[derive(Debug, Clone)]
pub struct CloneClient {
    base_url: Url,
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl CloneClient {
    /// Create a new client pointing at the given base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            timeout: None,
        })
    }

    /// Set a per-request timeout
    ///
    /// Synthesis is slow; without this the client waits as long as the
    /// transport allows.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the base URL
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a voice-clone request and return the parsed response
    ///
    /// # Errors
    ///
    /// Returns `Api` with the server's `detail` message on non-2xx
    /// responses, or a transport/parse error
    pub async fn clone_voice(&self, request: &CloneRequest) -> Result<CloneResponse> {
        let url = make_url(&self.base_url, "/clone");

        let mut builder = self.http.post(url.as_str()).json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        handle_error(response).await?.json().await.map_err(Into::into)
    }
}

/// Read an audio file and base64-encode its bytes for the wire
///
/// # Errors
///
/// Returns `Io` if the file cannot be read
pub fn encode_audio_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Construct a full URL by joining the path to the base URL
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path(path);
    url
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        detail: parse_detail(&body),
    })
}

/// Pull the `detail` message out of an error body
fn parse_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["detail"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}
