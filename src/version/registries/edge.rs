//! msedgedriver release server implementation

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{DEFAULT_BASE_URL, FETCH_TIMEOUT_MS, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::ReleaseRegistry;

/// Registry implementation for the msedgedriver release server
///
/// The server publishes plaintext release files:
/// - `{base}/LATEST_RELEASE` - latest release overall
/// - `{base}/LATEST_RELEASE_{major}` - latest release of a major line
pub struct EdgeDriverRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl EdgeDriverRegistry {
    /// Creates a new EdgeDriverRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_release_file(&self, file_name: &str) -> Result<String, RegistryError> {
        let url = format!("{}/{}", self.base_url, file_name);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(file_name.to_string()));
        }

        if !status.is_success() {
            warn!("Release server returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await?;

        decode_release_body(&body).inspect_err(|e| {
            warn!("Failed to decode release file {}: {}", url, e);
        })
    }
}

impl Default for EdgeDriverRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl ReleaseRegistry for EdgeDriverRegistry {
    async fn fetch_latest_release(&self) -> Result<String, RegistryError> {
        self.fetch_release_file("LATEST_RELEASE").await
    }

    async fn fetch_latest_release_for_major(&self, major: u64) -> Result<String, RegistryError> {
        self.fetch_release_file(&format!("LATEST_RELEASE_{}", major))
            .await
    }
}

/// Decode a release file body into a trimmed version string.
///
/// The server serves these files as UTF-16LE with a byte order mark, so the
/// BOM decides the encoding. Bodies without a BOM are read as UTF-8.
fn decode_release_body(body: &[u8]) -> Result<String, RegistryError> {
    let text = match body {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes)?,
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes)?,
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest)?,
        _ => decode_utf8(body)?,
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidResponse("Empty release file".into()));
    }

    Ok(trimmed.to_string())
}

fn decode_utf8(bytes: &[u8]) -> Result<String, RegistryError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| RegistryError::InvalidResponse(format!("Invalid UTF-8 body: {}", e)))
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, RegistryError> {
    if bytes.len() % 2 != 0 {
        return Err(RegistryError::InvalidResponse(
            "Truncated UTF-16 body".into(),
        ));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units)
        .map_err(|e| RegistryError::InvalidResponse(format!("Invalid UTF-16 body: {}", e)))
}
