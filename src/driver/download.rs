//! Driver archive download

use std::io::{Cursor, Read};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{DEFAULT_BASE_URL, FETCH_TIMEOUT_MS, USER_AGENT};
use crate::driver::error::DownloadError;
use crate::driver::platform::Platform;

/// Downloads driver archives from `{base}/{version}/edgedriver_{platform}.zip`
pub struct DriverDownloader {
    client: reqwest::Client,
    base_url: String,
}

impl DriverDownloader {
    /// Creates a new DriverDownloader with a custom base URL
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

    pub fn archive_url(&self, version: &str, platform: Platform) -> String {
        format!("{}/{}/{}", self.base_url, version, platform.archive_name())
    }

    /// Downloads the archive for `version` and returns the driver executable
    pub async fn download_driver(
        &self,
        version: &str,
        platform: Platform,
    ) -> Result<Vec<u8>, DownloadError> {
        validate_version(version)?;
        let archive = self.download_archive(version, platform).await?;
        extract_driver_binary(&archive, &platform.binary_name())
    }

    async fn download_archive(
        &self,
        version: &str,
        platform: Platform,
    ) -> Result<Vec<u8>, DownloadError> {
        let url = self.archive_url(version, platform);
        debug!("Downloading {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DownloadError::NotFound(url));
        }

        if !status.is_success() {
            warn!("Release server returned status {}: {}", status, url);
            return Err(DownloadError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        Ok(bytes.to_vec())
    }
}

impl Default for DriverDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Check that `version` is a dotted numeric release identifier.
///
/// Versions become URL segments, directory names, and file names, so only
/// non-empty runs of ASCII digits separated by single dots are accepted.
pub fn validate_version(version: &str) -> Result<(), DownloadError> {
    let valid = version
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));

    if valid {
        Ok(())
    } else {
        Err(DownloadError::InvalidVersion(version.to_string()))
    }
}

/// Extract the entry named `binary_name` from a zip archive.
///
/// Entries are matched on their last path component, so a binary nested in a
/// folder inside the archive is still found.
pub fn extract_driver_binary(archive: &[u8], binary_name: &str) -> Result<Vec<u8>, DownloadError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if !entry.is_file() {
            continue;
        }

        let file_name = entry.name().rsplit(['/', '\\']).next().unwrap_or_default();
        if file_name != binary_name {
            continue;
        }

        let mut binary = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut binary)?;
        return Ok(binary);
    }

    Err(DownloadError::BinaryNotInArchive(binary_name.to_string()))
}


#[cfg(test)]
mod tests {
    use super::test_support::zip_archive;
    use super::*;
    use mockito::Server;
    use rstest::rstest;

    #[rstest]
    #[case("120.0.2210.91")]
    #[case("1")]
    fn validate_version_accepts_dotted_numbers(#[case] version: &str) {
        assert!(validate_version(version).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("../120.0.0.0")]
    #[case("/tmp/planted")]
    #[case("120.0.0.0/..")]
    #[case("C:\\drivers")]
    #[case("120..0")]
    #[case("120.0.0.0.")]
    #[case("v120.0.0.0")]
    fn validate_version_rejects_path_like_input(#[case] version: &str) {
        assert!(matches!(
            validate_version(version),
            Err(DownloadError::InvalidVersion(v)) if v == version
        ));
    }

    #[tokio::test]
    async fn download_driver_rejects_invalid_version_without_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let downloader = DriverDownloader::new(&server.url());
        let result = downloader
            .download_driver("../../etc", Platform::Linux64)
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(DownloadError::InvalidVersion(_))));
    }

    #[test]
    fn extract_driver_binary_returns_matching_entry() {
        let archive = zip_archive(&[
            ("Driver_Notes/credits.html", b"<html></html>".as_slice()),
            ("msedgedriver.exe", b"MZ-driver".as_slice()),
        ]);

        let binary = extract_driver_binary(&archive, "msedgedriver.exe").unwrap();

        assert_eq!(binary, b"MZ-driver");
    }

    #[test]
    fn extract_driver_binary_finds_nested_entry() {
        let archive = zip_archive(&[(
            "edgedriver_linux64/msedgedriver",
            b"ELF-driver".as_slice(),
        )]);

        let binary = extract_driver_binary(&archive, "msedgedriver").unwrap();

        assert_eq!(binary, b"ELF-driver");
    }

    #[test]
    fn extract_driver_binary_reports_missing_binary() {
        let archive = zip_archive(&[("msedgedriver", b"ELF-driver".as_slice())]);

        let result = extract_driver_binary(&archive, "msedgedriver.exe");

        assert!(matches!(
            result,
            Err(DownloadError::BinaryNotInArchive(name)) if name == "msedgedriver.exe"
        ));
    }

    #[test]
    fn extract_driver_binary_rejects_non_zip_data() {
        let result = extract_driver_binary(b"<Error>BlobNotFound</Error>", "msedgedriver.exe");

        assert!(matches!(result, Err(DownloadError::Archive(_))));
    }

    #[tokio::test]
    async fn download_driver_fetches_platform_archive() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/120.0.2210.91/edgedriver_win64.zip")
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(zip_archive(&[("msedgedriver.exe", b"MZ-120".as_slice())]))
            .create_async()
            .await;

        let downloader = DriverDownloader::new(&server.url());
        let binary = downloader
            .download_driver("120.0.2210.91", Platform::Win64)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(binary, b"MZ-120");
    }

    #[tokio::test]
    async fn download_driver_returns_not_found_for_missing_archive() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/1.0.0.0/edgedriver_linux64.zip")
            .with_status(404)
            .create_async()
            .await;

        let downloader = DriverDownloader::new(&server.url());
        let result = downloader
            .download_driver("1.0.0.0", Platform::Linux64)
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(DownloadError::NotFound(_))));
    }
}
