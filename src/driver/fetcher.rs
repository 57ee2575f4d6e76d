//! Fetch resolved versions into the output folder
//!
//! Each version is handled independently: a failure is logged and recorded
//! in the [`FetchReport`], and the next version is tried.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::driver::cache::DriverCache;
use crate::driver::download::{DriverDownloader, validate_version};
use crate::driver::error::DownloadError;
use crate::driver::platform::Platform;

/// Where a stored driver came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverSource {
    Cache,
    Download,
}

/// A driver copied into the output folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDriver {
    pub version: String,
    pub path: PathBuf,
    pub source: DriverSource,
}

/// Outcome of fetching a list of versions
#[derive(Debug, Default)]
pub struct FetchReport {
    pub stored: Vec<StoredDriver>,
    pub failed: Vec<(String, DownloadError)>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloaded binaries kept under the data directory
struct LocalCache {
    db: DriverCache,
    dir: PathBuf,
}

pub struct DriverFetcher {
    downloader: DriverDownloader,
    platform: Platform,
    output_dir: PathBuf,
    cache: Option<LocalCache>,
}

impl DriverFetcher {
    pub fn new(downloader: DriverDownloader, platform: Platform, output_dir: &Path) -> Self {
        Self {
            downloader,
            platform,
            output_dir: output_dir.to_path_buf(),
            cache: None,
        }
    }

    /// Reuse binaries recorded in `db`, storing new downloads under `dir`
    pub fn with_cache(mut self, db: DriverCache, dir: &Path) -> Self {
        self.cache = Some(LocalCache {
            db,
            dir: dir.to_path_buf(),
        });
        self
    }

    /// Path the driver for `version` is stored at in the output folder
    pub fn destination(&self, version: &str) -> PathBuf {
        self.output_dir
            .join(self.platform.tagged_binary_name(version))
    }

    /// Fetch every version in order, continuing past failures.
    ///
    /// Fails only if the output folder cannot be created.
    pub async fn fetch_all(&self, versions: &[String]) -> std::io::Result<FetchReport> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut report = FetchReport::default();

        for version in versions {
            info!(
                "Fetching msedgedriver {} for {}",
                version, self.platform
            );

            match self.fetch_one(version).await {
                Ok(stored) => {
                    info!(
                        "Driver version {} stored at {:?}",
                        stored.version, stored.path
                    );
                    report.stored.push(stored);
                }
                Err(e) => {
                    error!("Failed to fetch driver for version {}: {}", version, e);
                    report.failed.push((version.clone(), e));
                }
            }
        }

        Ok(report)
    }

    async fn fetch_one(&self, version: &str) -> Result<StoredDriver, DownloadError> {
        validate_version(version)?;
        let destination = self.destination(version);

        let source = match &self.cache {
            Some(cache) => self.fetch_through_cache(cache, version, &destination).await?,
            None => {
                let binary = self.downloader.download_driver(version, self.platform).await?;
                write_executable(&destination, &binary).await?;
                DriverSource::Download
            }
        };

        Ok(StoredDriver {
            version: version.to_string(),
            path: destination,
            source,
        })
    }

    async fn fetch_through_cache(
        &self,
        cache: &LocalCache,
        version: &str,
        destination: &Path,
    ) -> Result<DriverSource, DownloadError> {
        if let Some(cached) = cache.db.get(version, self.platform)? {
            if cached.is_intact() {
                info!("Using cached driver {:?}", cached.path);
                copy_executable(&cached.path, destination).await?;
                return Ok(DriverSource::Cache);
            }

            warn!(
                "Cached driver {:?} is missing or damaged, downloading again",
                cached.path
            );
            cache.db.remove(version, self.platform)?;
        }

        let binary = self.downloader.download_driver(version, self.platform).await?;

        let cached_path = cache
            .dir
            .join(version)
            .join(self.platform.as_str())
            .join(self.platform.binary_name());
        write_executable(&cached_path, &binary).await?;
        cache
            .db
            .record(version, self.platform, &cached_path, binary.len() as u64)?;

        copy_executable(&cached_path, destination).await?;

        Ok(DriverSource::Download)
    }
}

async fn write_executable(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    make_executable(path).await
}

async fn copy_executable(from: &Path, to: &Path) -> std::io::Result<()> {
    tokio::fs::copy(from, to).await?;
    make_executable(to).await
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
