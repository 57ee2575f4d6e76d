//! Registry trait for fetching release identifiers

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for fetching driver release identifiers from a release server
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetches the latest release identifier across all major versions
    ///
    /// # Returns
    /// * `Ok(String)` - The release identifier, e.g. "120.0.2210.91"
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_latest_release(&self) -> Result<String, RegistryError>;

    /// Fetches the latest release identifier of a single major version line
    ///
    /// # Arguments
    /// * `major` - The major version (e.g. 119)
    async fn fetch_latest_release_for_major(&self, major: u64) -> Result<String, RegistryError>;
}
