//! Recent version discovery
//!
//! Resolves the latest release plus the latest release of each of the
//! preceding major lines, newest first.

use tracing::{debug, error, info, warn};

use crate::version::error::{RegistryError, ResolveError};
use crate::version::registry::ReleaseRegistry;
use crate::version::release::{parse_major, previous_majors};

/// Resolve up to `count` recent versions, returning an empty list on failure.
///
/// An empty list means there is nothing to download. The cause is logged.
pub async fn resolve_recent_versions(registry: &dyn ReleaseRegistry, count: usize) -> Vec<String> {
    try_resolve_recent_versions(registry, count)
        .await
        .inspect_err(|e| error!("Failed to resolve driver versions: {}", e))
        .unwrap_or_default()
}

/// Resolve up to `count` recent versions.
///
/// The latest release comes first, followed by the latest release of each
/// previous major version (`major - 1`, `major - 2`, ...). A major line that
/// cannot be resolved is skipped; only a failure to fetch or parse the
/// latest release fails the whole call.
pub async fn try_resolve_recent_versions(
    registry: &dyn ReleaseRegistry,
    count: usize,
) -> Result<Vec<String>, ResolveError> {
    if count == 0 {
        return Err(ResolveError::InvalidCount);
    }

    let latest = registry
        .fetch_latest_release()
        .await
        .map_err(ResolveError::LatestRelease)?;
    let major = parse_major(&latest)?;
    info!("Latest release is {} (major {})", latest, major);

    let mut versions = vec![latest];

    for candidate in previous_majors(major, count) {
        match registry.fetch_latest_release_for_major(candidate).await {
            Ok(version) => {
                debug!("Major {} resolved to {}", candidate, version);
                versions.push(version);
            }
            Err(e) => log_skipped_candidate(candidate, &e),
        }
    }

    Ok(versions)
}

fn log_skipped_candidate(major: u64, error: &RegistryError) {
    warn!("Skipping major version {}: {}", major, error);
}
