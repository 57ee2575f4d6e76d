use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Release not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures that abort a whole resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Requested version count must be at least 1")]
    InvalidCount,

    #[error("Failed to fetch latest release: {0}")]
    LatestRelease(#[source] RegistryError),

    #[error("Invalid version string: {0:?}")]
    InvalidVersion(String),
}
