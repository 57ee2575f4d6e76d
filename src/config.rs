use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::driver::platform::Platform;

// =============================================================================
// Defaults
// =============================================================================

/// Default release server for msedgedriver
pub const DEFAULT_BASE_URL: &str = "https://msedgedriver.azureedge.net";

/// Number of versions fetched when none is configured
pub const DEFAULT_VERSION_COUNT: usize = 3;

/// Upper bound on the number of versions fetched in one run
pub const MAX_VERSION_COUNT: usize = 100;

/// Folder the version-tagged drivers are copied into
pub const DEFAULT_OUTPUT_DIR: &str = "webdrivers";

/// Timeout for a single HTTP request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every request
pub const USER_AGENT: &str = "edgedriver-fetch";

const APP_DIR_NAME: &str = "edgedriver-fetch";

/// Tool configuration, loaded from an optional JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    pub base_url: String,
    pub count: usize,
    pub output_dir: PathBuf,
    /// Target platform; the host platform when unset
    pub platform: Option<Platform>,
    pub cache: CacheConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            count: DEFAULT_VERSION_COUNT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            platform: None,
            cache: CacheConfig::default(),
        }
    }
}

/// Driver cache configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("count must be between 1 and {max}, got {0}", max = MAX_VERSION_COUNT)]
    InvalidCount(usize),
}

impl FetchConfig {
    /// Loads the configuration from a JSON file. Missing fields use defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_VERSION_COUNT).contains(&self.count) {
            return Err(ConfigError::InvalidCount(self.count));
        }
        Ok(())
    }

    /// The configured platform, falling back to the host platform
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

/// Returns the path to the data directory for edgedriver-fetch.
/// Uses $XDG_DATA_HOME/edgedriver-fetch if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/edgedriver-fetch,
/// or ./edgedriver-fetch if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the driver cache database.
pub fn db_path() -> PathBuf {
    data_dir().join("drivers.db")
}

/// Returns the directory cached driver binaries are stored in.
pub fn drivers_dir() -> PathBuf {
    data_dir().join("drivers")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("edgedriver-fetch.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn fetch_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<FetchConfig>(json!({
            "count": 5
        }))
        .unwrap();

        assert_eq!(result.count, 5);
        assert_eq!(result.base_url, DEFAULT_BASE_URL);
        assert_eq!(result.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(result.platform, None);
        assert_eq!(result.cache, CacheConfig::default());
    }

    #[test]
    fn fetch_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<FetchConfig>(json!({
            "baseUrl": "http://localhost:8080",
            "count": 2,
            "outputDir": "/tmp/drivers",
            "platform": "linux64",
            "cache": { "enabled": false }
        }))
        .unwrap();

        assert_eq!(
            result,
            FetchConfig {
                base_url: "http://localhost:8080".to_string(),
                count: 2,
                output_dir: PathBuf::from("/tmp/drivers"),
                platform: Some(Platform::Linux64),
                cache: CacheConfig { enabled: false },
            }
        );
    }

    #[test]
    fn from_file_reads_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "platform": "win32" }"#).unwrap();

        let config = FetchConfig::from_file(&path).unwrap();

        assert_eq!(config.platform(), Platform::Win32);
        assert_eq!(config.count, DEFAULT_VERSION_COUNT);
    }

    #[test]
    fn from_file_returns_read_error_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = FetchConfig::from_file(&temp_dir.path().join("missing.json"));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn from_file_returns_parse_error_for_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ count: ").unwrap();

        let result = FetchConfig::from_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_VERSION_COUNT + 1)]
    #[case(usize::MAX)]
    fn validate_rejects_out_of_range_count(#[case] count: usize) {
        let config = FetchConfig {
            count,
            ..FetchConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::InvalidCount(c)) if c == count));
    }

    #[test]
    fn validate_accepts_count_bounds() {
        for count in [1, DEFAULT_VERSION_COUNT, MAX_VERSION_COUNT] {
            let config = FetchConfig {
                count,
                ..FetchConfig::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn huge_count_from_file_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "count": 18446744073709551615 }"#).unwrap();

        let config = FetchConfig::from_file(&path).unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::InvalidCount(_))));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/edgedriver-fetch"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/edgedriver-fetch")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./edgedriver-fetch"));
    }
}
