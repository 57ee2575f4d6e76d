//! Registry test utilities
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;

use edgedriver_fetch::version::error::RegistryError;
use edgedriver_fetch::version::registry::ReleaseRegistry;

/// In-memory release registry
pub struct StaticRegistry {
    latest: Option<String>,
    majors: HashMap<u64, String>,
}

impl StaticRegistry {
    pub fn new(latest: &str) -> Self {
        Self {
            latest: Some(latest.to_string()),
            majors: HashMap::new(),
        }
    }

    /// A registry whose latest release lookup always fails
    pub fn unreachable() -> Self {
        Self {
            latest: None,
            majors: HashMap::new(),
        }
    }

    pub fn with_major(mut self, major: u64, version: &str) -> Self {
        self.majors.insert(major, version.to_string());
        self
    }
}

#[async_trait]
impl ReleaseRegistry for StaticRegistry {
    async fn fetch_latest_release(&self) -> Result<String, RegistryError> {
        self.latest
            .clone()
            .ok_or_else(|| RegistryError::NotFound("LATEST_RELEASE".to_string()))
    }

    async fn fetch_latest_release_for_major(&self, major: u64) -> Result<String, RegistryError> {
        self.majors
            .get(&major)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("LATEST_RELEASE_{}", major)))
    }
}

/// Build a driver archive containing a single binary
pub fn driver_archive(binary_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file(binary_name, options).unwrap();
    writer.write_all(contents).unwrap();
    writer.finish().unwrap().into_inner()
}
