//! Target platforms published by the msedgedriver release server

use serde::Deserialize;

/// Base name of the driver executable inside every archive
const DRIVER_NAME: &str = "msedgedriver";

/// Platform an msedgedriver build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Platform {
    /// Windows x64 (edgedriver_win64.zip)
    #[serde(rename = "win64")]
    Win64,
    /// Windows x86 (edgedriver_win32.zip)
    #[serde(rename = "win32")]
    Win32,
    /// Windows on ARM (edgedriver_arm64.zip)
    #[serde(rename = "arm64")]
    Arm64,
    /// macOS Intel (edgedriver_mac64.zip)
    #[serde(rename = "mac64")]
    Mac64,
    /// macOS Apple silicon (edgedriver_mac64_m1.zip)
    #[serde(rename = "mac64_m1")]
    MacM1,
    /// Linux x64 (edgedriver_linux64.zip)
    #[serde(rename = "linux64")]
    Linux64,
}

impl Platform {
    /// Returns the string representation used in archive names
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Win64 => "win64",
            Platform::Win32 => "win32",
            Platform::Arm64 => "arm64",
            Platform::Mac64 => "mac64",
            Platform::MacM1 => "mac64_m1",
            Platform::Linux64 => "linux64",
        }
    }

    /// Platform of the running host
    pub fn current() -> Self {
        Self::detect(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn detect(os: &str, arch: &str) -> Self {
        match (os, arch) {
            ("windows", "x86") => Platform::Win32,
            ("windows", "aarch64") => Platform::Arm64,
            ("windows", _) => Platform::Win64,
            ("macos", "aarch64") => Platform::MacM1,
            ("macos", _) => Platform::Mac64,
            _ => Platform::Linux64,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Win64 | Platform::Win32 | Platform::Arm64)
    }

    /// File extension of the driver executable, including the dot
    pub fn executable_extension(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Name of the archive published for a version
    pub fn archive_name(&self) -> String {
        format!("edgedriver_{}.zip", self.as_str())
    }

    /// Name of the driver executable inside the archive
    pub fn binary_name(&self) -> String {
        format!("{}{}", DRIVER_NAME, self.executable_extension())
    }

    /// Version-tagged file name the driver is stored under
    ///
    /// e.g. `msedgedriver_120.0.2210.91.exe`
    pub fn tagged_binary_name(&self, version: &str) -> String {
        format!(
            "{}_{}{}",
            DRIVER_NAME,
            version,
            self.executable_extension()
        )
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win64" => Ok(Platform::Win64),
            "win32" => Ok(Platform::Win32),
            "arm64" => Ok(Platform::Arm64),
            "mac64" => Ok(Platform::Mac64),
            "mac64_m1" => Ok(Platform::MacM1),
            "linux64" => Ok(Platform::Linux64),
            _ => Err(format!(
                "unknown platform '{}' (expected win64, win32, arm64, mac64, mac64_m1 or linux64)",
                s
            )),
        }
    }
}
