//! Download recent Microsoft Edge WebDriver releases.
//!
//! - [`version`]: release discovery (latest release plus previous major lines)
//! - [`driver`]: archive download, local cache, and copy to the output folder
//! - [`config`]: configuration file and data directory paths
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod driver;
pub mod logging;
pub mod version;
