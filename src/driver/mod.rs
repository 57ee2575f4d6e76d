//! Driver download and storage
//!
//! Turns a list of resolved versions into version-tagged driver binaries in
//! an output folder.
//!
//! # Modules
//!
//! - [`platform`]: Target platforms and the file names derived from them
//! - [`download`]: Archive download and binary extraction
//! - [`cache`]: SQLite record of previously downloaded binaries
//! - [`fetcher`]: Sequential fetch-and-store over a version list
//! - [`error`]: Error types for download and cache operations

pub mod cache;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod platform;
