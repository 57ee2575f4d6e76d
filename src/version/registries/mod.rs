//! Registry implementations for fetching release identifiers

pub mod edge;

pub use edge::EdgeDriverRegistry;
