//! Release discovery for msedgedriver
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐
//! │   Resolver   │────▶│   Registry   │
//! │ (candidates) │     │   (fetch)    │
//! └──────────────┘     └──────────────┘
//!        │                    │
//!        ▼                    ▼
//! ┌──────────────┐     ┌──────────────┐
//! │   Version    │     │  Registries  │
//! │ (major part) │     │   (edge)     │
//! └──────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`resolver`]: Builds the list of recent versions, latest first
//! - [`registry`]: Registry trait for fetching release identifiers
//! - [`registries`]: Concrete registry implementations
//! - [`release`]: Version string helpers
//! - [`error`]: Error types for registry and resolution failures

pub mod error;
pub mod registries;
pub mod registry;
pub mod release;
pub mod resolver;
