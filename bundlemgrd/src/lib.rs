//! Bundle manager service
//!
//! An axum server answering the bundle manager and installer proxy calls of
//! `bundle_test_tool` from an in-memory fixture registry. The library half is
//! used by the CLI's integration tests to serve the same router in-process.

pub mod api;
pub mod installer;
pub mod registry;

pub use api::{create_router, AppState};
pub use installer::RegistryInstaller;
pub use registry::{BundleRegistry, Fixtures};
