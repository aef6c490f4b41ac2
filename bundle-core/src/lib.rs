//! Bundle Manager Core Library
//!
//! Shared types, error codes, and result receivers for the bundle manager
//! tooling. This crate is used by both the `bundlemgrd` service and the
//! `bundle_test_tool` CLI.

pub mod api;
pub mod callbacks;
pub mod codes;
pub mod error;
pub mod installer;
pub mod status_receiver;
pub mod types;

// Re-export commonly used types
pub use callbacks::{ProcessCacheCallback, QuickFixStatusCallback, MAX_WAITING_TIME};
pub use codes::ErrCode;
pub use error::*;
pub use installer::{BundleInstaller, MockBundleInstallerHost, StreamInstallerId};
pub use status_receiver::{Completion, StatusReceiver, MINIMUM_WAITING_TIME};
pub use types::*;
