//! bundle_test_tool library
//!
//! # Public API
//!
//! The primary public API is [`client::BundleMgrClient`], the proxy to the
//! bundle manager service. It also implements [`bundle_core::BundleInstaller`]
//! for the installer calls. Configuration types are available via
//! [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use bundle_test_tool::client::BundleMgrClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BundleMgrClient::with_config(
//!     "http://127.0.0.1:8620".to_string(),
//!     10,  // timeout in seconds
//!     3,   // max retries
//!     Duration::from_millis(500),  // initial retry delay
//! )?;
//!
//! let installed = client.is_bundle_installed("com.example.app", 100, 0).await?;
//! println!("installed: {}", installed);
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP proxy to the bundle manager service.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

// Option value parsers shared by the subcommands
#[doc(hidden)]
pub mod parse;

#[cfg(test)]
pub mod test_utils;
