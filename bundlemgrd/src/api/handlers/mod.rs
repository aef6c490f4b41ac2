//! API request handlers for the bundle manager REST API.
//!
//! # Handler Modules
//!
//! - [`info`] - Service information and root endpoint
//! - [`abilities`] - Abilities, modules, resources, profiles and proxy data
//! - [`app_control`] - Install and running control rules
//! - [`quick_fix`] - Quick fix patches and debug mode
//! - [`stats`] - Storage statistics, provisioning and bundle cache
//! - [`events`] - Bundle event callbacks, AOT status and common events
//! - [`bundles`] - Bundle identity, data groups and directories
//! - [`installer`] - Installer proxy
//!
//! # API Structure
//!
//! All handlers follow the same pattern:
//! - Accept `State<AppState>` for the shared registry
//! - Accept a [`Caller`](crate::api::Caller) when the call depends on who asks
//! - Return `Result<Json<ApiResponse<T>>, ApiError>`; registry failures become
//!   error envelopes carrying the service code

pub mod abilities;
pub mod app_control;
pub mod bundles;
pub mod events;
pub mod info;
pub mod installer;
pub mod quick_fix;
pub mod stats;
