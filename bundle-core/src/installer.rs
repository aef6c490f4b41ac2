//! Installer service interface and its always-succeeding mock

use crate::codes::{ErrCode, ERR_OK};
use crate::error::Result;
use crate::status_receiver::StatusReceiver;
use crate::types::{InstallParam, UninstallParam, INITIAL_SANDBOX_APP_INDEX};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Identifier of a stream installer session
pub type StreamInstallerId = u32;

/// Message delivered by successful installer operations
pub const MSG_SUCCESS: &str = "success";

/// Installer side of the bundle manager.
///
/// Methods taking a [`StatusReceiver`] report their outcome through it and
/// return whether the request was dispatched. The sandbox and stream installer
/// methods answer directly.
#[async_trait]
pub trait BundleInstaller: Send + Sync {
    async fn install(
        &self,
        bundle_file_path: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn install_multiple(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn uninstall(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn uninstall_module(
        &self,
        bundle_name: &str,
        module_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn uninstall_with_param(
        &self,
        param: &UninstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn recover(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool;

    async fn stream_install(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> ErrCode;

    /// Install a sandbox clone of `bundle_name`, returning its app index.
    async fn install_sandbox_app(&self, bundle_name: &str, dlp_type: i32, user_id: i32)
        -> Result<i32>;

    async fn uninstall_sandbox_app(
        &self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> Result<()>;

    async fn create_stream_installer(
        &self,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
        origin_hap_paths: &[String],
    ) -> Option<StreamInstallerId>;

    async fn destroy_stream_installer(&self, id: StreamInstallerId) -> bool;
}

/// Installer that accepts every request and reports success.
///
/// Used wherever an installer must exist but its behavior is not under test.
#[derive(Debug)]
pub struct MockBundleInstallerHost;

impl MockBundleInstallerHost {
    pub fn new() -> Self {
        info!("create mock bundle installer host instance");
        Self
    }
}

impl Default for MockBundleInstallerHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BundleInstaller for MockBundleInstallerHost {
    async fn install(
        &self,
        bundle_file_path: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        info!("install {} for user {}", bundle_file_path, param.user_id);
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn install_multiple(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        for path in bundle_file_paths {
            info!("install {} for user {}", path, param.user_id);
        }
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn uninstall(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        info!("uninstall {} for user {}", bundle_name, param.user_id);
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn uninstall_module(
        &self,
        bundle_name: &str,
        module_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        info!("uninstall module {} of {} for user {}", module_name, bundle_name, param.user_id);
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn uninstall_with_param(
        &self,
        param: &UninstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        info!("uninstall shared bundle {}", param.bundle_name);
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn recover(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        debug!("recover {} for user {}", bundle_name, param.user_id);
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        true
    }

    async fn stream_install(
        &self,
        _bundle_file_paths: &[String],
        _param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> ErrCode {
        debug!("stream install");
        receiver.on_finished(ERR_OK, MSG_SUCCESS);
        ERR_OK
    }

    async fn install_sandbox_app(
        &self,
        _bundle_name: &str,
        _dlp_type: i32,
        _user_id: i32,
    ) -> Result<i32> {
        Ok(INITIAL_SANDBOX_APP_INDEX + 1)
    }

    async fn uninstall_sandbox_app(
        &self,
        _bundle_name: &str,
        _app_index: i32,
        _user_id: i32,
    ) -> Result<()> {
        Ok(())
    }

    async fn create_stream_installer(
        &self,
        _param: &InstallParam,
        _receiver: Arc<StatusReceiver>,
        _origin_hap_paths: &[String],
    ) -> Option<StreamInstallerId> {
        None
    }

    async fn destroy_stream_installer(&self, _id: StreamInstallerId) -> bool {
        true
    }
}
