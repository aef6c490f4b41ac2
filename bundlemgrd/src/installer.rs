//! Installer backed by the bundle registry
//!
//! Every request is applied to the registry and its outcome delivered to the
//! caller's [`StatusReceiver`], the way the real installer reports through
//! its status callback.

use crate::registry::BundleRegistry;
use async_trait::async_trait;
use bundle_core::codes::{ErrCode, ERR_OK};
use bundle_core::installer::MSG_SUCCESS;
use bundle_core::{
    BundleError, BundleInstaller, InstallParam, Result, StatusReceiver, StreamInstallerId,
    UninstallParam,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Applies installer requests to a shared [`BundleRegistry`]
#[derive(Clone)]
pub struct RegistryInstaller {
    registry: Arc<RwLock<BundleRegistry>>,
}

impl RegistryInstaller {
    pub fn new(registry: Arc<RwLock<BundleRegistry>>) -> Self {
        Self { registry }
    }
}

/// Report a registry outcome through the receiver.
fn deliver(receiver: &StatusReceiver, outcome: Result<()>) -> ErrCode {
    match outcome {
        Ok(()) => {
            receiver.on_finished(ERR_OK, MSG_SUCCESS);
            ERR_OK
        }
        Err(e) => {
            let code = e.err_code();
            let message = match &e {
                BundleError::Service { message, .. } => message.clone(),
                other => other.to_string(),
            };
            warn!("Installer request failed with {}: {}", code, message);
            receiver.on_finished(code, &message);
            code
        }
    }
}

#[async_trait]
impl BundleInstaller for RegistryInstaller {
    async fn install(
        &self,
        bundle_file_path: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let outcome = self
            .registry
            .write()
            .await
            .install_bundle(bundle_file_path, param);
        deliver(&receiver, outcome);
        true
    }

    async fn install_multiple(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let mut registry = self.registry.write().await;
        let outcome = bundle_file_paths
            .iter()
            .try_for_each(|path| registry.install_bundle(path, param));
        deliver(&receiver, outcome);
        true
    }

    async fn uninstall(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let outcome = self
            .registry
            .write()
            .await
            .uninstall_bundle(bundle_name, param);
        deliver(&receiver, outcome);
        true
    }

    async fn uninstall_module(
        &self,
        bundle_name: &str,
        module_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let outcome = self
            .registry
            .write()
            .await
            .uninstall_module(bundle_name, module_name, param);
        deliver(&receiver, outcome);
        true
    }

    async fn uninstall_with_param(
        &self,
        param: &UninstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let outcome = self.registry.write().await.uninstall_shared(param);
        deliver(&receiver, outcome);
        true
    }

    async fn recover(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let outcome = self.registry.write().await.recover(bundle_name, param);
        deliver(&receiver, outcome);
        true
    }

    async fn stream_install(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> ErrCode {
        debug!("stream install of {} files", bundle_file_paths.len());
        let mut registry = self.registry.write().await;
        let outcome = bundle_file_paths
            .iter()
            .try_for_each(|path| registry.install_bundle(path, param));
        deliver(&receiver, outcome)
    }

    async fn install_sandbox_app(
        &self,
        bundle_name: &str,
        dlp_type: i32,
        user_id: i32,
    ) -> Result<i32> {
        self.registry
            .write()
            .await
            .install_sandbox_app(bundle_name, dlp_type, user_id)
    }

    async fn uninstall_sandbox_app(
        &self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> Result<()> {
        self.registry
            .write()
            .await
            .uninstall_sandbox_app(bundle_name, app_index, user_id)
    }

    async fn create_stream_installer(
        &self,
        param: &InstallParam,
        _receiver: Arc<StatusReceiver>,
        origin_hap_paths: &[String],
    ) -> Option<StreamInstallerId> {
        debug!(
            "create stream installer for user {} with {} origin paths",
            param.user_id,
            origin_hap_paths.len()
        );
        Some(self.registry.write().await.create_stream_installer())
    }

    async fn destroy_stream_installer(&self, id: StreamInstallerId) -> bool {
        self.registry.write().await.destroy_stream_installer(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_core::codes::{
        ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE, ERR_UNINSTALL_SYSTEM_APP_ERROR,
    };
    use std::time::Duration;

    fn installer() -> (RegistryInstaller, Arc<RwLock<BundleRegistry>>) {
        let registry = Arc::new(RwLock::new(BundleRegistry::builtin()));
        (RegistryInstaller::new(registry.clone()), registry)
    }

    fn receiver() -> Arc<StatusReceiver> {
        Arc::new(StatusReceiver::with_wait_time(Duration::from_millis(100)))
    }

    #[tokio::test]
    async fn test_install_then_uninstall_reports_through_receiver() {
        let (installer, registry) = installer();
        let param = InstallParam::default();

        let r = receiver();
        assert!(installer.install("/data/com.example.new.hap", &param, r.clone()).await);
        assert_eq!(r.result_code().await, ERR_OK);
        assert!(registry
            .read()
            .await
            .is_bundle_installed("com.example.new", 100, 0)
            .unwrap());

        let r = receiver();
        installer.uninstall("com.example.new", &param, r.clone()).await;
        assert_eq!(r.result_code().await, ERR_OK);
        assert_eq!(r.result_msg().await, MSG_SUCCESS);

        let r = receiver();
        installer.uninstall("com.example.new", &param, r.clone()).await;
        assert_eq!(r.result_code().await, ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE);
        assert!(!r.result_msg().await.is_empty());
    }

    #[tokio::test]
    async fn test_system_app_uninstall_is_refused() {
        let (installer, _) = installer();
        let r = receiver();
        installer
            .uninstall("com.ohos.settings", &InstallParam::default(), r.clone())
            .await;
        assert_eq!(r.result_code().await, ERR_UNINSTALL_SYSTEM_APP_ERROR);
    }

    #[tokio::test]
    async fn test_stream_install_returns_code() {
        let (installer, _) = installer();
        let r = receiver();
        let code = installer
            .stream_install(&["/data/bad.txt".to_string()], &InstallParam::default(), r.clone())
            .await;
        assert_ne!(code, ERR_OK);
        assert_eq!(r.result_code().await, code);

        let id = installer
            .create_stream_installer(&InstallParam::default(), receiver(), &[])
            .await
            .unwrap();
        assert!(installer.destroy_stream_installer(id).await);
    }

    #[tokio::test]
    async fn test_sandbox_through_installer() {
        let (installer, _) = installer();
        let index = installer
            .install_sandbox_app("com.example.notes", 1, 100)
            .await
            .unwrap();
        installer
            .uninstall_sandbox_app("com.example.notes", index, 100)
            .await
            .unwrap();
        assert!(installer
            .uninstall_sandbox_app("com.example.notes", index, 100)
            .await
            .is_err());
    }
}
