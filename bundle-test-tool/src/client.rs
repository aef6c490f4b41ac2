//! HTTP proxy for the bundle manager service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bundle_core::api::{
    self, AppIdQuery, AppIdentifierResponse, BatchStatsRequest, BundleNameRequest, BundleQuery,
    CheckAbilityRequest, CleanCacheRequest, CommonEventRequest, ContinueTypeQuery,
    CopyFilesRequest, CreateStreamInstallerRequest, DataGroupDirQuery, DebugModeRequest,
    DeployQuickFixRequest, DestroyStreamInstallerRequest, DistributedNameQuery,
    DistributionTypesRequest, EncryptedStatusRequest, ExtNameOrMimeRequest, ImplicitQueryRequest,
    InstallRequest, InstallRuleQuery, InstallRuleRequest, ModuleQuery, ProfileQuery,
    RecoverRequest, ResetAotRequest, ResourceQuery, RunningRuleRequest, SandboxInstallRequest,
    SandboxInstallResponse, SandboxUninstallRequest, SetRemovableRequest, SimpleAppInfoRequest,
    SwitchQuickFixRequest, TokenQuery, UidQuery, UninstallRequest, UninstallWithParamRequest,
    UserQuery, UserRequest, CALLER_UID_HEADER,
};
use bundle_core::codes::{
    ErrCode, ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED, ERR_FAILED_SERVICE_DIED, ERR_OK,
};
use bundle_core::{
    AbilityInfo, AppDistributionType, AppProvisionInfo, AppRunningControlRule,
    AppRunningControlRuleResult, BundleDir, BundleError, BundleInfo, BundleInstaller,
    BundleStorageStats, DataGroupInfo, InstallParam, ProcessCacheCallback, ProxyData,
    QuickFixResult, QuickFixStatusCallback, SimpleAppInfo, StatusReceiver, StatusResult,
    StreamInstallerId, UninstallParam, Want,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Split a service-level failure off a proxy call result.
///
/// Transport and decoding failures stay in the outer `Result`; a service that
/// answered with an error code yields `Ok(Err(code))`.
pub trait ServiceResultExt<T> {
    fn into_service_result(self) -> Result<std::result::Result<T, ErrCode>>;
}

impl<T> ServiceResultExt<T> for Result<T> {
    fn into_service_result(self) -> Result<std::result::Result<T, ErrCode>> {
        match self {
            Ok(value) => Ok(Ok(value)),
            Err(err) => match err.downcast_ref::<BundleError>() {
                Some(BundleError::Service { code, .. }) => Ok(Err(*code)),
                _ => Err(err),
            },
        }
    }
}

/// HTTP client standing in for the bundle manager proxy.
///
/// Every proxy method maps to one `/api/v0` endpoint of the service. The
/// client handles:
/// - Automatic retries on connection failures
/// - Timeout handling
/// - JSON serialization/deserialization
/// - Error envelope processing
///
/// # Caller identity
///
/// Requests are made on behalf of a caller uid, sent in the
/// [`CALLER_UID_HEADER`] header. It defaults to `0`; use
/// [`BundleMgrClient::with_caller`] to act as another uid.
///
/// # Retry Logic
///
/// Requests failing with a connection, timeout or generic request error are
/// retried, with the delay growing on each attempt. Responses carrying an
/// HTTP error status are never retried.
///
/// # Examples
///
/// ```no_run
/// use bundle_test_tool::client::BundleMgrClient;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = BundleMgrClient::with_config(
///     "http://127.0.0.1:8620".to_string(),
///     10,  // timeout in seconds
///     3,   // max retries
///     Duration::from_millis(500),  // initial retry delay
/// )?;
///
/// let info = client.get_info().await?;
/// println!("Service version: {}", info.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BundleMgrClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
    caller_uid: i32,
}

impl BundleMgrClient {
    /// Create a new client with custom configuration.
    ///
    /// Nothing is sent to the service until the first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(
        server_url: String,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("bundle_test_tool/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_url(&server_url),
            max_retries,
            retry_delay,
            caller_uid: 0,
        })
    }

    /// A copy of this client acting as `uid`.
    pub fn with_caller(&self, uid: i32) -> Self {
        Self {
            caller_uid: uid,
            ..self.clone()
        }
    }

    /// Uid requests are made on behalf of
    pub fn caller_uid(&self) -> i32 {
        self.caller_uid
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process an HTTP response and extract the API data.
    ///
    /// An error envelope becomes a [`BundleError::Service`] carrying the
    /// service code, whatever the HTTP status. Other failures are described
    /// from the status code.
    async fn handle_response<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if let Ok(api::ApiResponse::Error { code, error }) =
            serde_json::from_str::<api::ApiResponse<serde_json::Value>>(&text)
        {
            debug!("{} answered with code {}: {}", endpoint, code, error);
            return Err(BundleError::Service {
                code,
                message: error,
            }
            .into());
        }

        if !status.is_success() {
            let error_msg = match status {
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::BAD_REQUEST => format!("Bad request to {}: {}", endpoint, text),
                StatusCode::UNAUTHORIZED => format!("Unauthorized access to {}", endpoint),
                StatusCode::FORBIDDEN => format!("Access forbidden to {}", endpoint),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Server error at {}: {}", endpoint, text)
                }
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(anyhow::anyhow!(error_msg));
        }

        let api_response: api::ApiResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        match api_response {
            api::ApiResponse::Success { data } => Ok(data),
            api::ApiResponse::Error { code, error } => Err(BundleError::Service {
                code,
                message: error,
            }
            .into()),
        }
    }

    /// Execute an HTTP request with automatic retry logic.
    ///
    /// Only connection-related errors are retried. The delay grows with each
    /// attempt (`delay * (attempt + 1)`).
    async fn execute_with_retry<F, Fut, T>(&self, endpoint: &str, request_fn: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            match request_fn().await {
                Ok(response) => return Self::handle_response(response, endpoint).await,
                Err(e) => {
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    if attempt < self.max_retries && should_retry {
                        debug!("Request to {} failed, retrying: {}", endpoint, e);
                        tokio::time::sleep(self.retry_delay * (attempt + 1)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(anyhow::anyhow!(
                        "Failed to reach {} after {} attempts: {}",
                        endpoint,
                        attempt + 1,
                        e
                    ));
                }
            }
        }
    }

    fn with_caller_header(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(CALLER_UID_HEADER, self.caller_uid)
    }

    async fn get<T, Q>(&self, endpoint: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = format!("{}/api/v0/{}", self.base_url, endpoint);
        self.execute_with_retry(endpoint, || {
            self.with_caller_header(self.client.get(&url).query(query))
                .send()
        })
        .await
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/api/v0/{}", self.base_url, endpoint);
        self.execute_with_retry(endpoint, || {
            self.with_caller_header(self.client.post(&url).json(body))
                .send()
        })
        .await
    }

    /// Retrieve service information.
    pub async fn get_info(&self) -> Result<api::InfoResponse> {
        let url = format!("{}/api/v0/info", self.base_url);
        self.execute_with_retry("info", || self.client.get(&url).send())
            .await
    }

    // Abilities, modules and resources

    pub async fn check_ability_enable_install(
        &self,
        want: &Want,
        flag: i32,
        user_id: i32,
    ) -> Result<bool> {
        self.post(
            "ability/check",
            &CheckAbilityRequest {
                want: want.clone(),
                flag,
                user_id,
            },
        )
        .await
    }

    pub async fn set_module_removable(
        &self,
        bundle_name: &str,
        module_name: &str,
        removable: bool,
    ) -> Result<bool> {
        self.post(
            "module/removable",
            &SetRemovableRequest {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                removable,
            },
        )
        .await
    }

    pub async fn is_module_removable(&self, bundle_name: &str, module_name: &str) -> Result<bool> {
        self.get(
            "module/removable",
            &ModuleQuery {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                user_id: None,
            },
        )
        .await
    }

    /// Label string of a module resource; empty when it has none.
    pub async fn get_string_by_id(
        &self,
        bundle_name: &str,
        module_name: &str,
        id: u32,
        user_id: i32,
    ) -> Result<String> {
        self.get(
            "resource/string",
            &ResourceQuery {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                id,
                density: 0,
                user_id,
            },
        )
        .await
    }

    /// Base64 icon of a module resource at `density`; empty when it has none.
    pub async fn get_icon_by_id(
        &self,
        bundle_name: &str,
        module_name: &str,
        id: u32,
        density: u32,
        user_id: i32,
    ) -> Result<String> {
        self.get(
            "resource/icon",
            &ResourceQuery {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                id,
                density,
                user_id,
            },
        )
        .await
    }

    pub async fn get_proxy_data_infos(
        &self,
        bundle_name: &str,
        module_name: &str,
        user_id: i32,
    ) -> Result<Vec<ProxyData>> {
        self.get(
            "proxy-data",
            &ModuleQuery {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                user_id: Some(user_id),
            },
        )
        .await
    }

    pub async fn get_all_proxy_data_infos(&self, user_id: i32) -> Result<Vec<ProxyData>> {
        self.get("proxy-data/all", &UserQuery { user_id }).await
    }

    pub async fn set_ext_name_or_mime_to_app(&self, request: &ExtNameOrMimeRequest) -> Result<()> {
        self.post("ext-mime/set", request).await
    }

    pub async fn del_ext_name_or_mime_to_app(&self, request: &ExtNameOrMimeRequest) -> Result<()> {
        self.post("ext-mime/delete", request).await
    }

    pub async fn get_json_profile(
        &self,
        profile_type: i32,
        bundle_name: &str,
        module_name: &str,
        user_id: i32,
    ) -> Result<String> {
        self.get(
            "profile/json",
            &ProfileQuery {
                profile_type,
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                user_id,
            },
        )
        .await
    }

    /// Abilities matching `want`, each carrying the skill uris that matched.
    pub async fn implicit_query_info(
        &self,
        want: &Want,
        flags: i32,
        user_id: i32,
    ) -> Result<Vec<AbilityInfo>> {
        self.post(
            "ability/implicit-query",
            &ImplicitQueryRequest {
                want: want.clone(),
                flags,
                user_id,
            },
        )
        .await
    }

    pub async fn query_ability_info_by_continue_type(
        &self,
        bundle_name: &str,
        continue_type: &str,
        user_id: i32,
    ) -> Result<AbilityInfo> {
        self.get(
            "ability/continue-type",
            &ContinueTypeQuery {
                bundle_name: bundle_name.to_string(),
                continue_type: continue_type.to_string(),
                user_id,
            },
        )
        .await
    }

    // App control rules

    pub async fn add_app_install_control_rule(
        &self,
        app_ids: &[String],
        rule_type: i32,
        user_id: i32,
    ) -> Result<()> {
        self.post(
            "app-control/install-rule/add",
            &InstallRuleRequest {
                app_ids: app_ids.to_vec(),
                rule_type,
                user_id,
            },
        )
        .await
    }

    pub async fn get_app_install_control_rule(
        &self,
        rule_type: i32,
        user_id: i32,
    ) -> Result<Vec<String>> {
        self.get(
            "app-control/install-rule",
            &InstallRuleQuery { rule_type, user_id },
        )
        .await
    }

    pub async fn delete_app_install_control_rule(
        &self,
        rule_type: i32,
        app_ids: &[String],
        user_id: i32,
    ) -> Result<()> {
        self.post(
            "app-control/install-rule/delete",
            &InstallRuleRequest {
                app_ids: app_ids.to_vec(),
                rule_type,
                user_id,
            },
        )
        .await
    }

    pub async fn clean_app_install_control_rule(&self, rule_type: i32, user_id: i32) -> Result<()> {
        self.post(
            "app-control/install-rule/clean",
            &InstallRuleRequest {
                app_ids: Vec::new(),
                rule_type,
                user_id,
            },
        )
        .await
    }

    pub async fn add_app_running_control_rule(
        &self,
        rules: &[AppRunningControlRule],
        user_id: i32,
    ) -> Result<()> {
        self.post(
            "app-control/running-rule/add",
            &RunningRuleRequest {
                rules: rules.to_vec(),
                user_id,
            },
        )
        .await
    }

    pub async fn delete_app_running_control_rule(
        &self,
        rules: &[AppRunningControlRule],
        user_id: i32,
    ) -> Result<()> {
        self.post(
            "app-control/running-rule/delete",
            &RunningRuleRequest {
                rules: rules.to_vec(),
                user_id,
            },
        )
        .await
    }

    pub async fn clean_app_running_control_rule(&self, user_id: i32) -> Result<()> {
        self.post("app-control/running-rule/clean", &UserRequest { user_id })
            .await
    }

    pub async fn get_app_running_control_rule(&self, user_id: i32) -> Result<Vec<String>> {
        self.get("app-control/running-rule", &UserQuery { user_id })
            .await
    }

    pub async fn get_app_running_control_rule_result(
        &self,
        bundle_name: &str,
        user_id: i32,
    ) -> Result<AppRunningControlRuleResult> {
        self.get(
            "app-control/running-rule/result",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: None,
            },
        )
        .await
    }

    // Quick fix and debug mode

    /// Copy patch files into the service's staging directory.
    pub async fn copy_files(&self, source_files: &[String]) -> Result<Vec<String>> {
        self.post(
            "quick-fix/copy",
            &CopyFilesRequest {
                source_files: source_files.to_vec(),
            },
        )
        .await
    }

    /// Deploy staged patch files. The outcome reaches `callback`.
    pub fn deploy_quick_fix(
        &self,
        bundle_file_paths: &[String],
        callback: Arc<QuickFixStatusCallback>,
        is_debug: bool,
    ) -> ErrCode {
        let request = DeployQuickFixRequest {
            bundle_file_paths: bundle_file_paths.to_vec(),
            is_debug,
        };
        self.spawn_quick_fix("quick-fix/deploy", request, callback, |cb, result| {
            cb.on_patch_deployed(result)
        })
    }

    pub fn switch_quick_fix(
        &self,
        bundle_name: &str,
        enable: bool,
        callback: Arc<QuickFixStatusCallback>,
    ) -> ErrCode {
        let request = SwitchQuickFixRequest {
            bundle_name: bundle_name.to_string(),
            enable,
        };
        self.spawn_quick_fix("quick-fix/switch", request, callback, |cb, result| {
            cb.on_patch_switched(result)
        })
    }

    pub fn delete_quick_fix(
        &self,
        bundle_name: &str,
        callback: Arc<QuickFixStatusCallback>,
    ) -> ErrCode {
        let request = BundleNameRequest {
            bundle_name: bundle_name.to_string(),
        };
        self.spawn_quick_fix("quick-fix/delete", request, callback, |cb, result| {
            cb.on_patch_deleted(result)
        })
    }

    /// Run a quick fix request in the background, delivering its outcome to
    /// `callback`. A lost connection is delivered as a dead service.
    fn spawn_quick_fix<B, F>(
        &self,
        endpoint: &'static str,
        request: B,
        callback: Arc<QuickFixStatusCallback>,
        deliver: F,
    ) -> ErrCode
    where
        B: Serialize + Send + Sync + 'static,
        F: FnOnce(&QuickFixStatusCallback, QuickFixResult) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let response: Result<QuickFixResult> = client.post(endpoint, &request).await;
            match response.into_service_result() {
                Ok(Ok(result)) => deliver(&callback, result),
                Ok(Err(code)) => callback.on_failed(code),
                Err(e) => {
                    warn!("Lost connection during {}: {}", endpoint, e);
                    callback.on_failed(ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED);
                }
            }
        });
        ERR_OK
    }

    pub async fn set_debug_mode(&self, enable: bool) -> Result<()> {
        self.post("debug-mode", &DebugModeRequest { enable }).await
    }

    // Storage and cache

    /// Five sizes: app data, user data, distributed data, database and cache.
    pub async fn get_bundle_stats(
        &self,
        bundle_name: &str,
        user_id: i32,
        app_index: i32,
    ) -> Result<Vec<i64>> {
        self.get(
            "bundle/stats",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: Some(app_index),
            },
        )
        .await
    }

    pub async fn batch_get_bundle_stats(
        &self,
        bundle_names: &[String],
        user_id: i32,
    ) -> Result<Vec<BundleStorageStats>> {
        self.post(
            "bundle/stats/batch",
            &BatchStatsRequest {
                bundle_names: bundle_names.to_vec(),
                user_id,
            },
        )
        .await
    }

    pub async fn get_app_provision_info(
        &self,
        bundle_name: &str,
        user_id: i32,
    ) -> Result<AppProvisionInfo> {
        self.get(
            "bundle/provision",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: None,
            },
        )
        .await
    }

    pub async fn get_distributed_bundle_name(
        &self,
        network_id: &str,
        access_token_id: u32,
    ) -> Result<String> {
        self.get(
            "bundle/distributed-name",
            &DistributedNameQuery {
                network_id: network_id.to_string(),
                access_token_id,
            },
        )
        .await
    }

    /// Clean caches until `cache_size` bytes are freed; returns the bytes freed.
    pub async fn clean_bundle_cache_files_automatic(&self, cache_size: u64) -> Result<u64> {
        self.post("cache/clean-automatic", &CleanCacheRequest { cache_size })
            .await
    }

    /// Ask for the total cache size of all bundles.
    ///
    /// The returned code is the one of the call itself; on `ERR_OK` the size
    /// reaches `callback`.
    pub async fn get_all_bundle_cache_stat(&self, callback: Arc<ProcessCacheCallback>) -> ErrCode {
        let response: Result<u64> = self.get("cache/stat", &()).await;
        match response.into_service_result() {
            Ok(Ok(size)) => {
                callback.on_get_all_bundle_cache_finished(size);
                ERR_OK
            }
            Ok(Err(code)) => code,
            Err(e) => {
                warn!("Lost connection during cache/stat: {}", e);
                ERR_FAILED_SERVICE_DIED
            }
        }
    }

    pub async fn clean_all_bundle_cache(&self, callback: Arc<ProcessCacheCallback>) -> ErrCode {
        let response: Result<i32> = self.post("cache/clean", &()).await;
        match response.into_service_result() {
            Ok(Ok(result)) => {
                callback.on_clean_all_bundle_cache_finished(result);
                ERR_OK
            }
            Ok(Err(code)) => code,
            Err(e) => {
                warn!("Lost connection during cache/clean: {}", e);
                ERR_FAILED_SERVICE_DIED
            }
        }
    }

    // Events

    pub async fn register_bundle_event_callback(&self) -> Result<bool> {
        self.post("event-callback/register", &()).await
    }

    pub async fn unregister_bundle_event_callback(&self) -> Result<bool> {
        self.post("event-callback/unregister", &()).await
    }

    /// Reset the AOT compile status of a module, acting as the caller uid.
    pub async fn reset_aot_compile_status(
        &self,
        bundle_name: &str,
        module_name: &str,
        trigger_mode: i32,
    ) -> Result<()> {
        self.post(
            "aot/reset",
            &ResetAotRequest {
                bundle_name: bundle_name.to_string(),
                module_name: module_name.to_string(),
                trigger_mode,
                uid: self.caller_uid,
            },
        )
        .await
    }

    pub async fn publish_common_event(&self, action: &str) -> Result<()> {
        self.post(
            "common-event",
            &CommonEventRequest {
                action: action.to_string(),
            },
        )
        .await
    }

    // Bundle identity, data groups and directories

    pub async fn get_continue_bundle_names(
        &self,
        bundle_name: &str,
        user_id: i32,
    ) -> Result<Vec<String>> {
        self.get(
            "bundle/continue-names",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: None,
            },
        )
        .await
    }

    pub async fn get_sandbox_bundle_info(
        &self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> Result<BundleInfo> {
        self.get(
            "bundle/sandbox-info",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: Some(app_index),
            },
        )
        .await
    }

    pub async fn get_uninstalled_bundle_info(&self, bundle_name: &str) -> Result<BundleInfo> {
        self.get(
            "bundle/uninstalled",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                ..Default::default()
            },
        )
        .await
    }

    /// Uid of a bundle, `-1` when it is not installed.
    pub async fn get_uid_by_bundle_name(
        &self,
        bundle_name: &str,
        user_id: i32,
        app_index: i32,
    ) -> Result<i32> {
        self.get(
            "bundle/uid",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: Some(app_index),
            },
        )
        .await
    }

    pub async fn update_app_encrypted_status(
        &self,
        bundle_name: &str,
        is_existed: bool,
        app_index: i32,
    ) -> Result<()> {
        self.post(
            "bundle/encrypted-status",
            &EncryptedStatusRequest {
                bundle_name: bundle_name.to_string(),
                is_existed,
                app_index,
            },
        )
        .await
    }

    pub async fn is_bundle_installed(
        &self,
        bundle_name: &str,
        user_id: i32,
        app_index: i32,
    ) -> Result<bool> {
        self.get(
            "bundle/installed",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: Some(app_index),
            },
        )
        .await
    }

    pub async fn get_compatible_device_type(&self, bundle_name: &str) -> Result<String> {
        self.get(
            "bundle/device-type",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn get_bundle_name_by_app_id(&self, app_id: &str) -> Result<String> {
        self.get(
            "bundle/by-app-id",
            &AppIdQuery {
                app_id: app_id.to_string(),
            },
        )
        .await
    }

    pub async fn get_asset_access_groups(&self, bundle_name: &str) -> Result<Vec<String>> {
        self.get(
            "bundle/asset-groups",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn get_dir_by_bundle_name_and_app_index(
        &self,
        bundle_name: &str,
        app_index: i32,
    ) -> Result<String> {
        self.get(
            "bundle/dir",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: None,
                app_index: Some(app_index),
            },
        )
        .await
    }

    pub async fn get_all_bundle_dirs(&self, user_id: i32) -> Result<Vec<BundleDir>> {
        self.get("bundle/dirs", &UserQuery { user_id }).await
    }

    pub async fn query_data_group_infos(
        &self,
        bundle_name: &str,
        user_id: i32,
    ) -> Result<Vec<DataGroupInfo>> {
        self.get(
            "data-group/infos",
            &BundleQuery {
                bundle_name: bundle_name.to_string(),
                user_id: Some(user_id),
                app_index: None,
            },
        )
        .await
    }

    pub async fn get_group_dir(&self, data_group_id: &str) -> Result<String> {
        self.get(
            "data-group/dir",
            &DataGroupDirQuery {
                data_group_id: data_group_id.to_string(),
            },
        )
        .await
    }

    /// Odid of the bundle owning the caller uid.
    pub async fn get_odid(&self) -> Result<String> {
        self.get("odid", &()).await
    }

    pub async fn get_simple_app_info_for_uid(&self, uids: &[i32]) -> Result<Vec<SimpleAppInfo>> {
        self.post(
            "uid/simple-app-infos",
            &SimpleAppInfoRequest {
                uids: uids.to_vec(),
            },
        )
        .await
    }

    pub async fn get_bundle_names_for_uid_ext(&self, uid: i32) -> Result<Vec<String>> {
        self.get("uid/bundle-names", &UidQuery { uid }).await
    }

    pub async fn get_app_identifier_and_app_index(
        &self,
        access_token_id: u32,
    ) -> Result<AppIdentifierResponse> {
        self.get("app-identifier", &TokenQuery { access_token_id })
            .await
    }

    pub async fn set_app_distribution_types(&self, types: &[AppDistributionType]) -> Result<()> {
        self.post(
            "distribution-types",
            &DistributionTypesRequest {
                types: types.to_vec(),
            },
        )
        .await
    }

    // Installer

    /// Post an installer request and deliver its status to `receiver`.
    ///
    /// A service error code is delivered as the status; a lost connection is
    /// delivered as a dead service.
    async fn deliver_status<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        receiver: &StatusReceiver,
    ) {
        let response: Result<StatusResult> = self.post(endpoint, body).await;
        match response {
            Ok(status) => receiver.on_finished(status.code, &status.message),
            Err(e) => match e.downcast_ref::<BundleError>() {
                Some(BundleError::Service { code, message }) => {
                    receiver.on_finished(*code, message)
                }
                _ => {
                    warn!("Lost connection during {}: {}", endpoint, e);
                    receiver.on_finished(ERR_FAILED_SERVICE_DIED, &e.to_string());
                }
            },
        }
    }

    /// Check basic connectivity to the service.
    ///
    /// Returns `false` when the service cannot be reached.
    pub async fn ping(&self) -> Result<bool> {
        let url = format!("{}/", self.base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("Failed to create ping client")?;

        match client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!("Ping failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Perform a health check on the service.
    ///
    /// The map contains `connected`, `ping_ms` and, when connected,
    /// `api_working` plus either the service details or `api_error`.
    pub async fn health_check(&self) -> Result<HashMap<String, serde_json::Value>> {
        let mut health = HashMap::new();

        let ping_start = std::time::Instant::now();
        let ping_success = self.ping().await?;
        let ping_duration = ping_start.elapsed();

        health.insert(
            "connected".to_string(),
            serde_json::Value::Bool(ping_success),
        );
        health.insert(
            "ping_ms".to_string(),
            serde_json::Value::Number(serde_json::Number::from(ping_duration.as_millis() as u64)),
        );

        if ping_success {
            match self.get_info().await {
                Ok(info) => {
                    health.insert("api_working".to_string(), serde_json::Value::Bool(true));
                    health.insert(
                        "server_version".to_string(),
                        serde_json::Value::String(info.version),
                    );
                    health.insert(
                        "bundle_count".to_string(),
                        serde_json::Value::Number(serde_json::Number::from(info.bundle_count)),
                    );
                    health.insert(
                        "installer".to_string(),
                        serde_json::Value::String(info.installer),
                    );
                }
                Err(e) => {
                    health.insert("api_working".to_string(), serde_json::Value::Bool(false));
                    health.insert(
                        "api_error".to_string(),
                        serde_json::Value::String(e.to_string()),
                    );
                }
            }
        }

        Ok(health)
    }
}

fn service_error(err: anyhow::Error) -> BundleError {
    match err.downcast::<BundleError>() {
        Ok(err) => err,
        Err(err) => BundleError::Service {
            code: ERR_FAILED_SERVICE_DIED,
            message: err.to_string(),
        },
    }
}

#[async_trait]
impl BundleInstaller for BundleMgrClient {
    async fn install(
        &self,
        bundle_file_path: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = InstallRequest {
            bundle_file_paths: vec![bundle_file_path.to_string()],
            param: param.clone(),
        };
        self.deliver_status("installer/install", &request, &receiver)
            .await;
        true
    }

    async fn install_multiple(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = InstallRequest {
            bundle_file_paths: bundle_file_paths.to_vec(),
            param: param.clone(),
        };
        self.deliver_status("installer/install", &request, &receiver)
            .await;
        true
    }

    async fn uninstall(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = UninstallRequest {
            bundle_name: bundle_name.to_string(),
            module_name: None,
            param: param.clone(),
        };
        self.deliver_status("installer/uninstall", &request, &receiver)
            .await;
        true
    }

    async fn uninstall_module(
        &self,
        bundle_name: &str,
        module_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = UninstallRequest {
            bundle_name: bundle_name.to_string(),
            module_name: Some(module_name.to_string()),
            param: param.clone(),
        };
        self.deliver_status("installer/uninstall", &request, &receiver)
            .await;
        true
    }

    async fn uninstall_with_param(
        &self,
        param: &UninstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = UninstallWithParamRequest {
            param: param.clone(),
        };
        self.deliver_status("installer/uninstall-shared", &request, &receiver)
            .await;
        true
    }

    async fn recover(
        &self,
        bundle_name: &str,
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> bool {
        let request = RecoverRequest {
            bundle_name: bundle_name.to_string(),
            param: param.clone(),
        };
        self.deliver_status("installer/recover", &request, &receiver)
            .await;
        true
    }

    async fn stream_install(
        &self,
        bundle_file_paths: &[String],
        param: &InstallParam,
        receiver: Arc<StatusReceiver>,
    ) -> ErrCode {
        let request = InstallRequest {
            bundle_file_paths: bundle_file_paths.to_vec(),
            param: param.clone(),
        };
        self.deliver_status("installer/stream-install", &request, &receiver)
            .await;
        ERR_OK
    }

    async fn install_sandbox_app(
        &self,
        bundle_name: &str,
        dlp_type: i32,
        user_id: i32,
    ) -> bundle_core::Result<i32> {
        let response: Result<SandboxInstallResponse> = self
            .post(
                "installer/sandbox/install",
                &SandboxInstallRequest {
                    bundle_name: bundle_name.to_string(),
                    dlp_type,
                    user_id,
                },
            )
            .await;
        response.map(|r| r.app_index).map_err(service_error)
    }

    async fn uninstall_sandbox_app(
        &self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> bundle_core::Result<()> {
        self.post(
            "installer/sandbox/uninstall",
            &SandboxUninstallRequest {
                bundle_name: bundle_name.to_string(),
                app_index,
                user_id,
            },
        )
        .await
        .map_err(service_error)
    }

    async fn create_stream_installer(
        &self,
        param: &InstallParam,
        _receiver: Arc<StatusReceiver>,
        origin_hap_paths: &[String],
    ) -> Option<StreamInstallerId> {
        let response: Result<Option<StreamInstallerId>> = self
            .post(
                "installer/stream/create",
                &CreateStreamInstallerRequest {
                    param: param.clone(),
                    origin_hap_paths: origin_hap_paths.to_vec(),
                },
            )
            .await;
        response.unwrap_or_else(|e| {
            warn!("Failed to create stream installer: {}", e);
            None
        })
    }

    async fn destroy_stream_installer(&self, id: StreamInstallerId) -> bool {
        let response: Result<bool> = self
            .post(
                "installer/stream/destroy",
                &DestroyStreamInstallerRequest { id },
            )
            .await;
        response.unwrap_or_else(|e| {
            warn!("Failed to destroy stream installer {}: {}", id, e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockServer;
    use bundle_core::codes::{
        ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
        ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE,
    };

    fn client_for(url: &str) -> BundleMgrClient {
        BundleMgrClient::with_config(url.to_string(), 5, 0, Duration::from_millis(10)).unwrap()
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("http://localhost:8620"), "http://localhost:8620");
        assert_eq!(normalize_url("http://localhost:8620/"), "http://localhost:8620");
        assert_eq!(normalize_url("http://localhost:8620///"), "http://localhost:8620");
    }

    #[test]
    fn test_with_caller_keeps_connection_settings() {
        let client = client_for("http://127.0.0.1:8620/");
        let caller = client.with_caller(3057);
        assert_eq!(client.caller_uid(), 0);
        assert_eq!(caller.caller_uid(), 3057);
        assert_eq!(caller.base_url(), "http://127.0.0.1:8620");
    }

    #[test]
    fn test_service_result_split() {
        let ok: Result<i32> = Ok(7);
        assert_eq!(ok.into_service_result().unwrap(), Ok(7));

        let service: Result<i32> = Err(BundleError::code(42).into());
        assert_eq!(service.into_service_result().unwrap(), Err(42));

        let transport: Result<i32> = Err(anyhow::anyhow!("connection refused"));
        assert!(transport.into_service_result().is_err());
    }

    #[tokio::test]
    async fn test_service_error_carries_code() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url);

        let result = client
            .get_compatible_device_type("com.example.missing")
            .await
            .into_service_result()
            .unwrap();
        assert_eq!(result, Err(ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST));

        let device_type = client
            .get_compatible_device_type("com.example.myapplication")
            .await
            .unwrap();
        assert_eq!(device_type, "phone");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let client = client_for("http://127.0.0.1:1");
        let result = client.get_odid().await.into_service_result();
        assert!(result.is_err());
        assert!(!client.ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_installer_delivers_status_to_receiver() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url);

        let receiver = Arc::new(StatusReceiver::new());
        assert!(
            client
                .uninstall("com.example.gone", &InstallParam::default(), receiver.clone())
                .await
        );
        assert_eq!(
            receiver.result_code().await,
            ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE
        );
    }

    #[tokio::test]
    async fn test_lost_connection_is_a_dead_service() {
        let client = client_for("http://127.0.0.1:1");

        let receiver = Arc::new(StatusReceiver::new());
        client
            .uninstall("com.example.myapplication", &InstallParam::default(), receiver.clone())
            .await;
        assert_eq!(receiver.result_code().await, ERR_FAILED_SERVICE_DIED);

        let callback = Arc::new(QuickFixStatusCallback::new());
        assert_eq!(client.delete_quick_fix("com.example.notes", callback.clone()), ERR_OK);
        let (code, result) = callback.result_code().await;
        assert_eq!(code, ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED);
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_quick_fix_failure_reaches_callback() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url);

        let callback = Arc::new(QuickFixStatusCallback::new());
        client.switch_quick_fix("com.example.notes", true, callback.clone());
        let (code, _) = callback.result_code().await;
        assert_eq!(code, ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE);
    }

    #[tokio::test]
    async fn test_cache_stat_requires_system_caller() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url);

        let callback = Arc::new(ProcessCacheCallback::new());
        assert_eq!(client.get_all_bundle_cache_stat(callback.clone()).await, ERR_OK);
        assert!(callback.wait_for_stat_completion().await);
        assert_eq!(callback.cache_stat(), 5120);

        let callback = Arc::new(ProcessCacheCallback::new());
        let code = client
            .with_caller(20_010_001)
            .get_all_bundle_cache_stat(callback)
            .await;
        assert_ne!(code, ERR_OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let health = client_for(&url).health_check().await.unwrap();
        assert_eq!(health["connected"], serde_json::Value::Bool(true));
        assert_eq!(health["api_working"], serde_json::Value::Bool(true));
        assert_eq!(health["bundle_count"], serde_json::json!(3));
    }
}
