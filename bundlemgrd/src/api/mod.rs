//! API module for the bundle manager service
//!
//! Contains the REST API implementation with the Axum router and handlers.
//! Each route stands for one bundle manager or installer proxy method.

pub(crate) mod handlers;

use crate::installer::RegistryInstaller;
use crate::registry::BundleRegistry;
use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::request::Parts,
    routing::{get, post},
    Router,
};
use bundle_core::api::CALLER_UID_HEADER;
use bundle_core::{BundleInstaller, MockBundleInstallerHost};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Installed bundles and recorded service state
    pub registry: Arc<RwLock<BundleRegistry>>,
    /// Installer serving the installer routes
    pub installer: Arc<dyn BundleInstaller>,
    /// "registry" or "mock"
    pub installer_kind: &'static str,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state.
    ///
    /// With `mock_installer`, installer routes always succeed and leave the
    /// registry untouched.
    pub fn new(registry: BundleRegistry, mock_installer: bool) -> Self {
        let registry = Arc::new(RwLock::new(registry));
        let (installer, installer_kind): (Arc<dyn BundleInstaller>, &'static str) =
            if mock_installer {
                (Arc::new(MockBundleInstallerHost::new()), "mock")
            } else {
                (Arc::new(RegistryInstaller::new(registry.clone())), "registry")
            };

        Self {
            registry,
            installer,
            installer_kind,
            start_time: Instant::now(),
        }
    }
}

/// Uid the request is made on behalf of, from the caller header.
///
/// Requests without the header come from uid 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Caller(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = error::ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CALLER_UID_HEADER) else {
            return Ok(Caller(0));
        };
        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .map(Caller)
            .ok_or_else(|| error::ApiError::bad_request("Invalid caller uid header"))
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    info!("Setting up API router...");

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)); // 1MB limit

    use handlers::{abilities, app_control, bundles, events, installer, quick_fix, stats};

    Router::new()
        // Abilities, modules and resources
        .route("/api/v0/ability/check", post(abilities::check_ability))
        .route(
            "/api/v0/ability/implicit-query",
            post(abilities::implicit_query_skill_uri),
        )
        .route(
            "/api/v0/ability/continue-type",
            get(abilities::ability_by_continue_type),
        )
        .route(
            "/api/v0/module/removable",
            get(abilities::is_module_removable).post(abilities::set_module_removable),
        )
        .route("/api/v0/resource/string", get(abilities::string_by_id))
        .route("/api/v0/resource/icon", get(abilities::icon_by_id))
        .route("/api/v0/proxy-data", get(abilities::proxy_data_infos))
        .route("/api/v0/proxy-data/all", get(abilities::all_proxy_data_infos))
        .route("/api/v0/ext-mime/set", post(abilities::set_ext_name_or_mime))
        .route("/api/v0/ext-mime/delete", post(abilities::del_ext_name_or_mime))
        .route("/api/v0/profile/json", get(abilities::json_profile))
        // App control rules
        .route(
            "/api/v0/app-control/install-rule",
            get(app_control::install_rules),
        )
        .route(
            "/api/v0/app-control/install-rule/add",
            post(app_control::add_install_rule),
        )
        .route(
            "/api/v0/app-control/install-rule/delete",
            post(app_control::delete_install_rule),
        )
        .route(
            "/api/v0/app-control/install-rule/clean",
            post(app_control::clean_install_rules),
        )
        .route(
            "/api/v0/app-control/running-rule",
            get(app_control::running_rules),
        )
        .route(
            "/api/v0/app-control/running-rule/add",
            post(app_control::add_running_rules),
        )
        .route(
            "/api/v0/app-control/running-rule/delete",
            post(app_control::delete_running_rules),
        )
        .route(
            "/api/v0/app-control/running-rule/clean",
            post(app_control::clean_running_rules),
        )
        .route(
            "/api/v0/app-control/running-rule/result",
            get(app_control::running_rule_result),
        )
        // Quick fix and debug mode
        .route("/api/v0/quick-fix/copy", post(quick_fix::copy_files))
        .route("/api/v0/quick-fix/deploy", post(quick_fix::deploy))
        .route("/api/v0/quick-fix/switch", post(quick_fix::switch))
        .route("/api/v0/quick-fix/delete", post(quick_fix::delete))
        .route("/api/v0/debug-mode", post(quick_fix::set_debug_mode))
        // Storage and cache
        .route("/api/v0/bundle/stats", get(stats::bundle_stats))
        .route("/api/v0/bundle/stats/batch", post(stats::batch_bundle_stats))
        .route("/api/v0/bundle/provision", get(stats::app_provision_info))
        .route(
            "/api/v0/bundle/distributed-name",
            get(stats::distributed_bundle_name),
        )
        .route(
            "/api/v0/cache/clean-automatic",
            post(stats::clean_cache_automatic),
        )
        .route("/api/v0/cache/stat", get(stats::all_bundle_cache_stat))
        .route("/api/v0/cache/clean", post(stats::clean_all_bundle_cache))
        // Events
        .route(
            "/api/v0/event-callback/register",
            post(events::register_event_callback),
        )
        .route(
            "/api/v0/event-callback/unregister",
            post(events::unregister_event_callback),
        )
        .route("/api/v0/aot/reset", post(events::reset_aot_compile_status))
        .route("/api/v0/common-event", post(events::publish_common_event))
        // Bundle identity, data groups and directories
        .route("/api/v0/bundle/continue-names", get(bundles::continue_bundle_names))
        .route("/api/v0/bundle/sandbox-info", get(bundles::sandbox_bundle_info))
        .route("/api/v0/bundle/uninstalled", get(bundles::uninstalled_bundle_info))
        .route("/api/v0/bundle/uid", get(bundles::uid_by_bundle_name))
        .route(
            "/api/v0/bundle/encrypted-status",
            post(bundles::update_encrypted_status),
        )
        .route("/api/v0/bundle/installed", get(bundles::is_bundle_installed))
        .route("/api/v0/bundle/device-type", get(bundles::compatible_device_type))
        .route("/api/v0/bundle/by-app-id", get(bundles::bundle_name_by_app_id))
        .route("/api/v0/bundle/asset-groups", get(bundles::asset_access_groups))
        .route("/api/v0/bundle/dir", get(bundles::dir_by_bundle_name_and_app_index))
        .route("/api/v0/bundle/dirs", get(bundles::all_bundle_dirs))
        .route("/api/v0/data-group/infos", get(bundles::data_group_infos))
        .route("/api/v0/data-group/dir", get(bundles::group_dir))
        .route("/api/v0/odid", get(bundles::odid))
        .route(
            "/api/v0/uid/simple-app-infos",
            post(bundles::simple_app_info_for_uids),
        )
        .route("/api/v0/uid/bundle-names", get(bundles::bundle_names_for_uid_ext))
        .route(
            "/api/v0/app-identifier",
            get(bundles::app_identifier_and_app_index),
        )
        .route(
            "/api/v0/distribution-types",
            post(bundles::set_app_distribution_types),
        )
        // Installer
        .route("/api/v0/installer/install", post(installer::install))
        .route("/api/v0/installer/uninstall", post(installer::uninstall))
        .route(
            "/api/v0/installer/uninstall-shared",
            post(installer::uninstall_with_param),
        )
        .route("/api/v0/installer/recover", post(installer::recover))
        .route(
            "/api/v0/installer/stream-install",
            post(installer::stream_install),
        )
        .route(
            "/api/v0/installer/sandbox/install",
            post(installer::install_sandbox_app),
        )
        .route(
            "/api/v0/installer/sandbox/uninstall",
            post(installer::uninstall_sandbox_app),
        )
        .route(
            "/api/v0/installer/stream/create",
            post(installer::create_stream_installer),
        )
        .route(
            "/api/v0/installer/stream/destroy",
            post(installer::destroy_stream_installer),
        )
        // System info endpoint
        .route("/api/v0/info", get(handlers::info::get_info))
        // Root endpoint
        .route("/", get(handlers::info::root))
        .layer(middleware_stack)
        .with_state(state)
}

/// Error handling utilities
pub(crate) mod error {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use bundle_core::api::ApiResponse;
    use bundle_core::codes::{ErrCode, ERR_BUNDLE_MANAGER_INTERNAL_ERROR, ERR_INVALID_VALUE};
    use bundle_core::BundleError;

    use tracing::{debug, error};

    /// Custom error type for API responses
    #[derive(Debug)]
    pub struct ApiError {
        pub status_code: StatusCode,
        pub code: ErrCode,
        pub message: String,
    }

    impl ApiError {
        /// Create a new API error
        pub fn new(status_code: StatusCode, code: ErrCode, message: impl Into<String>) -> Self {
            Self {
                status_code,
                code,
                message: message.into(),
            }
        }

        /// A service-level failure, answered with HTTP 200 and its code
        pub fn service(code: ErrCode, message: impl Into<String>) -> Self {
            Self::new(StatusCode::OK, code, message)
        }

        /// Create a bad request error
        pub fn bad_request(message: impl Into<String>) -> Self {
            Self::new(StatusCode::BAD_REQUEST, ERR_INVALID_VALUE, message)
        }

        /// Create an internal server error
        pub fn internal_error(message: impl Into<String>) -> Self {
            Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ERR_BUNDLE_MANAGER_INTERNAL_ERROR,
                message,
            )
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            if self.status_code.is_success() {
                debug!("Service error {}: {}", self.code, self.message);
            } else {
                error!("API Error {}: {}", self.status_code, self.message);
            }

            let response: ApiResponse<()> = ApiResponse::error(self.code, self.message);

            (self.status_code, Json(response)).into_response()
        }
    }

    /// Convert BundleError to ApiError
    impl From<BundleError> for ApiError {
        fn from(err: BundleError) -> Self {
            match err {
                BundleError::Service { code, message } => Self::service(code, message),
                BundleError::InvalidInput(msg) | BundleError::Parse(msg) => Self::bad_request(msg),
                other => Self::new(
                    local_status(&other),
                    other.err_code(),
                    other.to_string(),
                ),
            }
        }
    }

    fn local_status(err: &BundleError) -> StatusCode {
        match err {
            BundleError::BundleNotFound(_) | BundleError::ModuleNotFound { .. } => StatusCode::OK,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Helper macros for common responses
#[macro_export]
macro_rules! api_ok {
    ($data:expr) => {
        Ok(axum::Json(bundle_core::api::ApiResponse::success($data)))
    };
}

#[macro_export]
macro_rules! api_fail {
    ($message:expr) => {
        Err($crate::api::error::ApiError::bad_request($message))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bundle_core::api::ApiResponse;
    use bundle_core::codes::{
        ERR_APP_CONTROL_PERMISSION_DENIED, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
    };
    use bundle_core::EDM_UID;
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(BundleRegistry::builtin(), false))
    }

    async fn send<T: DeserializeOwned>(
        app: Router,
        request: Request<Body>,
    ) -> (StatusCode, ApiResponse<T>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, caller: Option<i32>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(uid) = caller {
            builder = builder.header(CALLER_UID_HEADER, uid.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_info() {
        let (status, response) = send::<serde_json::Value>(
            app(),
            Request::get("/").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(matches!(response, ApiResponse::Success { .. }));

        let (_, response) = send::<bundle_core::api::InfoResponse>(
            app(),
            Request::get("/api/v0/info").body(Body::empty()).unwrap(),
        )
        .await;
        match response {
            ApiResponse::Success { data } => {
                assert_eq!(data.bundle_count, 3);
                assert_eq!(data.installer, "registry");
            }
            ApiResponse::Error { .. } => panic!("Expected success"),
        }
    }

    #[tokio::test]
    async fn test_service_error_is_http_ok_with_code() {
        let (status, response) = send::<bool>(
            app(),
            Request::get("/api/v0/module/removable?bundleName=missing&moduleName=entry")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        match response {
            ApiResponse::Error { code, .. } => {
                assert_eq!(code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST)
            }
            ApiResponse::Success { .. } => panic!("Expected error"),
        }
    }

    #[tokio::test]
    async fn test_caller_header_gates_app_control() {
        let body = serde_json::json!({"appIds": ["a"], "ruleType": 0, "userId": 100});

        let (_, response) = send::<()>(
            app(),
            post_json("/api/v0/app-control/install-rule/add", None, body.clone()),
        )
        .await;
        match response {
            ApiResponse::Error { code, .. } => assert_eq!(code, ERR_APP_CONTROL_PERMISSION_DENIED),
            ApiResponse::Success { .. } => panic!("Expected permission error"),
        }

        let (_, response) = send::<()>(
            app(),
            post_json("/api/v0/app-control/install-rule/add", Some(EDM_UID), body),
        )
        .await;
        assert!(matches!(response, ApiResponse::Success { .. }));
    }

    #[tokio::test]
    async fn test_malformed_caller_header_is_bad_request() {
        let request = Request::get("/api/v0/odid")
            .header(CALLER_UID_HEADER, "root")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send::<String>(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_state_is_shared_between_requests() {
        let app = app();
        let (_, response) = send::<serde_json::Value>(
            app.clone(),
            post_json(
                "/api/v0/installer/install",
                None,
                serde_json::json!({"bundleFilePaths": ["/data/com.example.shared.hap"]}),
            ),
        )
        .await;
        assert!(matches!(response, ApiResponse::Success { .. }));

        let (_, response) = send::<bool>(
            app,
            Request::get("/api/v0/bundle/installed?bundleName=com.example.shared&userId=100")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        match response {
            ApiResponse::Success { data } => assert!(data),
            ApiResponse::Error { .. } => panic!("Expected success"),
        }
    }
}
