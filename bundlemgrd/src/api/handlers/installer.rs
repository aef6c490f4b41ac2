//! Installer proxy handlers
//!
//! Requests are handed to the configured [`BundleInstaller`] with a fresh
//! [`StatusReceiver`]; the handler waits for the receiver and answers with the
//! delivered status.
//!
//! [`BundleInstaller`]: bundle_core::BundleInstaller

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::{api_fail, api_ok};
use axum::{extract::State, Json};
use bundle_core::api::{
    ApiResponse, CreateStreamInstallerRequest, DestroyStreamInstallerRequest, InstallRequest,
    RecoverRequest, SandboxInstallRequest, SandboxInstallResponse, SandboxUninstallRequest,
    UninstallRequest, UninstallWithParamRequest,
};
use bundle_core::{StatusReceiver, StatusResult, StreamInstallerId};
use std::sync::Arc;
use tracing::{debug, info};

/// `POST /api/v0/installer/install`
pub(crate) async fn install(
    State(state): State<AppState>,
    Json(request): Json<InstallRequest>,
) -> Result<Json<ApiResponse<StatusResult>>, ApiError> {
    debug!("Request: POST /api/v0/installer/install {:?}", request.bundle_file_paths);

    let receiver = Arc::new(StatusReceiver::new());
    let dispatched = match request.bundle_file_paths.as_slice() {
        [] => return api_fail!("No bundle file path"),
        [path] => {
            state
                .installer
                .install(path, &request.param, receiver.clone())
                .await
        }
        paths => {
            state
                .installer
                .install_multiple(paths, &request.param, receiver.clone())
                .await
        }
    };
    if !dispatched {
        return Err(ApiError::internal_error("Install request was not dispatched"));
    }

    let status = receiver.result().await;
    info!("Install finished with {}", status.code);
    api_ok!(status)
}

/// Uninstall a bundle, or one of its modules when a module name is given.
///
/// # Endpoint
///
/// `POST /api/v0/installer/uninstall`
pub(crate) async fn uninstall(
    State(state): State<AppState>,
    Json(request): Json<UninstallRequest>,
) -> Result<Json<ApiResponse<StatusResult>>, ApiError> {
    debug!(
        "Request: POST /api/v0/installer/uninstall {} module={:?}",
        request.bundle_name, request.module_name
    );

    let receiver = Arc::new(StatusReceiver::new());
    let dispatched = match request.module_name.as_deref() {
        Some(module_name) if !module_name.is_empty() => {
            state
                .installer
                .uninstall_module(
                    &request.bundle_name,
                    module_name,
                    &request.param,
                    receiver.clone(),
                )
                .await
        }
        _ => {
            state
                .installer
                .uninstall(&request.bundle_name, &request.param, receiver.clone())
                .await
        }
    };
    if !dispatched {
        return Err(ApiError::internal_error("Uninstall request was not dispatched"));
    }

    let status = receiver.result().await;
    info!("Uninstall of {} finished with {}", request.bundle_name, status.code);
    api_ok!(status)
}

/// `POST /api/v0/installer/uninstall-shared`
pub(crate) async fn uninstall_with_param(
    State(state): State<AppState>,
    Json(request): Json<UninstallWithParamRequest>,
) -> Result<Json<ApiResponse<StatusResult>>, ApiError> {
    debug!("Request: POST /api/v0/installer/uninstall-shared {}", request.param.bundle_name);

    let receiver = Arc::new(StatusReceiver::new());
    if !state
        .installer
        .uninstall_with_param(&request.param, receiver.clone())
        .await
    {
        return Err(ApiError::internal_error("Uninstall request was not dispatched"));
    }
    api_ok!(receiver.result().await)
}

/// `POST /api/v0/installer/recover`
pub(crate) async fn recover(
    State(state): State<AppState>,
    Json(request): Json<RecoverRequest>,
) -> Result<Json<ApiResponse<StatusResult>>, ApiError> {
    debug!("Request: POST /api/v0/installer/recover {}", request.bundle_name);

    let receiver = Arc::new(StatusReceiver::new());
    if !state
        .installer
        .recover(&request.bundle_name, &request.param, receiver.clone())
        .await
    {
        return Err(ApiError::internal_error("Recover request was not dispatched"));
    }
    api_ok!(receiver.result().await)
}

/// `POST /api/v0/installer/stream-install`
pub(crate) async fn stream_install(
    State(state): State<AppState>,
    Json(request): Json<InstallRequest>,
) -> Result<Json<ApiResponse<StatusResult>>, ApiError> {
    debug!("Request: POST /api/v0/installer/stream-install {:?}", request.bundle_file_paths);

    let receiver = Arc::new(StatusReceiver::new());
    let code = state
        .installer
        .stream_install(&request.bundle_file_paths, &request.param, receiver.clone())
        .await;
    debug!("Stream install returned {}", code);
    api_ok!(receiver.result().await)
}

/// `POST /api/v0/installer/sandbox/install`
pub(crate) async fn install_sandbox_app(
    State(state): State<AppState>,
    Json(request): Json<SandboxInstallRequest>,
) -> Result<Json<ApiResponse<SandboxInstallResponse>>, ApiError> {
    debug!(
        "Request: POST /api/v0/installer/sandbox/install {} dlp={}",
        request.bundle_name, request.dlp_type
    );

    let app_index = state
        .installer
        .install_sandbox_app(&request.bundle_name, request.dlp_type, request.user_id)
        .await?;
    api_ok!(SandboxInstallResponse { app_index })
}

/// `POST /api/v0/installer/sandbox/uninstall`
pub(crate) async fn uninstall_sandbox_app(
    State(state): State<AppState>,
    Json(request): Json<SandboxUninstallRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        "Request: POST /api/v0/installer/sandbox/uninstall {} index={}",
        request.bundle_name, request.app_index
    );

    state
        .installer
        .uninstall_sandbox_app(&request.bundle_name, request.app_index, request.user_id)
        .await?;
    api_ok!(())
}

/// `POST /api/v0/installer/stream/create`
pub(crate) async fn create_stream_installer(
    State(state): State<AppState>,
    Json(request): Json<CreateStreamInstallerRequest>,
) -> Result<Json<ApiResponse<Option<StreamInstallerId>>>, ApiError> {
    debug!("Request: POST /api/v0/installer/stream/create");

    let receiver = Arc::new(StatusReceiver::new());
    let id = state
        .installer
        .create_stream_installer(&request.param, receiver, &request.origin_hap_paths)
        .await;
    api_ok!(id)
}

/// `POST /api/v0/installer/stream/destroy`
pub(crate) async fn destroy_stream_installer(
    State(state): State<AppState>,
    Json(request): Json<DestroyStreamInstallerRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: POST /api/v0/installer/stream/destroy {}", request.id);

    let destroyed = state.installer.destroy_stream_installer(request.id).await;
    api_ok!(destroyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;
    use bundle_core::codes::{ERR_OK, ERR_UNINSTALL_MISSING_INSTALLED_MODULE};
    use bundle_core::InstallParam;

    #[tokio::test]
    async fn test_uninstall_module_through_registry() {
        let state = AppState::new(BundleRegistry::builtin(), false);
        let request = UninstallRequest {
            bundle_name: "com.example.myapplication".to_string(),
            module_name: Some("missing".to_string()),
            param: InstallParam::default(),
        };
        let Json(response) = uninstall(State(state), Json(request)).await.unwrap();
        match response {
            ApiResponse::Success { data } => {
                assert_eq!(data.code, ERR_UNINSTALL_MISSING_INSTALLED_MODULE)
            }
            ApiResponse::Error { .. } => panic!("Expected status result"),
        }
    }

    #[tokio::test]
    async fn test_mock_installer_always_succeeds() {
        let state = AppState::new(BundleRegistry::builtin(), true);
        let request = UninstallRequest {
            bundle_name: "not.installed".to_string(),
            module_name: None,
            param: InstallParam::default(),
        };
        let Json(response) = uninstall(State(state.clone()), Json(request)).await.unwrap();
        match response {
            ApiResponse::Success { data } => assert_eq!(data.code, ERR_OK),
            ApiResponse::Error { .. } => panic!("Expected status result"),
        }

        let Json(response) = create_stream_installer(
            State(state),
            Json(CreateStreamInstallerRequest::default()),
        )
        .await
        .unwrap();
        assert!(matches!(response, ApiResponse::Success { data: None }));
    }

    #[tokio::test]
    async fn test_install_without_paths_is_rejected() {
        let state = AppState::new(BundleRegistry::builtin(), false);
        let err = install(State(state), Json(InstallRequest::default()))
            .await
            .unwrap_err();
        assert!(err.status_code.is_client_error());
    }
}
