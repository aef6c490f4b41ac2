//! Quick fix and debug mode handlers

use crate::api::error::ApiError;
use crate::api::{AppState, Caller};
use crate::api_ok;
use axum::{extract::State, Json};
use bundle_core::api::{
    ApiResponse, BundleNameRequest, CopyFilesRequest, DebugModeRequest, DeployQuickFixRequest,
    SwitchQuickFixRequest,
};
use bundle_core::QuickFixResult;
use tracing::{debug, info};

/// Copy quick fix files into the service's staging directory.
///
/// # Endpoint
///
/// `POST /api/v0/quick-fix/copy`
///
/// # Returns
///
/// The staged paths, in request order.
pub(crate) async fn copy_files(
    State(state): State<AppState>,
    Json(request): Json<CopyFilesRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!("Request: POST /api/v0/quick-fix/copy files={:?}", request.source_files);

    let dest_files = state
        .registry
        .write()
        .await
        .copy_files(&request.source_files)?;
    api_ok!(dest_files)
}

/// Deploy staged quick fix files.
///
/// # Endpoint
///
/// `POST /api/v0/quick-fix/deploy`
pub(crate) async fn deploy(
    State(state): State<AppState>,
    Json(request): Json<DeployQuickFixRequest>,
) -> Result<Json<ApiResponse<QuickFixResult>>, ApiError> {
    debug!("Request: POST /api/v0/quick-fix/deploy debug={}", request.is_debug);

    let result = state
        .registry
        .write()
        .await
        .deploy_quick_fix(&request.bundle_file_paths, request.is_debug)?;
    info!("Quick fix deployed: {}", result);
    api_ok!(result)
}

/// `POST /api/v0/quick-fix/switch`
pub(crate) async fn switch(
    State(state): State<AppState>,
    Json(request): Json<SwitchQuickFixRequest>,
) -> Result<Json<ApiResponse<QuickFixResult>>, ApiError> {
    debug!(
        "Request: POST /api/v0/quick-fix/switch {} enable={}",
        request.bundle_name, request.enable
    );

    let result = state
        .registry
        .write()
        .await
        .switch_quick_fix(&request.bundle_name, request.enable)?;
    api_ok!(result)
}

/// `POST /api/v0/quick-fix/delete`
pub(crate) async fn delete(
    State(state): State<AppState>,
    Json(request): Json<BundleNameRequest>,
) -> Result<Json<ApiResponse<QuickFixResult>>, ApiError> {
    debug!("Request: POST /api/v0/quick-fix/delete {}", request.bundle_name);

    let result = state
        .registry
        .write()
        .await
        .delete_quick_fix(&request.bundle_name)?;
    api_ok!(result)
}

/// `POST /api/v0/debug-mode`
pub(crate) async fn set_debug_mode(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<DebugModeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/debug-mode caller={} enable={}", caller, request.enable);

    state
        .registry
        .write()
        .await
        .set_debug_mode(caller, request.enable)?;
    api_ok!(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;
    use bundle_core::codes::ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE;

    #[tokio::test]
    async fn test_copy_then_deploy() {
        let state = AppState::new(BundleRegistry::builtin(), false);

        let Json(response) = copy_files(
            State(state.clone()),
            Json(CopyFilesRequest {
                source_files: vec!["/tmp/com.example.notes.hqf".to_string()],
            }),
        )
        .await
        .unwrap();
        let ApiResponse::Success { data: staged } = response else {
            panic!("Expected success");
        };

        let Json(response) = deploy(
            State(state.clone()),
            Json(DeployQuickFixRequest {
                bundle_file_paths: staged,
                is_debug: false,
            }),
        )
        .await
        .unwrap();
        match response {
            ApiResponse::Success { data } => assert_eq!(data.result_code(), 0),
            ApiResponse::Error { .. } => panic!("Expected success"),
        }

        let err = switch(
            State(state),
            Json(SwitchQuickFixRequest {
                bundle_name: "com.example.myapplication".to_string(),
                enable: true,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE);
    }
}
