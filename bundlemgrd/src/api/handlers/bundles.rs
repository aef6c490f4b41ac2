//! Bundle identity, data group and directory handlers

use crate::api::error::ApiError;
use crate::api::{AppState, Caller};
use crate::{api_fail, api_ok};
use axum::{
    extract::{Query, State},
    Json,
};
use bundle_core::api::{
    ApiResponse, AppIdQuery, AppIdentifierResponse, BundleQuery, DataGroupDirQuery,
    DistributionTypesRequest, EncryptedStatusRequest, SimpleAppInfoRequest, TokenQuery, UidQuery,
    UserQuery,
};
use bundle_core::{BundleDir, BundleInfo, DataGroupInfo, SimpleAppInfo, DEFAULT_USER_ID};
use tracing::{debug, info};

/// `GET /api/v0/bundle/continue-names`
pub(crate) async fn continue_bundle_names(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/continue-names {}", query.bundle_name);

    let names = state
        .registry
        .read()
        .await
        .continue_bundle_names(&query.bundle_name, query.user_id.unwrap_or(DEFAULT_USER_ID))?;
    api_ok!(names)
}

/// Bundle info of a sandbox clone.
///
/// # Endpoint
///
/// `GET /api/v0/bundle/sandbox-info`
pub(crate) async fn sandbox_bundle_info(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<BundleInfo>>, ApiError> {
    debug!(
        "Request: GET /api/v0/bundle/sandbox-info {} index={:?}",
        query.bundle_name, query.app_index
    );

    let Some(app_index) = query.app_index else {
        return api_fail!("appIndex is required");
    };
    let info = state.registry.read().await.sandbox_bundle_info(
        &query.bundle_name,
        app_index,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
    )?;
    api_ok!(info)
}

/// `GET /api/v0/bundle/uninstalled`
pub(crate) async fn uninstalled_bundle_info(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<BundleInfo>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/uninstalled {}", query.bundle_name);

    let info = state
        .registry
        .read()
        .await
        .uninstalled_bundle_info(&query.bundle_name)?;
    api_ok!(info)
}

/// Uid of a bundle, `-1` when it is not installed.
///
/// # Endpoint
///
/// `GET /api/v0/bundle/uid`
pub(crate) async fn uid_by_bundle_name(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/uid {}", query.bundle_name);

    let uid = state.registry.read().await.uid_by_bundle_name(
        &query.bundle_name,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
        query.app_index.unwrap_or_default(),
    );
    api_ok!(uid)
}

/// `POST /api/v0/bundle/encrypted-status`
pub(crate) async fn update_encrypted_status(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<EncryptedStatusRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        "Request: POST /api/v0/bundle/encrypted-status {} caller={}",
        request.bundle_name, caller
    );

    state.registry.write().await.update_encrypted_status(
        caller,
        &request.bundle_name,
        request.is_existed,
        request.app_index,
    )?;
    info!(
        "Encrypted status of {} ({}) set to {}",
        request.bundle_name, request.app_index, request.is_existed
    );
    api_ok!(())
}

/// `GET /api/v0/bundle/installed`
pub(crate) async fn is_bundle_installed(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/installed {}", query.bundle_name);

    let installed = state.registry.read().await.is_bundle_installed(
        &query.bundle_name,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
        query.app_index.unwrap_or_default(),
    )?;
    api_ok!(installed)
}

/// `GET /api/v0/bundle/device-type`
pub(crate) async fn compatible_device_type(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/device-type {}", query.bundle_name);

    let device_type = state
        .registry
        .read()
        .await
        .compatible_device_type(&query.bundle_name)?;
    api_ok!(device_type)
}

/// `GET /api/v0/bundle/by-app-id`
pub(crate) async fn bundle_name_by_app_id(
    State(state): State<AppState>,
    Query(query): Query<AppIdQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/by-app-id {}", query.app_id);

    let name = state
        .registry
        .read()
        .await
        .bundle_name_by_app_id(&query.app_id)?;
    api_ok!(name)
}

/// `GET /api/v0/bundle/asset-groups`
pub(crate) async fn asset_access_groups(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/asset-groups {}", query.bundle_name);

    let groups = state
        .registry
        .read()
        .await
        .asset_access_groups(&query.bundle_name)?;
    api_ok!(groups)
}

/// Data directory name of a bundle or one of its clones.
///
/// # Endpoint
///
/// `GET /api/v0/bundle/dir`
pub(crate) async fn dir_by_bundle_name_and_app_index(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/dir {} index={:?}", query.bundle_name, query.app_index);

    let dir = state
        .registry
        .read()
        .await
        .dir_by_bundle_name_and_app_index(&query.bundle_name, query.app_index.unwrap_or_default())?;
    api_ok!(dir)
}

/// `GET /api/v0/bundle/dirs`
pub(crate) async fn all_bundle_dirs(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<Vec<BundleDir>>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/dirs user={}", query.user_id);

    let dirs = state.registry.read().await.all_bundle_dirs(query.user_id)?;
    api_ok!(dirs)
}

/// `GET /api/v0/data-group/infos`
pub(crate) async fn data_group_infos(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<Vec<DataGroupInfo>>>, ApiError> {
    debug!("Request: GET /api/v0/data-group/infos {}", query.bundle_name);

    let infos = state
        .registry
        .read()
        .await
        .data_group_infos(&query.bundle_name, query.user_id.unwrap_or(DEFAULT_USER_ID))?;
    api_ok!(infos)
}

/// `GET /api/v0/data-group/dir`
pub(crate) async fn group_dir(
    State(state): State<AppState>,
    Query(query): Query<DataGroupDirQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/data-group/dir {}", query.data_group_id);

    let dir = state.registry.read().await.group_dir(&query.data_group_id)?;
    api_ok!(dir)
}

/// Developer-scoped device id of the calling bundle.
///
/// # Endpoint
///
/// `GET /api/v0/odid`
pub(crate) async fn odid(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/odid caller={}", caller);

    let odid = state.registry.read().await.odid(caller)?;
    api_ok!(odid)
}

/// `POST /api/v0/uid/simple-app-infos`
pub(crate) async fn simple_app_info_for_uids(
    State(state): State<AppState>,
    Json(request): Json<SimpleAppInfoRequest>,
) -> Result<Json<ApiResponse<Vec<SimpleAppInfo>>>, ApiError> {
    debug!("Request: POST /api/v0/uid/simple-app-infos {:?}", request.uids);

    let infos = state
        .registry
        .read()
        .await
        .simple_app_info_for_uids(&request.uids);
    api_ok!(infos)
}

/// `GET /api/v0/uid/bundle-names`
pub(crate) async fn bundle_names_for_uid_ext(
    State(state): State<AppState>,
    Query(query): Query<UidQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!("Request: GET /api/v0/uid/bundle-names uid={}", query.uid);

    let names = state
        .registry
        .read()
        .await
        .bundle_names_for_uid_ext(query.uid)?;
    api_ok!(names)
}

/// `GET /api/v0/app-identifier`
pub(crate) async fn app_identifier_and_app_index(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ApiResponse<AppIdentifierResponse>>, ApiError> {
    debug!("Request: GET /api/v0/app-identifier token={}", query.access_token_id);

    let response = state
        .registry
        .read()
        .await
        .app_identifier_and_app_index(query.access_token_id)?;
    api_ok!(response)
}

/// `POST /api/v0/distribution-types`
pub(crate) async fn set_app_distribution_types(
    State(state): State<AppState>,
    Json(request): Json<DistributionTypesRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/distribution-types {:?}", request.types);

    state
        .registry
        .write()
        .await
        .set_app_distribution_types(&request.types);
    api_ok!(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;
    use bundle_core::codes::{
        ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST, ERR_BUNDLE_MANAGER_PERMISSION_DENIED,
    };
    use bundle_core::{app_uid, CODE_PROTECT_UID};

    fn state() -> AppState {
        AppState::new(BundleRegistry::builtin(), false)
    }

    #[tokio::test]
    async fn test_odid_resolves_by_caller() {
        let Json(response) = odid(State(state()), Caller(app_uid(100, 1))).await.unwrap();
        match response {
            ApiResponse::Success { data } => {
                assert_eq!(data, "a6b5f8c2-0d44-4b0e-9e5f-3c1d7e2a9b10")
            }
            ApiResponse::Error { .. } => panic!("Expected success"),
        }

        let err = odid(State(state()), Caller(-1)).await.unwrap_err();
        assert_eq!(err.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    }

    #[tokio::test]
    async fn test_encrypted_status_needs_code_protect_caller() {
        let request = EncryptedStatusRequest {
            bundle_name: "com.example.notes".to_string(),
            is_existed: true,
            app_index: 0,
        };
        let err = update_encrypted_status(State(state()), Caller(0), Json(request.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ERR_BUNDLE_MANAGER_PERMISSION_DENIED);

        let Json(response) =
            update_encrypted_status(State(state()), Caller(CODE_PROTECT_UID), Json(request))
                .await
                .unwrap();
        assert!(matches!(response, ApiResponse::Success { .. }));
    }

    #[tokio::test]
    async fn test_sandbox_info_requires_app_index() {
        let query = BundleQuery {
            bundle_name: "com.example.notes".to_string(),
            user_id: Some(100),
            app_index: None,
        };
        let err = sandbox_bundle_info(State(state()), Query(query))
            .await
            .unwrap_err();
        assert!(err.status_code.is_client_error());
    }

    #[tokio::test]
    async fn test_uid_lookup_reports_minus_one() {
        let query = BundleQuery {
            bundle_name: "missing".to_string(),
            user_id: None,
            app_index: None,
        };
        let Json(response) = uid_by_bundle_name(State(state()), Query(query)).await.unwrap();
        assert!(matches!(response, ApiResponse::Success { data: -1 }));
    }
}
