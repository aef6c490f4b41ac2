//! Ability, module and resource handlers

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::api_ok;
use axum::{
    extract::{Query, State},
    Json,
};
use bundle_core::api::{
    ApiResponse, CheckAbilityRequest, ContinueTypeQuery, ExtNameOrMimeRequest,
    ImplicitQueryRequest, ModuleQuery, ProfileQuery, ResourceQuery, SetRemovableRequest,
    UserQuery,
};
use bundle_core::{AbilityInfo, ProxyData, DEFAULT_USER_ID};
use tracing::{debug, info};

/// Check whether an ability may be installed.
///
/// # Endpoint
///
/// `POST /api/v0/ability/check`
pub(crate) async fn check_ability(
    State(state): State<AppState>,
    Json(request): Json<CheckAbilityRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: POST /api/v0/ability/check {}", request.want);

    let enabled = state
        .registry
        .read()
        .await
        .check_ability_enable_install(&request.want, request.user_id)?;
    api_ok!(enabled)
}

/// `POST /api/v0/module/removable`
pub(crate) async fn set_module_removable(
    State(state): State<AppState>,
    Json(request): Json<SetRemovableRequest>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!(
        "Request: POST /api/v0/module/removable {}/{}",
        request.bundle_name, request.module_name
    );

    let done = state.registry.write().await.set_module_removable(
        &request.bundle_name,
        &request.module_name,
        request.removable,
    )?;
    api_ok!(done)
}

/// `GET /api/v0/module/removable`
pub(crate) async fn is_module_removable(
    State(state): State<AppState>,
    Query(query): Query<ModuleQuery>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: GET /api/v0/module/removable {}/{}", query.bundle_name, query.module_name);

    let removable = state
        .registry
        .read()
        .await
        .is_module_removable(&query.bundle_name, &query.module_name)?;
    api_ok!(removable)
}

/// Look up a string resource. Unknown resources yield an empty string.
///
/// # Endpoint
///
/// `GET /api/v0/resource/string`
pub(crate) async fn string_by_id(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/resource/string id={}", query.id);

    let value = state.registry.read().await.string_by_id(
        &query.bundle_name,
        &query.module_name,
        query.id,
        query.user_id,
    );
    api_ok!(value)
}

/// Look up an icon resource at a density.
///
/// # Endpoint
///
/// `GET /api/v0/resource/icon`
pub(crate) async fn icon_by_id(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/resource/icon id={} density={}", query.id, query.density);

    let value = state.registry.read().await.icon_by_id(
        &query.bundle_name,
        &query.module_name,
        query.id,
        query.density,
        query.user_id,
    );
    api_ok!(value)
}

/// Proxy data of one module, or of every module when the module name is empty.
///
/// # Endpoint
///
/// `GET /api/v0/proxy-data`
pub(crate) async fn proxy_data_infos(
    State(state): State<AppState>,
    Query(query): Query<ModuleQuery>,
) -> Result<Json<ApiResponse<Vec<ProxyData>>>, ApiError> {
    debug!("Request: GET /api/v0/proxy-data {}", query.bundle_name);

    let datas = state.registry.read().await.proxy_data_infos(
        &query.bundle_name,
        &query.module_name,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
    )?;
    api_ok!(datas)
}

/// `GET /api/v0/proxy-data/all`
pub(crate) async fn all_proxy_data_infos(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<Vec<ProxyData>>>, ApiError> {
    debug!("Request: GET /api/v0/proxy-data/all user={}", query.user_id);

    let datas = state
        .registry
        .read()
        .await
        .all_proxy_data_infos(query.user_id)?;
    api_ok!(datas)
}

/// `POST /api/v0/ext-mime/set`
pub(crate) async fn set_ext_name_or_mime(
    State(state): State<AppState>,
    Json(request): Json<ExtNameOrMimeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/ext-mime/set {}", request.bundle_name);

    state.registry.write().await.set_ext_name_or_mime(
        &request.bundle_name,
        &request.module_name,
        &request.ability_name,
        &request.ext_name,
        &request.mime_type,
    )?;
    info!(
        "Bound ext '{}' mime '{}' to {}",
        request.ext_name, request.mime_type, request.ability_name
    );
    api_ok!(())
}

/// `POST /api/v0/ext-mime/delete`
pub(crate) async fn del_ext_name_or_mime(
    State(state): State<AppState>,
    Json(request): Json<ExtNameOrMimeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/ext-mime/delete {}", request.bundle_name);

    state.registry.write().await.del_ext_name_or_mime(
        &request.bundle_name,
        &request.module_name,
        &request.ability_name,
        &request.ext_name,
        &request.mime_type,
    )?;
    api_ok!(())
}

/// Raw JSON profile of a module.
///
/// # Endpoint
///
/// `GET /api/v0/profile/json`
pub(crate) async fn json_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/profile/json type={} {}", query.profile_type, query.bundle_name);

    let profile = state.registry.read().await.json_profile(
        query.profile_type,
        &query.bundle_name,
        &query.module_name,
        query.user_id,
    )?;
    api_ok!(profile)
}

/// Abilities matching an implicit want, with matching skill uris marked.
///
/// # Endpoint
///
/// `POST /api/v0/ability/implicit-query`
pub(crate) async fn implicit_query_skill_uri(
    State(state): State<AppState>,
    Json(request): Json<ImplicitQueryRequest>,
) -> Result<Json<ApiResponse<Vec<AbilityInfo>>>, ApiError> {
    debug!("Request: POST /api/v0/ability/implicit-query {} flags={}", request.want, request.flags);

    let abilities = state
        .registry
        .read()
        .await
        .implicit_query_skill_uri(&request.want, request.user_id)?;
    info!("Implicit query matched {} abilities", abilities.len());
    api_ok!(abilities)
}

/// `GET /api/v0/ability/continue-type`
pub(crate) async fn ability_by_continue_type(
    State(state): State<AppState>,
    Query(query): Query<ContinueTypeQuery>,
) -> Result<Json<ApiResponse<AbilityInfo>>, ApiError> {
    debug!(
        "Request: GET /api/v0/ability/continue-type {} {}",
        query.bundle_name, query.continue_type
    );

    let ability = state.registry.read().await.ability_by_continue_type(
        &query.bundle_name,
        &query.continue_type,
        query.user_id,
    )?;
    api_ok!(ability)
}
