//! Storage statistics, provisioning and bundle cache handlers

use crate::api::error::ApiError;
use crate::api::{AppState, Caller};
use crate::api_ok;
use axum::{
    extract::{Query, State},
    Json,
};
use bundle_core::api::{
    ApiResponse, BatchStatsRequest, BundleQuery, CleanCacheRequest, DistributedNameQuery,
};
use bundle_core::{AppProvisionInfo, BundleStorageStats, DEFAULT_USER_ID};
use tracing::{debug, info};

/// Storage statistics of a bundle.
///
/// # Endpoint
///
/// `GET /api/v0/bundle/stats`
///
/// # Returns
///
/// Five sizes in bytes: app data, user data, distributed data, database and
/// cache.
pub(crate) async fn bundle_stats(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<Vec<i64>>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/stats {}", query.bundle_name);

    let stats = state.registry.read().await.bundle_stats(
        &query.bundle_name,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
        query.app_index.unwrap_or_default(),
    )?;
    api_ok!(stats)
}

/// `POST /api/v0/bundle/stats/batch`
pub(crate) async fn batch_bundle_stats(
    State(state): State<AppState>,
    Json(request): Json<BatchStatsRequest>,
) -> Result<Json<ApiResponse<Vec<BundleStorageStats>>>, ApiError> {
    debug!("Request: POST /api/v0/bundle/stats/batch {:?}", request.bundle_names);

    let stats = state
        .registry
        .read()
        .await
        .batch_bundle_stats(&request.bundle_names, request.user_id)?;
    api_ok!(stats)
}

/// `GET /api/v0/bundle/provision`
pub(crate) async fn app_provision_info(
    State(state): State<AppState>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<AppProvisionInfo>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/provision {}", query.bundle_name);

    let info = state
        .registry
        .read()
        .await
        .app_provision_info(&query.bundle_name, query.user_id.unwrap_or(DEFAULT_USER_ID))?;
    api_ok!(info)
}

/// Bundle name reachable on a remote device; empty when nothing matches.
///
/// # Endpoint
///
/// `GET /api/v0/bundle/distributed-name`
pub(crate) async fn distributed_bundle_name(
    State(state): State<AppState>,
    Query(query): Query<DistributedNameQuery>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    debug!("Request: GET /api/v0/bundle/distributed-name network={}", query.network_id);

    let name = state
        .registry
        .read()
        .await
        .distributed_bundle_name(&query.network_id, query.access_token_id)?;
    api_ok!(name)
}

/// Clean caches until at least the requested size is freed.
///
/// # Endpoint
///
/// `POST /api/v0/cache/clean-automatic`
pub(crate) async fn clean_cache_automatic(
    State(state): State<AppState>,
    Json(request): Json<CleanCacheRequest>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    debug!("Request: POST /api/v0/cache/clean-automatic size={}", request.cache_size);

    let cleaned = state
        .registry
        .write()
        .await
        .clean_cache_automatic(request.cache_size)?;
    api_ok!(cleaned)
}

/// `GET /api/v0/cache/stat`
pub(crate) async fn all_bundle_cache_stat(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    debug!("Request: GET /api/v0/cache/stat caller={}", caller);

    let size = state.registry.read().await.all_bundle_cache_stat(caller)?;
    info!("All bundle cache: {} bytes", size);
    api_ok!(size)
}

/// `POST /api/v0/cache/clean`
pub(crate) async fn clean_all_bundle_cache(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    debug!("Request: POST /api/v0/cache/clean caller={}", caller);

    let result = state.registry.write().await.clean_all_bundle_cache(caller)?;
    api_ok!(result)
}
