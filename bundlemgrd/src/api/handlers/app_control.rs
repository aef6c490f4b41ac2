//! App control handlers
//!
//! Install rules and running control rules may only be changed or read by
//! the enterprise device management caller.

use crate::api::error::ApiError;
use crate::api::{AppState, Caller};
use crate::api_ok;
use axum::{
    extract::{Query, State},
    Json,
};
use bundle_core::api::{
    ApiResponse, BundleQuery, InstallRuleQuery, InstallRuleRequest, RunningRuleRequest,
    UserQuery, UserRequest,
};
use bundle_core::{AppRunningControlRuleResult, DEFAULT_USER_ID};
use tracing::{debug, info};

/// `POST /api/v0/app-control/install-rule/add`
pub(crate) async fn add_install_rule(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<InstallRuleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        "Request: POST /api/v0/app-control/install-rule/add caller={} type={}",
        caller, request.rule_type
    );

    state.registry.write().await.add_install_rule(
        caller,
        &request.app_ids,
        request.rule_type,
        request.user_id,
    )?;
    api_ok!(())
}

/// `GET /api/v0/app-control/install-rule`
pub(crate) async fn install_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<InstallRuleQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!(
        "Request: GET /api/v0/app-control/install-rule caller={} type={}",
        caller, query.rule_type
    );

    let app_ids = state
        .registry
        .read()
        .await
        .install_rules(caller, query.rule_type, query.user_id)?;
    api_ok!(app_ids)
}

/// `POST /api/v0/app-control/install-rule/delete`
pub(crate) async fn delete_install_rule(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<InstallRuleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/app-control/install-rule/delete caller={}", caller);

    state.registry.write().await.delete_install_rule(
        caller,
        &request.app_ids,
        request.rule_type,
        request.user_id,
    )?;
    api_ok!(())
}

/// `POST /api/v0/app-control/install-rule/clean`
pub(crate) async fn clean_install_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<InstallRuleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/app-control/install-rule/clean caller={}", caller);

    state
        .registry
        .write()
        .await
        .clean_install_rules(caller, request.rule_type, request.user_id)?;
    info!("Cleaned install rules of type {}", request.rule_type);
    api_ok!(())
}

/// `POST /api/v0/app-control/running-rule/add`
pub(crate) async fn add_running_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RunningRuleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        "Request: POST /api/v0/app-control/running-rule/add caller={} rules={}",
        caller,
        request.rules.len()
    );

    state
        .registry
        .write()
        .await
        .add_running_rules(caller, &request.rules, request.user_id)?;
    api_ok!(())
}

/// `POST /api/v0/app-control/running-rule/delete`
pub(crate) async fn delete_running_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RunningRuleRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/app-control/running-rule/delete caller={}", caller);

    state
        .registry
        .write()
        .await
        .delete_running_rules(caller, &request.rules, request.user_id)?;
    api_ok!(())
}

/// `POST /api/v0/app-control/running-rule/clean`
pub(crate) async fn clean_running_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<UserRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/app-control/running-rule/clean caller={}", caller);

    state
        .registry
        .write()
        .await
        .clean_running_rules(caller, request.user_id)?;
    api_ok!(())
}

/// App ids holding a running control rule.
///
/// # Endpoint
///
/// `GET /api/v0/app-control/running-rule`
pub(crate) async fn running_rules(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<UserQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    debug!("Request: GET /api/v0/app-control/running-rule caller={}", caller);

    let app_ids = state
        .registry
        .read()
        .await
        .running_rules(caller, query.user_id)?;
    api_ok!(app_ids)
}

/// Running control rule applying to one bundle.
///
/// # Endpoint
///
/// `GET /api/v0/app-control/running-rule/result`
pub(crate) async fn running_rule_result(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<BundleQuery>,
) -> Result<Json<ApiResponse<AppRunningControlRuleResult>>, ApiError> {
    debug!("Request: GET /api/v0/app-control/running-rule/result {}", query.bundle_name);

    let result = state.registry.read().await.running_rule_result(
        caller,
        &query.bundle_name,
        query.user_id.unwrap_or(DEFAULT_USER_ID),
    )?;
    api_ok!(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;
    use bundle_core::codes::ERR_APP_CONTROL_RULE_TYPE_INVALID;
    use bundle_core::EDM_UID;

    #[tokio::test]
    async fn test_install_rule_handlers() {
        let state = AppState::new(BundleRegistry::builtin(), false);
        let request = InstallRuleRequest {
            app_ids: vec!["id1".to_string(), "id2".to_string()],
            rule_type: 0,
            user_id: 100,
        };
        let Json(response) = add_install_rule(State(state.clone()), Caller(EDM_UID), Json(request))
            .await
            .unwrap();
        assert!(matches!(response, ApiResponse::Success { .. }));

        let query = InstallRuleQuery {
            rule_type: 0,
            user_id: 100,
        };
        let Json(response) = install_rules(State(state.clone()), Caller(EDM_UID), Query(query))
            .await
            .unwrap();
        match response {
            ApiResponse::Success { data } => assert_eq!(data, vec!["id1", "id2"]),
            ApiResponse::Error { .. } => panic!("Expected success"),
        }

        let bad = InstallRuleRequest {
            app_ids: Vec::new(),
            rule_type: 5,
            user_id: 100,
        };
        let err = clean_install_rules(State(state), Caller(EDM_UID), Json(bad))
            .await
            .unwrap_err();
        assert_eq!(err.code, ERR_APP_CONTROL_RULE_TYPE_INVALID);
    }
}
