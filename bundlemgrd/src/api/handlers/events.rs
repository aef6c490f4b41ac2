//! Bundle event callbacks, AOT compile status and common events

use crate::api::error::ApiError;
use crate::api::{AppState, Caller};
use crate::api_ok;
use axum::{extract::State, Json};
use bundle_core::api::{ApiResponse, CommonEventRequest, ResetAotRequest};
use tracing::{debug, info};

/// `POST /api/v0/event-callback/register`
pub(crate) async fn register_event_callback(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: POST /api/v0/event-callback/register caller={}", caller);

    let registered = state.registry.write().await.register_event_callback(caller);
    info!("Event callback of {} registered: {}", caller, registered);
    api_ok!(registered)
}

/// `POST /api/v0/event-callback/unregister`
pub(crate) async fn unregister_event_callback(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    debug!("Request: POST /api/v0/event-callback/unregister caller={}", caller);

    let unregistered = state
        .registry
        .write()
        .await
        .unregister_event_callback(caller);
    api_ok!(unregistered)
}

/// Reset the AOT compile status of a module.
///
/// # Endpoint
///
/// `POST /api/v0/aot/reset`
pub(crate) async fn reset_aot_compile_status(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<ResetAotRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        "Request: POST /api/v0/aot/reset {}/{} caller={}",
        request.bundle_name, request.module_name, caller
    );

    state.registry.read().await.reset_aot_compile_status(
        caller,
        &request.bundle_name,
        &request.module_name,
        request.trigger_mode,
    )?;
    api_ok!(())
}

/// `POST /api/v0/common-event`
pub(crate) async fn publish_common_event(
    State(state): State<AppState>,
    Json(request): Json<CommonEventRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!("Request: POST /api/v0/common-event {}", request.action);

    if request.action.is_empty() {
        return Err(ApiError::bad_request("Common event action is empty"));
    }
    state
        .registry
        .write()
        .await
        .publish_common_event(&request.action);
    api_ok!(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;
    use bundle_core::{COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED, FOUNDATION_UID};

    #[tokio::test]
    async fn test_register_then_unregister() {
        let state = AppState::new(BundleRegistry::builtin(), false);
        let Json(response) = register_event_callback(State(state.clone()), Caller(FOUNDATION_UID))
            .await
            .unwrap();
        assert!(matches!(response, ApiResponse::Success { data: true }));

        let Json(response) =
            unregister_event_callback(State(state.clone()), Caller(FOUNDATION_UID))
                .await
                .unwrap();
        assert!(matches!(response, ApiResponse::Success { data: true }));

        let Json(response) = register_event_callback(State(state), Caller(20_010_001))
            .await
            .unwrap();
        assert!(matches!(response, ApiResponse::Success { data: false }));
    }

    #[tokio::test]
    async fn test_common_event_is_recorded() {
        let state = AppState::new(BundleRegistry::builtin(), false);
        let Json(response) = publish_common_event(
            State(state.clone()),
            Json(CommonEventRequest {
                action: COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED.to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(matches!(response, ApiResponse::Success { .. }));

        let registry = state.registry.read().await;
        assert_eq!(
            registry.published_events(),
            [COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED.to_string()]
        );
    }
}
