//! Info handlers for service information and root endpoint

use crate::api::error::ApiError;
use crate::api::AppState;

use axum::{extract::State, Json};
use bundle_core::api::{ApiResponse, InfoResponse};
use serde_json::{json, Value};
use tracing::debug;

/// Handle the root endpoint.
///
/// Provide basic service identification and status. Useful for health checks
/// and verifying the API is accessible.
///
/// # Endpoint
///
/// `GET /`
pub(crate) async fn root() -> Result<Json<ApiResponse<Value>>, ApiError> {
    debug!("Request: GET /");

    let data = json!({
        "service": "Bundle Manager Mock Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    });

    Ok(Json(ApiResponse::success(data)))
}

/// Retrieve service information.
///
/// # Endpoint
///
/// `GET /api/v0/info`
///
/// # Returns
///
/// - `version` - Service version
/// - `bundle_count` - Installed bundles in the registry
/// - `installer` - Installer serving the installer routes
/// - `debug_mode` - Current debug mode switch
/// - `uptime` - Service uptime in seconds
pub(crate) async fn get_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InfoResponse>>, ApiError> {
    debug!("Request: GET /api/v0/info");

    let registry = state.registry.read().await;

    let info_response = InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        bundle_count: registry.bundle_count(),
        installer: state.installer_kind.to_string(),
        debug_mode: registry.debug_mode(),
        uptime: state.start_time.elapsed().as_secs(),
    };

    Ok(Json(ApiResponse::success(info_response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BundleRegistry;

    #[tokio::test]
    async fn test_info_reports_mock_installer() {
        let state = AppState::new(BundleRegistry::builtin(), true);
        let Json(response) = get_info(State(state)).await.unwrap();
        match response {
            ApiResponse::Success { data } => {
                assert_eq!(data.installer, "mock");
                assert!(!data.debug_mode);
            }
            ApiResponse::Error { .. } => panic!("Expected success"),
        }
    }

    #[test]
    fn test_info_response_serialization() {
        let info = InfoResponse {
            version: "0.1.0".to_string(),
            bundle_count: 3,
            installer: "registry".to_string(),
            debug_mode: false,
            uptime: 12,
        };
        let json: Value = serde_json::to_value(&info).unwrap();
        assert_eq!(json["bundle_count"], 3);
        assert_eq!(json["installer"], "registry");
    }
}
