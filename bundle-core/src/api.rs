//! API models for the bundle manager REST API
//!
//! Request bodies, query strings and response payloads shared by the
//! `bundlemgrd` service and the `bundle_test_tool` client. Every response is
//! wrapped in an [`ApiResponse`] envelope.

use crate::codes::ErrCode;
use crate::types::{
    AppDistributionType, AppRunningControlRule, InstallParam, UninstallParam, Want,
};
use serde::{Deserialize, Serialize};

/// Header carrying the uid the request is made on behalf of
pub const CALLER_UID_HEADER: &str = "x-caller-uid";

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success { data: T },
    #[serde(rename = "error")]
    Error { code: ErrCode, error: String },
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Create an error response
    pub fn error(code: ErrCode, error: String) -> Self {
        Self::Error { code, error }
    }
}

/// Service information response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Service version
    pub version: String,
    /// Number of bundles in the registry
    pub bundle_count: usize,
    /// Installer backing the installer endpoints: "registry" or "mock"
    pub installer: String,
    /// Whether debug mode is enabled
    pub debug_mode: bool,
    /// Service uptime in seconds
    pub uptime: u64,
}

// Query strings

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuery {
    pub bundle_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuery {
    pub bundle_name: String,
    pub module_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    pub bundle_name: String,
    pub module_name: String,
    pub id: u32,
    #[serde(default)]
    pub density: u32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UidQuery {
    pub uid: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRuleQuery {
    pub rule_type: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributedNameQuery {
    pub network_id: String,
    pub access_token_id: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub profile_type: i32,
    pub bundle_name: String,
    #[serde(default)]
    pub module_name: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueTypeQuery {
    pub bundle_name: String,
    pub continue_type: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGroupDirQuery {
    pub data_group_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIdQuery {
    pub app_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuery {
    pub access_token_id: u32,
}

// Request bodies

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAbilityRequest {
    pub want: Want,
    pub flag: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRemovableRequest {
    pub bundle_name: String,
    pub module_name: String,
    pub removable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRuleRequest {
    #[serde(default)]
    pub app_ids: Vec<String>,
    pub rule_type: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningRuleRequest {
    pub rules: Vec<AppRunningControlRule>,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanCacheRequest {
    pub cache_size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyFilesRequest {
    pub source_files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployQuickFixRequest {
    pub bundle_file_paths: Vec<String>,
    pub is_debug: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchQuickFixRequest {
    pub bundle_name: String,
    pub enable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleNameRequest {
    pub bundle_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugModeRequest {
    pub enable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatsRequest {
    pub bundle_names: Vec<String>,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAotRequest {
    pub bundle_name: String,
    pub module_name: String,
    pub trigger_mode: i32,
    pub uid: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEventRequest {
    pub action: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtNameOrMimeRequest {
    pub bundle_name: String,
    pub module_name: String,
    pub ability_name: String,
    #[serde(default)]
    pub ext_name: String,
    #[serde(default)]
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplicitQueryRequest {
    pub want: Want,
    pub flags: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedStatusRequest {
    pub bundle_name: String,
    pub is_existed: bool,
    pub app_index: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAppInfoRequest {
    pub uids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionTypesRequest {
    pub types: Vec<AppDistributionType>,
}

/// App identifier and clone index behind an access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIdentifierResponse {
    pub app_identifier: String,
    pub app_index: i32,
}

// Installer bodies

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub bundle_file_paths: Vec<String>,
    #[serde(default)]
    pub param: InstallParam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallRequest {
    pub bundle_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default)]
    pub param: InstallParam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallWithParamRequest {
    pub param: UninstallParam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverRequest {
    pub bundle_name: String,
    #[serde(default)]
    pub param: InstallParam,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxInstallRequest {
    pub bundle_name: String,
    pub dlp_type: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxUninstallRequest {
    pub bundle_name: String,
    pub app_index: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxInstallResponse {
    pub app_index: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStreamInstallerRequest {
    #[serde(default)]
    pub param: InstallParam,
    #[serde(default)]
    pub origin_hap_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyStreamInstallerRequest {
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_carries_code() {
        let response: ApiResponse<()> = ApiResponse::error(42, "denied".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"error","code":42,"error":"denied"}"#);

        let parsed: ApiResponse<String> = serde_json::from_str(&json).unwrap();
        match parsed {
            ApiResponse::Error { code, error } => {
                assert_eq!(code, 42);
                assert_eq!(error, "denied");
            }
            ApiResponse::Success { .. } => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_success_envelope() {
        let json = r#"{"status":"success","data":[1,2,3]}"#;
        let parsed: ApiResponse<Vec<i64>> = serde_json::from_str(json).unwrap();
        match parsed {
            ApiResponse::Success { data } => assert_eq!(data, vec![1, 2, 3]),
            ApiResponse::Error { .. } => panic!("Expected success response"),
        }
    }

    #[test]
    fn test_bundle_query_skips_absent_fields() {
        let query = BundleQuery {
            bundle_name: "com.example.app".to_string(),
            user_id: Some(100),
            app_index: None,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["bundleName"], "com.example.app");
        assert_eq!(json["userId"], 100);
        assert!(json.get("appIndex").is_none());
    }
}
