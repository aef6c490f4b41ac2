//! Core types and data structures exchanged with the bundle manager service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default user that owns bundles when no user id is given
pub const DEFAULT_USER_ID: i32 = 100;

/// Uid of the enterprise device management caller used by app control rules
pub const EDM_UID: i32 = 3057;

/// Uid of the foundation process, the default bundle event subscriber
pub const FOUNDATION_UID: i32 = 5523;

/// Uid allowed to update the encrypted status of an application
pub const CODE_PROTECT_UID: i32 = 7666;

/// Sandbox (DLP) app indices are allocated above this value
pub const INITIAL_SANDBOX_APP_INDEX: i32 = 1000;

/// Uid range reserved for each user
pub const BASE_USER_RANGE: i32 = 200_000;

/// First application uid within a user range
pub const BASE_APP_UID: i32 = 10_000;

/// Install parameter requesting an enterprise forced uninstall
pub const VERIFY_UNINSTALL_FORCED_KEY: &str = "ohos.bms.param.verifyUninstallForced";
pub const VERIFY_UNINSTALL_FORCED_VALUE: &str = "true";

/// Common event published by `sendCommonEvent`
pub const COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED: &str = "usual.event.CHARGE_IDLE_MODE_CHANGED";

/// Compute the uid an application gets for a user.
pub fn app_uid(user_id: i32, index: i32) -> i32 {
    user_id * BASE_USER_RANGE + BASE_APP_UID + index
}

/// Recover the user id a uid belongs to.
pub fn user_id_of(uid: i32) -> i32 {
    uid / BASE_USER_RANGE
}

/// Fully qualified ability name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementName {
    pub device_id: String,
    pub bundle_name: String,
    pub module_name: String,
    pub ability_name: String,
}

/// Intent used for implicit queries and control wants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Want {
    pub action: String,
    pub entities: Vec<String>,
    pub element: ElementName,
    pub uri: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl fmt::Display for Want {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// A running-control rule for an application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRunningControlRule {
    pub app_id: String,
    pub control_message: String,
}

/// Running-control rule applying to a given bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppRunningControlRuleResult {
    pub control_message: String,
    pub control_want: Option<Want>,
}

/// Per-bundle result of a batch storage statistics query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStorageStats {
    pub bundle_name: String,
    #[serde(default)]
    pub bundle_stats: Vec<i64>,
    #[serde(default)]
    pub err_code: i32,
}

/// Certificate validity window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    pub not_before: i64,
    pub not_after: i64,
}

/// Provisioning profile of an installed application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppProvisionInfo {
    pub version_code: u32,
    pub version_name: String,
    pub uuid: String,
    #[serde(rename = "type")]
    pub provision_type: String,
    pub app_distribution_type: String,
    pub developer_id: String,
    pub certificate: String,
    pub apl: String,
    pub issuer: String,
    pub validity: Validity,
    pub app_service_capabilities: String,
}

/// A data group shared between applications of one developer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataGroupInfo {
    pub data_group_id: String,
    pub uuid: String,
    pub uid: i32,
    pub gid: i32,
    pub user_id: i32,
}

impl fmt::Display for DataGroupInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ dataGroupId = {}, uuid = {}, uid = {}, gid = {}, userId = {}]",
            self.data_group_id, self.uuid, self.uid, self.gid, self.user_id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub name: String,
    pub value: String,
    pub resource: String,
}

/// Data exposed by a module through a proxy uri
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyData {
    pub uri: String,
    pub required_read_permission: String,
    pub required_write_permission: String,
    pub metadata: Metadata,
}

/// Uri filter of a skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillUri {
    pub scheme: String,
    pub host: String,
    pub port: String,
    pub path: String,
    pub path_start_with: String,
    pub path_regex: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub utd: String,
    pub max_file_supported: i32,
    pub link_feature: String,
    pub is_match: bool,
}

/// Intent filter declared by an ability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub actions: Vec<String>,
    pub entities: Vec<String>,
    pub uris: Vec<SkillUri>,
}

/// Ability declared by a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbilityInfo {
    pub name: String,
    pub bundle_name: String,
    pub module_name: String,
    pub label: String,
    pub description: String,
    pub visible: bool,
    pub continue_type: Vec<String>,
    pub skills: Vec<Skill>,
    /// Uris of the skill that matched an implicit query
    pub skill_uri: Vec<SkillUri>,
}

/// Data directory of a bundle (or one of its clones)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleDir {
    pub bundle_name: String,
    pub app_index: i32,
    pub dir: String,
}

impl fmt::Display for BundleDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ bundleName = {}, appIndex = {}, dir = {}]",
            self.bundle_name, self.app_index, self.dir
        )
    }
}

/// Bundle identity resolved from a uid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimpleAppInfo {
    pub uid: i32,
    pub bundle_name: String,
    pub app_index: i32,
    pub ret: i32,
}

impl fmt::Display for SimpleAppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ uid = {}, bundleName = {}, appIndex = {}, ret = {}]",
            self.uid, self.bundle_name, self.app_index, self.ret
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationInfo {
    pub name: String,
    pub bundle_name: String,
    pub uid: i32,
    pub app_index: i32,
    pub removable: bool,
    pub is_system_app: bool,
    pub debug: bool,
    pub app_distribution_type: String,
    pub api_compatible_version: u32,
    pub asset_access_groups: Vec<String>,
}

/// Description of an installed (or formerly installed) bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleInfo {
    pub name: String,
    pub version_code: u32,
    pub version_name: String,
    pub uid: i32,
    pub app_id: String,
    pub app_index: i32,
    pub install_time: i64,
    pub update_time: i64,
    pub entry_module_name: String,
    pub hap_module_names: Vec<String>,
    pub application_info: ApplicationInfo,
}

/// Kind of patch carried by a quick fix package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickFixType {
    #[default]
    Patch,
    HotReload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployQuickFixResult {
    pub result_code: i32,
    pub bundle_name: String,
    pub bundle_version_code: u32,
    pub patch_version_code: u32,
    pub is_so_contained: bool,
    #[serde(rename = "type")]
    pub patch_type: QuickFixType,
    pub module_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchQuickFixResult {
    pub result_code: i32,
    pub bundle_name: String,
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteQuickFixResult {
    pub result_code: i32,
    pub bundle_name: String,
}

/// Outcome of a quick fix operation, as delivered to its status callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum QuickFixResult {
    Deploy(DeployQuickFixResult),
    Switch(SwitchQuickFixResult),
    Delete(DeleteQuickFixResult),
}

impl QuickFixResult {
    pub fn result_code(&self) -> i32 {
        match self {
            QuickFixResult::Deploy(r) => r.result_code,
            QuickFixResult::Switch(r) => r.result_code,
            QuickFixResult::Delete(r) => r.result_code,
        }
    }
}

impl fmt::Display for QuickFixResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Distribution channel an application may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum AppDistributionType {
    AppGallery = 1,
    Enterprise = 2,
    EnterpriseNormal = 3,
    EnterpriseMdm = 4,
    InternalTesting = 5,
    CrowdTesting = 6,
}

impl TryFrom<i32> for AppDistributionType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::AppGallery),
            2 => Ok(Self::Enterprise),
            3 => Ok(Self::EnterpriseNormal),
            4 => Ok(Self::EnterpriseMdm),
            5 => Ok(Self::InternalTesting),
            6 => Ok(Self::CrowdTesting),
            other => Err(format!("invalid app distribution type: {}", other)),
        }
    }
}

impl From<AppDistributionType> for i32 {
    fn from(value: AppDistributionType) -> Self {
        value as i32
    }
}

impl AppDistributionType {
    /// Name used in provisioning profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppGallery => "app_gallery",
            Self::Enterprise => "enterprise",
            Self::EnterpriseNormal => "enterprise_normal",
            Self::EnterpriseMdm => "enterprise_mdm",
            Self::InternalTesting => "internaltesting",
            Self::CrowdTesting => "crowdtesting",
        }
    }
}

/// Parameters attached to an install or uninstall request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallParam {
    pub user_id: i32,
    pub is_keep_data: bool,
    pub parameters: BTreeMap<String, String>,
}

impl Default for InstallParam {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID,
            is_keep_data: false,
            parameters: BTreeMap::new(),
        }
    }
}

impl InstallParam {
    /// Whether the request asks for an enterprise forced uninstall
    pub fn is_forced_uninstall(&self) -> bool {
        self.parameters
            .get(VERIFY_UNINSTALL_FORCED_KEY)
            .is_some_and(|v| v == VERIFY_UNINSTALL_FORCED_VALUE)
    }
}

/// Parameters of a shared-bundle uninstall
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UninstallParam {
    pub bundle_name: String,
    pub module_name: String,
    pub version_code: u32,
    pub user_id: i32,
}

/// Final status of an installer operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub code: i32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_layout() {
        assert_eq!(app_uid(100, 1), 20_010_001);
        assert_eq!(user_id_of(app_uid(100, 1)), 100);
        assert_eq!(user_id_of(app_uid(0, 5)), 0);
    }

    #[test]
    fn test_app_distribution_type_range() {
        for value in 1..=6 {
            let kind = AppDistributionType::try_from(value).unwrap();
            assert_eq!(i32::from(kind), value);
        }
        assert!(AppDistributionType::try_from(0).is_err());
        assert!(AppDistributionType::try_from(7).is_err());
    }

    #[test]
    fn test_app_distribution_type_serializes_as_int() {
        let json = serde_json::to_string(&vec![
            AppDistributionType::AppGallery,
            AppDistributionType::CrowdTesting,
        ])
        .unwrap();
        assert_eq!(json, "[1,6]");

        let err = serde_json::from_str::<AppDistributionType>("9");
        assert!(err.is_err());
    }

    #[test]
    fn test_display_forms() {
        let info = DataGroupInfo {
            data_group_id: "group1".to_string(),
            uuid: "u-1".to_string(),
            uid: 20010001,
            gid: 20010001,
            user_id: 100,
        };
        assert_eq!(
            info.to_string(),
            "[ dataGroupId = group1, uuid = u-1, uid = 20010001, gid = 20010001, userId = 100]"
        );

        let dir = BundleDir {
            bundle_name: "com.example.app".to_string(),
            app_index: 0,
            dir: "com.example.app".to_string(),
        };
        assert_eq!(
            dir.to_string(),
            "[ bundleName = com.example.app, appIndex = 0, dir = com.example.app]"
        );
    }

    #[test]
    fn test_quick_fix_result_display_is_compact_json() {
        let result = QuickFixResult::Delete(DeleteQuickFixResult {
            result_code: 0,
            bundle_name: "com.example.app".to_string(),
        });
        assert_eq!(
            result.to_string(),
            r#"{"command":"delete","resultCode":0,"bundleName":"com.example.app"}"#
        );
    }

    #[test]
    fn test_forced_uninstall_flag() {
        let mut param = InstallParam::default();
        assert_eq!(param.user_id, DEFAULT_USER_ID);
        assert!(!param.is_forced_uninstall());

        param.parameters.insert(
            VERIFY_UNINSTALL_FORCED_KEY.to_string(),
            VERIFY_UNINSTALL_FORCED_VALUE.to_string(),
        );
        assert!(param.is_forced_uninstall());
    }
}
