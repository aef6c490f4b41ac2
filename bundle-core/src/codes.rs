//! Error codes shared by the bundle manager service and its clients
//!
//! Codes are plain `i32` values so they travel unchanged through the wire
//! envelope. Three families exist:
//!
//! - installer status codes, delivered through [`crate::StatusReceiver`]
//! - bundle manager codes, returned by query and control calls
//! - quick fix and debug mode codes, which carry fixed user-facing messages

/// Numeric result code returned by every service call.
pub type ErrCode = i32;

pub const ERR_OK: ErrCode = 0;
pub const ERR_INVALID_VALUE: ErrCode = 22;
pub const ERR_BUNDLEMANAGER_FEATURE_IS_NOT_SUPPORTED: ErrCode = 801;

// Installer status codes
pub const ERR_INSTALL_INTERNAL_ERROR: ErrCode = 1;
pub const ERR_INSTALL_PARAM_ERROR: ErrCode = 2;
pub const ERR_UNINSTALL_INVALID_NAME: ErrCode = 60;
pub const ERR_UNINSTALL_PARAM_ERROR: ErrCode = 61;
pub const ERR_UNINSTALL_PERMISSION_DENIED: ErrCode = 62;
pub const ERR_UNINSTALL_BUNDLE_MGR_SERVICE_ERROR: ErrCode = 63;
pub const ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE: ErrCode = 64;
pub const ERR_UNINSTALL_MISSING_INSTALLED_MODULE: ErrCode = 65;
pub const ERR_UNINSTALL_SYSTEM_APP_ERROR: ErrCode = 66;
pub const ERR_FAILED_SERVICE_DIED: ErrCode = 124;
pub const ERR_OPERATION_TIME_OUT: ErrCode = 125;
pub const ERR_UNKNOWN: ErrCode = 126;

const BUNDLE_MANAGER_OFFSET: ErrCode = 8_521_216;

pub const ERR_BUNDLE_MANAGER_INTERNAL_ERROR: ErrCode = BUNDLE_MANAGER_OFFSET + 1;
pub const ERR_BUNDLE_MANAGER_PARAM_ERROR: ErrCode = BUNDLE_MANAGER_OFFSET + 2;
pub const ERR_BUNDLE_MANAGER_PERMISSION_DENIED: ErrCode = BUNDLE_MANAGER_OFFSET + 3;
pub const ERR_BUNDLE_MANAGER_INVALID_USER_ID: ErrCode = BUNDLE_MANAGER_OFFSET + 4;
pub const ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 5;
pub const ERR_BUNDLE_MANAGER_MODULE_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 6;
pub const ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 7;
pub const ERR_BUNDLE_MANAGER_PROFILE_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 8;
pub const ERR_BUNDLE_MANAGER_INVALID_APP_INDEX: ErrCode = BUNDLE_MANAGER_OFFSET + 9;
pub const ERR_BUNDLE_MANAGER_GET_DIR_INVALID_APP_INDEX: ErrCode = BUNDLE_MANAGER_OFFSET + 10;
pub const ERR_BUNDLE_MANAGER_SANDBOX_APP_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 11;
pub const ERR_BUNDLE_MANAGER_DATA_GROUP_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 12;
pub const ERR_BUNDLE_MANAGER_NO_PROXY_DATA: ErrCode = BUNDLE_MANAGER_OFFSET + 13;
pub const ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR: ErrCode = BUNDLE_MANAGER_OFFSET + 14;
pub const ERR_BUNDLE_MANAGER_INVALID_UID: ErrCode = BUNDLE_MANAGER_OFFSET + 15;
pub const ERR_BUNDLE_MANAGER_INVALID_TYPE: ErrCode = BUNDLE_MANAGER_OFFSET + 16;
pub const ERR_APP_CONTROL_PERMISSION_DENIED: ErrCode = BUNDLE_MANAGER_OFFSET + 17;
pub const ERR_APP_CONTROL_RULE_NOT_EXIST: ErrCode = BUNDLE_MANAGER_OFFSET + 18;
pub const ERR_APP_CONTROL_RULE_TYPE_INVALID: ErrCode = BUNDLE_MANAGER_OFFSET + 19;

const QUICK_FIX_OFFSET: ErrCode = BUNDLE_MANAGER_OFFSET + 0x100;

pub const ERR_BUNDLEMANAGER_QUICK_FIX_INTERNAL_ERROR: ErrCode = QUICK_FIX_OFFSET + 1;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR: ErrCode = QUICK_FIX_OFFSET + 2;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PROFILE_PARSE_FAILED: ErrCode = QUICK_FIX_OFFSET + 3;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 4;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_CODE_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 5;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_NAME_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 6;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_VERSION_CODE_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 7;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_VERSION_NAME_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 8;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_TYPE_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 9;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_UNKNOWN_QUICK_FIX_TYPE: ErrCode = QUICK_FIX_OFFSET + 10;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_SO_INCOMPATIBLE: ErrCode = QUICK_FIX_OFFSET + 11;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_MODULE_NAME_SAME: ErrCode = QUICK_FIX_OFFSET + 12;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_EXIST: ErrCode = QUICK_FIX_OFFSET + 13;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_MODULE_NAME_NOT_EXIST: ErrCode = QUICK_FIX_OFFSET + 14;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_SIGNATURE_INFO_NOT_SAME: ErrCode = QUICK_FIX_OFFSET + 15;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_ADD_HQF_FAILED: ErrCode = QUICK_FIX_OFFSET + 16;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_SAVE_APP_QUICK_FIX_FAILED: ErrCode = QUICK_FIX_OFFSET + 17;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_CODE_ERROR: ErrCode = QUICK_FIX_OFFSET + 18;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE: ErrCode = QUICK_FIX_OFFSET + 19;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_INVALID_PATCH_STATUS: ErrCode = QUICK_FIX_OFFSET + 20;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_NOT_EXISTED_BUNDLE_INFO: ErrCode = QUICK_FIX_OFFSET + 21;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_REMOVE_PATCH_PATH_FAILED: ErrCode = QUICK_FIX_OFFSET + 22;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_EXTRACT_DIFF_FILES_FAILED: ErrCode = QUICK_FIX_OFFSET + 23;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_APPLY_DIFF_PATCH_FAILED: ErrCode = QUICK_FIX_OFFSET + 24;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_UNKNOWN: ErrCode = QUICK_FIX_OFFSET + 25;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT: ErrCode = QUICK_FIX_OFFSET + 26;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED: ErrCode = QUICK_FIX_OFFSET + 27;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_HOT_RELOAD_NOT_SUPPORT_RELEASE_BUNDLE: ErrCode =
    QUICK_FIX_OFFSET + 28;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_ALREADY_EXISTED: ErrCode = QUICK_FIX_OFFSET + 29;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_HOT_RELOAD_ALREADY_EXISTED: ErrCode = QUICK_FIX_OFFSET + 30;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_INFO_IN_BUNDLE_INFO: ErrCode = QUICK_FIX_OFFSET + 31;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_MOVE_PATCH_FILE_FAILED: ErrCode = QUICK_FIX_OFFSET + 32;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_CREATE_PATCH_PATH_FAILED: ErrCode = QUICK_FIX_OFFSET + 33;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_OLD_PATCH_OR_HOT_RELOAD_IN_DB: ErrCode =
    QUICK_FIX_OFFSET + 34;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_SEND_REQUEST_FAILED: ErrCode = QUICK_FIX_OFFSET + 35;
pub const ERR_BUNDLEMANAGER_QUICK_FIX_RELEASE_HAP_HAS_RESOURCES_FILE_FAILED: ErrCode =
    QUICK_FIX_OFFSET + 36;

const DEBUG_MODE_OFFSET: ErrCode = BUNDLE_MANAGER_OFFSET + 0x200;

pub const ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM: ErrCode = DEBUG_MODE_OFFSET + 1;
pub const ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INTERNAL_ERROR: ErrCode = DEBUG_MODE_OFFSET + 2;
pub const ERR_BUNDLEMANAGER_SET_DEBUG_MODE_PARCEL_ERROR: ErrCode = DEBUG_MODE_OFFSET + 3;
pub const ERR_BUNDLEMANAGER_SET_DEBUG_MODE_SEND_REQUEST_ERROR: ErrCode = DEBUG_MODE_OFFSET + 4;
pub const ERR_BUNDLEMANAGER_SET_DEBUG_MODE_UID_CHECK_FAILED: ErrCode = DEBUG_MODE_OFFSET + 5;

const MSG_UNKNOWN: &str = "error: unknown.\n";

/// Fixed message for a quick fix or debug mode code.
///
/// `ERR_OK` maps to an empty string; anything not in the table maps to
/// `"error: unknown.\n"`.
pub fn quick_fix_message(code: ErrCode) -> &'static str {
    match code {
        ERR_OK => "",
        ERR_BUNDLEMANAGER_QUICK_FIX_INTERNAL_ERROR => "error: quick fix internal error.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR => "error: param error.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_PROFILE_PARSE_FAILED => "error: profile parse failed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_SAME => "error: not same bundle name.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_CODE_NOT_SAME => "error: not same version code.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_NAME_NOT_SAME => "error: not same version name.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_VERSION_CODE_NOT_SAME => {
            "error: not same patch version code.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_VERSION_NAME_NOT_SAME => {
            "error: not same patch version name.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_TYPE_NOT_SAME => "error: not same patch type.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_UNKNOWN_QUICK_FIX_TYPE => "error: unknown quick fix type.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_SO_INCOMPATIBLE => "error: patch so incompatible.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_MODULE_NAME_SAME => "error: same moduleName.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_EXIST => "error: bundle name is not existed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_MODULE_NAME_NOT_EXIST => "error: module name is not existed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_SIGNATURE_INFO_NOT_SAME => "error: signature is not existed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_ADD_HQF_FAILED => "error: quick fix add hqf failed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_SAVE_APP_QUICK_FIX_FAILED => {
            "error: quick fix save innerAppQuickFix failed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_VERSION_CODE_ERROR => {
            "error: quick fix version code require greater than original hqf.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE => {
            "error: no this quick fix info in database.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_INVALID_PATCH_STATUS => "error: wrong quick fix status.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_NOT_EXISTED_BUNDLE_INFO => {
            "error: cannot obtain the bundleInfo from data mgr.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_REMOVE_PATCH_PATH_FAILED => {
            "error: quick fix remove path failed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_EXTRACT_DIFF_FILES_FAILED => {
            "error: extract diff files failed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_APPLY_DIFF_PATCH_FAILED => "error: apply diff patch failed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_UNKNOWN => MSG_UNKNOWN,
        ERR_BUNDLEMANAGER_FEATURE_IS_NOT_SUPPORTED => "feature is not supported.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT => "error: quick fix operation time out.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED => "error: bundleMgr service is dead.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_HOT_RELOAD_NOT_SUPPORT_RELEASE_BUNDLE => {
            "error: hotreload not support release bundle.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_ALREADY_EXISTED => {
            "error: patch type already existed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_HOT_RELOAD_ALREADY_EXISTED => {
            "error: hotreload type already existed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_INFO_IN_BUNDLE_INFO => {
            "error: no patch info in bundleInfo.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_MOVE_PATCH_FILE_FAILED => {
            "error: quick fix move hqf file failed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_CREATE_PATCH_PATH_FAILED => {
            "error: quick fix create path failed.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_OLD_PATCH_OR_HOT_RELOAD_IN_DB => {
            "error: old patch or hot reload in db.\n"
        }
        ERR_BUNDLEMANAGER_QUICK_FIX_SEND_REQUEST_FAILED => "error: send request failed.\n",
        ERR_BUNDLEMANAGER_QUICK_FIX_RELEASE_HAP_HAS_RESOURCES_FILE_FAILED => {
            "error: the hqf of release hap cannot contains resources/rawfile.\n"
        }
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM => {
            "error: invalid param for setting debug mode.\n"
        }
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INTERNAL_ERROR => {
            "error: internal error for setting debug mode.\n"
        }
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_PARCEL_ERROR => {
            "error: parcel error for setting debug mode.\n"
        }
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_SEND_REQUEST_ERROR => "error: send request error.\n",
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_UID_CHECK_FAILED => "error: uid check failed.\n",
        _ => MSG_UNKNOWN,
    }
}

/// Quick fix message for `code`, followed by the rendered result when present.
pub fn result_message<T: std::fmt::Display>(code: ErrCode, result: Option<&T>) -> String {
    let mut msg = quick_fix_message(code).to_string();
    if let Some(result) = result {
        msg.push_str(&result.to_string());
        msg.push('\n');
    }
    msg
}

/// Message for an installer status code, as reported by a [`crate::StatusReceiver`].
///
/// Codes outside the installer family yield an empty message.
pub fn install_message(code: ErrCode) -> &'static str {
    match code {
        ERR_INSTALL_INTERNAL_ERROR => "error: install internal error.\n",
        ERR_INSTALL_PARAM_ERROR => "error: install param error.\n",
        ERR_UNINSTALL_INVALID_NAME => "error: uninstall invalid name.\n",
        ERR_UNINSTALL_PARAM_ERROR => "error: uninstall param error.\n",
        ERR_UNINSTALL_PERMISSION_DENIED => "error: uninstall permission denied.\n",
        ERR_UNINSTALL_BUNDLE_MGR_SERVICE_ERROR => "error: uninstall bundle mgr service error.\n",
        ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE => "error: uninstall missing installed bundle.\n",
        ERR_UNINSTALL_MISSING_INSTALLED_MODULE => "error: uninstall missing installed module.\n",
        ERR_UNINSTALL_SYSTEM_APP_ERROR => "error: uninstall system app error.\n",
        ERR_FAILED_SERVICE_DIED => "error: bundle manager service is died.\n",
        ERR_OPERATION_TIME_OUT => "error: install operation time out.\n",
        ERR_UNKNOWN => MSG_UNKNOWN,
        _ => "",
    }
}
