//! Fixed texts printed by the subcommands

// Missing or malformed options

pub const NO_REMOVABLE_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a module name with '-m' or '--module-name' \n",
);

pub const NO_GET_STRING_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a module name with '-m' or '--module-name' \n",
    "and a userid with '-u' or '--user-id' \n",
    "and a labelid with '-i' or '--id' \n",
);

pub const NO_GET_ICON_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a module name with '-m' or '--module-name' \n",
    "and a userid with '-u' or '--user-id' \n",
    "and a density with '-d' or '--density' \n",
    "and a iconid with '-i' or '--id' \n",
);

pub const NO_ADD_INSTALL_RULE_OPTION: &str = concat!(
    "error: you must specify a app id with '-a' or '--app-id' \n",
    "and a control type with '-t' or '--control-rule-type' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_GET_INSTALL_RULE_OPTION: &str = concat!(
    "error: you must specify a control type with '-t' or '--control-rule-type' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_DELETE_INSTALL_RULE_OPTION: &str = concat!(
    "error: you must specify a control type with '-a' or '--app-id' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_CLEAN_INSTALL_RULE_OPTION: &str = NO_GET_INSTALL_RULE_OPTION;

pub const NO_APP_RUNNING_RULE_OPTION: &str = concat!(
    "error: you must specify a app running type with '-c' or '--control-rule' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_CLEAN_APP_RUNNING_RULE_OPTION: &str =
    "error: you must specify a app running type with a userid '-u' or '--user-id \n";

pub const NO_GET_ALL_APP_RUNNING_RULE_OPTION: &str = concat!(
    "error: you must specify a app running type with '-a' or '--app-id' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_GET_APP_RUNNING_RULE_OPTION: &str = concat!(
    "error: you must specify a app running type with '-n' or '--bundle-name' \n",
    "and a userid with '-u' or '--user-id' \n",
);

pub const NO_AUTO_CLEAN_CACHE_OPTION: &str =
    "error: you must specify a cache size with '-s' or '--cache-size' \n";

pub const INVALID_CACHE_SIZE: &str = "error: parameter error, cache size must be greater than 0\n";

pub const NO_BUNDLE_NAME_OPTION: &str =
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n";

pub const NO_GET_DISTRIBUTED_BUNDLE_NAME_OPTION: &str = concat!(
    "error: you must specify a control type with '-n' or '--network-id' \n",
    "and a accessTokenId with '-a' or '--access-token-id' \n",
);

pub const NO_GET_UID_BY_BUNDLE_NAME_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a userId with '-u' or '--user-id' \n",
    "and a appIndex with '-a' or '--app-index' \n",
);

pub const NO_GET_JSON_PROFILE_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a module name with '-m' or '--module-name' \n",
    "and a userId with '-u' or '--user-id' \n",
    "and a json profile type with '-p' or '--profile-type' \n",
);

pub const NO_IMPLICIT_QUERY_SKILL_URI_INFO_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a action with '-a' or '--action' \n",
    "and a entity with '-e' or '--entity' \n",
);

pub const NO_QUERY_ABILITY_INFO_BY_CONTINUE_TYPE_OPTION: &str = concat!(
    "error: you must specify a bundle name with '-n' or '--bundle-name' \n",
    "and a continueType with '-c' or '--continue-type' \n",
    "and a userId with '-u' or '--user-id' \n",
);

pub const NO_QUICK_FIX_PATH_OPTION: &str = "need a quick fix patch path\n";

pub const REQUIRE_CORRECT_VALUE: &str = concat!(
    "error: option requires a correct value or note that\n",
    "the difference in expressions between short option and long option. \n",
);

// Command results

pub const IS_BUNDLE_INSTALLED_OK: &str = "IsBundleInstalled is ok \n";
pub const IS_BUNDLE_INSTALLED_NG: &str = "error: failed to IsBundleInstalled \n";

pub const GET_BUNDLE_NAME_BY_APP_ID_OK: &str = "getBundleNameByAppId is ok \n";
pub const GET_BUNDLE_NAME_BY_APP_ID_NG: &str = "error: failed to getBundleNameByAppId \n";

pub const GET_BUNDLE_NAMES_FOR_UID_EXT_OK: &str = "GetBundleNamesForUidExt success";
pub const GET_BUNDLE_NAMES_FOR_UID_EXT_NG: &str = "error: failed to getBundleNamesForUidExt \n";

pub const GET_SIMPLE_APP_INFO_FOR_UID_OK: &str = "getSimpleAppInfoForUid is ok \n";
pub const GET_SIMPLE_APP_INFO_FOR_UID_NG: &str = "error: failed to getSimpleAppInfoForUid \n";

pub const SET_REMOVABLE_OK: &str = "set removable is ok \n";
pub const SET_REMOVABLE_NG: &str = "error: failed to set removable \n";
pub const GET_REMOVABLE_NG: &str = "error: failed to get removable \n";

pub const INSTALL_SANDBOX_OK: &str = "install sandbox app successfully \n";
pub const INSTALL_SANDBOX_NG: &str = "install sandbox app failed \n";
pub const UNINSTALL_SANDBOX_OK: &str = "uninstall sandbox app successfully\n";
pub const UNINSTALL_SANDBOX_NG: &str = "uninstall sandbox app failed\n";
pub const DUMP_SANDBOX_NG: &str = "dump sandbox app info failed\n";

pub const UPDATE_APP_ENCRYPTED_STATUS_OK: &str = "update app encrypted status successfully \n";
pub const UPDATE_APP_ENCRYPTED_STATUS_NG: &str = "update app encrypted status failed \n";

pub const GET_STRING_NG: &str = "error: failed to get label \n";
pub const GET_ICON_NG: &str = "error: failed to get icon \n";

pub const ADD_RULE_NG: &str = "error: failed to add rule \n";
pub const GET_RULE_NG: &str = "error: failed to get rule \n";
pub const DELETE_RULE_NG: &str = "error: failed to delete rule \n";

pub const CLEAN_CACHE_AUTOMATIC_OK: &str = "clean fixed size cache successfully\n";
pub const CLEAN_CACHE_AUTOMATIC_NG: &str = "clean fixed size cache failed, errCode is ";

pub const GET_CONTINUE_BUNDLE_NAME_NG: &str = "Get continue bundle name error!";

pub const DEPLOY_QUICK_FIX_OK: &str = "deploy quick fix successfully\n";
pub const DEPLOY_QUICK_FIX_NG: &str = "deploy quick fix failed\n";
pub const SWITCH_QUICK_FIX_OK: &str = "switch quick fix successfully\n";
pub const SWITCH_QUICK_FIX_NG: &str = "switch quick fix failed\n";
pub const DELETE_QUICK_FIX_OK: &str = "delete quick fix successfully\n";
pub const DELETE_QUICK_FIX_NG: &str = "delete quick fix failed\n";

pub const SET_DEBUG_MODE_OK: &str = "set debug mode successfully\n";
pub const SET_DEBUG_MODE_NG: &str = "set debug mode failed\n";

pub const GET_BUNDLE_STATS_OK: &str = "get bundle stats successfully\n";
pub const GET_BUNDLE_STATS_NG: &str = "get bundle stats failed\n";
pub const BATCH_GET_BUNDLE_STATS_OK: &str = "batch get bundle stats successfully\n";
pub const BATCH_GET_BUNDLE_STATS_NG: &str = "batch get bundle stats failed\n";

/// Labels of the five sizes returned for a bundle, in order
pub const BUNDLE_STATS_LABELS: [&str; 5] = [
    "app data size: ",
    "user data size: ",
    "distributed data size: ",
    "database size: ",
    "cache size: ",
];

pub const GET_APP_PROVISION_INFO_OK: &str = "get appProvisionInfo successfully\n";
pub const GET_APP_PROVISION_INFO_NG: &str = "get appProvisionInfo failed\n";

pub const QUERY_DATA_GROUP_INFOS_OK: &str = "queryDataGroupInfos successfully\n";
pub const QUERY_DATA_GROUP_INFOS_NG: &str = "queryDataGroupInfos failed\n";
pub const GET_GROUP_DIR_OK: &str = "getGroupDir successfully\n";
pub const GET_GROUP_DIR_NG: &str = "getGroupDir failed\n";

pub const GET_JSON_PROFILE_NG: &str = "getJsonProfile failed\n";
pub const GET_UNINSTALLED_BUNDLE_INFO_NG: &str = "getUninstalledBundleInfo failed\n";

pub const GET_COMPATIBLE_DEVICE_TYPE_OK: &str = "getCompatibleDeviceType successfully\n";
pub const GET_COMPATIBLE_DEVICE_TYPE_NG: &str = "getCompatibleDeviceType failed\n";

pub const GET_ODID_OK: &str = "getOdid successfully\n";
pub const GET_ODID_NG: &str = "getOdid failed\n";

pub const GET_DIR_OK: &str = "getDirByBundleNameAndAppIndex successfully\n";
pub const GET_DIR_NG: &str = "getDirByBundleNameAndAppIndex failed\n";
pub const GET_ALL_BUNDLE_DIRS_OK: &str = "getAllBundleDirs successfully\n";
pub const GET_ALL_BUNDLE_DIRS_NG: &str = "getAllBundleDirs failed\n";

pub const GET_ALL_BUNDLE_CACHE_STAT_OK: &str = "getAllBundleCacheStat successfully\n";
pub const GET_ALL_BUNDLE_CACHE_STAT_NG: &str = "getAllBundleCacheStat failed\n";
pub const CLEAN_ALL_BUNDLE_CACHE_OK: &str = "cleanAllBundleCache successfully\n";
pub const CLEAN_ALL_BUNDLE_CACHE_NG: &str = "cleanAllBundleCache failed\n";

pub const GET_UID_BY_BUNDLE_NAME_NG: &str = "getUidByBundleName failed\n";
pub const IMPLICIT_QUERY_SKILL_URI_INFO_NG: &str = "implicitQuerySkillUriInfo failed\n";
pub const QUERY_ABILITY_INFO_BY_CONTINUE_TYPE_NG: &str = "queryAbilityInfoByContinueType failed\n";

pub const GET_DISTRIBUTED_BUNDLE_NAME_OK: &str = "get distributedBundleName successfully\n";
pub const GET_DISTRIBUTED_BUNDLE_NAME_NG: &str = "get distributedBundleName failed\n";

pub const GET_PROXY_DATA_NG: &str = "get proxyData failed";

pub const UNINSTALL_PREINSTALL_BUNDLE_OK: &str = "uninstall preinstall app successfully\n";
pub const UNINSTALL_PREINSTALL_BUNDLE_NG: &str = "uninstall preinstall app failed\n";

pub const GET_ASSET_ACCESS_GROUPS_OK: &str = "getAssetAccessGroups successfully\n";
pub const GET_ASSET_ACCESS_GROUPS_NG: &str = "getAssetAccessGroups failed\n";

pub const GET_APP_IDENTIFIER_AND_APP_INDEX_OK: &str = "getAppIdentifierAndAppIndex successfully\n";
pub const GET_APP_IDENTIFIER_AND_APP_INDEX_NG: &str = "getAppIdentifierAndAppIndex failed\n";

pub const SET_APP_DISTRIBUTION_TYPES_OK: &str = "setAppDistributionTypes successfully\n";
pub const SET_APP_DISTRIBUTION_TYPES_NG: &str = "setAppDistributionTypes failed\n";

pub const SET_EXT_NAME_OR_MIME_OK: &str = "SetExtNameOrMIMEToApp succeeded,";
pub const SET_EXT_NAME_OR_MIME_NG: &str = "SetExtNameOrMIMEToApp failed, errCode is ";
pub const DEL_EXT_NAME_OR_MIME_OK: &str = "DelExtNameOrMIMEToApp succeeded";
pub const DEL_EXT_NAME_OR_MIME_NG: &str = "DelExtNameOrMIMEToApp failed, errCode is ";

/// `"errCode is N\n"`
pub fn err_code_line(code: i32) -> String {
    format!("errCode is {}\n", code)
}
