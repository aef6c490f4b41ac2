//! Bundle identity, directories, data groups and distribution settings

use anyhow::Result;
use bundle_core::codes::{
    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST, ERR_BUNDLE_MANAGER_GET_DIR_INVALID_APP_INDEX,
    ERR_INVALID_VALUE,
};
use bundle_core::{CODE_PROTECT_UID, DEFAULT_USER_ID, FOUNDATION_UID};
use tracing::debug;

use crate::cli::commands::{
    AccessTokenArgs, AllBundleDirsArgs, AppIdArgs, AppIndexArgs, BundleInstalledArgs,
    BundleNameArgs, BundleUserArgs, ContinueBundleNameArgs, DistributionTypesArgs,
    EncryptedStatusArgs, GroupDirArgs, SimpleAppInfoArgs, UidArgs, UidByBundleNameArgs,
    UidExtArgs,
};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::{to_json_dump, CommandOutput};
use crate::parse;

use super::{braced_list, failure, required, usage_error};

/// Uid the tool acts as when no user is given, owned by the default user
const MOCK_TOOL_UID: i32 = 20_010_099;

pub(super) async fn get_continue_bundle_name(
    client: &BundleMgrClient,
    args: ContinueBundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getContinueBundleName", NO_BUNDLE_NAME_OPTION));
    };

    let (client, user_id) = match args.user_id {
        Some(user_id) => (client.clone(), user_id),
        None => (client.with_caller(MOCK_TOOL_UID), DEFAULT_USER_ID),
    };

    let output = match client
        .get_continue_bundle_names(bundle_name, user_id)
        .await
        .into_service_result()?
    {
        Ok(names) => {
            CommandOutput::ok(braced_list("continueBundleNameList:", &names)).with_data(&names)
        }
        Err(code) => {
            debug!("GetContinueBundleNames failed with {}", code);
            CommandOutput::new(ERR_INVALID_VALUE, GET_CONTINUE_BUNDLE_NAME_NG)
        }
    };
    Ok(output)
}

pub(super) async fn query_data_group_infos(
    client: &BundleMgrClient,
    args: BundleUserArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("queryDataGroupInfos", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .query_data_group_infos(bundle_name, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(infos) => CommandOutput::ok(format!(
            "{}{}",
            QUERY_DATA_GROUP_INFOS_OK,
            braced_list("dataGroupInfos:", &infos)
        ))
        .with_data(&infos),
        Err(code) => CommandOutput::new(code, QUERY_DATA_GROUP_INFOS_NG),
    };
    Ok(output)
}

pub(super) async fn get_group_dir(
    client: &BundleMgrClient,
    args: GroupDirArgs,
) -> Result<CommandOutput> {
    let Some(data_group_id) = required(&args.data_group_id) else {
        return Ok(usage_error("getGroupDir", REQUIRE_CORRECT_VALUE));
    };

    let output = match client
        .get_group_dir(data_group_id)
        .await
        .into_service_result()?
    {
        Ok(dir) => CommandOutput::ok(format!("{}group dir:\n{}\n", GET_GROUP_DIR_OK, dir))
            .with_data(&dir),
        Err(code) => CommandOutput::new(code, GET_GROUP_DIR_NG),
    };
    Ok(output)
}

pub(super) async fn get_uninstalled_bundle_info(
    client: &BundleMgrClient,
    args: BundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getUninstalledBundleInfo", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .get_uninstalled_bundle_info(bundle_name)
        .await
        .into_service_result()?
    {
        Ok(info) => CommandOutput::ok(format!("{}\n", to_json_dump(&info)?)).with_data(&info),
        Err(code) => CommandOutput::new(code, GET_UNINSTALLED_BUNDLE_INFO_NG),
    };
    Ok(output)
}

pub(super) async fn get_odid(client: &BundleMgrClient, args: UidArgs) -> Result<CommandOutput> {
    let output = match client
        .with_caller(args.uid)
        .get_odid()
        .await
        .into_service_result()?
    {
        Ok(odid) => CommandOutput::ok(format!("{}{}\n", GET_ODID_OK, odid)).with_data(&odid),
        Err(ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST) => CommandOutput::new(
            ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
            format!("{}Please enter a valid uid\n", GET_ODID_NG),
        ),
        Err(code) => failure(GET_ODID_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_uid_by_bundle_name(
    client: &BundleMgrClient,
    args: UidByBundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error(
            "getUidByBundleName",
            NO_GET_UID_BY_BUNDLE_NAME_OPTION,
        ));
    };
    if args.user_id < 0 || args.app_index < 0 {
        return Ok(usage_error(
            "getUidByBundleName",
            NO_GET_UID_BY_BUNDLE_NAME_OPTION,
        ));
    }

    let output = match client
        .get_uid_by_bundle_name(bundle_name, args.user_id, args.app_index)
        .await
        .into_service_result()?
    {
        Ok(uid) if uid != -1 => CommandOutput::ok(format!("{}\n", uid)).with_data(&uid),
        Ok(_) => CommandOutput::new(ERR_INVALID_VALUE, GET_UID_BY_BUNDLE_NAME_NG),
        Err(code) => CommandOutput::new(code, GET_UID_BY_BUNDLE_NAME_NG),
    };
    Ok(output)
}

pub(super) async fn update_app_encrypted_status(
    client: &BundleMgrClient,
    args: EncryptedStatusArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("updateAppEncryptedStatus", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .with_caller(CODE_PROTECT_UID)
        .update_app_encrypted_status(bundle_name, args.existed != 0, args.app_index)
        .await
        .into_service_result()?
    {
        Ok(()) => CommandOutput::ok(UPDATE_APP_ENCRYPTED_STATUS_OK),
        Err(code) => failure(UPDATE_APP_ENCRYPTED_STATUS_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_dir_by_bundle_name_and_app_index(
    client: &BundleMgrClient,
    args: AppIndexArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error(
            "getDirByBundleNameAndAppIndex",
            NO_BUNDLE_NAME_OPTION,
        ));
    };

    let output = match client
        .get_dir_by_bundle_name_and_app_index(bundle_name, args.app_index)
        .await
        .into_service_result()?
    {
        Ok(dir) => CommandOutput::ok(format!("{}{}\n", GET_DIR_OK, dir)).with_data(&dir),
        Err(ERR_BUNDLE_MANAGER_GET_DIR_INVALID_APP_INDEX) => CommandOutput::new(
            ERR_BUNDLE_MANAGER_GET_DIR_INVALID_APP_INDEX,
            format!("{}Please enter a valid appIndex\n", GET_DIR_NG),
        ),
        Err(code) => failure(GET_DIR_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_all_bundle_dirs(
    client: &BundleMgrClient,
    args: AllBundleDirsArgs,
) -> Result<CommandOutput> {
    let output = match client
        .get_all_bundle_dirs(args.user_id)
        .await
        .into_service_result()?
    {
        Ok(dirs) => CommandOutput::ok(format!(
            "{}{}",
            GET_ALL_BUNDLE_DIRS_OK,
            braced_list("bundleDirs:", &dirs)
        ))
        .with_data(&dirs),
        Err(code) => failure(GET_ALL_BUNDLE_DIRS_NG, code),
    };
    Ok(output)
}

pub(super) async fn is_bundle_installed(
    client: &BundleMgrClient,
    args: BundleInstalledArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("isBundleInstalled", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .is_bundle_installed(bundle_name, args.user_id, args.app_index)
        .await
        .into_service_result()?
    {
        Ok(installed) => CommandOutput::ok(format!(
            "{}isBundleInstalled: {}\n",
            IS_BUNDLE_INSTALLED_OK, installed
        ))
        .with_data(&installed),
        Err(code) => failure(IS_BUNDLE_INSTALLED_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_compatible_device_type(
    client: &BundleMgrClient,
    args: BundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getCompatibleDeviceType", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .get_compatible_device_type(bundle_name)
        .await
        .into_service_result()?
    {
        Ok(device_type) => CommandOutput::ok(format!(
            "{}deviceType: {}\n",
            GET_COMPATIBLE_DEVICE_TYPE_OK, device_type
        ))
        .with_data(&device_type),
        Err(code) => failure(GET_COMPATIBLE_DEVICE_TYPE_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_simple_app_info_for_uid(
    client: &BundleMgrClient,
    args: SimpleAppInfoArgs,
) -> Result<CommandOutput> {
    let uids = required(&args.uids).and_then(parse::uid_list);
    let Some(uids) = uids.filter(|uids| !uids.is_empty()) else {
        return Ok(usage_error("getSimpleAppInfoForUid", REQUIRE_CORRECT_VALUE));
    };

    let output = match client
        .with_caller(FOUNDATION_UID)
        .get_simple_app_info_for_uid(&uids)
        .await
        .into_service_result()?
    {
        Ok(infos) => {
            let mut msg = GET_SIMPLE_APP_INFO_FOR_UID_OK.to_string();
            for info in &infos {
                msg.push_str(&format!("{}\n", info));
            }
            CommandOutput::ok(msg).with_data(&infos)
        }
        Err(code) => failure(GET_SIMPLE_APP_INFO_FOR_UID_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_bundle_name_by_app_id(
    client: &BundleMgrClient,
    args: AppIdArgs,
) -> Result<CommandOutput> {
    let Some(app_id) = required(&args.app_id) else {
        return Ok(usage_error("getBundleNameByAppId", REQUIRE_CORRECT_VALUE));
    };

    let output = match client
        .get_bundle_name_by_app_id(app_id)
        .await
        .into_service_result()?
    {
        Ok(name) => CommandOutput::ok(format!("{}{}\n", GET_BUNDLE_NAME_BY_APP_ID_OK, name))
            .with_data(&name),
        Err(code) => failure(GET_BUNDLE_NAME_BY_APP_ID_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_asset_access_groups(
    client: &BundleMgrClient,
    args: BundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getAssetAccessGroups", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .get_asset_access_groups(bundle_name)
        .await
        .into_service_result()?
    {
        Ok(groups) => {
            let mut msg = GET_ASSET_ACCESS_GROUPS_OK.to_string();
            for group in &groups {
                msg.push_str(group);
                msg.push('\n');
            }
            CommandOutput::ok(msg).with_data(&groups)
        }
        Err(code) => failure(GET_ASSET_ACCESS_GROUPS_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_app_identifier_and_app_index(
    client: &BundleMgrClient,
    args: AccessTokenArgs,
) -> Result<CommandOutput> {
    let Some(access_token_id) = args.access_token_id else {
        return Ok(usage_error(
            "getAppIdentifierAndAppIndex",
            REQUIRE_CORRECT_VALUE,
        ));
    };

    let output = match client
        .get_app_identifier_and_app_index(access_token_id)
        .await
        .into_service_result()?
    {
        Ok(identity) => CommandOutput::ok(format!(
            "{}appIdentifier:{}\nappIndex:{}\n",
            GET_APP_IDENTIFIER_AND_APP_INDEX_OK, identity.app_identifier, identity.app_index
        ))
        .with_data(&identity),
        Err(code) => failure(GET_APP_IDENTIFIER_AND_APP_INDEX_NG, code),
    };
    Ok(output)
}

pub(super) async fn set_app_distribution_types(
    client: &BundleMgrClient,
    args: DistributionTypesArgs,
) -> Result<CommandOutput> {
    let Some(raw) = required(&args.app_distribution_types) else {
        return Ok(usage_error("setAppDistributionTypes", REQUIRE_CORRECT_VALUE));
    };
    let Some(types) = parse::distribution_types(raw) else {
        return Ok(CommandOutput::new(
            ERR_INVALID_VALUE,
            SET_APP_DISTRIBUTION_TYPES_NG,
        ));
    };

    let output = match client
        .set_app_distribution_types(&types)
        .await
        .into_service_result()?
    {
        Ok(()) => CommandOutput::ok(SET_APP_DISTRIBUTION_TYPES_OK),
        Err(code) => failure(SET_APP_DISTRIBUTION_TYPES_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_bundle_names_for_uid_ext(
    client: &BundleMgrClient,
    args: UidExtArgs,
) -> Result<CommandOutput> {
    let Some(uid) = required(&args.uid).and_then(|uid| parse::strict_i32(uid).ok()) else {
        return Ok(usage_error("getBundleNamesForUidExt", REQUIRE_CORRECT_VALUE));
    };

    let output = match client
        .get_bundle_names_for_uid_ext(uid)
        .await
        .into_service_result()?
    {
        Ok(names) => CommandOutput::ok(format!(
            "{}{}",
            GET_BUNDLE_NAMES_FOR_UID_EXT_OK,
            braced_list("bundle name list:", &names)
        ))
        .with_data(&names),
        Err(code) => failure(GET_BUNDLE_NAMES_FOR_UID_EXT_NG, code),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tool_uid_belongs_to_default_user() {
        assert_eq!(bundle_core::user_id_of(MOCK_TOOL_UID), DEFAULT_USER_ID);
    }
}
