//! Abilities, modules, resources and profiles

use anyhow::Result;
use bundle_core::api::ExtNameOrMimeRequest;
use bundle_core::codes::ERR_INVALID_VALUE;
use bundle_core::{AbilityInfo, ElementName, Want, DEFAULT_USER_ID};
use tracing::debug;

use crate::cli::commands::{
    CheckArgs, ContinueTypeArgs, ExtNameOrMimeArgs, GetIconArgs, GetStringArgs,
    ImplicitQueryArgs, JsonProfileArgs, ModuleArgs, ProxyDataArgs, SetRemovableArgs, UserArgs,
};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::{to_json_dump, CommandOutput};

use super::{required, usage_error};

/// Flag asking abilities to carry the skill uris that matched
const GET_ABILITY_INFO_WITH_SKILL_URI: i32 = 0x0000_0080;

/// Flag passed with install checks
const CHECK_ABILITY_FLAG: i32 = 1;

pub(super) async fn check(client: &BundleMgrClient, args: CheckArgs) -> Result<CommandOutput> {
    let want = Want {
        element: ElementName {
            device_id: args.device_id.unwrap_or_default(),
            bundle_name: args.bundle_name.unwrap_or_default(),
            module_name: args.module_name.unwrap_or_default(),
            ability_name: args.ability_name.unwrap_or_default(),
        },
        ..Default::default()
    };
    debug!("Checking {} for user {}", want, args.user_id);

    let output = match client
        .check_ability_enable_install(&want, CHECK_ABILITY_FLAG, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(enabled) => CommandOutput::ok(format!("checkAbilityEnableInstall: {}\n", enabled)),
        Err(code) => CommandOutput::new(code, "checkAbilityEnableInstall: false\n"),
    };
    Ok(output)
}

pub(super) async fn set_removable(
    client: &BundleMgrClient,
    args: SetRemovableArgs,
) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(module_name)) =
        (required(&args.bundle_name), required(&args.module_name))
    else {
        return Ok(usage_error("setrm", NO_REMOVABLE_OPTION));
    };

    let removable = args.is_removable != 0;
    let output = match client
        .set_module_removable(bundle_name, module_name, removable)
        .await
        .into_service_result()?
    {
        Ok(true) => CommandOutput::ok(SET_REMOVABLE_OK),
        Ok(false) => CommandOutput::new(ERR_INVALID_VALUE, SET_REMOVABLE_NG),
        Err(code) => CommandOutput::new(code, SET_REMOVABLE_NG),
    };
    Ok(output)
}

pub(super) async fn get_removable(
    client: &BundleMgrClient,
    args: ModuleArgs,
) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(module_name)) =
        (required(&args.bundle_name), required(&args.module_name))
    else {
        return Ok(usage_error("getrm", NO_REMOVABLE_OPTION));
    };

    let output = match client
        .is_module_removable(bundle_name, module_name)
        .await
        .into_service_result()?
    {
        Ok(removable) => CommandOutput::ok(format!("isRemovable: {}\n", u8::from(removable)))
            .with_data(&removable),
        Err(code) => CommandOutput::new(code, GET_REMOVABLE_NG),
    };
    Ok(output)
}

pub(super) async fn get_string(
    client: &BundleMgrClient,
    args: GetStringArgs,
) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(module_name)) =
        (required(&args.bundle_name), required(&args.module_name))
    else {
        return Ok(usage_error("getStr", NO_GET_STRING_OPTION));
    };
    if args.user_id < 0 {
        return Ok(usage_error("getStr", NO_GET_STRING_OPTION));
    }

    let output = match client
        .get_string_by_id(bundle_name, module_name, args.id, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(label) if !label.is_empty() => CommandOutput::ok(label),
        Ok(_) => CommandOutput::new(ERR_INVALID_VALUE, GET_STRING_NG),
        Err(code) => CommandOutput::new(code, GET_STRING_NG),
    };
    Ok(output)
}

pub(super) async fn get_icon(client: &BundleMgrClient, args: GetIconArgs) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(module_name)) =
        (required(&args.bundle_name), required(&args.module_name))
    else {
        return Ok(usage_error("getIcon", NO_GET_ICON_OPTION));
    };
    if args.user_id < 0 {
        return Ok(usage_error("getIcon", NO_GET_ICON_OPTION));
    }

    let output = match client
        .get_icon_by_id(bundle_name, module_name, args.id, args.density, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(icon) if !icon.is_empty() => CommandOutput::ok(icon),
        Ok(_) => CommandOutput::new(ERR_INVALID_VALUE, GET_ICON_NG),
        Err(code) => CommandOutput::new(code, GET_ICON_NG),
    };
    Ok(output)
}

pub(super) async fn get_proxy_data_infos(
    client: &BundleMgrClient,
    args: ProxyDataArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getProxyDataInfos", NO_BUNDLE_NAME_OPTION));
    };

    let result = client
        .get_proxy_data_infos(bundle_name, &args.module_name, args.user_id)
        .await
        .into_service_result()?;
    proxy_data_output(result)
}

pub(super) async fn get_all_proxy_data_infos(
    client: &BundleMgrClient,
    args: UserArgs,
) -> Result<CommandOutput> {
    let result = client
        .get_all_proxy_data_infos(args.user_id)
        .await
        .into_service_result()?;
    proxy_data_output(result)
}

fn proxy_data_output(
    result: std::result::Result<Vec<bundle_core::ProxyData>, i32>,
) -> Result<CommandOutput> {
    Ok(match result {
        Ok(proxy_datas) => {
            CommandOutput::ok(format!("{}\n", to_json_dump(&proxy_datas)?)).with_data(&proxy_datas)
        }
        Err(code) => CommandOutput::new(
            code,
            format!("{} {}", GET_PROXY_DATA_NG, err_code_line(code)),
        ),
    })
}

fn ext_name_or_mime_request(args: &ExtNameOrMimeArgs) -> Option<ExtNameOrMimeRequest> {
    Some(ExtNameOrMimeRequest {
        bundle_name: required(&args.bundle_name)?.to_string(),
        module_name: args.module_name.clone().unwrap_or_default(),
        ability_name: args.ability_name.clone().unwrap_or_default(),
        ext_name: args.ext_name.clone(),
        mime_type: args.mime_type.clone(),
    })
}

pub(super) async fn set_ext_name_or_mime(
    client: &BundleMgrClient,
    args: ExtNameOrMimeArgs,
) -> Result<CommandOutput> {
    let Some(request) = ext_name_or_mime_request(&args) else {
        return Ok(usage_error("setExtNameOrMimeToApp", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .set_ext_name_or_mime_to_app(&request)
        .await
        .into_service_result()?
    {
        Ok(()) => CommandOutput::ok(SET_EXT_NAME_OR_MIME_OK),
        Err(code) => CommandOutput::new(code, format!("{}{}\n", SET_EXT_NAME_OR_MIME_NG, code)),
    };
    Ok(output)
}

pub(super) async fn del_ext_name_or_mime(
    client: &BundleMgrClient,
    args: ExtNameOrMimeArgs,
) -> Result<CommandOutput> {
    let Some(request) = ext_name_or_mime_request(&args) else {
        return Ok(usage_error("delExtNameOrMimeToApp", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .del_ext_name_or_mime_to_app(&request)
        .await
        .into_service_result()?
    {
        Ok(()) => CommandOutput::ok(DEL_EXT_NAME_OR_MIME_OK),
        Err(code) => CommandOutput::new(code, format!("{}{}\n", DEL_EXT_NAME_OR_MIME_NG, code)),
    };
    Ok(output)
}

pub(super) async fn get_json_profile(
    client: &BundleMgrClient,
    args: JsonProfileArgs,
) -> Result<CommandOutput> {
    let (Some(profile_type), Some(bundle_name)) = (args.profile_type, required(&args.bundle_name))
    else {
        return Ok(usage_error("getJsonProfile", NO_GET_JSON_PROFILE_OPTION));
    };
    if args.user_id < 0 {
        return Ok(usage_error("getJsonProfile", NO_GET_JSON_PROFILE_OPTION));
    }

    let output = match client
        .get_json_profile(profile_type, bundle_name, &args.module_name, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(profile) => CommandOutput::ok(format!("{}\n", profile)),
        Err(code) => CommandOutput::new(code, GET_JSON_PROFILE_NG),
    };
    Ok(output)
}

/// Render the matched skill uris of each ability.
fn skill_uri_text(abilities: &[AbilityInfo]) -> String {
    let mut msg = String::new();
    for ability in abilities {
        msg.push_str("Ability start\n");
        for uri in &ability.skill_uri {
            msg.push_str("{\n");
            msg.push_str(&format!("    scheme: {}\n", uri.scheme));
            msg.push_str(&format!("    host: {}\n", uri.host));
            msg.push_str(&format!("    port: {}\n", uri.port));
            msg.push_str(&format!("    path: {}\n", uri.path));
            msg.push_str(&format!("    pathStartWith: {}\n", uri.path_start_with));
            msg.push_str(&format!("    pathRegex: {}\n", uri.path_regex));
            msg.push_str(&format!("    type: {}\n", uri.mime_type));
            msg.push_str(&format!("    utd: {}\n", uri.utd));
            msg.push_str(&format!("    maxFileSupported: {}\n", uri.max_file_supported));
            msg.push_str(&format!("    linkFeature: {}\n", uri.link_feature));
            msg.push_str(&format!("    isMatch: {}\n", u8::from(uri.is_match)));
            msg.push_str("}\n");
        }
        msg.push_str("Ability end\n");
    }
    msg
}

pub(super) async fn implicit_query_skill_uri_info(
    client: &BundleMgrClient,
    args: ImplicitQueryArgs,
) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(action)) = (required(&args.bundle_name), required(&args.action))
    else {
        return Ok(usage_error(
            "implicitQuerySkillUriInfo",
            NO_IMPLICIT_QUERY_SKILL_URI_INFO_OPTION,
        ));
    };

    let want = Want {
        action: action.to_string(),
        entities: required(&args.entity)
            .map(|entity| vec![entity.to_string()])
            .unwrap_or_default(),
        element: ElementName {
            bundle_name: bundle_name.to_string(),
            ..Default::default()
        },
        uri: args.uri.clone(),
        mime_type: args.mime_type.clone(),
    };

    let output = match client
        .implicit_query_info(&want, GET_ABILITY_INFO_WITH_SKILL_URI, DEFAULT_USER_ID)
        .await
        .into_service_result()?
    {
        Ok(abilities) => CommandOutput::ok(format!("{}\n", skill_uri_text(&abilities)))
            .with_data(&abilities),
        Err(code) => CommandOutput::new(code, format!("{}\n", IMPLICIT_QUERY_SKILL_URI_INFO_NG)),
    };
    Ok(output)
}

pub(super) async fn query_ability_info_by_continue_type(
    client: &BundleMgrClient,
    args: ContinueTypeArgs,
) -> Result<CommandOutput> {
    let (Some(bundle_name), Some(continue_type)) =
        (required(&args.bundle_name), required(&args.continue_type))
    else {
        return Ok(usage_error(
            "queryAbilityInfoByContinueType",
            NO_QUERY_ABILITY_INFO_BY_CONTINUE_TYPE_OPTION,
        ));
    };
    if args.user_id < 0 {
        return Ok(usage_error(
            "queryAbilityInfoByContinueType",
            NO_QUERY_ABILITY_INFO_BY_CONTINUE_TYPE_OPTION,
        ));
    }

    let output = match client
        .query_ability_info_by_continue_type(bundle_name, continue_type, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(ability) => {
            CommandOutput::ok(format!("{}\n", to_json_dump(&ability)?)).with_data(&ability)
        }
        Err(code) => CommandOutput::new(
            code,
            format!("{}\n", QUERY_ABILITY_INFO_BY_CONTINUE_TYPE_NG),
        ),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_core::SkillUri;

    #[test]
    fn test_skill_uri_text() {
        let ability = AbilityInfo {
            name: "EntryAbility".to_string(),
            skill_uri: vec![SkillUri {
                scheme: "https".to_string(),
                host: "www.example.com".to_string(),
                max_file_supported: 3,
                is_match: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = skill_uri_text(&[ability]);
        assert!(
            text.starts_with("Ability start\n{\n    scheme: https\n    host: www.example.com\n")
        );
        assert!(text.contains("    maxFileSupported: 3\n"));
        assert!(text.ends_with("    isMatch: 1\n}\nAbility end\n"));
    }

    #[test]
    fn test_no_abilities_renders_nothing() {
        assert_eq!(skill_uri_text(&[]), "");
    }
}
