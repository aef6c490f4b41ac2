//! Command execution handlers
//!
//! Each handler validates its options, makes one proxy call and renders the
//! reply into a [`CommandOutput`]. Service-level failures become the command's
//! failure text; transport failures are returned as errors.

mod abilities;
mod ambient;
mod app_control;
mod bundles;
mod events;
mod installer;
mod quick_fix;
mod stats;

pub use ambient::{generate_completion, handle_config, handle_health};

use anyhow::Result;
use bundle_core::codes::{ErrCode, ERR_INVALID_VALUE};
use clap::CommandFactory;
use tracing::debug;

use crate::cli::messages::err_code_line;
use crate::client::BundleMgrClient;
use crate::format::CommandOutput;

use super::commands::{Cli, ToolCommands};

/// Run one bundle manager command against `client`.
pub async fn dispatch(client: &BundleMgrClient, command: ToolCommands) -> Result<CommandOutput> {
    debug!("Running {}: {:?}", command.name(), command);

    match command {
        ToolCommands::Check(args) => abilities::check(client, args).await,
        ToolCommands::Setrm(args) => abilities::set_removable(client, args).await,
        ToolCommands::Getrm(args) => abilities::get_removable(client, args).await,
        ToolCommands::GetStr(args) => abilities::get_string(client, args).await,
        ToolCommands::GetIcon(args) => abilities::get_icon(client, args).await,
        ToolCommands::GetProxyDataInfos(args) => {
            abilities::get_proxy_data_infos(client, args).await
        }
        ToolCommands::GetAllProxyDataInfos(args) => {
            abilities::get_all_proxy_data_infos(client, args).await
        }
        ToolCommands::SetExtNameOrMimeToApp(args) => {
            abilities::set_ext_name_or_mime(client, args).await
        }
        ToolCommands::DelExtNameOrMimeToApp(args) => {
            abilities::del_ext_name_or_mime(client, args).await
        }
        ToolCommands::GetJsonProfile(args) => abilities::get_json_profile(client, args).await,
        ToolCommands::ImplicitQuerySkillUriInfo(args) => {
            abilities::implicit_query_skill_uri_info(client, args).await
        }
        ToolCommands::QueryAbilityInfoByContinueType(args) => {
            abilities::query_ability_info_by_continue_type(client, args).await
        }

        ToolCommands::InstallSandbox(args) => installer::install_sandbox(client, args).await,
        ToolCommands::UninstallSandbox(args) => installer::uninstall_sandbox(client, args).await,
        ToolCommands::DumpSandbox(args) => installer::dump_sandbox(client, args).await,
        ToolCommands::UninstallPreInstallBundle(args) => {
            installer::uninstall_preinstall_bundle(client, args).await
        }

        ToolCommands::AddAppInstallRule(args) => app_control::add_install_rule(client, args).await,
        ToolCommands::GetAppInstallRule(args) => app_control::get_install_rule(client, args).await,
        ToolCommands::DeleteAppInstallRule(args) => {
            app_control::delete_install_rule(client, args).await
        }
        ToolCommands::CleanAppInstallRule(args) => {
            app_control::clean_install_rule(client, args).await
        }
        ToolCommands::AddAppRunningRule(args) => app_control::add_running_rule(client, args).await,
        ToolCommands::DeleteAppRunningRule(args) => {
            app_control::delete_running_rule(client, args).await
        }
        ToolCommands::CleanAppRunningRule(args) => {
            app_control::clean_running_rule(client, args).await
        }
        ToolCommands::GetAppRunningControlRule(args) => {
            app_control::get_running_rule(client, args).await
        }
        ToolCommands::GetAppRunningControlRuleResult(args) => {
            app_control::get_running_rule_result(client, args).await
        }

        ToolCommands::DeployQuickFix(args) => quick_fix::deploy(client, args).await,
        ToolCommands::SwitchQuickFix(args) => quick_fix::switch(client, args).await,
        ToolCommands::DeleteQuickFix(args) => quick_fix::delete(client, args).await,
        ToolCommands::SetDebugMode(args) => quick_fix::set_debug_mode(client, args).await,

        ToolCommands::CleanBundleCacheFilesAutomatic(args) => {
            stats::clean_cache_automatic(client, args).await
        }
        ToolCommands::GetAllBundleCacheStat(args) => {
            stats::get_all_bundle_cache_stat(client, args).await
        }
        ToolCommands::CleanAllBundleCache(args) => {
            stats::clean_all_bundle_cache(client, args).await
        }
        ToolCommands::GetBundleStats(args) => stats::get_bundle_stats(client, args).await,
        ToolCommands::BatchGetBundleStats(args) => {
            stats::batch_get_bundle_stats(client, args).await
        }
        ToolCommands::GetAppProvisionInfo(args) => {
            stats::get_app_provision_info(client, args).await
        }
        ToolCommands::GetDistributedBundleName(args) => {
            stats::get_distributed_bundle_name(client, args).await
        }

        ToolCommands::EventCallback(args) => events::bundle_event_callback(client, args).await,
        ToolCommands::ResetAotCompileStatus(args) => {
            events::reset_aot_compile_status(client, args).await
        }
        ToolCommands::SendCommonEvent => events::send_common_event(client).await,

        ToolCommands::GetContinueBundleName(args) => {
            bundles::get_continue_bundle_name(client, args).await
        }
        ToolCommands::QueryDataGroupInfos(args) => {
            bundles::query_data_group_infos(client, args).await
        }
        ToolCommands::GetGroupDir(args) => bundles::get_group_dir(client, args).await,
        ToolCommands::GetUninstalledBundleInfo(args) => {
            bundles::get_uninstalled_bundle_info(client, args).await
        }
        ToolCommands::GetOdid(args) => bundles::get_odid(client, args).await,
        ToolCommands::GetUidByBundleName(args) => {
            bundles::get_uid_by_bundle_name(client, args).await
        }
        ToolCommands::UpdateAppEncryptedStatus(args) => {
            bundles::update_app_encrypted_status(client, args).await
        }
        ToolCommands::GetDirByBundleNameAndAppIndex(args) => {
            bundles::get_dir_by_bundle_name_and_app_index(client, args).await
        }
        ToolCommands::GetAllBundleDirs(args) => bundles::get_all_bundle_dirs(client, args).await,
        ToolCommands::IsBundleInstalled(args) => bundles::is_bundle_installed(client, args).await,
        ToolCommands::GetCompatibleDeviceType(args) => {
            bundles::get_compatible_device_type(client, args).await
        }
        ToolCommands::GetSimpleAppInfoForUid(args) => {
            bundles::get_simple_app_info_for_uid(client, args).await
        }
        ToolCommands::GetBundleNameByAppId(args) => {
            bundles::get_bundle_name_by_app_id(client, args).await
        }
        ToolCommands::GetAssetAccessGroups(args) => {
            bundles::get_asset_access_groups(client, args).await
        }
        ToolCommands::GetAppIdentifierAndAppIndex(args) => {
            bundles::get_app_identifier_and_app_index(client, args).await
        }
        ToolCommands::SetAppDistributionTypes(args) => {
            bundles::set_app_distribution_types(client, args).await
        }
        ToolCommands::GetBundleNamesForUidExt(args) => {
            bundles::get_bundle_names_for_uid_ext(client, args).await
        }
    }
}

/// `message` followed by the help of `command`, as `ERR_INVALID_VALUE`.
pub(crate) fn usage_error(command: &str, message: &str) -> CommandOutput {
    let mut output = message.to_string();
    let mut cli = Cli::command();
    cli.build();
    if let Some(subcommand) = cli.find_subcommand_mut(command) {
        output.push_str(&subcommand.render_help().to_string());
    }
    CommandOutput::new(ERR_INVALID_VALUE, output)
}

/// `ng` followed by `"errCode is N\n"`, carrying `code`.
pub(crate) fn failure(ng: &str, code: ErrCode) -> CommandOutput {
    CommandOutput::new(code, format!("{}{}", ng, err_code_line(code)))
}

/// A required string option, when given and not empty.
pub(crate) fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `header{\n` + one indented line per item + `}\n`
pub(crate) fn braced_list<T: std::fmt::Display>(header: &str, items: &[T]) -> String {
    let mut msg = format!("{}\n{{\n", header);
    for item in items {
        msg.push_str(&format!("     {}\n", item));
    }
    msg.push_str("}\n");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_appends_help() {
        let output = usage_error("getrm", "error: missing\n");
        assert_eq!(output.code, ERR_INVALID_VALUE);
        assert!(output.output.starts_with("error: missing\n"));
        assert!(output.output.contains("--bundle-name"));
    }

    #[test]
    fn test_failure_line() {
        let output = failure("get bundle stats failed\n", 8521);
        assert_eq!(output.code, 8521);
        assert_eq!(output.output, "get bundle stats failed\nerrCode is 8521\n");
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Some("a".to_string())), Some("a"));
        assert_eq!(required(&Some(String::new())), None);
        assert_eq!(required(&None), None);
    }

    #[test]
    fn test_braced_list() {
        assert_eq!(
            braced_list("bundle name list:", &["a", "b"]),
            "bundle name list:\n{\n     a\n     b\n}\n"
        );
        assert_eq!(braced_list("x:", &Vec::<String>::new()), "x:\n{\n}\n");
    }
}
