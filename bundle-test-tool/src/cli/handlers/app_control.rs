//! App install and running control rules
//!
//! Every rule command acts on behalf of the `-e` effective uid, which defaults
//! to the enterprise device manager.

use anyhow::Result;
use bundle_core::codes::ErrCode;
use bundle_core::DEFAULT_USER_ID;
use tracing::info;

use crate::cli::commands::{
    ControlUserArgs, InstallRuleArgs, InstallRuleTypeArgs, RunningRuleArgs, RunningRuleResultArgs,
};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::CommandOutput;
use crate::parse;

use super::{required, usage_error};

/// `"0\n"` on success, otherwise `ng` with the service code.
fn rule_change_output(result: std::result::Result<(), ErrCode>, ng: &str) -> CommandOutput {
    match result {
        Ok(()) => CommandOutput::ok("0\n"),
        Err(code) => CommandOutput::new(code, ng),
    }
}

/// `"appId : a; b; \n"`
fn app_id_line(app_ids: &[String]) -> String {
    let mut line = String::from("appId : ");
    for app_id in app_ids {
        line.push_str(app_id);
        line.push_str("; ");
    }
    line.push('\n');
    line
}

pub(super) async fn add_install_rule(
    client: &BundleMgrClient,
    args: InstallRuleArgs,
) -> Result<CommandOutput> {
    let app_ids = required(&args.app_id).map(parse::comma_list).unwrap_or_default();
    if app_ids.is_empty() || args.user_id < 0 {
        return Ok(usage_error("addAppInstallRule", NO_ADD_INSTALL_RULE_OPTION));
    }
    info!(
        "appIds: {}, controlRuleType: {}, userId: {}",
        app_ids.join(";"),
        args.control_rule_type,
        args.user_id
    );

    let result = client
        .with_caller(args.euid)
        .add_app_install_control_rule(&app_ids, args.control_rule_type, args.user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, ADD_RULE_NG))
}

pub(super) async fn get_install_rule(
    client: &BundleMgrClient,
    args: InstallRuleTypeArgs,
) -> Result<CommandOutput> {
    if args.user_id < 0 {
        return Ok(usage_error("getAppInstallRule", NO_GET_INSTALL_RULE_OPTION));
    }

    let output = match client
        .with_caller(args.euid)
        .get_app_install_control_rule(args.control_rule_type, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(app_ids) => CommandOutput::ok(app_id_line(&app_ids)).with_data(&app_ids),
        Err(code) => CommandOutput::new(code, GET_RULE_NG),
    };
    Ok(output)
}

pub(super) async fn delete_install_rule(
    client: &BundleMgrClient,
    args: InstallRuleArgs,
) -> Result<CommandOutput> {
    let app_ids = required(&args.app_id).map(parse::comma_list).unwrap_or_default();
    if app_ids.is_empty() || args.user_id < 0 {
        return Ok(usage_error("deleteAppInstallRule", NO_DELETE_INSTALL_RULE_OPTION));
    }

    let result = client
        .with_caller(args.euid)
        .delete_app_install_control_rule(args.control_rule_type, &app_ids, args.user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, DELETE_RULE_NG))
}

pub(super) async fn clean_install_rule(
    client: &BundleMgrClient,
    args: InstallRuleTypeArgs,
) -> Result<CommandOutput> {
    if args.user_id < 0 {
        return Ok(usage_error("cleanAppInstallRule", NO_CLEAN_INSTALL_RULE_OPTION));
    }

    let result = client
        .with_caller(args.euid)
        .clean_app_install_control_rule(args.control_rule_type, args.user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, DELETE_RULE_NG))
}

pub(super) async fn add_running_rule(
    client: &BundleMgrClient,
    args: RunningRuleArgs,
) -> Result<CommandOutput> {
    let rules = required(&args.control_rule).and_then(parse::running_rules);
    let Some(rules) = rules.filter(|rules| !rules.is_empty() && args.user_id >= 0) else {
        return Ok(usage_error("addAppRunningRule", NO_APP_RUNNING_RULE_OPTION));
    };

    let result = client
        .with_caller(args.euid)
        .add_app_running_control_rule(&rules, args.user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, ADD_RULE_NG))
}

pub(super) async fn delete_running_rule(
    client: &BundleMgrClient,
    args: RunningRuleArgs,
) -> Result<CommandOutput> {
    let rules = required(&args.control_rule).and_then(parse::running_rules);
    let Some(rules) = rules.filter(|rules| !rules.is_empty() && args.user_id >= 0) else {
        return Ok(usage_error("deleteAppRunningRule", NO_APP_RUNNING_RULE_OPTION));
    };

    let result = client
        .with_caller(args.euid)
        .delete_app_running_control_rule(&rules, args.user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, DELETE_RULE_NG))
}

pub(super) async fn clean_running_rule(
    client: &BundleMgrClient,
    args: ControlUserArgs,
) -> Result<CommandOutput> {
    let user_id = args.user_id.unwrap_or(DEFAULT_USER_ID);
    if user_id < 0 {
        return Ok(usage_error("cleanAppRunningRule", NO_CLEAN_APP_RUNNING_RULE_OPTION));
    }

    let result = client
        .with_caller(args.euid)
        .clean_app_running_control_rule(user_id)
        .await
        .into_service_result()?;
    Ok(rule_change_output(result, DELETE_RULE_NG))
}

pub(super) async fn get_running_rule(
    client: &BundleMgrClient,
    args: ControlUserArgs,
) -> Result<CommandOutput> {
    let user_id = args.user_id.unwrap_or(DEFAULT_USER_ID);
    if user_id < 0 {
        return Ok(usage_error(
            "getAppRunningControlRule",
            NO_GET_ALL_APP_RUNNING_RULE_OPTION,
        ));
    }

    let output = match client
        .with_caller(args.euid)
        .get_app_running_control_rule(user_id)
        .await
        .into_service_result()?
    {
        Ok(app_ids) => CommandOutput::ok(app_id_line(&app_ids)).with_data(&app_ids),
        Err(code) => CommandOutput::new(code, GET_RULE_NG),
    };
    Ok(output)
}

pub(super) async fn get_running_rule_result(
    client: &BundleMgrClient,
    args: RunningRuleResultArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error(
            "getAppRunningControlRuleResult",
            NO_GET_APP_RUNNING_RULE_OPTION,
        ));
    };
    info!("bundleName: {}, userId: {}", bundle_name, args.user_id);

    let output = match client
        .with_caller(args.euid)
        .get_app_running_control_rule_result(bundle_name, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(rule) => {
            let mut msg = format!("message:{}\n", rule.control_message);
            match &rule.control_want {
                Some(want) => msg.push_str(&format!("controlWant:{}\n", want)),
                None => msg.push_str("controlWant: nullptr \n"),
            }
            CommandOutput::ok(msg).with_data(&rule)
        }
        Err(code) => CommandOutput::new(code, "message: bundle:notFind\n"),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_line() {
        let ids = vec!["id1".to_string(), "id2".to_string()];
        assert_eq!(app_id_line(&ids), "appId : id1; id2; \n");
        assert_eq!(app_id_line(&[]), "appId : \n");
    }

    #[test]
    fn test_rule_change_output() {
        assert_eq!(rule_change_output(Ok(()), ADD_RULE_NG).output, "0\n");
        let failed = rule_change_output(Err(8521), DELETE_RULE_NG);
        assert_eq!(failed.code, 8521);
        assert_eq!(failed.output, DELETE_RULE_NG);
    }
}
