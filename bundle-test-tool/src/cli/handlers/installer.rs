//! Sandbox apps and preinstalled bundle removal

use anyhow::Result;
use bundle_core::codes::{install_message, ERR_OK};
use bundle_core::{
    BundleInstaller, InstallParam, StatusReceiver, VERIFY_UNINSTALL_FORCED_KEY,
    VERIFY_UNINSTALL_FORCED_VALUE,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::commands::{InstallSandboxArgs, SandboxArgs, UninstallPreInstallArgs};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::{to_json_dump, CommandOutput};

use super::{failure, required, usage_error};

pub(super) async fn install_sandbox(
    client: &BundleMgrClient,
    args: InstallSandboxArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("installSandbox", NO_BUNDLE_NAME_OPTION));
    };
    debug!("installSandbox app bundleName is {}", bundle_name);

    let output = match client
        .install_sandbox_app(bundle_name, args.dlp_type, args.user_id)
        .await
    {
        Ok(app_index) => {
            info!("Installed sandbox {} with app index {}", bundle_name, app_index);
            CommandOutput::ok(format!("{}appIndex is {}\n", INSTALL_SANDBOX_OK, app_index))
                .with_data(&app_index)
        }
        Err(e) => failure(INSTALL_SANDBOX_NG, e.err_code()),
    };
    Ok(output)
}

pub(super) async fn uninstall_sandbox(
    client: &BundleMgrClient,
    args: SandboxArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("uninstallSandbox", NO_BUNDLE_NAME_OPTION));
    };

    // An index left out is sent as -1 and refused by the service
    let app_index = args.app_index.unwrap_or(-1);
    let output = match client
        .uninstall_sandbox_app(bundle_name, app_index, args.user_id)
        .await
    {
        Ok(()) => CommandOutput::ok(UNINSTALL_SANDBOX_OK),
        Err(e) => failure(UNINSTALL_SANDBOX_NG, e.err_code()),
    };
    Ok(output)
}

pub(super) async fn dump_sandbox(
    client: &BundleMgrClient,
    args: SandboxArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("dumpSandbox", NO_BUNDLE_NAME_OPTION));
    };

    let app_index = args.app_index.unwrap_or(-1);
    let output = match client
        .get_sandbox_bundle_info(bundle_name, app_index, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(info) => CommandOutput::ok(format!("{}\n", to_json_dump(&info)?)).with_data(&info),
        Err(code) => failure(DUMP_SANDBOX_NG, code),
    };
    Ok(output)
}

/// Install parameters for removing a preinstalled bundle.
fn preinstall_uninstall_param(user_id: i32, forced: i32) -> InstallParam {
    let mut param = InstallParam {
        user_id,
        ..Default::default()
    };
    if forced > 0 {
        param.parameters.insert(
            VERIFY_UNINSTALL_FORCED_KEY.to_string(),
            VERIFY_UNINSTALL_FORCED_VALUE.to_string(),
        );
    }
    param
}

pub(super) async fn uninstall_preinstall_bundle(
    client: &BundleMgrClient,
    args: UninstallPreInstallArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("uninstallPreInstallBundle", NO_BUNDLE_NAME_OPTION));
    };
    let param = preinstall_uninstall_param(args.user_id, args.forced);
    let receiver = Arc::new(StatusReceiver::new());

    match required(&args.module_name) {
        Some(module_name) => {
            client
                .uninstall_module(bundle_name, module_name, &param, Arc::clone(&receiver))
                .await
        }
        None => client.uninstall(bundle_name, &param, Arc::clone(&receiver)).await,
    };

    let code = receiver.result_code().await;
    let output = if code == ERR_OK {
        CommandOutput::ok(format!("{}\n", UNINSTALL_PREINSTALL_BUNDLE_OK))
    } else {
        CommandOutput::new(
            code,
            format!("{}\n{}", UNINSTALL_PREINSTALL_BUNDLE_NG, install_message(code)),
        )
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_uninstall_param() {
        let param = preinstall_uninstall_param(101, 1);
        assert_eq!(param.user_id, 101);
        assert_eq!(
            param.parameters.get(VERIFY_UNINSTALL_FORCED_KEY).map(String::as_str),
            Some(VERIFY_UNINSTALL_FORCED_VALUE)
        );
    }

    #[test]
    fn test_unforced_uninstall_param() {
        let param = preinstall_uninstall_param(100, 0);
        assert!(param.parameters.is_empty());
    }
}
