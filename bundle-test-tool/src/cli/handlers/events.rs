//! Bundle event callback, AOT compile status and common events

use anyhow::Result;
use bundle_core::codes::{ERR_INVALID_VALUE, ERR_OK};
use bundle_core::{COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED, DEFAULT_USER_ID};
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::commands::{EventCallbackArgs, ResetAotArgs};
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::CommandOutput;

fn callback_line(action: &str, ok: bool) -> String {
    format!("{} {}\n", action, if ok { "success" } else { "failed" })
}

pub(super) async fn bundle_event_callback(
    client: &BundleMgrClient,
    args: EventCallbackArgs,
) -> Result<CommandOutput> {
    let client = client.with_caller(args.uid);
    let pause = Duration::from_secs(args.sleep_seconds);
    let mut msg = String::new();

    if !args.only_unregister {
        let registered = matches!(
            client.register_bundle_event_callback().await.into_service_result()?,
            Ok(true)
        );
        msg.push_str(&callback_line("RegisterBundleEventCallback", registered));
        if !registered {
            return Ok(CommandOutput::new(ERR_INVALID_VALUE, msg));
        }
        debug!("Holding the event callback for {:?}", pause);
        tokio::time::sleep(pause).await;
    }

    let unregistered = matches!(
        client.unregister_bundle_event_callback().await.into_service_result()?,
        Ok(true)
    );
    msg.push_str(&callback_line("UnregisterBundleEventCallback", unregistered));
    if !unregistered {
        return Ok(CommandOutput::new(ERR_INVALID_VALUE, msg));
    }
    if !args.only_unregister {
        tokio::time::sleep(pause).await;
    }
    Ok(CommandOutput::ok(msg))
}

pub(super) async fn reset_aot_compile_status(
    client: &BundleMgrClient,
    args: ResetAotArgs,
) -> Result<CommandOutput> {
    let bundle_name = args.bundle_name.unwrap_or_default();
    let module_name = args.module_name.unwrap_or_default();

    let uid = if args.uid == -1 {
        client
            .get_uid_by_bundle_name(&bundle_name, DEFAULT_USER_ID, 0)
            .await
            .into_service_result()?
            .unwrap_or(-1)
    } else {
        args.uid
    };
    info!(
        "bundleName: {}, moduleName: {}, triggerMode: {}, uid: {}",
        bundle_name, module_name, args.trigger_mode, uid
    );

    let code = match client
        .with_caller(uid)
        .reset_aot_compile_status(&bundle_name, &module_name, args.trigger_mode)
        .await
        .into_service_result()?
    {
        Ok(()) => ERR_OK,
        Err(code) => code,
    };
    Ok(CommandOutput::new(
        code,
        format!("resetAOTCompileStatus: {}\n", code),
    ))
}

pub(super) async fn send_common_event(client: &BundleMgrClient) -> Result<CommandOutput> {
    let code = match client
        .publish_common_event(COMMON_EVENT_CHARGE_IDLE_MODE_CHANGED)
        .await
        .into_service_result()?
    {
        Ok(()) => ERR_OK,
        Err(code) => code,
    };
    Ok(CommandOutput::new(code, format!("sendCommonEvent: {}\n", code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_line() {
        assert_eq!(
            callback_line("RegisterBundleEventCallback", true),
            "RegisterBundleEventCallback success\n"
        );
        assert_eq!(
            callback_line("UnregisterBundleEventCallback", false),
            "UnregisterBundleEventCallback failed\n"
        );
    }
}
