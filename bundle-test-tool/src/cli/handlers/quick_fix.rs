//! Quick fix deployment and debug mode

use anyhow::Result;
use bundle_core::codes::{
    quick_fix_message, result_message, ErrCode, ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM,
    ERR_OK,
};
use bundle_core::{QuickFixResult, QuickFixStatusCallback};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cli::commands::{BundleNameArgs, DebugModeArgs, DeployQuickFixArgs, SwitchQuickFixArgs};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::CommandOutput;

use super::{required, usage_error};

/// Resolve patch paths, skipping the ones that do not exist.
///
/// The result is deduplicated and ordered.
async fn real_paths(paths: &[String]) -> Vec<String> {
    let mut real = BTreeSet::new();
    for path in paths {
        match tokio::fs::canonicalize(path).await {
            Ok(resolved) => {
                real.insert(resolved.to_string_lossy().into_owned());
            }
            Err(e) => warn!("Skipping patch path {}: {}", path, e),
        }
    }
    real.into_iter().collect()
}

/// Wait for the outcome of a dispatched quick fix request.
async fn await_quick_fix(
    dispatched: ErrCode,
    callback: &QuickFixStatusCallback,
) -> (ErrCode, Option<QuickFixResult>) {
    if dispatched != ERR_OK {
        return (dispatched, None);
    }
    callback.result_code().await
}

fn quick_fix_output(
    ok: &str,
    ng: &str,
    (code, result): (ErrCode, Option<QuickFixResult>),
) -> CommandOutput {
    let header = if code == ERR_OK { ok } else { ng };
    let output = CommandOutput::new(
        code,
        format!("{}{}", header, result_message(code, result.as_ref())),
    );
    match result {
        Some(result) => output.with_data(&result),
        None => output,
    }
}

pub(super) async fn deploy(
    client: &BundleMgrClient,
    args: DeployQuickFixArgs,
) -> Result<CommandOutput> {
    let paths: Vec<String> = args
        .patch_paths
        .iter()
        .chain(args.paths.iter())
        .filter(|path| !path.is_empty())
        .cloned()
        .collect();
    if paths.is_empty() {
        return Ok(usage_error("deployQuickFix", NO_QUICK_FIX_PATH_OPTION));
    }

    let real = real_paths(&paths).await;
    debug!("Deploying quick fix from {:?}", real);

    let outcome = match client.copy_files(&real).await.into_service_result()? {
        Ok(dest_files) => {
            let callback = Arc::new(QuickFixStatusCallback::new());
            let dispatched =
                client.deploy_quick_fix(&dest_files, Arc::clone(&callback), args.debug != 0);
            await_quick_fix(dispatched, &callback).await
        }
        Err(code) => (code, None),
    };
    Ok(quick_fix_output(
        DEPLOY_QUICK_FIX_OK,
        DEPLOY_QUICK_FIX_NG,
        outcome,
    ))
}

pub(super) async fn switch(
    client: &BundleMgrClient,
    args: SwitchQuickFixArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("switchQuickFix", NO_BUNDLE_NAME_OPTION));
    };
    let Some(enable) = args.enable.filter(|e| (0..=1).contains(e)) else {
        return Ok(usage_error("switchQuickFix", REQUIRE_CORRECT_VALUE));
    };

    let callback = Arc::new(QuickFixStatusCallback::new());
    let dispatched = client.switch_quick_fix(bundle_name, enable != 0, Arc::clone(&callback));
    let outcome = await_quick_fix(dispatched, &callback).await;
    Ok(quick_fix_output(
        SWITCH_QUICK_FIX_OK,
        SWITCH_QUICK_FIX_NG,
        outcome,
    ))
}

pub(super) async fn delete(
    client: &BundleMgrClient,
    args: BundleNameArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("deleteQuickFix", NO_BUNDLE_NAME_OPTION));
    };

    let callback = Arc::new(QuickFixStatusCallback::new());
    let dispatched = client.delete_quick_fix(bundle_name, Arc::clone(&callback));
    let outcome = await_quick_fix(dispatched, &callback).await;
    Ok(quick_fix_output(
        DELETE_QUICK_FIX_OK,
        DELETE_QUICK_FIX_NG,
        outcome,
    ))
}

pub(super) async fn set_debug_mode(
    client: &BundleMgrClient,
    args: DebugModeArgs,
) -> Result<CommandOutput> {
    let Some(enable) = args.enable else {
        return Ok(usage_error("setDebugMode", REQUIRE_CORRECT_VALUE));
    };

    let code = if enable != 0 && enable != 1 {
        ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM
    } else {
        match client.set_debug_mode(enable == 1).await.into_service_result()? {
            Ok(()) => ERR_OK,
            Err(code) => code,
        }
    };

    let output = if code == ERR_OK {
        CommandOutput::ok(SET_DEBUG_MODE_OK)
    } else {
        CommandOutput::new(
            code,
            format!("{}{}", SET_DEBUG_MODE_NG, quick_fix_message(code)),
        )
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_core::codes::ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT;
    use bundle_core::DeleteQuickFixResult;
    use std::time::Duration;

    #[tokio::test]
    async fn test_real_paths_dedups_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let patch = dir.path().join("entry.hqf");
        std::fs::write(&patch, b"patch").unwrap();
        let patch = patch.to_string_lossy().into_owned();

        let resolved = real_paths(&[
            patch.clone(),
            patch.clone(),
            dir.path().join("missing.hqf").to_string_lossy().into_owned(),
        ])
        .await;
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].ends_with("entry.hqf"));
    }

    #[tokio::test]
    async fn test_refused_dispatch_skips_waiting() {
        let callback = QuickFixStatusCallback::with_wait_time(Duration::from_secs(60));
        let (code, result) = await_quick_fix(8521, &callback).await;
        assert_eq!(code, 8521);
        assert!(result.is_none());
    }

    #[test]
    fn test_quick_fix_output_text() {
        let ok = quick_fix_output(
            DELETE_QUICK_FIX_OK,
            DELETE_QUICK_FIX_NG,
            (
                ERR_OK,
                Some(QuickFixResult::Delete(DeleteQuickFixResult {
                    result_code: 0,
                    bundle_name: "com.example.app".to_string(),
                })),
            ),
        );
        assert!(ok.output.starts_with("delete quick fix successfully\n{"));
        assert!(ok.output.ends_with("}\n"));

        let timed_out = quick_fix_output(
            DELETE_QUICK_FIX_OK,
            DELETE_QUICK_FIX_NG,
            (ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT, None),
        );
        assert_eq!(
            timed_out.output,
            "delete quick fix failed\nerror: quick fix operation time out.\n"
        );
    }
}
