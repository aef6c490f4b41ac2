//! Storage statistics, caches and provisioning

use anyhow::Result;
use bundle_core::codes::{ERR_INVALID_VALUE, ERR_OK};
use bundle_core::{AppProvisionInfo, BundleStorageStats, ProcessCacheCallback};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::commands::{
    BatchBundleStatsArgs, BundleStatsArgs, BundleUserArgs, CacheSizeArgs, CacheUidArgs,
    DistributedBundleNameArgs,
};
use crate::cli::messages::*;
use crate::client::{BundleMgrClient, ServiceResultExt};
use crate::format::CommandOutput;
use crate::parse;

use super::{failure, required, usage_error};

pub(super) async fn clean_cache_automatic(
    client: &BundleMgrClient,
    args: CacheSizeArgs,
) -> Result<CommandOutput> {
    let Some(raw) = args.cache_size.as_deref() else {
        return Ok(usage_error(
            "cleanBundleCacheFilesAutomatic",
            NO_AUTO_CLEAN_CACHE_OPTION,
        ));
    };
    let Some(cache_size) = parse::cache_size(raw) else {
        return Ok(usage_error("cleanBundleCacheFilesAutomatic", INVALID_CACHE_SIZE));
    };

    let output = match client
        .clean_bundle_cache_files_automatic(cache_size)
        .await
        .into_service_result()?
    {
        Ok(freed) => {
            info!("Freed {} bytes of cache", freed);
            CommandOutput::ok(CLEAN_CACHE_AUTOMATIC_OK).with_data(&freed)
        }
        Err(code) => CommandOutput::new(code, format!("{}{}\n", CLEAN_CACHE_AUTOMATIC_NG, code)),
    };
    Ok(output)
}

/// First line of the cache commands, naming the uid acted as.
fn cache_uid_line(uid: Option<i32>) -> String {
    match uid {
        Some(uid) => format!("get uid: {}\n", uid),
        None => "with no option, set uid: 0\n".to_string(),
    }
}

pub(super) async fn get_all_bundle_cache_stat(
    client: &BundleMgrClient,
    args: CacheUidArgs,
) -> Result<CommandOutput> {
    let mut msg = cache_uid_line(args.uid);
    let client = client.with_caller(args.uid.unwrap_or(0));

    let callback = Arc::new(ProcessCacheCallback::new());
    let ret = client.get_all_bundle_cache_stat(Arc::clone(&callback)).await;

    let mut detail = String::new();
    let mut cache_size = 0;
    if ret == ERR_OK {
        detail.push_str("clean exec wait \n");
        if callback.wait_for_stat_completion().await {
            cache_size = callback.cache_stat();
        } else {
            detail.push_str("clean exec timeout \n");
        }
    }
    detail.push_str("clean exec end \n");

    let output = if ret == ERR_OK {
        detail.push_str(&format!("AllBundleCacheStat:{}\n", cache_size));
        msg.push_str(GET_ALL_BUNDLE_CACHE_STAT_OK);
        msg.push_str(&detail);
        CommandOutput::ok(msg).with_data(&cache_size)
    } else {
        detail.push_str(&format!("error code:{}\n", ret));
        msg.push_str(GET_ALL_BUNDLE_CACHE_STAT_NG);
        msg.push_str(&detail);
        msg.push('\n');
        CommandOutput::new(ret, msg)
    };
    Ok(output)
}

pub(super) async fn clean_all_bundle_cache(
    client: &BundleMgrClient,
    args: CacheUidArgs,
) -> Result<CommandOutput> {
    let mut msg = cache_uid_line(args.uid);
    let client = client.with_caller(args.uid.unwrap_or(0));

    let callback = Arc::new(ProcessCacheCallback::new());
    let ret = client.clean_all_bundle_cache(Arc::clone(&callback)).await;

    let mut detail = String::new();
    let mut clean_ret = 0;
    if ret == ERR_OK {
        detail.push_str("clean exec wait \n");
        if callback.wait_for_clean_completion().await {
            clean_ret = callback.clean_result();
        } else {
            detail.push_str("clean exec timeout \n");
            clean_ret = -1;
        }
    }
    detail.push_str("clean exec end \n");
    debug!("cleanAllBundleCache returned {}, clean result {}", ret, clean_ret);

    let output = if ret == ERR_OK && clean_ret == ERR_OK {
        detail.push_str(&format!("CleanBundleCacheCallback:{}\n", clean_ret));
        msg.push_str(CLEAN_ALL_BUNDLE_CACHE_OK);
        msg.push_str(&detail);
        CommandOutput::ok(msg)
    } else {
        detail.push_str(&format!("return code:{} cleanRet code:{}\n", ret, clean_ret));
        msg.push_str(CLEAN_ALL_BUNDLE_CACHE_NG);
        msg.push_str(&detail);
        msg.push('\n');
        let code = if ret != ERR_OK { ret } else { ERR_INVALID_VALUE };
        CommandOutput::new(code, msg)
    };
    Ok(output)
}

pub(super) async fn get_bundle_stats(
    client: &BundleMgrClient,
    args: BundleStatsArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getBundleStats", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .get_bundle_stats(bundle_name, args.user_id, args.app_index)
        .await
        .into_service_result()?
    {
        Ok(stats) => {
            let mut msg = GET_BUNDLE_STATS_OK.to_string();
            for (label, size) in BUNDLE_STATS_LABELS.iter().zip(&stats) {
                msg.push_str(&format!("{}{}\n", label, size));
            }
            CommandOutput::ok(msg).with_data(&stats)
        }
        Err(code) => failure(GET_BUNDLE_STATS_NG, code),
    };
    Ok(output)
}

/// One row per bundle: its stats, or its error code.
fn batch_stats_rows(stats: &[BundleStorageStats]) -> Value {
    let rows = stats
        .iter()
        .map(|stats| {
            if stats.err_code == ERR_OK {
                json!({ "bundleName": stats.bundle_name, "bundleStats": stats.bundle_stats })
            } else {
                json!({ "bundleName": stats.bundle_name, "errCode": stats.err_code })
            }
        })
        .collect();
    Value::Array(rows)
}

pub(super) async fn batch_get_bundle_stats(
    client: &BundleMgrClient,
    args: BatchBundleStatsArgs,
) -> Result<CommandOutput> {
    let bundle_names = required(&args.bundle_name)
        .map(parse::comma_list)
        .unwrap_or_default();
    if bundle_names.is_empty() {
        return Ok(usage_error("batchGetBundleStats", NO_BUNDLE_NAME_OPTION));
    }

    let output = match client
        .batch_get_bundle_stats(&bundle_names, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(stats) => {
            let rows = batch_stats_rows(&stats);
            CommandOutput::ok(format!("{}{}\n", BATCH_GET_BUNDLE_STATS_OK, rows)).with_data(&rows)
        }
        Err(code) => failure(BATCH_GET_BUNDLE_STATS_NG, code),
    };
    Ok(output)
}

fn provision_block(info: &AppProvisionInfo) -> String {
    let mut msg = String::from("{\n");
    msg.push_str(&format!("    versionCode: {}\n", info.version_code));
    msg.push_str(&format!("    versionName: {}\n", info.version_name));
    msg.push_str(&format!("    uuid: {}\n", info.uuid));
    msg.push_str(&format!("    type: {}\n", info.provision_type));
    msg.push_str(&format!("    appDistributionType: {}\n", info.app_distribution_type));
    msg.push_str(&format!("    developerId: {}\n", info.developer_id));
    msg.push_str(&format!("    certificate: {}\n", info.certificate));
    msg.push_str(&format!("    apl: {}\n", info.apl));
    msg.push_str(&format!("    issuer: {}\n", info.issuer));
    msg.push_str("    validity: {\n");
    msg.push_str(&format!("        notBefore: {}\n", info.validity.not_before));
    msg.push_str(&format!("        notAfter: {}\n", info.validity.not_after));
    msg.push_str("    }\n");
    msg.push_str(&format!("    appServiceCapabilities: {}\n", info.app_service_capabilities));
    msg.push_str("}\n");
    msg
}

pub(super) async fn get_app_provision_info(
    client: &BundleMgrClient,
    args: BundleUserArgs,
) -> Result<CommandOutput> {
    let Some(bundle_name) = required(&args.bundle_name) else {
        return Ok(usage_error("getAppProvisionInfo", NO_BUNDLE_NAME_OPTION));
    };

    let output = match client
        .get_app_provision_info(bundle_name, args.user_id)
        .await
        .into_service_result()?
    {
        Ok(info) => CommandOutput::ok(format!(
            "{}{}",
            GET_APP_PROVISION_INFO_OK,
            provision_block(&info)
        ))
        .with_data(&info),
        Err(code) => failure(GET_APP_PROVISION_INFO_NG, code),
    };
    Ok(output)
}

pub(super) async fn get_distributed_bundle_name(
    client: &BundleMgrClient,
    args: DistributedBundleNameArgs,
) -> Result<CommandOutput> {
    let (Some(network_id), Some(access_token_id)) = (
        required(&args.network_id),
        args.access_token_id.filter(|id| *id != 0),
    ) else {
        return Ok(usage_error(
            "getDistributedBundleName",
            NO_GET_DISTRIBUTED_BUNDLE_NAME_OPTION,
        ));
    };

    let output = match client
        .get_distributed_bundle_name(network_id, access_token_id)
        .await
        .into_service_result()?
    {
        Ok(name) => {
            let shown = if name.is_empty() {
                "no match found "
            } else {
                name.as_str()
            };
            CommandOutput::ok(format!("{}\n{}\n\n", GET_DISTRIBUTED_BUNDLE_NAME_OK, shown))
                .with_data(&name)
        }
        Err(code) => failure(GET_DISTRIBUTED_BUNDLE_NAME_NG, code),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_uid_line() {
        assert_eq!(cache_uid_line(None), "with no option, set uid: 0\n");
        assert_eq!(cache_uid_line(Some(20010001)), "get uid: 20010001\n");
    }

    #[test]
    fn test_batch_stats_rows_are_compact() {
        let stats = vec![
            BundleStorageStats {
                bundle_name: "com.example.a".to_string(),
                bundle_stats: vec![1, 2, 3, 4, 5],
                err_code: 0,
            },
            BundleStorageStats {
                bundle_name: "com.example.missing".to_string(),
                bundle_stats: Vec::new(),
                err_code: 8521,
            },
        ];
        assert_eq!(
            batch_stats_rows(&stats).to_string(),
            r#"[{"bundleName":"com.example.a","bundleStats":[1,2,3,4,5]},{"bundleName":"com.example.missing","errCode":8521}]"#
        );
    }

    #[test]
    fn test_provision_block_layout() {
        let block = provision_block(&AppProvisionInfo {
            version_code: 1,
            apl: "normal".to_string(),
            ..Default::default()
        });
        assert!(block.starts_with("{\n    versionCode: 1\n    versionName: \n"));
        assert!(block.contains("    apl: normal\n"));
        let validity = "    validity: {\n        notBefore: 0\n        notAfter: 0\n    }\n";
        assert!(block.contains(validity));
        assert!(block.ends_with("    appServiceCapabilities: \n}\n"));
    }
}
