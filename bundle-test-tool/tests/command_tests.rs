//! End-to-end tests of the printed command texts
//!
//! Every test parses a real command line and runs it against an in-process
//! bundle manager seeded with the built-in fixtures.

mod common;

use bundle_core::codes::{
    ERR_APP_CONTROL_PERMISSION_DENIED, ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE,
    ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM, ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST,
    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST, ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR,
    ERR_BUNDLE_MANAGER_NO_PROXY_DATA, ERR_INVALID_VALUE, ERR_OK,
};

const MY_APP: &str = "com.example.myapplication";
const MY_APP_UID: &str = "20010001";
const MY_APP_ID: &str =
    "com.example.myapplication_BNtg4JBClbl92Rgc3jm/RfcAdrHXaM8F0QOiwVEhnV5ebE5jNIYnAx";

#[tokio::test]
async fn test_check_ability_enable_install() {
    let service = common::start().await;

    let output = service
        .run(&["check", "-n", MY_APP, "-m", "entry", "-a", "EntryAbility"])
        .await;
    assert_eq!(output.output, "checkAbilityEnableInstall: true\n");

    let output = service
        .run(&["check", "-n", MY_APP, "-m", "entry", "-a", "Missing"])
        .await;
    assert_eq!(output.output, "checkAbilityEnableInstall: false\n");
}

#[tokio::test]
async fn test_set_then_get_removable() {
    let service = common::start().await;

    let output = service.run(&["getrm", "-n", MY_APP, "-m", "entry"]).await;
    assert_eq!(output.output, "isRemovable: 1\n");

    let output = service
        .run(&["setrm", "-n", MY_APP, "-m", "entry", "-i", "0"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "set removable is ok \n");

    let output = service.run(&["getrm", "-n", MY_APP, "-m", "entry"]).await;
    assert_eq!(output.output, "isRemovable: 0\n");
}

#[tokio::test]
async fn test_missing_bundle_name_prints_usage() {
    let service = common::start().await;

    let output = service.run(&["getrm", "-m", "entry"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert!(output.output.starts_with(
        "error: you must specify a bundle name with '-n' or '--bundle-name' \n\
         and a module name with '-m' or '--module-name' \n"
    ));
    assert!(output.output.contains("--module-name"));
}

#[tokio::test]
async fn test_install_rules_lifecycle() {
    let service = common::start().await;

    let output = service
        .run(&["addAppInstallRule", "-a", "id1,id2", "-t", "0"])
        .await;
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppInstallRule", "-t", "0"]).await;
    assert_eq!(output.output, "appId : id1; id2; \n");

    let output = service
        .run(&["deleteAppInstallRule", "-a", "id1", "-t", "0"])
        .await;
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppInstallRule", "-t", "0"]).await;
    assert_eq!(output.output, "appId : id2; \n");

    let output = service.run(&["cleanAppInstallRule", "-t", "0"]).await;
    assert_eq!(output.output, "0\n");
    let output = service.run(&["getAppInstallRule", "-t", "0"]).await;
    assert_eq!(output.output, "appId : \n");
}

#[tokio::test]
async fn test_install_rules_need_edm_caller() {
    let service = common::start().await;

    let output = service
        .run(&["addAppInstallRule", "-a", "id1", "-e", MY_APP_UID])
        .await;
    assert_ne!(output.code, ERR_OK);
    assert_eq!(output.output, "error: failed to add rule \n");
}

#[tokio::test]
async fn test_running_rule_result_for_unknown_bundle() {
    let service = common::start().await;

    let output = service
        .run(&["getAppRunningControlRuleResult", "-n", "com.example.unknown"])
        .await;
    assert_ne!(output.code, ERR_OK);
    assert_eq!(output.output, "message: bundle:notFind\n");
}

#[tokio::test]
async fn test_bundle_stats_text() {
    let service = common::start().await;

    let output = service.run(&["getBundleStats", "-n", MY_APP]).await;
    assert_eq!(
        output.output,
        "get bundle stats successfully\n\
         app data size: 1024\n\
         user data size: 2048\n\
         distributed data size: 0\n\
         database size: 512\n\
         cache size: 4096\n"
    );

    let output = service
        .run(&["getBundleStats", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(
        output.output,
        format!("get bundle stats failed\nerrCode is {}\n", ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST)
    );
}

#[tokio::test]
async fn test_batch_bundle_stats_reports_each_bundle() {
    let service = common::start().await;

    let output = service
        .run(&["batchGetBundleStats", "-n", "com.example.notes,com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_OK);
    let expected = "batch get bundle stats successfully\n[{\"bundleName\":\"com.example.notes\"";
    assert!(output.output.starts_with(expected));
    assert!(output.output.contains("\"bundleName\":\"com.example.unknown\",\"errCode\":"));
}

#[tokio::test]
async fn test_clean_cache_automatic_rejects_bad_sizes() {
    let service = common::start().await;

    let output = service
        .run(&["cleanBundleCacheFilesAutomatic", "-s", "abc"])
        .await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert!(output
        .output
        .starts_with("error: parameter error, cache size must be greater than 0\n"));

    let output = service
        .run(&["cleanBundleCacheFilesAutomatic", "-s", "2048"])
        .await;
    assert_eq!(output.output, "clean fixed size cache successfully\n");
}

#[tokio::test]
async fn test_all_bundle_cache_stat_as_root() {
    let service = common::start().await;

    let output = service.run(&["getAllBundleCacheStat"]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with(
        "with no option, set uid: 0\ngetAllBundleCacheStat successfully\nclean exec wait \nclean exec end \n"
    ));
    assert!(output.output.ends_with("AllBundleCacheStat:5120\n"));
}

#[tokio::test]
async fn test_all_bundle_cache_stat_refused_for_apps() {
    let service = common::start().await;

    let output = service.run(&["getAllBundleCacheStat", "-u", MY_APP_UID]).await;
    assert_ne!(output.code, ERR_OK);
    let expected = "get uid: 20010001\ngetAllBundleCacheStat failed\nclean exec end \nerror code:";
    assert!(output.output.starts_with(expected));
}

#[tokio::test]
async fn test_clean_all_bundle_cache() {
    let service = common::start().await;

    let output = service.run(&["cleanAllBundleCache"]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.contains("cleanAllBundleCache successfully\n"));
    assert!(output.output.ends_with("CleanBundleCacheCallback:0\n"));

    let output = service.run(&["getAllBundleCacheStat"]).await;
    assert!(output.output.ends_with("AllBundleCacheStat:0\n"));
}

#[tokio::test]
async fn test_quick_fix_lifecycle() {
    let service = common::start().await;
    let dir = tempfile::tempdir().unwrap();
    let patch = dir.path().join(format!("{}.hqf", MY_APP));
    std::fs::write(&patch, b"patch").unwrap();
    let patch = patch.to_string_lossy().into_owned();

    let output = service.run(&["deployQuickFix", "-p", &patch]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with("deploy quick fix successfully\n{"));

    let output = service.run(&["switchQuickFix", "-n", MY_APP, "-e", "1"]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with("switch quick fix successfully\n"));

    let output = service.run(&["switchQuickFix", "-n", MY_APP, "-e", "0"]).await;
    assert_eq!(output.code, ERR_OK);

    let output = service.run(&["deleteQuickFix", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with("delete quick fix successfully\n"));

    let output = service.run(&["deleteQuickFix", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE);
    assert!(output.output.starts_with("delete quick fix failed\nerror: "));
}

#[tokio::test]
async fn test_switch_quick_fix_needs_enable_flag() {
    let service = common::start().await;

    let output = service.run(&["switchQuickFix", "-n", MY_APP, "-e", "2"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert!(output
        .output
        .starts_with("error: option requires a correct value or note that\n"));
}

#[tokio::test]
async fn test_set_debug_mode() {
    let service = common::start().await;

    let output = service.run(&["setDebugMode", "-e", "1"]).await;
    assert_eq!(output.output, "set debug mode successfully\n");
    assert!(service.state.registry.read().await.debug_mode());

    let output = service.run(&["setDebugMode", "-e", "5"]).await;
    assert_eq!(output.code, ERR_BUNDLEMANAGER_SET_DEBUG_MODE_INVALID_PARAM);
    assert!(output.output.starts_with("set debug mode failed\nerror: "));
}

#[tokio::test]
async fn test_sandbox_lifecycle() {
    let service = common::start().await;

    let output = service
        .run(&["installSandbox", "-n", MY_APP, "-d", "1"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "install sandbox app successfully \nappIndex is 1001\n");

    let output = service.run(&["dumpSandbox", "-n", MY_APP, "-a", "1001"]).await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.contains(&format!("\"name\": \"{}\"", MY_APP)));

    let output = service
        .run(&["uninstallSandbox", "-n", MY_APP, "-a", "1001"])
        .await;
    assert_eq!(output.output, "uninstall sandbox app successfully\n");

    let output = service.run(&["dumpSandbox", "-n", MY_APP, "-a", "1001"]).await;
    assert_ne!(output.code, ERR_OK);
    assert!(output.output.starts_with("dump sandbox app info failed\nerrCode is "));

    let output = service.run(&["installSandbox", "-n", MY_APP]).await;
    assert_ne!(output.code, ERR_OK);
    assert!(output.output.starts_with("install sandbox app failed \nerrCode is "));
}

#[tokio::test]
async fn test_uninstall_preinstalled_bundle() {
    let service = common::start().await;

    let output = service
        .run(&["uninstallPreInstallBundle", "-n", "com.ohos.settings", "-f", "1"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "uninstall preinstall app successfully\n\n");

    let output = service
        .run(&["uninstallPreInstallBundle", "-n", "com.example.unknown"])
        .await;
    assert_ne!(output.code, ERR_OK);
    assert!(output
        .output
        .starts_with("uninstall preinstall app failed\n\nerror: "));
}

#[tokio::test]
async fn test_uninstall_preinstalled_bundle_for_negative_user() {
    let service = common::start().await;

    let output = service
        .run(&["uninstallPreInstallBundle", "-n", "com.ohos.settings", "-u", "-1"])
        .await;
    assert_ne!(output.code, ERR_OK);
    assert!(output
        .output
        .starts_with("uninstall preinstall app failed\n\nerror: "));
    assert!(!output.output.contains("--bundle-name"));
}

#[tokio::test]
async fn test_mock_installer_always_succeeds() {
    let service = common::start_mock_installer().await;

    let output = service
        .run(&["uninstallPreInstallBundle", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "uninstall preinstall app successfully\n\n");
}

#[tokio::test]
async fn test_continue_bundle_names() {
    let service = common::start().await;

    let output = service.run(&["getContinueBundleName", "-n", MY_APP]).await;
    assert_eq!(
        output.output,
        "continueBundleNameList:\n{\n     com.example.myapplication.pad\n     com.example.myapplication.pc\n}\n"
    );

    let output = service
        .run(&["getContinueBundleName", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert_eq!(output.output, "Get continue bundle name error!");
}

#[tokio::test]
async fn test_identity_queries() {
    let service = common::start().await;

    let output = service.run(&["getUidByBundleName", "-n", MY_APP]).await;
    assert_eq!(output.output, format!("{}\n", MY_APP_UID));

    let output = service
        .run(&["getUidByBundleName", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.output, "getUidByBundleName failed\n");

    let output = service.run(&["getOdid", "-u", MY_APP_UID]).await;
    assert_eq!(output.output, "getOdid successfully\na6b5f8c2-0d44-4b0e-9e5f-3c1d7e2a9b10\n");

    let output = service.run(&["getOdid", "-u", "20019999"]).await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(output.output, "getOdid failed\nPlease enter a valid uid\n");

    let output = service
        .run(&["getSimpleAppInfoForUid", "-u", &format!("{},20019999", MY_APP_UID)])
        .await;
    let lines: Vec<&str> = output.output.lines().collect();
    assert_eq!(lines[0], "getSimpleAppInfoForUid is ok ");
    assert_eq!(
        lines[1],
        "[ uid = 20010001, bundleName = com.example.myapplication, appIndex = 0, ret = 0]"
    );
    assert!(lines[2].starts_with("[ uid = 20019999, bundleName = , appIndex = 0, ret = "));

    let output = service
        .run(&["getBundleNamesForUidExt", "-u", MY_APP_UID])
        .await;
    assert_eq!(
        output.output,
        "GetBundleNamesForUidExt successbundle name list:\n{\n     com.example.myapplication\n}\n"
    );

    let output = service
        .run(&["getAppIdentifierAndAppIndex", "-a", "537000001"])
        .await;
    assert_eq!(
        output.output,
        "getAppIdentifierAndAppIndex successfully\nappIdentifier:5765880207853624761\nappIndex:0\n"
    );
}

#[tokio::test]
async fn test_directories() {
    let service = common::start().await;

    let output = service
        .run(&["getDirByBundleNameAndAppIndex", "-n", MY_APP, "-a", "1"])
        .await;
    assert_eq!(
        output.output,
        "getDirByBundleNameAndAppIndex successfully\n+clone-1+com.example.myapplication\n"
    );

    let output = service
        .run(&["getDirByBundleNameAndAppIndex", "-n", MY_APP, "-a", "-1"])
        .await;
    assert_eq!(
        output.output,
        "getDirByBundleNameAndAppIndex failed\nPlease enter a valid appIndex\n"
    );

    let output = service.run(&["getAllBundleDirs", "-u", "0"]).await;
    assert_eq!(
        output.output,
        "getAllBundleDirs successfully\nbundleDirs:\n{\n     [ bundleName = com.ohos.settings, appIndex = 0, dir = com.ohos.settings]\n}\n"
    );

    let output = service.run(&["getGroupDir", "-d", "group.example.shared"]).await;
    assert!(output
        .output
        .starts_with("getGroupDir successfully\ngroup dir:\n"));
}

#[tokio::test]
async fn test_is_bundle_installed() {
    let service = common::start().await;

    let output = service.run(&["isBundleInstalled", "-n", MY_APP]).await;
    assert_eq!(output.output, "IsBundleInstalled is ok \nisBundleInstalled: true\n");

    let output = service
        .run(&["isBundleInstalled", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.output, "IsBundleInstalled is ok \nisBundleInstalled: false\n");
}

#[tokio::test]
async fn test_app_distribution_types() {
    let service = common::start().await;

    let output = service.run(&["setAppDistributionTypes", "-a", "1,4"]).await;
    assert_eq!(output.output, "setAppDistributionTypes successfully\n");
    assert_eq!(
        service.state.registry.read().await.app_distribution_types().len(),
        2
    );

    let output = service.run(&["setAppDistributionTypes", "-a", "1,9"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert_eq!(output.output, "setAppDistributionTypes failed\n");
}

#[tokio::test]
async fn test_encrypted_status_acts_as_code_protect() {
    let service = common::start().await;

    let output = service
        .run(&["updateAppEncryptedStatus", "-n", MY_APP, "-e", "1"])
        .await;
    assert_eq!(output.output, "update app encrypted status successfully \n");
}

#[tokio::test]
async fn test_common_event_is_published() {
    let service = common::start().await;

    let output = service.run(&["sendCommonEvent"]).await;
    assert_eq!(output.output, "sendCommonEvent: 0\n");
    assert_eq!(
        service.state.registry.read().await.published_events(),
        ["usual.event.CHARGE_IDLE_MODE_CHANGED".to_string()]
    );
}

#[tokio::test]
async fn test_reset_aot_resolves_bundle_uid() {
    let service = common::start().await;

    let output = service
        .run(&["resetAOTCompileStatus", "-b", MY_APP, "-m", "entry"])
        .await;
    assert_eq!(output.output, "resetAOTCompileStatus: 0\n");
}

#[tokio::test]
async fn test_event_callback_only_unregister() {
    let service = common::start().await;

    let output = service.run(&["eventCB", "-o"]).await;
    assert_eq!(output.output, "UnregisterBundleEventCallback success\n");

    let output = service.run(&["eventCB", "-u", MY_APP_UID, "--sleep-seconds", "0"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert_eq!(output.output, "RegisterBundleEventCallback failed\n");
}

#[tokio::test]
async fn test_json_profile_and_skill_uri() {
    let service = common::start().await;

    let output = service
        .run(&["getJsonProfile", "-p", "1", "-n", MY_APP, "-m", "entry"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.contains("PlayMusic"));

    let output = service
        .run(&[
            "implicitQuerySkillUriInfo",
            "-n",
            MY_APP,
            "-a",
            "ohos.want.action.viewData",
            "-e",
            "entity.system.browsable",
        ])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with("Ability start\n{\n    scheme: https\n"));
}

#[tokio::test]
async fn test_skill_uri_query_without_entity() {
    let service = common::start().await;

    let output = service
        .run(&["implicitQuerySkillUriInfo", "-n", MY_APP, "-a", "ohos.want.action.viewData"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert!(output.output.starts_with("Ability start\n{\n    scheme: https\n"));
    assert!(output.output.ends_with("Ability end\n\n"));
}

#[tokio::test]
async fn test_get_string() {
    let service = common::start().await;

    let output = service
        .run(&["getStr", "-n", MY_APP, "-m", "entry", "-i", "16777216"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "MyApplication");

    let output = service
        .run(&["getStr", "-n", MY_APP, "-m", "entry", "-u", "100", "-i", "16777217"])
        .await;
    assert_eq!(output.output, "Entry ability");

    // label id defaults to 0, which no module declares
    let output = service.run(&["getStr", "-n", MY_APP, "-m", "entry"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert_eq!(output.output, "error: failed to get label \n");
}

#[tokio::test]
async fn test_get_icon() {
    let service = common::start().await;

    let output = service
        .run(&["getIcon", "-n", MY_APP, "-m", "entry", "-i", "16777220"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk");

    let output = service
        .run(&["getIcon", "-n", MY_APP, "-m", "entry", "-d", "320", "-i", "16777220"])
        .await;
    assert_eq!(output.output, "iVBORw0KGgoAAAANSUhEUgAAAAIAAAACCAYAAABytg0kAAAAFklEQVR42mNk");

    let output = service
        .run(&["getIcon", "-n", MY_APP, "-m", "entry", "-i", "1"])
        .await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert_eq!(output.output, "error: failed to get icon \n");
}

const MY_APP_PROXY_DATA: &str = r#"[
    {
        "uri": "datashareproxy://com.example.myapplication/entry/config",
        "requiredReadPermission": "ohos.permission.GET_BUNDLE_INFO",
        "requiredWritePermission": "ohos.permission.GET_BUNDLE_INFO",
        "metadata": {
            "name": "dataProperties",
            "value": "",
            "resource": "$profile:datashare"
        }
    }
]
"#;

#[tokio::test]
async fn test_proxy_data_infos() {
    let service = common::start().await;

    let output = service.run(&["getProxyDataInfos", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, MY_APP_PROXY_DATA);

    let output = service
        .run(&["getProxyDataInfos", "-n", "com.example.notes"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_NO_PROXY_DATA);
    assert_eq!(
        output.output,
        format!("get proxyData failed errCode is {}\n", ERR_BUNDLE_MANAGER_NO_PROXY_DATA)
    );

    let output = service.run(&["getAllProxyDataInfos"]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, MY_APP_PROXY_DATA);

    let output = service.run(&["getAllProxyDataInfos", "-u", "-1"]).await;
    assert_ne!(output.code, ERR_OK);
    assert!(output
        .output
        .starts_with("get proxyData failed errCode is "));
}

#[tokio::test]
async fn test_ext_name_or_mime_lifecycle() {
    let service = common::start().await;
    let target = ["-n", MY_APP, "-m", "entry", "-a", "EntryAbility"];

    let set: Vec<&str> = ["setExtNameOrMimeToApp"]
        .iter()
        .chain(&target)
        .chain(&["-e", ".txt"])
        .copied()
        .collect();
    let output = service.run(&set).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "SetExtNameOrMIMEToApp succeeded,");

    let del: Vec<&str> = ["delExtNameOrMimeToApp"]
        .iter()
        .chain(&target)
        .chain(&["-e", ".txt"])
        .copied()
        .collect();
    let output = service.run(&del).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "DelExtNameOrMIMEToApp succeeded");

    let output = service.run(&del).await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR);
    assert_eq!(
        output.output,
        format!(
            "DelExtNameOrMIMEToApp failed, errCode is {}\n",
            ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR
        )
    );

    // neither an extension nor a MIME type
    let set: Vec<&str> = ["setExtNameOrMimeToApp"]
        .iter()
        .chain(&target)
        .copied()
        .collect();
    let output = service.run(&set).await;
    assert_eq!(
        output.output,
        format!(
            "SetExtNameOrMIMEToApp failed, errCode is {}\n",
            ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR
        )
    );
}

#[tokio::test]
async fn test_running_rules_lifecycle() {
    let service = common::start().await;
    let rule = format!("appId:{},controlMessage:blocked by policy", MY_APP_ID);

    let output = service.run(&["addAppRunningRule", "-c", &rule]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppRunningControlRule", "-u", "100"]).await;
    assert_eq!(output.output, format!("appId : {}; \n", MY_APP_ID));

    let output = service
        .run(&["getAppRunningControlRuleResult", "-n", MY_APP])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "message:blocked by policy\ncontrolWant: nullptr \n");

    let output = service.run(&["deleteAppRunningRule", "-c", &rule]).await;
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppRunningControlRule", "-u", "100"]).await;
    assert_eq!(output.output, "appId : \n");

    let output = service
        .run(&["addAppRunningRule", "-c", "appId:a,controlMessage:m;appId:b,controlMessage:m"])
        .await;
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppRunningControlRule", "-u", "100"]).await;
    assert_eq!(output.output, "appId : a; b; \n");

    let output = service.run(&["cleanAppRunningRule", "-u", "100"]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "0\n");

    let output = service.run(&["getAppRunningControlRule", "-u", "100"]).await;
    assert_eq!(output.output, "appId : \n");
}

#[tokio::test]
async fn test_running_rules_failures() {
    let service = common::start().await;

    let output = service.run(&["addAppRunningRule", "-c", "appId:a"]).await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert!(output.output.contains("--control-rule"));

    let rule = "appId:a,controlMessage:m";
    let output = service
        .run(&["addAppRunningRule", "-c", rule, "-e", "1000"])
        .await;
    assert_eq!(output.code, ERR_APP_CONTROL_PERMISSION_DENIED);
    assert_eq!(output.output, "error: failed to add rule \n");

    let output = service
        .run(&["deleteAppRunningRule", "-c", rule, "-e", "1000"])
        .await;
    assert_eq!(output.output, "error: failed to delete rule \n");

    let output = service
        .run(&["cleanAppRunningRule", "-u", "100", "-e", "1000"])
        .await;
    assert_eq!(output.output, "error: failed to delete rule \n");

    let output = service
        .run(&["getAppRunningControlRule", "-u", "100", "-e", "1000"])
        .await;
    assert_eq!(output.code, ERR_APP_CONTROL_PERMISSION_DENIED);
    assert_eq!(output.output, "error: failed to get rule \n");
}

#[tokio::test]
async fn test_app_provision_info() {
    let service = common::start().await;

    let output = service.run(&["getAppProvisionInfo", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(
        output.output,
        "get appProvisionInfo successfully\n\
         {\n\
         \x20   versionCode: 1\n\
         \x20   versionName: 1.0\n\
         \x20   uuid: 8ea4d6f6-1d7f-4d44-8c6b-b2b3f9ab0e1a\n\
         \x20   type: debug\n\
         \x20   appDistributionType: app_gallery\n\
         \x20   developerId: 6917563184917000001\n\
         \x20   certificate: -----BEGIN CERTIFICATE-----\n\
         \x20   apl: normal\n\
         \x20   issuer: pki_internal\n\
         \x20   validity: {\n\
         \x20       notBefore: 1695090000\n\
         \x20       notAfter: 2010450000\n\
         \x20   }\n\
         \x20   appServiceCapabilities: \n\
         }\n"
    );

    let output = service
        .run(&["getAppProvisionInfo", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(
        output.output,
        format!("get appProvisionInfo failed\nerrCode is {}\n", ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST)
    );
}

#[tokio::test]
async fn test_distributed_bundle_name() {
    let service = common::start().await;

    let output = service
        .run(&["getDistributedBundleName", "-n", "2a4c6e8f0b1d3f5a7c9e", "-a", "537100002"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "get distributedBundleName successfully\n\ncom.example.notes\n\n");

    let output = service
        .run(&["getDistributedBundleName", "-n", "ffffffffffffffffffff", "-a", "1"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "get distributedBundleName successfully\n\nno match found \n\n");

    let output = service
        .run(&["getDistributedBundleName", "-n", "2a4c6e8f0b1d3f5a7c9e", "-a", "0"])
        .await;
    assert_eq!(output.code, ERR_INVALID_VALUE);
    assert!(output.output.contains("--access-token-id"));
}

#[tokio::test]
async fn test_ability_by_continue_type() {
    let service = common::start().await;

    let output = service
        .run(&["queryAbilityInfoByContinueType", "-n", MY_APP, "-c", "continue_entry"])
        .await;
    assert_eq!(output.code, ERR_OK);
    let expected = "{\n    \"name\": \"EntryAbility\",\n    \"bundleName\": \"com.example.myapplication\",\n";
    assert!(output.output.starts_with(expected));
    assert!(output.output.ends_with("}\n"));

    let output = service
        .run(&["queryAbilityInfoByContinueType", "-n", MY_APP, "-c", "continue_other"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST);
    assert_eq!(output.output, "queryAbilityInfoByContinueType failed\n");
}

#[tokio::test]
async fn test_uninstalled_bundle_info() {
    let service = common::start().await;

    let output = service
        .run(&["getUninstalledBundleInfo", "-n", "com.example.notes"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(output.output, "getUninstalledBundleInfo failed\n");

    let output = service
        .run(&["uninstallPreInstallBundle", "-n", "com.example.notes"])
        .await;
    assert_eq!(output.code, ERR_OK);

    let output = service
        .run(&["getUninstalledBundleInfo", "-n", "com.example.notes"])
        .await;
    assert_eq!(output.code, ERR_OK);
    assert!(output
        .output
        .starts_with("{\n    \"name\": \"com.example.notes\",\n"));
    assert!(output.output.ends_with("}\n"));
}

#[tokio::test]
async fn test_data_group_infos() {
    let service = common::start().await;

    let output = service.run(&["queryDataGroupInfos", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(
        output.output,
        "queryDataGroupInfos successfully\n\
         dataGroupInfos:\n\
         {\n\
         \x20    [ dataGroupId = group.example.shared, uuid = 2d5f6a1b-3c4e-4f7a-8b9c-0d1e2f3a4b5c, \
         uid = 20010001, gid = 20010001, userId = 100]\n\
         }\n"
    );

    let output = service
        .run(&["queryDataGroupInfos", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(output.output, "queryDataGroupInfos failed\n");
}

#[tokio::test]
async fn test_asset_access_groups() {
    let service = common::start().await;

    let output = service.run(&["getAssetAccessGroups", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(
        output.output,
        "getAssetAccessGroups successfully\ncom.example.group1\ncom.example.group2\n"
    );

    let output = service
        .run(&["getAssetAccessGroups", "-n", "com.example.unknown"])
        .await;
    assert_eq!(
        output.output,
        format!("getAssetAccessGroups failed\nerrCode is {}\n", ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST)
    );
}

#[tokio::test]
async fn test_compatible_device_type() {
    let service = common::start().await;

    let output = service.run(&["getCompatibleDeviceType", "-n", MY_APP]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "getCompatibleDeviceType successfully\ndeviceType: phone\n");

    let output = service
        .run(&["getCompatibleDeviceType", "-n", "com.example.unknown"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(
        output.output,
        format!(
            "getCompatibleDeviceType failed\nerrCode is {}\n",
            ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST
        )
    );
}

#[tokio::test]
async fn test_bundle_name_by_app_id() {
    let service = common::start().await;

    let output = service.run(&["getBundleNameByAppId", "-a", MY_APP_ID]).await;
    assert_eq!(output.code, ERR_OK);
    assert_eq!(output.output, "getBundleNameByAppId is ok \ncom.example.myapplication\n");

    let output = service
        .run(&["getBundleNameByAppId", "-a", "com.example.unknown_0000"])
        .await;
    assert_eq!(output.code, ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST);
    assert_eq!(
        output.output,
        format!(
            "error: failed to getBundleNameByAppId \nerrCode is {}\n",
            ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST
        )
    );
}
