//! CLI command and subcommand definitions

use bundle_core::{DEFAULT_USER_ID, EDM_UID, FOUNDATION_UID};
use clap::{Args, Parser, Subcommand};

use crate::parse::{strict_i32, strict_u32};

/// Bundle manager test tool
#[derive(Parser, Debug)]
#[command(name = "bundle_test_tool")]
#[command(version, about = "Bundle manager test tool", long_about = None)]
pub struct Cli {
    /// Service URL (overrides config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Command text, as printed by the tool
    Text,
    /// JSON envelope with the result code
    Json,
}

impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crate::format::OutputFormat::Text,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Tool(ToolCommands),

    /// Check service connectivity and health
    Health,

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Set a configuration value
    Set {
        /// One of server_url, output_format, verbose, timeout
        key: String,
        value: String,
    },

    /// Reset the configuration file to defaults
    Reset,
}

/// Commands calling the bundle manager
#[derive(Subcommand, Debug)]
#[command(rename_all = "camelCase")]
pub enum ToolCommands {
    /// Check whether an ability may be installed
    Check(CheckArgs),
    /// Set module isRemovable by bundle name and module name
    Setrm(SetRemovableArgs),
    /// Obtain the value of isRemovable by bundle name and module name
    Getrm(ModuleArgs),
    /// Install a sandbox app
    InstallSandbox(InstallSandboxArgs),
    /// Uninstall a sandbox app
    UninstallSandbox(SandboxArgs),
    /// Dump the bundle info of a sandbox app
    DumpSandbox(SandboxArgs),
    /// Uninstall a preinstalled bundle or one of its modules
    UninstallPreInstallBundle(UninstallPreInstallArgs),
    /// Obtain a label string by resource id
    GetStr(GetStringArgs),
    /// Obtain an icon by resource id and density
    GetIcon(GetIconArgs),
    /// Add app install control rules
    AddAppInstallRule(InstallRuleArgs),
    /// Obtain app install control rules
    GetAppInstallRule(InstallRuleTypeArgs),
    /// Delete app install control rules
    DeleteAppInstallRule(InstallRuleArgs),
    /// Clean app install control rules
    CleanAppInstallRule(InstallRuleTypeArgs),
    /// Add app running control rules
    AddAppRunningRule(RunningRuleArgs),
    /// Delete app running control rules
    DeleteAppRunningRule(RunningRuleArgs),
    /// Clean app running control rules
    CleanAppRunningRule(ControlUserArgs),
    /// Obtain the app ids of all app running control rules
    GetAppRunningControlRule(ControlUserArgs),
    /// Obtain the app running control rule of a bundle
    GetAppRunningControlRuleResult(RunningRuleResultArgs),
    /// Clean bundle caches until a given size is freed
    CleanBundleCacheFilesAutomatic(CacheSizeArgs),
    /// Obtain the continue bundle name list
    GetContinueBundleName(ContinueBundleNameArgs),
    /// Deploy quick fix patches
    DeployQuickFix(DeployQuickFixArgs),
    /// Switch the quick fix of a bundle on or off
    SwitchQuickFix(SwitchQuickFixArgs),
    /// Delete the quick fix of a bundle
    DeleteQuickFix(BundleNameArgs),
    /// Set the debug mode of the bundle manager
    SetDebugMode(DebugModeArgs),
    /// Obtain the storage stats of a bundle
    GetBundleStats(BundleStatsArgs),
    /// Obtain the storage stats of several bundles
    BatchGetBundleStats(BatchBundleStatsArgs),
    /// Obtain the provision info of a bundle
    GetAppProvisionInfo(BundleUserArgs),
    /// Obtain the distributed bundle name
    GetDistributedBundleName(DistributedBundleNameArgs),
    /// Register and unregister the bundle event callback
    #[command(name = "eventCB")]
    EventCallback(EventCallbackArgs),
    /// Reset the AOT compile status of a module
    #[command(name = "resetAOTCompileStatus")]
    ResetAotCompileStatus(ResetAotArgs),
    /// Publish the charge idle mode changed common event
    SendCommonEvent,
    /// Obtain the proxy data of a module
    GetProxyDataInfos(ProxyDataArgs),
    /// Obtain the proxy data of all bundles
    GetAllProxyDataInfos(UserArgs),
    /// Bind an ext name or mime type to an ability
    SetExtNameOrMimeToApp(ExtNameOrMimeArgs),
    /// Unbind an ext name or mime type from an ability
    DelExtNameOrMimeToApp(ExtNameOrMimeArgs),
    /// Obtain the data group infos of a bundle
    QueryDataGroupInfos(BundleUserArgs),
    /// Obtain the data group dir path by data group id
    GetGroupDir(GroupDirArgs),
    /// Obtain a json profile of a module
    GetJsonProfile(JsonProfileArgs),
    /// Obtain the bundle info of an uninstalled bundle
    GetUninstalledBundleInfo(BundleNameArgs),
    /// Obtain the odid of the bundle owning a uid
    GetOdid(UidArgs),
    /// Obtain the uid of a bundle
    GetUidByBundleName(UidByBundleNameArgs),
    /// Query the skill uris of abilities matching a want
    ImplicitQuerySkillUriInfo(ImplicitQueryArgs),
    /// Obtain the ability info by continue type
    QueryAbilityInfoByContinueType(ContinueTypeArgs),
    /// Update the encrypted status of an app
    UpdateAppEncryptedStatus(EncryptedStatusArgs),
    /// Obtain the data dir of a bundle and app index
    GetDirByBundleNameAndAppIndex(AppIndexArgs),
    /// Obtain the data dirs of all bundles
    GetAllBundleDirs(AllBundleDirsArgs),
    /// Obtain the cache size of all bundles
    GetAllBundleCacheStat(CacheUidArgs),
    /// Clean the caches of all bundles
    CleanAllBundleCache(CacheUidArgs),
    /// Check whether a bundle is installed
    IsBundleInstalled(BundleInstalledArgs),
    /// Obtain the compatible device type of a bundle
    GetCompatibleDeviceType(BundleNameArgs),
    /// Obtain bundle identities by uids
    GetSimpleAppInfoForUid(SimpleAppInfoArgs),
    /// Obtain a bundle name by app id
    GetBundleNameByAppId(AppIdArgs),
    /// Obtain the asset access groups of a bundle
    GetAssetAccessGroups(BundleNameArgs),
    /// Obtain the app identifier and app index by access token id
    GetAppIdentifierAndAppIndex(AccessTokenArgs),
    /// Set the allowed app distribution types
    SetAppDistributionTypes(DistributionTypesArgs),
    /// Obtain the bundle names of a uid through the extension
    GetBundleNamesForUidExt(UidExtArgs),
}

impl ToolCommands {
    /// Name the command is invoked with
    pub fn name(&self) -> &'static str {
        match self {
            ToolCommands::Check(_) => "check",
            ToolCommands::Setrm(_) => "setrm",
            ToolCommands::Getrm(_) => "getrm",
            ToolCommands::InstallSandbox(_) => "installSandbox",
            ToolCommands::UninstallSandbox(_) => "uninstallSandbox",
            ToolCommands::DumpSandbox(_) => "dumpSandbox",
            ToolCommands::UninstallPreInstallBundle(_) => "uninstallPreInstallBundle",
            ToolCommands::GetStr(_) => "getStr",
            ToolCommands::GetIcon(_) => "getIcon",
            ToolCommands::AddAppInstallRule(_) => "addAppInstallRule",
            ToolCommands::GetAppInstallRule(_) => "getAppInstallRule",
            ToolCommands::DeleteAppInstallRule(_) => "deleteAppInstallRule",
            ToolCommands::CleanAppInstallRule(_) => "cleanAppInstallRule",
            ToolCommands::AddAppRunningRule(_) => "addAppRunningRule",
            ToolCommands::DeleteAppRunningRule(_) => "deleteAppRunningRule",
            ToolCommands::CleanAppRunningRule(_) => "cleanAppRunningRule",
            ToolCommands::GetAppRunningControlRule(_) => "getAppRunningControlRule",
            ToolCommands::GetAppRunningControlRuleResult(_) => "getAppRunningControlRuleResult",
            ToolCommands::CleanBundleCacheFilesAutomatic(_) => "cleanBundleCacheFilesAutomatic",
            ToolCommands::GetContinueBundleName(_) => "getContinueBundleName",
            ToolCommands::DeployQuickFix(_) => "deployQuickFix",
            ToolCommands::SwitchQuickFix(_) => "switchQuickFix",
            ToolCommands::DeleteQuickFix(_) => "deleteQuickFix",
            ToolCommands::SetDebugMode(_) => "setDebugMode",
            ToolCommands::GetBundleStats(_) => "getBundleStats",
            ToolCommands::BatchGetBundleStats(_) => "batchGetBundleStats",
            ToolCommands::GetAppProvisionInfo(_) => "getAppProvisionInfo",
            ToolCommands::GetDistributedBundleName(_) => "getDistributedBundleName",
            ToolCommands::EventCallback(_) => "eventCB",
            ToolCommands::ResetAotCompileStatus(_) => "resetAOTCompileStatus",
            ToolCommands::SendCommonEvent => "sendCommonEvent",
            ToolCommands::GetProxyDataInfos(_) => "getProxyDataInfos",
            ToolCommands::GetAllProxyDataInfos(_) => "getAllProxyDataInfos",
            ToolCommands::SetExtNameOrMimeToApp(_) => "setExtNameOrMimeToApp",
            ToolCommands::DelExtNameOrMimeToApp(_) => "delExtNameOrMimeToApp",
            ToolCommands::QueryDataGroupInfos(_) => "queryDataGroupInfos",
            ToolCommands::GetGroupDir(_) => "getGroupDir",
            ToolCommands::GetJsonProfile(_) => "getJsonProfile",
            ToolCommands::GetUninstalledBundleInfo(_) => "getUninstalledBundleInfo",
            ToolCommands::GetOdid(_) => "getOdid",
            ToolCommands::GetUidByBundleName(_) => "getUidByBundleName",
            ToolCommands::ImplicitQuerySkillUriInfo(_) => "implicitQuerySkillUriInfo",
            ToolCommands::QueryAbilityInfoByContinueType(_) => "queryAbilityInfoByContinueType",
            ToolCommands::UpdateAppEncryptedStatus(_) => "updateAppEncryptedStatus",
            ToolCommands::GetDirByBundleNameAndAppIndex(_) => "getDirByBundleNameAndAppIndex",
            ToolCommands::GetAllBundleDirs(_) => "getAllBundleDirs",
            ToolCommands::GetAllBundleCacheStat(_) => "getAllBundleCacheStat",
            ToolCommands::CleanAllBundleCache(_) => "cleanAllBundleCache",
            ToolCommands::IsBundleInstalled(_) => "isBundleInstalled",
            ToolCommands::GetCompatibleDeviceType(_) => "getCompatibleDeviceType",
            ToolCommands::GetSimpleAppInfoForUid(_) => "getSimpleAppInfoForUid",
            ToolCommands::GetBundleNameByAppId(_) => "getBundleNameByAppId",
            ToolCommands::GetAssetAccessGroups(_) => "getAssetAccessGroups",
            ToolCommands::GetAppIdentifierAndAppIndex(_) => "getAppIdentifierAndAppIndex",
            ToolCommands::SetAppDistributionTypes(_) => "setAppDistributionTypes",
            ToolCommands::GetBundleNamesForUidExt(_) => "getBundleNamesForUidExt",
        }
    }
}

// Abilities, modules and resources

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct CheckArgs {
    /// Bundle name of the ability
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// Module name of the ability
    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    /// Ability name
    #[arg(short = 'a', long)]
    pub ability_name: Option<String>,

    /// Device id
    #[arg(short = 'd', long)]
    pub device_id: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct SetRemovableArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    /// 0 for not removable, anything else for removable
    #[arg(
        short = 'i',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub is_removable: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ModuleArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct GetStringArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    /// Label resource id
    #[arg(short = 'i', long, default_value_t = 0, value_parser = strict_u32)]
    pub id: u32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct GetIconArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    /// Screen density of the icon
    #[arg(short = 'd', long, default_value_t = 0, value_parser = strict_u32)]
    pub density: u32,

    /// Icon resource id
    #[arg(short = 'i', long, default_value_t = 0, value_parser = strict_u32)]
    pub id: u32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ImplicitQueryArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// Want action
    #[arg(short = 'a', long)]
    pub action: Option<String>,

    /// Want entity
    #[arg(short = 'e', long)]
    pub entity: Option<String>,

    /// Want uri
    #[arg(short = 'u', long, default_value = "")]
    pub uri: String,

    /// Want mime type
    #[arg(short = 't', long = "type", default_value = "")]
    pub mime_type: String,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ContinueTypeArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'c', long = "continueType")]
    pub continue_type: Option<String>,

    #[arg(
        short = 'u',
        long = "userId",
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

// Sandbox and preinstalled bundles

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct InstallSandboxArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// DLP type of the sandbox app
    #[arg(
        short = 'd',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub dlp_type: i32,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct SandboxArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'a', long, value_parser = strict_i32, allow_negative_numbers = true)]
    pub app_index: Option<i32>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct UninstallPreInstallArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// Only uninstall this module
    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    /// Greater than 0 for a forced uninstall
    #[arg(
        short = 'f',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub forced: i32,
}

// App control rules

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct InstallRuleArgs {
    /// Comma separated app ids
    #[arg(short = 'a', long)]
    pub app_id: Option<String>,

    #[arg(
        short = 't',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub control_rule_type: i32,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    /// Effective uid of the caller
    #[arg(
        short = 'e',
        long,
        default_value_t = EDM_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub euid: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct InstallRuleTypeArgs {
    #[arg(
        short = 't',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub control_rule_type: i32,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'e',
        long,
        default_value_t = EDM_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub euid: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct RunningRuleArgs {
    /// Rules as `appId:x,controlMessage:m;...`
    #[arg(short = 'c', long)]
    pub control_rule: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'e',
        long,
        default_value_t = EDM_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub euid: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ControlUserArgs {
    #[arg(short = 'u', long, value_parser = strict_i32, allow_negative_numbers = true)]
    pub user_id: Option<i32>,

    #[arg(
        short = 'e',
        long,
        default_value_t = EDM_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub euid: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct RunningRuleResultArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'e',
        long,
        default_value_t = EDM_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub euid: i32,
}

// Cache

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct CacheSizeArgs {
    /// Bytes to free, a positive decimal
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub cache_size: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CacheUidArgs {
    /// Uid to act as
    #[arg(short = 'u', long = "uid", value_parser = strict_i32, allow_negative_numbers = true)]
    pub uid: Option<i32>,
}

#[derive(Args, Debug, Clone)]
pub struct ContinueBundleNameArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'u', long = "userId", value_parser = strict_i32, allow_negative_numbers = true)]
    pub user_id: Option<i32>,
}

// Quick fix and debug mode

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct DeployQuickFixArgs {
    /// Patch file or directory, may be repeated
    #[arg(short = 'p', long = "patch-path")]
    pub patch_paths: Vec<String>,

    /// More patch paths
    #[arg(trailing_var_arg = true)]
    pub paths: Vec<String>,

    /// 1 to deploy in debug mode
    #[arg(
        short = 'd',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub debug: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct SwitchQuickFixArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// 1 to enable, 0 to disable
    #[arg(short = 'e', long, value_parser = strict_i32, allow_negative_numbers = true)]
    pub enable: Option<i32>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct DebugModeArgs {
    /// 1 to enable, 0 to disable
    #[arg(short = 'e', long, value_parser = strict_i32, allow_negative_numbers = true)]
    pub enable: Option<i32>,
}

// Bundle queries

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct BundleNameArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct BundleUserArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct BundleStatsArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'a',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub app_index: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct BatchBundleStatsArgs {
    /// Comma separated bundle names
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct DistributedBundleNameArgs {
    #[arg(short = 'n', long)]
    pub network_id: Option<String>,

    #[arg(short = 'a', long, value_parser = strict_u32)]
    pub access_token_id: Option<u32>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct UidByBundleNameArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'a',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub app_index: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct EncryptedStatusArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    /// 1 when encrypted files exist
    #[arg(
        short = 'e',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub existed: i32,

    #[arg(
        short = 'a',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub app_index: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct AppIndexArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'a',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub app_index: i32,
}

#[derive(Args, Debug, Clone)]
pub struct AllBundleDirsArgs {
    #[arg(
        short = 'u',
        long = "userId",
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct BundleInstalledArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,

    #[arg(
        short = 'a',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub app_index: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct SimpleAppInfoArgs {
    /// Comma separated uids
    #[arg(short = 'u', long = "uid", allow_hyphen_values = true)]
    pub uids: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct AppIdArgs {
    #[arg(short = 'a', long)]
    pub app_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct AccessTokenArgs {
    #[arg(short = 'a', long, value_parser = strict_u32)]
    pub access_token_id: Option<u32>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct DistributionTypesArgs {
    /// Comma separated types, each 1..=6
    #[arg(short = 'a', long, allow_hyphen_values = true)]
    pub app_distribution_types: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct UidExtArgs {
    #[arg(short = 'u', long = "uid", allow_hyphen_values = true)]
    pub uid: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UidArgs {
    /// Uid to act as
    #[arg(
        short = 'u',
        long = "uid",
        default_value_t = -1,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub uid: i32,
}

// Events

#[derive(Args, Debug, Clone)]
pub struct EventCallbackArgs {
    /// Only unregister the callback
    #[arg(short = 'o', long = "onlyUnregister")]
    pub only_unregister: bool,

    /// Uid to act as
    #[arg(
        short = 'u',
        long = "uid",
        default_value_t = FOUNDATION_UID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub uid: i32,

    /// Seconds to wait after each step
    #[arg(long, default_value_t = 20)]
    pub sleep_seconds: u64,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ResetAotArgs {
    #[arg(short = 'b', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    #[arg(
        short = 't',
        long,
        default_value_t = 0,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub trigger_mode: i32,

    /// Uid to act as; -1 resolves the uid of the bundle
    #[arg(
        short = 'u',
        long = "uid",
        default_value_t = -1,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub uid: i32,
}

// Proxy data, ext names and profiles

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ProxyDataArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long, default_value = "")]
    pub module_name: String,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
pub struct UserArgs {
    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct ExtNameOrMimeArgs {
    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long)]
    pub module_name: Option<String>,

    #[arg(short = 'a', long)]
    pub ability_name: Option<String>,

    #[arg(short = 'e', long, default_value = "")]
    pub ext_name: String,

    #[arg(short = 't', long, default_value = "")]
    pub mime_type: String,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct GroupDirArgs {
    #[arg(short = 'd', long)]
    pub data_group_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[command(arg_required_else_help = true)]
pub struct JsonProfileArgs {
    #[arg(short = 'p', long, value_parser = strict_i32, allow_negative_numbers = true)]
    pub profile_type: Option<i32>,

    #[arg(short = 'n', long)]
    pub bundle_name: Option<String>,

    #[arg(short = 'm', long, default_value = "")]
    pub module_name: String,

    #[arg(
        short = 'u',
        long,
        default_value_t = DEFAULT_USER_ID,
        value_parser = strict_i32,
        allow_negative_numbers = true
    )]
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_names_match_invocation() {
        let cli = Cli::try_parse_from(["bundle_test_tool", "getrm", "-n", "a", "-m", "b"]).unwrap();
        match cli.command {
            Commands::Tool(command) => assert_eq!(command.name(), "getrm"),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["bundle_test_tool", "eventCB", "-o"]).unwrap();
        match cli.command {
            Commands::Tool(command @ ToolCommands::EventCallback(_)) => {
                assert_eq!(command.name(), "eventCB")
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "bundle_test_tool",
            "resetAOTCompileStatus",
            "-b",
            "com.example.notes",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tool(ToolCommands::ResetAotCompileStatus(_))
        ));
    }

    #[test]
    fn test_every_tool_command_is_a_subcommand() {
        let cli = Cli::command();
        for name in [
            "check",
            "setrm",
            "installSandbox",
            "getStr",
            "addAppInstallRule",
            "getAppRunningControlRuleResult",
            "cleanBundleCacheFilesAutomatic",
            "deployQuickFix",
            "batchGetBundleStats",
            "sendCommonEvent",
            "setExtNameOrMimeToApp",
            "implicitQuerySkillUriInfo",
            "getBundleNamesForUidExt",
        ] {
            assert!(cli.find_subcommand(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bundle_test_tool", "addAppInstallRule", "-a", "id1"])
            .unwrap();
        match cli.command {
            Commands::Tool(ToolCommands::AddAppInstallRule(args)) => {
                assert_eq!(args.user_id, 100);
                assert_eq!(args.euid, 3057);
                assert_eq!(args.control_rule_type, 0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_strict_integer_options() {
        let err = Cli::try_parse_from(["bundle_test_tool", "getBundleStats", "-n", "a", "-u", "x"])
            .unwrap_err();
        assert!(err.to_string().contains("option requires a correct value"));

        let cli =
            Cli::try_parse_from(["bundle_test_tool", "getOdid", "-u", "-1"]).unwrap();
        match cli.command {
            Commands::Tool(ToolCommands::GetOdid(args)) => assert_eq!(args.uid, -1),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_deploy_collects_every_path() {
        let cli = Cli::try_parse_from([
            "bundle_test_tool",
            "deployQuickFix",
            "-p",
            "/a.hqf",
            "-d",
            "1",
            "/b.hqf",
            "/c.hqf",
        ])
        .unwrap();
        match cli.command {
            Commands::Tool(ToolCommands::DeployQuickFix(args)) => {
                assert_eq!(args.patch_paths, vec!["/a.hqf"]);
                assert_eq!(args.paths, vec!["/b.hqf", "/c.hqf"]);
                assert_eq!(args.debug, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_required_options_print_help() {
        let err = Cli::try_parse_from(["bundle_test_tool", "getStr"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
    }
}
