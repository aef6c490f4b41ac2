//! In-memory bundle registry
//!
//! Holds the installed bundles seeded from fixtures together with every piece
//! of state the service records on behalf of callers: install and running
//! control rules, quick fix patches, the debug mode switch, event callbacks,
//! sandbox clones and distribution types. All operations are synchronous and
//! are called with the registry lock held.

mod fixtures;

pub use fixtures::{
    BundleFixture, Fixtures, ModuleFixture, ProfileFixture, RemoteFixture, ResourceFixture,
};

use bundle_core::codes::*;
use bundle_core::api::AppIdentifierResponse;
use bundle_core::{
    app_uid, AbilityInfo, AppDistributionType, AppProvisionInfo,
    AppRunningControlRule, AppRunningControlRuleResult, ApplicationInfo, BundleDir, BundleError,
    BundleInfo, BundleStorageStats, DataGroupInfo, DeleteQuickFixResult, DeployQuickFixResult,
    InstallParam, ProxyData, QuickFixResult, QuickFixType, Result, SimpleAppInfo, SkillUri,
    SwitchQuickFixResult, UninstallParam, Want, BASE_APP_UID, CODE_PROTECT_UID, DEFAULT_USER_ID,
    EDM_UID, INITIAL_SANDBOX_APP_INDEX,
};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Directory quick fix files are copied into
pub const QUICK_FIX_TMP_DIR: &str =
    "/data/service/el1/public/bms/bundle_manager_service/quick_fix/tmp";

/// Root of data group directories
pub const GROUP_DIR_ROOT: &str = "/data/storage/el2/group";

/// Highest clone index accepted when resolving bundle directories
const MAX_CLONE_APP_INDEX: i32 = 5;

const INSTALL_RULE_TYPES: std::ops::RangeInclusive<i32> = 0..=2;

/// An installed bundle and the state attached to it at runtime
#[derive(Debug, Clone)]
pub struct BundleRecord {
    pub fixture: BundleFixture,
    /// Sandbox app index -> owning user
    pub sandboxes: BTreeMap<i32, i32>,
    /// App index -> encrypted
    pub encrypted: BTreeMap<i32, bool>,
    pub ext_mimes: BTreeSet<ExtMimeEntry>,
    pub install_time: i64,
    pub update_time: i64,
}

/// Extension name or MIME type bound to an ability
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExtMimeEntry {
    pub module_name: String,
    pub ability_name: String,
    pub ext_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
struct PatchRecord {
    patch_type: QuickFixType,
    enabled: bool,
    patch_version_code: u32,
    module_names: Vec<String>,
}

impl BundleRecord {
    fn new(fixture: BundleFixture) -> Self {
        let now = now_millis();
        Self {
            fixture,
            sandboxes: BTreeMap::new(),
            encrypted: BTreeMap::new(),
            ext_mimes: BTreeSet::new(),
            install_time: now,
            update_time: now,
        }
    }

    fn name(&self) -> &str {
        &self.fixture.name
    }

    fn installed_for(&self, user_id: i32) -> bool {
        self.fixture.users.contains(&user_id)
    }

    fn uid_for(&self, user_id: i32) -> i32 {
        app_uid(user_id, self.fixture.uid_index)
    }

    /// The user whose uid equals `uid`, if any.
    fn user_of_uid(&self, uid: i32) -> Option<i32> {
        self.fixture
            .users
            .iter()
            .copied()
            .find(|user| self.uid_for(*user) == uid)
    }

    fn module(&self, module_name: &str) -> Result<&ModuleFixture> {
        self.fixture
            .modules
            .iter()
            .find(|m| m.name == module_name)
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_MODULE_NOT_EXIST,
                    format!("module {} not exist in {}", module_name, self.name()),
                )
            })
    }

    fn abilities(&self) -> impl Iterator<Item = &AbilityInfo> {
        self.fixture.modules.iter().flat_map(|m| m.abilities.iter())
    }

    fn bundle_info(&self, user_id: i32, app_index: i32) -> BundleInfo {
        let fixture = &self.fixture;
        let uid = self.uid_for(user_id);
        let debug = fixture.provision.provision_type == "debug";

        BundleInfo {
            name: fixture.name.clone(),
            version_code: fixture.version_code,
            version_name: fixture.version_name.clone(),
            uid,
            app_id: fixture.app_id.clone(),
            app_index,
            install_time: self.install_time,
            update_time: self.update_time,
            entry_module_name: fixture
                .modules
                .first()
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            hap_module_names: fixture.modules.iter().map(|m| m.name.clone()).collect(),
            application_info: ApplicationInfo {
                name: fixture.name.clone(),
                bundle_name: fixture.name.clone(),
                uid,
                app_index,
                removable: fixture.removable,
                is_system_app: fixture.is_system_app,
                debug,
                app_distribution_type: fixture.provision.app_distribution_type.clone(),
                api_compatible_version: 12,
                asset_access_groups: fixture.asset_access_groups.clone(),
            },
        }
    }
}

/// Registry of installed bundles and recorded service state
#[derive(Debug)]
pub struct BundleRegistry {
    bundles: BTreeMap<String, BundleRecord>,
    uninstalled: BTreeMap<String, BundleRecord>,
    /// (rule type, user) -> app ids
    install_rules: BTreeMap<(i32, i32), BTreeSet<String>>,
    /// user -> app id -> control message
    running_rules: BTreeMap<i32, BTreeMap<String, String>>,
    patches: BTreeMap<String, PatchRecord>,
    copied_files: Vec<String>,
    debug_mode: bool,
    event_callbacks: BTreeSet<i32>,
    distribution_types: BTreeSet<AppDistributionType>,
    published_events: Vec<String>,
    next_sandbox_index: i32,
    next_stream_installer_id: u32,
    stream_installers: BTreeSet<u32>,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn service_error(code: ErrCode, message: impl Into<String>) -> BundleError {
    BundleError::Service {
        code,
        message: message.into(),
    }
}

fn generate_odid() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        rng.gen::<u32>(),
        rng.gen::<u16>(),
        rng.gen::<u16>(),
        rng.gen::<u16>(),
        rng.gen::<u64>() & 0xffff_ffff_ffff
    )
}

fn check_user(user_id: i32) -> Result<()> {
    if user_id < 0 {
        return Err(service_error(
            ERR_BUNDLE_MANAGER_INVALID_USER_ID,
            format!("invalid user id {}", user_id),
        ));
    }
    Ok(())
}

fn check_edm_caller(caller: i32) -> Result<()> {
    if caller != EDM_UID {
        return Err(service_error(
            ERR_APP_CONTROL_PERMISSION_DENIED,
            format!("caller {} may not change app control rules", caller),
        ));
    }
    Ok(())
}

fn check_system_caller(caller: i32) -> Result<()> {
    if caller >= BASE_APP_UID {
        return Err(service_error(
            ERR_BUNDLE_MANAGER_PERMISSION_DENIED,
            format!("caller {} is not a system process", caller),
        ));
    }
    Ok(())
}

fn mime_matches(pattern: &str, mime: &str) -> bool {
    if pattern == mime || pattern == "*/*" || mime == "*/*" {
        return true;
    }
    match (pattern.split_once('/'), mime.split_once('/')) {
        (Some((p_type, "*")), Some((m_type, _))) => p_type == m_type,
        (Some((p_type, _)), Some((m_type, "*"))) => p_type == m_type,
        _ => false,
    }
}

/// Split a uri into scheme, host and path.
fn split_uri(uri: &str) -> (&str, &str, &str) {
    let (scheme, rest) = match uri.split_once("://") {
        Some(parts) => parts,
        None => uri.split_once(':').unwrap_or((uri, "")),
    };
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    (scheme, host, path)
}

fn uri_matches(skill_uri: &SkillUri, want: &Want) -> bool {
    if !want.uri.is_empty() {
        let (scheme, host, path) = split_uri(&want.uri);
        if skill_uri.scheme != scheme {
            return false;
        }
        if !skill_uri.host.is_empty() && skill_uri.host != host {
            return false;
        }
        if !skill_uri.path.is_empty() && skill_uri.path != path {
            return false;
        }
        if !skill_uri.path_start_with.is_empty() && !path.starts_with(&skill_uri.path_start_with) {
            return false;
        }
    }
    if !want.mime_type.is_empty()
        && !skill_uri.mime_type.is_empty()
        && !mime_matches(&skill_uri.mime_type, &want.mime_type)
    {
        return false;
    }
    true
}

/// Match one ability against an implicit want, returning it with the
/// uris of the first matching skill.
fn match_ability(ability: &AbilityInfo, want: &Want) -> Option<AbilityInfo> {
    for skill in &ability.skills {
        if !want.action.is_empty() && !skill.actions.contains(&want.action) {
            continue;
        }
        if !want.entities.iter().all(|e| skill.entities.contains(e)) {
            continue;
        }

        let uris: Vec<SkillUri> = skill
            .uris
            .iter()
            .map(|uri| SkillUri {
                is_match: uri_matches(uri, want),
                ..uri.clone()
            })
            .collect();

        let needs_uri = !want.uri.is_empty() || !want.mime_type.is_empty();
        if needs_uri && !uris.iter().any(|u| u.is_match) {
            continue;
        }

        return Some(AbilityInfo {
            skill_uri: uris,
            ..ability.clone()
        });
    }
    None
}

impl BundleRegistry {
    /// Build a registry from a fixture set.
    pub fn new(fixtures: Fixtures) -> Self {
        let mut bundles = BTreeMap::new();
        for mut fixture in fixtures.bundles {
            if fixture.odid.is_empty() {
                fixture.odid = generate_odid();
            }
            debug!("Registering bundle {}", fixture.name);
            bundles.insert(fixture.name.clone(), BundleRecord::new(fixture));
        }

        info!("Bundle registry ready with {} bundles", bundles.len());

        Self {
            bundles,
            uninstalled: BTreeMap::new(),
            install_rules: BTreeMap::new(),
            running_rules: BTreeMap::new(),
            patches: BTreeMap::new(),
            copied_files: Vec::new(),
            debug_mode: false,
            event_callbacks: BTreeSet::new(),
            distribution_types: BTreeSet::new(),
            published_events: Vec::new(),
            next_sandbox_index: INITIAL_SANDBOX_APP_INDEX,
            next_stream_installer_id: 0,
            stream_installers: BTreeSet::new(),
        }
    }

    /// Registry seeded with the built-in fixtures.
    pub fn builtin() -> Self {
        Self::new(Fixtures::builtin())
    }

    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn published_events(&self) -> &[String] {
        &self.published_events
    }

    fn bundle(&self, bundle_name: &str) -> Result<&BundleRecord> {
        self.bundles.get(bundle_name).ok_or_else(|| {
            service_error(
                ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                format!("bundle {} not exist", bundle_name),
            )
        })
    }

    fn bundle_mut(&mut self, bundle_name: &str) -> Result<&mut BundleRecord> {
        self.bundles.get_mut(bundle_name).ok_or_else(|| {
            service_error(
                ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                format!("bundle {} not exist", bundle_name),
            )
        })
    }

    /// Installed bundle for a user, with user validation.
    fn bundle_for_user(&self, bundle_name: &str, user_id: i32) -> Result<&BundleRecord> {
        check_user(user_id)?;
        let record = self.bundle(bundle_name)?;
        if !record.installed_for(user_id) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                format!("bundle {} not installed for user {}", bundle_name, user_id),
            ));
        }
        Ok(record)
    }

    fn bundle_by_uid(&self, uid: i32) -> Option<(&BundleRecord, i32)> {
        self.bundles
            .values()
            .find_map(|record| record.user_of_uid(uid).map(|user| (record, user)))
    }

    // Abilities and modules

    pub fn check_ability_enable_install(&self, want: &Want, user_id: i32) -> Result<bool> {
        check_user(user_id)?;
        let element = &want.element;
        let Some(record) = self.bundles.get(&element.bundle_name) else {
            return Ok(false);
        };
        let Ok(module) = record.module(&element.module_name) else {
            return Ok(false);
        };
        Ok(module
            .abilities
            .iter()
            .any(|ability| ability.name == element.ability_name))
    }

    pub fn set_module_removable(
        &mut self,
        bundle_name: &str,
        module_name: &str,
        removable: bool,
    ) -> Result<bool> {
        let record = self.bundle_mut(bundle_name)?;
        let Some(module) = record
            .fixture
            .modules
            .iter_mut()
            .find(|m| m.name == module_name)
        else {
            return Ok(false);
        };
        module.removable = removable;
        info!("Module {} of {} removable set to {}", module_name, bundle_name, removable);
        Ok(true)
    }

    pub fn is_module_removable(&self, bundle_name: &str, module_name: &str) -> Result<bool> {
        Ok(self.bundle(bundle_name)?.module(module_name)?.removable)
    }

    /// Label string of a module resource, empty when unknown.
    pub fn string_by_id(
        &self,
        bundle_name: &str,
        module_name: &str,
        id: u32,
        user_id: i32,
    ) -> String {
        self.bundle_for_user(bundle_name, user_id)
            .and_then(|record| record.module(module_name))
            .ok()
            .and_then(|module| module.strings.iter().find(|s| s.id == id))
            .map(|s| s.value.clone())
            .unwrap_or_default()
    }

    /// Icon of a module resource at a density, falling back to the default
    /// density. Empty when unknown.
    pub fn icon_by_id(
        &self,
        bundle_name: &str,
        module_name: &str,
        id: u32,
        density: u32,
        user_id: i32,
    ) -> String {
        let Ok(module) = self
            .bundle_for_user(bundle_name, user_id)
            .and_then(|record| record.module(module_name))
        else {
            return String::new();
        };

        module
            .icons
            .iter()
            .find(|icon| icon.id == id && icon.density == density)
            .or_else(|| module.icons.iter().find(|icon| icon.id == id && icon.density == 0))
            .map(|icon| icon.value.clone())
            .unwrap_or_default()
    }

    pub fn continue_bundle_names(&self, bundle_name: &str, user_id: i32) -> Result<Vec<String>> {
        Ok(self
            .bundle_for_user(bundle_name, user_id)?
            .fixture
            .continue_bundle_names
            .clone())
    }

    pub fn proxy_data_infos(
        &self,
        bundle_name: &str,
        module_name: &str,
        user_id: i32,
    ) -> Result<Vec<ProxyData>> {
        let record = self.bundle_for_user(bundle_name, user_id)?;
        let datas: Vec<ProxyData> = if module_name.is_empty() {
            record
                .fixture
                .modules
                .iter()
                .flat_map(|m| m.proxy_datas.iter().cloned())
                .collect()
        } else {
            record.module(module_name)?.proxy_datas.clone()
        };

        if datas.is_empty() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_NO_PROXY_DATA,
                format!("no proxy data in {}", bundle_name),
            ));
        }
        Ok(datas)
    }

    pub fn all_proxy_data_infos(&self, user_id: i32) -> Result<Vec<ProxyData>> {
        check_user(user_id)?;
        Ok(self
            .bundles
            .values()
            .filter(|record| record.installed_for(user_id))
            .flat_map(|record| record.fixture.modules.iter())
            .flat_map(|m| m.proxy_datas.iter().cloned())
            .collect())
    }

    fn ext_mime_entry(
        &self,
        bundle_name: &str,
        module_name: &str,
        ability_name: &str,
        ext_name: &str,
        mime_type: &str,
    ) -> Result<ExtMimeEntry> {
        if ext_name.is_empty() && mime_type.is_empty() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR,
                "extension name and MIME type are both empty",
            ));
        }
        let module = self.bundle(bundle_name)?.module(module_name)?;
        if !module.abilities.iter().any(|a| a.name == ability_name) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST,
                format!("ability {} not exist", ability_name),
            ));
        }
        Ok(ExtMimeEntry {
            module_name: module_name.to_string(),
            ability_name: ability_name.to_string(),
            ext_name: ext_name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    pub fn set_ext_name_or_mime(
        &mut self,
        bundle_name: &str,
        module_name: &str,
        ability_name: &str,
        ext_name: &str,
        mime_type: &str,
    ) -> Result<()> {
        let entry =
            self.ext_mime_entry(bundle_name, module_name, ability_name, ext_name, mime_type)?;
        self.bundle_mut(bundle_name)?.ext_mimes.insert(entry);
        Ok(())
    }

    pub fn del_ext_name_or_mime(
        &mut self,
        bundle_name: &str,
        module_name: &str,
        ability_name: &str,
        ext_name: &str,
        mime_type: &str,
    ) -> Result<()> {
        let entry =
            self.ext_mime_entry(bundle_name, module_name, ability_name, ext_name, mime_type)?;
        if !self.bundle_mut(bundle_name)?.ext_mimes.remove(&entry) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_EXT_NAME_OR_MIME_ERROR,
                "extension name or MIME type not set",
            ));
        }
        Ok(())
    }

    pub fn json_profile(
        &self,
        profile_type: i32,
        bundle_name: &str,
        module_name: &str,
        user_id: i32,
    ) -> Result<String> {
        let record = self.bundle_for_user(bundle_name, user_id)?;
        let module = if module_name.is_empty() {
            record.fixture.modules.first().ok_or_else(|| {
                service_error(ERR_BUNDLE_MANAGER_MODULE_NOT_EXIST, "bundle has no module")
            })?
        } else {
            record.module(module_name)?
        };

        module
            .profiles
            .iter()
            .find(|p| p.profile_type == profile_type)
            .map(|p| p.content.clone())
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_PROFILE_NOT_EXIST,
                    format!("profile type {} not exist", profile_type),
                )
            })
    }

    pub fn implicit_query_skill_uri(
        &self,
        want: &Want,
        user_id: i32,
    ) -> Result<Vec<AbilityInfo>> {
        check_user(user_id)?;
        let target = &want.element.bundle_name;
        let abilities: Vec<AbilityInfo> = self
            .bundles
            .values()
            .filter(|record| record.installed_for(user_id))
            .filter(|record| target.is_empty() || record.name() == target)
            .flat_map(|record| record.abilities())
            .filter_map(|ability| match_ability(ability, want))
            .collect();

        if abilities.is_empty() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST,
                "no ability matches the want",
            ));
        }
        Ok(abilities)
    }

    pub fn ability_by_continue_type(
        &self,
        bundle_name: &str,
        continue_type: &str,
        user_id: i32,
    ) -> Result<AbilityInfo> {
        self.bundle_for_user(bundle_name, user_id)?
            .abilities()
            .find(|ability| ability.continue_type.iter().any(|t| t == continue_type))
            .cloned()
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_ABILITY_NOT_EXIST,
                    format!("no ability with continue type {}", continue_type),
                )
            })
    }

    // App control

    pub fn add_install_rule(
        &mut self,
        caller: i32,
        app_ids: &[String],
        rule_type: i32,
        user_id: i32,
    ) -> Result<()> {
        check_edm_caller(caller)?;
        Self::check_rule_type(rule_type)?;
        check_user(user_id)?;
        if app_ids.is_empty() {
            return Err(service_error(ERR_BUNDLE_MANAGER_PARAM_ERROR, "empty app id list"));
        }
        self.install_rules
            .entry((rule_type, user_id))
            .or_default()
            .extend(app_ids.iter().cloned());
        info!("Added {} install rules of type {}", app_ids.len(), rule_type);
        Ok(())
    }

    pub fn install_rules(&self, caller: i32, rule_type: i32, user_id: i32) -> Result<Vec<String>> {
        check_edm_caller(caller)?;
        Self::check_rule_type(rule_type)?;
        check_user(user_id)?;
        Ok(self
            .install_rules
            .get(&(rule_type, user_id))
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    pub fn delete_install_rule(
        &mut self,
        caller: i32,
        app_ids: &[String],
        rule_type: i32,
        user_id: i32,
    ) -> Result<()> {
        check_edm_caller(caller)?;
        Self::check_rule_type(rule_type)?;
        check_user(user_id)?;
        if let Some(ids) = self.install_rules.get_mut(&(rule_type, user_id)) {
            for app_id in app_ids {
                ids.remove(app_id);
            }
        }
        Ok(())
    }

    pub fn clean_install_rules(&mut self, caller: i32, rule_type: i32, user_id: i32) -> Result<()> {
        check_edm_caller(caller)?;
        Self::check_rule_type(rule_type)?;
        check_user(user_id)?;
        self.install_rules.remove(&(rule_type, user_id));
        Ok(())
    }

    fn check_rule_type(rule_type: i32) -> Result<()> {
        if !INSTALL_RULE_TYPES.contains(&rule_type) {
            return Err(service_error(
                ERR_APP_CONTROL_RULE_TYPE_INVALID,
                format!("invalid rule type {}", rule_type),
            ));
        }
        Ok(())
    }

    pub fn add_running_rules(
        &mut self,
        caller: i32,
        rules: &[AppRunningControlRule],
        user_id: i32,
    ) -> Result<()> {
        check_edm_caller(caller)?;
        check_user(user_id)?;
        let entry = self.running_rules.entry(user_id).or_default();
        for rule in rules {
            entry.insert(rule.app_id.clone(), rule.control_message.clone());
        }
        Ok(())
    }

    pub fn delete_running_rules(
        &mut self,
        caller: i32,
        rules: &[AppRunningControlRule],
        user_id: i32,
    ) -> Result<()> {
        check_edm_caller(caller)?;
        check_user(user_id)?;
        if let Some(entry) = self.running_rules.get_mut(&user_id) {
            for rule in rules {
                entry.remove(&rule.app_id);
            }
        }
        Ok(())
    }

    pub fn clean_running_rules(&mut self, caller: i32, user_id: i32) -> Result<()> {
        check_edm_caller(caller)?;
        check_user(user_id)?;
        self.running_rules.remove(&user_id);
        Ok(())
    }

    pub fn running_rules(&self, caller: i32, user_id: i32) -> Result<Vec<String>> {
        check_edm_caller(caller)?;
        check_user(user_id)?;
        Ok(self
            .running_rules
            .get(&user_id)
            .map(|rules| rules.keys().cloned().collect())
            .unwrap_or_default())
    }

    pub fn running_rule_result(
        &self,
        caller: i32,
        bundle_name: &str,
        user_id: i32,
    ) -> Result<AppRunningControlRuleResult> {
        check_edm_caller(caller)?;
        let record = self.bundle_for_user(bundle_name, user_id)?;
        let message = self
            .running_rules
            .get(&user_id)
            .and_then(|rules| rules.get(&record.fixture.app_id))
            .ok_or_else(|| {
                service_error(
                    ERR_APP_CONTROL_RULE_NOT_EXIST,
                    format!("no running rule for {}", bundle_name),
                )
            })?;

        Ok(AppRunningControlRuleResult {
            control_message: message.clone(),
            control_want: None,
        })
    }

    // Quick fix

    pub fn copy_files(&mut self, source_files: &[String]) -> Result<Vec<String>> {
        if source_files.is_empty() {
            return Err(service_error(
                ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR,
                "no file to copy",
            ));
        }

        let mut dest_files = Vec::with_capacity(source_files.len());
        for source in source_files {
            let file_name = Path::new(source)
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    service_error(
                        ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR,
                        format!("invalid file path {}", source),
                    )
                })?;
            dest_files.push(format!("{}/{}", QUICK_FIX_TMP_DIR, file_name));
        }

        debug!("Copied {} quick fix files", dest_files.len());
        self.copied_files.extend(dest_files.iter().cloned());
        Ok(dest_files)
    }

    /// Deploy a patch. The bundle name is the file stem of each `.hqf` path.
    pub fn deploy_quick_fix(
        &mut self,
        bundle_file_paths: &[String],
        is_debug: bool,
    ) -> Result<QuickFixResult> {
        let mut bundle_name: Option<String> = None;
        for path in bundle_file_paths {
            let path = Path::new(path);
            let stem = match (path.extension().and_then(|e| e.to_str()), path.file_stem()) {
                (Some("hqf"), Some(stem)) => stem.to_string_lossy().into_owned(),
                _ => {
                    return Err(service_error(
                        ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR,
                        format!("{} is not a quick fix file", path.display()),
                    ))
                }
            };
            match &bundle_name {
                Some(name) if *name != stem => {
                    return Err(service_error(
                        ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_SAME,
                        "quick fix files target different bundles",
                    ))
                }
                _ => bundle_name = Some(stem),
            }
        }

        let bundle_name = bundle_name.ok_or_else(|| {
            service_error(ERR_BUNDLEMANAGER_QUICK_FIX_PARAM_ERROR, "no quick fix file")
        })?;
        let record = self.bundles.get(&bundle_name).ok_or_else(|| {
            service_error(
                ERR_BUNDLEMANAGER_QUICK_FIX_BUNDLE_NAME_NOT_EXIST,
                format!("bundle {} not exist", bundle_name),
            )
        })?;

        if let Some(patch) = self.patches.get(&bundle_name) {
            let code = match patch.patch_type {
                QuickFixType::Patch => ERR_BUNDLEMANAGER_QUICK_FIX_PATCH_ALREADY_EXISTED,
                QuickFixType::HotReload => ERR_BUNDLEMANAGER_QUICK_FIX_HOT_RELOAD_ALREADY_EXISTED,
            };
            return Err(service_error(code, format!("{} already patched", bundle_name)));
        }

        let patch_type = if is_debug {
            QuickFixType::HotReload
        } else {
            QuickFixType::Patch
        };
        let module_names: Vec<String> =
            record.fixture.modules.iter().map(|m| m.name.clone()).collect();
        let result = DeployQuickFixResult {
            result_code: ERR_OK,
            bundle_name: bundle_name.clone(),
            bundle_version_code: record.fixture.version_code,
            patch_version_code: record.fixture.version_code + 1,
            is_so_contained: false,
            patch_type,
            module_names: module_names.clone(),
        };

        self.patches.insert(
            bundle_name.clone(),
            PatchRecord {
                patch_type,
                enabled: false,
                patch_version_code: result.patch_version_code,
                module_names,
            },
        );
        info!("Deployed {:?} for {}", patch_type, bundle_name);
        Ok(QuickFixResult::Deploy(result))
    }

    pub fn switch_quick_fix(&mut self, bundle_name: &str, enable: bool) -> Result<QuickFixResult> {
        let patch = self.patches.get_mut(bundle_name).ok_or_else(|| {
            service_error(
                ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE,
                format!("no patch for {}", bundle_name),
            )
        })?;
        if patch.enabled == enable {
            return Err(service_error(
                ERR_BUNDLEMANAGER_QUICK_FIX_INVALID_PATCH_STATUS,
                format!("patch of {} already in requested state", bundle_name),
            ));
        }
        patch.enabled = enable;
        debug!(
            "Patch {} of {} on modules {:?} enabled: {}",
            patch.patch_version_code, bundle_name, patch.module_names, enable
        );

        Ok(QuickFixResult::Switch(SwitchQuickFixResult {
            result_code: ERR_OK,
            bundle_name: bundle_name.to_string(),
            enable,
        }))
    }

    pub fn delete_quick_fix(&mut self, bundle_name: &str) -> Result<QuickFixResult> {
        match self.patches.get(bundle_name) {
            None => {
                return Err(service_error(
                    ERR_BUNDLEMANAGER_QUICK_FIX_NO_PATCH_IN_DATABASE,
                    format!("no patch for {}", bundle_name),
                ))
            }
            Some(patch) if patch.enabled => {
                return Err(service_error(
                    ERR_BUNDLEMANAGER_QUICK_FIX_INVALID_PATCH_STATUS,
                    "an enabled patch cannot be deleted",
                ))
            }
            Some(_) => {}
        }
        self.patches.remove(bundle_name);

        Ok(QuickFixResult::Delete(DeleteQuickFixResult {
            result_code: ERR_OK,
            bundle_name: bundle_name.to_string(),
        }))
    }

    pub fn set_debug_mode(&mut self, caller: i32, enable: bool) -> Result<()> {
        if caller >= BASE_APP_UID {
            return Err(service_error(
                ERR_BUNDLEMANAGER_SET_DEBUG_MODE_UID_CHECK_FAILED,
                format!("caller {} may not switch debug mode", caller),
            ));
        }
        info!("Debug mode set to {}", enable);
        self.debug_mode = enable;
        Ok(())
    }

    // Storage

    pub fn bundle_stats(
        &self,
        bundle_name: &str,
        user_id: i32,
        app_index: i32,
    ) -> Result<Vec<i64>> {
        check_user(user_id)?;
        let record = self.bundle(bundle_name)?;
        if !record.installed_for(user_id) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_INVALID_USER_ID,
                format!("{} not installed for user {}", bundle_name, user_id),
            ));
        }
        if app_index != 0 && !record.sandboxes.contains_key(&app_index) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_INVALID_APP_INDEX,
                format!("invalid app index {}", app_index),
            ));
        }
        Ok(record.fixture.stats.clone())
    }

    pub fn batch_bundle_stats(
        &self,
        bundle_names: &[String],
        user_id: i32,
    ) -> Result<Vec<BundleStorageStats>> {
        check_user(user_id)?;
        Ok(bundle_names
            .iter()
            .map(|name| match self.bundle_stats(name, user_id, 0) {
                Ok(stats) => BundleStorageStats {
                    bundle_name: name.clone(),
                    bundle_stats: stats,
                    err_code: ERR_OK,
                },
                Err(e) => BundleStorageStats {
                    bundle_name: name.clone(),
                    bundle_stats: Vec::new(),
                    err_code: e.err_code(),
                },
            })
            .collect())
    }

    /// Free at least `cache_size` bytes, largest caches first.
    pub fn clean_cache_automatic(&mut self, cache_size: u64) -> Result<u64> {
        if cache_size == 0 {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PARAM_ERROR,
                "cache size must be greater than 0",
            ));
        }

        let mut records: Vec<&mut BundleRecord> = self.bundles.values_mut().collect();
        records.sort_by(|a, b| b.fixture.cache_size.cmp(&a.fixture.cache_size));

        let mut cleaned = 0u64;
        for record in records {
            if cleaned >= cache_size {
                break;
            }
            cleaned += record.fixture.cache_size;
            record.fixture.cache_size = 0;
            if let Some(cache) = record.fixture.stats.get_mut(4) {
                *cache = 0;
            }
        }

        info!("Cleaned {} bytes of cache, {} requested", cleaned, cache_size);
        Ok(cleaned)
    }

    pub fn all_bundle_cache_stat(&self, caller: i32) -> Result<u64> {
        check_system_caller(caller)?;
        Ok(self.bundles.values().map(|r| r.fixture.cache_size).sum())
    }

    pub fn clean_all_bundle_cache(&mut self, caller: i32) -> Result<i32> {
        check_system_caller(caller)?;
        for record in self.bundles.values_mut() {
            record.fixture.cache_size = 0;
            if let Some(cache) = record.fixture.stats.get_mut(4) {
                *cache = 0;
            }
        }
        Ok(ERR_OK)
    }

    pub fn app_provision_info(&self, bundle_name: &str, user_id: i32) -> Result<AppProvisionInfo> {
        Ok(self
            .bundle_for_user(bundle_name, user_id)?
            .fixture
            .provision
            .clone())
    }

    /// Bundle name reachable on a remote device. Empty when nothing matches.
    pub fn distributed_bundle_name(
        &self,
        network_id: &str,
        access_token_id: u32,
    ) -> Result<String> {
        if network_id.is_empty() || access_token_id == 0 {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PARAM_ERROR,
                "network id and access token id are required",
            ));
        }
        Ok(self
            .bundles
            .values()
            .find(|record| {
                record.fixture.remotes.iter().any(|remote| {
                    remote.network_id == network_id && remote.access_token_id == access_token_id
                })
            })
            .map(|record| record.fixture.name.clone())
            .unwrap_or_default())
    }

    // Events

    pub fn register_event_callback(&mut self, caller: i32) -> bool {
        if caller >= BASE_APP_UID {
            warn!("Caller {} may not register bundle event callbacks", caller);
            return false;
        }
        self.event_callbacks.insert(caller);
        true
    }

    pub fn unregister_event_callback(&mut self, caller: i32) -> bool {
        if caller >= BASE_APP_UID {
            warn!("Caller {} may not unregister bundle event callbacks", caller);
            return false;
        }
        self.event_callbacks.remove(&caller);
        true
    }

    /// Reset the AOT compile status of a module. Only the bundle itself or a
    /// system process may ask.
    pub fn reset_aot_compile_status(
        &self,
        caller: i32,
        bundle_name: &str,
        module_name: &str,
        trigger_mode: i32,
    ) -> Result<()> {
        let record = self.bundle(bundle_name)?;
        if caller >= BASE_APP_UID && record.user_of_uid(caller).is_none() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PERMISSION_DENIED,
                format!("caller {} does not own {}", caller, bundle_name),
            ));
        }
        record.module(module_name)?;
        debug!(
            "Reset AOT status of {}/{} with trigger mode {}",
            bundle_name, module_name, trigger_mode
        );
        Ok(())
    }

    pub fn publish_common_event(&mut self, action: &str) {
        info!("Published common event {}", action);
        self.published_events.push(action.to_string());
    }

    // Data groups and directories

    pub fn data_group_infos(&self, bundle_name: &str, user_id: i32) -> Result<Vec<DataGroupInfo>> {
        let record = self.bundle_for_user(bundle_name, user_id)?;
        let uid = record.uid_for(user_id);
        Ok(record
            .fixture
            .data_groups
            .iter()
            .map(|group| DataGroupInfo {
                uid,
                gid: uid,
                user_id,
                ..group.clone()
            })
            .collect())
    }

    pub fn group_dir(&self, data_group_id: &str) -> Result<String> {
        self.bundles
            .values()
            .flat_map(|record| record.fixture.data_groups.iter())
            .find(|group| group.data_group_id == data_group_id)
            .map(|group| format!("{}/{}", GROUP_DIR_ROOT, group.uuid))
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_DATA_GROUP_NOT_EXIST,
                    format!("data group {} not exist", data_group_id),
                )
            })
    }

    pub fn dir_by_bundle_name_and_app_index(
        &self,
        bundle_name: &str,
        app_index: i32,
    ) -> Result<String> {
        self.bundle(bundle_name)?;
        match app_index {
            0 => Ok(bundle_name.to_string()),
            1..=MAX_CLONE_APP_INDEX => Ok(format!("+clone-{}+{}", app_index, bundle_name)),
            _ => Err(service_error(
                ERR_BUNDLE_MANAGER_GET_DIR_INVALID_APP_INDEX,
                format!("invalid app index {}", app_index),
            )),
        }
    }

    pub fn all_bundle_dirs(&self, user_id: i32) -> Result<Vec<BundleDir>> {
        check_user(user_id)?;
        Ok(self
            .bundles
            .values()
            .filter(|record| record.installed_for(user_id))
            .map(|record| BundleDir {
                bundle_name: record.fixture.name.clone(),
                app_index: 0,
                dir: record.fixture.name.clone(),
            })
            .collect())
    }

    // Identity

    pub fn uninstalled_bundle_info(&self, bundle_name: &str) -> Result<BundleInfo> {
        self.uninstalled
            .get(bundle_name)
            .map(|record| record.bundle_info(DEFAULT_USER_ID, 0))
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                    format!("{} was never uninstalled", bundle_name),
                )
            })
    }

    pub fn odid(&self, caller: i32) -> Result<String> {
        self.bundle_by_uid(caller)
            .map(|(record, _)| record.fixture.odid.clone())
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                    format!("no bundle with uid {}", caller),
                )
            })
    }

    pub fn uid_by_bundle_name(&self, bundle_name: &str, user_id: i32, app_index: i32) -> i32 {
        match self.bundle_for_user(bundle_name, user_id) {
            Ok(record) if app_index == 0 || record.sandboxes.contains_key(&app_index) => {
                record.uid_for(user_id)
            }
            _ => -1,
        }
    }

    pub fn update_encrypted_status(
        &mut self,
        caller: i32,
        bundle_name: &str,
        is_existed: bool,
        app_index: i32,
    ) -> Result<()> {
        if caller != CODE_PROTECT_UID {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PERMISSION_DENIED,
                format!("caller {} may not update encrypted status", caller),
            ));
        }
        self.bundle_mut(bundle_name)?
            .encrypted
            .insert(app_index, is_existed);
        Ok(())
    }

    pub fn is_bundle_installed(
        &self,
        bundle_name: &str,
        user_id: i32,
        app_index: i32,
    ) -> Result<bool> {
        check_user(user_id)?;
        if app_index < 0 {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_INVALID_APP_INDEX,
                format!("invalid app index {}", app_index),
            ));
        }
        Ok(self.bundles.get(bundle_name).is_some_and(|record| {
            record.installed_for(user_id)
                && (app_index == 0 || record.sandboxes.contains_key(&app_index))
        }))
    }

    pub fn compatible_device_type(&self, bundle_name: &str) -> Result<String> {
        Ok(self.bundle(bundle_name)?.fixture.compatible_device_type.clone())
    }

    /// One entry per uid; unknown uids carry an invalid-uid `ret`.
    pub fn simple_app_info_for_uids(&self, uids: &[i32]) -> Vec<SimpleAppInfo> {
        uids.iter()
            .map(|uid| match self.bundle_by_uid(*uid) {
                Some((record, _)) => SimpleAppInfo {
                    uid: *uid,
                    bundle_name: record.fixture.name.clone(),
                    app_index: 0,
                    ret: ERR_OK,
                },
                None => SimpleAppInfo {
                    uid: *uid,
                    ret: ERR_BUNDLE_MANAGER_INVALID_UID,
                    ..Default::default()
                },
            })
            .collect()
    }

    pub fn bundle_name_by_app_id(&self, app_id: &str) -> Result<String> {
        self.bundles
            .values()
            .find(|record| record.fixture.app_id == app_id)
            .map(|record| record.fixture.name.clone())
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                    format!("no bundle with app id {}", app_id),
                )
            })
    }

    pub fn asset_access_groups(&self, bundle_name: &str) -> Result<Vec<String>> {
        Ok(self.bundle(bundle_name)?.fixture.asset_access_groups.clone())
    }

    pub fn app_identifier_and_app_index(
        &self,
        access_token_id: u32,
    ) -> Result<AppIdentifierResponse> {
        self.bundles
            .values()
            .find(|record| record.fixture.access_token_id == access_token_id)
            .map(|record| AppIdentifierResponse {
                app_identifier: record.fixture.app_identifier.clone(),
                app_index: 0,
            })
            .ok_or_else(|| {
                service_error(
                    ERR_BUNDLE_MANAGER_BUNDLE_NOT_EXIST,
                    format!("no bundle with access token {}", access_token_id),
                )
            })
    }

    pub fn set_app_distribution_types(&mut self, types: &[AppDistributionType]) {
        self.distribution_types = types.iter().copied().collect();
        info!("Allowed app distribution types: {:?}", self.distribution_types);
    }

    pub fn app_distribution_types(&self) -> Vec<AppDistributionType> {
        self.distribution_types.iter().copied().collect()
    }

    pub fn bundle_names_for_uid_ext(&self, uid: i32) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .bundles
            .values()
            .filter(|record| record.user_of_uid(uid).is_some())
            .map(|record| record.fixture.name.clone())
            .collect();
        if names.is_empty() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_INVALID_UID,
                format!("no bundle with uid {}", uid),
            ));
        }
        Ok(names)
    }

    // Installer

    /// Install a `.hap` or `.hsp` file; its file stem names the bundle.
    pub fn install_bundle(&mut self, bundle_file_path: &str, param: &InstallParam) -> Result<()> {
        let path = Path::new(bundle_file_path);
        let bundle_name = match (path.extension().and_then(|e| e.to_str()), path.file_stem()) {
            (Some("hap" | "hsp"), Some(stem)) => stem.to_string_lossy().into_owned(),
            _ => {
                return Err(service_error(
                    ERR_INSTALL_PARAM_ERROR,
                    format!("{} is not a bundle file", bundle_file_path),
                ))
            }
        };
        check_user(param.user_id)
            .map_err(|_| service_error(ERR_INSTALL_PARAM_ERROR, "invalid user id"))?;

        if let Some(record) = self.bundles.get_mut(&bundle_name) {
            if !record.installed_for(param.user_id) {
                record.fixture.users.push(param.user_id);
            }
            record.update_time = now_millis();
            info!("Updated bundle {} for user {}", bundle_name, param.user_id);
            return Ok(());
        }

        let mut record = match self.uninstalled.remove(&bundle_name) {
            Some(mut record) => {
                record.fixture.users = vec![param.user_id];
                record.update_time = now_millis();
                record
            }
            None => {
                let uid_index = self
                    .bundles
                    .values()
                    .chain(self.uninstalled.values())
                    .map(|r| r.fixture.uid_index)
                    .max()
                    .unwrap_or(0)
                    + 1;
                BundleRecord::new(BundleFixture {
                    name: bundle_name.clone(),
                    uid_index,
                    app_id: format!("{}_{:08x}", bundle_name, rand::thread_rng().gen::<u32>()),
                    odid: generate_odid(),
                    users: vec![param.user_id],
                    ..Default::default()
                })
            }
        };
        record.fixture.users.dedup();

        info!("Installed bundle {} for user {}", bundle_name, param.user_id);
        self.bundles.insert(bundle_name, record);
        Ok(())
    }

    pub fn uninstall_bundle(&mut self, bundle_name: &str, param: &InstallParam) -> Result<()> {
        let record = self
            .bundles
            .get_mut(bundle_name)
            .filter(|record| record.installed_for(param.user_id))
            .ok_or_else(|| {
                service_error(
                    ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE,
                    format!("{} not installed for user {}", bundle_name, param.user_id),
                )
            })?;

        if !record.fixture.removable && !param.is_forced_uninstall() {
            return Err(service_error(
                ERR_UNINSTALL_SYSTEM_APP_ERROR,
                format!("{} is a system app", bundle_name),
            ));
        }

        record.fixture.users.retain(|user| *user != param.user_id);
        info!("Uninstalled {} for user {}", bundle_name, param.user_id);

        if record.fixture.users.is_empty() {
            if let Some(record) = self.bundles.remove(bundle_name) {
                self.uninstalled.insert(bundle_name.to_string(), record);
            }
        }
        Ok(())
    }

    pub fn uninstall_module(
        &mut self,
        bundle_name: &str,
        module_name: &str,
        param: &InstallParam,
    ) -> Result<()> {
        let record = self
            .bundles
            .get(bundle_name)
            .filter(|record| record.installed_for(param.user_id))
            .ok_or_else(|| {
                service_error(
                    ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE,
                    format!("{} not installed for user {}", bundle_name, param.user_id),
                )
            })?;
        if record.module(module_name).is_err() {
            return Err(service_error(
                ERR_UNINSTALL_MISSING_INSTALLED_MODULE,
                format!("module {} not installed", module_name),
            ));
        }
        if record.fixture.modules.len() == 1 {
            return self.uninstall_bundle(bundle_name, param);
        }

        let forced = param.is_forced_uninstall();
        let record = self.bundle_mut(bundle_name)?;
        if !record.fixture.removable && !forced {
            return Err(service_error(
                ERR_UNINSTALL_SYSTEM_APP_ERROR,
                format!("{} is a system app", bundle_name),
            ));
        }
        record.fixture.modules.retain(|m| m.name != module_name);
        info!("Uninstalled module {} of {}", module_name, bundle_name);
        Ok(())
    }

    /// Uninstall a shared bundle for every user.
    pub fn uninstall_shared(&mut self, param: &UninstallParam) -> Result<()> {
        let record = self.bundles.remove(&param.bundle_name).ok_or_else(|| {
            service_error(
                ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE,
                format!("{} not installed", param.bundle_name),
            )
        })?;
        info!("Uninstalled shared bundle {}", param.bundle_name);
        self.uninstalled.insert(param.bundle_name.clone(), record);
        Ok(())
    }

    /// Reinstall a preinstalled bundle for a user.
    pub fn recover(&mut self, bundle_name: &str, param: &InstallParam) -> Result<()> {
        if let Some(record) = self.bundles.get_mut(bundle_name) {
            if record.fixture.preinstalled {
                if !record.installed_for(param.user_id) {
                    record.fixture.users.push(param.user_id);
                }
                return Ok(());
            }
        } else if self
            .uninstalled
            .get(bundle_name)
            .is_some_and(|record| record.fixture.preinstalled)
        {
            if let Some(mut record) = self.uninstalled.remove(bundle_name) {
                record.fixture.users = vec![param.user_id];
                info!("Recovered {} for user {}", bundle_name, param.user_id);
                self.bundles.insert(bundle_name.to_string(), record);
                return Ok(());
            }
        }
        Err(service_error(
            ERR_UNINSTALL_MISSING_INSTALLED_BUNDLE,
            format!("{} is not a preinstalled bundle", bundle_name),
        ))
    }

    pub fn install_sandbox_app(
        &mut self,
        bundle_name: &str,
        dlp_type: i32,
        user_id: i32,
    ) -> Result<i32> {
        if dlp_type <= 0 {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PARAM_ERROR,
                format!("invalid dlp type {}", dlp_type),
            ));
        }
        self.bundle_for_user(bundle_name, user_id)?;

        self.next_sandbox_index += 1;
        let app_index = self.next_sandbox_index;
        self.bundle_mut(bundle_name)?
            .sandboxes
            .insert(app_index, user_id);
        info!("Installed sandbox {} of {}", app_index, bundle_name);
        Ok(app_index)
    }

    pub fn uninstall_sandbox_app(
        &mut self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> Result<()> {
        let removed = self
            .bundles
            .get_mut(bundle_name)
            .filter(|record| record.sandboxes.get(&app_index) == Some(&user_id))
            .and_then(|record| record.sandboxes.remove(&app_index));
        if removed.is_none() {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_SANDBOX_APP_NOT_EXIST,
                format!("sandbox {} of {} not exist", app_index, bundle_name),
            ));
        }
        Ok(())
    }

    pub fn sandbox_bundle_info(
        &self,
        bundle_name: &str,
        app_index: i32,
        user_id: i32,
    ) -> Result<BundleInfo> {
        check_user(user_id)?;
        if app_index <= INITIAL_SANDBOX_APP_INDEX {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_PARAM_ERROR,
                format!("invalid sandbox app index {}", app_index),
            ));
        }
        let record = self.bundle(bundle_name)?;
        if record.sandboxes.get(&app_index) != Some(&user_id) {
            return Err(service_error(
                ERR_BUNDLE_MANAGER_SANDBOX_APP_NOT_EXIST,
                format!("sandbox {} of {} not exist", app_index, bundle_name),
            ));
        }
        Ok(record.bundle_info(user_id, app_index))
    }

    pub fn create_stream_installer(&mut self) -> u32 {
        self.next_stream_installer_id += 1;
        self.stream_installers.insert(self.next_stream_installer_id);
        self.next_stream_installer_id
    }

    pub fn destroy_stream_installer(&mut self, id: u32) -> bool {
        self.stream_installers.remove(&id)
    }
}

impl Default for BundleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
