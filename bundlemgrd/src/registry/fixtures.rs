//! Fixture bundles seeding the registry
//!
//! Fixtures are plain serde structs so they can be written by hand in a TOML
//! file and passed with `--fixtures`. Without a file, [`Fixtures::builtin`]
//! provides a small set of bundles covering every query the service answers.

use bundle_core::{
    AbilityInfo, AppProvisionInfo, BundleError, DataGroupInfo, Metadata, ProxyData, Result, Skill,
    SkillUri, Validity, DEFAULT_USER_ID,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A string or icon resource of a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceFixture {
    pub id: u32,
    pub density: u32,
    pub value: String,
}

/// A JSON profile shipped in a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFixture {
    pub profile_type: i32,
    pub content: String,
}

/// A device on which the bundle is reachable through distributed scheduling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteFixture {
    pub network_id: String,
    pub access_token_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleFixture {
    pub name: String,
    pub removable: bool,
    pub strings: Vec<ResourceFixture>,
    pub icons: Vec<ResourceFixture>,
    pub abilities: Vec<AbilityInfo>,
    pub profiles: Vec<ProfileFixture>,
    pub proxy_datas: Vec<ProxyData>,
}

impl Default for ModuleFixture {
    fn default() -> Self {
        Self {
            name: "entry".to_string(),
            removable: true,
            strings: Vec::new(),
            icons: Vec::new(),
            abilities: Vec::new(),
            profiles: Vec::new(),
            proxy_datas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleFixture {
    pub name: String,
    /// Position of the bundle in the uid space of each user
    pub uid_index: i32,
    pub app_id: String,
    pub app_identifier: String,
    pub access_token_id: u32,
    pub version_code: u32,
    pub version_name: String,
    pub is_system_app: bool,
    pub preinstalled: bool,
    pub removable: bool,
    pub compatible_device_type: String,
    /// Developer-scoped device id; generated when empty
    pub odid: String,
    pub users: Vec<i32>,
    pub modules: Vec<ModuleFixture>,
    pub provision: AppProvisionInfo,
    /// app data, user data, distributed data, database, cache
    pub stats: Vec<i64>,
    pub cache_size: u64,
    pub data_groups: Vec<DataGroupInfo>,
    pub asset_access_groups: Vec<String>,
    pub continue_bundle_names: Vec<String>,
    pub remotes: Vec<RemoteFixture>,
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self {
            name: String::new(),
            uid_index: 0,
            app_id: String::new(),
            app_identifier: String::new(),
            access_token_id: 0,
            version_code: 1_000_000,
            version_name: "1.0.0".to_string(),
            is_system_app: false,
            preinstalled: false,
            removable: true,
            compatible_device_type: "phone".to_string(),
            odid: String::new(),
            users: vec![DEFAULT_USER_ID],
            modules: vec![ModuleFixture::default()],
            provision: AppProvisionInfo::default(),
            stats: vec![0; 5],
            cache_size: 0,
            data_groups: Vec::new(),
            asset_access_groups: Vec::new(),
            continue_bundle_names: Vec::new(),
            remotes: Vec::new(),
        }
    }
}

/// The full fixture set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    pub bundles: Vec<BundleFixture>,
}

impl Fixtures {
    /// Load fixtures from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        info!("Loading fixtures from: {}", path.display());

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            BundleError::Other(format!("Failed to read fixtures '{}': {}", path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let fixtures: Fixtures = toml::from_str(content)
            .map_err(|e| BundleError::Parse(format!("Invalid fixtures: {}", e)))?;

        for bundle in &fixtures.bundles {
            if bundle.name.is_empty() {
                return Err(BundleError::InvalidInput(
                    "Fixture bundle without a name".to_string(),
                ));
            }
        }

        Ok(fixtures)
    }

    /// Bundles available when no fixtures file is given.
    pub fn builtin() -> Self {
        Self {
            bundles: vec![my_application(), notes(), settings()],
        }
    }
}

fn my_application() -> BundleFixture {
    let name = "com.example.myapplication";

    let entry_ability = AbilityInfo {
        name: "EntryAbility".to_string(),
        bundle_name: name.to_string(),
        module_name: "entry".to_string(),
        label: "$string:EntryAbility_label".to_string(),
        description: "$string:EntryAbility_desc".to_string(),
        visible: true,
        continue_type: vec!["continue_entry".to_string()],
        skills: vec![Skill {
            actions: vec!["ohos.want.action.viewData".to_string()],
            entities: vec!["entity.system.browsable".to_string()],
            uris: vec![SkillUri {
                scheme: "https".to_string(),
                host: "www.example.com".to_string(),
                path: "docs".to_string(),
                mime_type: "text/html".to_string(),
                link_feature: "Login".to_string(),
                ..Default::default()
            }],
        }],
        skill_uri: Vec::new(),
    };

    let entry = ModuleFixture {
        name: "entry".to_string(),
        removable: true,
        strings: vec![
            ResourceFixture {
                id: 16_777_216,
                density: 0,
                value: "MyApplication".to_string(),
            },
            ResourceFixture {
                id: 16_777_217,
                density: 0,
                value: "Entry ability".to_string(),
            },
        ],
        icons: vec![
            ResourceFixture {
                id: 16_777_220,
                density: 0,
                value: "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk".to_string(),
            },
            ResourceFixture {
                id: 16_777_220,
                density: 320,
                value: "iVBORw0KGgoAAAANSUhEUgAAAAIAAAACCAYAAABytg0kAAAAFklEQVR42mNk".to_string(),
            },
        ],
        abilities: vec![entry_ability],
        profiles: vec![ProfileFixture {
            profile_type: 1,
            content: r#"{"insightIntents":[{"intentName":"PlayMusic","domain":"MusicDomain"}]}"#
                .to_string(),
        }],
        proxy_datas: vec![ProxyData {
            uri: format!("datashareproxy://{}/entry/config", name),
            required_read_permission: "ohos.permission.GET_BUNDLE_INFO".to_string(),
            required_write_permission: "ohos.permission.GET_BUNDLE_INFO".to_string(),
            metadata: Metadata {
                name: "dataProperties".to_string(),
                value: String::new(),
                resource: "$profile:datashare".to_string(),
            },
        }],
    };

    let feature = ModuleFixture {
        name: "feature".to_string(),
        removable: false,
        ..Default::default()
    };

    BundleFixture {
        name: name.to_string(),
        uid_index: 1,
        app_id: format!("{}_BNtg4JBClbl92Rgc3jm/RfcAdrHXaM8F0QOiwVEhnV5ebE5jNIYnAx", name),
        app_identifier: "5765880207853624761".to_string(),
        access_token_id: 537_000_001,
        odid: "a6b5f8c2-0d44-4b0e-9e5f-3c1d7e2a9b10".to_string(),
        modules: vec![entry, feature],
        provision: AppProvisionInfo {
            version_code: 1,
            version_name: "1.0".to_string(),
            uuid: "8ea4d6f6-1d7f-4d44-8c6b-b2b3f9ab0e1a".to_string(),
            provision_type: "debug".to_string(),
            app_distribution_type: "app_gallery".to_string(),
            developer_id: "6917563184917000001".to_string(),
            certificate: "-----BEGIN CERTIFICATE-----".to_string(),
            apl: "normal".to_string(),
            issuer: "pki_internal".to_string(),
            validity: Validity {
                not_before: 1_695_090_000,
                not_after: 2_010_450_000,
            },
            app_service_capabilities: String::new(),
        },
        stats: vec![1024, 2048, 0, 512, 4096],
        cache_size: 4096,
        data_groups: vec![DataGroupInfo {
            data_group_id: "group.example.shared".to_string(),
            uuid: "2d5f6a1b-3c4e-4f7a-8b9c-0d1e2f3a4b5c".to_string(),
            ..Default::default()
        }],
        asset_access_groups: vec![
            "com.example.group1".to_string(),
            "com.example.group2".to_string(),
        ],
        continue_bundle_names: vec![
            "com.example.myapplication.pad".to_string(),
            "com.example.myapplication.pc".to_string(),
        ],
        ..Default::default()
    }
}

fn notes() -> BundleFixture {
    let name = "com.example.notes";

    BundleFixture {
        name: name.to_string(),
        uid_index: 2,
        app_id: format!("{}_AGkVMn7y4vXw3cEhwC1b9vz3LpF8uQ", name),
        app_identifier: "6917563184917000002".to_string(),
        access_token_id: 537_000_002,
        modules: vec![ModuleFixture {
            name: "entry".to_string(),
            removable: true,
            abilities: vec![AbilityInfo {
                name: "NotesAbility".to_string(),
                bundle_name: name.to_string(),
                module_name: "entry".to_string(),
                visible: true,
                skills: vec![Skill {
                    actions: vec!["ohos.want.action.sendData".to_string()],
                    entities: vec!["entity.system.default".to_string()],
                    uris: vec![SkillUri {
                        scheme: "file".to_string(),
                        mime_type: "text/plain".to_string(),
                        utd: "general.plain-text".to_string(),
                        max_file_supported: 5,
                        ..Default::default()
                    }],
                }],
                ..Default::default()
            }],
            ..Default::default()
        }],
        provision: AppProvisionInfo {
            version_code: 1,
            version_name: "1.0".to_string(),
            provision_type: "release".to_string(),
            app_distribution_type: "enterprise".to_string(),
            apl: "normal".to_string(),
            ..Default::default()
        },
        stats: vec![512, 256, 0, 128, 1024],
        cache_size: 1024,
        remotes: vec![RemoteFixture {
            network_id: "2a4c6e8f0b1d3f5a7c9e".to_string(),
            access_token_id: 537_100_002,
        }],
        ..Default::default()
    }
}

fn settings() -> BundleFixture {
    BundleFixture {
        name: "com.ohos.settings".to_string(),
        uid_index: 3,
        app_id: "com.ohos.settings_BGhsfmVlPVYxLiZLWjaFQgQ".to_string(),
        app_identifier: "6917563184917000003".to_string(),
        access_token_id: 537_000_003,
        is_system_app: true,
        preinstalled: true,
        removable: false,
        users: vec![0, DEFAULT_USER_ID],
        provision: AppProvisionInfo {
            version_code: 1,
            version_name: "1.0".to_string(),
            provision_type: "release".to_string(),
            app_distribution_type: "os_integration".to_string(),
            apl: "system_core".to_string(),
            ..Default::default()
        },
        stats: vec![8192, 0, 0, 2048, 0],
        ..Default::default()
    }
}
