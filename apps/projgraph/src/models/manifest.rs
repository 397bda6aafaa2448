//! Workspace manifest schema: projects, targets, settings, and dependencies
//! as written on disk (TOML or YAML).

use super::project::{Platform, Product, Variant};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
/// Top-level manifest.
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<ProjectManifest>,
}

#[derive(Deserialize)]
pub struct ProjectManifest {
    pub name: String,
    /// Directory of the project, relative to the manifest.
    pub path: String,
    #[serde(default)]
    pub settings: Option<SettingsManifest>,
    #[serde(default)]
    pub targets: Vec<TargetManifest>,
}

#[derive(Deserialize)]
pub struct TargetManifest {
    pub name: String,
    pub platform: Platform,
    pub product: Product,
    pub bundle_id: String,
    #[serde(default)]
    pub settings: Option<SettingsManifest>,
    #[serde(default)]
    pub dependencies: Vec<DependencyManifest>,
}

#[derive(Deserialize, Default)]
pub struct SettingsManifest {
    #[serde(default)]
    pub base: BTreeMap<String, String>,
    #[serde(default)]
    pub configurations: Vec<ConfigurationManifest>,
}

#[derive(Deserialize)]
/// One build configuration entry. When neither `settings` nor `xcconfig`
/// is given the configuration is declared without overrides.
pub struct ConfigurationManifest {
    pub name: String,
    pub variant: Variant,
    #[serde(default)]
    pub settings: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub xcconfig: Option<String>,
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
/// A dependency entry, discriminated by which key is present.
pub enum DependencyManifest {
    /// `{ project = "../Core", target = "Core" }`
    Project { project: String, target: String },
    /// `{ target = "Core" }` in the same project.
    Target { target: String },
    Framework { framework: String },
    Library { library: String },
    XcFramework { xcframework: String },
    Package { package: String },
    CocoaPods { cocoapods: String },
}
