//! Project model: projects, targets, platforms, products, and settings.
//!
//! These are the in-memory descriptions the graph is built from. They are
//! plain data; behavior lives in `graph`, `lint`, and `settings`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Flat build-settings table. Ordered so printed output is stable.
pub type SettingsDictionary = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Platforms a target can be built for.
pub enum Platform {
    Ios,
    MacOs,
    TvOs,
    WatchOs,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ios => "iOS",
            Self::MacOs => "macOS",
            Self::TvOs => "tvOS",
            Self::WatchOs => "watchOS",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Kinds of product a target produces.
pub enum Product {
    App,
    StaticLibrary,
    StaticFramework,
    /// Dynamic framework.
    Framework,
    DynamicLibrary,
    /// Resource bundle.
    Bundle,
    UnitTests,
    UiTests,
    AppExtension,
    StickerPackExtension,
    #[serde(rename = "watch2_app")]
    Watch2App,
    #[serde(rename = "watch2_extension")]
    Watch2Extension,
}

impl Product {
    /// Products whose code is copied into the binary that links them.
    pub fn is_static(self) -> bool {
        matches!(self, Self::StaticLibrary | Self::StaticFramework)
    }

    /// Products that carry compiled code of their own and therefore link
    /// (or archive) the static products they depend on.
    pub fn links_static_products(self) -> bool {
        !matches!(
            self,
            Self::Bundle | Self::StickerPackExtension | Self::Watch2App
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::StaticLibrary => "static_library",
            Self::StaticFramework => "static_framework",
            Self::Framework => "framework",
            Self::DynamicLibrary => "dynamic_library",
            Self::Bundle => "bundle",
            Self::UnitTests => "unit_tests",
            Self::UiTests => "ui_tests",
            Self::AppExtension => "app_extension",
            Self::StickerPackExtension => "sticker_pack_extension",
            Self::Watch2App => "watch2_app",
            Self::Watch2Extension => "watch2_extension",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Debug,
    Release,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Release => "release",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
/// Build configuration identifier: a variant plus a display name.
///
/// Ordering puts debug variants first, then sorts by name.
pub struct BuildConfiguration {
    pub variant: Variant,
    pub name: String,
}

impl BuildConfiguration {
    pub fn debug(name: impl Into<String>) -> Self {
        Self {
            variant: Variant::Debug,
            name: name.into(),
        }
    }

    pub fn release(name: impl Into<String>) -> Self {
        Self {
            variant: Variant::Release,
            name: name.into(),
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-configuration overrides: inline settings and an optional xcconfig.
pub struct Configuration {
    pub settings: SettingsDictionary,
    pub xcconfig: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Layered settings for a project or a target.
pub struct Settings {
    pub base: SettingsDictionary,
    /// Configuration identifiers are unique by construction (map keys).
    pub configurations: BTreeMap<BuildConfiguration, Option<Configuration>>,
}

impl Settings {
    pub fn new(
        base: SettingsDictionary,
        configurations: BTreeMap<BuildConfiguration, Option<Configuration>>,
    ) -> Self {
        Self {
            base,
            configurations,
        }
    }

    /// Declared configuration identifiers, in sorted order.
    pub fn build_configurations(&self) -> impl Iterator<Item = &BuildConfiguration> {
        self.configurations.keys()
    }

    /// Override entry for `config`, if declared with content.
    pub fn configuration(&self, config: &BuildConfiguration) -> Option<&Configuration> {
        self.configurations.get(config).and_then(Option::as_ref)
    }
}

impl Default for Settings {
    /// The Debug/Release pair with no overrides.
    fn default() -> Self {
        let mut configurations = BTreeMap::new();
        configurations.insert(BuildConfiguration::debug("Debug"), None);
        configurations.insert(BuildConfiguration::release("Release"), None);
        Self {
            base: SettingsDictionary::new(),
            configurations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub platform: Platform,
    pub product: Product,
    pub bundle_id: String,
    /// When absent, the project's settings alone govern.
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub settings: Settings,
    pub targets: Vec<Target>,
}

impl Project {
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}
