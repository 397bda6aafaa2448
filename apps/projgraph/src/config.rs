//! Configuration discovery and effective settings resolution.
//!
//! projgraph reads `projgraph.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `manifest`: `workspace.toml`
//! - `output`: `human`
//! - `lint.min_package_toolchain`: 13
//! - `lint.fetch_marker`: `Carthage/Build`
//! - `lint.toolchain_version`: unset (query the installed toolchain)
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::lint::{DEFAULT_FETCH_MARKER, DEFAULT_MIN_PACKAGE_TOOLCHAIN};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_MANIFEST: &str = "workspace.toml";

#[derive(Debug, Default, Deserialize, Clone)]
/// Lint-related configuration section under `[lint]`.
pub struct LintCfg {
    pub min_package_toolchain: Option<u32>,
    pub fetch_marker: Option<String>,
    /// Use this version instead of querying the installed toolchain.
    pub toolchain_version: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `projgraph.toml|yaml`.
pub struct ProjgraphConfig {
    pub manifest: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub lint: Option<LintCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub manifest: PathBuf,
    pub output: String,
    pub min_package_toolchain: u32,
    pub fetch_marker: String,
    pub toolchain_version: Option<String>,
    /// Whether a config file was found.
    pub config_found: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `projgraph.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("projgraph.toml").exists()
            || cur.join("projgraph.yaml").exists()
            || cur.join("projgraph.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ProjgraphConfig` from `projgraph.toml` or `projgraph.yaml|yml` if
/// present. A file that exists but does not parse is logged and ignored.
pub fn load_config(root: &Path) -> Option<ProjgraphConfig> {
    let toml_path = root.join("projgraph.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(path = %toml_path.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    for yml in ["projgraph.yaml", "projgraph.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_manifest: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root);
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    let lint = cfg.lint.unwrap_or_default();

    let manifest = cli_manifest
        .map(|s| s.to_string())
        .or(cfg.manifest)
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Effective {
        manifest: repo_root.join(manifest),
        repo_root,
        output,
        min_package_toolchain: lint
            .min_package_toolchain
            .unwrap_or(DEFAULT_MIN_PACKAGE_TOOLCHAIN),
        fetch_marker: lint
            .fetch_marker
            .unwrap_or_else(|| DEFAULT_FETCH_MARKER.to_string()),
        toolchain_version: lint.toolchain_version,
        config_found,
    }
}
