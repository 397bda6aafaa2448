//! Graph-wide environment checks: toolchain support for package products
//! and existence of precompiled binaries and external-tool outputs.

use crate::env::{FileSystem, Toolchain};
use crate::graph::{BinaryOrigin, Graph, PrecompiledKind};
use crate::models::LintingIssue;
use crate::utils::display_path;
use std::path::Path;
use tracing::debug;

pub const RULE_PACKAGES: &str = "package-toolchain";
pub const RULE_BINARIES: &str = "binary-exists";
pub const RULE_EXTERNAL: &str = "external-dependency-exists";

/// Package products need a toolchain of at least `min_major`.
///
/// No-op when the graph has no package products; a failed toolchain query
/// becomes a single error and ends this check.
pub fn lint_package_toolchain(
    graph: &Graph,
    toolchain: &dyn Toolchain,
    min_major: u32,
) -> Vec<LintingIssue> {
    if graph.package_products().next().is_none() {
        return Vec::new();
    }
    let version = match toolchain.selected_version() {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "toolchain query failed");
            return vec![LintingIssue::error(
                RULE_PACKAGES,
                "Could not determine the selected toolchain version",
            )];
        }
    };
    if version.major < min_major {
        return vec![LintingIssue::error(
            RULE_PACKAGES,
            format!(
                "The project contains package dependencies but the selected toolchain version is not compatible. Need at least {min_major} but got {version}"
            ),
        )];
    }
    Vec::new()
}

/// Missing fetched binaries are warnings (not fetched yet); anything else
/// missing is an error.
pub fn lint_binaries(graph: &Graph, fs: &dyn FileSystem, root: Option<&Path>) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for (_, node) in graph.precompiled() {
        if fs.exists(&node.path) {
            continue;
        }
        let what = match node.kind {
            PrecompiledKind::Framework => "Framework",
            PrecompiledKind::Library => "Library",
            PrecompiledKind::XcFramework => "XCFramework",
        };
        let shown = display_path(&node.path, root);
        issues.push(match node.origin {
            BinaryOrigin::Fetched => LintingIssue::warning(
                RULE_BINARIES,
                format!(
                    "{what} not found at path {shown}. The path might be wrong or the binary dependencies have not been fetched"
                ),
            ),
            BinaryOrigin::Manual => LintingIssue::error(
                RULE_BINARIES,
                format!("{what} not found at path {shown}"),
            ),
        });
    }
    for (_, node) in graph.external_tools() {
        if !fs.exists(&node.path) {
            issues.push(LintingIssue::error(
                RULE_EXTERNAL,
                format!(
                    "{} dependency couldn't be found at path {}",
                    node.tool,
                    display_path(&node.path, root)
                ),
            ));
        }
    }
    issues
}
