//! Graph lint runner.
//!
//! [`GraphLinter::lint`] is a pure pass over a constructed graph. It
//! concatenates, in order:
//! - per-project structural issues (delegated to a [`ProjectLinter`]);
//! - dependency issues: link compatibility and static duplication found by
//!   the traversal, then package toolchain support and binary existence;
//! - cross-project configuration consistency;
//! - watch app / extension bundle identifier nesting.
//!
//! No check short-circuits another; the graph is never mutated.

pub mod environment;
pub mod matrix;
pub mod project;
pub mod traversal;
pub mod workspace;

use crate::env::{FileSystem, ProjectLinter, Toolchain};
use crate::graph::Graph;
use crate::models::{LintResult, LintingIssue};
use std::path::PathBuf;
use tracing::debug;
use traversal::TraversalContext;

pub const DEFAULT_MIN_PACKAGE_TOOLCHAIN: u32 = 13;
pub const DEFAULT_FETCH_MARKER: &str = "Carthage/Build";

#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Minimum toolchain major version when package products are present.
    pub min_package_toolchain: u32,
    /// Paths in messages are shown relative to this directory.
    pub root: Option<PathBuf>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            min_package_toolchain: DEFAULT_MIN_PACKAGE_TOOLCHAIN,
            root: None,
        }
    }
}

pub struct GraphLinter<'a> {
    project_linter: &'a dyn ProjectLinter,
    fs: &'a dyn FileSystem,
    toolchain: &'a dyn Toolchain,
    options: LintOptions,
}

impl<'a> GraphLinter<'a> {
    pub fn new(
        project_linter: &'a dyn ProjectLinter,
        fs: &'a dyn FileSystem,
        toolchain: &'a dyn Toolchain,
        options: LintOptions,
    ) -> Self {
        Self {
            project_linter,
            fs,
            toolchain,
            options,
        }
    }

    /// Run every check over `graph`.
    pub fn lint(&self, graph: &Graph) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for project in graph.projects() {
            issues.extend(self.project_linter.lint(project));
        }
        issues.extend(self.lint_dependencies(graph));
        issues.extend(workspace::lint_configurations(graph));
        issues.extend(workspace::lint_watch_bundle_ids(graph));
        debug!(issues = issues.len(), "graph lint finished");
        issues
    }

    /// Same as [`lint`](Self::lint), wrapped with a summary.
    pub fn run(&self, graph: &Graph) -> LintResult {
        let issues = self.lint(graph);
        let targets = graph.targets().count();
        LintResult::new(issues, graph.projects().len(), targets)
    }

    fn lint_dependencies(&self, graph: &Graph) -> Vec<LintingIssue> {
        let mut ctx = TraversalContext::default();
        let mut issues = traversal::lint_dependencies(graph, &mut ctx);
        debug!(
            visited = ctx.visited.len(),
            static_products = ctx.static_links.len(),
            "dependency traversal done"
        );
        issues.extend(environment::lint_package_toolchain(
            graph,
            self.toolchain,
            self.options.min_package_toolchain,
        ));
        issues.extend(environment::lint_binaries(
            graph,
            self.fs,
            self.options.root.as_deref(),
        ));
        issues
    }
}

#[cfg(test)]
mod tests;
