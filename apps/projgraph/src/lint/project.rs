//! Default per-project structural rules.

use crate::env::{FileSystem, ProjectLinter};
use crate::models::project::{Project, Settings, Target};
use crate::models::LintingIssue;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const RULE_DUPLICATE_TARGET: &str = "duplicate-target";
pub const RULE_BUNDLE_ID: &str = "bundle-id";
pub const RULE_XCCONFIG: &str = "xcconfig-exists";
pub const RULE_NO_CONFIGURATIONS: &str = "no-configurations";

fn build_variable_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\([^)]*\)|\$\{[^}]*\}").expect("valid variable regex"))
}

fn bundle_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9.\-]*$").expect("valid bundle id regex"))
}

/// Duplicate targets, malformed bundle identifiers, missing xcconfig files,
/// and settings without configurations.
pub struct StructureLinter<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> StructureLinter<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    fn lint_settings(&self, owner: &str, settings: &Settings, issues: &mut Vec<LintingIssue>) {
        if settings.configurations.is_empty() {
            issues.push(LintingIssue::warning(
                RULE_NO_CONFIGURATIONS,
                format!("{owner} declares settings without any configuration"),
            ));
        }
        for (config, entry) in &settings.configurations {
            let Some(path) = entry.as_ref().and_then(|c| c.xcconfig.as_ref()) else {
                continue;
            };
            if !self.fs.exists(path) {
                issues.push(LintingIssue::error(
                    RULE_XCCONFIG,
                    format!(
                        "Configuration file not found at path {} ({owner}, configuration {config})",
                        path.display()
                    ),
                ));
            }
        }
    }

    fn lint_target(&self, target: &Target, issues: &mut Vec<LintingIssue>) {
        if target.bundle_id.trim().is_empty() {
            issues.push(LintingIssue::error(
                RULE_BUNDLE_ID,
                format!("The bundle identifier of target '{}' is empty", target.name),
            ));
        } else {
            let stripped = build_variable_re().replace_all(&target.bundle_id, "");
            if !bundle_id_re().is_match(&stripped) {
                issues.push(LintingIssue::error(
                    RULE_BUNDLE_ID,
                    format!(
                        "Invalid bundle identifier '{}' for target '{}'. It must contain only alphanumeric characters (A-Z, a-z, 0-9), hyphens (-), and periods (.)",
                        target.bundle_id, target.name
                    ),
                ));
            }
        }
        if let Some(settings) = target.settings.as_ref() {
            self.lint_settings(&format!("Target '{}'", target.name), settings, issues);
        }
    }
}

impl ProjectLinter for StructureLinter<'_> {
    fn lint(&self, project: &Project) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in &project.targets {
            *counts.entry(t.name.as_str()).or_default() += 1;
        }
        let mut duplicates: Vec<&str> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name)
            .collect();
        duplicates.sort_unstable();
        if !duplicates.is_empty() {
            issues.push(LintingIssue::error(
                RULE_DUPLICATE_TARGET,
                format!(
                    "Targets {} from project at {} have duplicates.",
                    duplicates.join(", "),
                    project.path.display()
                ),
            ));
        }
        self.lint_settings(
            &format!("Project '{}'", project.name),
            &project.settings,
            &mut issues,
        );
        for target in &project.targets {
            self.lint_target(target, &mut issues);
        }
        issues
    }
}
