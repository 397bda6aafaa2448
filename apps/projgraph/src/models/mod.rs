//! Shared data models for lint output plus the project and manifest modules.

pub mod manifest;
pub mod project;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Issue severity. Errors abort generation upstream; warnings are advisory.
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single lint finding: the rule that produced it, a human-readable
/// reason, and a severity.
pub struct LintingIssue {
    pub rule: &'static str,
    pub reason: String,
    pub severity: Severity,
}

impl LintingIssue {
    pub fn error(rule: &'static str, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(rule: &'static str, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub projects: usize,
    pub targets: usize,
}

#[derive(Debug, Serialize)]
/// Lint results container.
pub struct LintResult {
    pub issues: Vec<LintingIssue>,
    pub summary: Summary,
}

impl LintResult {
    /// Wrap issues with severity counts and graph size.
    pub fn new(issues: Vec<LintingIssue>, projects: usize, targets: usize) -> Self {
        let errors = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        let warnings = issues.len() - errors;
        Self {
            issues,
            summary: Summary {
                errors,
                warnings,
                projects,
                targets,
            },
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}
