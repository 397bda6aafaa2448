//! Output rendering for lint and settings commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::models::project::{BuildConfiguration, SettingsDictionary};
use crate::models::{LintResult, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::collections::BTreeMap;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print lint results in the requested format.
pub fn print_lint(res: &LintResult, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(res)).unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for is in &res.issues {
                let (icon, sev) = match is.severity {
                    Severity::Error => ("✖", "⟦error⟧"),
                    Severity::Warning => ("▲", "⟦warn⟧"),
                };
                let (icon, sev) = if !color {
                    (icon.to_string(), sev.to_string())
                } else if is.severity == Severity::Error {
                    (icon.red().to_string(), sev.red().bold().to_string())
                } else {
                    (icon.yellow().to_string(), sev.yellow().bold().to_string())
                };
                println!("{} {} ❲{}❳ — {}", icon, sev, is.rule, is.reason);
            }
            let summary = format!(
                "— Summary — errors={} warnings={} projects={} targets={}",
                res.summary.errors, res.summary.warnings, res.summary.projects, res.summary.targets
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print resolved settings, one block per configuration.
pub fn print_settings(
    owner: &str,
    resolved: &BTreeMap<BuildConfiguration, SettingsDictionary>,
    output: &str,
) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_settings_json(owner, resolved))
                .unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for (config, settings) in resolved {
                let header = format!("— {} [{}] —", owner, config.name);
                if color {
                    println!("{}", header.cyan().bold());
                } else {
                    println!("{}", header);
                }
                if settings.is_empty() {
                    println!("  (no settings)");
                }
                for (k, v) in settings {
                    println!("  {} = {}", k, v);
                }
            }
        }
    }
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(res: &LintResult) -> JsonVal {
    serde_json::to_value(res).unwrap_or(JsonVal::Null)
}

/// Compose settings JSON object (pure) for testing/snapshot purposes.
pub fn compose_settings_json(
    owner: &str,
    resolved: &BTreeMap<BuildConfiguration, SettingsDictionary>,
) -> JsonVal {
    let configurations: Vec<_> = resolved
        .iter()
        .map(|(config, settings)| {
            json!({
                "name": config.name,
                "variant": config.variant,
                "settings": settings,
            })
        })
        .collect();
    json!({"owner": owner, "configurations": configurations})
}
