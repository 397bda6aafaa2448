//! Cross-project checks: configuration consistency and watch bundle
//! identifier nesting.

use crate::graph::Graph;
use crate::models::project::{BuildConfiguration, Product, Variant};
use crate::models::LintingIssue;
use std::collections::{BTreeSet, HashMap, HashSet};

pub const RULE_CONFIGURATIONS: &str = "configurations";
pub const RULE_WATCH_BUNDLE_ID: &str = "watch-bundle-id";

/// Names shared by configurations of different variants across `a` and `b`.
fn ambiguous<'a>(
    a: &BTreeSet<&'a BuildConfiguration>,
    b: &BTreeSet<&'a BuildConfiguration>,
) -> HashSet<&'a str> {
    let mut variants: HashMap<&str, Variant> = HashMap::new();
    let mut out = HashSet::new();
    for c in a.iter().chain(b.iter()) {
        match variants.insert(c.name.as_str(), c.variant) {
            Some(v) if v != c.variant => {
                out.insert(c.name.as_str());
            }
            _ => {}
        }
    }
    out
}

fn names(configs: &BTreeSet<&BuildConfiguration>, ambiguous: &HashSet<&str>) -> String {
    let list: Vec<String> = configs
        .iter()
        .map(|c| {
            if ambiguous.contains(c.name.as_str()) {
                format!("{} ({})", c.name, c.variant)
            } else {
                c.name.clone()
            }
        })
        .collect();
    format!("[{}]", list.join(", "))
}

/// Every project must declare the union of the configurations declared by
/// the projects owning the entry nodes.
pub fn lint_configurations(graph: &Graph) -> Vec<LintingIssue> {
    let known: BTreeSet<&BuildConfiguration> = graph
        .entry_nodes()
        .iter()
        .filter_map(|&id| graph.target(id))
        .flat_map(|(project, _)| project.settings.build_configurations())
        .collect();
    graph
        .projects()
        .iter()
        .filter_map(|project| {
            let own: BTreeSet<&BuildConfiguration> =
                project.settings.build_configurations().collect();
            if own.is_superset(&known) {
                return None;
            }
            let ambiguous = ambiguous(&own, &known);
            Some(LintingIssue::warning(
                RULE_CONFIGURATIONS,
                format!(
                    "The project '{}' has missing or mismatching configurations. It has {}, other projects have {}",
                    project.name,
                    names(&own, &ambiguous),
                    names(&known, &ambiguous)
                ),
            ))
        })
        .collect()
}

/// Watch apps embedded in an app must prefix their bundle id with the app's,
/// and watch extensions with their watch app's.
pub fn lint_watch_bundle_ids(graph: &Graph) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    for (app_id, _, app) in graph.targets() {
        if app.product != Product::App {
            continue;
        }
        for watch_id in graph.target_dependencies(app_id, Product::Watch2App) {
            let Some((_, watch)) = graph.target(watch_id) else {
                continue;
            };
            if !watch.bundle_id.starts_with(&app.bundle_id) {
                issues.push(LintingIssue::error(
                    RULE_WATCH_BUNDLE_ID,
                    format!(
                        "Watch app '{}' bundleId: {} isn't prefixed with its parent's app '{}' bundleId '{}'",
                        watch.name, watch.bundle_id, app.name, app.bundle_id
                    ),
                ));
            }
            for ext_id in graph.target_dependencies(watch_id, Product::Watch2Extension) {
                let Some((_, ext)) = graph.target(ext_id) else {
                    continue;
                };
                if !ext.bundle_id.starts_with(&watch.bundle_id) {
                    issues.push(LintingIssue::error(
                        RULE_WATCH_BUNDLE_ID,
                        format!(
                            "Watch extension '{}' bundleId: {} isn't prefixed with its parent's watch app '{}' bundleId '{}'",
                            ext.name, ext.bundle_id, watch.name, watch.bundle_id
                        ),
                    ));
                }
            }
        }
    }
    issues
}
