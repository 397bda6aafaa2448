use super::*;
use crate::env::{FixedToolchain, Version};
use crate::loader::build_graph;
use crate::models::project::Project;
use crate::models::Severity;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use traversal::{RULE_LINK, RULE_STATIC_DUPLICATE};

struct FakeFs(HashSet<PathBuf>);

impl FileSystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.0.contains(path)
    }
}

struct NoProjectIssues;

impl ProjectLinter for NoProjectIssues {
    fn lint(&self, _project: &Project) -> Vec<LintingIssue> {
        Vec::new()
    }
}

struct OnePerProject;

impl ProjectLinter for OnePerProject {
    fn lint(&self, project: &Project) -> Vec<LintingIssue> {
        vec![LintingIssue::warning("stub", project.name.clone())]
    }
}

fn graph(src: &str) -> Graph {
    let manifest = toml::from_str(src).unwrap();
    build_graph(manifest, Path::new("/ws"), DEFAULT_FETCH_MARKER).unwrap()
}

fn lint_with(g: &Graph, fs: &FakeFs, toolchain: Option<Version>) -> Vec<LintingIssue> {
    let tc = FixedToolchain(toolchain);
    GraphLinter::new(&NoProjectIssues, fs, &tc, LintOptions::default()).lint(g)
}

fn lint(g: &Graph) -> Vec<LintingIssue> {
    lint_with(g, &FakeFs(HashSet::new()), Some(Version::new(15, 0, 0)))
}

fn by_rule<'a>(issues: &'a [LintingIssue], rule: &str) -> Vec<&'a LintingIssue> {
    issues.iter().filter(|i| i.rule == rule).collect()
}

#[test]
fn test_unsupported_source_is_error() {
    let g = graph(
        r#"
[[projects]]
name = "W"
path = "W"
[[projects.targets]]
name = "WatchThing"
platform = "watchos"
product = "app"
bundle_id = "com.w"
dependencies = [{ target = "Kit" }]
[[projects.targets]]
name = "Kit"
platform = "watchos"
product = "framework"
bundle_id = "com.w.kit"
"#,
    );
    let issues = lint(&g);
    let link = by_rule(&issues, RULE_LINK);
    assert_eq!(link.len(), 1);
    assert_eq!(link[0].severity, Severity::Error);
    assert!(link[0]
        .reason
        .contains("WatchThing has platform 'watchOS' and product 'app'"));
}

#[test]
fn test_dynamic_library_depending_on_framework_is_error() {
    let g = graph(
        r#"
[[projects]]
name = "P"
path = "P"
[[projects.targets]]
name = "Dylib"
platform = "ios"
product = "dynamic_library"
bundle_id = "com.p.dylib"
dependencies = [{ target = "Kit" }]
[[projects.targets]]
name = "Kit"
platform = "ios"
product = "framework"
bundle_id = "com.p.kit"
"#,
    );
    let issues = lint(&g);
    let link = by_rule(&issues, RULE_LINK);
    assert_eq!(link.len(), 1);
    assert!(link[0]
        .reason
        .contains("Dylib has a dependency with target Kit of type framework for platform 'iOS'"));
}

#[test]
fn test_ios_app_embedding_watch_app_is_clean() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ target = "WatchApp" }]
[[projects.targets]]
name = "WatchApp"
platform = "watchos"
product = "watch2_app"
bundle_id = "com.app.watch"
dependencies = [{ target = "WatchExt" }]
[[projects.targets]]
name = "WatchExt"
platform = "watchos"
product = "watch2_extension"
bundle_id = "com.app.watch.ext"
"#,
    );
    assert!(lint(&g).is_empty());
}

const STATIC_FIXTURE: &str = r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [DEPS]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "static_library"
bundle_id = "com.app.lib"
dependencies = [{ target = "F" }]
[[projects.targets]]
name = "F"
platform = "ios"
product = "static_framework"
bundle_id = "com.app.f"
"#;

#[test]
fn test_static_product_linked_twice_warns_once_against_app() {
    let g = graph(&STATIC_FIXTURE.replace("DEPS", r#"{ target = "F" }, { target = "Lib" }"#));
    let issues = lint(&g);
    let dup = by_rule(&issues, RULE_STATIC_DUPLICATE);
    assert_eq!(dup.len(), 1);
    assert_eq!(dup[0].severity, Severity::Warning);
    assert!(dup[0].reason.contains("Target F has been linked from App and Lib"));
    assert!(by_rule(&issues, RULE_LINK).is_empty());
}

// Blame goes to whichever consumer was recorded first, even when a later
// consumer links the product more directly.
#[test]
fn test_static_duplicate_blames_first_recorded_consumer() {
    let g = graph(&STATIC_FIXTURE.replace("DEPS", r#"{ target = "Lib" }, { target = "F" }"#));
    let issues = lint(&g);
    let dup = by_rule(&issues, RULE_STATIC_DUPLICATE);
    assert_eq!(dup.len(), 1);
    assert!(dup[0].reason.contains("Target F has been linked from Lib and App"));
}

#[test]
fn test_unrelated_apps_sharing_static_product_warn_once() {
    let g = graph(
        r#"
[[projects]]
name = "One"
path = "One"
[[projects.targets]]
name = "AppOne"
platform = "ios"
product = "app"
bundle_id = "com.one"
dependencies = [{ project = "../Shared", target = "Core" }, { package = "Lottie" }]

[[projects]]
name = "Two"
path = "Two"
[[projects.targets]]
name = "AppTwo"
platform = "ios"
product = "app"
bundle_id = "com.two"
dependencies = [{ project = "../Shared", target = "Core" }, { package = "Lottie" }]
[[projects.targets]]
name = "Resources"
platform = "ios"
product = "bundle"
bundle_id = "com.two.res"

[[projects]]
name = "Shared"
path = "Shared"
[[projects.targets]]
name = "Core"
platform = "ios"
product = "static_framework"
bundle_id = "com.shared.core"
"#,
    );
    let issues = lint(&g);
    let dup = by_rule(&issues, RULE_STATIC_DUPLICATE);
    assert_eq!(dup.len(), 2, "{dup:?}");
    assert!(dup[0].reason.contains("Target Core has been linked from AppOne and AppTwo"));
    assert!(dup[1].reason.contains("Target Lottie has been linked from AppOne and AppTwo"));
}

#[test]
fn test_single_consumer_behind_test_bundle_is_clean() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ target = "Lib" }]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "static_library"
bundle_id = "com.app.lib"
[[projects.targets]]
name = "Tests"
platform = "ios"
product = "unit_tests"
bundle_id = "com.app.tests"
dependencies = [{ target = "App" }]
"#,
    );
    // Tests -> App -> Lib: only one consumer of Lib.
    assert!(lint(&g).is_empty());
}

#[test]
fn test_diamond_node_is_evaluated_once() {
    let g = graph(
        r#"
[[projects]]
name = "P"
path = "P"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.p"
dependencies = [{ target = "A" }, { target = "B" }]
[[projects.targets]]
name = "A"
platform = "ios"
product = "framework"
bundle_id = "com.p.a"
dependencies = [{ target = "Dylib" }]
[[projects.targets]]
name = "B"
platform = "ios"
product = "framework"
bundle_id = "com.p.b"
dependencies = [{ target = "Dylib" }]
[[projects.targets]]
name = "Dylib"
platform = "ios"
product = "dynamic_library"
bundle_id = "com.p.dylib"
dependencies = [{ target = "Kit" }]
[[projects.targets]]
name = "Kit"
platform = "ios"
product = "framework"
bundle_id = "com.p.kit"
"#,
    );
    let issues = lint(&g);
    let link = by_rule(&issues, RULE_LINK);
    // A -> Dylib and B -> Dylib are both invalid; Dylib -> Kit once.
    assert_eq!(link.len(), 3, "{link:?}");
    assert_eq!(
        link.iter()
            .filter(|i| i.reason.starts_with("Target Dylib has a dependency with target Kit"))
            .count(),
        1
    );
}

#[test]
fn test_missing_configuration_in_other_project_warns() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[projects.settings]
configurations = [{ name = "Debug", variant = "debug" }]
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ project = "../Lib", target = "Lib" }]

[[projects]]
name = "Lib"
path = "Lib"
[projects.settings]
configurations = [{ name = "Release", variant = "release" }]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "framework"
bundle_id = "com.lib"
"#,
    );
    let issues = lint(&g);
    let cfg = by_rule(&issues, workspace::RULE_CONFIGURATIONS);
    assert_eq!(cfg.len(), 1);
    assert_eq!(cfg[0].severity, Severity::Warning);
    assert!(cfg[0].reason.contains("'Lib'"));
    assert!(cfg[0].reason.contains("It has [Release], other projects have [Debug]"));
}

#[test]
fn test_superset_configurations_are_accepted() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ project = "../Lib", target = "Lib" }]

[[projects]]
name = "Lib"
path = "Lib"
[projects.settings]
configurations = [
  { name = "Debug", variant = "debug" },
  { name = "Release", variant = "release" },
  { name = "Beta", variant = "release" },
]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "framework"
bundle_id = "com.lib"
"#,
    );
    assert!(by_rule(&lint(&g), workspace::RULE_CONFIGURATIONS).is_empty());
}

#[test]
fn test_configuration_with_other_variant_names_both_variants() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[projects.settings]
configurations = [
  { name = "Debug", variant = "debug" },
  { name = "Release", variant = "release" },
]
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ project = "../Lib", target = "Lib" }]

[[projects]]
name = "Lib"
path = "Lib"
[projects.settings]
configurations = [
  { name = "Debug", variant = "release" },
  { name = "Release", variant = "release" },
]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "framework"
bundle_id = "com.lib"
"#,
    );
    let issues = lint(&g);
    let cfg = by_rule(&issues, workspace::RULE_CONFIGURATIONS);
    assert_eq!(cfg.len(), 1);
    assert!(cfg[0].reason.contains(
        "It has [Debug (release), Release], other projects have [Debug (debug), Release]"
    ));
}

#[test]
fn test_watch_bundle_ids_must_nest() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ target = "WatchApp" }]
[[projects.targets]]
name = "WatchApp"
platform = "watchos"
product = "watch2_app"
bundle_id = "com.other"
dependencies = [{ target = "WatchExt" }]
[[projects.targets]]
name = "WatchExt"
platform = "watchos"
product = "watch2_extension"
bundle_id = "com.app.watch.ext"
"#,
    );
    let issues = lint(&g);
    let watch = by_rule(&issues, workspace::RULE_WATCH_BUNDLE_ID);
    assert_eq!(watch.len(), 2, "{watch:?}");
    assert!(watch[0]
        .reason
        .contains("Watch app 'WatchApp' bundleId: com.other isn't prefixed with its parent's app 'App' bundleId 'com.app'"));
    // The extension is checked against the watch app, not the iOS app.
    assert!(watch[1].reason.contains("Watch extension 'WatchExt'"));
    assert!(watch.iter().all(|i| i.severity == Severity::Error));
}

const PACKAGE_FIXTURE: &str = r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ package = "Alamofire" }]
"#;

#[test]
fn test_package_toolchain_checks() {
    let g = graph(PACKAGE_FIXTURE);
    let fs = FakeFs(HashSet::new());

    let ok = lint_with(&g, &fs, Some(Version::new(13, 0, 0)));
    assert!(by_rule(&ok, environment::RULE_PACKAGES).is_empty());

    let old = lint_with(&g, &fs, Some(Version::new(12, 4, 0)));
    let old = by_rule(&old, environment::RULE_PACKAGES);
    assert_eq!(old.len(), 1);
    assert!(old[0].reason.contains("Need at least 13 but got 12.4.0"));

    let unknown = lint_with(&g, &fs, None);
    let unknown = by_rule(&unknown, environment::RULE_PACKAGES);
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].reason.contains("Could not determine"));
}

#[test]
fn test_toolchain_not_queried_without_packages() {
    let g = graph(&PACKAGE_FIXTURE.replace(r#"{ package = "Alamofire" }"#, ""));
    let issues = lint_with(&g, &FakeFs(HashSet::new()), None);
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn test_binary_existence_severity_depends_on_origin() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [
  { framework = "../Carthage/Build/iOS/Rx.framework" },
  { framework = "Vendor/Manual.framework" },
  { library = "Vendor/libpresent.a" },
  { cocoapods = "." },
]
"#,
    );
    let fs = FakeFs([PathBuf::from("/ws/App/Vendor/libpresent.a")].into_iter().collect());
    let tc = FixedToolchain(None);
    let options = LintOptions {
        root: Some(PathBuf::from("/ws")),
        ..LintOptions::default()
    };
    let issues = GraphLinter::new(&NoProjectIssues, &fs, &tc, options).lint(&g);
    let bins = by_rule(&issues, environment::RULE_BINARIES);
    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].severity, Severity::Warning);
    assert!(bins[0].reason.contains("Carthage/Build/iOS/Rx.framework"));
    assert_eq!(bins[1].severity, Severity::Error);
    assert_eq!(
        bins[1].reason,
        "Framework not found at path App/Vendor/Manual.framework"
    );
    let pods = by_rule(&issues, environment::RULE_EXTERNAL);
    assert_eq!(pods.len(), 1);
    assert_eq!(pods[0].severity, Severity::Error);
}

#[test]
fn test_checks_are_concatenated_in_order() {
    let g = graph(
        r#"
[[projects]]
name = "App"
path = "App"
[projects.settings]
configurations = [{ name = "Debug", variant = "debug" }]
[[projects.targets]]
name = "App"
platform = "ios"
product = "app"
bundle_id = "com.app"
dependencies = [{ target = "Dylib" }, { project = "../Lib", target = "Lib" }, { target = "WatchApp" }]
[[projects.targets]]
name = "Dylib"
platform = "ios"
product = "dynamic_library"
bundle_id = "com.app.dylib"
dependencies = [{ target = "Kit" }]
[[projects.targets]]
name = "Kit"
platform = "ios"
product = "framework"
bundle_id = "com.app.kit"
[[projects.targets]]
name = "WatchApp"
platform = "watchos"
product = "watch2_app"
bundle_id = "com.elsewhere"

[[projects]]
name = "Lib"
path = "Lib"
[projects.settings]
configurations = [{ name = "Release", variant = "release" }]
[[projects.targets]]
name = "Lib"
platform = "ios"
product = "framework"
bundle_id = "com.lib"
"#,
    );
    let fs = FakeFs(HashSet::new());
    let tc = FixedToolchain(None);
    let linter = GraphLinter::new(&OnePerProject, &fs, &tc, LintOptions::default());
    let issues = linter.lint(&g);
    let rules: Vec<&str> = issues.iter().map(|i| i.rule).collect();
    assert_eq!(
        rules,
        [
            "stub",
            "stub",
            RULE_LINK,
            workspace::RULE_CONFIGURATIONS,
            workspace::RULE_WATCH_BUNDLE_ID
        ]
    );
    // Deterministic for a given graph.
    assert_eq!(linter.lint(&g), issues);

    let res = linter.run(&g);
    assert_eq!(res.summary.projects, 2);
    assert_eq!(res.summary.targets, 5);
    assert_eq!(res.summary.errors, 2);
    assert_eq!(res.summary.warnings, 3);
}
