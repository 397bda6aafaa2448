//! Graph construction from a workspace manifest.
//!
//! Reads the manifest (TOML, or YAML by extension), resolves project and
//! file paths relative to their declaring location, caches nodes by identity,
//! computes entry nodes, and rejects dependency cycles.

use crate::error::{Error, Result};
use crate::graph::{
    BinaryOrigin, ExternalToolNode, Graph, GraphNode, NodeId, NodeKey, PackageProductNode,
    PrecompiledKind, PrecompiledNode, TargetNode,
};
use crate::models::manifest::{DependencyManifest, Manifest, SettingsManifest};
use crate::models::project::{BuildConfiguration, Configuration, Project, Settings, Target};
use crate::utils::normalize_path;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read and parse the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let src = fs::read_to_string(path).map_err(|source| Error::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&src).map_err(|source| Error::ManifestYaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&src).map_err(|source| Error::ManifestToml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the manifest at `path` and build its graph.
///
/// Precompiled binaries whose path contains `fetch_marker` are recorded as
/// fetched by the binary fetch tool.
pub fn load_graph(path: &Path, fetch_marker: &str) -> Result<Graph> {
    let manifest = read_manifest(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    build_graph(manifest, base, fetch_marker)
}

/// Build a graph from an already-parsed manifest rooted at `base`.
pub fn build_graph(manifest: Manifest, base: &Path, fetch_marker: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    // Per project: declared dependencies of each target, resolved in a
    // second pass once every target node exists.
    let mut pending: Vec<(NodeId, PathBuf, String, Vec<DependencyManifest>)> = Vec::new();
    let mut project_paths: HashSet<PathBuf> = HashSet::new();

    for pm in manifest.projects {
        let project_path = normalize_path(&base.join(&pm.path));
        let settings = match pm.settings {
            Some(s) => convert_settings(s, &project_path, &pm.name)?,
            None => Settings::default(),
        };
        let mut targets = Vec::with_capacity(pm.targets.len());
        let mut deps = Vec::with_capacity(pm.targets.len());
        for tm in pm.targets {
            let settings = match tm.settings {
                Some(s) => {
                    let owner = format!("{}/{}", pm.name, tm.name);
                    Some(convert_settings(s, &project_path, &owner)?)
                }
                None => None,
            };
            deps.push((tm.name.clone(), tm.dependencies));
            targets.push(Target {
                name: tm.name,
                platform: tm.platform,
                product: tm.product,
                bundle_id: tm.bundle_id,
                settings,
            });
        }
        project_paths.insert(project_path.clone());
        let pid = graph.add_project(Project {
            name: pm.name,
            path: project_path.clone(),
            settings,
            targets,
        });
        for (index, (name, target_deps)) in deps.into_iter().enumerate() {
            let key = Graph::target_key(&project_path, &name);
            // A repeated target name keeps the first node; the project
            // linter reports the duplicate.
            if graph.lookup(&key).is_some() {
                debug!(target = %name, "skipping duplicate target");
                continue;
            }
            let id = graph.add_node(
                key,
                GraphNode::Target(TargetNode {
                    project: pid,
                    target: index,
                    dependencies: Vec::new(),
                }),
            );
            pending.push((id, project_path.clone(), name, target_deps));
        }
    }

    let mut has_dependents: HashSet<NodeId> = HashSet::new();
    for (from, project_path, from_name, deps) in pending {
        for dep in deps {
            let to = resolve_dependency(
                &mut graph,
                &project_path,
                &from_name,
                dep,
                fetch_marker,
                &project_paths,
            )?;
            graph.add_dependency(from, to);
            has_dependents.insert(to);
        }
    }

    let entry_nodes: Vec<NodeId> = graph
        .targets()
        .map(|(id, _, _)| id)
        .filter(|id| !has_dependents.contains(id))
        .collect();
    graph.set_entry_nodes(entry_nodes);
    ensure_acyclic(&graph)?;
    debug!(
        projects = graph.projects().len(),
        nodes = graph.len(),
        entries = graph.entry_nodes().len(),
        "graph loaded"
    );
    Ok(graph)
}

fn resolve_dependency(
    graph: &mut Graph,
    project_path: &Path,
    from_name: &str,
    dep: DependencyManifest,
    fetch_marker: &str,
    project_paths: &HashSet<PathBuf>,
) -> Result<NodeId> {
    let precompiled = |graph: &mut Graph, kind: PrecompiledKind, rel: &str| {
        let path = normalize_path(&project_path.join(rel));
        let origin = if path.to_string_lossy().contains(fetch_marker) {
            BinaryOrigin::Fetched
        } else {
            BinaryOrigin::Manual
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| rel.to_string());
        graph.add_node(
            NodeKey {
                path: path.clone(),
                name,
            },
            GraphNode::Precompiled(PrecompiledNode { kind, path, origin }),
        )
    };
    let id = match dep {
        DependencyManifest::Target { target } => {
            lookup_target(graph, project_path, &target, from_name)?
        }
        DependencyManifest::Project { project, target } => {
            let other = normalize_path(&project_path.join(&project));
            if !project_paths.contains(&other) {
                return Err(Error::UnknownReference {
                    from: from_name.to_string(),
                    what: "project",
                    name: project,
                });
            }
            lookup_target(graph, &other, &target, from_name)?
        }
        DependencyManifest::Framework { framework } => {
            precompiled(graph, PrecompiledKind::Framework, &framework)
        }
        DependencyManifest::Library { library } => {
            precompiled(graph, PrecompiledKind::Library, &library)
        }
        DependencyManifest::XcFramework { xcframework } => {
            precompiled(graph, PrecompiledKind::XcFramework, &xcframework)
        }
        DependencyManifest::Package { package } => graph.add_node(
            NodeKey {
                path: PathBuf::new(),
                name: package.clone(),
            },
            GraphNode::PackageProduct(PackageProductNode { product: package }),
        ),
        DependencyManifest::CocoaPods { cocoapods } => {
            let path = normalize_path(&project_path.join(cocoapods));
            graph.add_node(
                NodeKey {
                    path: path.clone(),
                    name: "CocoaPods".into(),
                },
                GraphNode::ExternalTool(ExternalToolNode {
                    tool: "CocoaPods".into(),
                    path,
                }),
            )
        }
    };
    Ok(id)
}

fn lookup_target(graph: &Graph, project_path: &Path, target: &str, from: &str) -> Result<NodeId> {
    graph
        .lookup(&Graph::target_key(project_path, target))
        .ok_or_else(|| Error::UnknownReference {
            from: from.to_string(),
            what: "target",
            name: target.to_string(),
        })
}

fn convert_settings(sm: SettingsManifest, project_path: &Path, owner: &str) -> Result<Settings> {
    let mut configurations: BTreeMap<BuildConfiguration, Option<Configuration>> = BTreeMap::new();
    for c in sm.configurations {
        let id = BuildConfiguration {
            variant: c.variant,
            name: c.name,
        };
        if configurations.contains_key(&id) {
            return Err(Error::DuplicateConfiguration {
                owner: owner.to_string(),
                name: id.name,
            });
        }
        let configuration = if c.settings.is_none() && c.xcconfig.is_none() {
            None
        } else {
            Some(Configuration {
                settings: c.settings.unwrap_or_default(),
                xcconfig: c.xcconfig.map(|p| normalize_path(&project_path.join(p))),
            })
        };
        configurations.insert(id, configuration);
    }
    Ok(Settings::new(sm.base, configurations))
}

/// Reject graphs whose target edges form a cycle.
fn ensure_acyclic(graph: &Graph) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }
    let mut marks = vec![Mark::New; graph.len()];
    for start in graph.node_ids() {
        if marks[start.0 as usize] != Mark::New {
            continue;
        }
        // (node, next edge index)
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        marks[start.0 as usize] = Mark::Active;
        while let Some(&(node, next)) = stack.last() {
            let deps = graph.dependencies(node);
            if next >= deps.len() {
                marks[node.0 as usize] = Mark::Done;
                stack.pop();
                continue;
            }
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            let to = deps[next];
            match marks[to.0 as usize] {
                Mark::New => {
                    marks[to.0 as usize] = Mark::Active;
                    stack.push((to, 0));
                }
                Mark::Active => {
                    let pos = stack.iter().position(|(n, _)| *n == to).unwrap_or(0);
                    let mut chain: Vec<String> = stack[pos..]
                        .iter()
                        .map(|(n, _)| graph.display_name(*n).to_string())
                        .collect();
                    chain.push(graph.display_name(to).to_string());
                    return Err(Error::DependencyCycle { chain });
                }
                Mark::Done => {}
            }
        }
    }
    Ok(())
}
