//! Dependency graph data structures.
//!
//! A [`Graph`] owns the projects it was built from and a dense, `u32`-indexed
//! list of [`GraphNode`]s. Node identity is the `(path, name)` pair held in
//! [`NodeKey`]; the loader guarantees each identity appears once. Only target
//! nodes carry outgoing edges.

use crate::models::project::{Product, Project, Target};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ProjectId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Node identity: filesystem path plus name.
pub struct NodeKey {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecompiledKind {
    Framework,
    Library,
    XcFramework,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a precompiled binary comes from.
pub enum BinaryOrigin {
    /// Produced by a binary fetch tool; may simply not be fetched yet.
    Fetched,
    /// Checked in or built by hand.
    Manual,
}

#[derive(Debug, Clone)]
pub struct TargetNode {
    pub project: ProjectId,
    /// Index into the owning project's `targets`.
    pub target: usize,
    pub dependencies: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PrecompiledNode {
    pub kind: PrecompiledKind,
    pub path: PathBuf,
    pub origin: BinaryOrigin,
}

#[derive(Debug, Clone)]
/// A product supplied by an external package. Always linked statically.
pub struct PackageProductNode {
    pub product: String,
}

#[derive(Debug, Clone)]
/// Output of an external dependency manager; only its path matters.
pub struct ExternalToolNode {
    pub tool: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum GraphNode {
    Target(TargetNode),
    Precompiled(PrecompiledNode),
    PackageProduct(PackageProductNode),
    ExternalTool(ExternalToolNode),
}

#[derive(Debug, Default)]
pub struct Graph {
    projects: Vec<Project>,
    nodes: Vec<GraphNode>,
    keys: Vec<NodeKey>,
    key_to_id: HashMap<NodeKey, NodeId>,
    entry_nodes: Vec<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn add_project(&mut self, project: Project) -> ProjectId {
        let id = ProjectId(self.projects.len() as u32);
        self.projects.push(project);
        id
    }

    /// Insert a node, returning the existing id when the identity is
    /// already present.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_node(&mut self, key: NodeKey, node: GraphNode) -> NodeId {
        if let Some(&id) = self.key_to_id.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.keys.push(key.clone());
        self.key_to_id.insert(key, id);
        id
    }

    /// Append an edge. No-op unless `from` is a target node.
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId) {
        if let GraphNode::Target(t) = &mut self.nodes[from.0 as usize] {
            if !t.dependencies.contains(&to) {
                t.dependencies.push(to);
            }
        }
    }

    pub fn set_entry_nodes(&mut self, entry_nodes: Vec<NodeId>) {
        self.entry_nodes = entry_nodes;
    }

    pub fn entry_nodes(&self) -> &[NodeId] {
        &self.entry_nodes
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0 as usize]
    }

    pub fn key(&self, id: NodeId) -> &NodeKey {
        &self.keys[id.0 as usize]
    }

    pub fn lookup(&self, key: &NodeKey) -> Option<NodeId> {
        self.key_to_id.get(key).copied()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn project(&self, id: ProjectId) -> &Project {
        &self.projects[id.0 as usize]
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Outgoing edges of a node; empty for anything but targets.
    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            GraphNode::Target(t) => &t.dependencies,
            _ => &[],
        }
    }

    /// The project and target descriptor behind a target node.
    pub fn target(&self, id: NodeId) -> Option<(&Project, &Target)> {
        match self.node(id) {
            GraphNode::Target(t) => {
                let project = self.project(t.project);
                project.targets.get(t.target).map(|target| (project, target))
            }
            _ => None,
        }
    }

    /// All target nodes, in insertion order.
    pub fn targets(&self) -> impl Iterator<Item = (NodeId, &Project, &Target)> {
        self.node_ids()
            .filter_map(move |id| self.target(id).map(|(p, t)| (id, p, t)))
    }

    /// Direct target dependencies of `id` producing `product`.
    pub fn target_dependencies(&self, id: NodeId, product: Product) -> Vec<NodeId> {
        self.dependencies(id)
            .iter()
            .copied()
            .filter(|&dep| matches!(self.target(dep), Some((_, t)) if t.product == product))
            .collect()
    }

    pub fn package_products(&self) -> impl Iterator<Item = (NodeId, &PackageProductNode)> {
        self.node_ids().filter_map(move |id| match self.node(id) {
            GraphNode::PackageProduct(p) => Some((id, p)),
            _ => None,
        })
    }

    pub fn precompiled(&self) -> impl Iterator<Item = (NodeId, &PrecompiledNode)> {
        self.node_ids().filter_map(move |id| match self.node(id) {
            GraphNode::Precompiled(p) => Some((id, p)),
            _ => None,
        })
    }

    pub fn external_tools(&self) -> impl Iterator<Item = (NodeId, &ExternalToolNode)> {
        self.node_ids().filter_map(move |id| match self.node(id) {
            GraphNode::ExternalTool(e) => Some((id, e)),
            _ => None,
        })
    }

    /// Human-readable node name for messages.
    pub fn display_name(&self, id: NodeId) -> &str {
        &self.key(id).name
    }

    /// Identity of a target node inside `project_path`.
    pub fn target_key(project_path: &Path, name: &str) -> NodeKey {
        NodeKey {
            path: project_path.to_path_buf(),
            name: name.to_string(),
        }
    }
}
