//! Depth-first walk over the graph from its entry nodes, applying the
//! per-edge link rules.
//!
//! The walk is an explicit stack of `(node, next edge)` frames. The visited
//! set and the static-link registry live in [`TraversalContext`] and span
//! every entry node of one lint run, so each node is evaluated once.

use super::matrix::{check_link, LinkCheck, LintableTarget};
use crate::graph::{Graph, GraphNode, NodeId};
use crate::models::LintingIssue;
use std::collections::{HashMap, HashSet};

pub const RULE_LINK: &str = "link-compatibility";
pub const RULE_STATIC_DUPLICATE: &str = "static-duplicate";

/// Records, per static destination, the first consumer that linked it.
///
/// Keyed by destination only: a second consumer never replaces the first.
#[derive(Debug, Default)]
pub struct StaticLinkRegistry {
    first_linker: HashMap<NodeId, NodeId>,
}

impl StaticLinkRegistry {
    /// Record that `consumer` links `destination`.
    ///
    /// Returns `Some(first)` when `destination` was already recorded, where
    /// `first` is the consumer that was recorded for it originally.
    pub fn insert(&mut self, destination: NodeId, consumer: NodeId) -> Option<NodeId> {
        match self.first_linker.get(&destination) {
            Some(&first) => Some(first),
            None => {
                self.first_linker.insert(destination, consumer);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.first_linker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_linker.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TraversalContext {
    pub visited: HashSet<NodeId>,
    pub static_links: StaticLinkRegistry,
}

struct Frame {
    node: NodeId,
    next: usize,
}

/// Walk the graph from every entry node and lint each edge once.
pub fn lint_dependencies(graph: &Graph, ctx: &mut TraversalContext) -> Vec<LintingIssue> {
    let mut issues = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    for &entry in graph.entry_nodes() {
        if !ctx.visited.insert(entry) {
            continue;
        }
        stack.push(Frame {
            node: entry,
            next: 0,
        });
        while let Some(frame) = stack.last_mut() {
            let deps = graph.dependencies(frame.node);
            let Some(&to) = deps.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let from = frame.node;
            issues.extend(lint_edge(graph, from, to, &mut ctx.static_links));
            if ctx.visited.insert(to) {
                stack.push(Frame { node: to, next: 0 });
            }
        }
    }
    issues
}

fn lint_edge(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    static_links: &mut StaticLinkRegistry,
) -> Vec<LintingIssue> {
    let Some((_, source)) = graph.target(from) else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    match graph.node(to) {
        GraphNode::Target(_) => {
            let Some((_, dest)) = graph.target(to) else {
                return issues;
            };
            if source.product.links_static_products() && dest.product.is_static() {
                issues.extend(static_duplicate(graph, from, to, static_links));
            }
            let from_key = LintableTarget::new(source.platform, source.product);
            let to_key = LintableTarget::new(dest.platform, dest.product);
            match check_link(from_key, to_key) {
                LinkCheck::Allowed => {}
                LinkCheck::UnsupportedSource => issues.push(LintingIssue::error(
                    RULE_LINK,
                    format!(
                        "Target {} has platform '{}' and product '{}' invalid or not supported yet.",
                        source.name, source.platform, source.product
                    ),
                )),
                LinkCheck::InvalidDependency => issues.push(LintingIssue::error(
                    RULE_LINK,
                    format!(
                        "Target {} has a dependency with target {} of type {} for platform '{}' which is invalid or not supported yet.",
                        source.name, dest.name, dest.product, dest.platform
                    ),
                )),
            }
        }
        GraphNode::PackageProduct(_) => {
            if source.product.links_static_products() {
                issues.extend(static_duplicate(graph, from, to, static_links));
            }
        }
        GraphNode::Precompiled(_) | GraphNode::ExternalTool(_) => {}
    }
    issues
}

fn static_duplicate(
    graph: &Graph,
    consumer: NodeId,
    destination: NodeId,
    static_links: &mut StaticLinkRegistry,
) -> Option<LintingIssue> {
    let first = static_links.insert(destination, consumer)?;
    Some(LintingIssue::warning(
        RULE_STATIC_DUPLICATE,
        format!(
            "Target {} has been linked from {} and {}, it is a static product so may introduce unwanted side effects.",
            graph.display_name(destination),
            graph.display_name(first),
            graph.display_name(consumer)
        ),
    ))
}
