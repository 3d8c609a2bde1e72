//! Dependency graph flattening.
//!
//! Produces the canonical order of a root target and everything it reaches:
//! depth-first pre-order, dependencies in declaration order, every target at
//! most once across the whole traversal. A target already visited is skipped,
//! so cycles terminate and a shared dependency appears under whichever branch
//! reaches it first.

use std::collections::HashSet;
use std::hash::Hash;

use crate::limits::{CapacityError, Limits};
use crate::target::{BuildGraph, TargetId};

/// A graph whose nodes have a name and an ordered dependency list.
///
/// The name is the deduplication key of [`walk`].
pub trait DependencyGraph {
  type Node: Copy + Eq + Hash;

  fn name(&self, node: Self::Node) -> &str;

  fn dependencies(&self, node: Self::Node) -> &[Self::Node];
}

impl DependencyGraph for BuildGraph {
  type Node = TargetId;

  fn name(&self, node: TargetId) -> &str {
    &self.target(node).name
  }

  fn dependencies(&self, node: TargetId) -> &[TargetId] {
    self.target(node).deps()
  }
}

/// Visit `root` and every transitively reachable node exactly once.
///
/// `visit` is called in pre-order; an error from it stops the walk.
pub fn walk<G, F, E>(graph: &G, root: G::Node, mut visit: F) -> Result<(), E>
where
  G: DependencyGraph,
  F: FnMut(G::Node) -> Result<(), E>,
{
  let mut seen: HashSet<&str> = HashSet::new();
  let mut stack = vec![root];

  while let Some(node) = stack.pop() {
    if !seen.insert(graph.name(node)) {
      continue;
    }
    visit(node)?;
    // Reversed so the first dependency is popped next.
    stack.extend(graph.dependencies(node).iter().rev().copied());
  }

  Ok(())
}

/// The ordered unique list of `root` followed by its transitive dependencies.
pub fn flatten<G: DependencyGraph>(graph: &G, root: G::Node, limits: &Limits) -> Result<Vec<G::Node>, CapacityError> {
  let mut order = Vec::new();
  walk(graph, root, |node| {
    limits.check("flattened targets", graph.name(root), order.len() + 1)?;
    order.push(node);
    Ok(())
  })?;
  Ok(order)
}

impl BuildGraph {
  /// Flatten from `root` using this graph's limits.
  pub fn flatten(&self, root: TargetId) -> Result<Vec<TargetId>, CapacityError> {
    flatten(self, root, self.limits())
  }
}
