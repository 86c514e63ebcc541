//! Prefix tree over key components
//!
//! The path from the root to a node corresponds 1:1 to a key prefix. A node
//! has children iff at least one extension has been issued from that exact
//! key.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rollkey_types::{Key, KeyComponent};
use tracing::trace;

use crate::error::{IndexError, Result};

/// One issued key prefix and the last time it was seen.
#[derive(Debug, Clone)]
pub struct LineageNode {
    last_seen: DateTime<Utc>,
    children: HashMap<KeyComponent, LineageNode>,
}

impl LineageNode {
    pub fn new(last_seen: DateTime<Utc>) -> Self {
        Self {
            last_seen,
            children: HashMap::new(),
        }
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Refresh the timestamp of a lineage tip.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, component: &str) -> Option<&LineageNode> {
        self.children.get(component)
    }

    /// Create one child per component below this node, in order, and return
    /// the terminal node.
    ///
    /// Every node created here is stamped with `value`. A component that
    /// already exists as a child is descended into rather than replaced, so
    /// existing lineage is never discarded.
    pub fn extend(
        &mut self,
        components: &[KeyComponent],
        value: DateTime<Utc>,
    ) -> Result<&mut LineageNode> {
        if components.is_empty() {
            return Err(IndexError::EmptyExtension);
        }

        let mut current = self;
        for component in components {
            current = current
                .children
                .entry(component.clone())
                .or_insert_with(|| LineageNode::new(value));
        }
        current.last_seen = value;
        Ok(current)
    }

    fn subtree_size(&self) -> usize {
        1 + self
            .children
            .values()
            .map(LineageNode::subtree_size)
            .sum::<usize>()
    }
}

/// Owned result of a longest-prefix lookup.
///
/// Captured before any mutation so classification can never observe its own
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixSnapshot {
    /// Number of leading key components found in the index
    pub matched_depth: usize,

    /// Number of trailing components not found
    pub remainder_len: usize,

    /// Children of the deepest matched node
    pub child_count: usize,

    /// Timestamp of the deepest matched node; `None` when only the root matched
    pub last_seen: Option<DateTime<Utc>>,
}

impl PrefixSnapshot {
    /// Nothing of the key is known.
    pub fn is_root(&self) -> bool {
        self.matched_depth == 0
    }

    /// The whole key is known.
    pub fn is_exact(&self) -> bool {
        self.remainder_len == 0
    }
}

/// Borrowed result of a longest-prefix lookup
#[derive(Debug, Clone, Copy)]
pub struct PrefixMatch<'a> {
    node: &'a LineageNode,
    matched: &'a [KeyComponent],
    remainder: &'a [KeyComponent],
    is_root: bool,
}

impl<'a> PrefixMatch<'a> {
    /// Deepest node reached; the root when nothing matched.
    pub fn node(&self) -> &'a LineageNode {
        self.node
    }

    pub fn matched(&self) -> &'a [KeyComponent] {
        self.matched
    }

    /// Unmatched tail of the key, empty on an exact match.
    pub fn remainder(&self) -> &'a [KeyComponent] {
        self.remainder
    }

    pub fn snapshot(&self) -> PrefixSnapshot {
        PrefixSnapshot {
            matched_depth: self.matched.len(),
            remainder_len: self.remainder.len(),
            child_count: self.node.child_count(),
            last_seen: (!self.is_root).then(|| self.node.last_seen()),
        }
    }
}

/// Append-only lineage tree
#[derive(Debug, Clone)]
pub struct LineageIndex {
    root: LineageNode,
}

impl LineageIndex {
    pub fn new() -> Self {
        Self {
            root: LineageNode::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    pub fn root(&self) -> &LineageNode {
        &self.root
    }

    /// Walk from the root while a matching child exists.
    pub fn longest_prefix<'a>(&'a self, key: &'a Key) -> PrefixMatch<'a> {
        let components = key.components();
        let mut node = &self.root;
        let mut depth = 0;

        for component in components {
            match node.children.get(component) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }

        trace!(key = %key, matched_depth = depth, "Longest prefix walk");

        PrefixMatch {
            node,
            matched: &components[..depth],
            remainder: &components[depth..],
            is_root: depth == 0,
        }
    }

    pub fn snapshot(&self, key: &Key) -> PrefixSnapshot {
        self.longest_prefix(key).snapshot()
    }

    /// Extend the node at the first `matched_depth` components of `key` with
    /// the rest of `key`.
    pub fn extend_from(
        &mut self,
        key: &Key,
        matched_depth: usize,
        value: DateTime<Utc>,
    ) -> Result<&mut LineageNode> {
        let components = key.components();
        if matched_depth > components.len() {
            return Err(IndexError::DepthOutOfRange {
                key: key.to_string(),
                depth: matched_depth,
            });
        }
        let (path, remainder) = components.split_at(matched_depth);
        let node = self
            .node_mut(path)
            .ok_or_else(|| IndexError::NodeNotFound(key.to_string()))?;
        node.extend(remainder, value)
    }

    /// Refresh the timestamp of the node at exactly `key`.
    pub fn touch(&mut self, key: &Key, now: DateTime<Utc>) -> Result<()> {
        let node = self
            .node_mut(key.components())
            .ok_or_else(|| IndexError::NodeNotFound(key.to_string()))?;
        node.touch(now);
        Ok(())
    }

    pub fn get(&self, key: &Key) -> Option<&LineageNode> {
        let mut node = &self.root;
        for component in key.components() {
            node = node.children.get(component)?;
        }
        Some(node)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Number of issued prefixes, excluding the root.
    pub fn node_count(&self) -> usize {
        self.root.subtree_size() - 1
    }

    fn node_mut(&mut self, path: &[KeyComponent]) -> Option<&mut LineageNode> {
        let mut node = &mut self.root;
        for component in path {
            node = node.children.get_mut(component)?;
        }
        Some(node)
    }
}

impl Default for LineageIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(node: &LineageNode, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut children: Vec<_> = node.children.iter().collect();
            children.sort_by(|a, b| a.0.cmp(b.0));
            for (component, child) in children {
                writeln!(
                    f,
                    "{}{}: {}",
                    "┃  ".repeat(depth),
                    component,
                    child.last_seen.to_rfc3339()
                )?;
                render(child, depth + 1, f)?;
            }
            Ok(())
        }

        render(&self.root, 0, f)
    }
}
