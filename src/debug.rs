//! Debug utilities: a human-readable dump of the trie and a structural check.

use std::fmt;

use crate::node::Node;
use crate::PrefixIndex;

/// Display adapter returned by [`PrefixIndex::dump`].
///
/// Prints one line per node and per edge, indented by depth:
///
/// ```text
/// Node: term=false desc=2
///  Edge 0: "ab"
///   Node: term=true desc=2 key="ab" value=2
///    Edge 0: "c"
///     Node: term=true desc=1 key="abc" value=1
/// ```
pub struct Dump<'a, V> {
    root: &'a Node<V>,
}

impl<V: fmt::Debug> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.root, 0)
    }
}

fn write_node<V: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<V>,
    level: usize,
) -> fmt::Result {
    let indent = "  ".repeat(level);
    write!(f, "{indent}Node: term={} desc={}", node.is_terminal(), node.descendants)?;
    if let Some(entry) = &node.entry {
        write!(f, " key={:?} value={:?}", entry.key, entry.value)?;
    }
    writeln!(f)?;

    for (i, edge) in node.edges.iter().enumerate() {
        writeln!(f, "{indent} Edge {i}: {:?}", &*edge.label)?;
        write_node(f, &edge.target, level + 1)?;
    }
    Ok(())
}

impl<V> PrefixIndex<V> {
    /// Human-readable rendering of the node structure, for debugging.
    pub fn dump(&self) -> Dump<'_, V> {
        Dump { root: &self.root }
    }

    /// Check the structural invariants of the trie; returns every issue found.
    ///
    /// An empty result means: sibling labels are non-empty, sorted and never
    /// share a leading char; every stored key equals the concatenated labels on
    /// its path; descendant counts match the terminal nodes below each node;
    /// and every non-root node with a single key below it is that key's node.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        verify_node(&self.root, String::new(), true, &mut issues);
        issues
    }
}

/// Returns the number of terminal nodes in the subtree.
fn verify_node<V>(node: &Node<V>, path: String, is_root: bool, issues: &mut Vec<String>) -> usize {
    let mut terminals = 0;

    if let Some(entry) = &node.entry {
        terminals += 1;
        if entry.key != path {
            issues.push(format!("node at path {path:?} stores key {:?}", entry.key));
        }
    }

    for (i, edge) in node.edges.iter().enumerate() {
        if edge.label.is_empty() {
            issues.push(format!("empty edge label under {path:?}"));
        }
        if let Some(prev) = i.checked_sub(1).map(|j| &node.edges[j].label) {
            if prev >= &edge.label {
                issues.push(format!(
                    "edges {prev:?} and {:?} under {path:?} out of order",
                    edge.label
                ));
            }
            if prev.chars().next() == edge.label.chars().next() {
                issues.push(format!(
                    "edges {prev:?} and {:?} under {path:?} share a leading char",
                    edge.label
                ));
            }
        }
        terminals += verify_node(&edge.target, format!("{path}{}", edge.label), false, issues);
    }

    if node.descendants != terminals {
        issues.push(format!(
            "node at path {path:?} counts {} descendants, found {terminals}",
            node.descendants
        ));
    }
    if !is_root && node.descendants == 1 && !node.is_terminal() {
        issues.push(format!("non-terminal node at path {path:?} has a single descendant"));
    }
    if !is_root && terminals == 0 {
        issues.push(format!("node at path {path:?} has no keys below it"));
    }

    terminals
}
