//! Node and edge types of the compressed trie.
//!
//! Every node owns its outgoing edges, and every edge owns its target, so the
//! structure is a strict tree. Edges are kept sorted by label and sibling
//! labels never share a leading `char`.

use smallvec::SmallVec;

/// Most nodes fan out to only a couple of children.
pub(crate) type Edges<V> = SmallVec<[Edge<V>; 2]>;

/// A stored key and its value.
#[derive(Clone, Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
}

/// A labelled link from a parent node to the child it owns.
#[derive(Clone, Debug)]
pub(crate) struct Edge<V> {
    /// Non-empty label.
    pub(crate) label: Box<str>,
    pub(crate) target: Box<Node<V>>,
}

/// One point in the trie.
#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    /// Present iff some inserted key ends exactly at this node.
    pub(crate) entry: Option<Entry<V>>,
    pub(crate) edges: Edges<V>,
    /// Terminal nodes in this subtree, this node included.
    pub(crate) descendants: usize,
}

impl<V> Node<V> {
    pub(crate) fn new() -> Self {
        Self {
            entry: None,
            edges: SmallVec::new(),
            descendants: 0,
        }
    }

    pub(crate) fn leaf(key: String, value: V) -> Self {
        Self {
            entry: Some(Entry { key, value }),
            edges: SmallVec::new(),
            descendants: 1,
        }
    }

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.entry.is_some()
    }

    /// Index of the first edge whose label is `>= s`.
    #[inline]
    pub(crate) fn insertion_point(&self, s: &str) -> usize {
        self.edges.partition_point(|e| &*e.label < s)
    }

    /// The (at most two) edges that can share a leading char with `s`: the
    /// ones immediately before and at its insertion point.
    #[inline]
    pub(crate) fn neighbours(&self, s: &str) -> std::ops::Range<usize> {
        let ix = self.insertion_point(s);
        ix.saturating_sub(1)..(ix + 1).min(self.edges.len())
    }
}

/// Length in bytes of the longest common prefix of `a` and `b`, rounded down
/// to a char boundary so both sides can be sliced there.
pub(crate) fn matching_len(a: &str, b: &str) -> usize {
    let mut n = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    while !a.is_char_boundary(n) {
        n -= 1;
    }
    n
}
