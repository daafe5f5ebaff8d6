//! # prefix-index
//!
//! Shortest-unambiguous-prefix lookup over a compressed trie (radix tree).
//!
//! Each stored key carries a value. A lookup takes a prefix and answers whether
//! it identifies exactly one stored key, in time proportional to the length of
//! the prefix rather than the number of keys. A stored key that is itself a
//! prefix of longer keys still resolves to itself when queried exactly.
//!
//! ## Example
//!
//! ```rust
//! use prefix_index::{PrefixError, PrefixIndex};
//!
//! let mut index: PrefixIndex<u32> = PrefixIndex::new();
//! index.insert("apple", 1);
//! index.insert("applepie", 2);
//! index.insert("a", 3);
//! index.insert("armor", 4);
//!
//! assert_eq!(index.find_unique("a"), Ok(&3));
//! assert_eq!(index.find_unique("ar"), Ok(&4));
//! assert_eq!(index.find_unique("ap"), Err(PrefixError::Ambiguous));
//! assert_eq!(index.find_unique("apps"), Err(PrefixError::NotFound));
//! assert_eq!(index.find_all_keys("ap"), vec!["apple", "applepie"]);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod debug;
mod error;
mod loader;
mod node;
mod shared;

pub use debug::Dump;
pub use error::{LoadError, PrefixError};
pub use shared::SharedPrefixIndex;

use node::{matching_len, Edge, Entry, Node};
use tracing::{debug, trace};

/// Edge count from which lookups pick candidates by binary search.
///
/// Measured against a full unix word list; below this a linear scan of the
/// (short) edge list wins.
pub const DEFAULT_BINARY_SEARCH_THRESHOLD: usize = 20;

/// Configuration for a [`PrefixIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Nodes with at least this many edges are searched by bisecting their
    /// sorted labels; smaller nodes are scanned linearly. Affects speed only.
    pub binary_search_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            binary_search_threshold: DEFAULT_BINARY_SEARCH_THRESHOLD,
        }
    }
}

/// How a prefix relates to the stored keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Exactly one stored key is selected, either by equality or because it is
    /// the only key extending the prefix.
    Unique,
    /// Two or more stored keys extend the prefix and none equals it.
    Ambiguous,
    /// No stored key extends the prefix.
    NotFound,
}

/// Result of walking a prefix down the trie.
enum Resolved<'a, V> {
    Unique(&'a Node<V>),
    Ambiguous(&'a Node<V>),
    NotFound,
}

impl<V> Resolved<'_, V> {
    fn outcome(&self) -> Outcome {
        match self {
            Resolved::Unique(_) => Outcome::Unique,
            Resolved::Ambiguous(_) => Outcome::Ambiguous,
            Resolved::NotFound => Outcome::NotFound,
        }
    }
}

/// What insertion does next at the current node.
enum Step {
    /// No edge shares a leading char with the rest of the key.
    Attach,
    /// Edge `.0` is fully consumed by `.1` bytes of the key.
    Descend(usize, usize),
    /// Edge `.0` shares only its first `.1` bytes with the key.
    Split(usize, usize),
}

/// A prefix-searchable map from string keys to values.
///
/// Not internally synchronized; wrap it in [`SharedPrefixIndex`] or another
/// lock when it has to be shared between threads that mutate it.
#[derive(Clone)]
pub struct PrefixIndex<V> {
    root: Node<V>,
    config: Config,
}

impl<V> PrefixIndex<V> {
    /// Create an empty index with the default [`Config`].
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            config: Config::default(),
        }
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: Config) -> Self {
        debug!(
            binary_search_threshold = config.binary_search_threshold,
            "creating prefix index"
        );
        Self {
            root: Node::new(),
            config,
        }
    }

    /// The configuration this index was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.descendants
    }

    /// Whether no key is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.descendants == 0
    }

    /// Associate `value` with `key`.
    ///
    /// Returns the previous value if `key` was already stored; the structure
    /// of the trie is left untouched in that case.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(key) {
            return Some(std::mem::replace(slot, value));
        }

        let mut node = &mut self.root;
        let mut rest = key;

        loop {
            node.descendants += 1;

            if rest.is_empty() {
                node.entry = Some(Entry {
                    key: key.to_owned(),
                    value,
                });
                return None;
            }

            let ix = node.insertion_point(rest);
            let mut step = Step::Attach;
            // Sibling labels are prefix-free, so only the edges on either
            // side of the insertion point can share a leading char.
            for i in ix.saturating_sub(1)..(ix + 1).min(node.edges.len()) {
                let label = &node.edges[i].label;
                let m = matching_len(label, rest);
                if m == label.len() {
                    step = Step::Descend(i, m);
                    break;
                }
                if m > 0 {
                    step = Step::Split(i, m);
                    break;
                }
            }

            match step {
                Step::Attach => {
                    node.edges.insert(
                        ix,
                        Edge {
                            label: rest.into(),
                            target: Box::new(Node::leaf(key.to_owned(), value)),
                        },
                    );
                    return None;
                }
                Step::Descend(i, m) => {
                    rest = &rest[m..];
                    node = &mut *node.edges[i].target;
                }
                Step::Split(i, m) => {
                    let edge = &mut node.edges[i];
                    trace!(label = &*edge.label, at = m, "splitting edge");

                    let tail: Box<str> = edge.label[m..].into();
                    edge.label = edge.label[..m].into();
                    let old = std::mem::replace(&mut edge.target, Box::new(Node::new()));
                    edge.target.descendants = old.descendants;
                    edge.target.edges.push(Edge {
                        label: tail,
                        target: old,
                    });

                    rest = &rest[m..];
                    node = &mut *edge.target;
                }
            }
        }
    }

    /// Exact-key lookup; prefixes are not expanded.
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = &self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let i = node
                .neighbours(rest)
                .find(|&i| rest.starts_with(&*node.edges[i].label))?;
            let edge = &node.edges[i];
            rest = &rest[edge.label.len()..];
            node = &*edge.target;
        }
        node.entry.as_ref().map(|e| &e.value)
    }

    /// Exact-key lookup returning a mutable reference to the value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut node = &mut self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let i = node
                .neighbours(rest)
                .find(|&i| rest.starts_with(&*node.edges[i].label))?;
            rest = &rest[node.edges[i].label.len()..];
            node = &mut *node.edges[i].target;
        }
        node.entry.as_mut().map(|e| &mut e.value)
    }

    /// Whether `key` is stored exactly.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Classify `prefix` against the stored keys.
    pub fn resolve(&self, prefix: &str) -> Outcome {
        self.locate(prefix).outcome()
    }

    /// Value of the single key selected by `prefix`.
    pub fn find_unique(&self, prefix: &str) -> Result<&V, PrefixError> {
        self.find_entry(prefix).map(|e| &e.value)
    }

    /// The full key selected by `prefix`.
    pub fn find_key(&self, prefix: &str) -> Result<&str, PrefixError> {
        self.find_entry(prefix).map(|e| e.key.as_str())
    }

    /// Key and value selected by `prefix`.
    pub fn find_key_value(&self, prefix: &str) -> Result<(&str, &V), PrefixError> {
        self.find_entry(prefix).map(|e| (e.key.as_str(), &e.value))
    }

    /// Lazily enumerate the entries `prefix` selects, in key order.
    ///
    /// A unique match yields only that entry, even if longer keys extend it.
    /// An ambiguous match yields every key in the subtree it lands on; a
    /// missing prefix yields nothing.
    pub fn matches(&self, prefix: &str) -> Iter<'_, V> {
        match self.locate(prefix) {
            Resolved::Unique(node) => Iter {
                stack: vec![node],
                descend: false,
            },
            Resolved::Ambiguous(node) => Iter {
                stack: vec![node],
                descend: true,
            },
            Resolved::NotFound => Iter {
                stack: Vec::new(),
                descend: false,
            },
        }
    }

    /// Values of every key [`matches`](Self::matches) yields.
    pub fn find_all_values(&self, prefix: &str) -> Vec<&V> {
        self.matches(prefix).map(|(_, v)| v).collect()
    }

    /// Keys [`matches`](Self::matches) yields.
    pub fn find_all_keys(&self, prefix: &str) -> Vec<&str> {
        self.matches(prefix).map(|(k, _)| k).collect()
    }

    /// Entries [`matches`](Self::matches) yields.
    pub fn find_all_key_values(&self, prefix: &str) -> Vec<(&str, &V)> {
        self.matches(prefix).collect()
    }

    /// All entries in key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            stack: vec![&self.root],
            descend: true,
        }
    }

    fn find_entry(&self, prefix: &str) -> Result<&Entry<V>, PrefixError> {
        match self.locate(prefix) {
            Resolved::Unique(node) => node.entry.as_ref().ok_or(PrefixError::NotFound),
            Resolved::Ambiguous(_) => Err(PrefixError::Ambiguous),
            Resolved::NotFound => Err(PrefixError::NotFound),
        }
    }

    fn locate(&self, prefix: &str) -> Resolved<'_, V> {
        let mut node = &self.root;
        let mut rest = prefix;

        'descend: loop {
            if rest.is_empty() {
                // A branch point, or the root of an index holding fewer than
                // two keys, never selects a key on its own.
                return if node.is_terminal() {
                    Resolved::Unique(node)
                } else {
                    Resolved::Ambiguous(node)
                };
            }

            let candidates = if node.edges.len() >= self.config.binary_search_threshold {
                node.neighbours(rest)
            } else {
                0..node.edges.len()
            };

            for edge in &node.edges[candidates] {
                let m = matching_len(rest, &edge.label);
                if m == 0 {
                    continue;
                }
                if m == edge.label.len() {
                    node = &*edge.target;
                    rest = &rest[m..];
                    continue 'descend;
                }
                if m == rest.len() {
                    let target = &*edge.target;
                    return if target.descendants > 1 {
                        Resolved::Ambiguous(target)
                    } else if target.is_terminal() {
                        Resolved::Unique(target)
                    } else {
                        // Unreachable while the descendant counts are intact.
                        Resolved::NotFound
                    };
                }
            }

            return Resolved::NotFound;
        }
    }
}

impl<V> Default for PrefixIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for PrefixIndex<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for PrefixIndex<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for PrefixIndex<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<'a, V> IntoIterator for &'a PrefixIndex<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first, edge-order walk over stored entries.
///
/// Edges are sorted and a node's own key precedes every key below it, so
/// entries come out in ascending key order.
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    /// Whether to visit the children of popped nodes.
    descend: bool,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.descend {
                self.stack
                    .extend(node.edges.iter().rev().map(|e| &*e.target));
            }
            if let Some(entry) = &node.entry {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }
}

impl<V> std::iter::FusedIterator for Iter<'_, V> {}


#[cfg(test)]
mod proptests;
