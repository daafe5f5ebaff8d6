//! Building an index from a newline-separated word list.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::{LoadError, PrefixIndex};

impl PrefixIndex<usize> {
    /// Insert every line of `reader` as a key, valued by its zero-based line
    /// number. A trailing `\r` is stripped. A word that appears twice keeps
    /// the number of its last occurrence.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut index = Self::new();
        let mut lines = 0usize;
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            index.insert(line.strip_suffix('\r').unwrap_or(line.as_str()), n);
            lines += 1;
        }
        debug!(lines, keys = index.len(), "loaded word list");
        Ok(index)
    }

    /// [`from_reader`](Self::from_reader) over the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening word list");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}
