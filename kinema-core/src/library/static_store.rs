//! Read-only file store over a sorted table of `(path, contents)` pairs
//!
//! Directories are implied by the paths of the files inside them. The table
//! must be sorted by path so a directory's entries are contiguous.

use kinema_hal::{EntryKind, FileStore, StoreError};

/// File store backed by a static table
#[derive(Debug, Clone, Copy)]
pub struct StaticStore<'a> {
    entries: &'a [(&'a str, &'a [u8])],
}

impl<'a> StaticStore<'a> {
    /// Wrap a table sorted by path
    pub fn new(entries: &'a [(&'a str, &'a [u8])]) -> Self {
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 < w[1].0),
            "store entries must be sorted and unique"
        );
        Self { entries }
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_dir(&self, dir: &str) -> bool {
        let start = self.entries.partition_point(|(path, _)| *path < dir);
        self.entries[start..]
            .iter()
            .take_while(|(path, _)| path.starts_with(dir))
            .any(|(path, _)| path[dir.len()..].starts_with('/'))
    }
}

impl FileStore for StaticStore<'_> {
    fn list_dir<F: FnMut(&str, EntryKind)>(&self, dir: &str, mut visit: F) -> Result<(), StoreError> {
        let dir = dir.trim_end_matches('/');

        let start = self.entries.partition_point(|(path, _)| *path < dir);
        let mut found = dir.is_empty();
        let mut last: Option<&str> = None;

        for (path, _) in self.entries[start..].iter().take_while(|(path, _)| path.starts_with(dir)) {
            let rest = &path[dir.len()..];
            let rest = if dir.is_empty() {
                rest
            } else if rest.is_empty() {
                return Err(StoreError::NotADirectory);
            } else if let Some(rest) = rest.strip_prefix('/') {
                rest
            } else {
                // Sibling sharing the prefix, e.g. "sega2" when listing "sega"
                continue;
            };

            found = true;
            let (name, kind) = match rest.split_once('/') {
                Some((name, _)) => (name, EntryKind::Dir),
                None => (rest, EntryKind::File),
            };
            if last != Some(name) {
                visit(name, kind);
                last = Some(name);
            }
        }

        if found {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn read(&self, path: &str) -> Result<&[u8], StoreError> {
        match self.entries.binary_search_by(|(p, _)| (*p).cmp(path)) {
            Ok(i) => Ok(self.entries[i].1),
            Err(_) if self.is_dir(path.trim_end_matches('/')) => Err(StoreError::IsADirectory),
            Err(_) => Err(StoreError::NotFound),
        }
    }
}
