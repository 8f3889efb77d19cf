//! Animation storage abstractions
//!
//! Animations are stored as a read-only tree of folders and files. Paths use
//! `/` as separator and are relative to the storage root.

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory containing further entries
    Dir,
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No entry at the given path
    NotFound,
    /// Path names a file where a directory was expected
    NotADirectory,
    /// Path names a directory where a file was expected
    IsADirectory,
}

/// Read-only file storage
///
/// File contents are borrowed straight from the backing memory, so frame
/// data stored in flash is decoded in place without copying.
pub trait FileStore {
    /// Visit the immediate children of `dir`
    ///
    /// Each child is reported once with its name (not the full path).
    /// Order is unspecified; callers sort when order matters.
    fn list_dir<F>(&self, dir: &str, visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&str, EntryKind);

    /// Borrow the contents of the file at `path`
    fn read(&self, path: &str) -> Result<&[u8], StoreError>;

    /// Check if a regular file exists at `path`
    fn is_file(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}
