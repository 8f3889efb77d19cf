//! Fixed-capacity paths
//!
//! Paths are `/`-separated and relative to the storage root.

use heapless::String;

/// Longest file or folder name
pub const MAX_NAME_LEN: usize = 32;

/// Longest path, relative to the storage root
pub const MAX_PATH_LEN: usize = 64;

/// A single path component
pub type Name = String<MAX_NAME_LEN>;

/// A full path
pub type Path = String<MAX_PATH_LEN>;

/// Path does not fit in [`MAX_PATH_LEN`] bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathTooLong;

/// Join a directory and an entry name with a single `/`
pub fn join(dir: &str, name: &str) -> Result<Path, PathTooLong> {
    let mut path = Path::new();
    let dir = dir.trim_end_matches('/');
    if !dir.is_empty() {
        path.push_str(dir).map_err(|_| PathTooLong)?;
        path.push('/').map_err(|_| PathTooLong)?;
    }
    path.push_str(name).map_err(|_| PathTooLong)?;
    Ok(path)
}

/// Last component of a path
pub fn file_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}
