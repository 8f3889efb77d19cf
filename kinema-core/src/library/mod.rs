//! Animation library
//!
//! An animation is a folder under the folders root that holds a
//! `settings.txt`. Its frames are the folder's files with the frame suffix,
//! played in lexicographic order:
//!
//! ```text
//! frames_delta/
//! ├── mario/
//! │   ├── settings.txt
//! │   ├── frame_000.drle
//! │   └── frame_001.drle
//! └── sega/
//!     ├── settings.txt
//!     └── sega.gif
//! ```

mod path;
mod static_store;

pub use path::{file_name, join, Name, Path, PathTooLong, MAX_NAME_LEN, MAX_PATH_LEN};
pub use static_store::StaticStore;

use heapless::Vec;
use kinema_hal::{EntryKind, FileStore};

use crate::config::SETTINGS_FILE;

/// Most animation folders tracked at once
pub const MAX_FOLDERS: usize = 16;

/// Most frames in one animation
pub const MAX_FRAMES: usize = 512;

/// Sorted animation folder paths
pub type FolderList = Vec<Path, MAX_FOLDERS>;

/// Sorted frame file names
pub type FrameList = Vec<Name, MAX_FRAMES>;

/// List the animation folders directly under `root`
///
/// Returns full paths (`root/name`) in lexicographic order. Subfolders
/// without a settings file are not animations and are left out, as are
/// folders past [`MAX_FOLDERS`] or with paths too long to hold. A missing
/// root yields an empty list.
pub fn list_animation_folders<S: FileStore>(store: &S, root: &str) -> FolderList {
    let mut folders = FolderList::new();
    let _ = store.list_dir(root, |name, kind| {
        if kind != EntryKind::Dir {
            return;
        }
        let Ok(path) = join(root, name) else {
            return;
        };
        let has_settings = join(&path, SETTINGS_FILE).is_ok_and(|settings| store.is_file(&settings));
        if has_settings {
            let _ = folders.push(path);
        }
    });
    folders.sort_unstable();
    folders
}

/// List the files in `folder` whose names end with `suffix`
///
/// Names are returned without the folder, in lexicographic order. Missing
/// folders yield an empty list.
pub fn list_frames<S: FileStore>(store: &S, folder: &str, suffix: &str) -> FrameList {
    let mut frames = FrameList::new();
    let _ = store.list_dir(folder, |name, kind| {
        if kind != EntryKind::File || !name.ends_with(suffix) {
            return;
        }
        let mut owned = Name::new();
        if owned.push_str(name).is_ok() {
            let _ = frames.push(owned);
        }
    });
    frames.sort_unstable();
    frames
}

/// Index of `dir` in `folders`, ignoring a trailing `/`
pub fn folder_index(folders: &[Path], dir: &str) -> Option<usize> {
    let dir = dir.trim_end_matches('/');
    folders.iter().position(|f| f.as_str() == dir)
}
