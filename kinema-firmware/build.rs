//! Build script for kinema-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Embeds the `animations/` tree into flash as a sorted file table
//! - Checks every settings.txt at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use kinema_core::codec::FRAME_SUFFIX;
use kinema_core::config::{parse_line, Settings, SETTINGS_FILE};
use kinema_core::gif::GIF_SUFFIX;

/// Directory embedded as the storage root
const ANIMATIONS_DIR: &str = "animations";

fn main() {
    setup_linker();

    println!("cargo:rerun-if-changed={}", ANIMATIONS_DIR);
    let files = collect_files(Path::new(ANIMATIONS_DIR));
    validate_settings(&files);
    validate_folders(&files);
    write_file_table(&files);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// An embedded file: path relative to the root with `/` separators, and its
/// location on disk
struct EmbeddedFile {
    path: String,
    source: PathBuf,
}

/// Walk `root` and return every regular file, sorted by relative path
///
/// Hidden files and directories are skipped. A missing root yields an empty
/// list and a warning.
fn collect_files(root: &Path) -> Vec<EmbeddedFile> {
    let mut files = Vec::new();
    if !root.is_dir() {
        println!(
            "cargo:warning={} not found, no animations will be embedded",
            root.display()
        );
        return files;
    }

    let mut pending = vec![(root.to_path_buf(), String::new())];
    while let Some((dir, prefix)) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .unwrap_or_else(|e| panic!("failed to read {}: {}", dir.display(), e));
        for entry in entries {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            let source = entry.path();
            if source.is_dir() {
                pending.push((source, path));
            } else {
                files.push(EmbeddedFile { path, source });
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Warn about settings lines the firmware would skip
fn validate_settings(files: &[EmbeddedFile]) {
    for file in files.iter().filter(|f| is_settings_file(&f.path)) {
        let text = match fs::read_to_string(&file.source) {
            Ok(text) => text,
            Err(e) => {
                println!("cargo:warning={}: unreadable ({}), defaults apply", file.path, e);
                continue;
            }
        };

        for (n, line) in text.lines().enumerate() {
            let line_no = n + 1;
            match parse_line(line) {
                Ok(None) => {}
                Ok(Some((key, value))) => {
                    if let Err(e) = Settings::default().set(key, value) {
                        println!(
                            "cargo:warning={}:{}: {} ignored ({:?})",
                            file.path, line_no, key, e
                        );
                    }
                }
                Err(e) => {
                    println!(
                        "cargo:warning={}:{}: line ignored ({:?})",
                        file.path, line_no, e
                    );
                }
            }
        }
    }
}

/// Warn about folders with frames that will never be listed
fn validate_folders(files: &[EmbeddedFile]) {
    let mut warned: Vec<&str> = Vec::new();
    for file in files {
        let Some((folder, name)) = file.path.rsplit_once('/') else {
            continue;
        };
        if !(name.ends_with(FRAME_SUFFIX) || name.ends_with(GIF_SUFFIX)) {
            continue;
        }
        if warned.contains(&folder) {
            continue;
        }
        let settings = format!("{}/{}", folder, SETTINGS_FILE);
        if files.binary_search_by(|f| f.path.as_str().cmp(&settings)).is_err() {
            println!(
                "cargo:warning={} has frames but no {}, it will not be listed",
                folder, SETTINGS_FILE
            );
            warned.push(folder);
        }
    }
}

fn is_settings_file(path: &str) -> bool {
    path == SETTINGS_FILE || path.ends_with(&format!("/{}", SETTINGS_FILE))
}

/// Generate `animations.rs` holding the sorted file table
fn write_file_table(files: &[EmbeddedFile]) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut out = File::create(out_dir.join("animations.rs")).unwrap();

    writeln!(out, "/// Embedded animation files, sorted by path").unwrap();
    writeln!(out, "pub static ANIMATIONS: &[(&str, &[u8])] = &[").unwrap();
    let mut total = 0u64;
    for file in files {
        let source = fs::canonicalize(&file.source)
            .unwrap_or_else(|e| panic!("failed to resolve {}: {}", file.source.display(), e));
        total += fs::metadata(&source).map(|m| m.len()).unwrap_or(0);
        writeln!(
            out,
            "    ({:?}, include_bytes!({:?})),",
            file.path,
            source.display().to_string()
        )
        .unwrap();
    }
    writeln!(out, "];").unwrap();

    println!(
        "cargo:warning=embedded {} animation files ({} bytes)",
        files.len(),
        total
    );
}
