//! Directory listing and entry classification.
//!
//! One call lists exactly one directory level.  Symlinks are never followed:
//! a link to a directory is classified as a non-directory entry carrying the
//! link's own size.

use std::ffi::OsString;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

/// One record from a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub is_dir: bool,
    /// Apparent size in bytes.  Only meaningful when `is_dir` is false.
    pub size: u64,
}

impl DirectoryEntry {
    fn from_metadata(name: OsString, meta: &Metadata) -> Self {
        Self {
            name,
            is_dir: meta.is_dir(),
            size: meta.len(),
        }
    }
}

/// One raw listing item: the entry name and its (lstat) metadata.
pub type RawEntry = (OsString, io::Result<Metadata>);

/// Blocking lister for one directory level.
pub type ListFn = fn(&Path) -> io::Result<Vec<DirectoryEntry>>;

/// List the immediate children of `dir` on the blocking pool.
pub async fn read_entries(dir: &Path, list: ListFn) -> io::Result<Vec<DirectoryEntry>> {
    let dir: PathBuf = dir.to_path_buf();
    tokio::task::spawn_blocking(move || list(&dir))
        .await
        .unwrap_or_else(|e| Err(io::Error::other(e)))
}

/// Default [`ListFn`]: `std::fs::read_dir` plus [`classify`].
pub fn list_dir(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    // `DirEntry::metadata` does not traverse symlinks.
    let listing = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| (e.file_name(), e.metadata())));
    classify(listing)
}

/// Turn raw listing items into entries.
///
/// A failing item aborts the whole listing: a directory is either listed
/// completely or not at all.  Entries whose metadata vanished or became
/// unreadable mid-scan are dropped silently.
pub fn classify<I>(listing: I) -> io::Result<Vec<DirectoryEntry>>
where
    I: IntoIterator<Item = io::Result<RawEntry>>,
{
    let mut entries = Vec::new();
    for item in listing {
        let (name, meta) = item?;
        let Ok(meta) = meta else {
            continue;
        };
        entries.push(DirectoryEntry::from_metadata(name, &meta));
    }
    Ok(entries)
}
