//! External type lookup.
//!
//! The scope chain falls back to a [`ClassPath`] when a name is not in the
//! model. Lookups use binary names with `.` package separators and `$`
//! between nested classes (`java.util.Map$Entry`).

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

use crate::base::constants::{ARCHIVE_EXTS, CLASS_EXT};
use crate::classfile::ClassFile;

/// What the model needs to know about a type that exists outside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalType {
    pub binary_name: String,
    pub is_interface: bool,
}

pub trait ClassPath {
    fn lookup(&self, binary_name: &str) -> Option<ExternalType>;
}

/// A classpath with nothing on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyClassPath;

impl ClassPath for EmptyClassPath {
    fn lookup(&self, _binary_name: &str) -> Option<ExternalType> {
        None
    }
}

// ============================================================================
// IN-MEMORY INDEX
// ============================================================================

/// Binary name → interface flag.
#[derive(Clone, Debug, Default)]
pub struct LibraryIndex {
    types: FxHashMap<String, bool>,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, binary_name: impl Into<String>, is_interface: bool) {
        self.types.insert(binary_name.into(), is_interface);
    }

    pub fn with_class(mut self, binary_name: &str) -> Self {
        self.insert(binary_name, false);
        self
    }

    pub fn with_interface(mut self, binary_name: &str) -> Self {
        self.insert(binary_name, true);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl ClassPath for LibraryIndex {
    fn lookup(&self, binary_name: &str) -> Option<ExternalType> {
        self.types.get(binary_name).map(|&is_interface| ExternalType {
            binary_name: binary_name.to_string(),
            is_interface,
        })
    }
}

// ============================================================================
// FILESYSTEM CLASSPATH
// ============================================================================

#[derive(Debug)]
enum Entry {
    Directory(PathBuf),
    /// Archive path and the `.class` entry names it contains.
    #[cfg_attr(not(feature = "archives"), allow(dead_code))]
    Archive(PathBuf, FxHashSet<String>),
}

/// Class directories and jar/zip archives, searched in order.
///
/// Interface-ness is read from the access flags of the located classfile.
/// Results, including misses, are cached.
#[derive(Debug, Default)]
pub struct FileClassPath {
    entries: Vec<Entry>,
    cache: Mutex<FxHashMap<String, Option<ExternalType>>>,
}

impl FileClassPath {
    /// Build from a list of directories and archives. Entries that do not
    /// exist or cannot be opened are skipped with a warning.
    pub fn new(paths: &[PathBuf]) -> Self {
        let mut entries = Vec::new();
        for path in paths {
            if path.is_dir() {
                entries.push(Entry::Directory(path.clone()));
            } else if is_archive(path) {
                match archive_index(path) {
                    Ok(names) => entries.push(Entry::Archive(path.clone(), names)),
                    Err(e) => tracing::warn!("skipping classpath archive {}: {e}", path.display()),
                }
            } else {
                tracing::warn!("skipping classpath entry {}", path.display());
            }
        }
        Self {
            entries,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn locate(&self, binary_name: &str) -> Option<ExternalType> {
        let relative = format!("{}.{CLASS_EXT}", binary_name.replace('.', "/"));
        for entry in &self.entries {
            let bytes = match entry {
                Entry::Directory(dir) => {
                    let file = dir.join(&relative);
                    if !file.is_file() {
                        continue;
                    }
                    std::fs::read(&file).map_err(|e| e.to_string())
                }
                Entry::Archive(archive, names) => {
                    if !names.contains(&relative) {
                        continue;
                    }
                    read_archive_entry(archive, &relative)
                }
            };
            match bytes.and_then(|b| ClassFile::parse(&b).map_err(|e| e.to_string())) {
                Ok(class) => {
                    return Some(ExternalType {
                        binary_name: binary_name.to_string(),
                        is_interface: class.is_interface(),
                    });
                }
                Err(e) => tracing::warn!("unreadable classpath entry {relative}: {e}"),
            }
        }
        None
    }
}

impl ClassPath for FileClassPath {
    fn lookup(&self, binary_name: &str) -> Option<ExternalType> {
        if let Some(hit) = self.cache.lock().get(binary_name) {
            return hit.clone();
        }
        let found = self.locate(binary_name);
        tracing::trace!("classpath lookup {binary_name}: {}", found.is_some());
        self.cache
            .lock()
            .insert(binary_name.to_string(), found.clone());
        found
    }
}

pub(crate) fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARCHIVE_EXTS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Upper bound on the buffer reserved up front for an archive entry.
#[cfg(feature = "archives")]
const MAX_ENTRY_RESERVE: u64 = 1 << 20;

/// Initial capacity for reading an archive entry. The declared size comes
/// from the archive header and is only a hint.
#[cfg(feature = "archives")]
pub(crate) fn entry_capacity(declared: u64) -> usize {
    declared.min(MAX_ENTRY_RESERVE) as usize
}

#[cfg(feature = "archives")]
fn archive_index(path: &Path) -> Result<FxHashSet<String>, String> {
    let file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    Ok(archive
        .file_names()
        .filter(|name| name.ends_with(".class"))
        .map(str::to_string)
        .collect())
}

#[cfg(not(feature = "archives"))]
fn archive_index(_path: &Path) -> Result<FxHashSet<String>, String> {
    Err("archive support requires the 'archives' feature".to_string())
}

#[cfg(feature = "archives")]
fn read_archive_entry(path: &Path, name: &str) -> Result<Vec<u8>, String> {
    use std::io::Read;

    let file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    let mut entry = archive.by_name(name).map_err(|e| e.to_string())?;
    let mut bytes = Vec::with_capacity(entry_capacity(entry.size()));
    entry.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
    Ok(bytes)
}

#[cfg(not(feature = "archives"))]
fn read_archive_entry(_path: &Path, _name: &str) -> Result<Vec<u8>, String> {
    Err("archive support requires the 'archives' feature".to_string())
}
