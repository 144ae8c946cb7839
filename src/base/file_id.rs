//! Compilation unit identifiers.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

/// Identifier for one compilation unit (a source file, a classfile, or a
/// classfile entry inside an archive).
///
/// The path itself lives in a [`FileTable`]; diagnostics and artifacts carry
/// only the id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Interns unit paths so that the same path always maps to the same [`FileId`]
/// across both import passes.
///
/// Archive entries are addressed as `archive.jar!/pkg/Name.class`.
#[derive(Clone, Debug, Default)]
pub struct FileTable {
    paths: IndexSet<PathBuf>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `path`, allocating one on first sight.
    pub fn intern(&mut self, path: impl AsRef<Path>) -> FileId {
        let path = path.as_ref();
        if let Some(index) = self.paths.get_index_of(path) {
            return FileId::new(index as u32);
        }
        let (index, _) = self.paths.insert_full(path.to_path_buf());
        FileId::new(index as u32)
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.paths.get_index(file.index() as usize).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
