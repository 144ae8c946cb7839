//! Input collection.

use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ImportError;

/// Expand `inputs` into unit paths.
///
/// Directories are walked recursively in file-name order and contribute
/// every file whose extension is one of `extensions` (case-insensitive).
/// Files named directly are taken as they are. Paths are deduplicated,
/// keeping first-seen order.
pub fn collect_units<S: AsRef<str>>(
    inputs: &[PathBuf],
    extensions: &[S],
) -> Result<Vec<PathBuf>, ImportError> {
    let mut units = IndexSet::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|source| ImportError::Walk {
                    path: input.clone(),
                    source,
                })?;
                if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                    units.insert(entry.into_path());
                }
            }
        } else if input.is_file() {
            units.insert(input.clone());
        } else {
            return Err(ImportError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }
    }
    tracing::debug!("collected {} unit(s) from {} input(s)", units.len(), inputs.len());
    Ok(units.into_iter().collect())
}

pub(crate) fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.as_ref().eq_ignore_ascii_case(ext)))
}
