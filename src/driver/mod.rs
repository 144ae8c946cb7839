//! Import pass drivers.
//!
//! A driver collects the units named by its inputs, runs one modeller per
//! unit and pass, and aggregates what the units produced.
//!
//! ```text
//! inputs ─▶ collect_units ─▶ pass 1 (Skeleton | Outline) ─▶ pass 2 (Resolve)
//!                                   │                             │
//!                                   └──────── Tally ◀─────────────┘
//!                                               │
//!                                         ImportOutcome
//! ```
//!
//! A unit that cannot be read, parsed or modelled is skipped with an
//! `E0003` diagnostic; the rest of the import goes on. Cancellation is
//! polled between units and between archive entries.

mod classfile;
mod source;
mod units;

pub use classfile::ClassfileImporter;
pub use source::SourceImporter;
pub use units::collect_units;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::base::FileId;
use crate::classfile::ClassfileError;
use crate::import::{Diagnostic, ModellerOutput, Severity, codes};
use crate::model::{Model, NodeId};
use crate::parser::SourceError;

/// Diagnostics of one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDiagnostics {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// What an import run produced.
#[derive(Clone, Debug, Default)]
pub struct ImportOutcome {
    /// Elements created by the run that are still live, without duplicates.
    pub created: Vec<NodeId>,
    pub diagnostics: Vec<FileDiagnostics>,
    pub units_total: usize,
    /// Units the last pass got through before finishing or being cancelled.
    pub units_processed: usize,
    pub cancelled: bool,
}

impl ImportOutcome {
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().flat_map(|f| f.diagnostics.iter())
    }

    pub fn diagnostics_for(&self, path: &Path) -> &[Diagnostic] {
        self.diagnostics
            .iter()
            .find(|f| f.path == path)
            .map_or(&[], |f| f.diagnostics.as_slice())
    }

    pub fn has_errors(&self) -> bool {
        self.all_diagnostics().any(|d| d.severity == Severity::Error)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[cfg(feature = "archives")]
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("{path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("{path}: {source}")]
    Classfile {
        path: PathBuf,
        #[source]
        source: ClassfileError,
    },
}

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// TALLY
// ============================================================================

/// Accumulates unit results across passes.
#[derive(Default)]
struct Tally {
    created: IndexSet<NodeId>,
    diagnostics: IndexMap<PathBuf, Vec<Diagnostic>>,
    failed: FxHashSet<FileId>,
}

impl Tally {
    fn record(&mut self, path: &Path, output: ModellerOutput) {
        self.created.extend(output.created);
        for diagnostic in output.diagnostics {
            self.add(path, diagnostic);
        }
    }

    /// Diagnostics repeated by a later pass are kept once.
    fn add(&mut self, path: &Path, diagnostic: Diagnostic) {
        let list = self.diagnostics.entry(path.to_path_buf()).or_default();
        if !list.contains(&diagnostic) {
            list.push(diagnostic);
        }
    }

    /// Skip `file` for the rest of the run.
    fn fail(&mut self, path: &Path, file: FileId, error: &ImportError) {
        tracing::warn!("skipping unit: {error}");
        self.failed.insert(file);
        self.add(
            path,
            Diagnostic::error(file, error.to_string())
                .with_code(codes::FILE_FAILURE)
                .with_symbol(path.display().to_string()),
        );
    }

    fn has_failed(&self, file: FileId) -> bool {
        self.failed.contains(&file)
    }

    fn into_outcome(self, model: &Model, units_total: usize, units_processed: usize, cancelled: bool) -> ImportOutcome {
        ImportOutcome {
            created: self
                .created
                .into_iter()
                .filter(|&id| model.contains(id))
                .collect(),
            diagnostics: self
                .diagnostics
                .into_iter()
                .filter(|(_, diagnostics)| !diagnostics.is_empty())
                .map(|(path, diagnostics)| FileDiagnostics { path, diagnostics })
                .collect(),
            units_total,
            units_processed,
            cancelled,
        }
    }
}
