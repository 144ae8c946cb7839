//! Classfile and archive import driver.

use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::base::constants::{ARCHIVE_EXTS, CLASS_EXT};
use crate::base::{FileId, FileTable};
use crate::classfile::{ClassFile, ClassfileError, emit_class};
use crate::import::{
    Diagnostic, ImportMode, ImportSettings, Modeller, ModellerError, ModellerOutput, Outline,
    Phase, Resolve, Skeleton, codes,
};
use crate::model::Model;
use crate::resolve::{ClassPath, FileClassPath, is_archive};

use super::{ImportError, ImportOutcome, Tally, collect_units};

struct ClassUnit {
    /// File path, or `archive.jar!/entry` for archive members.
    path: PathBuf,
    file: FileId,
    class: ClassFile,
}

/// Imports `.class` files and jar/zip archives into a model.
///
/// A nested class is modelled inside its outer class, so it fails when it is
/// reached first. Such units are queued and retried once the rest of the
/// pass is done, for as long as retrying makes progress.
pub struct ClassfileImporter<'a> {
    model: &'a mut Model,
    settings: &'a ImportSettings,
    classpath: Box<dyn ClassPath + 'a>,
    files: FileTable,
    cancel: CancellationToken,
}

impl<'a> ClassfileImporter<'a> {
    /// Importer looking up external types on `settings.classpath`.
    pub fn new(model: &'a mut Model, settings: &'a ImportSettings) -> Self {
        Self {
            model,
            settings,
            classpath: Box::new(FileClassPath::new(&settings.classpath)),
            files: FileTable::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_classpath(mut self, classpath: impl ClassPath + 'a) -> Self {
        self.classpath = Box::new(classpath);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Import the classfiles, archives and directories in `inputs`.
    pub fn import(&mut self, inputs: &[PathBuf]) -> Result<ImportOutcome, ImportError> {
        let extensions: Vec<&str> = std::iter::once(CLASS_EXT)
            .chain(ARCHIVE_EXTS.iter().copied())
            .collect();
        let paths = collect_units(inputs, &extensions)?;

        let mut tally = Tally::default();
        let mut units = Vec::new();
        for path in &paths {
            if self.cancel.is_cancelled() {
                return Ok(tally.into_outcome(self.model, units.len(), 0, true));
            }
            if is_archive(path) {
                if !self.expand_archive(path, &mut units, &mut tally) {
                    return Ok(tally.into_outcome(self.model, units.len(), 0, true));
                }
                continue;
            }
            let file = self.files.intern(path);
            let loaded = std::fs::read(path)
                .map_err(|e| ImportError::io(path, e))
                .and_then(|bytes| parse(path, &bytes));
            match loaded {
                Ok(class) => units.push(ClassUnit {
                    path: path.clone(),
                    file,
                    class,
                }),
                Err(e) => tally.fail(path, file, &e),
            }
        }

        let (processed, cancelled) = match self.settings.mode {
            ImportMode::SinglePass => self.pass::<Outline>(&units, &mut tally),
            ImportMode::TwoPass => match self.pass::<Skeleton>(&units, &mut tally) {
                (_, true) => (0, true),
                _ => self.pass::<Resolve>(&units, &mut tally),
            },
        };
        Ok(tally.into_outcome(self.model, units.len(), processed, cancelled))
    }

    /// Decode every `.class` entry of `archive` into `units`.
    ///
    /// Returns `false` when cancelled part way.
    #[cfg(feature = "archives")]
    fn expand_archive(&mut self, archive: &Path, units: &mut Vec<ClassUnit>, tally: &mut Tally) -> bool {
        use std::io::Read;

        use crate::resolve::entry_capacity;

        let archive_file = self.files.intern(archive);
        let opened = std::fs::File::open(archive)
            .map_err(|e| ImportError::io(archive, e))
            .and_then(|f| {
                zip::ZipArchive::new(f).map_err(|source| ImportError::Archive {
                    path: archive.to_path_buf(),
                    source,
                })
            });
        let mut zip = match opened {
            Ok(zip) => zip,
            Err(e) => {
                tally.fail(archive, archive_file, &e);
                return true;
            }
        };

        for index in 0..zip.len() {
            if self.cancel.is_cancelled() {
                return false;
            }
            let mut entry = match zip.by_index(index) {
                Ok(entry) => entry,
                Err(source) => {
                    let error = ImportError::Archive {
                        path: archive.to_path_buf(),
                        source,
                    };
                    tally.fail(archive, archive_file, &error);
                    continue;
                }
            };
            if entry.is_dir() || !entry.name().ends_with(&format!(".{CLASS_EXT}")) {
                continue;
            }
            let path = PathBuf::from(format!("{}!/{}", archive.display(), entry.name()));
            let file = self.files.intern(&path);
            let mut bytes = Vec::with_capacity(entry_capacity(entry.size()));
            let loaded = entry
                .read_to_end(&mut bytes)
                .map_err(|e| ImportError::io(&path, e))
                .and_then(|_| parse(&path, &bytes));
            match loaded {
                Ok(class) => units.push(ClassUnit { path, file, class }),
                Err(e) => tally.fail(&path, file, &e),
            }
        }
        tracing::debug!("{}: {} class entries", archive.display(), zip.len());
        true
    }

    #[cfg(not(feature = "archives"))]
    fn expand_archive(&mut self, archive: &Path, _units: &mut Vec<ClassUnit>, tally: &mut Tally) -> bool {
        let file = self.files.intern(archive);
        let error = ImportError::io(
            archive,
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "archive support requires the 'archives' feature",
            ),
        );
        tally.fail(archive, file, &error);
        true
    }

    /// Returns the number of units visited and whether the pass was cancelled.
    fn pass<P: Phase>(&mut self, units: &[ClassUnit], tally: &mut Tally) -> (usize, bool) {
        let total = units.len();
        let mut pending: Vec<&ClassUnit> = units.iter().filter(|u| !tally.has_failed(u.file)).collect();
        let mut visited = total - pending.len();
        let mut retrying = false;

        loop {
            let waiting = pending.len();
            let mut deferred = Vec::new();
            for unit in pending {
                if self.cancel.is_cancelled() {
                    return (visited, true);
                }
                tracing::info!("{} unit {}/{total}: {}", P::LEVEL, visited + 1, unit.path.display());
                match self.import_class::<P>(unit) {
                    Ok(output) => {
                        if retrying {
                            tally.add(
                                &unit.path,
                                Diagnostic::warning(unit.file, "imported after its outer class")
                                    .with_code(codes::RETRIED)
                                    .with_symbol(unit.class.java_name()),
                            );
                        }
                        tally.record(&unit.path, output);
                        visited += 1;
                    }
                    Err(e) if waits_for_outer(&e) => {
                        tracing::debug!("deferring {}: {e}", unit.path.display());
                        deferred.push((unit, e));
                    }
                    Err(e) => {
                        tally.fail(&unit.path, unit.file, &e);
                        visited += 1;
                    }
                }
            }

            if deferred.is_empty() {
                return (visited, false);
            }
            if deferred.len() == waiting {
                for (unit, e) in deferred {
                    tally.fail(&unit.path, unit.file, &e);
                    visited += 1;
                }
                return (visited, false);
            }
            pending = deferred.into_iter().map(|(unit, _)| unit).collect();
            retrying = true;
        }
    }

    fn import_class<P: Phase>(&mut self, unit: &ClassUnit) -> Result<ModellerOutput, ImportError> {
        let classfile_error = |source| ImportError::Classfile {
            path: unit.path.clone(),
            source,
        };
        let mut modeller = Modeller::<P>::new(
            &mut *self.model,
            &*self.classpath,
            self.settings,
            unit.file,
            unit.path.display().to_string(),
        );
        emit_class(&unit.class, &mut modeller).map_err(classfile_error)?;
        modeller.finish().map_err(|e| classfile_error(e.into()))
    }
}

fn parse(path: &Path, bytes: &[u8]) -> Result<ClassFile, ImportError> {
    ClassFile::parse(bytes).map_err(|source| ImportError::Classfile {
        path: path.to_path_buf(),
        source,
    })
}

fn waits_for_outer(error: &ImportError) -> bool {
    matches!(
        error,
        ImportError::Classfile {
            source: ClassfileError::Modeller(ModellerError::OuterClassifierNotFound { .. }),
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::access;
    use crate::classfile::testing::ClassBuilder;
    use crate::model::ElementKind;
    use crate::resolve::EmptyClassPath;
    use std::fs;
    use tempfile::TempDir;

    fn outer() -> Vec<u8> {
        ClassBuilder::new("p/Outer")
            .super_class("java/lang/Object")
            .inner_class("p/Outer$Inner", Some("p/Outer"), Some("Inner"), access::PUBLIC | access::STATIC)
            .build()
    }

    fn inner() -> Vec<u8> {
        ClassBuilder::new("p/Outer$Inner")
            .super_class("java/lang/Object")
            .inner_class("p/Outer$Inner", Some("p/Outer"), Some("Inner"), access::PUBLIC | access::STATIC)
            .build()
    }

    #[test]
    fn test_nested_class_before_outer_is_retried() {
        let dir = TempDir::new().unwrap();
        // `Outer$Inner.class` sorts before `Outer.class`
        fs::write(dir.path().join("Outer$Inner.class"), inner()).unwrap();
        fs::write(dir.path().join("Outer.class"), outer()).unwrap();

        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = ClassfileImporter::new(&mut model, &settings)
            .with_classpath(EmptyClassPath)
            .import(&[dir.path().to_path_buf()])
            .unwrap();

        assert!(!outcome.has_errors());
        assert!(outcome.all_diagnostics().any(|d| d.has_code(codes::RETRIED)));
        let p = model.find_package(model.root(), "p").unwrap();
        let outer = model.find_classifier(p, "Outer").unwrap();
        let nested = model.find_classifier(outer, "Inner").unwrap();
        assert_eq!(model.kind(nested), Some(ElementKind::Class));
    }

    #[test]
    fn test_nested_class_without_outer_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Outer$Inner.class");
        fs::write(&path, inner()).unwrap();

        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = ClassfileImporter::new(&mut model, &settings)
            .import(&[path.clone()])
            .unwrap();

        let diagnostics = outcome.diagnostics_for(&path);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].has_code(codes::FILE_FAILURE));
        assert_eq!(outcome.units_processed, 1);
    }

    #[test]
    fn test_garbage_classfile_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Bad.class");
        fs::write(&path, b"not a class").unwrap();

        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = ClassfileImporter::new(&mut model, &settings)
            .import(&[path.clone()])
            .unwrap();

        assert_eq!(outcome.units_total, 0);
        assert!(outcome.diagnostics_for(&path)[0].has_code(codes::FILE_FAILURE));
    }
}
