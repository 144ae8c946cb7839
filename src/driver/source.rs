//! Source import driver.

use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::base::{FileId, FileTable};
use crate::import::{
    ImportMode, ImportSettings, Modeller, ModellerOutput, Outline, Phase, Resolve, Skeleton,
};
use crate::model::Model;
use crate::parser::parse_source;
use crate::resolve::{ClassPath, FileClassPath};

use super::{ImportError, ImportOutcome, Tally, collect_units};

struct SourceUnit {
    path: PathBuf,
    file: FileId,
}

/// Imports Java source files into a model.
///
/// In [`ImportMode::TwoPass`] every unit is first modelled at skeleton level
/// so that forward references between units resolve on the second sweep.
pub struct SourceImporter<'a> {
    model: &'a mut Model,
    settings: &'a ImportSettings,
    classpath: Box<dyn ClassPath + 'a>,
    files: FileTable,
    cancel: CancellationToken,
}

impl<'a> SourceImporter<'a> {
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

    /// Paths of the units seen so far, by [`FileId`].
    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Import the files and directories in `inputs`.
    ///
    /// Fails only when an input cannot be collected; unit failures are
    /// reported in the outcome.
    pub fn import(&mut self, inputs: &[PathBuf]) -> Result<ImportOutcome, ImportError> {
        let units: Vec<SourceUnit> = collect_units(inputs, &self.settings.source_extensions)?
            .into_iter()
            .map(|path| SourceUnit {
                file: self.files.intern(&path),
                path,
            })
            .collect();

        let mut tally = Tally::default();
        let (processed, cancelled) = match self.settings.mode {
            ImportMode::SinglePass => self.pass::<Outline>(&units, &mut tally),
            ImportMode::TwoPass => match self.pass::<Skeleton>(&units, &mut tally) {
                (_, true) => (0, true),
                _ => self.pass::<Resolve>(&units, &mut tally),
            },
        };
        if cancelled {
            tracing::info!("source import cancelled after {processed}/{} unit(s)", units.len());
        }
        Ok(tally.into_outcome(self.model, units.len(), processed, cancelled))
    }

    /// Returns the number of units visited and whether the pass was cancelled.
    fn pass<P: Phase>(&mut self, units: &[SourceUnit], tally: &mut Tally) -> (usize, bool) {
        let total = units.len();
        for (i, unit) in units.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return (i, true);
            }
            tracing::info!("{} unit {}/{total}: {}", P::LEVEL, i + 1, unit.path.display());
            if tally.has_failed(unit.file) {
                continue;
            }
            match self.import_unit::<P>(unit) {
                Ok(output) => tally.record(&unit.path, output),
                Err(e) => tally.fail(&unit.path, unit.file, &e),
            }
        }
        (total, false)
    }

    fn import_unit<P: Phase>(&mut self, unit: &SourceUnit) -> Result<ModellerOutput, ImportError> {
        let text = std::fs::read_to_string(&unit.path).map_err(|e| ImportError::io(&unit.path, e))?;
        let source_error = |source| ImportError::Source {
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
        parse_source(&text, &component_name(&unit.path), &mut modeller).map_err(source_error)?;
        modeller.finish().map_err(|e| source_error(e.into()))
    }
}

fn component_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::codes;
    use crate::model::ElementKind;
    use crate::resolve::EmptyClassPath;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_two_pass_resolves_forward_references() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.java", "package p; public class A extends B {}");
        write(&dir, "B.java", "package p; public class B {}");

        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = SourceImporter::new(&mut model, &settings)
            .with_classpath(EmptyClassPath)
            .import(&[dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(outcome.units_total, 2);
        assert_eq!(outcome.units_processed, 2);
        assert!(!outcome.has_errors());

        let p = model.find_package(model.root(), "p").unwrap();
        let a = model.find_classifier(p, "A").unwrap();
        let b = model.find_classifier(p, "B").unwrap();
        assert!(model
            .find_relationship(ElementKind::Generalization, a, b, None)
            .is_some());
        assert!(outcome.created.contains(&a));
    }

    #[test]
    fn test_broken_unit_is_skipped() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "Broken.java", "package p; class {");
        write(&dir, "Good.java", "package p; class Good {}");

        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = SourceImporter::new(&mut model, &settings)
            .import(&[dir.path().to_path_buf()])
            .unwrap();

        let diagnostics = outcome.diagnostics_for(&broken);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].has_code(codes::FILE_FAILURE));
        let p = model.find_package(model.root(), "p").unwrap();
        assert!(model.find_classifier(p, "Good").is_some());
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = TempDir::new().unwrap();
        write(&dir, "A.java", "class A {}");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut model = Model::new();
        let settings = ImportSettings::default();
        let outcome = SourceImporter::new(&mut model, &settings)
            .with_cancellation(cancel)
            .import(&[dir.path().to_path_buf()])
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.units_total, 1);
        assert_eq!(outcome.units_processed, 0);
        assert!(outcome.created.is_empty());
    }
}
