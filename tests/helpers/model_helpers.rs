//! Model lookups and import shortcuts for integration tests.

use std::fs;
use std::path::PathBuf;

use jmodel::driver::SourceImporter;
use jmodel::import::ImportSettings;
use jmodel::model::{ElementKind, Model, NodeId};
use jmodel::resolve::EmptyClassPath;
use jmodel::ImportOutcome;
use tempfile::TempDir;

/// Write `files` into `dir`, overwriting earlier content.
pub fn write_sources(dir: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, text)| {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, text).unwrap();
            path
        })
        .collect()
}

/// Import every source file under `dir` with an empty classpath.
pub fn import_dir(model: &mut Model, settings: &ImportSettings, dir: &TempDir) -> ImportOutcome {
    SourceImporter::new(model, settings)
        .with_classpath(EmptyClassPath)
        .import(&[dir.path().to_path_buf()])
        .unwrap()
}

/// Write `files` into a fresh directory and import it.
pub fn import_sources(
    model: &mut Model,
    settings: &ImportSettings,
    files: &[(&str, &str)],
) -> (TempDir, ImportOutcome) {
    let dir = TempDir::new().unwrap();
    write_sources(&dir, files);
    let outcome = import_dir(model, settings, &dir);
    (dir, outcome)
}

/// Classifier by dotted name, e.g. `p.Outer.Inner`, following the usual
/// uppercase convention for where the package ends.
pub fn classifier(model: &Model, qualified: &str) -> Option<NodeId> {
    let segments: Vec<&str> = qualified.split('.').collect();
    let split = segments
        .iter()
        .position(|s| s.starts_with(char::is_uppercase))
        .unwrap_or(segments.len());
    let mut current = if split == 0 {
        model.root()
    } else {
        model.find_package(model.root(), &segments[..split].join("."))?
    };
    for segment in &segments[split..] {
        current = model.find_classifier(current, segment)?;
    }
    Some(current)
}

/// Names of the members of `owner` with the given kind, in model order.
pub fn member_names(model: &Model, owner: NodeId, kind: ElementKind) -> Vec<String> {
    model
        .owned(owner)
        .iter()
        .filter(|&&c| model.kind(c) == Some(kind))
        .map(|&c| model.name(c).unwrap_or_default().to_string())
        .collect()
}

pub fn members(model: &Model, owner: NodeId, kind: ElementKind) -> Vec<NodeId> {
    model
        .owned(owner)
        .iter()
        .copied()
        .filter(|&c| model.kind(c) == Some(kind))
        .collect()
}

/// Targets of the relationships of `kind` leaving `source`.
pub fn targets(model: &Model, source: NodeId, kind: ElementKind) -> Vec<NodeId> {
    model
        .relationships_from(source, kind)
        .into_iter()
        .filter_map(|r| model.get(r).and_then(|e| e.relationship()))
        .map(|r| r.target)
        .collect()
}
