use std::path::PathBuf;

use jmodel::driver::SourceImporter;
use jmodel::import::{ImportSettings, codes};
use jmodel::model::Model;
use jmodel::resolve::EmptyClassPath;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::helpers::model_helpers::{classifier, import_dir, write_sources};

#[test]
fn test_directory_import_skips_other_files() {
    let dir = TempDir::new().unwrap();
    write_sources(
        &dir,
        &[
            ("src/p/A.java", "package p; class A {}"),
            ("src/p/README.md", "class NotJava {}"),
            ("src/q/B.java", "package q; class B extends p.A {}"),
        ],
    );

    let mut model = Model::new();
    let outcome = import_dir(&mut model, &ImportSettings::default(), &dir);

    assert_eq!(outcome.units_total, 2);
    assert!(!outcome.has_errors());
    assert!(classifier(&model, "q.B").is_some());
    assert!(classifier(&model, "NotJava").is_none());
}

#[test]
fn test_one_broken_file_does_not_abort_the_batch() {
    let dir = TempDir::new().unwrap();
    let paths = write_sources(
        &dir,
        &[
            ("A.java", "package p; class A { void f( }"),
            ("B.java", "package p; class B {}"),
        ],
    );

    let mut model = Model::new();
    let outcome = import_dir(&mut model, &ImportSettings::default(), &dir);

    assert!(outcome.has_errors());
    let broken = outcome.diagnostics_for(&paths[0]);
    assert_eq!(broken.len(), 1);
    assert!(broken[0].has_code(codes::FILE_FAILURE));
    assert!(outcome.diagnostics_for(&paths[1]).is_empty());
    assert!(classifier(&model, "p.B").is_some());
}

#[test]
fn test_created_entities_are_unique_and_live() {
    let dir = TempDir::new().unwrap();
    write_sources(
        &dir,
        &[("A.java", "package p; class A { int a; void f() {} }")],
    );

    let mut model = Model::new();
    let outcome = import_dir(&mut model, &ImportSettings::default(), &dir);

    let mut seen = outcome.created.clone();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), outcome.created.len());
    assert!(outcome.created.iter().all(|&id| model.contains(id)));
    assert!(outcome.created.contains(&classifier(&model, "p.A").unwrap()));
}

#[test]
fn test_cancelled_import_stops_before_units() {
    let dir = TempDir::new().unwrap();
    write_sources(&dir, &[("A.java", "class A {}"), ("B.java", "class B {}")]);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let outcome = SourceImporter::new(&mut model, &settings)
        .with_classpath(EmptyClassPath)
        .with_cancellation(cancel)
        .import(&[dir.path().to_path_buf()])
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.units_processed, 0);
    assert!(classifier(&model, "A").is_none());
}

#[test]
fn test_missing_input_fails_the_import() {
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let result = SourceImporter::new(&mut model, &settings)
        .import(&[PathBuf::from("/definitely/not/here")]);
    assert!(result.is_err());
}
