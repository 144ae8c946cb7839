use std::fs;
use std::io::Write;
use std::path::Path;

use jmodel::base::constants::stereotypes;
use jmodel::driver::{ClassfileImporter, SourceImporter};
use jmodel::import::ImportSettings;
use jmodel::model::{ElementKind, Model, Origin};
use jmodel::resolve::EmptyClassPath;
use tempfile::TempDir;

use crate::helpers::classfiles::ClassBuilder;
use crate::helpers::model_helpers::{classifier, member_names, targets, write_sources};

const ACC_PUBLIC: u16 = 0x0001;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

fn api_class() -> Vec<u8> {
    ClassBuilder::new("lib/Api")
        .access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT)
        .super_class("java/lang/Object")
        .method(ACC_PUBLIC | ACC_ABSTRACT, "run", "(I)V")
        .build()
}

fn impl_class() -> Vec<u8> {
    ClassBuilder::new("lib/Impl")
        .super_class("java/lang/Object")
        .interface("lib/Api")
        .field(ACC_PUBLIC, "count", "J")
        .method(ACC_PUBLIC, "<init>", "()V")
        .method(ACC_PUBLIC, "run", "(I)V")
        .build()
}

fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = fs::File::create(path).unwrap();
    let mut jar = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    jar.add_directory("META-INF/", options).unwrap();
    jar.start_file("META-INF/MANIFEST.MF", options).unwrap();
    jar.write_all(b"Manifest-Version: 1.0\n").unwrap();
    for (name, bytes) in entries {
        jar.start_file(*name, options).unwrap();
        jar.write_all(bytes).unwrap();
    }
    jar.finish().unwrap();
}

#[test]
fn test_generic_signatures_do_not_create_classifiers() {
    let holder = ClassBuilder::new("lib/Holder")
        .super_class("java/lang/Object")
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
        .field_sig(ACC_PUBLIC, "item", "Ljava/lang/Object;", "TE;")
        .method_sig(
            ACC_PUBLIC,
            "swap",
            "(Ljava/lang/Object;)[Ljava/lang/Object;",
            "<R:Ljava/lang/Object;>(TE;)[TR;",
        )
        .build();
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("lib.jar");
    write_jar(&jar, &[("lib/Holder.class", holder)]);

    let mut model = Model::new();
    let settings = ImportSettings::default().with_force_creation(true);
    let outcome = ClassfileImporter::new(&mut model, &settings)
        .with_classpath(EmptyClassPath)
        .import(&[jar])
        .unwrap();

    assert!(outcome.all_diagnostics().next().is_none());
    assert!(classifier(&model, "lib.Holder").is_some());
    assert!(classifier(&model, "lib.E").is_none());
    assert!(classifier(&model, "lib.R").is_none());
}

#[test]
fn test_jar_entries_are_imported() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("lib.jar");
    write_jar(
        &jar,
        &[("lib/Impl.class", impl_class()), ("lib/Api.class", api_class())],
    );

    let mut model = Model::new();
    let settings = ImportSettings::default();
    let outcome = ClassfileImporter::new(&mut model, &settings)
        .with_classpath(EmptyClassPath)
        .import(&[jar])
        .unwrap();

    assert_eq!(outcome.units_total, 2);
    assert_eq!(outcome.units_processed, 2);
    assert!(!outcome.has_errors());

    let api = classifier(&model, "lib.Api").unwrap();
    let imp = classifier(&model, "lib.Impl").unwrap();
    assert_eq!(model.kind(api), Some(ElementKind::Interface));
    let realized: Vec<_> = model
        .relationships_from(imp, ElementKind::Abstraction)
        .into_iter()
        .filter(|&r| model.get(r).unwrap().has_stereotype(stereotypes::REALIZE))
        .collect();
    assert_eq!(realized.len(), 1);
    assert_eq!(targets(&model, imp, ElementKind::Abstraction), vec![api]);
    assert_eq!(member_names(&model, imp, ElementKind::Operation), vec!["Impl", "run"]);
    assert_eq!(member_names(&model, imp, ElementKind::Attribute), vec!["count"]);
}

#[test]
fn test_corrupt_archive_is_a_file_diagnostic() {
    let dir = TempDir::new().unwrap();
    let jar = dir.path().join("broken.jar");
    fs::write(&jar, b"PK not really").unwrap();
    fs::write(dir.path().join("Api.class"), api_class()).unwrap();

    let mut model = Model::new();
    let settings = ImportSettings::default();
    let outcome = ClassfileImporter::new(&mut model, &settings)
        .import(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(outcome.diagnostics_for(&jar).len(), 1);
    assert!(classifier(&model, "lib.Api").is_some());
}

#[test]
fn test_source_resolves_against_classpath() {
    let dir = TempDir::new().unwrap();
    let classes = dir.path().join("classes/lib");
    fs::create_dir_all(&classes).unwrap();
    fs::write(classes.join("Api.class"), api_class()).unwrap();

    let sources = TempDir::new().unwrap();
    write_sources(
        &sources,
        &[("p/Worker.java", "package p;\nimport lib.Api;\npublic class Worker implements Api {}")],
    );

    let mut model = Model::new();
    let settings = ImportSettings::default().with_classpath(dir.path().join("classes"));
    let outcome = SourceImporter::new(&mut model, &settings)
        .import(&[sources.path().to_path_buf()])
        .unwrap();
    assert!(!outcome.has_errors());

    let worker = classifier(&model, "p.Worker").unwrap();
    let api = classifier(&model, "lib.Api").unwrap();
    assert_eq!(model.get(api).unwrap().origin, Origin::Classpath);
    assert_eq!(model.kind(api), Some(ElementKind::Interface));
    assert_eq!(targets(&model, worker, ElementKind::Abstraction), vec![api]);
}
