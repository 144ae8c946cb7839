use jmodel::import::ImportSettings;
use jmodel::model::{ElementKind, Model};
use tempfile::TempDir;

use crate::helpers::model_helpers::{classifier, import_dir, member_names, members, write_sources};

#[test]
fn test_reimport_keeps_identity() {
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let dir = TempDir::new().unwrap();
    write_sources(
        &dir,
        &[("C.java", "package p; class C { int a; void f(int x) {} }")],
    );

    import_dir(&mut model, &settings, &dir);
    let c = classifier(&model, "p.C").unwrap();
    let attributes = members(&model, c, ElementKind::Attribute);
    let operations = members(&model, c, ElementKind::Operation);

    let outcome = import_dir(&mut model, &settings, &dir);
    assert!(!outcome.has_errors());
    assert_eq!(classifier(&model, "p.C"), Some(c));
    assert_eq!(members(&model, c, ElementKind::Attribute), attributes);
    assert_eq!(members(&model, c, ElementKind::Operation), operations);
    assert!(!outcome.created.contains(&c));
}

#[test]
fn test_reimport_retracts_removed_field() {
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let dir = TempDir::new().unwrap();

    write_sources(&dir, &[("C.java", "package p; class C { int a; }")]);
    import_dir(&mut model, &settings, &dir);
    write_sources(&dir, &[("C.java", "package p; class C { int b; }")]);
    import_dir(&mut model, &settings, &dir);

    let c = classifier(&model, "p.C").unwrap();
    assert_eq!(member_names(&model, c, ElementKind::Attribute), vec!["b"]);
}

#[test]
fn test_reimport_retracts_removed_inner_class_and_method() {
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let dir = TempDir::new().unwrap();

    write_sources(
        &dir,
        &[("C.java", "package p; class C { class In {} void go() {} void stay() {} }")],
    );
    import_dir(&mut model, &settings, &dir);
    let inner = classifier(&model, "p.C.In").unwrap();

    write_sources(&dir, &[("C.java", "package p; class C { void stay() {} }")]);
    import_dir(&mut model, &settings, &dir);

    let c = classifier(&model, "p.C").unwrap();
    assert!(classifier(&model, "p.C.In").is_none());
    assert!(!model.contains(inner));
    assert_eq!(member_names(&model, c, ElementKind::Operation), vec!["stay"]);
}
