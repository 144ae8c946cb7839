use rstest::rstest;

use jmodel::base::constants::stereotypes;
use jmodel::import::{ImportSettings, ReferenceKind, Severity, codes, owned_associations};
use jmodel::model::{ElementKind, Model};
use jmodel::resolve::names::split_qualified;

use crate::helpers::model_helpers::{classifier, import_sources, targets};
use crate::helpers::source_fixtures::{OUTER_WITH_INNER, USES_INNER};

#[rstest]
#[case::subclass_first("A.java", "B.java")]
#[case::superclass_first("Z.java", "B.java")]
fn test_two_pass_resolves_forward_reference(#[case] sub_file: &str, #[case] super_file: &str) {
    let mut model = Model::new();
    let (_dir, outcome) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[
            (sub_file, "package p; class A extends B {}"),
            (super_file, "package p; class B {}"),
        ],
    );

    assert!(!outcome.has_errors());
    let a = classifier(&model, "p.A").unwrap();
    let b = classifier(&model, "p.B").unwrap();
    assert_eq!(targets(&model, a, ElementKind::Generalization), vec![b]);
}

#[test]
fn test_single_pass_leaves_generalization_absent() {
    let mut model = Model::new();
    let (_dir, outcome) = import_sources(
        &mut model,
        &ImportSettings::default().single_pass(),
        &[("A.java", "package p; class A extends B implements I {}")],
    );

    assert_eq!(outcome.units_processed, 1);
    assert!(!outcome.has_errors());
    let a = classifier(&model, "p.A").unwrap();
    assert!(targets(&model, a, ElementKind::Generalization).is_empty());
    assert!(targets(&model, a, ElementKind::Abstraction).is_empty());

    let skipped: Vec<_> = outcome
        .all_diagnostics()
        .filter(|d| d.has_code(codes::SUPERTYPE_NOT_LINKED))
        .map(|d| (d.symbol.as_deref().unwrap().to_string(), d.reference.unwrap(), d.severity))
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("B".to_string(), ReferenceKind::Superclass, Severity::Info),
            ("I".to_string(), ReferenceKind::Interface, Severity::Info),
        ]
    );
}

#[test]
fn test_two_pass_reports_no_unlinked_supertypes() {
    let mut model = Model::new();
    let (_dir, outcome) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[
            ("A.java", "package p; class A extends B {}"),
            ("B.java", "package p; class B {}"),
        ],
    );

    assert!(!outcome.all_diagnostics().any(|d| d.has_code(codes::SUPERTYPE_NOT_LINKED)));
}

const GENERIC_BOX: &str = "\
package p;

public abstract class Box<T> {
    T value;
    T[] history;
    java.util.List<T> all;

    public <U> U map(T input, U[] seeds) { return null; }

    protected abstract T get();
}
";

#[rstest]
#[case::default_settings(false)]
#[case::forced_creation(true)]
fn test_type_variables_are_not_classifiers(#[case] force: bool) {
    let mut model = Model::new();
    let settings = ImportSettings::default()
        .with_force_creation(force)
        .with_associations(true);
    let (_dir, outcome) = import_sources(&mut model, &settings, &[("Box.java", GENERIC_BOX)]);

    assert!(!outcome.has_errors());
    assert!(outcome.all_diagnostics().all(|d| d.symbol.as_deref() != Some("T")));
    assert!(outcome.all_diagnostics().all(|d| d.symbol.as_deref() != Some("U")));

    let pkg = model.find_package(model.root(), "p").unwrap();
    assert!(model.find_classifier(pkg, "T").is_none());
    assert!(model.find_classifier(pkg, "U").is_none());

    let boxed = classifier(&model, "p.Box").unwrap();
    let value = model
        .find_member(boxed, "value", |k| k == ElementKind::Attribute)
        .expect("type-variable field stays an attribute");
    assert_eq!(model.get(value).unwrap().type_ref(), None);
    assert!(model.find_member(boxed, "history", |k| k == ElementKind::Attribute).is_some());
    assert!(owned_associations(&model, boxed).is_empty());
}

#[test]
fn test_unresolved_superclass_is_reported_not_fatal() {
    let mut model = Model::new();
    let (_dir, outcome) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[("A.java", "package p; class A extends Missing { int x; }")],
    );

    let a = classifier(&model, "p.A").unwrap();
    assert!(targets(&model, a, ElementKind::Generalization).is_empty());
    assert!(outcome.all_diagnostics().any(|d| d.symbol.as_deref() == Some("Missing")));
    assert!(model.find_member(a, "x", |k| k == ElementKind::Attribute).is_some());
}

#[test]
fn test_forced_superclass_is_synthesized() {
    let mut model = Model::new();
    let (_dir, _) = import_sources(
        &mut model,
        &ImportSettings::default().with_force_creation(true),
        &[("A.java", "package p; class A extends Missing {}")],
    );

    let a = classifier(&model, "p.A").unwrap();
    let missing = classifier(&model, "p.Missing").unwrap();
    assert_eq!(targets(&model, a, ElementKind::Generalization), vec![missing]);
}

#[test]
fn test_package_path_disambiguation() {
    let q = split_qualified("com.example.Foo");
    assert_eq!((q.package, q.classes), (vec!["com", "example"], vec!["Foo"]));
    let q = split_qualified("com.example.Foo.Bar");
    assert_eq!((q.package, q.classes), (vec!["com", "example"], vec!["Foo", "Bar"]));

    let mut model = Model::new();
    let (_dir, outcome) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[("Foo.java", OUTER_WITH_INNER), ("User.java", USES_INNER)],
    );
    assert!(!outcome.has_errors());

    let foo = classifier(&model, "com.example.Foo").unwrap();
    let bar = classifier(&model, "com.example.Foo.Bar").unwrap();
    assert_eq!(model.namespace(bar), Some(foo));
    assert_eq!(model.qualified_name(bar), "com.example.Foo.Bar");

    let user = classifier(&model, "q.User").unwrap();
    let field = model
        .find_member(user, "bar", |k| k == ElementKind::Attribute)
        .unwrap();
    assert_eq!(model.get(field).unwrap().type_ref(), Some(bar));
}

#[test]
fn test_duplicate_imports_make_one_dependency() {
    let mut model = Model::new();
    let (_dir, _) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[(
            "C.java",
            "package p;\nimport java.util.List;\nimport java.util.List;\nclass C { List<String> names; }",
        )],
    );

    let p = model.find_package(model.root(), "p").unwrap();
    let artifact = model
        .find_member(p, "C.java", |k| k == ElementKind::Artifact)
        .unwrap();
    let imports: Vec<_> = model
        .relationships_from(artifact, ElementKind::Dependency)
        .into_iter()
        .filter(|&d| model.get(d).unwrap().has_stereotype(stereotypes::JAVA_IMPORT))
        .collect();
    assert_eq!(imports.len(), 1);
}
