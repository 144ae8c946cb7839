use rstest::rstest;

use jmodel::base::FileId;
use jmodel::base::constants::tags;
use jmodel::import::{
    ClassDecl, ImportSettings, Modeller, OperationDecl, Resolve, codes, owned_associations,
};
use jmodel::model::{ElementKind, Model, ParameterDirection};
use jmodel::resolve::EmptyClassPath;

use crate::helpers::model_helpers::{classifier, import_sources, member_names, members};
use crate::helpers::source_fixtures::{CAR, ENGINE};

#[rstest]
#[case::associations_off(false)]
#[case::associations_on(true)]
fn test_attribute_or_association(#[case] associations: bool) {
    let mut model = Model::new();
    let settings = ImportSettings::default().with_associations(associations);
    let (_dir, outcome) = import_sources(
        &mut model,
        &settings,
        &[("Engine.java", ENGINE), ("Car.java", CAR)],
    );
    assert!(!outcome.has_errors());

    let car = classifier(&model, "p.Car").unwrap();
    let engine = classifier(&model, "p.Engine").unwrap();
    let attributes = member_names(&model, car, ElementKind::Attribute);
    let ends: Vec<_> = owned_associations(&model, car)
        .into_iter()
        .map(|(_, end)| model.name(end).unwrap().to_string())
        .collect();

    // platform and primitive types never become associations
    assert!(attributes.contains(&"wheels".to_string()));
    assert!(attributes.contains(&"owners".to_string()));

    if associations {
        assert_eq!(ends, vec!["engine"]);
        assert!(!attributes.contains(&"engine".to_string()));
    } else {
        assert!(ends.is_empty());
        let field = model
            .find_member(car, "engine", |k| k == ElementKind::Attribute)
            .unwrap();
        assert_eq!(model.get(field).unwrap().type_ref(), Some(engine));
    }
}

#[test]
fn test_constructor_and_documentation_from_source() {
    let mut model = Model::new();
    let (_dir, _) = import_sources(
        &mut model,
        &ImportSettings::default(),
        &[("Engine.java", ENGINE), ("Car.java", CAR)],
    );

    let car = classifier(&model, "p.Car").unwrap();
    assert_eq!(
        member_names(&model, car, ElementKind::Operation),
        vec!["Car", "getEngine"]
    );
    assert_eq!(
        model.tagged_value(car, tags::DOCUMENTATION),
        Some("A car.")
    );
}

#[test]
fn test_single_return_parameter_cap() {
    let mut model = Model::new();
    let settings = ImportSettings::default();
    let classpath = EmptyClassPath;
    let mut modeller =
        Modeller::<Resolve>::new(&mut model, &classpath, &settings, FileId::new(0), "p/C.java");
    modeller.add_component("C.java").unwrap();
    modeller.add_package("p").unwrap();
    modeller.add_class(&ClassDecl::new("C")).unwrap();
    let f = modeller
        .add_operation(&OperationDecl::new("f").returns("int").returns("long"))
        .unwrap();
    modeller.pop_classifier().unwrap();
    let output = modeller.finish().unwrap();

    let returns: Vec<_> = members(&model, f, ElementKind::Parameter)
        .into_iter()
        .filter(|&p| model.get(p).unwrap().direction == Some(ParameterDirection::Return))
        .collect();
    assert_eq!(returns.len(), 1);
    let int = model.get(returns[0]).unwrap().type_ref().unwrap();
    assert_eq!(model.name(int), Some("int"));

    let warnings: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.has_code(codes::EXTRA_RETURN_PARAMETER))
        .collect();
    assert_eq!(warnings.len(), 1);
}
