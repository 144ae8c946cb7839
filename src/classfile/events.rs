//! Replays a decoded classfile as modeller events.
//!
//! Synthetic members, bridge methods, static initializers and anonymous or
//! local classes are skipped. Nested classes reopen their outer classifier
//! with `enter_classifier`, so the outer class has to be imported first.

use crate::base::constants::CLASS_EXT;
use crate::descriptor::{
    self, TypeParameter, class_signature, field_signature, field_type, internal_name,
    method_descriptor, method_signature,
};
use crate::import::{AttributeDecl, ClassDecl, ModelEvents, Modifiers, OperationDecl, ParamDecl};

use super::reader::{ClassFile, ClassfileError, MemberInfo, access};

const CONSTRUCTOR: &str = "<init>";
const STATIC_INITIALIZER: &str = "<clinit>";

/// Supertypes every class or enum has; not modelled as generalizations.
const IMPLICIT_SUPERCLASSES: &[&str] = &["java.lang.Object", "java.lang.Enum"];
const ANNOTATION_INTERFACE: &str = "java.lang.annotation.Annotation";

const MODIFIER_MASK: u16 = access::PUBLIC
    | access::PRIVATE
    | access::PROTECTED
    | access::STATIC
    | access::FINAL
    | access::ABSTRACT;

/// Artifact name of a classfile, e.g. `Map$Entry.class`.
pub fn unit_name(class: &ClassFile) -> String {
    let simple = class
        .this_class
        .rsplit('/')
        .next()
        .unwrap_or(&class.this_class);
    format!("{simple}.{CLASS_EXT}")
}

/// Feed `class` to `events`.
///
/// Returns `false` when the class is not modelled at all.
pub fn emit_class(class: &ClassFile, events: &mut impl ModelEvents) -> Result<bool, ClassfileError> {
    if class.access_flags & access::SYNTHETIC != 0 {
        tracing::debug!("skipping synthetic class {}", class.this_class);
        return Ok(false);
    }
    let inner = class.own_inner_entry();
    let outer = match inner {
        Some(entry) => match (&entry.outer, &entry.simple_name) {
            (Some(outer), Some(_)) => Some(outer.as_str()),
            _ => {
                tracing::debug!("skipping anonymous or local class {}", class.this_class);
                return Ok(false);
            }
        },
        None => None,
    };

    events.add_component(&unit_name(class))?;
    let (package, _) = class.this_class.rsplit_once('/').unwrap_or(("", ""));
    if !package.is_empty() {
        events.add_package(&internal_name(package))?;
    }
    if let Some(outer) = outer {
        events.enter_classifier(&internal_name(outer))?;
    }

    let flags = inner.map_or(class.access_flags, |entry| entry.access_flags);
    let decl = class_decl(class, inner.and_then(|e| e.simple_name.as_deref()), flags)?;
    if class.is_enum() {
        events.add_enumeration(&decl)?;
    } else if class.is_interface() {
        events.add_interface(&decl)?;
    } else {
        events.add_class(&decl)?;
    }

    for field in class.fields.iter().filter(|f| !f.is_synthetic()) {
        if class.is_enum() && field.access_flags & access::ENUM != 0 {
            events.add_enumeration_literal(&field.name)?;
            continue;
        }
        events.add_attribute(&attribute_decl(field)?)?;
    }

    let is_inner_instance = outer.is_some() && flags & access::STATIC == 0;
    for method in &class.methods {
        if method.is_synthetic() || method.name == STATIC_INITIALIZER {
            continue;
        }
        if class.is_enum() && is_implicit_enum_method(method) {
            continue;
        }
        events.add_operation(&operation_decl(method, &decl.name, is_inner_instance)?)?;
    }

    events.pop_classifier()?;
    if outer.is_some() {
        events.pop_classifier()?;
    }
    Ok(true)
}

fn class_decl(
    class: &ClassFile,
    simple_name: Option<&str>,
    flags: u16,
) -> Result<ClassDecl, ClassfileError> {
    let name = match simple_name {
        Some(name) => name.to_string(),
        None => {
            let java_name = class.java_name();
            java_name
                .rsplit('.')
                .next()
                .unwrap_or(&java_name)
                .to_string()
        }
    };
    let mut decl = ClassDecl::new(name).with_modifiers(modifiers(flags));

    let (superclass, interfaces) = match &class.signature {
        Some(signature) => {
            let signature = class_signature(signature)?;
            decl.type_parameters = type_parameter_names(&signature.type_parameters);
            (Some(signature.superclass), signature.interfaces)
        }
        None => (
            class.super_class.as_deref().map(internal_name),
            class.interfaces.iter().map(|i| internal_name(i)).collect(),
        ),
    };

    decl.superclass = superclass.filter(|s| !class.is_interface() && !is_implicit_superclass(s));
    decl.interfaces = interfaces
        .into_iter()
        .filter(|i| !(class.is_annotation() && i == ANNOTATION_INTERFACE))
        .collect();
    Ok(decl)
}

fn attribute_decl(field: &MemberInfo) -> Result<AttributeDecl, ClassfileError> {
    let type_name = match &field.signature {
        Some(signature) => field_signature(signature)?,
        None => field_type(&field.descriptor)?,
    };
    let mut decl = AttributeDecl::new(field.name.as_str(), type_name)
        .with_modifiers(modifiers(field.access_flags));
    decl.initial_value = field.constant_value.clone();
    Ok(decl)
}

/// Parameters are named `arg0`, `arg1`, ...; classfiles carry no names
/// without debug information.
fn operation_decl(
    method: &MemberInfo,
    class_name: &str,
    is_inner_instance: bool,
) -> Result<OperationDecl, ClassfileError> {
    let is_constructor = method.name == CONSTRUCTOR;
    let name = if is_constructor { class_name } else { method.name.as_str() };
    let mut decl = OperationDecl::new(name).with_modifiers(modifiers(method.access_flags));

    let (parameters, return_type) = match &method.signature {
        Some(signature) => {
            let signature = method_signature(signature)?;
            decl.type_parameters = type_parameter_names(&signature.type_parameters);
            (signature.parameters, signature.return_type)
        }
        None => {
            let descriptor::MethodDescriptor {
                mut parameters,
                return_type,
            } = method_descriptor(&method.descriptor)?;
            // the enclosing instance is passed first to inner class constructors
            if is_constructor && is_inner_instance && !parameters.is_empty() {
                parameters.remove(0);
            }
            (parameters, return_type)
        }
    };

    decl.params = parameters
        .into_iter()
        .enumerate()
        .map(|(i, ty)| ParamDecl::input(format!("arg{i}"), ty))
        .collect();
    if !is_constructor {
        decl.params.push(ParamDecl::returns(return_type));
    }
    Ok(decl)
}

fn modifiers(flags: u16) -> Modifiers {
    Modifiers::from_bits(flags & MODIFIER_MASK)
}

fn type_parameter_names(parameters: &[TypeParameter]) -> Vec<String> {
    parameters.iter().map(|p| p.name.clone()).collect()
}

fn is_implicit_superclass(name: &str) -> bool {
    let base = name.split('<').next().unwrap_or(name);
    IMPLICIT_SUPERCLASSES.contains(&base)
}

/// `values()` and `valueOf(String)`, generated for every enum.
fn is_implicit_enum_method(method: &MemberInfo) -> bool {
    method.access_flags & access::STATIC != 0
        && (method.name == "values" || method.name == "valueOf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::classfile::testing::ClassBuilder;
    use crate::import::{ImportSettings, Modeller, Resolve};
    use crate::model::{ElementKind, Model, NodeId};
    use crate::resolve::EmptyClassPath;

    fn import(model: &mut Model, bytes: &[u8]) -> Result<bool, ClassfileError> {
        let class = ClassFile::parse(bytes)?;
        let settings = ImportSettings::default();
        let classpath = EmptyClassPath;
        let mut modeller =
            Modeller::<Resolve>::new(model, &classpath, &settings, FileId::new(0), unit_name(&class));
        let emitted = emit_class(&class, &mut modeller)?;
        modeller.finish()?;
        Ok(emitted)
    }

    fn find(model: &Model, path: &str) -> Option<NodeId> {
        let (package, name) = path.rsplit_once('.')?;
        let package = model.find_package(model.root(), package)?;
        model.find_classifier(package, name)
    }

    fn kinds_named(model: &Model, owner: NodeId, kind: ElementKind) -> Vec<String> {
        model
            .owned(owner)
            .iter()
            .filter(|&&c| model.kind(c) == Some(kind))
            .map(|&c| model.name(c).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_unit_name() {
        let class = ClassFile::parse(&ClassBuilder::new("java/util/Map$Entry").build()).unwrap();
        assert_eq!(unit_name(&class), "Map$Entry.class");
    }

    #[test]
    fn test_class_members() {
        let bytes = ClassBuilder::new("com/example/Foo")
            .super_class("java/lang/Object")
            .interface("java/lang/Runnable")
            .field(access::PRIVATE, "count", "I")
            .field_sig(access::PRIVATE, "names", "Ljava/util/List;", "Ljava/util/List<Ljava/lang/String;>;")
            .field(access::SYNTHETIC | access::FINAL, "this$0", "Lcom/example/Outer;")
            .method(access::PUBLIC, "<init>", "(I)V")
            .method(access::STATIC, "<clinit>", "()V")
            .method(access::PUBLIC, "run", "()V")
            .method(access::PUBLIC | access::BRIDGE | access::SYNTHETIC, "run", "()Ljava/lang/Object;")
            .build();

        let mut model = Model::new();
        assert!(import(&mut model, &bytes).unwrap());

        let foo = find(&model, "com.example.Foo").unwrap();
        assert_eq!(kinds_named(&model, foo, ElementKind::Attribute), vec!["count", "names"]);
        assert_eq!(kinds_named(&model, foo, ElementKind::Operation), vec!["Foo", "run"]);
        assert!(model.relationships_from(foo, ElementKind::Generalization).is_empty());
        assert_eq!(model.relationships_from(foo, ElementKind::Abstraction).len(), 1);

        let package = model.find_package(model.root(), "com.example").unwrap();
        let artifact = model.find_member(package, "Foo.class", |k| k == ElementKind::Artifact);
        assert!(artifact.is_some());
    }

    #[test]
    fn test_enum_literals() {
        let bytes = ClassBuilder::new("p/Color")
            .access(access::PUBLIC | access::FINAL | access::ENUM)
            .super_class("java/lang/Enum")
            .signature("Ljava/lang/Enum<Lp/Color;>;")
            .field(access::PUBLIC | access::STATIC | access::FINAL | access::ENUM, "RED", "Lp/Color;")
            .field(access::PRIVATE | access::STATIC | access::FINAL | access::SYNTHETIC, "$VALUES", "[Lp/Color;")
            .method(access::PUBLIC | access::STATIC, "values", "()[Lp/Color;")
            .build();

        let mut model = Model::new();
        import(&mut model, &bytes).unwrap();

        let color = find(&model, "p.Color").unwrap();
        assert_eq!(model.kind(color), Some(ElementKind::Enumeration));
        assert_eq!(kinds_named(&model, color, ElementKind::EnumerationLiteral), vec!["RED"]);
        assert!(kinds_named(&model, color, ElementKind::Operation).is_empty());
        assert!(model.relationships_from(color, ElementKind::Generalization).is_empty());
    }

    #[test]
    fn test_nested_class_needs_outer() {
        let outer = ClassBuilder::new("p/Outer").super_class("java/lang/Object").build();
        let inner = ClassBuilder::new("p/Outer$Inner")
            .super_class("java/lang/Object")
            .inner_class("p/Outer$Inner", Some("p/Outer"), Some("Inner"), access::PUBLIC)
            .method(access::PUBLIC, "<init>", "(Lp/Outer;I)V")
            .build();

        let mut model = Model::new();
        assert!(matches!(
            import(&mut model, &inner),
            Err(ClassfileError::Modeller(_))
        ));

        import(&mut model, &outer).unwrap();
        import(&mut model, &inner).unwrap();
        let outer = find(&model, "p.Outer").unwrap();
        let inner = model.find_classifier(outer, "Inner").unwrap();
        let ctor = model
            .owned(inner)
            .iter()
            .copied()
            .find(|&c| model.kind(c) == Some(ElementKind::Operation))
            .unwrap();
        let params: Vec<_> = model
            .owned(ctor)
            .iter()
            .filter(|&&c| model.kind(c) == Some(ElementKind::Parameter))
            .collect();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_anonymous_class_is_skipped() {
        let bytes = ClassBuilder::new("p/Outer$1")
            .inner_class("p/Outer$1", None, None, 0)
            .build();
        let mut model = Model::new();
        assert!(!import(&mut model, &bytes).unwrap());
        assert!(model.find_package(model.root(), "p").is_none());
    }
}
