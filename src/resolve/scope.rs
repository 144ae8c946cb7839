//! The symbol context chain.
//!
//! A [`Scope`] is rebuilt from the parse state whenever a name has to be
//! resolved. Unqualified names are looked up innermost first:
//!
//! ```text
//! OuterClassifier (Inner)        nested types of the innermost classifier
//!   → OuterClassifier (Outer)    nested types of each enclosing classifier
//!     → Package (com.example)    the unit's package
//!       → Root (artifact)        single-type imports, java.lang, on-demand
//!                                imports, default package
//! ```
//!
//! Type parameters of a classifier or operation sit in the chain as
//! [`Scope::TypeVariables`] links and stop the walk without a classifier.
//!
//! Each step also asks the [`ClassPath`]; a hit is materialized into the
//! model with [`Origin::Classpath`]. Qualified names skip the chain and are
//! looked up directly below the model root and the library profile.

use smol_str::SmolStr;

use crate::base::constants::{DEFAULT_IMPORT_PACKAGE, stereotypes};
use crate::model::{Element, ElementKind, Model, NodeId, Origin};

use super::classpath::ClassPath;
use super::names::{
    is_primitive, is_qualified_identifier, split_array, split_qualified, strip_decorations,
};

/// One link of the context chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// The compilation unit; imports hang off its artifact.
    Root { artifact: Option<NodeId> },
    Package {
        package: NodeId,
        parent: Box<Scope>,
    },
    OuterClassifier {
        classifier: NodeId,
        /// Binary name of `classifier`, e.g. `com.example.Outer$Inner`.
        prefix: String,
        parent: Box<Scope>,
    },
    /// Type parameters declared by a classifier or operation. They shadow
    /// everything further out and never resolve to a classifier.
    TypeVariables {
        names: Vec<SmolStr>,
        parent: Box<Scope>,
    },
}

impl Scope {
    pub fn root(artifact: Option<NodeId>) -> Self {
        Scope::Root { artifact }
    }

    pub fn package(self, package: NodeId) -> Self {
        Scope::Package {
            package,
            parent: Box::new(self),
        }
    }

    pub fn classifier(self, classifier: NodeId, prefix: impl Into<String>) -> Self {
        Scope::OuterClassifier {
            classifier,
            prefix: prefix.into(),
            parent: Box::new(self),
        }
    }

    /// Add a link for declared type parameters; no link when there are none.
    pub fn type_variables<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let names: Vec<SmolStr> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return self;
        }
        Scope::TypeVariables {
            names,
            parent: Box::new(self),
        }
    }

    pub fn parent(&self) -> Option<&Scope> {
        match self {
            Scope::Root { .. } => None,
            Scope::Package { parent, .. }
            | Scope::OuterClassifier { parent, .. }
            | Scope::TypeVariables { parent, .. } => Some(parent),
        }
    }

    /// The nearest package link, used as the best-guess home for forced
    /// creation of unqualified names.
    pub fn innermost_package(&self) -> Option<NodeId> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Scope::Package { package, .. } = scope {
                return Some(*package);
            }
            current = scope.parent();
        }
        None
    }

    pub fn artifact(&self) -> Option<NodeId> {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        match current {
            Scope::Root { artifact } => *artifact,
            _ => None,
        }
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Result of resolving a type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Found(NodeId),
    /// The name is a type parameter in scope.
    TypeVariable,
    NotFound,
}

impl Resolution {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Resolution::Found(id) => Some(id),
            Resolution::TypeVariable | Resolution::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

impl From<Option<NodeId>> for Resolution {
    fn from(id: Option<NodeId>) -> Self {
        id.map_or(Resolution::NotFound, Resolution::Found)
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves type names against the model, the library profile and a
/// classpath. Classpath hits are added to the model.
pub struct Resolver<'a> {
    model: &'a mut Model,
    classpath: &'a dyn ClassPath,
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a mut Model, classpath: &'a dyn ClassPath) -> Self {
        Self { model, classpath }
    }

    /// Resolve `name` as written in a unit.
    ///
    /// Generic arguments, varargs and array suffixes are ignored. With
    /// `interfaces_only`, classpath types that are not interfaces are skipped.
    pub fn resolve(&mut self, scope: &Scope, name: &str, interfaces_only: bool) -> Resolution {
        let stripped = strip_decorations(name);
        let (base, _) = split_array(&stripped);
        if base.is_empty() {
            return Resolution::NotFound;
        }
        if is_primitive(base) {
            return lookup_profile(self.model, base).into();
        }

        let q = split_qualified(base);
        let Some((first, rest)) = q.classes.split_first() else {
            return Resolution::NotFound;
        };

        let resolution = if q.package.is_empty() {
            let outer_only = interfaces_only && rest.is_empty();
            match self.resolve_simple(scope, first, outer_only) {
                Resolution::Found(outer) => self.walk_nested(outer, rest, interfaces_only),
                other => other,
            }
        } else {
            self.resolve_qualified(&q.package_path(), &q.classes, interfaces_only)
        };
        tracing::trace!("resolve '{name}' -> {resolution:?}");
        resolution
    }

    /// Synthesize a placeholder for `name` below the model root.
    ///
    /// Missing packages are created; missing classes are created as classes,
    /// the last one as an interface when `interfaces_only` is set. Returns
    /// `None` for names that are not valid qualified identifiers.
    pub fn force(&mut self, scope: &Scope, name: &str, interfaces_only: bool) -> Option<NodeId> {
        let stripped = strip_decorations(name);
        let (base, _) = split_array(&stripped);
        if is_primitive(base) || !is_qualified_identifier(base) {
            return None;
        }
        let q = split_qualified(base);
        let root = self.model.root();
        let mut current = if q.package.is_empty() {
            scope.innermost_package().unwrap_or(root)
        } else {
            self.model.ensure_package(root, &q.package_path())
        };

        let last = q.classes.len().saturating_sub(1);
        for (i, segment) in q.classes.iter().enumerate() {
            current = match self.model.find_classifier(current, segment) {
                Some(existing) => existing,
                None => {
                    let kind = if i == last && interfaces_only {
                        ElementKind::Interface
                    } else {
                        ElementKind::Class
                    };
                    tracing::debug!("forcing {kind} '{segment}' for '{name}'");
                    self.model.add(
                        Element::new(kind, *segment)
                            .with_namespace(current)
                            .with_origin(Origin::Forced),
                    )
                }
            };
        }
        Some(current)
    }

    fn resolve_simple(&mut self, scope: &Scope, name: &str, interfaces_only: bool) -> Resolution {
        let mut current = Some(scope);
        while let Some(link) = current {
            let hit = match link {
                Scope::OuterClassifier {
                    classifier, prefix, ..
                } => self.in_classifier(*classifier, prefix, name, interfaces_only),
                Scope::Package { package, .. } => self.in_package(*package, name, interfaces_only),
                Scope::Root { artifact } => self.in_root(*artifact, name, interfaces_only),
                Scope::TypeVariables { names, .. } => {
                    if names.iter().any(|n| n == name) {
                        return Resolution::TypeVariable;
                    }
                    None
                }
            };
            if let Some(id) = hit {
                return Resolution::Found(id);
            }
            current = link.parent();
        }
        Resolution::NotFound
    }

    fn in_classifier(
        &mut self,
        classifier: NodeId,
        prefix: &str,
        name: &str,
        interfaces_only: bool,
    ) -> Option<NodeId> {
        if let Some(nested) = self.model.find_classifier(classifier, name) {
            return Some(nested);
        }
        if self.model.name(classifier) == Some(name) {
            return Some(classifier);
        }
        let binary = format!("{prefix}${name}");
        let is_interface = self.external(&binary, interfaces_only)?;
        Some(self.materialize_binary(&binary, is_interface))
    }

    fn in_package(&mut self, package: NodeId, name: &str, interfaces_only: bool) -> Option<NodeId> {
        if let Some(found) = self.model.find_classifier(package, name) {
            return Some(found);
        }
        let package_name = self.model.qualified_name(package);
        let is_interface = self.external(&qualify(&package_name, name), interfaces_only)?;
        Some(self.materialize(&package_name, &[name], is_interface))
    }

    fn in_root(
        &mut self,
        artifact: Option<NodeId>,
        name: &str,
        interfaces_only: bool,
    ) -> Option<NodeId> {
        let suppliers = artifact
            .map(|a| import_suppliers(self.model, a))
            .unwrap_or_default();

        // single-type imports
        for &supplier in &suppliers {
            let is_match = self.model.get(supplier).is_some_and(|e| {
                e.kind.is_classifier() && e.name() == name
            });
            if is_match {
                return Some(supplier);
            }
        }

        // java.lang
        if let Some(found) = self.in_default_package(name, interfaces_only) {
            return Some(found);
        }

        // on-demand imports
        for &supplier in &suppliers {
            if self.model.kind(supplier).is_some_and(|k| k.is_package()) {
                if let Some(found) = self.in_package(supplier, name, interfaces_only) {
                    return Some(found);
                }
            }
        }

        // default package on the classpath
        let is_interface = self.external(name, interfaces_only)?;
        Some(self.materialize("", &[name], is_interface))
    }

    fn in_default_package(&mut self, name: &str, interfaces_only: bool) -> Option<NodeId> {
        let bases = [self.model.profile(), Some(self.model.root())];
        for base in bases.into_iter().flatten() {
            let found = self
                .model
                .find_package(base, DEFAULT_IMPORT_PACKAGE)
                .and_then(|pkg| self.model.find_classifier(pkg, name));
            if found.is_some() {
                return found;
            }
        }
        let is_interface = self.external(&qualify(DEFAULT_IMPORT_PACKAGE, name), interfaces_only)?;
        Some(self.materialize(DEFAULT_IMPORT_PACKAGE, &[name], is_interface))
    }

    fn resolve_qualified(
        &mut self,
        package: &str,
        classes: &[&str],
        interfaces_only: bool,
    ) -> Resolution {
        let bases = [Some(self.model.root()), self.model.profile()];
        for base in bases.into_iter().flatten() {
            let found = self
                .model
                .find_package(base, package)
                .and_then(|pkg| walk(self.model, pkg, classes));
            if let Some(found) = found {
                return Resolution::Found(found);
            }
        }

        let binary = qualify(package, &classes.join("$"));
        match self.external(&binary, interfaces_only) {
            Some(is_interface) => Resolution::Found(self.materialize(package, classes, is_interface)),
            None => Resolution::NotFound,
        }
    }

    /// Continue below an already resolved outer classifier.
    fn walk_nested(&mut self, outer: NodeId, rest: &[&str], interfaces_only: bool) -> Resolution {
        let mut current = outer;
        for (i, segment) in rest.iter().enumerate() {
            if let Some(nested) = self.model.find_classifier(current, segment) {
                current = nested;
                continue;
            }
            let only = interfaces_only && i + 1 == rest.len();
            let binary = format!("{}${segment}", binary_name(self.model, current));
            match self.external(&binary, only) {
                Some(is_interface) => current = self.materialize_binary(&binary, is_interface),
                None => return Resolution::NotFound,
            }
        }
        Resolution::Found(current)
    }

    /// Interface flag of a classpath type, honouring `interfaces_only`.
    fn external(&self, binary_name: &str, interfaces_only: bool) -> Option<bool> {
        let external = self.classpath.lookup(binary_name)?;
        if interfaces_only && !external.is_interface {
            tracing::trace!("classpath type {binary_name} is not an interface");
            return None;
        }
        Some(external.is_interface)
    }

    /// Add a classpath type (and its enclosing classes) below the model root.
    fn materialize(&mut self, package: &str, classes: &[&str], is_interface: bool) -> NodeId {
        let root = self.model.root();
        let mut current = self.model.ensure_package(root, package);
        let last = classes.len().saturating_sub(1);
        for (i, segment) in classes.iter().enumerate() {
            current = match self.model.find_classifier(current, segment) {
                Some(existing) => existing,
                None => {
                    let interface = if i == last {
                        is_interface
                    } else {
                        let binary = qualify(package, &classes[..=i].join("$"));
                        self.classpath
                            .lookup(&binary)
                            .is_some_and(|t| t.is_interface)
                    };
                    let kind = if interface {
                        ElementKind::Interface
                    } else {
                        ElementKind::Class
                    };
                    tracing::debug!("adding {kind} '{segment}' from the classpath");
                    self.model.add(
                        Element::new(kind, *segment)
                            .with_namespace(current)
                            .with_origin(Origin::Classpath),
                    )
                }
            };
        }
        current
    }

    fn materialize_binary(&mut self, binary_name: &str, is_interface: bool) -> NodeId {
        let (package, classes) = binary_name.rsplit_once('.').unwrap_or(("", binary_name));
        let classes: Vec<&str> = classes.split('$').collect();
        self.materialize(package, &classes, is_interface)
    }
}

/// Look `name` up in the library profile only.
///
/// Used for feature types while classifiers of the batch may not exist yet.
pub fn lookup_profile(model: &Model, name: &str) -> Option<NodeId> {
    let profile = model.profile()?;
    let stripped = strip_decorations(name);
    let (base, _) = split_array(&stripped);
    if is_primitive(base) {
        return model.find_classifier(profile, base);
    }
    let q = split_qualified(base);
    let package = if q.package.is_empty() {
        DEFAULT_IMPORT_PACKAGE.to_string()
    } else {
        q.package_path()
    };
    model
        .find_package(profile, &package)
        .and_then(|pkg| walk(model, pkg, &q.classes))
}

/// Suppliers of the `javaImport` dependencies of an artifact.
pub fn import_suppliers(model: &Model, artifact: NodeId) -> Vec<NodeId> {
    model
        .relationships_from(artifact, ElementKind::Dependency)
        .into_iter()
        .filter_map(|dep| {
            let element = model.get(dep)?;
            if !element.has_stereotype(stereotypes::JAVA_IMPORT) {
                return None;
            }
            element.relationship().map(|r| r.target)
        })
        .collect()
}

fn walk(model: &Model, start: NodeId, classes: &[&str]) -> Option<NodeId> {
    classes
        .iter()
        .try_fold(start, |current, segment| model.find_classifier(current, segment))
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Binary name of a model classifier: packages joined by `.`, nested
/// classifiers by `$`.
pub fn binary_name(model: &Model, id: NodeId) -> String {
    let mut classes = Vec::new();
    let mut current = Some(id);
    while let Some(node) = current {
        match model.get(node) {
            Some(e) if e.kind.is_classifier() => {
                classes.push(e.name().to_string());
                current = e.namespace();
            }
            _ => break,
        }
    }
    classes.reverse();
    let package = current.map(|p| model.qualified_name(p)).unwrap_or_default();
    qualify(&package, &classes.join("$"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::classpath::{EmptyClassPath, LibraryIndex};

    fn class(model: &mut Model, ns: NodeId, name: &str) -> NodeId {
        model.add(Element::new(ElementKind::Class, name).with_namespace(ns))
    }

    #[test]
    fn test_inner_scope_wins() {
        let mut model = Model::new();
        let pkg = model.ensure_package(model.root(), "com.example");
        let outer = class(&mut model, pkg, "Outer");
        let nested = class(&mut model, outer, "Node");
        class(&mut model, pkg, "Node");

        let scope = Scope::root(None)
            .package(pkg)
            .classifier(outer, "com.example.Outer");
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);
        assert_eq!(resolver.resolve(&scope, "Node", false), Resolution::Found(nested));
    }

    #[test]
    fn test_type_variable_shadows_classifiers() {
        let mut model = Model::new();
        let pkg = model.ensure_package(model.root(), "p");
        let outer = class(&mut model, pkg, "Box");
        let t = class(&mut model, pkg, "T");

        let scope = Scope::root(None).package(pkg).classifier(outer, "p.Box");
        let generic = scope.clone().type_variables(["T"]).type_variables(["U"]);
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);
        assert_eq!(resolver.resolve(&generic, "T[]", false), Resolution::TypeVariable);
        assert_eq!(resolver.resolve(&generic, "U...", false), Resolution::TypeVariable);
        assert_eq!(resolver.resolve(&generic, "p.T", false), Resolution::Found(t));
        assert_eq!(resolver.resolve(&scope, "T", false), Resolution::Found(t));
        assert_eq!(scope.clone().type_variables(Vec::<&str>::new()), scope);
    }

    #[test]
    fn test_java_lang_from_profile() {
        let mut model = Model::new();
        let root = model.root();
        let scope = Scope::root(None).package(root);
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);
        let found = resolver.resolve(&scope, "String", false).node().unwrap();
        assert!(model.is_in_profile(found));
        assert_eq!(model.qualified_name(found), "java.lang.String");
    }

    #[test]
    fn test_qualified_nested_name() {
        let mut model = Model::new();
        let pkg = model.ensure_package(model.root(), "com.example");
        let foo = class(&mut model, pkg, "Foo");
        let bar = class(&mut model, foo, "Bar");

        let scope = Scope::root(None).package(model.root());
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);
        assert_eq!(resolver.resolve(&scope, "com.example.Foo", false), Resolution::Found(foo));
        assert_eq!(resolver.resolve(&scope, "com.example.Foo.Bar", false), Resolution::Found(bar));
        assert_eq!(resolver.resolve(&scope, "com.example.Foo.Baz", false), Resolution::NotFound);
    }

    #[test]
    fn test_generics_and_varargs_are_stripped() {
        let mut model = Model::new();
        let root = model.root();
        let scope = Scope::root(None).package(root);
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);
        let list = resolver.resolve(&scope, "java.util.List<String>", false);
        assert!(list.is_found());
        let objects = resolver.resolve(&scope, "Object...", false);
        assert!(objects.is_found());
    }

    #[test]
    fn test_classpath_hit_is_materialized() {
        let mut model = Model::new();
        let root = model.root();
        let classpath = LibraryIndex::new()
            .with_interface("org.lib.Api")
            .with_class("org.lib.Base");
        let scope = Scope::root(None).package(root);

        let mut resolver = Resolver::new(&mut model, &classpath);
        let api = resolver.resolve(&scope, "org.lib.Api", true).node().unwrap();
        assert_eq!(resolver.resolve(&scope, "org.lib.Base", true), Resolution::NotFound);

        assert_eq!(model.kind(api), Some(ElementKind::Interface));
        assert_eq!(model.get(api).unwrap().origin, Origin::Classpath);
        assert_eq!(model.qualified_name(api), "org.lib.Api");
    }

    #[test]
    fn test_force_uses_innermost_package() {
        let mut model = Model::new();
        let pkg = model.ensure_package(model.root(), "app");
        let scope = Scope::root(None).package(pkg);
        let mut resolver = Resolver::new(&mut model, &EmptyClassPath);

        let ghost = resolver.force(&scope, "Ghost", true).unwrap();
        let deep = resolver.force(&scope, "x.y.Deep.Er", false).unwrap();
        assert!(resolver.force(&scope, "not valid!", false).is_none());

        assert_eq!(model.kind(ghost), Some(ElementKind::Interface));
        assert_eq!(model.qualified_name(ghost), "app.Ghost");
        assert_eq!(model.get(ghost).unwrap().origin, Origin::Forced);
        assert_eq!(model.qualified_name(deep), "x.y.Deep.Er");
        assert!(!model.is_in_profile(deep));
    }

    #[test]
    fn test_binary_name() {
        let mut model = Model::new();
        let pkg = model.ensure_package(model.root(), "a.b");
        let outer = class(&mut model, pkg, "Outer");
        let inner = class(&mut model, outer, "Inner");
        assert_eq!(binary_name(&model, inner), "a.b.Outer$Inner");
    }
}
