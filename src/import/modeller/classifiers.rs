//! Classifier events: open, reuse, wire supertypes, close and retract.

use smol_str::SmolStr;

use crate::base::constants::{stereotypes, tags};
use crate::import::decl::ClassDecl;
use crate::import::diagnostics::ReferenceKind;
use crate::import::error::ModellerError;
use crate::import::phase::{Level, Linker, Phase};
use crate::import::state::Frame;
use crate::model::{Element, ElementKind, NodeId, Origin, SchemaVersion, Visibility};
use crate::resolve::{Scope, names::split_qualified};

use super::Modeller;

impl<P: Phase> Modeller<'_, P> {
    pub fn add_class(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        self.open_classifier(ElementKind::Class, decl)
    }

    pub fn add_interface(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        self.open_classifier(ElementKind::Interface, decl)
    }

    pub fn add_enumeration(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        self.open_classifier(ElementKind::Enumeration, decl)
    }

    /// Open an anonymous class inside the current classifier.
    ///
    /// It is named `Outer$N`, counting per enclosing frame. In the resolve
    /// phase `type_name` becomes its superclass, or its realized interface.
    pub fn add_anonymous_class(&mut self, type_name: &str) -> Result<NodeId, ModellerError> {
        let outer = self.require_open("anonymous class")?;
        let scope = self.scope();
        let outer_name = self.model.name(outer).unwrap_or_default().to_string();
        let number = self
            .state
            .current_mut()
            .ok_or(ModellerError::outside("anonymous class"))?
            .next_anonymous();
        let name = format!("{outer_name}${number}");

        let classifier = match self.model.find_classifier(outer, &name) {
            Some(existing) => {
                self.reuse_classifier(existing, ElementKind::Class);
                existing
            }
            None => self.model.add(
                Element::new(ElementKind::Class, name.as_str())
                    .with_namespace(outer)
                    .with_visibility(Visibility::Package),
            ),
        };
        if let Some(frame) = self.state.current_mut() {
            frame.keep_classifier(classifier);
        }

        if let Some(linker) = P::linker() {
            let supertype =
                self.resolve_reference(linker, &scope, type_name, false, ReferenceKind::AnonymousSupertype);
            let (generals, realized) = match supertype {
                Some(t) if self.model.kind(t) == Some(ElementKind::Interface) => (vec![], vec![t]),
                Some(t) => (vec![t], vec![]),
                None => (vec![], vec![]),
            };
            self.wire_supertypes(linker, classifier, &generals, &realized);
        }

        self.state.push(Frame::open(self.model, classifier));
        Ok(classifier)
    }

    /// Reopen an existing classifier as context for nested declarations.
    ///
    /// Nothing is retracted when the frame pops.
    pub fn enter_classifier(&mut self, qualified_name: &str) -> Result<NodeId, ModellerError> {
        let q = split_qualified(qualified_name);
        let root = self.model.root();
        let found = self.model.find_package(root, &q.package_path()).and_then(|pkg| {
            q.classes
                .iter()
                .try_fold(pkg, |current, segment| self.model.find_classifier(current, segment))
        });
        let Some(classifier) = found else {
            return Err(ModellerError::OuterClassifierNotFound {
                name: qualified_name.to_string(),
            });
        };
        self.state.push(Frame::passive(classifier));
        Ok(classifier)
    }

    /// Close the current classifier and retract members not declared again.
    pub fn pop_classifier(&mut self) -> Result<NodeId, ModellerError> {
        let frame = self.state.pop().ok_or(ModellerError::UnbalancedPop)?;
        let classifier = frame.classifier();
        for obsolete in frame.into_obsolete() {
            if let Some(element) = self.model.get(obsolete) {
                tracing::debug!(
                    "{}: retracting {} '{}' from {}",
                    self.unit,
                    element.kind,
                    element.name(),
                    self.model.qualified_name(classifier)
                );
                self.model.remove(obsolete);
            }
        }
        Ok(classifier)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn open_classifier(
        &mut self,
        kind: ElementKind,
        decl: &ClassDecl,
    ) -> Result<NodeId, ModellerError> {
        let namespace = self.current_namespace();
        let scope = self.scope();

        let (kind, stereotype) = match (kind, self.model.schema()) {
            (ElementKind::Enumeration, SchemaVersion::Uml13) => {
                (ElementKind::Class, Some(stereotypes::ENUMERATION))
            }
            (kind, _) => (kind, None),
        };

        let classifier = match self.model.find_classifier(namespace, &decl.name) {
            Some(existing) => {
                self.reuse_classifier(existing, kind);
                existing
            }
            None => self.model.add(
                Element::new(kind, decl.name.as_str()).with_namespace(namespace),
            ),
        };

        if let Some(element) = self.model.get_mut(classifier) {
            element.visibility = decl.modifiers.visibility();
            element.is_abstract = decl.modifiers.is_abstract() || kind == ElementKind::Interface;
            element.is_leaf = decl.modifiers.is_final();
            element.is_static = decl.modifiers.is_static();
            element.type_parameters = decl.type_parameters.iter().map(SmolStr::new).collect();
            if let Some(stereotype) = stereotype {
                element.add_stereotype(stereotype);
            }
        }

        // a classifier entered from another unit is this unit's top level
        match self.state.current_mut() {
            Some(parent) if parent.retracts() => parent.keep_classifier(classifier),
            _ => self.manifest(classifier),
        }

        if let Some(doc) = &decl.documentation {
            self.add_documentation(classifier, doc)?;
        }

        if let Some(linker) = P::linker() {
            self.link_supertypes(linker, &scope, classifier, kind, decl);
        } else if P::LEVEL == Level::Outline {
            self.report_unlinked_supertypes(kind, decl);
        }

        self.state.push(Frame::open(self.model, classifier));
        Ok(classifier)
    }

    /// Prepare an existing classifier for a new declaration of it.
    fn reuse_classifier(&mut self, classifier: NodeId, kind: ElementKind) {
        let generated: Vec<NodeId> = self
            .model
            .owned(classifier)
            .iter()
            .copied()
            .filter(|&child| self.model.tagged_value(child, tags::GENERATED).is_some())
            .collect();
        for child in generated {
            self.model.remove(child);
        }
        self.model.remove_tagged_value(classifier, tags::GENERATED);

        if let Some(element) = self.model.get_mut(classifier) {
            if element.kind != kind {
                tracing::debug!("{}: '{}' is now a {kind}", self.unit, element.name());
                element.kind = kind;
            }
            element.origin = Origin::Declared;
        }
    }

    /// Link a top-level classifier to the unit's artifact.
    fn manifest(&mut self, classifier: NodeId) {
        if let Some(artifact) = self.state.artifact() {
            if self
                .model
                .find_relationship(ElementKind::Manifestation, artifact, classifier, None)
                .is_none()
            {
                self.model
                    .add_relationship(ElementKind::Manifestation, artifact, classifier, None);
            }
        }
        let unit = self.unit.clone();
        self.model.set_tagged_value(classifier, tags::SOURCE_PATH, unit);
    }

    fn link_supertypes(
        &mut self,
        linker: Linker,
        scope: &Scope,
        classifier: NodeId,
        kind: ElementKind,
        decl: &ClassDecl,
    ) {
        let mut generals = Vec::new();
        let mut realized = Vec::new();

        if kind == ElementKind::Interface {
            for name in &decl.interfaces {
                generals.extend(self.resolve_reference(linker, scope, name, true, ReferenceKind::Interface));
            }
        } else {
            if let Some(name) = &decl.superclass {
                generals.extend(self.resolve_reference(linker, scope, name, false, ReferenceKind::Superclass));
            }
            for name in &decl.interfaces {
                realized.extend(self.resolve_reference(linker, scope, name, true, ReferenceKind::Interface));
            }
        }

        generals.retain(|&t| t != classifier);
        realized.retain(|&t| t != classifier);
        self.wire_supertypes(linker, classifier, &generals, &realized);
    }

    /// A single pass never links supertypes; say so for each declared one.
    fn report_unlinked_supertypes(&mut self, kind: ElementKind, decl: &ClassDecl) {
        let superclass = decl
            .superclass
            .iter()
            .filter(|_| kind != ElementKind::Interface)
            .map(|name| (name, ReferenceKind::Superclass));
        let interfaces = decl.interfaces.iter().map(|name| (name, ReferenceKind::Interface));
        for (name, reference) in superclass.chain(interfaces) {
            tracing::debug!(
                "{}: {reference} '{name}' of '{}' not linked in a single pass",
                self.unit,
                decl.name
            );
            self.diagnostics.not_linked(self.file, name, reference);
        }
    }

    /// Create the declared generalizations and realizations and remove the
    /// ones no longer declared.
    fn wire_supertypes(
        &mut self,
        linker: Linker,
        classifier: NodeId,
        generals: &[NodeId],
        realized: &[NodeId],
    ) {
        let mut keep = Vec::new();
        for &target in generals {
            keep.push(self.link(linker, ElementKind::Generalization, classifier, target, None));
        }
        for &target in realized {
            keep.push(self.link(
                linker,
                ElementKind::Abstraction,
                classifier,
                target,
                Some(stereotypes::REALIZE),
            ));
        }

        let mut stale = self
            .model
            .relationships_from(classifier, ElementKind::Generalization);
        stale.extend(
            self.model
                .relationships_from(classifier, ElementKind::Abstraction)
                .into_iter()
                .filter(|&r| {
                    self.model
                        .get(r)
                        .is_some_and(|e| e.has_stereotype(stereotypes::REALIZE))
                }),
        );
        for relationship in stale.into_iter().filter(|r| !keep.contains(r)) {
            tracing::debug!("{}: removing undeclared supertype link {relationship:?}", self.unit);
            self.model.remove(relationship);
        }
    }
}
