//! Feature events: attributes and associations, operations and their
//! parameters, method bodies, enumeration literals and documentation.

use smol_str::SmolStr;
use std::sync::Arc;

use crate::base::constants::{BODY_LANGUAGE, stereotypes, tags};
use crate::import::decl::{AttributeDecl, OperationDecl, ParamDecl};
use crate::import::diagnostics::ReferenceKind;
use crate::import::error::ModellerError;
use crate::import::javadoc::Javadoc;
use crate::import::phase::{Linker, Phase};
use crate::model::{Element, ElementKind, MethodBody, Multiplicity, NodeId};
use crate::resolve::lookup_profile;
use crate::resolve::names::{split_array, strip_decorations};

use super::Modeller;

/// Resolved type of a field or parameter.
#[derive(Clone, Copy, Debug, Default)]
struct FeatureType {
    ty: Option<NodeId>,
    multiplicity: Option<Multiplicity>,
}

impl<P: Phase> Modeller<'_, P> {
    /// Add or update a field of the current classifier.
    ///
    /// In the resolve phase, with associations enabled, a field typed by a
    /// modelled class, interface or enumeration becomes an association and
    /// the navigable end is returned. Everything else is an attribute.
    pub fn add_attribute(&mut self, decl: &AttributeDecl) -> Result<NodeId, ModellerError> {
        let owner = self.require_open("attribute")?;
        let scope = self.scope();
        let feature = self.feature_type(&scope, &decl.type_name, ReferenceKind::AttributeType);

        let association_target = match (P::linker(), feature.ty) {
            (Some(linker), Some(target))
                if self.settings.attributes_as_associations && self.is_modelled_type(target) =>
            {
                Some((linker, target))
            }
            _ => None,
        };

        let frame = self
            .state
            .current_mut()
            .ok_or(ModellerError::outside("attribute"))?;
        let existing_association = frame.take_feature(&decl.name, ElementKind::Association);
        let existing_attribute = frame.take_feature(&decl.name, ElementKind::Attribute);

        if let Some((linker, target)) = association_target {
            if let Some(attribute) = existing_attribute {
                self.model.remove(attribute);
            }
            let end = self.ensure_association(
                linker,
                owner,
                existing_association,
                decl,
                target,
                feature.multiplicity,
            );
            self.document(end, decl.documentation.as_deref())?;
            return Ok(end);
        }

        if let Some(association) = existing_association {
            // Before resolution an untyped field may still be an association.
            if P::linker().is_none() && feature.ty.is_none() {
                if let Some(attribute) = existing_attribute {
                    self.model.remove(attribute);
                }
                if let Some(end) = self.field_end(association) {
                    return Ok(end);
                }
            }
            tracing::debug!("{}: association '{}' becomes an attribute", self.unit, decl.name);
            self.model.remove(association);
        }

        let attribute = match existing_attribute {
            Some(existing) => existing,
            None => self.model.add(
                Element::new(ElementKind::Attribute, decl.name.as_str()).with_namespace(owner),
            ),
        };
        if feature.ty.is_some() || P::linker().is_some() {
            self.model.set_type(attribute, feature.ty);
        }
        if let Some(element) = self.model.get_mut(attribute) {
            element.visibility = decl.modifiers.visibility();
            element.is_static = decl.modifiers.is_static();
            element.is_read_only = decl.modifiers.is_final();
            element.initial_value = decl.initial_value.as_deref().map(Arc::from);
            element.multiplicity = feature.multiplicity;
        }
        self.document(attribute, decl.documentation.as_deref())?;
        Ok(attribute)
    }

    pub fn add_enumeration_literal(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        let owner = self.require_open("enumeration literal")?;
        let existing = self
            .state
            .current_mut()
            .and_then(|frame| frame.take_feature(name, ElementKind::EnumerationLiteral));
        Ok(match existing {
            Some(literal) => literal,
            None => self.model.add(
                Element::new(ElementKind::EnumerationLiteral, name).with_namespace(owner),
            ),
        })
    }

    /// Add or update an operation of the current classifier.
    ///
    /// An operation named like its classifier without a return parameter is a
    /// constructor and is stereotyped `create`. Parameters of an existing
    /// operation are rebuilt. Only the first return parameter is kept.
    pub fn add_operation(&mut self, decl: &OperationDecl) -> Result<NodeId, ModellerError> {
        let owner = self.require_open("operation")?;
        let scope = self.scope().type_variables(decl.type_parameters.iter().map(String::as_str));
        let owner_name = self.model.name(owner).unwrap_or_default().to_string();

        let mut returns = decl.params.iter().filter(|p| p.is_return());
        let kept_return = returns.next();
        let dropped = returns.count();
        if dropped > 0 {
            tracing::warn!(
                "{}: operation '{}' has {} return parameters, keeping the first",
                self.unit,
                decl.name,
                dropped + 1
            );
            self.diagnostics.extra_return(self.file, &decl.name, dropped);
        }
        let is_constructor = kept_return.is_none() && decl.name == owner_name;

        let existing = self
            .state
            .current_mut()
            .and_then(|frame| frame.take_feature(&decl.name, ElementKind::Operation));
        let operation = match existing {
            Some(operation) => {
                let old: Vec<NodeId> = self
                    .model
                    .owned(operation)
                    .iter()
                    .copied()
                    .filter(|&c| self.model.kind(c) == Some(ElementKind::Parameter))
                    .collect();
                for parameter in old {
                    self.model.remove(parameter);
                }
                operation
            }
            None => self.model.add(
                Element::new(ElementKind::Operation, decl.name.as_str()).with_namespace(owner),
            ),
        };

        if let Some(element) = self.model.get_mut(operation) {
            element.visibility = decl.modifiers.visibility();
            element.is_abstract = decl.modifiers.is_abstract();
            element.is_static = decl.modifiers.is_static();
            element.is_leaf = decl.modifiers.is_final();
            element.type_parameters = decl.type_parameters.iter().map(SmolStr::new).collect();
            if is_constructor {
                element.add_stereotype(stereotypes::CREATE);
            } else {
                element.stereotypes.retain(|s| s != stereotypes::CREATE);
            }
        }

        for param in decl.params.iter().filter(|p| !p.is_return()) {
            self.add_parameter(&scope, operation, param, ReferenceKind::ParameterType);
        }
        if let Some(param) = kept_return {
            self.add_parameter(&scope, operation, param, ReferenceKind::ReturnType);
        }

        match &decl.body {
            Some(body) => {
                self.add_body_to_operation(operation, body)?;
            }
            None => {
                let methods: Vec<NodeId> = self
                    .model
                    .owned(operation)
                    .iter()
                    .copied()
                    .filter(|&c| self.model.kind(c) == Some(ElementKind::Method))
                    .collect();
                for method in methods {
                    self.model.remove(method);
                }
            }
        }

        self.document(operation, decl.documentation.as_deref())?;
        Ok(operation)
    }

    /// Attach or replace the implementation text of an operation.
    pub fn add_body_to_operation(
        &mut self,
        operation: NodeId,
        body: &str,
    ) -> Result<NodeId, ModellerError> {
        self.require_open("method body")?;
        match self.model.kind(operation) {
            Some(ElementKind::Operation) => {}
            Some(kind) => {
                return Err(ModellerError::WrongKind {
                    expected: ElementKind::Operation.as_str(),
                    found: kind.as_str(),
                });
            }
            None => return Err(ModellerError::StaleNode(operation)),
        }

        let body = MethodBody {
            language: SmolStr::new(BODY_LANGUAGE),
            text: Arc::from(body),
        };
        let existing = self
            .model
            .owned(operation)
            .iter()
            .copied()
            .find(|&c| self.model.kind(c) == Some(ElementKind::Method));
        let method = match existing {
            Some(method) => method,
            None => {
                let name = self.model.name(operation).unwrap_or_default().to_string();
                self.model.add(
                    Element::new(ElementKind::Method, name)
                        .with_namespace(operation)
                        .with_specification(operation),
                )
            }
        };
        if let Some(element) = self.model.get_mut(method) {
            element.body = Some(body);
        }
        Ok(method)
    }

    /// Store a javadoc comment on `element`: the text as `documentation`,
    /// each `@tag` as a tagged value of the same name.
    pub fn add_documentation(&mut self, element: NodeId, javadoc: &str) -> Result<(), ModellerError> {
        self.require_live(element)?;
        let doc = Javadoc::parse(javadoc);
        if doc.text.is_empty() {
            self.model.remove_tagged_value(element, tags::DOCUMENTATION);
        } else {
            self.model
                .set_tagged_value(element, tags::DOCUMENTATION, doc.text.as_str());
        }
        for (tag, value) in &doc.tags {
            self.model.set_tagged_value(element, tag, value.as_str());
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────

    fn document(&mut self, element: NodeId, javadoc: Option<&str>) -> Result<(), ModellerError> {
        match javadoc {
            Some(doc) => self.add_documentation(element, doc),
            None => Ok(()),
        }
    }

    fn add_parameter(
        &mut self,
        scope: &crate::resolve::Scope,
        operation: NodeId,
        param: &ParamDecl,
        reference: ReferenceKind,
    ) -> NodeId {
        let feature = self.feature_type(scope, &param.type_name, reference);
        let parameter = self.model.add(
            Element::new(ElementKind::Parameter, param.name.as_str())
                .with_namespace(operation)
                .with_direction(param.direction)
                .with_type(feature.ty),
        );
        if let Some(element) = self.model.get_mut(parameter) {
            element.multiplicity = feature.multiplicity;
        }
        parameter
    }

    /// Resolve the type of a field or parameter.
    ///
    /// Before the resolve phase only the library profile is consulted.
    /// Arrays become `T[]` datatypes or multiplicity `0..*`.
    fn feature_type(
        &mut self,
        scope: &crate::resolve::Scope,
        type_name: &str,
        reference: ReferenceKind,
    ) -> FeatureType {
        let stripped = strip_decorations(type_name);
        let (base, dims) = split_array(&stripped);
        let element = match P::linker() {
            Some(linker) => self.resolve_reference(linker, scope, base, false, reference),
            None => lookup_profile(self.model, base),
        };
        if dims == 0 {
            return FeatureType {
                ty: element,
                multiplicity: None,
            };
        }
        if self.settings.arrays_as_datatypes {
            FeatureType {
                ty: element.map(|e| self.array_datatype(e, dims)),
                multiplicity: None,
            }
        } else {
            FeatureType {
                ty: element,
                multiplicity: Some(Multiplicity::MANY),
            }
        }
    }

    /// The `T[]` datatype for `element`, kept in the model root.
    fn array_datatype(&mut self, element: NodeId, dims: usize) -> NodeId {
        let name = format!("{}{}", self.model.qualified_name(element), "[]".repeat(dims));
        let root = self.model.root();
        match self
            .model
            .find_member(root, &name, |k| k == ElementKind::DataType)
        {
            Some(existing) => existing,
            None => self
                .model
                .add(Element::new(ElementKind::DataType, name).with_namespace(root)),
        }
    }

    /// Class, interface or enumeration outside the library profile.
    fn is_modelled_type(&self, id: NodeId) -> bool {
        self.model.kind(id).is_some_and(|k| k.is_reference_type()) && !self.model.is_in_profile(id)
    }

    /// The named, navigable end of an association.
    fn field_end(&self, association: NodeId) -> Option<NodeId> {
        self.model.owned(association).iter().copied().find(|&e| {
            self.model
                .get(e)
                .is_some_and(|el| el.kind == ElementKind::AssociationEnd && !el.name().is_empty())
        })
    }

    /// Reuse or build the association for a field, returning the field end.
    ///
    /// The field end is navigable, named after the field and typed by the
    /// target. The other end is unnamed, typed by the owner and navigable only
    /// when the association is self-referential. Associations are owned by
    /// the owner's package.
    fn ensure_association(
        &mut self,
        _linker: Linker,
        owner: NodeId,
        existing: Option<NodeId>,
        decl: &AttributeDecl,
        target: NodeId,
        multiplicity: Option<Multiplicity>,
    ) -> NodeId {
        let reusable = existing.and_then(|association| {
            let end = self.field_end(association)?;
            (self.model.get(end)?.type_ref() == Some(target)).then_some(end)
        });

        let end = match reusable {
            Some(end) => end,
            None => {
                if let Some(stale) = existing {
                    self.model.remove(stale);
                }
                let package = self.owning_package(owner);
                let association = self
                    .model
                    .add(Element::new(ElementKind::Association, "").with_namespace(package));
                let end = self.model.add(
                    Element::new(ElementKind::AssociationEnd, decl.name.as_str())
                        .with_namespace(association)
                        .with_type(Some(target)),
                );
                let other = self.model.add(
                    Element::new(ElementKind::AssociationEnd, "")
                        .with_namespace(association)
                        .with_type(Some(owner)),
                );
                if let Some(element) = self.model.get_mut(other) {
                    element.is_navigable = target == owner;
                    element.multiplicity = Some(Multiplicity::MANY);
                }
                tracing::debug!(
                    "{}: association {}.{} -> {}",
                    self.unit,
                    self.model.qualified_name(owner),
                    decl.name,
                    self.model.qualified_name(target)
                );
                end
            }
        };

        if let Some(element) = self.model.get_mut(end) {
            element.is_navigable = true;
            element.visibility = decl.modifiers.visibility();
            element.is_static = decl.modifiers.is_static();
            element.is_read_only = decl.modifiers.is_final();
            element.initial_value = decl.initial_value.as_deref().map(Arc::from);
            element.multiplicity = Some(multiplicity.unwrap_or(Multiplicity::OPTIONAL));
        }
        end
    }
}
