//! Element kinds and the element record stored in the arena.

use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

use super::ids::{ElementId, NodeId};

// ============================================================================
// ELEMENT KINDS
// ============================================================================

/// The metatype of a model element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    // Namespaces
    Model,
    Package,
    Profile,
    Artifact,

    // Classifiers
    Class,
    Interface,
    Enumeration,
    DataType,

    // Features
    EnumerationLiteral,
    Attribute,
    Operation,
    Parameter,
    Method,

    // Relationships
    Generalization,
    Abstraction,
    Association,
    AssociationEnd,
    Dependency,
    Manifestation,

    // Annotations
    TaggedValue,
}

impl ElementKind {
    /// Model, profile and package nodes.
    pub fn is_package(&self) -> bool {
        matches!(self, Self::Model | Self::Package | Self::Profile)
    }

    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Enumeration | Self::DataType
        )
    }

    /// Kinds that can own nested classifiers and carry type references.
    pub fn is_reference_type(&self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Enumeration)
    }

    /// Members of a classifier that take part in retraction.
    pub fn is_feature(&self) -> bool {
        matches!(
            self,
            Self::Attribute | Self::Operation | Self::Method | Self::EnumerationLiteral
        )
    }

    /// Kinds whose record carries [`RelationshipData`].
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            Self::Generalization | Self::Abstraction | Self::Dependency | Self::Manifestation
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Package => "Package",
            Self::Profile => "Profile",
            Self::Artifact => "Artifact",
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Enumeration => "Enumeration",
            Self::DataType => "DataType",
            Self::EnumerationLiteral => "EnumerationLiteral",
            Self::Attribute => "Attribute",
            Self::Operation => "Operation",
            Self::Parameter => "Parameter",
            Self::Method => "Method",
            Self::Generalization => "Generalization",
            Self::Abstraction => "Abstraction",
            Self::Association => "Association",
            Self::AssociationEnd => "AssociationEnd",
            Self::Dependency => "Dependency",
            Self::Manifestation => "Manifestation",
            Self::TaggedValue => "TaggedValue",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PROPERTY TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParameterDirection {
    #[default]
    In,
    Return,
}

/// Multiplicity range; `upper == None` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: Option<u32>,
}

impl Multiplicity {
    pub const ONE: Self = Self { lower: 1, upper: Some(1) };
    pub const OPTIONAL: Self = Self { lower: 0, upper: Some(1) };
    pub const MANY: Self = Self { lower: 0, upper: None };

    pub fn is_many(&self) -> bool {
        self.upper.is_none_or(|upper| upper > 1)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) if upper == self.lower => write!(f, "{upper}"),
            Some(upper) => write!(f, "{}..{upper}", self.lower),
            None => write!(f, "{}..*", self.lower),
        }
    }
}

/// Where an element came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Declared by an imported unit.
    #[default]
    Declared,
    /// Synthesized from a classpath lookup.
    Classpath,
    /// Synthesized placeholder for an unresolved name.
    Forced,
    /// Part of the read-only library profile.
    Library,
}

/// Raw method body text with its language tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBody {
    pub language: SmolStr,
    pub text: Arc<str>,
}

/// Source/target of a directed relationship.
///
/// For generalizations the source is the child, for abstractions and
/// dependencies the source is the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelationshipData {
    pub source: NodeId,
    pub target: NodeId,
}

// ============================================================================
// ELEMENT
// ============================================================================

/// One node of the model graph.
///
/// `name` and `namespace` are indexed by the owning [`Model`](super::Model)
/// and must only be changed through it.
#[derive(Clone, Debug)]
pub struct Element {
    pub element_id: ElementId,
    pub kind: ElementKind,
    pub(super) name: SmolStr,
    pub(super) namespace: Option<NodeId>,
    pub(super) owned: Vec<NodeId>,
    pub origin: Origin,
    pub visibility: Visibility,
    pub is_abstract: bool,
    /// `final` for classifiers and operations.
    pub is_leaf: bool,
    pub is_static: bool,
    /// `final` for attributes.
    pub is_read_only: bool,
    pub stereotypes: Vec<SmolStr>,
    pub type_parameters: Vec<SmolStr>,
    /// Type of an attribute, parameter or association end.
    pub(super) type_ref: Option<NodeId>,
    pub initial_value: Option<Arc<str>>,
    pub direction: Option<ParameterDirection>,
    pub multiplicity: Option<Multiplicity>,
    pub is_navigable: bool,
    pub body: Option<MethodBody>,
    /// Operation implemented by a method.
    pub(super) specification: Option<NodeId>,
    /// Value of a tagged value.
    pub value: Option<Arc<str>>,
    pub(super) relationship: Option<RelationshipData>,
}

impl Element {
    pub fn new(kind: ElementKind, name: impl Into<SmolStr>) -> Self {
        Self {
            element_id: ElementId::generate(),
            kind,
            name: name.into(),
            namespace: None,
            owned: Vec::new(),
            origin: Origin::Declared,
            visibility: Visibility::Public,
            is_abstract: false,
            is_leaf: false,
            is_static: false,
            is_read_only: false,
            stereotypes: Vec::new(),
            type_parameters: Vec::new(),
            type_ref: None,
            initial_value: None,
            direction: None,
            multiplicity: None,
            is_navigable: false,
            body: None,
            specification: None,
            value: None,
            relationship: None,
        }
    }

    /// A relationship element; the name is empty.
    pub fn new_relationship(kind: ElementKind, source: NodeId, target: NodeId) -> Self {
        Self {
            relationship: Some(RelationshipData { source, target }),
            ..Self::new(kind, "")
        }
    }

    pub fn with_namespace(mut self, namespace: NodeId) -> Self {
        self.namespace = Some(namespace);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<SmolStr>) -> Self {
        self.stereotypes.push(stereotype.into());
        self
    }

    pub fn with_type(mut self, ty: Option<NodeId>) -> Self {
        self.type_ref = ty;
        self
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_specification(mut self, operation: NodeId) -> Self {
        self.specification = Some(operation);
        self
    }

    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<NodeId> {
        self.namespace
    }

    pub fn owned(&self) -> &[NodeId] {
        &self.owned
    }

    pub fn type_ref(&self) -> Option<NodeId> {
        self.type_ref
    }

    pub fn specification(&self) -> Option<NodeId> {
        self.specification
    }

    pub fn relationship(&self) -> Option<RelationshipData> {
        self.relationship
    }

    pub fn has_stereotype(&self, stereotype: &str) -> bool {
        self.stereotypes.iter().any(|s| s == stereotype)
    }

    /// Add `stereotype` unless already present.
    pub fn add_stereotype(&mut self, stereotype: &str) {
        if !self.has_stereotype(stereotype) {
            self.stereotypes.push(stereotype.into());
        }
    }

    /// Identity of this node and every handle it refers to.
    pub(super) fn references(&self) -> impl Iterator<Item = NodeId> + '_ {
        let rel = self
            .relationship
            .map(|rd| [rd.source, rd.target])
            .into_iter()
            .flatten();
        self.type_ref
            .into_iter()
            .chain(self.specification)
            .chain(rel)
    }
}
