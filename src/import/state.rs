//! Parse state: where the modeller currently is inside a unit.
//!
//! ```text
//! top level ──add_component──▶ artifact ──add_package──▶ package
//!     │                                                     │
//!     └───────────── add_class / add_interface / ... ◀──────┘
//!                           │ push Frame
//!                           ▼
//!                  classifier (depth N) ──pop_classifier──▶ depth N-1
//! ```
//!
//! When a frame opens on a classifier that already has members, those
//! members are recorded as obsolete. Every member the unit declares again is
//! taken off the list; whatever is left when the frame pops is retracted.

use smol_str::SmolStr;

use crate::base::constants::tags;
use crate::model::{ElementKind, Model, NodeId};
use crate::resolve::{Scope, binary_name};

/// A member recorded when its frame opened.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Member {
    node: NodeId,
    name: SmolStr,
    kind: ElementKind,
}

/// One open classifier.
#[derive(Clone, Debug)]
pub struct Frame {
    classifier: NodeId,
    /// Whether leftover members are retracted on pop.
    retract: bool,
    obsolete_features: Vec<Member>,
    obsolete_classifiers: Vec<NodeId>,
    anonymous: u32,
}

impl Frame {
    /// Open a frame that retracts members not declared again.
    pub fn open(model: &Model, classifier: NodeId) -> Self {
        let mut obsolete_features = Vec::new();
        let mut obsolete_classifiers = Vec::new();

        for &child in model.owned(classifier) {
            let Some(element) = model.get(child) else {
                continue;
            };
            if element.kind.is_classifier() {
                // nested classifiers manifested by their own unit stay
                if model.tagged_value(child, tags::SOURCE_PATH).is_none() {
                    obsolete_classifiers.push(child);
                }
            } else if element.kind.is_feature() {
                obsolete_features.push(Member {
                    node: child,
                    name: element.name().into(),
                    kind: element.kind,
                });
            }
        }

        for (association, field_end) in owned_associations(model, classifier) {
            if let Some(name) = model.name(field_end) {
                obsolete_features.push(Member {
                    node: association,
                    name: name.into(),
                    kind: ElementKind::Association,
                });
            }
        }

        Self {
            classifier,
            retract: true,
            obsolete_features,
            obsolete_classifiers,
            anonymous: 0,
        }
    }

    /// Open a frame that only provides context; nothing is retracted.
    pub fn passive(classifier: NodeId) -> Self {
        Self {
            classifier,
            retract: false,
            obsolete_features: Vec::new(),
            obsolete_classifiers: Vec::new(),
            anonymous: 0,
        }
    }

    pub fn classifier(&self) -> NodeId {
        self.classifier
    }

    pub fn retracts(&self) -> bool {
        self.retract
    }

    /// Claim the first pre-existing member named `name` of `kind`.
    ///
    /// Overloads are matched in declaration order.
    pub fn take_feature(&mut self, name: &str, kind: ElementKind) -> Option<NodeId> {
        let index = self
            .obsolete_features
            .iter()
            .position(|m| m.kind == kind && m.name == name)?;
        Some(self.obsolete_features.remove(index).node)
    }

    /// Mark a nested classifier as declared again.
    pub fn keep_classifier(&mut self, classifier: NodeId) {
        self.obsolete_classifiers.retain(|&c| c != classifier);
    }

    /// Next anonymous class number, starting at 1.
    pub fn next_anonymous(&mut self) -> u32 {
        self.anonymous += 1;
        self.anonymous
    }

    /// Members not declared again, features first.
    pub fn into_obsolete(self) -> Vec<NodeId> {
        if !self.retract {
            return Vec::new();
        }
        self.obsolete_features
            .into_iter()
            .map(|m| m.node)
            .chain(self.obsolete_classifiers)
            .collect()
    }
}

/// Associations whose non-navigable (owner) end is typed by `classifier`,
/// paired with their named field end.
pub fn owned_associations(model: &Model, classifier: NodeId) -> Vec<(NodeId, NodeId)> {
    let mut found = Vec::new();
    for &end in model.referrers(classifier) {
        let is_owner_end = model
            .get(end)
            .is_some_and(|e| e.kind == ElementKind::AssociationEnd && e.name().is_empty());
        if !is_owner_end {
            continue;
        }
        let Some(association) = model.namespace(end) else {
            continue;
        };
        let field_end = model.owned(association).iter().copied().find(|&e| {
            model
                .get(e)
                .is_some_and(|el| el.kind == ElementKind::AssociationEnd && !el.name().is_empty())
        });
        if let Some(field_end) = field_end {
            if !found.iter().any(|&(a, _)| a == association) {
                found.push((association, field_end));
            }
        }
    }
    found
}

/// The scope stack of one unit.
#[derive(Clone, Debug, Default)]
pub struct ParseState {
    artifact: Option<NodeId>,
    package: Option<NodeId>,
    frames: Vec<Frame>,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifact(&self) -> Option<NodeId> {
        self.artifact
    }

    pub fn set_artifact(&mut self, artifact: NodeId) {
        self.artifact = Some(artifact);
    }

    /// The declared package, `None` for the default package.
    pub fn package(&self) -> Option<NodeId> {
        self.package
    }

    pub fn set_package(&mut self, package: NodeId) {
        self.package = Some(package);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn current_classifier(&self) -> Option<NodeId> {
        self.current().map(Frame::classifier)
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Build the context chain for the current position, including the type
    /// parameters of every open classifier.
    pub fn scope(&self, model: &Model) -> Scope {
        let package = self.package.unwrap_or_else(|| model.root());
        self.frames
            .iter()
            .fold(Scope::root(self.artifact).package(package), |scope, frame| {
                let type_parameters = model
                    .get(frame.classifier)
                    .map(|e| e.type_parameters.clone())
                    .unwrap_or_default();
                scope
                    .classifier(frame.classifier, binary_name(model, frame.classifier))
                    .type_variables(type_parameters)
            })
    }
}
