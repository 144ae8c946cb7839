//! The modeller: the only place that mutates the model in response to parser
//! events.
//!
//! One `Modeller` is created per unit and per pass, bound to the shared
//! [`Model`]. The event methods live in three files:
//!
//! - `classifiers.rs` - classes, interfaces, enumerations, anonymous classes,
//!   frame push/pop and retraction
//! - `features.rs` - attributes/associations, operations, parameters, method
//!   bodies, enumeration literals, documentation
//! - `dependencies.rs` - artifacts, packages, imports, classifier dependencies
//!
//! Cross-references are only wired when the phase hands out a [`Linker`].

mod classifiers;
mod dependencies;
mod features;

use std::marker::PhantomData;

use crate::base::FileId;
use crate::model::{ChangeMark, ElementKind, Model, NodeId};
use crate::resolve::{ClassPath, Resolution, Resolver, Scope};

use super::diagnostics::{Diagnostic, DiagnosticCollector, ReferenceKind};
use super::error::ModellerError;
use super::phase::{Level, Linker, Phase};
use super::settings::ImportSettings;
use super::state::ParseState;

/// What one unit contributed.
#[derive(Clone, Debug, Default)]
pub struct ModellerOutput {
    /// Elements created by this modeller that are still live.
    pub created: Vec<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Modeller<'m, P: Phase> {
    model: &'m mut Model,
    classpath: &'m dyn ClassPath,
    settings: &'m ImportSettings,
    file: FileId,
    /// Path of the unit, stored as the `src_path` tag of its classifiers.
    unit: String,
    state: ParseState,
    diagnostics: DiagnosticCollector,
    mark: ChangeMark,
    /// Import dependencies of the artifact not yet declared again.
    stale_imports: Vec<NodeId>,
    _phase: PhantomData<P>,
}

impl<'m, P: Phase> Modeller<'m, P> {
    pub fn new(
        model: &'m mut Model,
        classpath: &'m dyn ClassPath,
        settings: &'m ImportSettings,
        file: FileId,
        unit: impl Into<String>,
    ) -> Self {
        let mark = model.mark();
        Self {
            model,
            classpath,
            settings,
            file,
            unit: unit.into(),
            state: ParseState::new(),
            diagnostics: DiagnosticCollector::new(),
            mark,
            stale_imports: Vec::new(),
            _phase: PhantomData,
        }
    }

    pub fn level(&self) -> Level {
        P::LEVEL
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn model(&self) -> &Model {
        self.model
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Close the unit.
    ///
    /// Fails if classifiers are still open. In the resolve phase, import
    /// dependencies of the artifact that were not declared again are removed.
    pub fn finish(mut self) -> Result<ModellerOutput, ModellerError> {
        if !self.state.is_top_level() {
            return Err(ModellerError::UnclosedClassifiers {
                depth: self.state.depth(),
            });
        }
        for dependency in std::mem::take(&mut self.stale_imports) {
            tracing::debug!("{}: retracting stale import {dependency:?}", self.unit);
            self.model.remove(dependency);
        }
        Ok(ModellerOutput {
            created: self.model.created_since(self.mark),
            diagnostics: self.diagnostics.into_diagnostics(),
        })
    }

    // ── Shared helpers ──────────────────────────────────────────────

    fn scope(&self) -> Scope {
        self.state.scope(self.model)
    }

    fn require_open(&self, what: &'static str) -> Result<NodeId, ModellerError> {
        self.state
            .current_classifier()
            .ok_or(ModellerError::outside(what))
    }

    fn require_live(&self, id: NodeId) -> Result<(), ModellerError> {
        if self.model.contains(id) {
            Ok(())
        } else {
            Err(ModellerError::StaleNode(id))
        }
    }

    /// Namespace for a new classifier: the open classifier, the declared
    /// package or the model root.
    fn current_namespace(&self) -> NodeId {
        self.state
            .current_classifier()
            .or(self.state.package())
            .unwrap_or_else(|| self.model.root())
    }

    /// Nearest package containing `id`.
    fn owning_package(&self, id: NodeId) -> NodeId {
        let mut current = self.model.namespace(id);
        while let Some(node) = current {
            if self.model.kind(node).is_some_and(|k| k.is_package()) {
                return node;
            }
            current = self.model.namespace(node);
        }
        self.model.root()
    }

    fn created_here(&self, id: NodeId) -> bool {
        self.model.changes().created_since(self.mark).contains(&id)
    }

    /// Resolve a cross-reference, falling back to forced creation when the
    /// settings allow it. Failures are logged and recorded.
    fn resolve_reference(
        &mut self,
        _linker: Linker,
        scope: &Scope,
        name: &str,
        interfaces_only: bool,
        reference: ReferenceKind,
    ) -> Option<NodeId> {
        let mut resolver = Resolver::new(&mut *self.model, self.classpath);
        match resolver.resolve(scope, name, interfaces_only) {
            Resolution::Found(id) => return Some(id),
            Resolution::TypeVariable => {
                tracing::trace!("{}: {reference} '{name}' is a type variable", self.unit);
                return None;
            }
            Resolution::NotFound => {}
        }
        if self.settings.force_creation {
            if let Some(id) = resolver.force(scope, name, interfaces_only) {
                tracing::warn!("{}: forced {reference} '{name}'", self.unit);
                self.diagnostics.forced(self.file, name, reference);
                return Some(id);
            }
        }
        tracing::warn!("{}: unresolved {reference} '{name}'", self.unit);
        self.diagnostics.unresolved(self.file, name, reference);
        None
    }

    /// Find or create the relationship `kind` from `source` to `target`.
    fn link(
        &mut self,
        _linker: Linker,
        kind: ElementKind,
        source: NodeId,
        target: NodeId,
        stereotype: Option<&str>,
    ) -> NodeId {
        match self.model.find_relationship(kind, source, target, stereotype) {
            Some(existing) => existing,
            None => {
                tracing::debug!(
                    "{}: {kind} {} -> {}",
                    self.unit,
                    self.model.qualified_name(source),
                    self.model.qualified_name(target)
                );
                self.model.add_relationship(kind, source, target, stereotype)
            }
        }
    }
}
