//! Unit-level events: the artifact, the package declaration, imports and
//! classifier dependencies.

use crate::base::constants::{CLASS_EXT, stereotypes};
use crate::import::diagnostics::ReferenceKind;
use crate::import::error::ModellerError;
use crate::import::phase::Phase;
use crate::model::{Element, ElementKind, NodeId};
use crate::resolve::Scope;

use super::Modeller;

impl<P: Phase> Modeller<'_, P> {
    /// Find or create the artifact standing for the unit `name`.
    ///
    /// The artifact lives in the current package, or the model root until a
    /// package is declared.
    pub fn add_component(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        let namespace = self.state.package().unwrap_or_else(|| self.model.root());
        let artifact = match self
            .model
            .find_member(namespace, name, |k| k == ElementKind::Artifact)
        {
            Some(existing) => existing,
            None => {
                let stereotype = if name.ends_with(&format!(".{CLASS_EXT}")) {
                    stereotypes::CLASSFILE
                } else {
                    stereotypes::SOURCE
                };
                self.model.add(
                    Element::new(ElementKind::Artifact, name)
                        .with_namespace(namespace)
                        .with_stereotype(stereotype),
                )
            }
        };
        self.state.set_artifact(artifact);
        self.collect_stale_imports();
        Ok(artifact)
    }

    /// Declare the unit's package and move the artifact into it.
    ///
    /// If the package already holds an artifact of the same name, that one is
    /// kept and a provisional artifact created by this unit is dropped.
    pub fn add_package(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        let root = self.model.root();
        let package = self.model.ensure_package(root, name);
        self.state.set_package(package);

        let Some(artifact) = self.state.artifact() else {
            return Ok(package);
        };
        if self.model.namespace(artifact) == Some(package) {
            return Ok(package);
        }
        let artifact_name = self.model.name(artifact).unwrap_or_default().to_string();
        match self
            .model
            .find_member(package, &artifact_name, |k| k == ElementKind::Artifact)
        {
            Some(existing) => {
                if self.created_here(artifact) {
                    self.model.remove(artifact);
                }
                self.state.set_artifact(existing);
                self.collect_stale_imports();
            }
            None => self.model.move_to(artifact, package),
        }
        Ok(package)
    }

    /// Record an `import` of the unit as a `javaImport` dependency of its
    /// artifact.
    ///
    /// Single-type imports name a classifier. On-demand imports name a
    /// package, or a classifier whose nested types are imported. Nothing is
    /// recorded before the resolve phase.
    pub fn add_import(&mut self, name: &str, on_demand: bool) -> Result<Option<NodeId>, ModellerError> {
        let Some(linker) = P::linker() else {
            return Ok(None);
        };
        let Some(artifact) = self.state.artifact() else {
            tracing::debug!("{}: import '{name}' without an artifact", self.unit);
            return Ok(None);
        };
        self.require_live(artifact)?;

        let scope = Scope::root(Some(artifact));
        let target = if on_demand {
            self.import_on_demand(&scope, name)
        } else {
            self.resolve_reference(linker, &scope, name, false, ReferenceKind::Import)
        };
        let Some(target) = target else {
            return Ok(None);
        };

        let dependency = self.link(
            linker,
            ElementKind::Dependency,
            artifact,
            target,
            Some(stereotypes::JAVA_IMPORT),
        );
        self.stale_imports.retain(|&d| d != dependency);
        Ok(Some(dependency))
    }

    /// Record that the current classifier depends on `name`.
    pub fn add_classifier_dependency(&mut self, name: &str) -> Result<Option<NodeId>, ModellerError> {
        let client = self.require_open("dependency")?;
        let Some(linker) = P::linker() else {
            return Ok(None);
        };
        let scope = self.scope();
        let Some(supplier) = self.resolve_reference(linker, &scope, name, false, ReferenceKind::Dependency)
        else {
            return Ok(None);
        };
        if supplier == client {
            return Ok(None);
        }
        Ok(Some(self.link(linker, ElementKind::Dependency, client, supplier, None)))
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Target of `import name.*`.
    fn import_on_demand(&mut self, scope: &Scope, name: &str) -> Option<NodeId> {
        let bases = [Some(self.model.root()), self.model.profile()];
        for base in bases.into_iter().flatten() {
            if let Some(package) = self.model.find_package(base, name) {
                if package != base {
                    return Some(package);
                }
            }
        }

        let mut resolver = crate::resolve::Resolver::new(&mut *self.model, self.classpath);
        if let Some(classifier) = resolver.resolve(scope, name, false).node() {
            return Some(classifier);
        }

        if self.settings.force_creation {
            let root = self.model.root();
            let package = self.model.ensure_package(root, name);
            tracing::warn!("{}: forced package '{name}'", self.unit);
            self.diagnostics.forced(self.file, name, ReferenceKind::Import);
            return Some(package);
        }
        tracing::warn!("{}: unresolved on-demand import '{name}'", self.unit);
        self.diagnostics.unresolved(self.file, name, ReferenceKind::Import);
        None
    }

    /// Remember the artifact's import dependencies so the ones not declared
    /// again can be dropped when the unit finishes.
    fn collect_stale_imports(&mut self) {
        self.stale_imports.clear();
        if P::linker().is_none() {
            return;
        }
        let Some(artifact) = self.state.artifact() else {
            return;
        };
        self.stale_imports = self
            .model
            .relationships_from(artifact, ElementKind::Dependency)
            .into_iter()
            .filter(|&d| {
                self.model
                    .get(d)
                    .is_some_and(|e| e.has_stereotype(stereotypes::JAVA_IMPORT))
            })
            .collect();
    }
}
