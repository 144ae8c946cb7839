//! The arena-backed model graph.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::Arc;

use super::changes::{ChangeMark, ChangeTracker};
use super::element::{Element, ElementKind, Origin};
use super::ids::NodeId;
use super::profile;
use crate::base::constants::MODEL_NAME;
use crate::base::{Interner, Name};

/// Which metamodel flavour the graph follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaVersion {
    /// Enumerations are classes stereotyped `enumeration`.
    Uml13,
    /// Enumerations are a dedicated [`ElementKind::Enumeration`].
    #[default]
    Uml2,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// The shared destination graph.
///
/// All elements live in one arena and are addressed by [`NodeId`]. Two
/// secondary indices are kept in sync with the arena:
///
/// - `members`: `(namespace, name)` → elements, for identity lookups
/// - `referrers`: element → elements that refer to it (types, relationship
///   ends, method specifications), for cascading removal
#[derive(Clone, Debug)]
pub struct Model {
    slots: Vec<Slot>,
    free: Vec<u32>,
    members: FxHashMap<(NodeId, Name), Vec<NodeId>>,
    referrers: FxHashMap<NodeId, Vec<NodeId>>,
    names: Interner,
    root: NodeId,
    profile: Option<NodeId>,
    schema: SchemaVersion,
    changes: ChangeTracker,
    len: usize,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// A UML2 model with the Java library profile installed.
    pub fn new() -> Self {
        Self::with_schema(SchemaVersion::default())
    }

    pub fn with_schema(schema: SchemaVersion) -> Self {
        let mut model = Self::without_profile(schema);
        profile::install_java_profile(&mut model);
        model.changes.clear();
        model
    }

    /// A model with only the root package.
    pub fn without_profile(schema: SchemaVersion) -> Self {
        let mut model = Self {
            slots: Vec::new(),
            free: Vec::new(),
            members: FxHashMap::default(),
            referrers: FxHashMap::default(),
            names: Interner::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            profile: None,
            schema,
            changes: ChangeTracker::new(),
            len: 0,
        };
        model.root = model.alloc(Element::new(ElementKind::Model, MODEL_NAME));
        model.changes.clear();
        model
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn profile(&self) -> Option<NodeId> {
        self.profile
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    pub fn mark(&self) -> ChangeMark {
        self.changes.mark()
    }

    /// Live elements created since `mark`.
    pub fn created_since(&self, mark: ChangeMark) -> Vec<NodeId> {
        self.changes
            .created_since(mark)
            .iter()
            .copied()
            .filter(|&id| self.contains(id))
            .collect()
    }

    // ── Access ──────────────────────────────────────────────────────

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    /// Mutable access to the non-indexed properties of an element.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    pub fn kind(&self, id: NodeId) -> Option<ElementKind> {
        self.get(id).map(|e| e.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Element::name)
    }

    pub fn namespace(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Element::namespace)
    }

    pub fn owned(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Element::owned).unwrap_or(&[])
    }

    /// Elements that refer to `id` by type, relationship end or specification.
    pub fn referrers(&self, id: NodeId) -> &[NodeId] {
        self.referrers.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let element = slot.element.as_ref()?;
            Some((
                NodeId {
                    index: index as u32,
                    generation: slot.generation,
                },
                element,
            ))
        })
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Add an element. Without an explicit namespace it is placed in the root
    /// model package.
    pub fn add(&mut self, mut element: Element) -> NodeId {
        if element.namespace.is_none() {
            element.namespace = Some(self.root);
        }
        self.alloc(element)
    }

    pub(super) fn set_profile(&mut self, profile: NodeId) {
        self.profile = Some(profile);
    }

    /// Add a namespace-less root (used for the library profile).
    pub(super) fn add_root(&mut self, element: Element) -> NodeId {
        debug_assert!(element.namespace.is_none());
        self.alloc(element)
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        let namespace = element.namespace;
        let name = element.name.clone();
        let references: Vec<NodeId> = element.references().collect();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.len += 1;

        if let Some(ns) = namespace {
            if let Some(parent) = self.get_mut(ns) {
                parent.owned.push(id);
            }
            self.index_member(ns, &name, id);
        }
        for target in references {
            self.referrers.entry(target).or_default().push(id);
        }
        self.changes.record_created(id);
        id
    }

    fn index_member(&mut self, namespace: NodeId, name: &str, id: NodeId) {
        if name.is_empty() {
            return;
        }
        let key = (namespace, self.names.intern(name));
        self.members.entry(key).or_default().push(id);
    }

    fn unindex_member(&mut self, namespace: NodeId, name: &str, id: NodeId) {
        let Some(key) = self.names.find(name).map(|n| (namespace, n)) else {
            return;
        };
        if let Some(list) = self.members.get_mut(&key) {
            list.retain(|&m| m != id);
            if list.is_empty() {
                self.members.remove(&key);
            }
        }
    }

    /// Re-home an element under a new namespace, keeping its identity.
    pub fn move_to(&mut self, id: NodeId, namespace: NodeId) {
        let Some((old, name)) = self.get(id).map(|e| (e.namespace, e.name.clone())) else {
            return;
        };
        if old == Some(namespace) {
            return;
        }
        if let Some(old) = old {
            self.unindex_member(old, &name, id);
            if let Some(parent) = self.get_mut(old) {
                parent.owned.retain(|&c| c != id);
            }
        }
        if let Some(parent) = self.get_mut(namespace) {
            parent.owned.push(id);
        }
        if let Some(element) = self.get_mut(id) {
            element.namespace = Some(namespace);
        }
        self.index_member(namespace, &name, id);
    }

    /// Set or clear the type of an attribute, parameter or association end.
    pub fn set_type(&mut self, id: NodeId, ty: Option<NodeId>) {
        let Some(old) = self.get(id).map(|e| e.type_ref) else {
            return;
        };
        if old == ty {
            return;
        }
        if let Some(old) = old {
            self.drop_referrer(old, id);
        }
        if let Some(new) = ty {
            self.referrers.entry(new).or_default().push(id);
        }
        if let Some(element) = self.get_mut(id) {
            element.type_ref = ty;
        }
    }

    fn drop_referrer(&mut self, target: NodeId, referrer: NodeId) {
        if let Some(list) = self.referrers.get_mut(&target) {
            list.retain(|&r| r != referrer);
            if list.is_empty() {
                self.referrers.remove(&target);
            }
        }
    }

    /// Remove an element together with everything it owns and every
    /// relationship that depends on it. Returns the number of removed elements.
    ///
    /// Attributes and parameters typed by a removed classifier survive with
    /// their type cleared; associations lose both ends.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut removed = 0;

        while let Some(id) = stack.pop() {
            let Some(element) = self.take(id) else {
                continue;
            };
            removed += 1;
            stack.extend(element.owned.iter().copied());

            for referrer in self.referrers.remove(&id).unwrap_or_default() {
                let Some(kind) = self.kind(referrer) else {
                    continue;
                };
                match kind {
                    ElementKind::AssociationEnd => {
                        if let Some(association) = self.namespace(referrer) {
                            stack.push(association);
                        }
                    }
                    ElementKind::Method => stack.push(referrer),
                    k if k.is_relationship() => stack.push(referrer),
                    _ => {
                        if let Some(e) = self.get_mut(referrer) {
                            if e.type_ref == Some(id) {
                                e.type_ref = None;
                            }
                        }
                    }
                }
            }
        }
        removed
    }

    fn take(&mut self, id: NodeId) -> Option<Element> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let element = slot.element.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;

        if let Some(ns) = element.namespace {
            self.unindex_member(ns, &element.name, id);
            if let Some(parent) = self.get_mut(ns) {
                parent.owned.retain(|&c| c != id);
            }
        }
        for target in element.references() {
            self.drop_referrer(target, id);
        }
        self.changes.record_removed(id);
        Some(element)
    }

    // ── Member lookup ───────────────────────────────────────────────

    /// All elements named `name` directly inside `namespace`.
    pub fn members_named(&self, namespace: NodeId, name: &str) -> &[NodeId] {
        self.names
            .find(name)
            .and_then(|n| self.members.get(&(namespace, n)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First member named `name` whose kind satisfies `filter`.
    pub fn find_member(
        &self,
        namespace: NodeId,
        name: &str,
        filter: impl Fn(ElementKind) -> bool,
    ) -> Option<NodeId> {
        self.members_named(namespace, name)
            .iter()
            .copied()
            .find(|&id| self.kind(id).is_some_and(&filter))
    }

    pub fn find_classifier(&self, namespace: NodeId, name: &str) -> Option<NodeId> {
        self.find_member(namespace, name, |k| k.is_classifier())
    }

    /// Walk a dotted package path below `base`.
    pub fn find_package(&self, base: NodeId, path: &str) -> Option<NodeId> {
        path.split('.')
            .filter(|s| !s.is_empty())
            .try_fold(base, |current, segment| {
                self.find_member(current, segment, |k| k == ElementKind::Package)
            })
    }

    /// Walk a dotted package path below `base`, creating the missing tail.
    ///
    /// Only the segments after the deepest existing package are created.
    pub fn ensure_package(&mut self, base: NodeId, path: &str) -> NodeId {
        let origin = if self.is_in_profile(base) {
            Origin::Library
        } else {
            Origin::Declared
        };
        let mut current = base;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match self.find_member(current, segment, |k| k == ElementKind::Package) {
                Some(existing) => existing,
                None => self.add(
                    Element::new(ElementKind::Package, segment)
                        .with_namespace(current)
                        .with_origin(origin),
                ),
            };
        }
        current
    }

    /// Whether `id` lives inside the read-only library profile.
    pub fn is_in_profile(&self, id: NodeId) -> bool {
        let Some(profile) = self.profile else {
            return false;
        };
        let mut current = Some(id);
        while let Some(node) = current {
            if node == profile {
                return true;
            }
            current = self.namespace(node);
        }
        false
    }

    /// Dotted name below the model or profile root, e.g. `java.util.Map.Entry`.
    pub fn qualified_name(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(element) = self.get(node) else {
                break;
            };
            if matches!(element.kind, ElementKind::Model | ElementKind::Profile) {
                break;
            }
            segments.push(element.name.clone());
            current = element.namespace;
        }
        segments.reverse();
        segments.join(".")
    }

    // ── Relationships ───────────────────────────────────────────────

    /// Relationship elements of `kind` whose source is `source`.
    pub fn relationships_from(&self, source: NodeId, kind: ElementKind) -> Vec<NodeId> {
        self.referrers(source)
            .iter()
            .copied()
            .filter(|&r| {
                self.get(r).is_some_and(|e| {
                    e.kind == kind && e.relationship.is_some_and(|rd| rd.source == source)
                })
            })
            .collect()
    }

    /// Relationship of `kind` between `source` and `target`, optionally
    /// requiring a stereotype.
    pub fn find_relationship(
        &self,
        kind: ElementKind,
        source: NodeId,
        target: NodeId,
        stereotype: Option<&str>,
    ) -> Option<NodeId> {
        self.relationships_from(source, kind).into_iter().find(|&r| {
            self.get(r).is_some_and(|e| {
                e.relationship.is_some_and(|rd| rd.target == target)
                    && match stereotype {
                        Some(s) => e.has_stereotype(s),
                        None => e.stereotypes.is_empty(),
                    }
            })
        })
    }

    /// Create a relationship owned by its source.
    pub fn add_relationship(
        &mut self,
        kind: ElementKind,
        source: NodeId,
        target: NodeId,
        stereotype: Option<&str>,
    ) -> NodeId {
        let mut element = Element::new_relationship(kind, source, target).with_namespace(source);
        if let Some(s) = stereotype {
            element = element.with_stereotype(s);
        }
        self.add(element)
    }

    // ── Tagged values ───────────────────────────────────────────────

    pub fn tagged_value(&self, owner: NodeId, tag: &str) -> Option<&str> {
        self.find_member(owner, tag, |k| k == ElementKind::TaggedValue)
            .and_then(|id| self.get(id))
            .and_then(|e| e.value.as_deref())
    }

    /// Create or overwrite the tagged value `tag` on `owner`.
    pub fn set_tagged_value(
        &mut self,
        owner: NodeId,
        tag: &str,
        value: impl Into<Arc<str>>,
    ) -> NodeId {
        let value = value.into();
        match self.find_member(owner, tag, |k| k == ElementKind::TaggedValue) {
            Some(existing) => {
                if let Some(e) = self.get_mut(existing) {
                    e.value = Some(value);
                }
                existing
            }
            None => self.add(
                Element::new(ElementKind::TaggedValue, SmolStr::new(tag))
                    .with_namespace(owner)
                    .with_value(value),
            ),
        }
    }

    pub fn remove_tagged_value(&mut self, owner: NodeId, tag: &str) -> bool {
        match self.find_member(owner, tag, |k| k == ElementKind::TaggedValue) {
            Some(id) => self.remove(id) > 0,
            None => false,
        }
    }
}
