//! The semantic model graph.
//!
//! The graph owns every element; builders only add, reuse or remove elements
//! through its API and hold nothing but [`NodeId`] handles.
//!
//! ```text
//! Model
//! ├── slots: Vec<Slot>                         (generational arena)
//! ├── members: (namespace, Name) → [NodeId]    (identity lookups)
//! ├── referrers: NodeId → [NodeId]             (cascading removal)
//! └── changes: ChangeTracker                   (created / removed journal)
//!
//! model                     (ElementKind::Model, root)
//! └── com.example           (Package, nested per dotted segment)
//!     ├── Foo.java          (Artifact) ──manifestation──▶ Foo
//!     └── Foo               (Class)
//!         ├── bar           (Attribute)
//!         └── run           (Operation) ── Parameter*
//! JavaProfile               (Profile, read-only root)
//! ├── int, boolean, ...     (DataType)
//! └── java.lang.String, ...
//! ```

mod changes;
mod element;
mod graph;
mod ids;
mod profile;

pub use changes::{ChangeMark, ChangeTracker};
pub use element::{
    Element, ElementKind, MethodBody, Multiplicity, Origin, ParameterDirection,
    RelationshipData, Visibility,
};
pub use graph::{Model, SchemaVersion};
pub use ids::{ElementId, NodeId};
