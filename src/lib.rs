//! # jmodel-base
//!
//! Builds a semantic class model (packages, classifiers, features and their
//! relationships) from Java source files and compiled classfiles.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver     → Import pass drivers: source files, classfiles, jar archives
//!   ↓
//! parser     → Logos lexer, declaration-level Java scanner
//! classfile  → Classfile reader replaying classes as events
//!   ↓
//! import     → Modeller event API, parse state, phases, settings
//!   ↓
//! resolve    → Name heuristics, scope chain, classpath lookup
//!   ↓
//! model      → Arena model graph and library profile
//! descriptor → JVM descriptor and signature normalizer
//!   ↓
//! base       → Primitives (FileId, Name interning, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → resolve → import → parsers → driver)
// ============================================================================

/// Foundation types: FileId, Name interning, TextRange, constants
pub mod base;

/// Model graph: elements, relationships, library profile
pub mod model;

/// JVM descriptors and generic signatures as Java type names
pub mod descriptor;

/// Name resolution: scope chain, classpath
pub mod resolve;

/// Modeller: turns parser events into model elements
pub mod import;

/// Classfile reader
pub mod classfile;

/// Java source scanner
pub mod parser;

/// Import drivers over files, directories and archives
pub mod driver;

// Re-export foundation types
pub use base::{FileId, Interner, LineCol, LineIndex, Name, TextRange, TextSize};

// Re-export the import surface
pub use driver::{ClassfileImporter, FileDiagnostics, ImportError, ImportOutcome, SourceImporter};
pub use import::{
    Diagnostic, ImportMode, ImportSettings, ModelEvents, Modeller, ModellerError, Outline,
    Resolve, Severity, Skeleton,
};
pub use model::{ElementKind, Model, NodeId};
