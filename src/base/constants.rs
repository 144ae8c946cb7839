//! Domain constants shared by the model builder and the import drivers.

/// Name of the root model package.
pub const MODEL_NAME: &str = "model";

/// Name of the read-only library profile root.
pub const PROFILE_NAME: &str = "JavaProfile";

/// Package searched for unqualified names after the enclosing scopes.
pub const DEFAULT_IMPORT_PACKAGE: &str = "java.lang";

/// Language tag stored on method bodies.
pub const BODY_LANGUAGE: &str = "Java";

// ============================================================================
// STEREOTYPES
// ============================================================================

pub mod stereotypes {
    /// Constructors.
    pub const CREATE: &str = "create";
    /// Realization abstractions (`implements`).
    pub const REALIZE: &str = "realize";
    /// Enumerations represented as classes.
    pub const ENUMERATION: &str = "enumeration";
    /// Dependencies created from `import` statements.
    pub const JAVA_IMPORT: &str = "javaImport";
    /// Source-file artifacts.
    pub const SOURCE: &str = "source";
    /// Classfile artifacts.
    pub const CLASSFILE: &str = "classfile";
}

// ============================================================================
// TAGGED VALUE NAMES
// ============================================================================

pub mod tags {
    /// Javadoc body text.
    pub const DOCUMENTATION: &str = "documentation";
    /// Path of the unit a classifier was imported from.
    pub const SOURCE_PATH: &str = "src_path";
    /// Marker for elements synthesized by earlier tooling; cleared on re-import.
    pub const GENERATED: &str = "generated";
}

// ============================================================================
// FILE EXTENSIONS
// ============================================================================

pub const JAVA_EXT: &str = "java";
pub const CLASS_EXT: &str = "class";
pub const ARCHIVE_EXTS: &[&str] = &["jar", "zip"];

/// Java primitive type keywords, modelled as profile datatypes.
pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];
