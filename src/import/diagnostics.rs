//! Diagnostics - recoverable problems found while modelling a unit.
//!
//! Every unresolved reference, forced placeholder and degraded declaration is
//! recorded here with the unit, the symbol and the kind of reference that was
//! attempted. Drivers group them per file.

use std::fmt;
use std::sync::Arc;

use crate::base::FileId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// What the unresolved name was used as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Superclass,
    Interface,
    AnonymousSupertype,
    Import,
    AttributeType,
    ParameterType,
    ReturnType,
    Dependency,
    OuterClassifier,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Superclass => "superclass",
            ReferenceKind::Interface => "interface",
            ReferenceKind::AnonymousSupertype => "anonymous supertype",
            ReferenceKind::Import => "import",
            ReferenceKind::AttributeType => "attribute type",
            ReferenceKind::ParameterType => "parameter type",
            ReferenceKind::ReturnType => "return type",
            ReferenceKind::Dependency => "dependency",
            ReferenceKind::OuterClassifier => "outer classifier",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message for one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The unit this diagnostic belongs to.
    pub file: FileId,
    pub severity: Severity,
    /// Stable code, see [`codes`].
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// The name that could not be handled, if any.
    pub symbol: Option<Arc<str>>,
    pub reference: Option<ReferenceKind>,
}

impl Diagnostic {
    pub fn error(file: FileId, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, Severity::Error, message)
    }

    pub fn warning(file: FileId, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, Severity::Warning, message)
    }

    pub fn info(file: FileId, message: impl Into<Arc<str>>) -> Self {
        Self::new(file, Severity::Info, message)
    }

    fn new(file: FileId, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            severity,
            code: None,
            message: message.into(),
            symbol: None,
            reference: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<Arc<str>>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_reference(mut self, reference: ReferenceKind) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: [{code}] {}", self.file, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// - **E0001-E0099**: errors (unresolved names, invalid structure, unit failures)
/// - **W0001-W0099**: warnings (degraded declarations, placeholders)
/// - **I0001-I0099**: information (references skipped by the phase)
pub mod codes {
    /// A referenced classifier could not be resolved.
    pub const UNRESOLVED_CLASSIFIER: &str = "E0001";
    /// A declaration could not be placed in the model.
    pub const INVALID_STRUCTURE: &str = "E0002";
    /// A unit could not be read or parsed.
    pub const FILE_FAILURE: &str = "E0003";

    /// An operation declared more than one return parameter.
    pub const EXTRA_RETURN_PARAMETER: &str = "W0001";
    /// A placeholder classifier was synthesized for an unresolved name.
    pub const FORCED_CREATION: &str = "W0002";
    /// A unit failed once and was imported on the retry pass.
    pub const RETRIED: &str = "W0003";

    /// A supertype was not linked because the import runs in a single pass.
    pub const SUPERTYPE_NOT_LINKED: &str = "I0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects the diagnostics of one unit.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn unresolved(&mut self, file: FileId, symbol: &str, reference: ReferenceKind) {
        self.add(
            Diagnostic::error(file, format!("unresolved {reference}: '{symbol}'"))
                .with_code(codes::UNRESOLVED_CLASSIFIER)
                .with_symbol(symbol)
                .with_reference(reference),
        );
    }

    pub fn forced(&mut self, file: FileId, symbol: &str, reference: ReferenceKind) {
        self.add(
            Diagnostic::warning(file, format!("created placeholder for {reference} '{symbol}'"))
                .with_code(codes::FORCED_CREATION)
                .with_symbol(symbol)
                .with_reference(reference),
        );
    }

    pub fn not_linked(&mut self, file: FileId, symbol: &str, reference: ReferenceKind) {
        self.add(
            Diagnostic::info(file, format!("{reference} '{symbol}' not linked in a single pass"))
                .with_code(codes::SUPERTYPE_NOT_LINKED)
                .with_symbol(symbol)
                .with_reference(reference),
        );
    }

    pub fn extra_return(&mut self, file: FileId, operation: &str, dropped: usize) {
        self.add(
            Diagnostic::warning(
                file,
                format!("operation '{operation}' declares {dropped} extra return parameter(s); keeping the first"),
            )
            .with_code(codes::EXTRA_RETURN_PARAMETER)
            .with_symbol(operation),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}
