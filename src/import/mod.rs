//! Model building from parser events.
//!
//! Parsers never touch the model. They walk a unit and report what they see
//! through [`ModelEvents`]; the [`Modeller`] turns those events into model
//! elements, reusing what earlier passes and imports created.
//!
//! ## Key Types
//!
//! - [`Modeller`] - event sink bound to the model for one unit and one phase
//! - [`ParseState`] - artifact, package and open classifier frames
//! - [`Outline`], [`Skeleton`], [`Resolve`] - phases; only [`Resolve`] wires
//!   cross-references
//! - [`ImportSettings`] - toggles shared by one import session
//! - [`Diagnostic`] - recoverable problems, [`ModellerError`] - hard faults
//!
//! ## Event order for one unit
//!
//! ```text
//! add_component ─▶ add_package? ─▶ add_import*
//!     ─▶ ( add_class | add_interface | add_enumeration )
//!            ─▶ add_attribute* add_operation* add_enumeration_literal*
//!            ─▶ (nested classifier ... pop_classifier)*
//!        pop_classifier
//!     ─▶ finish
//! ```

mod decl;
mod diagnostics;
mod error;
mod javadoc;
mod modeller;
mod phase;
mod settings;
mod state;

pub use decl::{AttributeDecl, ClassDecl, Modifiers, OperationDecl, ParamDecl};
pub use diagnostics::{Diagnostic, DiagnosticCollector, ReferenceKind, Severity, codes};
pub use error::ModellerError;
pub use javadoc::Javadoc;
pub use modeller::{Modeller, ModellerOutput};
pub use phase::{Level, Linker, Outline, Phase, Resolve, Skeleton};
pub use settings::{ImportMode, ImportSettings};
pub use state::{Frame, ParseState, owned_associations};

use crate::model::NodeId;

/// The structural callbacks a parser issues while walking one unit.
///
/// Every call carries plain values; the receiver owns all model state.
pub trait ModelEvents {
    fn add_component(&mut self, name: &str) -> Result<NodeId, ModellerError>;
    fn add_package(&mut self, name: &str) -> Result<NodeId, ModellerError>;
    fn add_import(&mut self, name: &str, on_demand: bool) -> Result<Option<NodeId>, ModellerError>;

    fn add_class(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError>;
    fn add_interface(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError>;
    fn add_enumeration(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError>;
    fn add_anonymous_class(&mut self, type_name: &str) -> Result<NodeId, ModellerError>;
    fn enter_classifier(&mut self, qualified_name: &str) -> Result<NodeId, ModellerError>;
    fn pop_classifier(&mut self) -> Result<NodeId, ModellerError>;

    fn add_attribute(&mut self, decl: &AttributeDecl) -> Result<NodeId, ModellerError>;
    fn add_enumeration_literal(&mut self, name: &str) -> Result<NodeId, ModellerError>;
    fn add_operation(&mut self, decl: &OperationDecl) -> Result<NodeId, ModellerError>;
    fn add_body_to_operation(&mut self, operation: NodeId, body: &str) -> Result<NodeId, ModellerError>;
    fn add_classifier_dependency(&mut self, name: &str) -> Result<Option<NodeId>, ModellerError>;
    fn add_documentation(&mut self, element: NodeId, javadoc: &str) -> Result<(), ModellerError>;
}

impl<P: Phase> ModelEvents for Modeller<'_, P> {
    fn add_component(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        Modeller::add_component(self, name)
    }

    fn add_package(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        Modeller::add_package(self, name)
    }

    fn add_import(&mut self, name: &str, on_demand: bool) -> Result<Option<NodeId>, ModellerError> {
        Modeller::add_import(self, name, on_demand)
    }

    fn add_class(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        Modeller::add_class(self, decl)
    }

    fn add_interface(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        Modeller::add_interface(self, decl)
    }

    fn add_enumeration(&mut self, decl: &ClassDecl) -> Result<NodeId, ModellerError> {
        Modeller::add_enumeration(self, decl)
    }

    fn add_anonymous_class(&mut self, type_name: &str) -> Result<NodeId, ModellerError> {
        Modeller::add_anonymous_class(self, type_name)
    }

    fn enter_classifier(&mut self, qualified_name: &str) -> Result<NodeId, ModellerError> {
        Modeller::enter_classifier(self, qualified_name)
    }

    fn pop_classifier(&mut self) -> Result<NodeId, ModellerError> {
        Modeller::pop_classifier(self)
    }

    fn add_attribute(&mut self, decl: &AttributeDecl) -> Result<NodeId, ModellerError> {
        Modeller::add_attribute(self, decl)
    }

    fn add_enumeration_literal(&mut self, name: &str) -> Result<NodeId, ModellerError> {
        Modeller::add_enumeration_literal(self, name)
    }

    fn add_operation(&mut self, decl: &OperationDecl) -> Result<NodeId, ModellerError> {
        Modeller::add_operation(self, decl)
    }

    fn add_body_to_operation(&mut self, operation: NodeId, body: &str) -> Result<NodeId, ModellerError> {
        Modeller::add_body_to_operation(self, operation, body)
    }

    fn add_classifier_dependency(&mut self, name: &str) -> Result<Option<NodeId>, ModellerError> {
        Modeller::add_classifier_dependency(self, name)
    }

    fn add_documentation(&mut self, element: NodeId, javadoc: &str) -> Result<(), ModellerError> {
        Modeller::add_documentation(self, element, javadoc)
    }
}
