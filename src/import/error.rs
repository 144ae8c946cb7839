//! Hard faults raised by the modeller.
//!
//! These abort the current unit only. Everything recoverable (unresolved
//! names, extra return parameters) is reported as a
//! [`Diagnostic`](super::Diagnostic) instead.

use thiserror::Error;

use crate::model::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModellerError {
    #[error("{what} outside of an open classifier")]
    NoOpenClassifier { what: &'static str },

    #[error("pop without an open classifier")]
    UnbalancedPop,

    #[error("{depth} classifier(s) still open at end of unit")]
    UnclosedClassifiers { depth: usize },

    #[error("outer classifier `{name}` not found")]
    OuterClassifierNotFound { name: String },

    #[error("stale model handle {0:?}")]
    StaleNode(NodeId),

    #[error("expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
}

impl ModellerError {
    pub fn outside(what: &'static str) -> Self {
        Self::NoOpenClassifier { what }
    }
}
