//! Structured errors for the inference engine.
//!
//! Constraint failure is a value, not a control-flow fault: the solver keeps
//! processing after a failed constraint and records one of these for callers
//! that want to report it. Rendering is out of scope here.

use mova_ast::Span;
use thiserror::Error;

use crate::abilities::AbilitySet;

/// Type error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    Mismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("wrong number of type arguments: expected {expected}, found {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("type `{ty}` is missing required abilities: {missing}")]
    AbilityViolation {
        ty: String,
        missing: AbilitySet,
        span: Span,
    },

    #[error("recursive type detected")]
    RecursiveType(Span),
}

impl TypeError {
    pub fn span(&self) -> Span {
        match self {
            TypeError::Mismatch { span, .. }
            | TypeError::ArityMismatch { span, .. }
            | TypeError::AbilityViolation { span, .. }
            | TypeError::RecursiveType(span) => *span,
        }
    }
}
