//! Mova Type System
//!
//! Type representation and type inference for the Mova contract language.
//!
//! ## Bidirectional inference
//!
//! Checking is driven from two directions at once:
//! - **Synthesis**: the external driver walks expressions bottom-up,
//!   recording a type (possibly containing fresh inference variables) for
//!   each node in the item's [`InferenceContext`].
//! - **Expectation**: [`expected_ty`] walks one step up the surrounding
//!   syntax and derives the type an expression must satisfy, whether from a
//!   `let` annotation, a call's declared parameter types, or a
//!   generic-argument slot, so type information flows back down into the
//!   expression.
//!
//! Both directions meet in the [`ConstraintSolver`]: every requirement
//! becomes an [`EqualityConstraint`], and a single deterministic pass per
//! item decomposes structural pairs, merges variables through two union-find
//! tables (general and integer-width), and gates every merge on the
//! [ability](AbilitySet) lattice. Failures are values: a bad constraint
//! downgrades the item's result and records a [`TypeError`], but independent
//! constraints keep resolving, and anything left unresolved finalizes to
//! [`Ty::Unknown`], which unifies with everything, so one error never
//! cascades.

pub mod abilities;
pub mod context;
pub mod decl;
pub mod error;
pub mod expected;
pub mod solver;
pub mod ty;
pub mod unify;

pub use abilities::{Ability, AbilitySet};
pub use context::{CallTypes, InferenceContext};
pub use decl::{Declarations, FunctionInfo, ItemContext, StructInfo, TypeParamInfo};
pub use error::TypeError;
pub use expected::expected_ty;
pub use solver::{ConstraintSolver, EqualityConstraint};
pub use ty::{is_compatible, IntegerKind, Ty, TyInfer, TyTypeParam};
pub use unify::{IntVar, TyVar, UnificationTable, UnifyKey};
