//! Equality-constraint solving.
//!
//! The driver registers equality constraints between types as it walks an
//! item; [`ConstraintSolver::process_all`] drains them, unifying variables
//! and decomposing structural pairs. Sub-constraints go to the *front* of
//! the worklist so decomposition proceeds depth-first and a deeply nested
//! mismatch surfaces at its innermost cause. A failed constraint downgrades
//! the aggregate result but never stops the remaining constraints: one bad
//! expression must not block resolving independent variables elsewhere in
//! the same item.

use mova_ast::Span;
use std::collections::VecDeque;
use std::fmt;

use crate::context::InferenceContext;
use crate::decl::Declarations;
use crate::error::TypeError;
use crate::ty::{is_compatible, Ty, TyInfer};
use crate::unify::TyVar;

/// A request that the solver make two types equal.
///
/// The constructor keeps the non-`Unknown` operand canonical-left: a
/// `(Unknown, X)` pair is reordered to `(X, Unknown)`, so the dispatch only
/// ever handles `Unknown` on the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityConstraint {
    pub ty1: Ty,
    pub ty2: Ty,
    pub span: Span,
}

impl EqualityConstraint {
    pub fn new(ty1: Ty, ty2: Ty, span: Span) -> Self {
        // always sort Unknown to the right
        if ty1.is_unknown() && !ty2.is_unknown() {
            Self {
                ty1: ty2,
                ty2: ty1,
                span,
            }
        } else {
            Self { ty1, ty2, span }
        }
    }
}

impl fmt::Display for EqualityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.ty1, self.ty2)
    }
}

/// Double-ended worklist solver over one item's [`InferenceContext`].
pub struct ConstraintSolver<'a> {
    ctx: &'a mut InferenceContext,
    decls: &'a Declarations,
    constraints: VecDeque<EqualityConstraint>,
}

impl<'a> ConstraintSolver<'a> {
    pub fn new(ctx: &'a mut InferenceContext, decls: &'a Declarations) -> Self {
        Self {
            ctx,
            decls,
            constraints: VecDeque::new(),
        }
    }

    pub fn register(&mut self, constraint: EqualityConstraint) {
        self.constraints.push_back(constraint);
    }

    /// Drain the worklist. Returns whether every constraint was satisfiable;
    /// processing deliberately continues past failures.
    pub fn process_all(&mut self) -> bool {
        let mut solvable = true;
        while let Some(constraint) = self.constraints.pop_front() {
            if !self.process_one(constraint) {
                solvable = false;
            }
        }
        solvable
    }

    fn process_one(&mut self, raw: EqualityConstraint) -> bool {
        let span = raw.span;
        // Substitute every variable occurrence through the union-find chains,
        // then re-normalize in case a variable resolved to Unknown.
        let constraint = EqualityConstraint::new(
            self.ctx.resolve_ty_infer_deep(&raw.ty1),
            self.ctx.resolve_ty_infer_deep(&raw.ty2),
            span,
        );
        let mut ty1 = constraint.ty1;
        let mut ty2 = constraint.ty2;
        if self.ctx.msl {
            ty1 = ty1.msl_ty();
            ty2 = ty2.msl_ty();
        }

        match (&ty1, &ty2) {
            (Ty::Infer(TyInfer::IntVar(v1)), Ty::Infer(TyInfer::IntVar(v2))) => {
                self.ctx.unify_int_var_var(*v1, *v2);
                true
            }
            (Ty::Infer(TyInfer::IntVar(var)), Ty::Integer(kind))
            | (Ty::Integer(kind), Ty::Infer(TyInfer::IntVar(var))) => {
                if let Some(existing) = self.ctx.unify_int_var_value(*var, *kind) {
                    self.constraints.push_front(EqualityConstraint::new(
                        Ty::Integer(existing),
                        Ty::Integer(*kind),
                        span,
                    ));
                }
                true
            }

            (Ty::Infer(TyInfer::Var(v1)), Ty::Infer(TyInfer::Var(v2))) => {
                // Unifying eliminates ty1's variable: every ability it is
                // bound to must already be provided by the survivor.
                if !self.check_abilities(&ty1, &ty2, span) {
                    return false;
                }
                self.ctx.unify_ty_var_var(*v1, *v2);
                true
            }

            (Ty::Infer(TyInfer::Var(var)), _) => self.unify_var_with_value(*var, &ty1, &ty2, span),
            (_, Ty::Infer(TyInfer::Var(var))) => self.unify_var_with_value(*var, &ty2, &ty1, span),

            (Ty::Vector(item1), Ty::Vector(item2)) => {
                self.constraints.push_front(EqualityConstraint::new(
                    (**item1).clone(),
                    (**item2).clone(),
                    span,
                ));
                true
            }
            (Ty::Vector(item), Ty::Unknown) => {
                self.constraints.push_front(EqualityConstraint::new(
                    (**item).clone(),
                    Ty::Unknown,
                    span,
                ));
                true
            }

            (
                Ty::Reference {
                    referenced: r1, ..
                },
                Ty::Reference {
                    referenced: r2, ..
                },
            ) => {
                // Mutability is not constrained: &T and &mut T unify, only
                // the referenced types are compared.
                self.constraints.push_front(EqualityConstraint::new(
                    (**r1).clone(),
                    (**r2).clone(),
                    span,
                ));
                true
            }
            (Ty::Reference { referenced, .. }, Ty::Unknown) => {
                self.constraints.push_front(EqualityConstraint::new(
                    (**referenced).clone(),
                    Ty::Unknown,
                    span,
                ));
                true
            }

            (
                Ty::Struct {
                    item: item1,
                    type_args: args1,
                },
                Ty::Struct {
                    item: item2,
                    type_args: args2,
                },
            ) if item1 == item2 => {
                if args1.len() != args2.len() {
                    self.ctx.add_error(TypeError::ArityMismatch {
                        expected: args1.len(),
                        found: args2.len(),
                        span,
                    });
                    return false;
                }
                for (arg1, arg2) in args1.iter().zip(args2.iter()).rev() {
                    self.constraints.push_front(EqualityConstraint::new(
                        arg1.clone(),
                        arg2.clone(),
                        span,
                    ));
                }
                true
            }
            (Ty::Struct { type_args, .. }, Ty::Unknown) => {
                for arg in type_args.iter().rev() {
                    self.constraints.push_front(EqualityConstraint::new(
                        arg.clone(),
                        Ty::Unknown,
                        span,
                    ));
                }
                true
            }

            _ => {
                // if types are not compatible, the constraint is unsolvable
                if !is_compatible(&ty1, &ty2) {
                    self.ctx.add_error(TypeError::Mismatch {
                        expected: ty1.to_string(),
                        found: ty2.to_string(),
                        span,
                    });
                    return false;
                }
                // compatible and no variables left to solve
                true
            }
        }
    }

    /// The `InferVar × concrete` case: ability-gate, occurs-check, then
    /// resolve the variable's class to the value. A root that was already
    /// resolved hands its value back for a structural re-run.
    fn unify_var_with_value(&mut self, var: TyVar, var_ty: &Ty, value: &Ty, span: Span) -> bool {
        if !self.check_abilities(var_ty, value, span) {
            return false;
        }
        if value.visit_with(&mut |ty| ty == var_ty) {
            self.ctx.add_error(TypeError::RecursiveType(span));
            return false;
        }
        if let Some(existing) = self.ctx.unify_ty_var_value(var, value.clone()) {
            self.constraints
                .push_front(EqualityConstraint::new(existing, value.clone(), span));
        }
        true
    }

    /// Fails when `eliminated` carries an ability obligation that `survivor`
    /// cannot satisfy. Asymmetric: the eliminated side inherits the
    /// survivor's bound, never the reverse.
    fn check_abilities(&mut self, eliminated: &Ty, survivor: &Ty, span: Span) -> bool {
        let missing = self
            .ctx
            .ty_abilities(eliminated, self.decls)
            .difference(self.ctx.ty_abilities(survivor, self.decls));
        if !missing.is_empty() {
            self.ctx.add_error(TypeError::AbilityViolation {
                ty: survivor.to_string(),
                missing,
                span,
            });
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn constructor_sorts_unknown_to_the_right() {
        let c = EqualityConstraint::new(Ty::Unknown, Ty::Bool, Span::dummy());
        assert_eq!(c.ty1, Ty::Bool);
        assert_eq!(c.ty2, Ty::Unknown);

        let c = EqualityConstraint::new(Ty::Bool, Ty::Unknown, Span::dummy());
        assert_eq!(c.ty1, Ty::Bool);
        assert_eq!(c.ty2, Ty::Unknown);

        // Two Unknowns stay put.
        let c = EqualityConstraint::new(Ty::Unknown, Ty::Unknown, Span::dummy());
        assert_eq!(c.ty1, Ty::Unknown);
    }

    #[test]
    fn constraint_displays_both_sides() {
        let c = EqualityConstraint::new(Ty::vector(Ty::Bool), Ty::Address, Span::dummy());
        assert_eq!(c.to_string(), "vector<bool> == address");
    }
}
