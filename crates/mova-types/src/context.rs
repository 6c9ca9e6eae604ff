//! Per-item inference state.
//!
//! One [`InferenceContext`] is created for each checked top-level item
//! (function, constant, spec block). It owns both unification tables, the
//! node-to-type caches, and the instantiation records the expected-type
//! propagator reads. Contexts for different items share nothing.

use mova_ast::NodeId;
use rustc_hash::FxHashMap;

use crate::abilities::AbilitySet;
use crate::decl::Declarations;
use crate::error::TypeError;
use crate::ty::{IntegerKind, Ty, TyInfer, TyTypeParam};
use crate::unify::{IntVar, TyVar, UnificationTable};

/// Instantiation record of one call expression: the fresh variables standing
/// in for its type parameters and the declared parameter types with those
/// variables substituted in. Populated incrementally during the top-down
/// pass, so lookups may legitimately miss.
#[derive(Debug, Clone, Default)]
pub struct CallTypes {
    pub type_vars: Vec<Ty>,
    pub param_types: Vec<Ty>,
}

/// Inference state for a single checked item.
#[derive(Debug)]
pub struct InferenceContext {
    /// Whether this item is a specification (spec-block) expression context,
    /// enabling the relaxed numeric coercion.
    pub msl: bool,
    var_table: UnificationTable<TyVar, Ty>,
    int_table: UnificationTable<IntVar, IntegerKind>,
    /// Origin type parameter of each general variable created from one.
    /// Keyed by the variable as created; ability lookups also consult the
    /// class representative after unions.
    var_origins: FxHashMap<TyVar, TyTypeParam>,
    expr_types: FxHashMap<NodeId, Ty>,
    pat_types: FxHashMap<NodeId, Ty>,
    call_types: FxHashMap<NodeId, CallTypes>,
    errors: Vec<TypeError>,
}

impl InferenceContext {
    pub fn new(msl: bool) -> Self {
        Self {
            msl,
            var_table: UnificationTable::new(),
            int_table: UnificationTable::new(),
            var_origins: FxHashMap::default(),
            expr_types: FxHashMap::default(),
            pat_types: FxHashMap::default(),
            call_types: FxHashMap::default(),
            errors: Vec::new(),
        }
    }

    // ========================================================================
    // Variable allocation
    // ========================================================================

    pub fn new_ty_var(&mut self) -> Ty {
        Ty::Infer(TyInfer::Var(self.var_table.new_key()))
    }

    /// A fresh variable standing in for `origin`; it inherits the parameter's
    /// declared ability bound for the unification gate.
    pub fn new_ty_var_with_origin(&mut self, origin: TyTypeParam) -> Ty {
        let var = self.var_table.new_key();
        self.var_origins.insert(var, origin);
        Ty::Infer(TyInfer::Var(var))
    }

    pub fn new_int_var(&mut self) -> Ty {
        Ty::Infer(TyInfer::IntVar(self.int_table.new_key()))
    }

    // ========================================================================
    // Table operations (used by the solver)
    // ========================================================================

    pub fn unify_ty_var_var(&mut self, a: TyVar, b: TyVar) {
        self.var_table.unify_var_var(a, b);
    }

    /// Resolve `var` to `value` if still unresolved; returns the previously
    /// resolved value otherwise, for the solver to reconcile.
    pub fn unify_ty_var_value(&mut self, var: TyVar, value: Ty) -> Option<Ty> {
        self.var_table.unify_var_value(var, value)
    }

    pub fn unify_int_var_var(&mut self, a: IntVar, b: IntVar) {
        self.int_table.unify_var_var(a, b);
    }

    pub fn unify_int_var_value(&mut self, var: IntVar, kind: IntegerKind) -> Option<IntegerKind> {
        self.int_table.unify_var_value(var, kind)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Dereference a top-level inference variable through the union-find
    /// chains until it is no longer a resolved variable. An unresolved
    /// variable comes back as its class representative; non-variable types
    /// pass through unchanged.
    pub fn resolve_ty_infer(&mut self, ty: &Ty) -> Ty {
        let mut ty = ty.clone();
        loop {
            match ty {
                Ty::Infer(TyInfer::Var(var)) => match self.var_table.probe_value(var) {
                    Some(resolved) => ty = resolved,
                    None => return Ty::Infer(TyInfer::Var(self.var_table.find(var))),
                },
                Ty::Infer(TyInfer::IntVar(var)) => match self.int_table.probe_value(var) {
                    Some(kind) => return Ty::Integer(kind),
                    None => return Ty::Infer(TyInfer::IntVar(self.int_table.find(var))),
                },
                other => return other,
            }
        }
    }

    /// Fold [`resolve_ty_infer`](Self::resolve_ty_infer) through the whole
    /// structure of `ty`, substituting every variable occurrence.
    pub fn resolve_ty_infer_deep(&mut self, ty: &Ty) -> Ty {
        let ty = self.resolve_ty_infer(ty);
        match ty {
            Ty::Vector(item) => Ty::vector(self.resolve_ty_infer_deep(&item)),
            Ty::Reference {
                mutable,
                referenced,
            } => Ty::reference(mutable, self.resolve_ty_infer_deep(&referenced)),
            Ty::Struct { item, type_args } => Ty::Struct {
                item,
                type_args: type_args
                    .iter()
                    .map(|arg| self.resolve_ty_infer_deep(arg))
                    .collect(),
            },
            other => other,
        }
    }

    /// Finalized query resolution on an immutable context: every unresolved
    /// general variable falls back to `Unknown`, every unresolved integer
    /// variable defaults to `u64`.
    pub fn fully_resolve(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Infer(TyInfer::Var(var)) => match self.var_table.peek_value(*var) {
                Some(resolved) => self.fully_resolve(&resolved),
                None => Ty::Unknown,
            },
            Ty::Infer(TyInfer::IntVar(var)) => match self.int_table.peek_value(*var) {
                Some(kind) => Ty::Integer(kind),
                None => Ty::Integer(IntegerKind::DEFAULT),
            },
            Ty::Vector(item) => Ty::vector(self.fully_resolve(item)),
            Ty::Reference {
                mutable,
                referenced,
            } => Ty::reference(*mutable, self.fully_resolve(referenced)),
            Ty::Struct { item, type_args } => Ty::Struct {
                item: *item,
                type_args: type_args.iter().map(|arg| self.fully_resolve(arg)).collect(),
            },
            other => other.clone(),
        }
    }

    // ========================================================================
    // Abilities
    // ========================================================================

    /// Ability set of `ty`, consulting variable origins for general inference
    /// variables and the declaration registry for structs.
    pub fn ty_abilities(&self, ty: &Ty, decls: &Declarations) -> AbilitySet {
        if let Ty::Infer(TyInfer::Var(var)) = ty {
            let origin = self
                .var_origins
                .get(var)
                .or_else(|| self.var_origins.get(&self.var_table.peek(*var)));
            return origin.map(|o| o.abilities).unwrap_or(AbilitySet::EMPTY);
        }
        ty.abilities(decls)
    }

    // ========================================================================
    // Caches and instantiation records
    // ========================================================================

    pub fn record_expr_ty(&mut self, node: NodeId, ty: Ty) {
        self.expr_types.insert(node, ty);
    }

    pub fn record_pat_ty(&mut self, node: NodeId, ty: Ty) {
        self.pat_types.insert(node, ty);
    }

    pub fn record_call_types(&mut self, node: NodeId, types: CallTypes) {
        self.call_types.insert(node, types);
    }

    /// The raw recorded type of an expression, possibly still containing
    /// unresolved variables.
    pub fn recorded_expr_ty(&self, node: NodeId) -> Option<&Ty> {
        self.expr_types.get(&node)
    }

    pub fn recorded_pat_ty(&self, node: NodeId) -> Option<&Ty> {
        self.pat_types.get(&node)
    }

    pub fn call_expr_types(&self, node: NodeId) -> Option<&CallTypes> {
        self.call_types.get(&node)
    }

    /// The finalized type of an expression after solving; `Unknown` when the
    /// node was never recorded.
    pub fn expr_ty(&self, node: NodeId) -> Ty {
        self.expr_types
            .get(&node)
            .map(|ty| self.fully_resolve(ty))
            .unwrap_or(Ty::Unknown)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    pub fn add_error(&mut self, error: TypeError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<TypeError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shallow_resolution_stops_at_compounds() {
        let mut ctx = InferenceContext::new(false);
        let var = ctx.new_ty_var();
        let Ty::Infer(TyInfer::Var(key)) = var.clone() else {
            unreachable!()
        };
        let inner = ctx.new_ty_var();
        ctx.unify_ty_var_value(key, Ty::vector(inner.clone()));
        // Shallow: the vector comes back with its item still a variable.
        assert_eq!(ctx.resolve_ty_infer(&var), Ty::vector(inner));
    }

    #[test]
    fn unrecorded_expr_resolves_to_unknown() {
        let ctx = InferenceContext::new(false);
        assert_eq!(ctx.expr_ty(mova_ast::NodeId(17)), Ty::Unknown);
    }

    #[test]
    fn unresolved_int_var_defaults_to_u64() {
        let mut ctx = InferenceContext::new(false);
        let var = ctx.new_int_var();
        assert_eq!(ctx.fully_resolve(&var), Ty::Integer(IntegerKind::U64));
    }

    #[test]
    fn unresolved_ty_var_finalizes_to_unknown() {
        let mut ctx = InferenceContext::new(false);
        let var = ctx.new_ty_var();
        assert_eq!(ctx.fully_resolve(&var), Ty::Unknown);
        assert_eq!(
            ctx.fully_resolve(&Ty::vector(var)),
            Ty::vector(Ty::Unknown)
        );
    }
}
