//! Read-only declaration registry.
//!
//! The inference core never reaches into ambient project state. Whatever it
//! needs to know about resolved declarations (a struct's declared abilities
//! and fields, a function's signature, a type parameter's bound) is handed
//! to it through this registry, populated by the (external) name-resolution
//! layer before checking starts.

use indexmap::IndexMap;
use mova_ast::{FunctionId, NodeId, SmolStr, StructId, TypeParamId};
use rustc_hash::FxHashMap;

use crate::abilities::AbilitySet;
use crate::ty::Ty;

/// A resolved generic type parameter.
#[derive(Debug, Clone)]
pub struct TypeParamInfo {
    pub name: SmolStr,
    pub abilities: AbilitySet,
}

/// A resolved struct declaration.
#[derive(Debug, Clone)]
pub struct StructInfo {
    pub name: SmolStr,
    pub abilities: AbilitySet,
    pub type_params: Vec<TypeParamId>,
    /// Field name to declared type, in declaration order. Field types may
    /// mention the struct's own type parameters.
    pub fields: IndexMap<SmolStr, Ty>,
}

/// A resolved function signature.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: SmolStr,
    pub type_params: Vec<TypeParamId>,
    pub params: Vec<Ty>,
    pub ret: Ty,
}

/// Declarations visible to one checked item.
#[derive(Debug, Default, Clone)]
pub struct Declarations {
    structs: FxHashMap<StructId, StructInfo>,
    functions: FxHashMap<FunctionId, FunctionInfo>,
    type_params: FxHashMap<TypeParamId, TypeParamInfo>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_struct(&mut self, id: StructId, info: StructInfo) {
        self.structs.insert(id, info);
    }

    pub fn add_function(&mut self, id: FunctionId, info: FunctionInfo) {
        self.functions.insert(id, info);
    }

    pub fn add_type_param(&mut self, id: TypeParamId, info: TypeParamInfo) {
        self.type_params.insert(id, info);
    }

    pub fn struct_info(&self, id: StructId) -> Option<&StructInfo> {
        self.structs.get(&id)
    }

    pub fn function_info(&self, id: FunctionId) -> Option<&FunctionInfo> {
        self.functions.get(&id)
    }

    pub fn type_param_info(&self, id: TypeParamId) -> Option<&TypeParamInfo> {
        self.type_params.get(&id)
    }

    /// Declared ability set of a struct; empty for an unknown id.
    pub fn struct_abilities(&self, id: StructId) -> AbilitySet {
        self.structs
            .get(&id)
            .map(|info| info.abilities)
            .unwrap_or(AbilitySet::EMPTY)
    }

    /// The declared type of `field` inside an instantiated struct type, with
    /// the struct's type parameters substituted by `type_args` positionally.
    pub fn field_ty(&self, id: StructId, field: &str, type_args: &[Ty]) -> Option<Ty> {
        let info = self.structs.get(&id)?;
        let declared = info.fields.get(field)?;
        let subst: FxHashMap<TypeParamId, Ty> = info
            .type_params
            .iter()
            .copied()
            .zip(type_args.iter().cloned())
            .collect();
        Some(declared.substitute_type_params(&subst))
    }
}

/// Per-item mapping from written type annotations to their resolved types.
///
/// The external driver lowers each annotation in the item's signature and
/// body once; the expected-type propagator reads the result here.
#[derive(Debug, Default, Clone)]
pub struct ItemContext {
    annotation_types: FxHashMap<NodeId, Ty>,
}

impl ItemContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_annotation(&mut self, node: NodeId, ty: Ty) {
        self.annotation_types.insert(node, ty);
    }

    pub fn annotation_ty(&self, node: NodeId) -> Option<&Ty> {
        self.annotation_types.get(&node)
    }
}
