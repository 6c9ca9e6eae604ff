//! The Mova type representation.
//!
//! A closed tagged union over every type the inference engine reasons about,
//! from ground types (`bool`, `address`, the fixed-width integers) through
//! structural compounds (`vector<T>`, references, instantiated structs) to
//! the two flavors of unification variable. `Ty::Unknown` is the error
//! sentinel: it unifies with everything and so stops one mistake from
//! cascading through the rest of an item.

use mova_ast::{StructId, TypeParamId};
use rustc_hash::FxHashMap;
use std::fmt;

use crate::abilities::AbilitySet;
use crate::decl::Declarations;
use crate::unify::{IntVar, TyVar};

/// Fixed-width unsigned integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl IntegerKind {
    /// The kind an unsuffixed literal defaults to when inference leaves its
    /// width variable unresolved.
    pub const DEFAULT: IntegerKind = IntegerKind::U64;
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerKind::U8 => write!(f, "u8"),
            IntegerKind::U16 => write!(f, "u16"),
            IntegerKind::U32 => write!(f, "u32"),
            IntegerKind::U64 => write!(f, "u64"),
            IntegerKind::U128 => write!(f, "u128"),
        }
    }
}

/// A rigid generic parameter together with its declared ability bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TyTypeParam {
    pub item: TypeParamId,
    pub abilities: AbilitySet,
}

/// An unresolved inference variable, general or integer-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TyInfer {
    Var(TyVar),
    IntVar(IntVar),
}

/// Mova types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Error sentinel: compatible with everything, suppresses cascades.
    Unknown,
    Unit,
    Bool,
    Address,
    Signer,
    /// The arbitrary-precision numeric placeholder of specification
    /// expressions. Program-mode integers widen to this inside spec blocks.
    Num,
    Integer(IntegerKind),
    Vector(Box<Ty>),
    Reference { mutable: bool, referenced: Box<Ty> },
    Struct { item: StructId, type_args: Vec<Ty> },
    TypeParam(TyTypeParam),
    Infer(TyInfer),
}

impl Ty {
    pub fn vector(item: Ty) -> Ty {
        Ty::Vector(Box::new(item))
    }

    pub fn reference(mutable: bool, referenced: Ty) -> Ty {
        Ty::Reference {
            mutable,
            referenced: Box::new(referenced),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }

    /// The ability set this type provides, looked up at the leaf level.
    ///
    /// Compound abilities are only approximated here: a vector narrows its
    /// item's abilities to the storable subset, and a struct reports its
    /// declared set without conditioning on the instantiation. The full
    /// conditional derivation is the declaration checker's job.
    pub fn abilities(&self, decls: &Declarations) -> AbilitySet {
        match self {
            Ty::Unknown => AbilitySet::all(),
            Ty::Unit | Ty::Bool | Ty::Address | Ty::Num | Ty::Integer(_) => {
                AbilitySet::PRIMITIVES
            }
            Ty::Signer => AbilitySet::SIGNER,
            Ty::Vector(item) => item.abilities(decls).intersect(AbilitySet::PRIMITIVES),
            Ty::Reference { .. } => AbilitySet::REFERENCES,
            Ty::Struct { item, .. } => decls.struct_abilities(*item),
            Ty::TypeParam(param) => param.abilities,
            // A general variable's bound lives in its origin, which the
            // inference context tracks; without one it requires nothing.
            Ty::Infer(TyInfer::Var(_)) => AbilitySet::none(),
            Ty::Infer(TyInfer::IntVar(_)) => AbilitySet::all(),
        }
    }

    /// Specification-mode numeric widening: inside spec expressions all
    /// integer types (and pending integer-width variables) collapse into the
    /// single `num` type, so mixed-width arithmetic never mismatches there.
    pub fn msl_ty(&self) -> Ty {
        match self {
            Ty::Integer(_) | Ty::Num | Ty::Infer(TyInfer::IntVar(_)) => Ty::Num,
            other => other.clone(),
        }
    }

    /// Visit this type and every structural child, stopping early once
    /// `visitor` returns true. Returns whether any node matched.
    pub fn visit_with(&self, visitor: &mut impl FnMut(&Ty) -> bool) -> bool {
        if visitor(self) {
            return true;
        }
        match self {
            Ty::Vector(item) => item.visit_with(visitor),
            Ty::Reference { referenced, .. } => referenced.visit_with(visitor),
            Ty::Struct { type_args, .. } => {
                type_args.iter().any(|arg| arg.visit_with(visitor))
            }
            _ => false,
        }
    }

    pub fn has_ty_var(&self) -> bool {
        self.visit_with(&mut |ty| matches!(ty, Ty::Infer(TyInfer::Var(_))))
    }

    pub fn has_infer(&self) -> bool {
        self.visit_with(&mut |ty| matches!(ty, Ty::Infer(_)))
    }

    /// Replace every rigid type parameter with its entry in `subst`,
    /// leaving unmapped parameters in place.
    pub fn substitute_type_params(&self, subst: &FxHashMap<TypeParamId, Ty>) -> Ty {
        match self {
            Ty::TypeParam(param) => subst
                .get(&param.item)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Ty::Vector(item) => Ty::vector(item.substitute_type_params(subst)),
            Ty::Reference {
                mutable,
                referenced,
            } => Ty::reference(*mutable, referenced.substitute_type_params(subst)),
            Ty::Struct { item, type_args } => Ty::Struct {
                item: *item,
                type_args: type_args
                    .iter()
                    .map(|arg| arg.substitute_type_params(subst))
                    .collect(),
            },
            other => other.clone(),
        }
    }
}

/// The general compatibility relation: ground-type equality, with `Unknown`
/// accepting anything and `num` absorbing every integer width.
pub fn is_compatible(ty1: &Ty, ty2: &Ty) -> bool {
    match (ty1, ty2) {
        (Ty::Unknown, _) | (_, Ty::Unknown) => true,
        (Ty::Unit, Ty::Unit)
        | (Ty::Bool, Ty::Bool)
        | (Ty::Address, Ty::Address)
        | (Ty::Signer, Ty::Signer)
        | (Ty::Num, Ty::Num) => true,
        (Ty::Num, Ty::Integer(_)) | (Ty::Integer(_), Ty::Num) => true,
        (Ty::Integer(k1), Ty::Integer(k2)) => k1 == k2,
        (Ty::TypeParam(p1), Ty::TypeParam(p2)) => p1.item == p2.item,
        (Ty::Vector(i1), Ty::Vector(i2)) => is_compatible(i1, i2),
        // Mutability is deliberately not compared, matching the solver's
        // reference rule.
        (
            Ty::Reference {
                referenced: r1, ..
            },
            Ty::Reference {
                referenced: r2, ..
            },
        ) => is_compatible(r1, r2),
        (
            Ty::Struct {
                item: s1,
                type_args: a1,
            },
            Ty::Struct {
                item: s2,
                type_args: a2,
            },
        ) => {
            s1 == s2
                && a1.len() == a2.len()
                && a1.iter().zip(a2.iter()).all(|(t1, t2)| is_compatible(t1, t2))
        }
        _ => false,
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Unknown => write!(f, "<unknown>"),
            Ty::Unit => write!(f, "()"),
            Ty::Bool => write!(f, "bool"),
            Ty::Address => write!(f, "address"),
            Ty::Signer => write!(f, "signer"),
            Ty::Num => write!(f, "num"),
            Ty::Integer(kind) => write!(f, "{}", kind),
            Ty::Vector(item) => write!(f, "vector<{}>", item),
            Ty::Reference {
                mutable,
                referenced,
            } => {
                if *mutable {
                    write!(f, "&mut {}", referenced)
                } else {
                    write!(f, "&{}", referenced)
                }
            }
            Ty::Struct { item, type_args } => {
                write!(f, "struct{}", item)?;
                if !type_args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Ty::TypeParam(param) => write!(f, "T{}", param.item),
            Ty::Infer(TyInfer::Var(var)) => write!(f, "?{}", var.0),
            Ty::Infer(TyInfer::IntVar(var)) => write!(f, "?int{}", var.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::Ability;
    use pretty_assertions::assert_eq;

    #[test]
    fn compatibility_is_ground_equality() {
        assert!(is_compatible(&Ty::Bool, &Ty::Bool));
        assert!(!is_compatible(&Ty::Bool, &Ty::Address));
        assert!(is_compatible(
            &Ty::Integer(IntegerKind::U8),
            &Ty::Integer(IntegerKind::U8)
        ));
        assert!(!is_compatible(
            &Ty::Integer(IntegerKind::U8),
            &Ty::Integer(IntegerKind::U64)
        ));
    }

    #[test]
    fn unknown_is_compatible_with_everything() {
        for ty in [
            Ty::Unit,
            Ty::Signer,
            Ty::vector(Ty::Bool),
            Ty::reference(true, Ty::Address),
        ] {
            assert!(is_compatible(&ty, &Ty::Unknown));
            assert!(is_compatible(&Ty::Unknown, &ty));
        }
    }

    #[test]
    fn num_absorbs_integer_widths() {
        assert!(is_compatible(&Ty::Num, &Ty::Integer(IntegerKind::U128)));
        assert!(is_compatible(&Ty::Integer(IntegerKind::U8), &Ty::Num));
        assert!(!is_compatible(&Ty::Num, &Ty::Bool));
    }

    #[test]
    fn msl_widening_collapses_integers() {
        assert_eq!(Ty::Integer(IntegerKind::U8).msl_ty(), Ty::Num);
        assert_eq!(Ty::Num.msl_ty(), Ty::Num);
        assert_eq!(Ty::Bool.msl_ty(), Ty::Bool);
    }

    #[test]
    fn substitution_reaches_nested_params() {
        let param = TyTypeParam {
            item: TypeParamId(0),
            abilities: AbilitySet::singleton(Ability::Copy),
        };
        let ty = Ty::vector(Ty::reference(false, Ty::TypeParam(param)));
        let mut subst = FxHashMap::default();
        subst.insert(TypeParamId(0), Ty::Bool);
        assert_eq!(
            ty.substitute_type_params(&subst),
            Ty::vector(Ty::reference(false, Ty::Bool))
        );
    }
}
