//! Expected-type propagation.
//!
//! [`expected_ty`] looks one level up from an expression or pattern node and
//! derives the type the node must conform to, or `None` when no constraint
//! applies. It reads instantiation records that are populated incrementally
//! during a single top-down pass, so results must never be memoized across
//! context mutation. Recursion happens only through the borrow-operand and
//! struct-literal-field cases.

use mova_ast::{NodeId, NodeKind, SyntaxTree};

use crate::context::InferenceContext;
use crate::decl::{Declarations, ItemContext};
use crate::ty::Ty;

pub fn expected_ty(
    node: NodeId,
    tree: &SyntaxTree,
    ctx: &InferenceContext,
    decls: &Declarations,
    items: &ItemContext,
) -> Option<Ty> {
    let owner = tree.parent(node)?;
    match tree.kind(owner) {
        // The operand of `&e` / `&mut e`: whatever reference type the borrow
        // itself is expected to be, stripped one level.
        NodeKind::Borrow { operand, .. } if *operand == node => {
            match expected_ty(owner, tree, ctx, decls, items)? {
                Ty::Reference { referenced, .. } => Some(*referenced),
                _ => None,
            }
        }

        // A generic-argument slot: the already-recorded instantiation type at
        // the same position, if the enclosing expression has one yet.
        NodeKind::TypeArgument { value } if *value == node => {
            let owner_expr = tree.parent(owner)?;
            match tree.kind(owner_expr) {
                NodeKind::Call { type_args, .. } => {
                    let index = type_args.iter().position(|slot| *slot == owner)?;
                    ctx.call_expr_types(owner_expr)?.type_vars.get(index).cloned()
                }
                NodeKind::StructLit { type_args, .. } => {
                    let index = type_args.iter().position(|slot| *slot == owner)?;
                    match ctx.recorded_expr_ty(owner_expr)? {
                        Ty::Struct { type_args, .. } => type_args.get(index).cloned(),
                        _ => None,
                    }
                }
                _ => None,
            }
        }

        // A value-argument slot: the callee's declared parameter type at the
        // same position, from the recorded call instantiation.
        NodeKind::ValueArgument { value } if *value == node => {
            let call = tree.parent(owner)?;
            let NodeKind::Call { args, .. } = tree.kind(call) else {
                return None;
            };
            let index = args.iter().position(|slot| *slot == owner)?;
            ctx.call_expr_types(call)?.param_types.get(index).cloned()
        }

        // The initializer of `let pat: T = e`: the declared type, resolved
        // through the item's type context.
        NodeKind::Let {
            annotation,
            initializer,
            ..
        } if *initializer == Some(node) => {
            let annotation = (*annotation)?;
            items.annotation_ty(annotation).cloned()
        }

        // A field value inside a struct literal: the field's declared type
        // within the literal's (expected or inferred) struct instantiation.
        NodeKind::LitField { name, value } if *value == node => {
            let lit = tree.parent(owner)?;
            let struct_ty = match ctx.recorded_expr_ty(lit) {
                Some(ty @ Ty::Struct { .. }) => ty.clone(),
                _ => match expected_ty(lit, tree, ctx, decls, items)? {
                    ty @ Ty::Struct { .. } => ty,
                    _ => return None,
                },
            };
            if let Ty::Struct { item, type_args } = struct_ty {
                decls.field_ty(item, name, &type_args)
            } else {
                None
            }
        }

        _ => None,
    }
}
