//! Snapshot tests for type rendering
//!
//! The `Display` output is what downstream diagnostics embed in messages,
//! so its exact shape is pinned here.

use insta::assert_snapshot;
use mova_ast::{Span, StructId, TypeParamId};
use mova_types::{Ability, AbilitySet, EqualityConstraint, IntegerKind, Ty, TyTypeParam};

#[test]
fn render_ground_types() {
    assert_snapshot!(Ty::Unit.to_string(), @"()");
    assert_snapshot!(Ty::Bool.to_string(), @"bool");
    assert_snapshot!(Ty::Address.to_string(), @"address");
    assert_snapshot!(Ty::Signer.to_string(), @"signer");
    assert_snapshot!(Ty::Num.to_string(), @"num");
    assert_snapshot!(Ty::Unknown.to_string(), @"<unknown>");
    assert_snapshot!(Ty::Integer(IntegerKind::U128).to_string(), @"u128");
}

#[test]
fn render_compound_types() {
    assert_snapshot!(Ty::vector(Ty::Integer(IntegerKind::U8)).to_string(), @"vector<u8>");
    assert_snapshot!(Ty::reference(false, Ty::Bool).to_string(), @"&bool");
    assert_snapshot!(Ty::reference(true, Ty::vector(Ty::Address)).to_string(), @"&mut vector<address>");
}

#[test]
fn render_struct_instantiations() {
    let plain = Ty::Struct {
        item: StructId(4),
        type_args: vec![],
    };
    assert_snapshot!(plain.to_string(), @"struct#4");

    let generic = Ty::Struct {
        item: StructId(4),
        type_args: vec![Ty::Bool, Ty::vector(Ty::Integer(IntegerKind::U64))],
    };
    assert_snapshot!(generic.to_string(), @"struct#4<bool, vector<u64>>");
}

#[test]
fn render_type_parameter() {
    let param = Ty::TypeParam(TyTypeParam {
        item: TypeParamId(2),
        abilities: AbilitySet::singleton(Ability::Store),
    });
    assert_snapshot!(param.to_string(), @"T#2");
}

#[test]
fn render_constraint() {
    let c = EqualityConstraint::new(
        Ty::Unknown,
        Ty::reference(false, Ty::Signer),
        Span::dummy(),
    );
    // Normalization keeps the non-Unknown side on the left.
    assert_snapshot!(c.to_string(), @"&signer == <unknown>");
}
