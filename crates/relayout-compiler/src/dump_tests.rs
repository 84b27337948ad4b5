//! Layout dump snapshot tests.
//!
//! Offsets assume a 64-bit target.

use indoc::indoc;
use relayout_core::{TypeId, TypeRef};

use crate::{FieldSpec, TypeTable, dump_type};

fn compile(types: &mut TypeTable, generation: u64) {
    types.validate_pending().unwrap();
    types.compile_all(generation);
}

fn dump(types: &TypeTable, id: TypeId) -> String {
    dump_type(types, id).unwrap()
}

#[test]
fn fresh_layout_pads_to_alignment() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::I8), None).unwrap();
    types.add_field(id, FieldSpec::value("b", TypeRef::I32), None).unwrap();
    types.add_field(id, FieldSpec::value("c", TypeRef::I16), None).unwrap();
    types.add_field(id, FieldSpec::value("d", TypeRef::F64), None).unwrap();

    compile(&mut types, 1);

    insta::assert_snapshot!(dump(&types, id), @r"
    T size=24 align=8
    fields:
      @0 a: i8
      @4 b: i32
      @8 c: i16
      @16 d: f64
    diffs:
      zero  a -> @0/1 x1
      zero  b -> @4/4 x1
      zero  c -> @8/2 x1
      zero  d -> @16/8 x1
    ");
}

#[test]
fn insert_retype_and_grow() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::I32), None).unwrap();
    types.add_field(id, FieldSpec::array("b", TypeRef::I16, 2), None).unwrap();
    compile(&mut types, 1);

    types.add_field(id, FieldSpec::value("c", TypeRef::F64), Some(0)).unwrap();
    types.retype_field(id, "a", TypeRef::F64).unwrap();
    types.resize_field(id, "b", 3).unwrap();
    compile(&mut types, 2);

    insta::assert_snapshot!(dump(&types, id), @r"
    T size=24 align=8
    fields:
      @0 c: f64
      @8 a: f64
      @16 b: [i16; 3]
    diffs:
      zero  c -> @0/8 x1
      cast  a @0/4 -> @8/8 x1
      copy  b @4/2 -> @16/2 x2
      zero  b -> @20/2 x1
    ");
}

#[test]
fn narrowing_has_no_cast() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::F64), None).unwrap();
    compile(&mut types, 1);

    types.retype_field(id, "a", TypeRef::F32).unwrap();
    compile(&mut types, 2);

    insta::assert_snapshot!(dump(&types, id), @r"
    T size=4 align=4
    fields:
      @0 a: f32
    diffs:
      lossy a @0/8 -> @0/4 x1
    ");
}

#[test]
fn nested_value_uses_prior_stride() {
    let mut types = TypeTable::default();
    let inner = types.create("Inner").unwrap();
    let outer = types.create("Outer").unwrap();
    types.add_field(inner, FieldSpec::value("x", TypeRef::I32), None).unwrap();
    types.add_field(outer, FieldSpec::value("tag", TypeRef::I8), None).unwrap();
    types.add_field(outer, FieldSpec::value("inner", inner), None).unwrap();
    types.add_field(outer, FieldSpec::pointer("next", outer), None).unwrap();
    compile(&mut types, 1);

    types.add_field(inner, FieldSpec::value("y", TypeRef::I64), Some(0)).unwrap();
    compile(&mut types, 2);

    insta::assert_snapshot!(dump(&types, outer), @r"
    Outer size=32 align=8
    fields:
      @0 tag: i8
      @8 inner: Inner
      @24 next: *Outer
    diffs:
      copy  tag @0/1 -> @0/1 x1
      copy  inner @4/4 -> @8/16 x1
      copy  next @8/8 -> @24/8 x1
    ");
}

#[test]
fn sealed_type_without_plan() {
    let mut types = TypeTable::default();
    let id = types.create("Pair").unwrap();
    types.add_field(id, FieldSpec::array("v", TypeRef::F32, 2), None).unwrap();
    types.add_field(id, FieldSpec::pointer_array("refs", id, 2), None).unwrap();
    compile(&mut types, 1);
    types.seal(id).unwrap();

    insta::assert_snapshot!(dump(&types, id), @r"
    Pair size=24 align=8 sealed
    fields:
      @0 v: [f32; 2]
      @8 refs: [*Pair; 2]
    ");
}

#[test]
fn cleared_plan_omits_diffs() {
    let mut types = TypeTable::default();
    let id = types.create("Node").unwrap();
    types.add_field(id, FieldSpec::value("id", TypeRef::I16), None).unwrap();
    types.add_field(id, FieldSpec::pointer("next", id), None).unwrap();
    compile(&mut types, 1);
    types.clear_diffs();

    assert_eq!(
        dump(&types, id),
        indoc! {"
            Node size=16 align=8
            fields:
              @0 id: i16
              @8 next: *Node
        "}
    );
}
