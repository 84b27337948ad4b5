use relayout_core::{Error, Limits, TypeRef};

use crate::{FieldSpec, TypeTable};

fn pending_names(types: &TypeTable, id: relayout_core::TypeId) -> Vec<&str> {
    types
        .get(id)
        .unwrap()
        .pending_fields()
        .iter()
        .map(|f| f.name())
        .collect()
}

#[test]
fn create_assigns_fresh_ids() {
    let mut types = TypeTable::default();

    let a = types.create("A").unwrap();
    let b = types.create("B").unwrap();
    types.remove(a).unwrap();
    let c = types.create("C").unwrap();

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(types.id_of("C"), Some(c));
    assert_eq!(types.id_of("A"), None);
    assert_eq!(types.len(), 2);
}

#[test]
fn create_rejects_duplicate_name() {
    let mut types = TypeTable::default();
    types.create("A").unwrap();

    assert_eq!(types.create("A"), Err(Error::DuplicateType("A".into())));
}

#[test]
fn create_enforces_limits() {
    let mut types = TypeTable::new(Limits::new().max_types(1).max_name_len(3));

    assert_eq!(
        types.create("Long"),
        Err(Error::NameTooLong { len: 4, max: 3 })
    );
    types.create("A").unwrap();
    assert_eq!(
        types.create("B"),
        Err(Error::CapacityExceeded {
            what: "types",
            limit: 1
        })
    );
}

#[test]
fn new_type_is_empty() {
    let mut types = TypeTable::default();
    let id = types.create("Empty").unwrap();
    let ty = types.get(id).unwrap();

    assert_eq!(ty.size(), 0);
    assert_eq!(ty.align(), 1);
    assert!(ty.fields().is_empty());
    assert!(!ty.has_pending_edits());
}

#[test]
fn add_field_appends_and_inserts() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();

    types.add_field(id, FieldSpec::value("a", TypeRef::I32), None).unwrap();
    types.add_field(id, FieldSpec::value("b", TypeRef::I32), Some(0)).unwrap();
    types.add_field(id, FieldSpec::value("c", TypeRef::I32), Some(99)).unwrap();

    assert_eq!(pending_names(&types, id), ["b", "a", "c"]);
    assert!(types.get(id).unwrap().has_pending_edits());
    // Committed list is untouched until compiled.
    assert!(types.get(id).unwrap().fields().is_empty());
}

#[test]
fn add_field_validates() {
    let mut types = TypeTable::new(Limits::new().max_fields(1));
    let id = types.create("T").unwrap();
    let missing = relayout_core::TypeId(42);

    assert_eq!(
        types.add_field(id, FieldSpec::array("a", TypeRef::I8, 0), None),
        Err(Error::InvalidArrayLength(0))
    );
    assert_eq!(
        types.add_field(id, FieldSpec::value("a", missing), None),
        Err(Error::TypeNotFound("T42".into()))
    );
    types.add_field(id, FieldSpec::value("a", TypeRef::I8), None).unwrap();
    assert_eq!(
        types.add_field(id, FieldSpec::value("a", TypeRef::I8), None),
        Err(Error::DuplicateField {
            type_name: "T".into(),
            field: "a".into()
        })
    );
    assert_eq!(
        types.add_field(id, FieldSpec::value("b", TypeRef::I8), None),
        Err(Error::CapacityExceeded {
            what: "fields",
            limit: 1
        })
    );
}

#[test]
fn remove_then_readd_same_name() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::I8), None).unwrap();

    types.remove_field(id, "a").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::I8), None).unwrap();

    assert_eq!(pending_names(&types, id), ["a"]);
    assert_eq!(
        types.remove_field(id, "zz"),
        Err(Error::FieldNotFound {
            type_name: "T".into(),
            field: "zz".into()
        })
    );
}

#[test]
fn move_field_reorders() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    for name in ["a", "b", "c"] {
        types.add_field(id, FieldSpec::value(name, TypeRef::I8), None).unwrap();
    }

    types.move_field(id, "c", 0).unwrap();
    assert_eq!(pending_names(&types, id), ["c", "a", "b"]);

    types.move_field(id, "c", 2).unwrap();
    assert_eq!(pending_names(&types, id), ["a", "b", "c"]);

    assert_eq!(
        types.move_field(id, "a", 3),
        Err(Error::FieldIndexOutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn resize_and_retype() {
    let mut types = TypeTable::default();
    let id = types.create("T").unwrap();
    types.add_field(id, FieldSpec::value("a", TypeRef::I8), None).unwrap();

    types.resize_field(id, "a", 10).unwrap();
    types.retype_field(id, "a", TypeRef::F64).unwrap();

    let field = &types.get(id).unwrap().pending_fields()[0];
    assert_eq!(field.count(), 10);
    assert_eq!(field.ty(), TypeRef::F64);
    assert_eq!(
        types.resize_field(id, "a", 0),
        Err(Error::InvalidArrayLength(0))
    );
}

#[test]
fn remove_rejects_referenced_type() {
    let mut types = TypeTable::default();
    let inner = types.create("Inner").unwrap();
    let outer = types.create("Outer").unwrap();
    types
        .add_field(outer, FieldSpec::pointer("p", inner), None)
        .unwrap();
    types
        .add_field(inner, FieldSpec::pointer("me", inner), None)
        .unwrap();

    assert_eq!(
        types.remove(inner).map(|_| ()),
        Err(Error::TypeInUse {
            type_name: "Inner".into(),
            by: "Outer".into()
        })
    );

    types.remove(outer).unwrap();
    // Self-references do not pin a type.
    types.remove(inner).unwrap();
    assert!(types.is_empty());
}

#[test]
fn seal_freezes_type() {
    let mut types = TypeTable::default();
    let id = types.create("P").unwrap();
    types.add_field(id, FieldSpec::value("x", TypeRef::F32), None).unwrap();

    assert!(matches!(types.seal(id), Err(Error::NotSealable { .. })));

    types.validate_pending().unwrap();
    types.compile_all(1);
    types.seal(id).unwrap();

    assert!(types.is_fixed(TypeRef::Composite(id)));
    assert_eq!(
        types.add_field(id, FieldSpec::value("y", TypeRef::F32), None),
        Err(Error::FixedType("P".into()))
    );
}

#[test]
fn seal_requires_fixed_value_fields() {
    let mut types = TypeTable::default();
    let inner = types.create("Inner").unwrap();
    let outer = types.create("Outer").unwrap();
    types.add_field(outer, FieldSpec::value("in", inner), None).unwrap();
    types.compile_all(1);

    assert!(matches!(types.seal(outer), Err(Error::NotSealable { .. })));

    types.seal(inner).unwrap();
    types.seal(outer).unwrap();
}
