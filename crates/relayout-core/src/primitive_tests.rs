use crate::{Primitive, TypeRef};

#[test]
fn sizes_match_native_types() {
    assert_eq!(Primitive::I8.size(), std::mem::size_of::<i8>());
    assert_eq!(Primitive::I16.size(), std::mem::size_of::<i16>());
    assert_eq!(Primitive::I32.size(), std::mem::size_of::<i32>());
    assert_eq!(Primitive::I64.size(), std::mem::size_of::<i64>());
    assert_eq!(Primitive::F32.size(), std::mem::size_of::<f32>());
    assert_eq!(Primitive::F64.size(), std::mem::size_of::<f64>());
}

#[test]
fn align_equals_size() {
    for p in Primitive::ALL {
        assert_eq!(p.align(), p.size());
    }
}

#[test]
fn names_are_distinct() {
    let names: Vec<_> = Primitive::ALL.iter().map(|p| p.name()).collect();
    assert_eq!(names, ["i8", "i16", "i32", "i64", "f32", "f64"]);
}

#[test]
fn display_uses_name() {
    assert_eq!(Primitive::F32.to_string(), "f32");
    assert_eq!(TypeRef::I64.to_string(), "i64");
}
