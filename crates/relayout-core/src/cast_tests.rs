use crate::limits::MAX_CASTS;
use crate::{Primitive, TypeId, TypeRef, find_cast};

fn convert(from: Primitive, to: Primitive, src: &[u8]) -> Vec<u8> {
    let cast = find_cast(from.into(), to.into()).expect("cast registered");
    let mut dst = vec![0u8; to.size()];
    cast.apply(src, &mut dst);
    dst
}

#[test]
fn integer_widening_preserves_sign() {
    let out = convert(Primitive::I8, Primitive::I64, &(-5i8).to_ne_bytes());
    assert_eq!(i64::from_ne_bytes(out.try_into().unwrap()), -5);

    let out = convert(Primitive::I16, Primitive::I32, &(-300i16).to_ne_bytes());
    assert_eq!(i32::from_ne_bytes(out.try_into().unwrap()), -300);
}

#[test]
fn integer_to_float() {
    let out = convert(Primitive::I32, Primitive::F64, &13i32.to_ne_bytes());
    assert_eq!(f64::from_ne_bytes(out.try_into().unwrap()), 13.0);

    let out = convert(Primitive::I16, Primitive::F32, &(-7i16).to_ne_bytes());
    assert_eq!(f32::from_ne_bytes(out.try_into().unwrap()), -7.0);
}

#[test]
fn float_widening() {
    let out = convert(Primitive::F32, Primitive::F64, &1.5f32.to_ne_bytes());
    assert_eq!(f64::from_ne_bytes(out.try_into().unwrap()), 1.5);
}

#[test]
fn narrowing_is_not_registered() {
    assert!(find_cast(TypeRef::F64, TypeRef::F32).is_none());
    assert!(find_cast(TypeRef::I64, TypeRef::I32).is_none());
    assert!(find_cast(TypeRef::I32, TypeRef::F32).is_none());
    assert!(find_cast(TypeRef::F32, TypeRef::I32).is_none());
}

#[test]
fn identity_is_not_registered() {
    for p in Primitive::ALL {
        assert!(find_cast(p.into(), p.into()).is_none());
    }
}

#[test]
fn composites_have_no_casts() {
    let composite = TypeRef::Composite(TypeId(0));
    assert!(find_cast(composite, TypeRef::I32).is_none());
    assert!(find_cast(TypeRef::I32, composite).is_none());
}

#[test]
fn tables_within_capacity() {
    for p in Primitive::ALL {
        assert!(p.casts().len() <= MAX_CASTS);
    }
}

#[test]
fn table_sizes() {
    let counts: Vec<_> = Primitive::ALL.iter().map(|p| p.casts().len()).collect();
    assert_eq!(counts, vec![5, 4, 2, 0, 1, 0]);
}

#[test]
fn cast_writes_only_destination_width() {
    let cast = find_cast(TypeRef::I8, TypeRef::I16).unwrap();
    let mut dst = [0xAAu8; 4];
    cast.apply(&[3u8], &mut dst);
    assert_eq!(&dst[..2], &3i16.to_ne_bytes());
    assert_eq!(&dst[2..], &[0xAA, 0xAA]);
}
