//! Registered conversions between primitive types.
//!
//! Each primitive owns a flat, immutable table of (destination, function)
//! pairs. Only lossless integer widenings, integer-to-float widenings and
//! float widening are registered; anything else has no entry and migrates as
//! zero-fill.

use crate::ids::TypeRef;
use crate::limits::MAX_CASTS;
use crate::primitive::Primitive;

/// Converts one element: reads the source primitive from the front of `src`
/// and writes the destination primitive to the front of `dst`.
pub type CastFn = fn(src: &[u8], dst: &mut [u8]);

/// One registered conversion.
#[derive(Clone, Copy)]
pub struct Cast {
    pub to: Primitive,
    pub func: CastFn,
}

impl Cast {
    /// Convert a single element.
    #[inline]
    pub fn apply(&self, src: &[u8], dst: &mut [u8]) {
        (self.func)(src, dst)
    }
}

impl std::fmt::Debug for Cast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cast").field("to", &self.to).finish()
    }
}

#[inline]
fn load<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&src[..N]);
    buf
}

macro_rules! cast_fn {
    ($name:ident, $from:ty => $to:ty) => {
        fn $name(src: &[u8], dst: &mut [u8]) {
            let value = <$from>::from_ne_bytes(load(src)) as $to;
            let bytes = value.to_ne_bytes();
            dst[..bytes.len()].copy_from_slice(&bytes);
        }
    };
}

cast_fn!(i8_to_i16, i8 => i16);
cast_fn!(i8_to_i32, i8 => i32);
cast_fn!(i8_to_i64, i8 => i64);
cast_fn!(i8_to_f32, i8 => f32);
cast_fn!(i8_to_f64, i8 => f64);
cast_fn!(i16_to_i32, i16 => i32);
cast_fn!(i16_to_i64, i16 => i64);
cast_fn!(i16_to_f32, i16 => f32);
cast_fn!(i16_to_f64, i16 => f64);
cast_fn!(i32_to_i64, i32 => i64);
cast_fn!(i32_to_f64, i32 => f64);
cast_fn!(f32_to_f64, f32 => f64);

static I8_CASTS: [Cast; 5] = [
    Cast { to: Primitive::I16, func: i8_to_i16 },
    Cast { to: Primitive::I32, func: i8_to_i32 },
    Cast { to: Primitive::I64, func: i8_to_i64 },
    Cast { to: Primitive::F32, func: i8_to_f32 },
    Cast { to: Primitive::F64, func: i8_to_f64 },
];

static I16_CASTS: [Cast; 4] = [
    Cast { to: Primitive::I32, func: i16_to_i32 },
    Cast { to: Primitive::I64, func: i16_to_i64 },
    Cast { to: Primitive::F32, func: i16_to_f32 },
    Cast { to: Primitive::F64, func: i16_to_f64 },
];

static I32_CASTS: [Cast; 2] = [
    Cast { to: Primitive::I64, func: i32_to_i64 },
    Cast { to: Primitive::F64, func: i32_to_f64 },
];

static F32_CASTS: [Cast; 1] = [Cast { to: Primitive::F64, func: f32_to_f64 }];

const _: () = {
    assert!(I8_CASTS.len() <= MAX_CASTS);
    assert!(I16_CASTS.len() <= MAX_CASTS);
    assert!(I32_CASTS.len() <= MAX_CASTS);
    assert!(F32_CASTS.len() <= MAX_CASTS);
};

pub(crate) fn table(from: Primitive) -> &'static [Cast] {
    match from {
        Primitive::I8 => &I8_CASTS,
        Primitive::I16 => &I16_CASTS,
        Primitive::I32 => &I32_CASTS,
        Primitive::F32 => &F32_CASTS,
        Primitive::I64 | Primitive::F64 => &[],
    }
}

/// Find the registered conversion from `from` to `to`.
///
/// Composite types never have casts; a retype between them always zero-fills.
pub fn find_cast(from: TypeRef, to: TypeRef) -> Option<&'static Cast> {
    let (TypeRef::Primitive(from), TypeRef::Primitive(to)) = (from, to) else {
        return None;
    };
    from.casts().iter().find(|c| c.to == to)
}
