//! Relayout: runtime type layouts that migrate live instances.
//!
//! Composite types are edited at runtime. A migration recompiles every layout,
//! moves every instance into its new layout, and redirects every managed
//! address that points at a moved instance.
//!
//! # Example
//!
//! ```
//! use relayout_lib::{FieldSpec, State, TypeRef};
//!
//! let mut state = State::new();
//! let point = state.create_type("Point")?;
//! state.add_field(point, FieldSpec::value("x", TypeRef::I32))?;
//! let pool = state.value_pool(point)?;
//! state.begin_migration()?;
//! state.end_migration()?;
//!
//! let p = state.alloc(pool, 1)?.expect("one element").as_ptr();
//! unsafe { p.cast::<i32>().write(7) };
//!
//! state.insert_field(point, FieldSpec::value("y", TypeRef::I32), 0)?;
//! state.begin_migration()?;
//! let p = state.resolve(p)?;
//! state.end_migration()?;
//!
//! let x = state.ty(point).and_then(|t| t.field("x")).map(|f| f.offset());
//! assert_eq!(x, Some(4));
//! assert_eq!(unsafe { p.add(4).cast::<i32>().read() }, 7);
//! # Ok::<(), relayout_lib::Error>(())
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]


pub use relayout_compiler::{Diff, DiffOp, Field, FieldSpec, Type, TypeTable, dump_type};
pub use relayout_core::limits;
pub use relayout_core::{
    Cast, CastFn, Error, Indirection, Limits, POINTER_SIZE, PoolId, Primitive, Result, TypeId,
    TypeRef, find_cast,
};
pub use relayout_heap::{Phase, Pool, State};
