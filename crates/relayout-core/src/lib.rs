#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core vocabulary shared by the relayout compiler and heap.
//!
//! - **Primitives**: the fixed scalar types (`i8`..`f64`), constant for the
//!   lifetime of the process.
//! - **Casts**: per-primitive tables of registered conversions.
//! - **Ids**: handles for composite types and pools.
//! - **Limits**: fixed capacities of a model.
//! - **Error**: every contract violation a caller can commit.

mod cast;
mod error;
mod ids;
mod kind;
pub mod limits;
mod primitive;

#[cfg(test)]
mod cast_tests;
#[cfg(test)]
mod primitive_tests;

pub use cast::{Cast, CastFn, find_cast};
pub use error::{Error, Result};
pub use ids::{PoolId, TypeId, TypeRef};
pub use kind::{Indirection, POINTER_SIZE};
pub use limits::Limits;
pub use primitive::Primitive;
