#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Type records and the layout compiler.
//!
//! - **Table** (`TypeTable`): registry of composite types and the field
//!   editing surface. Edits only touch a type's pending field list.
//! - **Layout**: compiles pending lists into committed layouts and diff
//!   plans, nested types first, once per generation.
//! - **Dump**: text rendering of a layout and its plan.

mod diff;
mod dump;
mod field;
mod layout;
mod table;
mod ty;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod table_tests;

pub use diff::{Diff, DiffOp};
pub use dump::dump_type;
pub use field::{Field, FieldSpec};
pub use layout::round_up;
pub use table::TypeTable;
pub use ty::Type;
