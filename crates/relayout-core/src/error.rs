//! Contract violations a caller can commit against a model.
//!
//! Data loss from retyping or shrinking a field is not an error: it is the
//! documented zero-fill/truncation policy and never surfaces here.

use crate::ids::PoolId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("type `{0}` already exists")]
    DuplicateType(String),

    #[error("type `{type_name}` already has a field named `{field}`")]
    DuplicateField { type_name: String, field: String },

    #[error("type `{0}` not found")]
    TypeNotFound(String),

    #[error("type `{type_name}` has no field named `{field}`")]
    FieldNotFound { type_name: String, field: String },

    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    #[error("array length must be positive, got {0}")]
    InvalidArrayLength(usize),

    #[error("field index {index} out of range (type has {len} fields)")]
    FieldIndexOutOfRange { index: usize, len: usize },

    #[error("name is {len} bytes long (max {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("too many {what} (max {limit})")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("type `{0}` is fixed and cannot be edited")]
    FixedType(String),

    #[error("no migration is open")]
    MigrationNotOpen,

    #[error("a migration is already open")]
    MigrationInProgress,

    #[error("address {0:#x} was not allocated by this model")]
    UnknownAddress(usize),

    #[error("address {addr:#x} does not belong to pool {pool}")]
    AddressNotInPool { addr: usize, pool: PoolId },

    #[error("address {0:#x} is not the start of an allocation")]
    NotBlockStart(usize),

    #[error("type `{type_name}` is still referenced by `{by}`")]
    TypeInUse { type_name: String, by: String },

    #[error("type `{0}` contains itself by value")]
    RecursiveValueField(String),

    #[error("type `{type_name}` cannot be sealed: {reason}")]
    NotSealable { type_name: String, reason: &'static str },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
