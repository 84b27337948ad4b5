//! Fixed capacities of a model.

/// Maximum length of a type or field name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum number of fields in one type.
pub const MAX_FIELDS: usize = 64;

/// Maximum number of diff instructions one compile may emit for a type.
pub const MAX_DIFFS: usize = 64;

/// Maximum number of registered conversions out of one primitive.
pub const MAX_CASTS: usize = 16;

/// Maximum number of concurrently registered composite types.
pub const MAX_TYPES: usize = 32;

/// Maximum number of concurrently registered pools.
pub const MAX_POOLS: usize = 32;

/// Largest byte size of one layout or one block, leaving room for block
/// alignment padding below `isize::MAX`.
pub const MAX_BYTES: usize = (isize::MAX as usize) & !0xfff;

/// Byte size of `count` elements of `stride` bytes, if it fits in [`MAX_BYTES`].
pub fn checked_bytes(count: usize, stride: usize) -> Option<usize> {
    count.checked_mul(stride).filter(|&n| n <= MAX_BYTES)
}

/// Capacities enforced by a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub(crate) max_name_len: usize,
    pub(crate) max_fields: usize,
    pub(crate) max_diffs: usize,
    pub(crate) max_types: usize,
    pub(crate) max_pools: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_name_len: MAX_NAME_LEN,
            max_fields: MAX_FIELDS,
            max_diffs: MAX_DIFFS,
            max_types: MAX_TYPES,
            max_pools: MAX_POOLS,
        }
    }
}

impl Limits {
    /// Create limits with the default capacities.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }

    pub fn max_diffs(mut self, count: usize) -> Self {
        self.max_diffs = count;
        self
    }

    pub fn max_types(mut self, count: usize) -> Self {
        self.max_types = count;
        self
    }

    pub fn max_pools(mut self, count: usize) -> Self {
        self.max_pools = count;
        self
    }

    pub fn get_max_name_len(&self) -> usize {
        self.max_name_len
    }
    pub fn get_max_fields(&self) -> usize {
        self.max_fields
    }
    pub fn get_max_diffs(&self) -> usize {
        self.max_diffs
    }
    pub fn get_max_types(&self) -> usize {
        self.max_types
    }
    pub fn get_max_pools(&self) -> usize {
        self.max_pools
    }
}
