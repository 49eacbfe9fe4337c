//! Storage addressing for array data.
//!
//! An array's buffer is either traversed densely, with the canonical
//! column-major stride, or through per-axis offset tables that let several
//! views share one buffer without copying.

mod index_offset;
mod pool;

pub use index_offset::IndexOffset;
pub use pool::{BufferPool, PoolConfig, PoolStats};

/// How an array addresses its buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// Canonical column-major layout starting at slot 0.
    Dense,
    /// Per-axis offset tables into a possibly shared buffer.
    Viewed(IndexOffset),
}

impl Storage {
    /// Returns `true` for dense addressing.
    pub fn is_dense(&self) -> bool {
        matches!(self, Storage::Dense)
    }

    /// Short name used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Storage::Dense => "dense",
            Storage::Viewed(_) => "viewed",
        }
    }
}
