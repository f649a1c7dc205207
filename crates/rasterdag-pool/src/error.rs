//! Errors raised by the bitmap allocator and entry pool.

use thiserror::Error as ThisError;

/// Result type alias using [`PoolError`] as the error type.
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors raised by [`crate::pool::PoolAllocator`] and
/// [`crate::entry_pool::EntryPool`].
#[derive(Debug, ThisError)]
pub enum PoolError {
    /// The allocator was asked for more blocks than a 32-bit bitmap can
    /// track.
    #[error("pool requires {requested} blocks but the bitmap can track at most {max}")]
    TooManyBlocks {
        /// Blocks requested.
        requested: u32,
        /// Maximum blocks supported (always 32).
        max: u32,
    },

    /// A zero block size was requested.
    #[error("block size must be non-zero")]
    ZeroBlockSize,

    /// A buffer-set slot handle was used after its slot was released.
    #[error("slot {slot} used after release")]
    StaleSlotHandle {
        /// The slot index that was stale.
        slot: usize,
    },

    /// Propagated from [`rasterdag_core`] — covers double-free and
    /// double-release protocol violations.
    #[error(transparent)]
    Core(#[from] rasterdag_core::Error),
}

impl PoolError {
    /// Creates a [`PoolError::TooManyBlocks`] error.
    #[inline]
    pub fn too_many_blocks(requested: u32, max: u32) -> Self {
        Self::TooManyBlocks { requested, max }
    }
}
