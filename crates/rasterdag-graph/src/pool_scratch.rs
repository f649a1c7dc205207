//! Acquire → write → copy-out → release: the pattern a node uses to
//! back one tile's intermediate with pool memory instead of a bare
//! heap allocation (§4.3: "allocates an intermediate from the pool").
//!
//! The original threads a raw pointer into the pool's shared arena
//! through the whole recursive pull chain, so a node's result can
//! alias pool memory directly and outlive the call that produced it.
//! Rust's borrow checker will not allow a `&mut EntryPool` borrow to be
//! held open across that recursion while the scheduler also needs
//! `&mut EntryPool` to service sibling requests, so [`PoolScratch`]
//! instead scopes the pool borrow to one node's own `apply` call: the
//! slot is acquired, written into directly (exercising the allocator's
//! tested hit/miss/fragmentation behavior unchanged), copied out into
//! an owned [`ImageBuffer`], and released, all before `apply` returns.

use crate::error::Result;
use rasterdag_formats::PixelFormat;
use rasterdag_image::ImageBuffer;
use rasterdag_pool::{BufferSlotHandle, EntryPool};

/// A pool-backed scratch region sized for one `width x height` image
/// of `format`.
pub struct PoolScratch {
    handle: BufferSlotHandle,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl PoolScratch {
    /// Acquires a zero-filled pool slot for a `width x height` image of
    /// `format`. Returns `None` on pool exhaustion — the caller
    /// propagates this as render-result emptiness, per the pipeline's
    /// resource-exhaustion policy, not as an `Err`.
    pub fn acquire(pool: &mut EntryPool, width: u32, height: u32, format: PixelFormat) -> Result<Option<Self>> {
        let stride = width as usize * format.bytes_per_pixel_ceil() as usize;
        let size = stride * height as usize;
        let Some(handle) = pool.acquire(size) else {
            return Ok(None);
        };
        pool.bytes_mut(handle)?.fill(0);
        Ok(Some(PoolScratch {
            handle,
            width,
            height,
            stride,
            format,
        }))
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Mutably borrows the whole scratch region.
    pub fn bytes_mut<'a>(&self, pool: &'a mut EntryPool) -> Result<&'a mut [u8]> {
        Ok(pool.bytes_mut(self.handle)?)
    }

    /// Copies the scratch region out into an owned [`ImageBuffer`] and
    /// releases the slot back to the pool.
    pub fn finish(self, pool: &mut EntryPool) -> Result<ImageBuffer> {
        let bytes = pool.bytes(self.handle)?.to_vec();
        pool.release(self.handle)?;
        Ok(ImageBuffer::from_raw(self.width, self.height, self.stride, self.format, bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_write_finish_roundtrips_pixel_data() {
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let scratch = PoolScratch::acquire(&mut pool, 2, 2, PixelFormat::Gray8).unwrap().unwrap();
        scratch.bytes_mut(&mut pool).unwrap()[0] = 42;
        let img = scratch.finish(&mut pool).unwrap();
        assert_eq!(img.row(0)[0], 42);
    }

    #[test]
    fn exhausted_pool_returns_none_not_err() {
        let mut pool = EntryPool::new(16, 1, 1).unwrap();
        let _first = PoolScratch::acquire(&mut pool, 4, 4, PixelFormat::Gray8).unwrap().unwrap();
        let second = PoolScratch::acquire(&mut pool, 4, 4, PixelFormat::Gray8).unwrap();
        assert!(second.is_none());
    }
}
