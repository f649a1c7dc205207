//! Tile-scheduled execution of a [`SinkNode`], driving its single
//! upstream tile by tile and stitching each tile's result into a
//! caller-supplied canvas view.
//!
//! Grounded directly on the original renderer's `execute()`/
//! `processTile()` structure: a double loop over `tile_count_y x
//! tile_count_x`, per-tile clamped width/height at canvas edges, and a
//! `RenderRequest` whose origin is the scene origin repositioned into
//! the tile's own local frame (`origin - tile_origin`). The formula
//! placing a tile's result onto the canvas, `tile_left +
//! floor(result.origin - request.origin)`, falls out of that
//! convention directly: most nodes return a result whose origin
//! exactly matches what was requested, so the shift term is zero and
//! the tile lands at `tile_left`; a node that grows its output (box
//! blur's padding) returns an origin shifted by exactly how far its
//! buffer now extends past the tile's nominal edge, and that shift is
//! what nudges the destination position to compensate.

use crate::error::Result;
use crate::node::SinkNode;
use rasterdag_core::{Fixed8, Point};
use rasterdag_image::{copy, RenderRequest};
use rasterdag_pool::EntryPool;

/// Tile size and diagnostic settings for a [`Renderer`].
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// When set, every other tile (checkerboard pattern) is skipped
    /// rather than rendered. Diagnostic only — never set outside of
    /// debugging a tile-boundary issue.
    pub debug_checkerboard: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererOptions {
            tile_width: 256,
            tile_height: 256,
            debug_checkerboard: false,
        }
    }
}

/// Drives a [`SinkNode`]'s upstream tile by tile into a target canvas.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RendererOptions,
}

impl Renderer {
    /// Builds a renderer with the given tile/diagnostic options.
    pub fn new(options: RendererOptions) -> Self {
        Renderer { options }
    }

    /// Renders `sink`'s upstream into `target`, a view already sized to
    /// `sink.canvas_width x sink.canvas_height`. `pool` backs any node
    /// in the graph that wants a pool-allocated scratch region.
    pub fn execute(
        &self,
        sink: &mut SinkNode,
        pool: &mut EntryPool,
        target: &mut rasterdag_image::ViewPortMut,
    ) -> Result<()> {
        let tw = self.options.tile_width.max(1);
        let th = self.options.tile_height.max(1);
        let tile_count_x = sink.canvas_width.div_ceil(tw);
        let tile_count_y = sink.canvas_height.div_ceil(th);

        for ty in 0..tile_count_y {
            for tx in 0..tile_count_x {
                if self.options.debug_checkerboard && (tx + ty) % 2 == 1 {
                    continue;
                }
                self.process_tile(sink, pool, target, tx, ty, tw, th)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn process_tile(
        &self,
        sink: &mut SinkNode,
        pool: &mut EntryPool,
        target: &mut rasterdag_image::ViewPortMut,
        tx: u32,
        ty: u32,
        tw: u32,
        th: u32,
    ) -> Result<()> {
        let tile_left = tx * tw;
        let tile_top = ty * th;
        let tile_w = tw.min(sink.canvas_width - tile_left);
        let tile_h = th.min(sink.canvas_height - tile_top);

        let request_origin = Point::new(
            sink.origin.x - Fixed8::to_fixed8(tile_left as i32),
            sink.origin.y - Fixed8::to_fixed8(tile_top as i32),
        );
        let request = RenderRequest::new(tile_w, tile_h, request_origin);
        let result = sink.upstream.apply(pool, request, 0)?;
        if !result.is_valid() {
            tracing::debug!(tx, ty, "tile produced no result, skipping");
            return Ok(());
        }
        let origin_out = result.origin();
        let img = result.into_image().expect("checked is_valid above");

        let dst_x = tile_left as i64 + (origin_out.x - request_origin.x).from_fixed8_floor() as i64;
        let dst_y = tile_top as i64 + (origin_out.y - request_origin.y).from_fixed8_floor() as i64;

        copy(
            target,
            dst_x,
            dst_y,
            &img.as_view(),
            0,
            0,
            img.width() as i64,
            img.height() as i64,
            None,
        )?;
        tracing::debug!(tx, ty, dst_x, dst_y, "tile stitched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, SourceNode};
    use rasterdag_formats::PixelFormat;
    use rasterdag_image::ImageBuffer;

    fn solid_source(w: u32, h: u32, rgba: [u8; 4]) -> ImageBuffer {
        let mut buf = ImageBuffer::new(w, h, PixelFormat::Rgba8Straight).unwrap();
        for y in 0..h {
            let row = buf.row_mut(y);
            for x in 0..w as usize {
                row[x * 4..x * 4 + 4].copy_from_slice(&rgba);
            }
        }
        buf
    }

    #[test]
    fn single_tile_canvas_copies_source_unchanged() {
        let source = Node::Source(SourceNode::new(solid_source(4, 4, [9, 8, 7, 255])));
        let mut sink = SinkNode::new(Box::new(source), 4, 4, Point::from_int(0, 0));
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let mut canvas = ImageBuffer::new(4, 4, PixelFormat::Rgba8Straight).unwrap();
        let renderer = Renderer::new(RendererOptions {
            tile_width: 256,
            tile_height: 256,
            debug_checkerboard: false,
        });
        renderer.execute(&mut sink, &mut pool, &mut canvas.as_view_mut()).unwrap();
        assert_eq!(canvas.row(3)[12..16], [9, 8, 7, 255]);
    }

    #[test]
    fn multi_tile_canvas_stitches_every_tile() {
        let source = Node::Source(SourceNode::new(solid_source(6, 6, [1, 2, 3, 255])));
        let mut sink = SinkNode::new(Box::new(source), 6, 6, Point::from_int(0, 0));
        let mut pool = EntryPool::new(256, 16, 8).unwrap();
        let mut canvas = ImageBuffer::new(6, 6, PixelFormat::Rgba8Straight).unwrap();
        let renderer = Renderer::new(RendererOptions {
            tile_width: 4,
            tile_height: 4,
            debug_checkerboard: false,
        });
        renderer.execute(&mut sink, &mut pool, &mut canvas.as_view_mut()).unwrap();
        assert_eq!(canvas.row(0)[0..4], [1, 2, 3, 255]);
        assert_eq!(canvas.row(5)[20..24], [1, 2, 3, 255]);
    }

    #[test]
    fn checkerboard_option_skips_every_other_tile() {
        let source = Node::Source(SourceNode::new(solid_source(4, 4, [5, 5, 5, 255])));
        let mut sink = SinkNode::new(Box::new(source), 4, 4, Point::from_int(0, 0));
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let mut canvas = ImageBuffer::new(4, 4, PixelFormat::Rgba8Straight).unwrap();
        let renderer = Renderer::new(RendererOptions {
            tile_width: 2,
            tile_height: 2,
            debug_checkerboard: true,
        });
        renderer.execute(&mut sink, &mut pool, &mut canvas.as_view_mut()).unwrap();
        // Tile (0,0) is rendered, tile (1,0) is skipped (checkerboard).
        assert_eq!(canvas.row(0)[0..4], [5, 5, 5, 255]);
        assert_eq!(canvas.row(0)[8..12], [0, 0, 0, 0]);
    }
}
