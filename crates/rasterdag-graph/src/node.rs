//! The node graph: a tagged enum of operator kinds, each implementing
//! the pull-evaluation protocol (§4.3): a node computes the upstream
//! request its own output needs, pulls each upstream, applies its own
//! kernel, and returns a [`RenderResult`].
//!
//! Nodes own their upstream(s) as `Box<Node>` (or `Vec<Box<Node>>` for
//! composite), giving the graph forward-only references by
//! construction — nothing in the type offers a node a field pointing
//! back at its consumer, so a cycle cannot be built from owned boxes
//! alone. `apply` still checks recursion depth against
//! [`MAX_GRAPH_DEPTH`] to turn a pathologically deep graph into an
//! error rather than a stack overflow.

use crate::error::{GraphError, Result};
use crate::pool_scratch::PoolScratch;
use rasterdag_core::{Fixed8, InvMatrix, Point};
use rasterdag_formats::convert::unpack_to_rgba8;
use rasterdag_formats::premul::premul_row_from_straight;
use rasterdag_formats::PixelFormat;
use rasterdag_image::{ImageBuffer, RenderRequest, RenderResult};
use rasterdag_kernels::composite::{composite_first, composite_over};
use rasterdag_pool::EntryPool;

/// Maximum recursive pull depth a graph may reach. A correctly
/// constructed graph (owned `Box<Node>` edges, no interior mutability)
/// cannot contain a cycle, so this exists purely to bound a
/// pathologically deep chain rather than overflow the call stack —
/// Rust gives no guarantee of tail-call elimination for this recursion
/// pattern.
pub const MAX_GRAPH_DEPTH: usize = 64;

/// One operator in the rendering graph.
#[derive(Debug)]
pub enum Node {
    /// Owns a backing [`ImageBuffer`]; terminates recursion.
    Source(SourceNode),
    /// Affine-warps a single upstream via the fixed-point DDA.
    Affine(AffineNode),
    /// Applies one filter kernel to a single upstream.
    Filter(FilterNode),
    /// Over-composites N upstreams in premultiplied space.
    Composite(CompositeNode),
    /// Terminal node owning the render target. Not a valid pull
    /// target — present in the enum for type uniformity with the
    /// other kinds, evaluated instead via [`crate::renderer::Renderer`].
    Sink(SinkNode),
}

impl Node {
    /// Evaluates this node for `request`, recursing into upstream(s)
    /// as needed. `pool` backs any node that wants a pool-allocated
    /// scratch region instead of a plain heap allocation.
    pub fn apply(&mut self, pool: &mut EntryPool, request: RenderRequest, depth: usize) -> Result<RenderResult> {
        if depth > MAX_GRAPH_DEPTH {
            return Err(GraphError::Core(rasterdag_core::Error::graph_too_deep(MAX_GRAPH_DEPTH)));
        }
        match self {
            Node::Source(s) => s.apply(request),
            Node::Affine(a) => a.apply(pool, request, depth),
            Node::Filter(f) => f.apply(pool, request, depth),
            Node::Composite(c) => c.apply(pool, request, depth),
            Node::Sink(_) => Err(GraphError::NoRenderTarget),
        }
    }
}

/// The scene-space integer pixel coordinate of this request's
/// tile-local origin `(0, 0)`.
///
/// `request.origin` is the scene origin's position within the
/// tile-local frame, so the tile-local frame's own `(0, 0)` sits at
/// scene coordinate `-origin`, rounded to the containing pixel.
fn tile_scene_origin(request: &RenderRequest) -> (i32, i32) {
    ((-request.origin.x).from_fixed8_floor(), (-request.origin.y).from_fixed8_floor())
}

/// Converts a scene-space integer coordinate to the coordinate local
/// to a buffer whose own scene origin sits at fixed8 position `origin`.
fn to_buffer_local(scene: i32, origin: Fixed8) -> i64 {
    (Fixed8::to_fixed8(scene) + origin).from_fixed8_floor() as i64
}

/// Owns a backing pixel buffer (the leaf of a subtree). Source images
/// are assumed aligned with the scene coordinate system: buffer pixel
/// `(0, 0)` is scene coordinate `(0, 0)`.
#[derive(Debug)]
pub struct SourceNode {
    /// The source's own pixel data.
    pub buffer: ImageBuffer,
}

impl SourceNode {
    /// Wraps an owned buffer as a source node.
    pub fn new(buffer: ImageBuffer) -> Self {
        SourceNode { buffer }
    }

    fn apply(&self, request: RenderRequest) -> Result<RenderResult> {
        let (sx0, sy0) = tile_scene_origin(&request);
        let mut out = ImageBuffer::new(request.width, request.height, self.buffer.format())?;
        rasterdag_image::copy(
            &mut out.as_view_mut(),
            0,
            0,
            &self.buffer.as_view(),
            sx0 as i64,
            sy0 as i64,
            request.width as i64,
            request.height as i64,
            None,
        )?;
        Ok(RenderResult::valid(out, request.origin))
    }
}

/// Affine-warps a single upstream input via the fixed-point DDA
/// (`rasterdag-dda`), sampling nearest-neighbor and leaving
/// out-of-range destination pixels at their zero-initialized
/// (transparent, for alpha formats) default.
#[derive(Debug)]
pub struct AffineNode {
    inv: InvMatrix,
    upstream: Box<Node>,
}

impl AffineNode {
    /// Builds an affine node from an already-inverted matrix (see
    /// [`rasterdag_core::AffineMatrix::invert`], which fails on a
    /// singular matrix before this point is ever reached).
    pub fn new(inv: InvMatrix, upstream: Box<Node>) -> Self {
        AffineNode { inv, upstream }
    }

    /// Splits the tile into strips via [`rasterdag_dda::split::plan_strips`]
    /// (§4.2: "the split is invisible to the consumer") and pulls each
    /// strip's own, smaller, input region from upstream independently —
    /// an unrotated or small request always plans to exactly one strip
    /// spanning the whole tile, so this subsumes the unsplit case rather
    /// than special-casing it.
    fn apply(&mut self, pool: &mut EntryPool, request: RenderRequest, depth: usize) -> Result<RenderResult> {
        let (dst_x0, dst_y0) = tile_scene_origin(&request);
        let strips = rasterdag_dda::split::plan_strips(&self.inv, dst_x0, dst_y0, request.width, request.height);

        let mut pulled: Vec<Option<(rasterdag_dda::split::Strip, ImageBuffer, Point)>> = Vec::with_capacity(strips.len());
        let mut format = None;
        for strip in &strips {
            if strip.region.width == 0 || strip.region.height == 0 {
                pulled.push(None);
                continue;
            }
            let inner_origin = Point::new(
                Fixed8::to_fixed8(-strip.region.x as i32),
                Fixed8::to_fixed8(-strip.region.y as i32),
            );
            let inner_request = RenderRequest::new(strip.region.width, strip.region.height, inner_origin);
            let result = self.upstream.apply(pool, inner_request, depth + 1)?;
            if !result.is_valid() {
                pulled.push(None);
                continue;
            }
            let origin_in = result.origin();
            let img = result.into_image().expect("checked is_valid above");
            format.get_or_insert(img.format());
            pulled.push(Some((*strip, img, origin_in)));
        }

        let Some(format) = format else {
            // Every strip fell outside the source, or upstream had
            // nothing valid to offer: nothing to pull.
            return Ok(RenderResult::empty(request.origin));
        };
        let Some(scratch) = PoolScratch::acquire(pool, request.width, request.height, format)? else {
            return Ok(RenderResult::empty(request.origin));
        };
        let bpp = format.bytes_per_pixel_ceil() as usize;
        let stride = scratch.stride();
        {
            let dst = scratch.bytes_mut(pool)?;
            for (strip, src_img, origin_in) in pulled.into_iter().flatten() {
                let strip_local_x0 = strip.dst_x - dst_x0;
                let strip_local_y0 = strip.dst_y - dst_y0;
                for row in 0..strip.height as i32 {
                    let global_y = strip.dst_y + row;
                    let sampler = rasterdag_dda::scanline::RowSampler::new(&self.inv, global_y);
                    let local_y = strip_local_y0 + row;
                    let dst_row_start = local_y as usize * stride;
                    for col in 0..strip.width as i32 {
                        let global_x = strip.dst_x + col;
                        let (src_x, src_y) = sampler.sample(global_x);
                        let buf_x = to_buffer_local(src_x, origin_in.x);
                        let buf_y = to_buffer_local(src_y, origin_in.y);
                        if buf_x < 0 || buf_y < 0 || buf_x as u32 >= src_img.width() || buf_y as u32 >= src_img.height() {
                            continue;
                        }
                        let local_x = strip_local_x0 + col;
                        let src_row = src_img.row(buf_y as u32);
                        let src_off = buf_x as usize * bpp;
                        let dst_off = dst_row_start + local_x as usize * bpp;
                        dst[dst_off..dst_off + bpp].copy_from_slice(&src_row[src_off..src_off + bpp]);
                    }
                }
            }
        }
        let out = scratch.finish(pool)?;
        tracing::debug!(width = request.width, height = request.height, strips = strips.len(), "affine tile sampled");
        Ok(RenderResult::valid(out, request.origin))
    }
}

/// Which pixel operation a [`FilterNode`] applies.
#[derive(Debug, Clone, Copy)]
pub enum FilterKind {
    /// Scales RGB by a non-negative factor, alpha unchanged.
    Brightness(f32),
    /// Desaturates to luma, alpha unchanged.
    Grayscale,
    /// Scales RGB and alpha together by a non-negative factor.
    Alpha(f32),
    /// Separable box blur of the given radius; output grows by `radius`
    /// pixels on every side.
    BoxBlur {
        /// Blur radius in pixels.
        radius: u32,
    },
}

/// Applies one [`FilterKind`] to a single upstream's result, always in
/// an [`PixelFormat::Rgba16Premultiplied`] intermediate — per §4.3,
/// filter nodes request a premultiplied intermediate unless an
/// explicit override, and this graph never overrides it.
#[derive(Debug)]
pub struct FilterNode {
    kind: FilterKind,
    upstream: Box<Node>,
}

impl FilterNode {
    /// Builds a filter node.
    pub fn new(kind: FilterKind, upstream: Box<Node>) -> Self {
        FilterNode { kind, upstream }
    }

    fn apply(&mut self, pool: &mut EntryPool, request: RenderRequest, depth: usize) -> Result<RenderResult> {
        let result = self.upstream.apply(pool, request, depth + 1)?;
        if !result.is_valid() {
            return Ok(RenderResult::empty(request.origin));
        }
        let origin = result.origin();
        let img = result.into_image().expect("checked is_valid above");
        let mut premul = to_premul16_buffer(&img)?;

        match self.kind {
            FilterKind::Brightness(factor) => {
                for y in 0..premul.height() {
                    let width = premul.width() as usize;
                    rasterdag_kernels::brightness::scale_brightness_premul(premul.row_mut(y), width, factor)?;
                }
                Ok(RenderResult::valid(premul, origin))
            }
            FilterKind::Grayscale => {
                for y in 0..premul.height() {
                    let width = premul.width() as usize;
                    rasterdag_kernels::grayscale::grayscale_premul(premul.row_mut(y), width)?;
                }
                Ok(RenderResult::valid(premul, origin))
            }
            FilterKind::Alpha(factor) => {
                for y in 0..premul.height() {
                    let width = premul.width() as usize;
                    rasterdag_kernels::alpha::scale_alpha_premul(premul.row_mut(y), width, factor)?;
                }
                Ok(RenderResult::valid(premul, origin))
            }
            FilterKind::BoxBlur { radius } => {
                let blurred = rasterdag_kernels::blur::box_blur_premul(&premul, radius)?;
                let shift = Fixed8::to_fixed8(radius as i32);
                let new_origin = Point::new(origin.x + shift, origin.y + shift);
                Ok(RenderResult::valid(blurred, new_origin))
            }
        }
    }
}

/// Converts any buffer to an owned [`PixelFormat::Rgba16Premultiplied`]
/// copy. A no-op clone when the source is already premultiplied.
fn to_premul16_buffer(src: &ImageBuffer) -> Result<ImageBuffer> {
    if src.format() == PixelFormat::Rgba16Premultiplied {
        return Ok(src.clone());
    }
    let mut out = ImageBuffer::new(src.width(), src.height(), PixelFormat::Rgba16Premultiplied)?;
    let width = src.width() as usize;
    let mut straight = vec![[0u8; 4]; width];
    for y in 0..src.height() {
        unpack_to_rgba8(src.format(), src.row(y), width, &mut straight, None)?;
        let flat: Vec<u8> = straight.iter().flat_map(|p| *p).collect();
        let mut premul_px = vec![[0u16; 4]; width];
        premul_row_from_straight(&flat, &mut premul_px);
        rasterdag_formats::premul::write_premul16_row(out.row_mut(y), &premul_px);
    }
    Ok(out)
}

/// Over-composites N upstream inputs onto a shared premultiplied
/// accumulator, in order. The accumulator starts fully transparent, so
/// the first input's contribution is mathematically identical to a
/// plain copy (over-compositing onto transparency is an identity) —
/// [`composite_first`] is used as a fast path whenever the first
/// input's own format already matches the accumulator.
#[derive(Debug)]
pub struct CompositeNode {
    inputs: Vec<Box<Node>>,
}

impl CompositeNode {
    /// Builds a composite node from at least one input.
    pub fn new(inputs: Vec<Box<Node>>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(GraphError::EmptyComposite);
        }
        Ok(CompositeNode { inputs })
    }

    fn apply(&mut self, pool: &mut EntryPool, request: RenderRequest, depth: usize) -> Result<RenderResult> {
        let Some(scratch) = PoolScratch::acquire(pool, request.width, request.height, PixelFormat::Rgba16Premultiplied)?
        else {
            return Ok(RenderResult::empty(request.origin));
        };
        let stride = scratch.stride();

        for (i, input) in self.inputs.iter_mut().enumerate() {
            let result = input.apply(pool, request, depth + 1)?;
            if !result.is_valid() {
                continue;
            }
            let origin_in = result.origin();
            let img = result.into_image().expect("checked is_valid above");

            let dst_x = (request.origin.x - origin_in.x).from_fixed8_floor() as i64;
            let dst_y = (request.origin.y - origin_in.y).from_fixed8_floor() as i64;
            let acc = scratch.bytes_mut(pool)?;
            blend_into(acc, stride, request.width, request.height, i == 0, dst_x, dst_y, &img)?;
        }

        let acc = scratch.finish(pool)?;
        Ok(RenderResult::valid(acc, request.origin))
    }
}

/// Blends (or, for `first && src.format() == Rgba16Premultiplied`,
/// copies) `src` into the `acc_width x acc_height` premultiplied
/// accumulator `acc` (row-stride `acc_stride` bytes) at `(dst_x,
/// dst_y)`, clipping to both extents — mirroring the negative-offset
/// clipping [`rasterdag_image::copy`] already performs for the
/// tile-stitching path. `acc` is raw bytes rather than an `ImageBuffer`
/// so a pool-acquired scratch slot can be blended into directly.
fn blend_into(
    acc: &mut [u8],
    acc_stride: usize,
    acc_width: u32,
    acc_height: u32,
    first: bool,
    mut dst_x: i64,
    mut dst_y: i64,
    src: &ImageBuffer,
) -> Result<()> {
    let mut src_x = 0i64;
    let mut src_y = 0i64;
    let mut width = src.width() as i64;
    let mut height = src.height() as i64;

    if dst_x < 0 {
        width += dst_x;
        src_x -= dst_x;
        dst_x = 0;
    }
    if dst_y < 0 {
        height += dst_y;
        src_y -= dst_y;
        dst_y = 0;
    }
    width = width.min(acc_width as i64 - dst_x).min(src.width() as i64 - src_x);
    height = height.min(acc_height as i64 - dst_y).min(src.height() as i64 - src_y);
    if width <= 0 || height <= 0 {
        return Ok(());
    }

    let src_bpp = src.format().bytes_per_pixel_ceil() as usize;
    let dst_bpp = PixelFormat::Rgba16Premultiplied.bytes_per_pixel_ceil() as usize;
    let fast_copy = first && src.format() == PixelFormat::Rgba16Premultiplied;

    for row in 0..height {
        let src_row = src.row((src_y + row) as u32);
        let src_slice = &src_row[src_x as usize * src_bpp..(src_x as usize + width as usize) * src_bpp];
        let dst_row_start = (dst_y + row) as usize * acc_stride;
        let dst_slice = &mut acc
            [dst_row_start + dst_x as usize * dst_bpp..dst_row_start + (dst_x as usize + width as usize) * dst_bpp];
        if fast_copy {
            composite_first(dst_slice, src_slice);
        } else {
            composite_over(dst_slice, src.format(), src_slice, width as usize, None)?;
        }
    }
    Ok(())
}

/// Owns the render target's dimensions and single upstream. Carries no
/// pixel storage of its own — the actual output bytes live in the
/// caller-supplied viewport passed to [`crate::renderer::Renderer::execute`],
/// since a borrowed target cannot be stored in a long-lived struct
/// without threading its lifetime through the whole graph.
#[derive(Debug)]
pub struct SinkNode {
    /// The node this sink pulls its single output from.
    pub upstream: Box<Node>,
    /// Output canvas width in pixels.
    pub canvas_width: u32,
    /// Output canvas height in pixels.
    pub canvas_height: u32,
    /// Position of the scene origin on the canvas.
    pub origin: Point,
}

impl SinkNode {
    /// Builds a sink node.
    pub fn new(upstream: Box<Node>, canvas_width: u32, canvas_height: u32, origin: Point) -> Self {
        SinkNode {
            upstream,
            canvas_width,
            canvas_height,
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterdag_core::AffineMatrix;

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
    fn source_node_returns_exact_tile_on_identity_request() {
        let mut node = Node::Source(SourceNode::new(solid_source(4, 4, [10, 20, 30, 255])));
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let request = RenderRequest::new(4, 4, Point::from_int(0, 0));
        let result = node.apply(&mut pool, request, 0).unwrap();
        assert!(result.is_valid());
        let img = result.into_image().unwrap();
        assert_eq!(img.row(0)[0..4], [10, 20, 30, 255]);
    }

    #[test]
    fn affine_identity_passes_pixels_through_unchanged() {
        let source = Node::Source(SourceNode::new(solid_source(4, 4, [1, 2, 3, 255])));
        let inv = AffineMatrix::IDENTITY.invert().unwrap();
        let mut node = Node::Affine(AffineNode::new(inv, Box::new(source)));
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let request = RenderRequest::new(4, 4, Point::from_int(0, 0));
        let result = node.apply(&mut pool, request, 0).unwrap();
        let img = result.into_image().unwrap();
        assert_eq!(img.row(2)[0..4], [1, 2, 3, 255]);
    }

    #[test]
    fn rotated_affine_tile_matches_unsplit_reference_sampling() {
        // Scenario D (split equivalence): a large rotated request is
        // internally split into strips by `plan_strips`, but the
        // stitched result must equal sampling the whole tile's AABB in
        // one shot, pixel for pixel.
        let w = 48u32;
        let h = 48u32;
        let mut src = ImageBuffer::new(w, h, PixelFormat::Rgba8Straight).unwrap();
        for y in 0..h {
            let row = src.row_mut(y);
            for x in 0..w as usize {
                row[x * 4..x * 4 + 4].copy_from_slice(&[(x as u8).wrapping_mul(5), (y as u8).wrapping_mul(5), 0, 255]);
            }
        }
        let reference = src.clone();

        let m = AffineMatrix::rotation_scale(std::f64::consts::FRAC_PI_6, 1.0);
        let inv = m.invert().unwrap();

        let source = Node::Source(SourceNode::new(src));
        let mut node = Node::Affine(AffineNode::new(inv, Box::new(source)));
        let mut pool = EntryPool::new(256, 64, 4).unwrap();
        let request = RenderRequest::new(w, h, Point::from_int(0, 0));
        let result = node.apply(&mut pool, request, 0).unwrap();
        let img = result.into_image().unwrap();

        for y in 0..h as i32 {
            let sampler = rasterdag_dda::scanline::RowSampler::new(&inv, y);
            for x in 0..w as i32 {
                let (sx, sy) = sampler.sample(x);
                let expected = if sx >= 0 && sy >= 0 && (sx as u32) < w && (sy as u32) < h {
                    let row = reference.row(sy as u32);
                    row[sx as usize * 4..sx as usize * 4 + 4].to_vec()
                } else {
                    vec![0, 0, 0, 0]
                };
                let row = img.row(y as u32);
                assert_eq!(&row[x as usize * 4..x as usize * 4 + 4], expected.as_slice(), "mismatch at ({x}, {y})");
            }
        }
    }

    #[test]
    fn composite_node_rejects_zero_inputs() {
        let err = CompositeNode::new(vec![]).unwrap_err();
        assert!(matches!(err, GraphError::EmptyComposite));
    }

    #[test]
    fn composite_of_single_opaque_input_matches_scenario_e() {
        let source = Node::Source(SourceNode::new(solid_source(2, 2, [255, 0, 0, 128])));
        let mut node = Node::Composite(CompositeNode::new(vec![Box::new(source)]).unwrap());
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let request = RenderRequest::new(2, 2, Point::from_int(0, 0));
        let result = node.apply(&mut pool, request, 0).unwrap();
        let img = result.into_image().unwrap();
        assert_eq!(img.format(), PixelFormat::Rgba16Premultiplied);

        let premul = rasterdag_formats::premul::read_premul16_row(img.row(0), 2);
        let mut straight = [0u8; 4];
        rasterdag_formats::premul::straight_row_from_premul(&premul[..1], &mut straight);
        assert_eq!(straight, [255, 0, 0, 128]);
    }

    #[test]
    fn filter_brightness_doubles_and_clamps_matching_scenario_b() {
        let source = Node::Source(SourceNode::new(solid_source(1, 1, [200, 10, 10, 255])));
        let mut node = Node::Filter(FilterNode::new(FilterKind::Brightness(2.0), Box::new(source)));
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let request = RenderRequest::new(1, 1, Point::from_int(0, 0));
        let result = node.apply(&mut pool, request, 0).unwrap();
        let img = result.into_image().unwrap();
        let premul = rasterdag_formats::premul::read_premul16_row(img.row(0), 1);
        let mut straight = [0u8; 4];
        rasterdag_formats::premul::straight_row_from_premul(&premul, &mut straight);
        assert_eq!(straight, [255, 20, 20, 255]);
    }

    #[test]
    fn deeply_nested_affine_chain_reports_graph_too_deep() {
        let mut node: Node = Node::Source(SourceNode::new(solid_source(2, 2, [0, 0, 0, 255])));
        for _ in 0..(MAX_GRAPH_DEPTH + 2) {
            let inv = AffineMatrix::IDENTITY.invert().unwrap();
            node = Node::Affine(AffineNode::new(inv, Box::new(node)));
        }
        let mut pool = EntryPool::new(64, 8, 4).unwrap();
        let request = RenderRequest::new(2, 2, Point::from_int(0, 0));
        let err = node.apply(&mut pool, request, 0).unwrap_err();
        assert!(matches!(err, GraphError::Core(rasterdag_core::Error::GraphTooDeep { .. })));
    }
}
