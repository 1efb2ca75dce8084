//! The per-invocation downsample body.
//!
//! One invocation owns one destination texel `(i, j)` and reads the 2x2
//! source block starting at its footprint origin. With the box strategy the
//! origin is `(2i, 2j)`, so neighbouring invocations never share an output.

use hr_core::{AddressMode, ImageView, Quad, Rgba, blend_quad, fetch_quad};

use crate::config::{BlendStrategy, DownsampleConfig};

/// Blend factor used by the box strategy for both axes.
pub const BOX_WEIGHT: f32 = 0.5;

/// Source-space 2x2 block read by one invocation, with its blend factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: isize,
    pub y: isize,
    pub fx: f32,
    pub fy: f32,
}

impl Footprint {
    /// `dst` must be non-empty on both axes.
    pub fn for_texel(
        coord: (usize, usize),
        src: (usize, usize),
        dst: (usize, usize),
        blend: BlendStrategy,
    ) -> Self {
        let (i, j) = coord;
        match blend {
            BlendStrategy::Box => Self {
                x: (2 * i) as isize,
                y: (2 * j) as isize,
                fx: BOX_WEIGHT,
                fy: BOX_WEIGHT,
            },
            BlendStrategy::Bilinear => {
                let (x, fx) = bilinear_axis(i, src.0, dst.0);
                let (y, fy) = bilinear_axis(j, src.1, dst.1);
                Self { x, y, fx, fy }
            }
        }
    }
}

// Texel centers: destination `i` sits at source `(i + 0.5) * scale - 0.5`.
#[inline]
fn bilinear_axis(i: usize, src_len: usize, dst_len: usize) -> (isize, f32) {
    let scale = src_len as f32 / dst_len as f32;
    let p = (i as f32 + 0.5) * scale - 0.5;
    let p0 = p.floor();
    (p0 as isize, p - p0)
}

/// Unweighted mean of the block, computed as three 0.5 blends.
#[inline]
pub fn blend_box(quad: &Quad) -> Rgba {
    blend_quad(quad, BOX_WEIGHT, BOX_WEIGHT)
}

/// Runs one invocation and returns the color for destination texel `coord`.
///
/// The output alpha is always 1.0.
#[inline]
pub fn downsample_texel(
    src: &ImageView<'_, Rgba>,
    coord: (usize, usize),
    dst: (usize, usize),
    cfg: &DownsampleConfig,
) -> Rgba {
    let fp = Footprint::for_texel(coord, src.dimensions(), dst, cfg.blend);
    blend_footprint(src, &fp, &cfg.address).with_alpha(1.0)
}

#[inline]
fn blend_footprint(src: &ImageView<'_, Rgba>, fp: &Footprint, address: &AddressMode) -> Rgba {
    let quad = fetch_quad(src, fp.x, fp.y, address);
    blend_quad(&quad, fp.fx, fp.fy)
}
