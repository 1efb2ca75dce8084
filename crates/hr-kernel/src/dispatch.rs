//! Host-side dispatch of the downsample kernel.
//!
//! The thread grid is laid over the destination image, one invocation per
//! destination texel, grouped into fixed-size thread groups. A row of groups
//! (a band of `group.y` destination rows) is the unit of parallel work: each
//! band is a disjoint `&mut` slice of the destination, so every texel is
//! written exactly once and no synchronisation is needed.

use hr_core::{Error, Image, ImageView, ImageViewMut, Rgba};
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DownsampleConfig, Execution};
use crate::kernel::downsample_texel;

/// Invocations per thread group along x and y (z is always 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSize {
    pub x: u32,
    pub y: u32,
}

impl GroupSize {
    pub const DEFAULT: GroupSize = GroupSize { x: 4, y: 4 };

    pub fn validate(&self) -> Result<(), Error> {
        if self.x == 0 || self.y == 0 {
            return Err(Error::InvalidGroupSize {
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }

    pub fn invocations(&self) -> usize {
        self.x as usize * self.y as usize
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Number of thread groups launched along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchGrid {
    pub groups_x: usize,
    pub groups_y: usize,
    pub group: GroupSize,
}

impl DispatchGrid {
    /// Smallest grid whose invocations cover a `width x height` extent.
    pub fn cover(width: usize, height: usize, group: GroupSize) -> Self {
        Self {
            groups_x: width.div_ceil(group.x as usize),
            groups_y: height.div_ceil(group.y as usize),
            group,
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups_x * self.groups_y
    }

    /// Launched invocations, including those the bounds guard skips.
    pub fn launched_invocations(&self) -> usize {
        self.group_count() * self.group.invocations()
    }
}

/// Summary of one completed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub src: (usize, usize),
    pub dst: (usize, usize),
    pub grid: DispatchGrid,
    /// Invocations that ran the kernel body, one per destination texel.
    pub invocations: usize,
}

/// Destination extent for a source of `src_w x src_h` under `cfg`.
pub fn destination_extent(src_w: usize, src_h: usize, cfg: &DownsampleConfig) -> (usize, usize) {
    cfg.extent.destination_extent(src_w, src_h)
}

/// A configured downsample pipeline, ready to dispatch.
#[derive(Debug, Clone)]
pub struct DownsampleKernel {
    cfg: DownsampleConfig,
}

impl DownsampleKernel {
    pub fn new(cfg: DownsampleConfig) -> Result<Self, Error> {
        cfg.group.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &DownsampleConfig {
        &self.cfg
    }

    pub fn destination_extent(&self, src_w: usize, src_h: usize) -> (usize, usize) {
        destination_extent(src_w, src_h, &self.cfg)
    }

    /// Allocates the destination and dispatches into it.
    pub fn run(&self, src: &ImageView<'_, Rgba>) -> Result<Image<Rgba>, Error> {
        let (dst_w, dst_h) = self.destination_extent(src.width(), src.height());
        let mut dst = Image::new_fill(dst_w, dst_h, Rgba::TRANSPARENT);
        self.dispatch(src, &mut dst.as_view_mut())?;
        Ok(dst)
    }

    /// Binds `src` (slot 0) and `dst` (slot 1) and runs one invocation per
    /// destination texel.
    ///
    /// `dst` must have exactly the extent returned by
    /// [`DownsampleKernel::destination_extent`].
    pub fn dispatch(
        &self,
        src: &ImageView<'_, Rgba>,
        dst: &mut ImageViewMut<'_, Rgba>,
    ) -> Result<DispatchReport, Error> {
        let (src_w, src_h) = src.dimensions();
        let expected = self.destination_extent(src_w, src_h);
        if dst.dimensions() != expected {
            return Err(Error::DestinationExtent {
                expected,
                actual: dst.dimensions(),
            });
        }

        let (dst_w, dst_h) = expected;
        let grid = DispatchGrid::cover(dst_w, dst_h, self.cfg.group);
        if !src_w.is_multiple_of(2) || !src_h.is_multiple_of(2) {
            debug!(
                "odd source extent {src_w}x{src_h}, {:?} policy gives {dst_w}x{dst_h}",
                self.cfg.extent
            );
        }

        if dst_w == 0 || dst_h == 0 {
            debug!("source {src_w}x{src_h} has no destination texels; nothing dispatched");
            return Ok(DispatchReport {
                src: (src_w, src_h),
                dst: expected,
                grid,
                invocations: 0,
            });
        }

        debug!(
            "dispatch {src_w}x{src_h} -> {dst_w}x{dst_h}: {}x{} groups of {}x{}, blend={:?}, address={}, {:?}",
            grid.groups_x,
            grid.groups_y,
            grid.group.x,
            grid.group.y,
            self.cfg.blend,
            self.cfg.address,
            self.cfg.execution,
        );

        let stride = dst.stride();
        let band_len = stride * grid.group.y as usize;
        let bands = dst.raw_rows_mut();

        let invocations: usize = match self.cfg.execution {
            Execution::Parallel => bands
                .par_chunks_mut(band_len)
                .enumerate()
                .take(grid.groups_y)
                .map(|(gy, band)| self.run_band(src, &grid, expected, stride, gy, band))
                .sum(),
            Execution::Serial => bands
                .chunks_mut(band_len)
                .enumerate()
                .take(grid.groups_y)
                .map(|(gy, band)| self.run_band(src, &grid, expected, stride, gy, band))
                .sum(),
        };

        Ok(DispatchReport {
            src: (src_w, src_h),
            dst: expected,
            grid,
            invocations,
        })
    }

    /// Runs every group in group row `gy`. `band` starts at destination row
    /// `gy * group.y`.
    fn run_band(
        &self,
        src: &ImageView<'_, Rgba>,
        grid: &DispatchGrid,
        dst_extent: (usize, usize),
        stride: usize,
        gy: usize,
        band: &mut [Rgba],
    ) -> usize {
        let mut count = 0;
        for gx in 0..grid.groups_x {
            count += self.run_group(src, grid, dst_extent, stride, (gx, gy), band);
        }
        trace!("group row {gy}: {count} invocations");
        count
    }

    fn run_group(
        &self,
        src: &ImageView<'_, Rgba>,
        grid: &DispatchGrid,
        dst_extent: (usize, usize),
        stride: usize,
        group_id: (usize, usize),
        band: &mut [Rgba],
    ) -> usize {
        let (dst_w, dst_h) = dst_extent;
        let (gx, gy) = group_id;
        let group_w = grid.group.x as usize;
        let group_h = grid.group.y as usize;

        let mut count = 0;
        for local_y in 0..group_h {
            let j = gy * group_h + local_y;
            if j >= dst_h {
                break;
            }
            let row = &mut band[local_y * stride..];
            for local_x in 0..group_w {
                let i = gx * group_w + local_x;
                if i >= dst_w {
                    break;
                }
                row[i] = downsample_texel(src, (i, j), dst_extent, &self.cfg);
                count += 1;
            }
        }
        count
    }
}
