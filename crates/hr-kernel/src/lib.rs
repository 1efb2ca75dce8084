//! Half-resolution 2x2 downsample kernel.
//!
//! Dispatch model:
//! - One invocation per destination texel; invocations are grouped into
//!   fixed-size thread groups (4x4 by default).
//! - Invocation `(i, j)` reads the source block `(2i, 2j)..=(2i + 1, 2j + 1)`
//!   and writes destination `(i, j)` once. No two invocations share an output.
//! - Group rows run as independent rayon tasks, or serially on request.
//!
//! Blend:
//! - [`BlendStrategy::Box`] (default) blends each row pair at 0.5, then the two
//!   rows at 0.5: the plain mean of the four texels.
//! - [`BlendStrategy::Bilinear`] uses the fractional offsets of the
//!   texel-center mapping instead of 0.5.
//! - Output alpha is always 1.0.
//!
//! Odd sizes:
//! - [`ExtentPolicy::Floor`] (default) gives `(w / 2, h / 2)` and drops the odd
//!   last column/row. A source one texel wide or tall produces no output.
//! - [`ExtentPolicy::Ceil`] keeps it; reads past the edge go through the
//!   configured [`hr_core::AddressMode`].

mod config;
mod dispatch;
mod kernel;

pub use config::{BlendStrategy, DownsampleConfig, Execution, ExtentPolicy};
pub use dispatch::{DispatchGrid, DispatchReport, DownsampleKernel, GroupSize, destination_extent};
pub use kernel::{BOX_WEIGHT, Footprint, blend_box, downsample_texel};
