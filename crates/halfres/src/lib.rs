//! Umbrella crate for the `halfres` workspace.
//!
//! Re-exports the image primitives and the downsample kernel.

pub use hr_core::*;
pub use hr_kernel::*;
