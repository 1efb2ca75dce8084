//! Foundational primitives for half-resolution image processing.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`, so
//! views can borrow padded buffers and subregions.
//!
//! ## Address Modes
//! Texel reads outside the image are resolved explicitly by [`AddressMode`]:
//! clamp-to-edge, wrap (modulo), or a fixed border color. Nothing is left to
//! an implementation-defined default.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to texel centers. Bilinear sampling uses the
//! floor-based 2x2 neighborhood.

mod address;
mod color;
mod error;
mod image;
mod sample;

pub use address::{AddressMode, map_index};
pub use color::Rgba;
pub use error::Error;
pub use image::{Image, ImageView, ImageViewMut};
pub use sample::{Quad, blend_quad, fetch, fetch_quad, sample_bilinear};
