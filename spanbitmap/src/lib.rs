//! spanbitmap - Format-agnostic bitmap views for Rust
//!
//! # Overview
//!
//! spanbitmap copies pixels between caller-owned rasters:
//!
//! - Non-owning raster views over strided byte buffers
//! - Ten pixel formats with a conversion path between every pair
//! - Affine transforms with nearest or bilinear sampling and compositing
//! - Separable bilinear resizing
//!
//! # Example
//!
//! ```
//! use spanbitmap::{Bitmap, Gray8, PixelFormat};
//! use spanbitmap::transform::{AffineTransform2D, affine_transform};
//!
//! let src = Bitmap::from_fn(4, 4, |x, _| Gray8(x as u8 * 64));
//! let mut dst = Bitmap::new(8, 8, PixelFormat::GRAY8);
//! let placement = AffineTransform2D::scale(2.0, 2.0);
//! affine_transform(&src.as_view(), &mut dst.as_view_mut(), &placement, 1.0, false).unwrap();
//! assert_eq!(dst.pixel::<Gray8>(5, 0).unwrap(), Gray8(128));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use spanbitmap_core::*;

// Re-export the engines as a module to avoid name conflicts
pub use spanbitmap_transform as transform;
