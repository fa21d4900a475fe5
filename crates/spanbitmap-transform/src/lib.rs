//! spanbitmap-transform - Affine transform and resize engines
//!
//! This crate provides the raster engines that run over
//! [`spanbitmap_core`] views:
//!
//! - Affine transforms with on-the-fly format conversion, nearest or
//!   bilinear sampling and source-over compositing
//! - Stretching a source onto a destination rectangle
//! - Separable bilinear resizing between arbitrary sizes and formats
//! - Aspect-preserving fit helpers

pub mod affine;
mod error;
pub mod resize;
pub mod sampler;
pub mod stepper;
pub mod transfer;
pub mod transform;

pub use affine::{AffineTransform2D, Point};
pub use error::{TransformError, TransformResult};
pub use resize::{
    ResizeScratch, SamplePair, build_axis_table, fit_dimensions, resize, resize_to_fit,
    resize_with_scratch,
};
pub use sampler::QuantizedSampler;
pub use stepper::{FixedPointRowStepper, StepSample};
pub use transfer::TransferStrategy;
pub use transform::{
    ClipRect, SampleFilter, TransformOptions, affine_transform, clip_rect, draw_scaled,
    transform_with_options,
};
