//! spanbitmap-test - Regression test framework for spanbitmap
//!
//! This crate provides the pieces shared by the `*_reg.rs` regression tests:
//!
//! - [`RegParams`]: accumulates comparisons and reports every failure at
//!   [`cleanup`](RegParams::cleanup) instead of stopping at the first one
//! - fixture builders for synthetic rasters (gradients, checkerboards,
//!   solid fills), so no image files are needed
//!
//! # Usage
//!
//! ```ignore
//! use spanbitmap_test::RegParams;
//!
//! let mut rp = RegParams::new("affine");
//! rp.compare_values(64.0, value as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_VERBOSE`: set to "1" or "true" to echo passing comparisons

mod error;
mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::{checkerboard, gradient_bgr24, gradient_gray8, solid, translucent_bgra};
pub use params::{RegParams, Verbosity};
