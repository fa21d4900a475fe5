//! Regression test parameters and operations

use crate::error::TestError;
use spanbitmap_core::RasterView;

/// How much a regression run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Print failures only (default)
    #[default]
    Quiet,
    /// Also print every passing comparison
    Verbose,
}

impl Verbosity {
    /// Parse from the `REGTEST_VERBOSE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_VERBOSE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "1" | "true" | "yes" => Self::Verbose,
            _ => Self::Quiet,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index and every recorded
/// failure. Comparisons never panic; call [`cleanup`](Self::cleanup) at the
/// end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "affine")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Output verbosity
    pub verbosity: Verbosity,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "affine")
    pub fn new(test_name: &str) -> Self {
        let verbosity = Verbosity::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            verbosity,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, err: TestError) -> bool {
        let msg = format!("Failure in {}_reg: {}", self.test_name, err);
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    fn pass(&self, what: &str) -> bool {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("  ok {:02}: {}", self.index, what);
        }
        true
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            })
        } else {
            self.pass("values")
        }
    }

    /// Compare two rasters for exact equality of every pixel byte
    ///
    /// Padding bytes are ignored. Geometry and format must match.
    pub fn compare_raster(&mut self, a: &RasterView<'_>, b: &RasterView<'_>) -> bool {
        self.compare_raster_within(a, b, 0)
    }

    /// Compare two rasters allowing each byte to differ by `tolerance`
    pub fn compare_raster_within(
        &mut self,
        a: &RasterView<'_>,
        b: &RasterView<'_>,
        tolerance: u8,
    ) -> bool {
        self.index += 1;

        if a.width() != b.width() || a.height() != b.height() || a.format() != b.format() {
            let message = format!(
                "{}x{} {} vs {}x{} {}",
                a.width(),
                a.height(),
                a.format(),
                b.width(),
                b.height(),
                b.format()
            );
            return self.fail(TestError::RasterShape {
                index: self.index,
                message,
            });
        }

        let size = a.format().byte_size();
        for y in 0..a.height() {
            let row_a = a.row(y);
            let row_b = b.row(y);
            let diff = row_a
                .iter()
                .zip(row_b)
                .position(|(&p, &q)| p.abs_diff(q) > tolerance);
            if let Some(i) = diff {
                return self.fail(TestError::RasterMismatch {
                    index: self.index,
                    x: (i / size) as u32,
                    y,
                });
            }
        }

        self.pass("raster")
    }

    /// Compare two byte arrays
    pub fn compare_bytes(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;

        if expected != actual {
            let message = format!(
                "byte comparison: sizes {} vs {}, first difference at {:?}",
                expected.len(),
                actual.len(),
                expected.iter().zip(actual).position(|(a, b)| a != b)
            );
            self.fail(TestError::RasterShape {
                index: self.index,
                message,
            })
        } else {
            self.pass("bytes")
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanbitmap_core::PixelFormat;

    #[test]
    fn test_verbosity_from_env() {
        // env may be set by the caller; only check the result is valid
        let v = Verbosity::from_env();
        assert!(matches!(v, Verbosity::Quiet | Verbosity::Verbose));
    }

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_raster() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 2, 3, 6];
        let va = RasterView::from_continuous(2, 2, PixelFormat::GRAY8, &a).unwrap();
        let vb = RasterView::from_continuous(2, 2, PixelFormat::GRAY8, &b).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_raster(&va, &va));
        assert!(rp.compare_raster_within(&va, &vb, 2));
        assert!(!rp.compare_raster(&va, &vb));
        assert!(rp.failures()[0].contains("(1, 1)"));
    }

    #[test]
    fn test_compare_raster_shape() {
        let a = [0u8; 4];
        let va = RasterView::from_continuous(2, 2, PixelFormat::GRAY8, &a).unwrap();
        let vb = RasterView::from_continuous(4, 1, PixelFormat::GRAY8, &a).unwrap();
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_raster(&va, &vb));
    }
}
