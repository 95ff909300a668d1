//! Statistical transformations for Grammar of Graphics.
//!
//! Transforms data before visualization: equal-width binning for histograms
//! and polynomial least-squares fits for smoothers.

/// Smoothing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothMethod {
    /// Linear model `y ~ poly(x, degree)`.
    Lm {
        /// Polynomial degree (1 = straight line).
        degree: usize,
    },
}

impl Default for SmoothMethod {
    fn default() -> Self {
        SmoothMethod::Lm { degree: 1 }
    }
}

/// Statistical transformation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    /// No transformation (identity).
    Identity,
    /// Bin continuous data.
    Bin {
        /// Number of bins.
        bins: usize,
    },
    /// Fit a smooth curve.
    Smooth {
        /// Fitting method.
        method: SmoothMethod,
    },
}

/// Points at which a fitted curve is evaluated.
pub const SMOOTH_POINTS: usize = 80;

// ============================================================================
// Binning
// ============================================================================

/// Equal-width bin boundaries over a data range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bins {
    /// Left edge of the first bin.
    pub start: f32,
    /// Width of every bin.
    pub width: f32,
    /// Number of bins.
    pub count: usize,
}

impl Bins {
    /// Bins covering `(min, max)` with the first bin centered on `min` and
    /// the last on `max`.
    ///
    /// A single bin spans the whole range; a zero-width range gets bins of
    /// width 1.
    #[must_use]
    pub fn centered((min, max): (f32, f32), count: usize) -> Self {
        let count = count.max(1);
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return Self { start: min - 0.5, width: 1.0, count };
        }
        if count == 1 {
            return Self { start: min, width: span, count };
        }
        let width = span / (count - 1) as f32;
        Self { start: min - width / 2.0, width, count }
    }

    /// Index of the bin containing `value`; values on an inner edge go right.
    #[must_use]
    pub fn index(&self, value: f32) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        let raw = ((value - self.start) / self.width).floor();
        if raw < 0.0 {
            return (value >= self.start - self.width * 1e-4).then_some(0);
        }
        let idx = raw as usize;
        if idx < self.count {
            Some(idx)
        } else if value <= self.edges(self.count - 1).1 + self.width * 1e-4 {
            Some(self.count - 1)
        } else {
            None
        }
    }

    /// `(left, right)` edges of bin `i`.
    #[must_use]
    pub fn edges(&self, i: usize) -> (f32, f32) {
        let left = self.start + i as f32 * self.width;
        (left, left + self.width)
    }

    /// Count `values` per bin; non-finite and out-of-range values are ignored.
    #[must_use]
    pub fn counts(&self, values: impl IntoIterator<Item = f32>) -> Vec<u32> {
        let mut counts = vec![0u32; self.count];
        for v in values {
            if let Some(i) = self.index(v) {
                counts[i] += 1;
            }
        }
        counts
    }
}

// ============================================================================
// Polynomial least squares
// ============================================================================

/// Fitted polynomial in a centered and scaled predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolyFit {
    /// Least-squares fit of `ys` on powers of `xs` up to `degree`.
    ///
    /// Returns `None` when there are fewer than `degree + 1` distinct x
    /// values or the normal equations are singular.
    #[must_use]
    pub fn fit(xs: &[f32], ys: &[f32], degree: usize) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (f64::from(x), f64::from(y)))
            .collect();
        if distinct_count(pairs.iter().map(|p| p.0)) < degree + 1 {
            return None;
        }

        let n = pairs.len() as f64;
        let center = pairs.iter().map(|p| p.0).sum::<f64>() / n;
        let scale = pairs.iter().map(|p| (p.0 - center).abs()).fold(0.0, f64::max);
        let scale = if scale > 0.0 { scale } else { 1.0 };

        let terms = degree + 1;
        let mut normal = vec![vec![0.0f64; terms + 1]; terms];
        for &(x, y) in &pairs {
            let u = (x - center) / scale;
            let powers: Vec<f64> = (0..terms)
                .scan(1.0, |acc, _| {
                    let p = *acc;
                    *acc *= u;
                    Some(p)
                })
                .collect();
            for i in 0..terms {
                for j in 0..terms {
                    normal[i][j] += powers[i] * powers[j];
                }
                normal[i][terms] += powers[i] * y;
            }
        }

        let coefficients = solve(normal)?;
        Some(Self { coefficients, center, scale })
    }

    /// Evaluate the polynomial at `x`.
    #[must_use]
    pub fn predict(&self, x: f32) -> f32 {
        let u = (f64::from(x) - self.center) / self.scale;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * u + c) as f32
    }

    /// `points` evenly spaced `(x, ŷ)` pairs from `lo` to `hi` inclusive.
    #[must_use]
    pub fn curve(&self, lo: f32, hi: f32, points: usize) -> Vec<(f32, f32)> {
        let points = points.max(2);
        (0..points)
            .map(|i| {
                let x = lo + (hi - lo) * i as f32 / (points - 1) as f32;
                (x, self.predict(x))
            })
            .collect()
    }
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Gauss-Jordan elimination with partial pivoting on an augmented matrix.
fn solve(mut m: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let n = m.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        let lead = m[col][col];
        for v in &mut m[col] {
            *v /= lead;
        }
        for row in 0..n {
            if row != col {
                let factor = m[row][col];
                if factor != 0.0 {
                    for k in col..=n {
                        let delta = factor * m[col][k];
                        m[row][k] -= delta;
                    }
                }
            }
        }
    }
    Some(m.into_iter().map(|row| row[n]).collect())
}
