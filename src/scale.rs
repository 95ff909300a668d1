//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color, size).
//! Based on the Grammar of Graphics [Wilkinson 2005]. Tick placement uses the
//! "nice numbers" heuristic [Heckbert 1990].

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        let finite = domain.0.is_finite() && domain.1.is_finite();
        if !finite || (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain(format!(
                "degenerate domain [{}, {}]",
                domain.0, domain.1
            )));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Same domain, new output range.
    #[must_use]
    pub fn with_range(self, range: (f32, f32)) -> Self {
        Self { range_min: range.0, range_max: range.1, ..self }
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Widen `(min, max)` by `fraction` of its span on each side.
///
/// A zero-width range is widened by one unit each side so it can be scaled.
#[must_use]
pub fn expand_range((min, max): (f32, f32), fraction: f32) -> (f32, f32) {
    if (max - min).abs() < f32::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * fraction;
    (min - pad, max + pad)
}

/// Tick positions at "nice" steps (1, 2, 2.5, 5 × 10^k) inside `[min, max]`.
#[must_use]
pub fn nice_breaks(min: f32, max: f32, target: usize) -> Vec<f32> {
    let step = nice_step(min, max, target);
    if step <= 0.0 || !step.is_finite() {
        return vec![min];
    }
    let step = f64::from(step);
    let first = (f64::from(min) / step).ceil();
    let last = (f64::from(max) / step + 1e-4).floor();
    let count = last - first;
    if !(0.0..=MAX_BREAKS).contains(&count) {
        return Vec::new();
    }
    let mut breaks: Vec<f32> = (0..=count as i64)
        .map(|i| {
            let v = ((first + i as f64) * step) as f32;
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect();
    // neighbouring ticks can round to one f32 far from zero
    breaks.dedup();
    breaks
}

/// Upper bound on the number of ticks [`nice_breaks`] will produce.
const MAX_BREAKS: f64 = 1000.0;

/// Step between [`nice_breaks`] ticks.
#[must_use]
pub fn nice_step(min: f32, max: f32, target: usize) -> f32 {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    let raw = span / target.max(1) as f32;
    let magnitude = 10f32.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice =
        [1.0, 2.0, 2.5, 5.0, 10.0].into_iter().find(|&n| n >= normalized - 1e-4).unwrap_or(10.0);
    nice * magnitude
}

/// How axis and legend numbers are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFormat {
    /// `12.5`
    #[default]
    Plain,
    /// `120,000`
    Comma,
    /// `$120,000`
    Dollar,
    /// `45%` (value 0.45)
    Percent,
}

impl LabelFormat {
    /// Format a value with a fixed number of decimals.
    #[must_use]
    pub fn format(self, value: f32, decimals: usize) -> String {
        match self {
            LabelFormat::Plain => format!("{value:.decimals$}"),
            LabelFormat::Comma => group_thousands(value, decimals),
            LabelFormat::Dollar => {
                let body = group_thousands(value.abs(), decimals);
                if value < 0.0 {
                    format!("-${body}")
                } else {
                    format!("${body}")
                }
            }
            LabelFormat::Percent => format!("{:.decimals$}%", value * 100.0),
        }
    }

    /// Format a set of evenly spaced breaks with just enough decimals to tell
    /// them apart.
    #[must_use]
    pub fn format_breaks(self, breaks: &[f32]) -> Vec<String> {
        let step = breaks.windows(2).map(|w| (w[1] - w[0]).abs()).fold(f32::INFINITY, f32::min);
        let step = if self == LabelFormat::Percent { step * 100.0 } else { step };
        let decimals = if step.is_finite() && step > 0.0 && step < 1.0 {
            ((-step.log10()).ceil() as usize).min(6)
        } else {
            0
        };
        let decimals = if step.is_finite() && (step * 10f32.powi(decimals as i32)).fract() > 1e-3 {
            decimals + 1
        } else {
            decimals
        };
        breaks.iter().map(|&b| self.format(b, decimals)).collect()
    }
}

fn group_thousands(value: f32, decimals: usize) -> String {
    let text = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).unwrap();
        assert!((scale.scale(50.0) - 250.0).abs() < 1e-5);
        assert!((scale.invert(250.0) - 50.0).abs() < 1e-5);
        assert_eq!(scale.domain(), (0.0, 100.0));
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (400.0, 0.0)).unwrap();
        assert!((scale.scale(10.0) - 0.0).abs() < 1e-5);
        let moved = scale.with_range((100.0, 0.0));
        assert!((moved.scale(5.0) - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_linear_scale_degenerate() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((0.0, f32::NAN), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_expand_range() {
        assert_eq!(expand_range((0.0, 10.0), 0.05), (-0.5, 10.5));
        assert_eq!(expand_range((3.0, 3.0), 0.05), (2.0, 4.0));
    }

    #[test]
    fn test_nice_breaks() {
        assert_eq!(nice_breaks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_breaks(57_800.0, 231_545.0, 5), vec![100_000.0, 150_000.0, 200_000.0]);

        let fractional = nice_breaks(-1.0, 1.0, 4);
        assert_eq!(fractional.len(), 5);
        assert!((fractional[1] + 0.5).abs() < 1e-6);
        assert!(fractional[2] == 0.0);
    }

    #[test]
    fn test_nice_breaks_degenerate() {
        assert_eq!(nice_breaks(5.0, 5.0, 5), vec![5.0]);
    }

    #[test]
    fn test_nice_breaks_large_offset_small_span() {
        // five minutes of unix timestamps: min / step is beyond f32 integer precision
        let breaks = nice_breaks(1.7e9 - 15.0, 1.7e9 + 315.0, 5);
        assert!(!breaks.is_empty() && breaks.len() <= 10, "{breaks:?}");
        assert!(breaks.windows(2).all(|w| w[0] < w[1]));
        assert!(breaks.iter().all(|b| (*b - 1.7e9).abs() <= 400.0));
    }

    #[test]
    fn test_label_formats() {
        assert_eq!(LabelFormat::Plain.format(12.5, 1), "12.5");
        assert_eq!(LabelFormat::Comma.format(1_234_567.0, 0), "1,234,567");
        assert_eq!(LabelFormat::Dollar.format(125_000.0, 0), "$125,000");
        assert_eq!(LabelFormat::Dollar.format(-50.0, 0), "-$50");
        assert_eq!(LabelFormat::Percent.format(0.45, 0), "45%");
    }

    #[test]
    fn test_format_breaks_decimals() {
        assert_eq!(LabelFormat::Plain.format_breaks(&[0.0, 0.5, 1.0]), vec!["0.0", "0.5", "1.0"]);
        assert_eq!(
            LabelFormat::Plain.format_breaks(&[0.0, 0.25, 0.5]),
            vec!["0.00", "0.25", "0.50"]
        );
        assert_eq!(LabelFormat::Comma.format_breaks(&[0.0, 50_000.0]), vec!["0", "50,000"]);
        assert_eq!(LabelFormat::Percent.format_breaks(&[0.0, 0.25]), vec!["0%", "25%"]);
    }
}
