//! Shared numeric helpers over slices of present values.

use std::cmp::Ordering;

/// Percentage `part / whole * 100`, or 0 when `whole` is 0.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Total order for present (non-NaN) values.
pub(crate) fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Sorted copy of `values`.
pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(cmp_f64);
    out
}

/// Arithmetic mean. `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator). `None` below two values.
pub(crate) fn sample_variance(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Percentile of sorted data by linear interpolation between order
/// statistics, at position `(n - 1) * q` for `q` in `[0, 1]`.
///
/// Panics on an empty slice; callers check for present values first.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;

    // Rounding must not carry the result past its neighbours.
    (sorted[lo] + frac * (sorted[hi] - sorted[lo]))
        .max(sorted[lo])
        .min(sorted[hi])
}

/// Population central moments m2, m3, m4 about `mean`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Moments {
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
}

impl Moments {
    pub(crate) fn about(values: &[f64], mean: f64) -> Self {
        let n = values.len() as f64;
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for v in values {
            let d = v - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        Self {
            m2: m2 / n,
            m3: m3 / n,
            m4: m4 / n,
        }
    }

    /// Biased Fisher-Pearson skewness `m3 / m2^1.5`. `None` at zero variance.
    pub(crate) fn skewness(&self) -> Option<f64> {
        if self.m2 <= 0.0 {
            return None;
        }
        Some(self.m3 / self.m2.powf(1.5)).filter(|s| s.is_finite())
    }

    /// Excess kurtosis `m4 / m2^2 - 3`. `None` at zero variance.
    pub(crate) fn excess_kurtosis(&self) -> Option<f64> {
        if self.m2 <= 0.0 {
            return None;
        }
        Some(self.m4 / (self.m2 * self.m2) - 3.0).filter(|k| k.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        assert!((percentile_sorted(&data, 0.25) - 2.25).abs() < 1e-12);
        assert!((percentile_sorted(&data, 0.75) - 4.75).abs() < 1e-12);
        assert!((percentile_sorted(&data, 0.5) - 3.5).abs() < 1e-12);
        assert_eq!(percentile_sorted(&data, 0.0), 1.0);
        assert_eq!(percentile_sorted(&data, 1.0), 100.0);
        assert_eq!(percentile_sorted(&[4.0], 0.9), 4.0);
    }

    #[test]
    fn test_sample_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&data).unwrap();
        assert_eq!(m, 5.0);
        assert!((sample_variance(&data, m).unwrap() - 32.0 / 7.0).abs() < 1e-12);
        assert!(sample_variance(&[1.0], 1.0).is_none());
    }

    #[test]
    fn test_moments_symmetric_data() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let moments = Moments::about(&data, 3.0);
        assert!(moments.skewness().unwrap().abs() < 1e-12);
        // Discrete uniform on 5 points: m2 = 2, m4 = 6.8, excess = 1.7 - 3.
        assert!((moments.excess_kurtosis().unwrap() + 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_moments_constant_data() {
        let moments = Moments::about(&[7.0, 7.0, 7.0], 7.0);
        assert!(moments.skewness().is_none());
        assert!(moments.excess_kurtosis().is_none());
    }
}
