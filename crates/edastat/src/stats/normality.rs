//! Shapiro-Wilk normality test and the bounded sampler that feeds it.
//!
//! The test follows Royston's 1995 algorithm (AS R94): coefficients from a
//! polynomial approximation to the expected normal order statistics, and a
//! normalising transformation of `1 - W` for the p-value. Normal quantiles
//! and tail probabilities come from `statrs`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use super::numeric::cmp_f64;

/// Ranges narrower than this are treated as constant data.
const SMALL: f64 = 1e-19;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Outcome of a normality test on a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalityTest {
    /// Shapiro-Wilk W statistic in `(0, 1]`.
    pub statistic: f64,
    pub p_value: f64,
    /// Number of values the test ran on.
    pub sample_size: usize,
    /// Whether the values were a subset of the column's present values.
    pub sampled: bool,
}

/// Why the normality test could not produce a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalityFailure {
    #[error("need at least 3 values, got {0}")]
    TooFewValues(usize),
    #[error("values have zero range")]
    ZeroRange,
    #[error("test statistic is not finite")]
    NonFinite,
}

/// Shapiro-Wilk test. Returns `(W, p_value)`. Input order does not matter.
pub fn shapiro_wilk(values: &[f64]) -> Result<(f64, f64), NormalityFailure> {
    let n = values.len();
    if n < 3 {
        return Err(NormalityFailure::TooFewValues(n));
    }

    let mut x = values.to_vec();
    x.sort_by(cmp_f64);

    let range = x[n - 1] - x[0];
    if !(range >= SMALL) {
        return Err(NormalityFailure::ZeroRange);
    }

    // Scale by the range so large magnitudes do not lose precision.
    for v in &mut x {
        *v /= range;
    }

    let a = coefficients(n);
    let mean = x.iter().sum::<f64>() / n as f64;
    let ssq: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();

    let w = numerator * numerator / ssq;
    if !w.is_finite() {
        return Err(NormalityFailure::NonFinite);
    }
    let w = w.min(1.0);

    let p = p_value(w, n);
    if !p.is_finite() {
        return Err(NormalityFailure::NonFinite);
    }

    Ok((w, p.clamp(0.0, 1.0)))
}

/// Antisymmetric weights `a_1..a_{n/2}` (upper half is the negation).
fn coefficients(n: usize) -> Vec<f64> {
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let half = n / 2;
    let an = n as f64;
    let normal = Normal::standard();
    let m: Vec<f64> = (1..=half)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
        .collect();

    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();
    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a = vec![0.0; half];
    a[0] = a1;

    let (first, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        a[1] = a2;
        let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
            / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
            .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
        (1, fac)
    };

    for i in first..half {
        a[i] = -m[i] / fac;
    }

    a
}

fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        const SIX_OVER_PI: f64 = 1.909_859_317_102_744;
        const PI_OVER_THREE: f64 = 1.047_197_551_196_597_7;
        return (SIX_OVER_PI * (w.sqrt().asin() - PI_OVER_THREE)).max(0.0);
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }

    let an = n as f64;
    let y = w1.ln();
    let (y, m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        (-(gamma - y).ln(), poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (y, poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    Normal::standard().sf((y - m) / s)
}

/// Polynomial with coefficients in ascending order.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Uniform subset of at most `cap` values, drawn without replacement.
///
/// Returns a copy of `values` when it already fits. The draw depends only on
/// `seed`, so the same seed always selects the same positions.
pub(crate) fn draw_sample(values: &[f64], cap: usize, seed: u64) -> Vec<f64> {
    if values.len() <= cap {
        return values.to_vec();
    }

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut pool = values.to_vec();
    for i in 0..cap {
        let j = rng.usize(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(cap);
    pool
}

/// Seed for a column's sample: SHA-256 of its name and present-value count.
pub(crate) fn sample_seed(column: &str, population: usize) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(column.as_bytes());
    hasher.update((population as u64).to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_scores(n: usize) -> Vec<f64> {
        let normal = Normal::standard();
        (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.5) / n as f64))
            .collect()
    }

    #[test]
    fn test_matches_reference_values() {
        // Reference W and p from R's shapiro.test on the same heights.
        let heights = [
            148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0,
        ];
        let (w, p) = shapiro_wilk(&heights).unwrap();
        assert!((w - 0.78881).abs() < 1e-5, "W = {}", w);
        assert!((p - 0.006704).abs() < 1e-5, "p = {}", p);
    }

    #[test]
    fn test_three_equally_spaced_values() {
        let (w, p) = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!((w - 1.0).abs() < 1e-12);
        assert!((p - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_scores_look_normal() {
        let (w, p) = shapiro_wilk(&normal_scores(200)).unwrap();
        assert!(w > 0.99, "W = {}", w);
        assert!(p > 0.05, "p = {}", p);
    }

    #[test]
    fn test_skewed_data_rejected() {
        let data: Vec<f64> = (1..=100).map(|i| (i as f64 / 10.0).exp()).collect();
        let (w, p) = shapiro_wilk(&data).unwrap();
        assert!(w < 0.9, "W = {}", w);
        assert!(p < 0.05, "p = {}", p);
    }

    #[test]
    fn test_small_samples_give_probabilities() {
        for n in 4..=11 {
            let data: Vec<f64> = (0..n).map(|i| (i * i) as f64).collect();
            let (w, p) = shapiro_wilk(&data).unwrap();
            assert!(w > 0.0 && w <= 1.0, "n = {}, W = {}", n, w);
            assert!((0.0..=1.0).contains(&p), "n = {}, p = {}", n, p);
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let data = [3.1, 0.2, 5.5, 2.0, 9.4, 1.1, 4.8, 6.6];
        let mut reversed = data;
        reversed.reverse();
        assert_eq!(shapiro_wilk(&data).unwrap(), shapiro_wilk(&reversed).unwrap());
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(
            shapiro_wilk(&[1.0, 2.0, f64::INFINITY]),
            Err(NormalityFailure::NonFinite)
        );
        assert_eq!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(NormalityFailure::TooFewValues(2))
        );
        assert_eq!(
            shapiro_wilk(&[5.0, 5.0, 5.0, 5.0]),
            Err(NormalityFailure::ZeroRange)
        );
    }

    #[test]
    fn test_coefficients_have_unit_norm() {
        for n in [4, 5, 6, 20, 101] {
            let a = coefficients(n);
            let norm: f64 = 2.0 * a.iter().map(|v| v * v).sum::<f64>();
            assert!((norm - 1.0).abs() < 1e-9, "n = {}, norm = {}", n, norm);
        }
    }

    #[test]
    fn test_draw_sample_bounds_and_determinism() {
        let values: Vec<f64> = (0..10_000).map(f64::from).collect();

        let a = draw_sample(&values, 5000, 42);
        let b = draw_sample(&values, 5000, 42);
        assert_eq!(a.len(), 5000);
        assert_eq!(a, b);

        let mut unique = a.clone();
        unique.sort_by(cmp_f64);
        unique.dedup();
        assert_eq!(unique.len(), 5000, "sample must be drawn without replacement");

        assert_eq!(draw_sample(&values[..10], 5000, 42), values[..10].to_vec());
    }

    #[test]
    fn test_sample_seed_depends_on_identity() {
        assert_eq!(sample_seed("age", 10), sample_seed("age", 10));
        assert_ne!(sample_seed("age", 10), sample_seed("age", 11));
        assert_ne!(sample_seed("age", 10), sample_seed("weight", 10));
    }
}
