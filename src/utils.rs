//! Numeric helpers shared across the pressure and learning modules.

use rand::Rng;

/// Guard value for divisions in entropy/softmax normalization.
pub const EPSILON: f64 = 1e-10;

/// Calculate Shannon entropy from a probability distribution.
///
/// `H = -sum(p * ln(p))` over entries with `p > 0`.
pub fn shannon_entropy<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Entropy of a weight vector normalized to the probability simplex, divided
/// by the maximum entropy for that many entries.
///
/// Returns 0.0 when the weights cannot be normalized (zero or non-finite
/// total) or when a single entry makes the maximum entropy zero.
pub fn normalized_entropy(weights: &[f64]) -> f64 {
    if weights.len() < 2 {
        return 0.0;
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return 0.0;
    }
    let entropy = shannon_entropy(weights.iter().map(|&w| w / total));
    let max_entropy = (weights.len() as f64).ln();
    entropy / (max_entropy + EPSILON)
}

/// Temperature softmax over a fixed-size score array.
///
/// Scores are shifted by their maximum before exponentiation to avoid
/// overflow; the denominator carries an epsilon so an all-`-inf` pathological
/// input cannot divide by zero.
pub fn softmax<const N: usize>(scores: &[f64; N], temperature: f64) -> [f64; N] {
    let t = temperature.max(EPSILON);
    let max_score = scores.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let mut out = [0.0; N];
    let mut total = 0.0;
    for (slot, &score) in out.iter_mut().zip(scores.iter()) {
        let e = ((score - max_score) / t).exp();
        *slot = e;
        total += e;
    }
    for slot in out.iter_mut() {
        *slot /= total + EPSILON;
    }
    out
}

/// Draw an index from a categorical distribution.
///
/// Falls back to the last index if floating error leaves the threshold
/// uncrossed, and to uniform sampling if the total mass is not positive.
pub fn sample_categorical<R: Rng + ?Sized>(rng: &mut R, probabilities: &[f64]) -> usize {
    debug_assert!(!probabilities.is_empty());
    let total: f64 = probabilities.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..probabilities.len());
    }
    let mut threshold = rng.random::<f64>() * total;
    for (i, &p) in probabilities.iter().enumerate() {
        if threshold < p {
            return i;
        }
        threshold -= p;
    }
    probabilities.len() - 1
}

/// Mean of a slice; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_shannon_entropy_uniform() {
        let entropy = shannon_entropy(vec![0.5, 0.5]);
        assert!((entropy - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[test]
    fn test_shannon_entropy_deterministic() {
        let entropy = shannon_entropy(vec![1.0, 0.0, 0.0]);
        assert!(entropy.abs() < 1e-12);
    }

    #[test]
    fn test_normalized_entropy_bounds() {
        assert!(normalized_entropy(&[1.0, 1.0, 1.0]) > 0.99);
        assert!(normalized_entropy(&[1.0, 0.0, 0.0]) < 0.01);
        assert_eq!(normalized_entropy(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0], 1.0);
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_sharpens_with_low_temperature() {
        let cold = softmax(&[1.0, 2.0], 0.1);
        let hot = softmax(&[1.0, 2.0], 5.0);
        assert!(cold[1] > hot[1]);
    }

    #[test]
    fn test_sample_categorical_deterministic_with_seed() {
        let probs = [0.2, 0.5, 0.3];
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                sample_categorical(&mut a, &probs),
                sample_categorical(&mut b, &probs)
            );
        }
    }

    #[test]
    fn test_sample_categorical_zero_mass_uniform_fallback() {
        let probs = [0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(3);
        let idx = sample_categorical(&mut rng, &probs);
        assert!(idx < probs.len());
    }
}
