use rand::Rng;

// Uniforms are kept inside the open interval (0, 1).
const MIN_UNIFORM: f64 = f64::MIN_POSITIVE;
// Largest f64 strictly below 1.
const MAX_UNIFORM: f64 = 1. - f64::EPSILON / 2.;

pub trait MutDistribution<T> {
    fn mut_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> T;
}

/// Inverse-CDF exponential draw: `-ln(1 - u) / rate` for one uniform `u`.
/// `u` is clamped into (0, 1) so the result is finite and strictly positive
/// for any finite positive rate.
pub fn exponential_sample<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> f64 {
    debug_assert!(rate > 0. && rate.is_finite(), "exponential rate must be finite and positive");
    let u: f64 = rng.gen();
    // ln_1p keeps precision for tiny u, where 1 - u would round to 1
    -(-u.clamp(MIN_UNIFORM, MAX_UNIFORM)).ln_1p() / rate
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Self {
        Exponential { rate }
    }

    pub fn from_mean(mean: f64) -> Self {
        Exponential { rate: 1. / mean }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl MutDistribution<f64> for Exponential {
    fn mut_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        exponential_sample(rng, self.rate)
    }
}

pub struct ConstantDistribution<T> where T: Copy {
    value: T
}

impl<T> MutDistribution<T> for ConstantDistribution<T> where T: Copy {
    fn mut_sample<R: Rng + ?Sized>(&mut self, _: &mut R) -> T {
        self.value
    }
}

impl<T> ConstantDistribution<T> where T: Copy {
    pub fn new(value: T) -> Self { ConstantDistribution { value } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{replication_rng, ScriptedRng};

    #[test]
    fn inverse_cdf_matches_closed_form() {
        let mut rng = ScriptedRng::new(&[0.5, 0.75]);
        assert!((exponential_sample(&mut rng, 2.) - 2f64.ln() / 2.).abs() < 1e-15);
        assert!((exponential_sample(&mut rng, 1.) - 4f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn zero_uniform_still_gives_a_positive_sample() {
        let mut rng = ScriptedRng::new(&[0.]);
        let x = exponential_sample(&mut rng, 2.);
        assert!(x > 0.);
        assert!(x.is_sign_positive());
        assert!(x.is_finite());
    }

    #[test]
    fn uniform_at_the_top_stays_finite() {
        let mut rng = ScriptedRng::new(&[1.]);
        let x = exponential_sample(&mut rng, 0.5);
        assert!(x.is_finite());
        assert!(x > 0.);
    }

    #[test]
    fn sample_mean_tracks_distribution_mean() {
        let mut rng = replication_rng(11, 0);
        let mut exp = Exponential::from_mean(2.);
        let n = 200_000;
        let mean = (0..n).map(|_| exp.mut_sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 2.).abs() < 0.05, "mean was {}", mean);
    }

    #[test]
    fn constant_ignores_the_stream() {
        let mut rng = ScriptedRng::new(&[0.5]);
        let mut c = ConstantDistribution::new(3.5);
        assert_eq!(c.mut_sample(&mut rng), 3.5);
        assert_eq!(rng.consumed(), 0);
    }
}
