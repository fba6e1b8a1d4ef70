//! Random boundary loads drawn at the start of every load stage.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Traction magnitudes held constant over one load stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPair {
    /// Traction normal to the top edge.
    pub tensile: f64,
    /// Traction tangential to the top edge.
    pub shear: f64,
}

impl LoadPair {
    /// Create a [`LoadPair`] with explicit magnitudes.
    #[must_use]
    pub const fn new(tensile: f64, shear: f64) -> Self {
        Self { tensile, shear }
    }
}

/// Mean and standard deviation of a normally distributed load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadDistribution {
    /// Mean magnitude.
    pub mean: f64,
    /// Standard deviation.
    pub std_dev: f64,
}

impl LoadDistribution {
    /// Create a [`LoadDistribution`].
    #[must_use]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Convert into a sampleable normal distribution.
    fn to_normal(self, which: &'static str) -> Result<Normal<f64>, ConfigError> {
        Normal::new(self.mean, self.std_dev).map_err(|error| ConfigError::InvalidDistribution {
            which,
            reason: error.to_string(),
        })
    }
}

/// Anything that can supply loads for a new stage.
pub trait LoadSource {
    /// Draw the (tensile, shear) pair for the stage that is starting.
    fn sample_loads(&mut self) -> LoadPair;
}

/// Draws tensile and shear tractions independently from normal distributions.
#[derive(Debug, Clone)]
pub struct NormalLoadSampler<R> {
    /// Tensile distribution.
    tensile: Normal<f64>,
    /// Shear distribution.
    shear: Normal<f64>,
    /// Random source shared by both draws.
    rng: R,
}

impl<R: Rng> NormalLoadSampler<R> {
    /// Create a sampler around an existing random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDistribution`] when a standard deviation is
    /// negative or not finite.
    pub fn with_rng(
        tensile: LoadDistribution,
        shear: LoadDistribution,
        rng: R,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            tensile: tensile.to_normal("tensile")?,
            shear: shear.to_normal("shear")?,
            rng,
        })
    }
}

impl NormalLoadSampler<StdRng> {
    /// Create a reproducible sampler.
    ///
    /// # Errors
    ///
    /// See [`NormalLoadSampler::with_rng`].
    ///
    /// # Examples
    /// ```
    /// use crackx::{LoadDistribution, LoadSource, NormalLoadSampler};
    ///
    /// let tensile = LoadDistribution::new(200.0, 50.0);
    /// let shear = LoadDistribution::new(100.0, 50.0);
    /// let mut a = NormalLoadSampler::seeded(tensile, shear, 7).unwrap();
    /// let mut b = NormalLoadSampler::seeded(tensile, shear, 7).unwrap();
    /// assert_eq!(a.sample_loads(), b.sample_loads());
    /// ```
    pub fn seeded(
        tensile: LoadDistribution,
        shear: LoadDistribution,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(tensile, shear, StdRng::seed_from_u64(seed))
    }

    /// Create a sampler seeded from operating system entropy.
    ///
    /// # Errors
    ///
    /// See [`NormalLoadSampler::with_rng`].
    pub fn from_entropy(
        tensile: LoadDistribution,
        shear: LoadDistribution,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(tensile, shear, StdRng::from_entropy())
    }
}

impl<R: Rng> LoadSource for NormalLoadSampler<R> {
    fn sample_loads(&mut self) -> LoadPair {
        let tensile = self.tensile.sample(&mut self.rng);
        let shear = self.shear.sample(&mut self.rng);
        LoadPair { tensile, shear }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_statistics_follow_distribution() {
        let mut sampler = NormalLoadSampler::seeded(
            LoadDistribution::new(200.0, 50.0),
            LoadDistribution::new(100.0, 50.0),
            2024,
        )
        .expect("valid distributions");
        let draws: Vec<LoadPair> = (0..20_000).map(|_| sampler.sample_loads()).collect();
        let n = draws.len() as f64;
        let tensile_mean = draws.iter().map(|p| p.tensile).sum::<f64>() / n;
        let shear_mean = draws.iter().map(|p| p.shear).sum::<f64>() / n;
        let tensile_sd = (draws
            .iter()
            .map(|p| (p.tensile - tensile_mean).powi(2))
            .sum::<f64>()
            / n)
            .sqrt();
        assert!((tensile_mean - 200.0).abs() < 2.0);
        assert!((shear_mean - 100.0).abs() < 2.0);
        assert!((tensile_sd - 50.0).abs() < 2.0);
    }

    #[test]
    fn negative_std_dev_is_rejected() {
        let error = NormalLoadSampler::seeded(
            LoadDistribution::new(200.0, -1.0),
            LoadDistribution::new(100.0, 50.0),
            1,
        )
        .expect_err("negative spread rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidDistribution {
                which: "tensile",
                ..
            }
        ));
    }
}
