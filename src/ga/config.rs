//! GA run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Parameters of a timetabling GA run.
///
/// # Example
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_max_generations(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Chromosomes per generation. Must be even and at least 2; the top
    /// half survives as parents.
    pub population_size: usize,
    /// Upper bound on evaluated generations.
    pub max_generations: usize,
    /// Per-gene probability of drawing a fresh slot after crossover.
    pub mutation_rate: f64,
    /// Per-gene probability of inheriting from the first parent.
    pub crossover_bias: f64,
    /// Evaluate each generation on the rayon thread pool.
    pub parallel: bool,
    /// Seed for the run's RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            max_generations: 100,
            mutation_rate: 0.1,
            crossover_bias: 0.5,
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover bias toward the first parent.
    pub fn with_crossover_bias(mut self, bias: f64) -> Self {
        self.crossover_bias = bias;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of parents kept by truncation selection.
    #[inline]
    pub fn parent_count(&self) -> usize {
        self.population_size / 2
    }

    /// Checks parameter ranges.
    ///
    /// A zero generation budget passes here; the runner reports it as a
    /// scheduling failure because nothing gets evaluated.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(TimetableError::config(format!(
                "population_size must be an even number >= 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TimetableError::config(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_bias) {
            return Err(TimetableError::config(format!(
                "crossover_bias must be within [0, 1], got {}",
                self.crossover_bias
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.max_generations, 100);
        assert_eq!(config.mutation_rate, 0.1);
        assert_eq!(config.parent_count(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_odd_or_tiny_population_rejected() {
        for size in [0, 1, 3, 21] {
            let config = GaConfig::default().with_population_size(size);
            assert!(matches!(
                config.validate(),
                Err(TimetableError::InvalidConfiguration(_))
            ));
        }
        assert!(GaConfig::default().with_population_size(2).validate().is_ok());
    }

    #[test]
    fn test_rates_out_of_range_rejected() {
        assert!(GaConfig::default().with_mutation_rate(1.5).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(-0.1).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(f64::NAN).validate().is_err());
        assert!(GaConfig::default().with_crossover_bias(2.0).validate().is_err());
    }

    #[test]
    fn test_zero_generations_passes_validation() {
        assert!(GaConfig::default().with_max_generations(0).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GaConfig =
            serde_json::from_str(r#"{"population_size": 30, "seed": 9}"#).unwrap();
        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_generations, 100);
        assert_eq!(config.seed, Some(9));
    }
}
