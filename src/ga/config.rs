//! GA run configuration.

use serde::{Deserialize, Serialize};

use super::operators::GeneticOperators;

/// How the initial population is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitStrategy {
    /// Every start satisfies `start + duration <= horizon`.
    #[default]
    ValidByConstruction,
    /// Every start drawn from `[0, horizon)`; overruns are purged later.
    Uniform,
}

/// Parameters of one optimizer run.
///
/// # Example
/// ```
/// use u_staffing::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_seed(42);
/// assert_eq!(config.population_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Target population size after selection.
    pub population_size: usize,
    /// The run stops once the generation counter exceeds this.
    pub max_generations: usize,
    /// Generations without best-ever improvement before stopping.
    pub stagnation_limit: usize,
    /// Fraction of the population paired for crossover.
    pub crossover_rate: f64,
    /// Fraction of the population mutated.
    pub mutation_rate: f64,
    /// Initial population strategy.
    pub initialization: InitStrategy,
    /// Crossover/mutation point counts.
    pub operators: GeneticOperators,
    /// Seed for the default RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Evaluate pending members on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            stagnation_limit: 100,
            crossover_rate: 0.67,
            mutation_rate: 0.34,
            initialization: InitStrategy::ValidByConstruction,
            operators: GeneticOperators::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl GaConfig {
    /// Sets the target population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation ceiling.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, generations: usize) -> Self {
        self.stagnation_limit = generations;
        self
    }

    /// Sets the crossover rate (clamped to `0.0..=1.0`).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate (clamped to `0.0..=1.0`).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the initialization strategy.
    pub fn with_initialization(mut self, strategy: InitStrategy) -> Self {
        self.initialization = strategy;
        self
    }

    /// Sets the genetic operators.
    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::operators::PointCount;

    #[test]
    fn test_defaults() {
        let c = GaConfig::default();
        assert_eq!(c.population_size, 100);
        assert_eq!(c.max_generations, 1000);
        assert_eq!(c.stagnation_limit, 100);
        assert_eq!(c.initialization, InitStrategy::ValidByConstruction);
        assert!(c.seed.is_none());
        assert!(!c.parallel);
    }

    #[test]
    fn test_builder_clamps_rates() {
        let c = GaConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.2);
        assert_eq!(c.crossover_rate, 1.0);
        assert_eq!(c.mutation_rate, 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: GaConfig = serde_json::from_str(
            r#"{ "population_size": 8, "seed": 7, "operators": { "crossover_points": { "Fixed": 2 }, "mutation_points": "Random" } }"#,
        )
        .unwrap();
        assert_eq!(c.population_size, 8);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.operators.crossover_points, PointCount::Fixed(2));
        assert_eq!(c.max_generations, 1000);
    }
}
