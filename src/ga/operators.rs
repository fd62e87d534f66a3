//! Configurable genetic operators for start-time vectors.
//!
//! Provides runtime-selectable cut/mutation point counts via
//! [`GeneticOperators`].
//!
//! # Usage
//!
//! ```
//! use u_staffing::ga::operators::{GeneticOperators, PointCount};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_points, PointCount::Random);
//! assert_eq!(ops.mutation_points, PointCount::Random);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::member::{n_point_crossover, n_point_mutation, Member};

/// How many points an operator touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointCount {
    /// Uniform over the legal range, drawn per application.
    #[default]
    Random,
    /// Fixed count, clamped to the legal range.
    Fixed(usize),
}

impl PointCount {
    /// Resolves a concrete count in `[1, max]`. Returns 0 when `max == 0`.
    fn resolve<R: Rng>(self, max: usize, rng: &mut R) -> usize {
        if max == 0 {
            return 0;
        }
        match self {
            PointCount::Random => rng.random_range(1..=max),
            PointCount::Fixed(n) => n.clamp(1, max),
        }
    }
}

/// Runtime-selectable genetic operators for the staffing GA.
///
/// # Example
///
/// ```
/// use u_staffing::ga::operators::{GeneticOperators, PointCount};
///
/// let ops = GeneticOperators {
///     crossover_points: PointCount::Fixed(2),
///     mutation_points: PointCount::Fixed(1),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneticOperators {
    /// Cut points per crossover (legal range `1..project_count`).
    pub crossover_points: PointCount,
    /// Genes per mutation (legal range `1..=project_count`).
    pub mutation_points: PointCount,
}

impl GeneticOperators {
    /// Performs n-point crossover with the configured cut count.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Member,
        p2: &Member,
        rng: &mut R,
    ) -> (Member, Member) {
        let n = self
            .crossover_points
            .resolve(p1.len().saturating_sub(1), rng);
        n_point_crossover(p1, p2, n, rng)
    }

    /// Performs n-point mutation with the configured gene count.
    pub fn mutate<R: Rng>(&self, member: &Member, horizon: u32, rng: &mut R) -> Member {
        let n = self.mutation_points.resolve(member.len(), rng);
        n_point_mutation(member, n, horizon, rng)
    }
}
