//! GA-based project timing.
//!
//! Searches for project start times that minimize the time-weighted
//! expert shortage under a shared expert pool.
//!
//! # Encoding
//!
//! A [`Member`] is one start time per project. The timeline is split into
//! intervals of constant activity, each interval is staffed by max-flow,
//! and the member's fitness is `Σ length × shortage`.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation point counts
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - De Jong & Spears (1992), "A formal analysis of the role of multi-point crossover"

mod config;
mod member;
pub mod operators;
mod population;
mod problem;
mod runner;

pub use config::{GaConfig, InitStrategy};
pub use member::{n_point_crossover, n_point_mutation, Member};
pub use population::Population;
pub use problem::{FitnessRecord, IntervalSolution, StaffingProblem, INFEASIBLE_FITNESS};
pub use runner::{GaResult, GenerationStats, GeneticOptimizer, OptimizerState, Solution, Termination};
