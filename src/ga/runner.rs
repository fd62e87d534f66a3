//! Generational optimizer for project start times.
//!
//! # Generation loop
//!
//! ```text
//! Initialized ──> Evaluating ──> Converged | Stagnated | GenerationLimitReached
//!                   ^    │
//!                   │    v
//!                  Evolving ──> Extinct
//! ```
//!
//! `Evaluating` scores pending members, updates the best-ever solution and
//! checks the stop conditions in priority order: perfect coverage, then
//! stagnation, then the generation ceiling. `Evolving` purges infeasible
//! members (stopping as `Extinct` if none remain), trims the population by
//! roulette selection, and adds crossover and mutation offspring.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::GaConfig;
use super::member::Member;
use super::population::Population;
use super::problem::{FitnessRecord, StaffingProblem};
use crate::models::SchedulingInstance;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A member with zero shortage was found.
    Converged,
    /// The best-ever shortage did not improve for `stagnation_limit` generations.
    Stagnated,
    /// The generation counter exceeded `max_generations`.
    GenerationLimitReached,
    /// No feasible member survived the purge.
    Extinct,
}

/// Optimizer state between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    /// Initial population not yet drawn.
    Initialized,
    /// Scoring the current generation.
    Evaluating,
    /// Building the next generation.
    Evolving,
    /// Run finished.
    Terminated(Termination),
}

/// Best member found and its evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Start time per project.
    pub member: Member,
    /// Per-interval assignments and total shortage.
    pub record: FitnessRecord,
}

impl Solution {
    /// Time-weighted shortage. Solutions are always feasible.
    pub fn total_shortage(&self) -> u64 {
        self.record.total_shortage.unwrap_or_default()
    }
}

/// Snapshot of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation counter, starting at 1.
    pub generation: usize,
    /// Members in the population after evaluation.
    pub population: usize,
    /// Members newly evaluated this generation.
    pub evaluated: usize,
    /// Lowest shortage in this generation, if any member is feasible.
    pub generation_best: Option<u64>,
    /// Lowest shortage seen so far.
    pub best_ever: Option<u64>,
    /// Consecutive generations without best-ever improvement.
    pub stagnation: usize,
}

/// Outcome of an optimizer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaResult {
    /// Best solution found; `None` if no feasible member was ever seen.
    pub best: Option<Solution>,
    /// Stop reason.
    pub termination: Termination,
    /// Number of generations evaluated.
    pub generations: usize,
    /// Per-generation statistics.
    pub history: Vec<GenerationStats>,
}

impl GaResult {
    /// Best shortage, if a solution was found.
    pub fn best_shortage(&self) -> Option<u64> {
        self.best.as_ref().map(Solution::total_shortage)
    }

    /// Whether every demand slot is covered at every instant.
    pub fn is_optimal(&self) -> bool {
        self.best_shortage() == Some(0)
    }
}

/// Genetic optimizer over a scheduling instance.
///
/// # Example
/// ```
/// use u_staffing::ga::{GaConfig, GeneticOptimizer, Termination};
/// use u_staffing::models::SchedulingInstance;
///
/// let instance = SchedulingInstance::new(1, 4)
///     .with_expert(vec![1])
///     .with_project(vec![1], 2)
///     .with_project(vec![1], 2);
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(200)
///     .with_seed(7);
///
/// let result = GeneticOptimizer::new(&instance, config).solve();
/// assert_eq!(result.termination, Termination::Converged);
/// assert_eq!(result.best_shortage(), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOptimizer<'a> {
    problem: StaffingProblem<'a>,
    config: GaConfig,
}

impl<'a> GeneticOptimizer<'a> {
    /// Creates an optimizer for a validated instance.
    pub fn new(instance: &'a SchedulingInstance, config: GaConfig) -> Self {
        Self {
            problem: StaffingProblem::new(instance),
            config,
        }
    }

    /// Run configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Problem definition.
    pub fn problem(&self) -> &StaffingProblem<'a> {
        &self.problem
    }

    /// Runs with an RNG seeded from `config.seed`, or from the OS if unset.
    pub fn solve(&self) -> GaResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run(&mut rng)
    }

    /// Runs the generation loop with the given RNG.
    pub fn run<R: Rng>(&self, rng: &mut R) -> GaResult {
        let config = &self.config;

        let mut population = Population::new();
        let mut best: Option<Solution> = None;
        let mut stagnation = 0usize;
        let mut generation = 1usize;
        let mut history = Vec::new();
        let mut state = OptimizerState::Initialized;

        let termination = loop {
            state = match state {
                OptimizerState::Initialized => {
                    for _ in 0..config.population_size {
                        population.insert(self.problem.create_member(config.initialization, rng));
                    }
                    OptimizerState::Evaluating
                }

                OptimizerState::Evaluating => {
                    let evaluated = population.evaluate_pending(&self.problem, config.parallel);

                    let generation_best = population.generation_best();
                    let generation_shortage = generation_best.and_then(|(_, r)| r.total_shortage);
                    if let Some((member, record)) = generation_best {
                        if improves(best.as_ref(), record) {
                            best = Some(Solution {
                                member: member.clone(),
                                record: record.clone(),
                            });
                            stagnation = 0;
                        } else {
                            stagnation += 1;
                        }
                    }

                    let best_ever = best.as_ref().map(Solution::total_shortage);
                    debug!(
                        generation,
                        population = population.len(),
                        evaluated,
                        generation_best = ?generation_shortage,
                        best_ever = ?best_ever,
                        stagnation,
                        "Generation evaluated"
                    );
                    history.push(GenerationStats {
                        generation,
                        population: population.len(),
                        evaluated,
                        generation_best: generation_shortage,
                        best_ever,
                        stagnation,
                    });

                    if best_ever == Some(0) {
                        OptimizerState::Terminated(Termination::Converged)
                    } else if best.is_some() && stagnation >= config.stagnation_limit {
                        OptimizerState::Terminated(Termination::Stagnated)
                    } else if generation > config.max_generations {
                        OptimizerState::Terminated(Termination::GenerationLimitReached)
                    } else {
                        OptimizerState::Evolving
                    }
                }

                OptimizerState::Evolving => {
                    let purged = population.purge_infeasible();
                    if population.is_empty() {
                        OptimizerState::Terminated(Termination::Extinct)
                    } else {
                        population.roulette_select(config.population_size, rng);
                        let offspring = self.breed(&mut population, rng);
                        debug!(
                            generation,
                            purged,
                            offspring,
                            population = population.len(),
                            "Generation evolved"
                        );
                        generation += 1;
                        OptimizerState::Evaluating
                    }
                }

                OptimizerState::Terminated(termination) => break termination,
            };
        };

        info!(
            reason = ?termination,
            generations = generation,
            best_shortage = ?best.as_ref().map(Solution::total_shortage),
            "Optimizer finished"
        );

        GaResult {
            best,
            termination,
            generations: generation,
            history,
        }
    }

    /// Adds crossover and mutation offspring. Returns how many were new.
    fn breed<R: Rng>(&self, population: &mut Population, rng: &mut R) -> usize {
        let config = &self.config;
        let horizon = self.problem.instance().horizon;
        let mut added = 0;

        let parents = population.sample(sample_size(population.len(), config.crossover_rate), rng);
        for pair in parents.chunks_exact(2) {
            let (c1, c2) = config.operators.crossover(&pair[0], &pair[1], rng);
            added += usize::from(population.insert(c1));
            added += usize::from(population.insert(c2));
        }

        let mutants = population.sample(sample_size(population.len(), config.mutation_rate), rng);
        for member in &mutants {
            let mutated = config.operators.mutate(member, horizon, rng);
            added += usize::from(population.insert(mutated));
        }

        added
    }
}

/// Whether `candidate` strictly improves on the best-ever solution.
fn improves(best: Option<&Solution>, candidate: &FitnessRecord) -> bool {
    match (best, candidate.total_shortage) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(best), Some(shortage)) => shortage < best.total_shortage(),
    }
}

fn sample_size(len: usize, rate: f64) -> usize {
    (len as f64 * rate).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::config::InitStrategy;
    use rand::rngs::SmallRng;

    fn two_project_instance() -> SchedulingInstance {
        SchedulingInstance::new(1, 4)
            .with_expert(vec![1])
            .with_project(vec![1], 2)
            .with_project(vec![1], 2)
    }

    /// No experts: every member has the same unavoidable shortage.
    fn hopeless_instance() -> SchedulingInstance {
        SchedulingInstance::new(1, 2).with_project(vec![1], 2)
    }

    fn mixed_instance() -> SchedulingInstance {
        SchedulingInstance::new(3, 12)
            .with_experts(vec![vec![1, 0, 1], vec![0, 1, 0], vec![1, 1, 0], vec![0, 0, 1]])
            .with_project(vec![1, 1, 0], 4)
            .with_project(vec![1, 0, 1], 5)
            .with_project(vec![0, 1, 1], 3)
            .with_project(vec![2, 0, 0], 6)
            .with_project(vec![0, 1, 0], 2)
    }

    #[test]
    fn test_converges_on_separable_instance() {
        let inst = two_project_instance();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(200);
        let optimizer = GeneticOptimizer::new(&inst, config);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = optimizer.run(&mut rng);

        assert_eq!(result.termination, Termination::Converged);
        assert!(result.is_optimal());
        let best = result.best.unwrap();
        assert!(best.member.starts() == [0, 2] || best.member.starts() == [2, 0]);
        assert!(optimizer.problem().is_valid(&best.member));
    }

    #[test]
    fn test_extinct_when_no_member_fits() {
        let inst = SchedulingInstance::new(1, 3)
            .with_expert(vec![1])
            .with_project(vec![1], 5)
            .with_project(vec![1], 4);
        let config = GaConfig::default().with_population_size(10);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GeneticOptimizer::new(&inst, config).run(&mut rng);

        assert_eq!(result.termination, Termination::Extinct);
        assert!(result.best.is_none());
        assert_eq!(result.generations, 1);
        assert_eq!(result.history[0].generation_best, None);
    }

    #[test]
    fn test_generation_limit() {
        let inst = hopeless_instance();
        let config = GaConfig::default()
            .with_population_size(5)
            .with_max_generations(5)
            .with_stagnation_limit(1000);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GeneticOptimizer::new(&inst, config).run(&mut rng);

        assert_eq!(result.termination, Termination::GenerationLimitReached);
        assert_eq!(result.generations, 6);
        assert_eq!(result.history.len(), 6);
        assert_eq!(result.best_shortage(), Some(2));
    }

    #[test]
    fn test_stagnation() {
        let inst = hopeless_instance();
        let config = GaConfig::default()
            .with_population_size(5)
            .with_stagnation_limit(3);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GeneticOptimizer::new(&inst, config).run(&mut rng);

        assert_eq!(result.termination, Termination::Stagnated);
        assert_eq!(result.generations, 4);
        let counters: Vec<usize> = result.history.iter().map(|s| s.stagnation).collect();
        assert_eq!(counters, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_no_projects_converges_immediately() {
        let inst = SchedulingInstance::new(2, 5).with_expert(vec![1, 1]);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GeneticOptimizer::new(&inst, GaConfig::default()).run(&mut rng);
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.generations, 1);
        assert!(result.best.unwrap().member.is_empty());
    }

    #[test]
    fn test_empty_population_goes_extinct() {
        let inst = two_project_instance();
        let config = GaConfig::default().with_population_size(0);
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GeneticOptimizer::new(&inst, config).run(&mut rng);
        assert_eq!(result.termination, Termination::Extinct);
        assert!(result.best.is_none());
    }

    #[test]
    fn test_best_ever_is_monotone() {
        let inst = mixed_instance();
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(40)
            .with_initialization(InitStrategy::Uniform);
        let mut rng = SmallRng::seed_from_u64(5);
        let result = GeneticOptimizer::new(&inst, config).run(&mut rng);

        assert_eq!(result.history.len(), result.generations);
        let bests: Vec<u64> = result.history.iter().filter_map(|s| s.best_ever).collect();
        for pair in bests.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        if let Some(best) = &result.best {
            assert_eq!(Some(best.total_shortage()), bests.last().copied());
            let problem = StaffingProblem::new(&inst);
            assert_eq!(problem.evaluate(&best.member), best.record);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let inst = mixed_instance();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(25)
            .with_seed(1234);
        let a = GeneticOptimizer::new(&inst, config.clone()).solve();
        let b = GeneticOptimizer::new(&inst, config).solve();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let inst = mixed_instance();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(25)
            .with_seed(99);
        let sequential = GeneticOptimizer::new(&inst, config.clone()).solve();
        let parallel = GeneticOptimizer::new(&inst, config.with_parallel(true)).solve();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_improves() {
        let record = |s: Option<u64>| FitnessRecord {
            total_shortage: s,
            intervals: Vec::new(),
        };
        let best = Solution {
            member: Member::new(vec![0]),
            record: record(Some(5)),
        };
        assert!(improves(None, &record(Some(9))));
        assert!(!improves(None, &record(None)));
        assert!(improves(Some(&best), &record(Some(4))));
        assert!(!improves(Some(&best), &record(Some(5))));
        assert!(!improves(Some(&best), &record(None)));
    }
}
