//! Staffing GA problem definition.
//!
//! Bridges the scheduling instance to the optimizer: creates members,
//! checks them against the horizon, and scores them by solving one
//! assignment snapshot per interval of constant activity.
//!
//! # Fitness
//!
//! `Σ interval.length × shortage(interval)`: unmet demand in
//! expert-time-units. Lower is better, 0 is perfect coverage. A member
//! that overruns the horizon is infeasible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::InitStrategy;
use super::member::Member;
use crate::models::{Assignment, SchedulingInstance, SolveResult};
use crate::scheduler::{decompose, is_within_horizon, Interval};
use crate::solver::AssignmentSolver;

/// Integer fitness reported for infeasible members.
pub const INFEASIBLE_FITNESS: i64 = -1;

/// One interval with the assignment solved for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSolution {
    /// The time span and its active projects.
    pub interval: Interval,
    /// Assignment and per-time-unit shortage inside the span.
    pub result: SolveResult,
}

impl IntervalSolution {
    /// Shortage weighted by the interval length.
    #[inline]
    pub fn weighted_shortage(&self) -> u64 {
        self.interval.length() as u64 * self.result.shortage
    }
}

/// Evaluation of one member.
///
/// `total_shortage` is `None` for infeasible members; those carry no
/// intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Time-weighted shortage, `None` if infeasible.
    pub total_shortage: Option<u64>,
    /// Per-interval assignments, sorted by time.
    pub intervals: Vec<IntervalSolution>,
}

impl FitnessRecord {
    /// Record for a member that overruns the horizon.
    pub fn infeasible() -> Self {
        Self {
            total_shortage: None,
            intervals: Vec::new(),
        }
    }

    /// Whether the member fits inside the horizon.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.total_shortage.is_some()
    }

    /// Whether every demand slot is covered at every instant.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.total_shortage == Some(0)
    }

    /// Integer fitness; [`INFEASIBLE_FITNESS`] for infeasible members.
    pub fn fitness(&self) -> i64 {
        self.total_shortage
            .map_or(INFEASIBLE_FITNESS, |s| i64::try_from(s).unwrap_or(i64::MAX))
    }

    /// Assignment lists, one per interval.
    pub fn assignments(&self) -> impl Iterator<Item = &[Assignment]> + '_ {
        self.intervals
            .iter()
            .map(|s| s.result.assignments.as_slice())
    }
}

/// GA problem definition for project timing.
///
/// # Example
/// ```
/// use u_staffing::ga::{Member, StaffingProblem};
/// use u_staffing::models::SchedulingInstance;
///
/// let instance = SchedulingInstance::new(1, 4)
///     .with_expert(vec![1])
///     .with_project(vec![1], 2)
///     .with_project(vec![1], 2);
/// let problem = StaffingProblem::new(&instance);
///
/// let sequential = problem.evaluate(&Member::new(vec![0, 2]));
/// assert_eq!(sequential.total_shortage, Some(0));
///
/// let overlapping = problem.evaluate(&Member::new(vec![0, 0]));
/// assert_eq!(overlapping.total_shortage, Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct StaffingProblem<'a> {
    instance: &'a SchedulingInstance,
    durations: Vec<u32>,
}

impl<'a> StaffingProblem<'a> {
    /// Creates a problem over a validated instance.
    pub fn new(instance: &'a SchedulingInstance) -> Self {
        Self {
            instance,
            durations: instance.durations(),
        }
    }

    /// The underlying instance.
    pub fn instance(&self) -> &'a SchedulingInstance {
        self.instance
    }

    /// Whether `member` encodes every project and fits the horizon.
    pub fn is_valid(&self, member: &Member) -> bool {
        member.len() == self.durations.len()
            && is_within_horizon(member.starts(), &self.durations, self.instance.horizon)
    }

    /// Intervals of constant activity for `member`.
    pub fn intervals(&self, member: &Member) -> Vec<Interval> {
        decompose(member.starts(), &self.durations)
    }

    /// Creates a random member with the given strategy.
    pub fn create_member<R: Rng>(&self, strategy: InitStrategy, rng: &mut R) -> Member {
        match strategy {
            InitStrategy::ValidByConstruction => Member::random_valid(self.instance, rng),
            InitStrategy::Uniform => Member::random_uniform(self.instance, rng),
        }
    }

    /// Scores a member.
    ///
    /// Pure function of the instance and the member; safe to call from
    /// several threads at once.
    pub fn evaluate(&self, member: &Member) -> FitnessRecord {
        if !self.is_valid(member) {
            return FitnessRecord::infeasible();
        }

        let mut total = 0u64;
        let mut intervals = Vec::new();
        for interval in self.intervals(member) {
            let snapshot = self.instance.snapshot(&interval.projects);
            let result = AssignmentSolver::new(&snapshot).solve();
            let solution = IntervalSolution { interval, result };
            total += solution.weighted_shortage();
            intervals.push(solution);
        }

        FitnessRecord {
            total_shortage: Some(total),
            intervals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_assignment;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn two_project_instance() -> SchedulingInstance {
        SchedulingInstance::new(1, 4)
            .with_expert(vec![1])
            .with_project(vec![1], 2)
            .with_project(vec![1], 2)
    }

    #[test]
    fn test_sequential_projects_are_optimal() {
        let inst = two_project_instance();
        let problem = StaffingProblem::new(&inst);
        let record = problem.evaluate(&Member::new(vec![0, 2]));
        assert!(record.is_optimal());
        assert_eq!(record.fitness(), 0);
        assert_eq!(record.intervals.len(), 2);
    }

    #[test]
    fn test_overlap_is_time_weighted() {
        let inst = two_project_instance();
        let problem = StaffingProblem::new(&inst);

        let record = problem.evaluate(&Member::new(vec![0, 1]));
        // [0,1): P0 alone, [1,2): both (short 1), [2,3): P1 alone.
        assert_eq!(record.total_shortage, Some(1));
        assert_eq!(record.intervals.len(), 3);
        assert_eq!(record.intervals[1].result.shortage, 1);

        let full = problem.evaluate(&Member::new(vec![0, 0]));
        assert_eq!(full.total_shortage, Some(2));
    }

    #[test]
    fn test_overrun_is_infeasible() {
        let inst = two_project_instance();
        let problem = StaffingProblem::new(&inst);
        let record = problem.evaluate(&Member::new(vec![0, 3]));
        assert!(!record.is_feasible());
        assert_eq!(record.fitness(), INFEASIBLE_FITNESS);
        assert!(record.intervals.is_empty());
    }

    #[test]
    fn test_wrong_length_is_infeasible() {
        let inst = two_project_instance();
        let problem = StaffingProblem::new(&inst);
        assert!(!problem.is_valid(&Member::new(vec![0])));
        assert!(!problem.evaluate(&Member::new(vec![0, 0, 0])).is_feasible());
    }

    #[test]
    fn test_full_horizon_project_has_single_interval() {
        let inst = SchedulingInstance::new(2, 7)
            .with_experts(vec![vec![1, 0], vec![0, 1]])
            .with_project(vec![1, 2], 7);
        let problem = StaffingProblem::new(&inst);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..20 {
            let member = problem.create_member(InitStrategy::ValidByConstruction, &mut rng);
            assert_eq!(member.starts(), &[0]);
            let record = problem.evaluate(&member);
            assert_eq!(record.intervals.len(), 1);
            assert_eq!(record.intervals[0].interval.start, 0);
            assert_eq!(record.intervals[0].interval.end, 7);
            assert_eq!(record.total_shortage, Some(7));
        }

        assert!(!problem.evaluate(&Member::new(vec![1])).is_feasible());
    }

    #[test]
    fn test_interval_assignments_use_global_project_ids() {
        let inst = SchedulingInstance::new(2, 6)
            .with_experts(vec![vec![1, 0], vec![0, 1]])
            .with_project(vec![1, 0], 3)
            .with_project(vec![0, 1], 3);
        let problem = StaffingProblem::new(&inst);
        let record = problem.evaluate(&Member::new(vec![0, 3]));
        assert!(record.is_optimal());

        let lists: Vec<&[Assignment]> = record.assignments().collect();
        assert_eq!(lists, vec![&[Assignment::new(0, 0, 0)][..], &[Assignment::new(1, 1, 1)][..]]);

        for solution in &record.intervals {
            let snapshot = inst.snapshot(&solution.interval.projects);
            assert!(validate_assignment(&snapshot, &solution.result.assignments).is_ok());
        }
    }

    #[test]
    fn test_no_projects_is_optimal() {
        let inst = SchedulingInstance::new(1, 5).with_expert(vec![1]);
        let problem = StaffingProblem::new(&inst);
        let record = problem.evaluate(&Member::new(vec![]));
        assert!(record.is_optimal());
        assert!(record.intervals.is_empty());
    }

    #[test]
    fn test_uniform_members_may_be_invalid() {
        let inst = SchedulingInstance::new(1, 10)
            .with_expert(vec![1])
            .with_project(vec![1], 9);
        let problem = StaffingProblem::new(&inst);
        let mut rng = SmallRng::seed_from_u64(1);
        let invalid = (0..100)
            .map(|_| problem.create_member(InitStrategy::Uniform, &mut rng))
            .filter(|m| !problem.is_valid(m))
            .count();
        assert!(invalid > 0);
    }
}
