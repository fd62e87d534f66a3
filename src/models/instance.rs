//! Problem instance models.
//!
//! Two flavours of input are supported:
//! - [`ProblemInstance`]: a fixed snapshot where every listed project is
//!   active at the same time (assignment-only mode).
//! - [`SchedulingInstance`]: projects carry a duration and must be placed
//!   inside a finite time horizon (scheduling mode).
//!
//! Both are read-only once built. Validation lives in
//! [`crate::validation`]; the solvers assume validated input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Binary capability vector of one expert (1 = has the skill).
pub type SkillVector = Vec<u8>;

/// Per-skill expert demand of one project.
pub type RequirementVector = Vec<u32>;

/// A fixed set of simultaneously active projects and the expert pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Number of distinct skills (length of every vector).
    pub skill_count: usize,
    /// Skill vector per expert; the index is the expert ID.
    pub experts: Vec<SkillVector>,
    /// Requirement vector per project; the index is the project ID.
    pub projects: Vec<RequirementVector>,
}

impl ProblemInstance {
    /// Creates an instance with no experts and no projects.
    pub fn new(skill_count: usize) -> Self {
        Self {
            skill_count,
            experts: Vec::new(),
            projects: Vec::new(),
        }
    }

    /// Adds an expert.
    pub fn with_expert(mut self, skills: SkillVector) -> Self {
        self.experts.push(skills);
        self
    }

    /// Adds several experts.
    pub fn with_experts(mut self, experts: impl IntoIterator<Item = SkillVector>) -> Self {
        self.experts.extend(experts);
        self
    }

    /// Adds a project.
    pub fn with_project(mut self, requirements: RequirementVector) -> Self {
        self.projects.push(requirements);
        self
    }

    /// Adds several projects.
    pub fn with_projects(
        mut self,
        projects: impl IntoIterator<Item = RequirementVector>,
    ) -> Self {
        self.projects.extend(projects);
        self
    }

    /// Number of experts.
    #[inline]
    pub fn expert_count(&self) -> usize {
        self.experts.len()
    }

    /// Number of projects.
    #[inline]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Whether expert `expert` possesses skill `skill`.
    #[inline]
    pub fn has_skill(&self, expert: usize, skill: usize) -> bool {
        self.experts
            .get(expert)
            .and_then(|skills| skills.get(skill))
            .is_some_and(|&has| has > 0)
    }

    /// Total demand of one project (sum of its requirement vector).
    pub fn project_demand(&self, project: usize) -> u64 {
        self.projects[project].iter().map(|&r| r as u64).sum()
    }

    /// Total demand over all projects.
    pub fn total_demand(&self) -> u64 {
        (0..self.project_count()).map(|p| self.project_demand(p)).sum()
    }
}

/// A project with a duration, to be placed on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledProject {
    /// Per-skill expert demand while the project runs.
    pub requirements: RequirementVector,
    /// Time units the project occupies (> 0).
    pub duration: u32,
}

impl ScheduledProject {
    /// Creates a scheduled project.
    pub fn new(requirements: RequirementVector, duration: u32) -> Self {
        Self {
            requirements,
            duration,
        }
    }

    /// Demand per time unit (sum of the requirement vector).
    pub fn demand(&self) -> u64 {
        self.requirements.iter().map(|&r| r as u64).sum()
    }

    /// Latest start time that still fits inside `horizon`.
    ///
    /// Saturates at 0 when the project is longer than the horizon; such a
    /// project has no valid start at all.
    #[inline]
    pub fn latest_start(&self, horizon: u32) -> u32 {
        horizon.saturating_sub(self.duration)
    }
}

/// Projects with durations competing for one expert pool over a horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingInstance {
    /// Number of distinct skills.
    pub skill_count: usize,
    /// Skill vector per expert.
    pub experts: Vec<SkillVector>,
    /// Projects with their durations.
    pub projects: Vec<ScheduledProject>,
    /// Overall time units available (> 0).
    pub horizon: u32,
}

impl SchedulingInstance {
    /// Creates an empty instance.
    pub fn new(skill_count: usize, horizon: u32) -> Self {
        Self {
            skill_count,
            experts: Vec::new(),
            projects: Vec::new(),
            horizon,
        }
    }

    /// Adds an expert.
    pub fn with_expert(mut self, skills: SkillVector) -> Self {
        self.experts.push(skills);
        self
    }

    /// Adds several experts.
    pub fn with_experts(mut self, experts: impl IntoIterator<Item = SkillVector>) -> Self {
        self.experts.extend(experts);
        self
    }

    /// Adds a project.
    pub fn with_project(mut self, requirements: RequirementVector, duration: u32) -> Self {
        self.projects
            .push(ScheduledProject::new(requirements, duration));
        self
    }

    /// Number of experts.
    #[inline]
    pub fn expert_count(&self) -> usize {
        self.experts.len()
    }

    /// Number of projects.
    #[inline]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Project durations in project order.
    pub fn durations(&self) -> Vec<u32> {
        self.projects.iter().map(|p| p.duration).collect()
    }

    /// Builds the assignment snapshot for one set of active projects.
    ///
    /// Inactive projects keep their slot with an all-zero requirement
    /// vector, so project IDs in the resulting assignment stay global.
    pub fn snapshot(&self, active: &BTreeSet<usize>) -> ProblemInstance {
        let projects = self
            .projects
            .iter()
            .enumerate()
            .map(|(id, project)| {
                if active.contains(&id) {
                    project.requirements.clone()
                } else {
                    vec![0; self.skill_count]
                }
            })
            .collect();

        ProblemInstance {
            skill_count: self.skill_count,
            experts: self.experts.clone(),
            projects,
        }
    }

    /// The assignment-only view with every project active.
    pub fn to_problem(&self) -> ProblemInstance {
        let all: BTreeSet<usize> = (0..self.project_count()).collect();
        self.snapshot(&all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scheduling() -> SchedulingInstance {
        SchedulingInstance::new(2, 10)
            .with_experts(vec![vec![1, 0], vec![0, 1]])
            .with_project(vec![1, 1], 3)
            .with_project(vec![2, 0], 12)
    }

    #[test]
    fn test_problem_counts_and_demand() {
        let p = ProblemInstance::new(2)
            .with_experts(vec![vec![1, 0], vec![1, 0], vec![0, 0]])
            .with_projects(vec![vec![2, 1], vec![1, 2]]);
        assert_eq!(p.expert_count(), 3);
        assert_eq!(p.project_count(), 2);
        assert_eq!(p.project_demand(0), 3);
        assert_eq!(p.total_demand(), 6);
        assert!(p.has_skill(0, 0));
        assert!(!p.has_skill(2, 1));
    }

    #[test]
    fn test_empty_problem_demand() {
        let p = ProblemInstance::new(3);
        assert_eq!(p.total_demand(), 0);
        assert_eq!(p.expert_count(), 0);
    }

    #[test]
    fn test_latest_start_saturates() {
        let s = sample_scheduling();
        assert_eq!(s.projects[0].latest_start(s.horizon), 7);
        assert_eq!(s.projects[1].latest_start(s.horizon), 0);
    }

    #[test]
    fn test_snapshot_zeroes_inactive_projects() {
        let s = sample_scheduling();
        let active: BTreeSet<usize> = [1].into_iter().collect();
        let snap = s.snapshot(&active);
        assert_eq!(snap.project_count(), 2);
        assert_eq!(snap.projects[0], vec![0, 0]);
        assert_eq!(snap.projects[1], vec![2, 0]);
        assert_eq!(snap.experts, s.experts);
        assert_eq!(snap.total_demand(), 2);
    }

    #[test]
    fn test_to_problem_keeps_everything() {
        let s = sample_scheduling();
        let p = s.to_problem();
        assert_eq!(p.projects, vec![vec![1, 1], vec![2, 0]]);
        assert_eq!(s.durations(), vec![3, 12]);
    }

    #[test]
    fn test_scheduling_from_json() {
        let json = r#"{
            "skill_count": 2,
            "experts": [[1, 0], [1, 1]],
            "projects": [
                { "requirements": [1, 0], "duration": 2 },
                { "requirements": [0, 1], "duration": 4 }
            ],
            "horizon": 6
        }"#;
        let s: SchedulingInstance = serde_json::from_str(json).unwrap();
        assert_eq!(s.expert_count(), 2);
        assert_eq!(s.project_count(), 2);
        assert_eq!(s.projects[1].demand(), 1);
        assert_eq!(s.horizon, 6);
    }
}
