//! Assignment (solution) model.
//!
//! A solve result records which expert covers which skill on which
//! project, plus the demand that could not be covered.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One expert working one skill on one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// Expert ID (index into the instance's expert list).
    pub expert: usize,
    /// Skill the expert exercises.
    pub skill: usize,
    /// Project the expert works on.
    pub project: usize,
}

impl Assignment {
    /// Creates an assignment triple.
    pub fn new(expert: usize, skill: usize, project: usize) -> Self {
        Self {
            expert,
            skill,
            project,
        }
    }
}

impl From<(usize, usize, usize)> for Assignment {
    fn from((expert, skill, project): (usize, usize, usize)) -> Self {
        Self::new(expert, skill, project)
    }
}

/// Result of solving one assignment snapshot.
///
/// `shortage` is total demand minus the maximum flow; `assignments`
/// never uses an expert twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    /// Unmet demand (expert slots left empty).
    pub shortage: u64,
    /// Expert/skill/project triples.
    pub assignments: Vec<Assignment>,
}

impl SolveResult {
    /// Creates a result.
    pub fn new(shortage: u64, assignments: Vec<Assignment>) -> Self {
        Self {
            shortage,
            assignments,
        }
    }

    /// Number of assigned experts (equals the flow value).
    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether every unit of demand was covered.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shortage == 0
    }

    /// All assignments on a given project.
    pub fn assignments_for_project(&self, project: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.project == project)
            .collect()
    }

    /// The assignment of an expert, if the expert was used.
    pub fn assignment_for_expert(&self, expert: usize) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.expert == expert)
    }

    /// Set of experts used.
    pub fn experts_used(&self) -> HashSet<usize> {
        self.assignments.iter().map(|a| a.expert).collect()
    }

    /// Assigned expert count per (skill, project) cell.
    pub fn coverage(&self) -> BTreeMap<(usize, usize), u32> {
        let mut cells = BTreeMap::new();
        for a in &self.assignments {
            *cells.entry((a.skill, a.project)).or_insert(0) += 1;
        }
        cells
    }
}
