//! Input validation for staffing problems.
//!
//! Checks structural integrity of instances before solving, and the
//! consistency of a produced assignment against its instance. Detects:
//! - A non-positive skill count
//! - Vectors whose length differs from the skill count
//! - Non-binary expert skill vectors
//! - Non-positive project durations or horizon
//! - Assignments that reuse an expert, use a skill the expert lacks,
//!   or exceed a project's requirement
//!
//! Solvers assume validated input; run these at the boundary where
//! instances enter the system.

use crate::models::{Assignment, ProblemInstance, SchedulingInstance, SkillVector};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance declares no skills.
    ZeroSkillCount,
    /// A skill or requirement vector has the wrong length.
    VectorLength,
    /// An expert vector holds a value other than 0 or 1.
    NonBinarySkill,
    /// A project has a zero duration.
    ZeroDuration,
    /// The time horizon is zero.
    ZeroHorizon,
    /// An assignment references an expert, skill, or project that doesn't exist.
    UnknownEntity,
    /// An expert is assigned a skill they don't have.
    MissingSkill,
    /// An expert appears in more than one assignment.
    DoubleAssignment,
    /// More experts assigned to a (skill, project) cell than it requires.
    OverAssignment,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an assignment-only instance.
///
/// Checks:
/// 1. Skill count is positive
/// 2. Every expert and project vector has `skill_count` entries
/// 3. Expert vectors are binary
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(instance: &ProblemInstance) -> ValidationResult {
    let mut errors = Vec::new();

    check_skill_count(instance.skill_count, &mut errors);
    check_experts(&instance.experts, instance.skill_count, &mut errors);

    for (id, req) in instance.projects.iter().enumerate() {
        if req.len() != instance.skill_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::VectorLength,
                format!(
                    "Project {id} has {} requirements, expected {}",
                    req.len(),
                    instance.skill_count
                ),
            ));
        }
    }

    finish(errors)
}

/// Validates a scheduling instance.
///
/// Same checks as [`validate_problem`], plus positive durations and a
/// positive horizon. A project longer than the horizon is *not* an error:
/// it simply makes every schedule infeasible, which the optimizer reports.
pub fn validate_scheduling(instance: &SchedulingInstance) -> ValidationResult {
    let mut errors = Vec::new();

    check_skill_count(instance.skill_count, &mut errors);
    check_experts(&instance.experts, instance.skill_count, &mut errors);

    if instance.horizon == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroHorizon,
            "The number of overall time units must be positive",
        ));
    }

    for (id, project) in instance.projects.iter().enumerate() {
        if project.requirements.len() != instance.skill_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::VectorLength,
                format!(
                    "Project {id} has {} requirements, expected {}",
                    project.requirements.len(),
                    instance.skill_count
                ),
            ));
        }
        if project.duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Project {id} must last at least one time unit"),
            ));
        }
    }

    finish(errors)
}

/// Checks an assignment against the instance it was solved for.
///
/// Checks:
/// 1. Expert, skill, and project IDs are in range
/// 2. Each expert has the skill they are assigned
/// 3. No expert appears twice
/// 4. No (skill, project) cell receives more experts than required
pub fn validate_assignment(
    instance: &ProblemInstance,
    assignments: &[Assignment],
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut cells: HashMap<(usize, usize), u32> = HashMap::new();

    for a in assignments {
        if a.expert >= instance.expert_count()
            || a.skill >= instance.skill_count
            || a.project >= instance.project_count()
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownEntity,
                format!(
                    "Assignment ({}, {}, {}) is out of range",
                    a.expert, a.skill, a.project
                ),
            ));
            continue;
        }

        if !seen.insert(a.expert) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DoubleAssignment,
                format!("Expert {} was assigned to two subtasks", a.expert),
            ));
        }

        if !instance.has_skill(a.expert, a.skill) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingSkill,
                format!("Expert {} lacks skill {}", a.expert, a.skill),
            ));
        }

        *cells.entry((a.skill, a.project)).or_insert(0) += 1;
    }

    let mut over: Vec<_> = cells
        .into_iter()
        .filter(|&((skill, project), count)| count > required(instance, skill, project))
        .collect();
    over.sort_unstable();
    for ((skill, project), count) in over {
        errors.push(ValidationError::new(
            ValidationErrorKind::OverAssignment,
            format!(
                "Project {project} needs {} experts in skill {skill}, got {count}",
                required(instance, skill, project)
            ),
        ));
    }

    finish(errors)
}

fn required(instance: &ProblemInstance, skill: usize, project: usize) -> u32 {
    instance.projects[project].get(skill).copied().unwrap_or(0)
}

fn check_skill_count(skill_count: usize, errors: &mut Vec<ValidationError>) {
    if skill_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ZeroSkillCount,
            "The number of skills must be positive",
        ));
    }
}

fn check_experts(experts: &[SkillVector], skill_count: usize, errors: &mut Vec<ValidationError>) {
    for (id, skills) in experts.iter().enumerate() {
        if skills.len() != skill_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::VectorLength,
                format!(
                    "Expert {id} has {} skills, expected {skill_count}",
                    skills.len()
                ),
            ));
        }
        if skills.iter().any(|&s| s > 1) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonBinarySkill,
                format!("Expert {id} skill vector must be binary"),
            ));
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
