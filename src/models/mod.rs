//! Staffing domain models.
//!
//! Provides the data types for expert-to-project staffing problems and
//! their solutions.
//!
//! # Domain Mappings
//!
//! | u-staffing | Consulting | Healthcare | Software |
//! |------------|------------|------------|----------|
//! | Expert | Consultant | Nurse/Doctor | Engineer |
//! | Skill | Practice area | Specialty | Stack |
//! | Project | Engagement | Ward shift | Feature team |
//! | Shortage | Unfilled seat | Uncovered slot | Open headcount |

mod assignment;
mod instance;

pub use assignment::{Assignment, SolveResult};
pub use instance::{
    ProblemInstance, RequirementVector, ScheduledProject, SchedulingInstance, SkillVector,
};
