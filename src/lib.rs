//! Expert staffing for the U-Engine ecosystem.
//!
//! Assigns skilled experts to projects so that unmet demand is minimal,
//! and chooses project start times so that a shared expert pool covers
//! overlapping projects as well as possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ProblemInstance`, `SchedulingInstance`,
//!   `Assignment`, `SolveResult`
//! - **`flow`**: Edmonds-Karp maximum flow on an arena graph
//! - **`solver`**: `AssignmentSolver`, one-shot staffing via max-flow
//! - **`scheduler`**: Interval decomposition of a timeline, staffing KPIs
//! - **`ga`**: `GeneticOptimizer` over project start times
//! - **`validation`**: Input integrity checks (vector shapes, binary skills,
//!   positive durations) and assignment consistency
//!
//! # Example
//!
//! ```
//! use u_staffing::models::ProblemInstance;
//! use u_staffing::solver::AssignmentSolver;
//!
//! let instance = ProblemInstance::new(2)
//!     .with_experts(vec![vec![1, 0], vec![1, 0], vec![0, 0]])
//!     .with_projects(vec![vec![2, 1], vec![1, 2]]);
//! let result = AssignmentSolver::new(&instance).solve();
//! assert_eq!(result.shortage, 4);
//! ```
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 26
//! - Ahuja, Magnanti & Orlin (1993), "Network Flows"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod flow;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;
