//! Timeline decomposition and KPI evaluation.
//!
//! # Intervals
//!
//! [`decompose`] splits a set of project start times into maximal spans
//! with a constant set of running projects, so each span can be staffed
//! by a single assignment.
//!
//! # KPI
//!
//! `StaffingKpi` computes coverage and workload metrics: demand, shortage,
//! coverage rate, peak concurrency, makespan, and expert utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1-3
//! - de Berg et al. (2008), "Computational Geometry", Ch. 2 (plane sweep)

mod interval;
mod kpi;

pub use interval::{decompose, is_within_horizon, Interval};
pub use kpi::StaffingKpi;
