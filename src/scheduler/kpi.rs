//! Staffing quality metrics (KPIs).
//!
//! Computes coverage and workload indicators from a solved timeline and
//! its input instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Demand | Σ requirement × duration, in expert-time-units |
//! | Total Shortage | Unmet demand, in expert-time-units |
//! | Coverage Rate | Fraction of demand staffed |
//! | Peak Concurrency | Most projects running at once |
//! | Makespan | Latest project end |
//! | Avg Utilization | Mean expert busy time over the horizon |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::ga::Solution;
use crate::models::SchedulingInstance;

/// Staffing performance indicators.
///
/// All time values are in horizon time units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingKpi {
    /// Total demand in expert-time-units.
    pub total_demand: u64,
    /// Unmet demand in expert-time-units.
    pub total_shortage: u64,
    /// Fraction of demand covered (0.0..1.0).
    pub coverage_rate: f64,
    /// Largest number of simultaneously active projects.
    pub peak_concurrency: usize,
    /// Latest project end.
    pub makespan: u32,
    /// Time units each expert spends assigned, indexed by expert.
    pub busy_time_by_expert: Vec<u32>,
    /// Average expert utilization over the horizon (0.0..1.0).
    pub avg_utilization: f64,
}

impl StaffingKpi {
    /// Computes KPIs from an instance and a solution for it.
    ///
    /// # Arguments
    /// * `instance` - The scheduling instance (durations, demand, horizon).
    /// * `solution` - Start times with their per-interval assignments.
    pub fn calculate(instance: &SchedulingInstance, solution: &Solution) -> Self {
        let total_demand: u64 = instance
            .projects
            .iter()
            .map(|p| p.demand() * u64::from(p.duration))
            .sum();
        let total_shortage = solution.total_shortage();

        let makespan = solution
            .member
            .starts()
            .iter()
            .zip(&instance.projects)
            .map(|(&start, p)| start.saturating_add(p.duration))
            .max()
            .unwrap_or(0);

        let mut peak_concurrency = 0;
        let mut busy_time_by_expert = vec![0u32; instance.expert_count()];
        for interval in &solution.record.intervals {
            peak_concurrency = peak_concurrency.max(interval.interval.projects.len());
            for expert in interval.result.experts_used() {
                if let Some(busy) = busy_time_by_expert.get_mut(expert) {
                    *busy += interval.interval.length();
                }
            }
        }

        let coverage_rate = if total_demand == 0 {
            1.0
        } else {
            total_demand.saturating_sub(total_shortage) as f64 / total_demand as f64
        };

        let avg_utilization = if busy_time_by_expert.is_empty() || instance.horizon == 0 {
            0.0
        } else {
            let sum: f64 = busy_time_by_expert
                .iter()
                .map(|&busy| busy as f64 / instance.horizon as f64)
                .sum();
            sum / busy_time_by_expert.len() as f64
        };

        Self {
            total_demand,
            total_shortage,
            coverage_rate,
            peak_concurrency,
            makespan,
            busy_time_by_expert,
            avg_utilization,
        }
    }

    /// Utilization of one expert over the horizon.
    pub fn utilization(&self, expert: usize, horizon: u32) -> Option<f64> {
        if horizon == 0 {
            return None;
        }
        self.busy_time_by_expert
            .get(expert)
            .map(|&busy| busy as f64 / horizon as f64)
    }

    /// Whether the solution meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_shortage: u64, min_coverage: f64) -> bool {
        self.total_shortage <= max_shortage && self.coverage_rate >= min_coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Member, StaffingProblem};

    fn solution(instance: &SchedulingInstance, starts: Vec<u32>) -> Solution {
        let member = Member::new(starts);
        let record = StaffingProblem::new(instance).evaluate(&member);
        Solution { member, record }
    }

    fn two_project_instance() -> SchedulingInstance {
        SchedulingInstance::new(1, 4)
            .with_expert(vec![1])
            .with_project(vec![1], 2)
            .with_project(vec![1], 2)
    }

    #[test]
    fn test_kpi_full_coverage() {
        let inst = two_project_instance();
        let kpi = StaffingKpi::calculate(&inst, &solution(&inst, vec![0, 2]));
        assert_eq!(kpi.total_demand, 4);
        assert_eq!(kpi.total_shortage, 0);
        assert!((kpi.coverage_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.peak_concurrency, 1);
        assert_eq!(kpi.makespan, 4);
        assert_eq!(kpi.busy_time_by_expert, vec![4]);
        assert!((kpi.avg_utilization - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_overlap_shortage() {
        let inst = two_project_instance();
        let kpi = StaffingKpi::calculate(&inst, &solution(&inst, vec![0, 0]));
        assert_eq!(kpi.total_shortage, 2);
        assert!((kpi.coverage_rate - 0.5).abs() < 1e-10);
        assert_eq!(kpi.peak_concurrency, 2);
        assert_eq!(kpi.makespan, 2);
        assert_eq!(kpi.busy_time_by_expert, vec![2]);
        assert!((kpi.avg_utilization - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_idle_expert() {
        let inst = SchedulingInstance::new(2, 10)
            .with_experts(vec![vec![1, 0], vec![0, 0]])
            .with_project(vec![1, 0], 5);
        let kpi = StaffingKpi::calculate(&inst, &solution(&inst, vec![3]));
        assert_eq!(kpi.busy_time_by_expert, vec![5, 0]);
        assert_eq!(kpi.makespan, 8);
        // E0: 5/10, E1: 0/10
        assert!((kpi.avg_utilization - 0.25).abs() < 1e-10);
        assert!((kpi.utilization(0, 10).unwrap() - 0.5).abs() < 1e-10);
        assert!(kpi.utilization(2, 10).is_none());
    }

    #[test]
    fn test_kpi_empty() {
        let inst = SchedulingInstance::new(1, 5);
        let kpi = StaffingKpi::calculate(&inst, &solution(&inst, vec![]));
        assert_eq!(kpi.total_demand, 0);
        assert_eq!(kpi.makespan, 0);
        assert_eq!(kpi.peak_concurrency, 0);
        assert!((kpi.coverage_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let inst = two_project_instance();
        let kpi = StaffingKpi::calculate(&inst, &solution(&inst, vec![0, 0]));
        assert!(kpi.meets_thresholds(2, 0.5));
        assert!(!kpi.meets_thresholds(1, 0.0));
        assert!(!kpi.meets_thresholds(10, 0.6));
    }
}
