//! Interval decomposition of a project timeline.
//!
//! Splits the horizon at every project start and end so that the set of
//! running projects is constant inside each piece. One assignment snapshot
//! is then valid for every instant of that piece.
//!
//! Projects occupy half-open ranges `[start, start + duration)`; a project
//! is active in `[lo, hi)` iff `lo < end && start < hi`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A maximal time span with a constant set of active projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Inclusive start.
    pub start: u32,
    /// Exclusive end.
    pub end: u32,
    /// Projects running throughout `[start, end)`.
    pub projects: BTreeSet<usize>,
}

impl Interval {
    /// Time units covered (the interval's weight in fitness).
    #[inline]
    pub fn length(&self) -> u32 {
        self.end - self.start
    }

    /// Whether `project` runs during this interval.
    #[inline]
    pub fn contains_project(&self, project: usize) -> bool {
        self.projects.contains(&project)
    }
}

/// Whether every project ends no later than `horizon`.
pub fn is_within_horizon(starts: &[u32], durations: &[u32], horizon: u32) -> bool {
    starts
        .iter()
        .zip(durations)
        .all(|(&start, &duration)| start as u64 + duration as u64 <= horizon as u64)
}

/// Decomposes a timeline into intervals of constant activity.
///
/// Boundaries are the distinct start and end points of all projects.
/// Between consecutive boundaries the active set is tracked by a sweep:
/// projects ending at a boundary leave, projects starting there join.
/// Spans with no active project are skipped.
///
/// The result is sorted, pairwise disjoint, and covers exactly the time
/// where at least one project runs.
///
/// # Panics
/// If `starts` and `durations` differ in length.
pub fn decompose(starts: &[u32], durations: &[u32]) -> Vec<Interval> {
    assert_eq!(
        starts.len(),
        durations.len(),
        "one start time per project is required"
    );

    // boundary -> (projects starting, projects ending)
    let mut events: BTreeMap<u32, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
    for (project, (&start, &duration)) in starts.iter().zip(durations).enumerate() {
        if duration == 0 {
            continue;
        }
        events.entry(start).or_default().0.push(project);
        events
            .entry(start.saturating_add(duration))
            .or_default()
            .1
            .push(project);
    }

    let mut intervals = Vec::new();
    let mut active = BTreeSet::new();
    let mut boundaries = events.iter().peekable();

    while let Some((&lo, (starting, ending))) = boundaries.next() {
        for project in ending {
            active.remove(project);
        }
        active.extend(starting.iter().copied());

        if let Some(&(&hi, _)) = boundaries.peek() {
            if !active.is_empty() {
                intervals.push(Interval {
                    start: lo,
                    end: hi,
                    projects: active.clone(),
                });
            }
        }
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn set(ids: &[usize]) -> BTreeSet<usize> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_overlapping_projects() {
        // P0: [0, 4), P1: [2, 5)
        let intervals = decompose(&[0, 2], &[4, 3]);
        assert_eq!(intervals.len(), 3);
        assert_eq!((intervals[0].start, intervals[0].end), (0, 2));
        assert_eq!(intervals[0].projects, set(&[0]));
        assert_eq!((intervals[1].start, intervals[1].end), (2, 4));
        assert_eq!(intervals[1].projects, set(&[0, 1]));
        assert_eq!((intervals[2].start, intervals[2].end), (4, 5));
        assert_eq!(intervals[2].projects, set(&[1]));
    }

    #[test]
    fn test_gap_is_skipped() {
        // P0: [0, 2), P1: [5, 6)
        let intervals = decompose(&[0, 5], &[2, 1]);
        assert_eq!(intervals.len(), 2);
        assert_eq!((intervals[0].start, intervals[0].end), (0, 2));
        assert_eq!((intervals[1].start, intervals[1].end), (5, 6));
    }

    #[test]
    fn test_touching_projects_do_not_overlap() {
        // P0: [0, 3), P1: [3, 5)
        let intervals = decompose(&[0, 3], &[3, 2]);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].projects, set(&[0]));
        assert_eq!(intervals[1].projects, set(&[1]));
    }

    #[test]
    fn test_identical_projects_share_one_interval() {
        let intervals = decompose(&[1, 1, 1], &[2, 2, 2]);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].length(), 2);
        assert_eq!(intervals[0].projects, set(&[0, 1, 2]));
    }

    #[test]
    fn test_full_horizon_project() {
        let intervals = decompose(&[0], &[10]);
        assert_eq!(intervals.len(), 1);
        assert_eq!((intervals[0].start, intervals[0].end), (0, 10));
        assert!(intervals[0].contains_project(0));
    }

    #[test]
    fn test_no_projects() {
        assert!(decompose(&[], &[]).is_empty());
    }

    #[test]
    fn test_horizon_check() {
        assert!(is_within_horizon(&[0, 2], &[4, 3], 5));
        assert!(!is_within_horizon(&[0, 3], &[4, 3], 5));
        assert!(is_within_horizon(&[], &[], 1));
        assert!(!is_within_horizon(&[u32::MAX], &[2], u32::MAX));
    }

    #[test]
    #[should_panic(expected = "one start time per project")]
    fn test_length_mismatch_panics() {
        decompose(&[0, 1], &[1]);
    }

    #[test]
    fn test_matches_pointwise_activity() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let n = rng.random_range(0..6);
            let starts: Vec<u32> = (0..n).map(|_| rng.random_range(0..12)).collect();
            let durations: Vec<u32> = (0..n).map(|_| rng.random_range(1..6)).collect();
            let intervals = decompose(&starts, &durations);

            for pair in intervals.windows(2) {
                assert!(pair[0].end <= pair[1].start, "sorted and disjoint");
            }

            for t in 0..20u32 {
                let running: BTreeSet<usize> = (0..n)
                    .filter(|&i| starts[i] <= t && t < starts[i] + durations[i])
                    .collect();
                let covering: Vec<&Interval> = intervals
                    .iter()
                    .filter(|iv| iv.start <= t && t < iv.end)
                    .collect();
                if running.is_empty() {
                    assert!(covering.is_empty(), "t={t} covered with nothing running");
                } else {
                    assert_eq!(covering.len(), 1);
                    assert_eq!(covering[0].projects, running);
                }
            }
        }
    }
}
