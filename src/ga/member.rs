//! Start-time vector encoding.
//!
//! # Encoding
//!
//! A [`Member`] holds one start time per project, in project order.
//! It is valid when every project ends inside the horizon. Invalid
//! members are not repaired; the optimizer scores them as infeasible and
//! purges them.
//!
//! # Operators
//!
//! - [`n_point_crossover`]: swaps alternating segments between two parents.
//! - [`n_point_mutation`]: redraws the start time of `n` distinct projects.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::SchedulingInstance;

/// Candidate start times, one per project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Member(Vec<u32>);

impl Member {
    /// Wraps a start-time vector.
    pub fn new(starts: Vec<u32>) -> Self {
        Self(starts)
    }

    /// Random member that is valid by construction:
    /// `0 <= start_i <= horizon - duration_i`.
    pub fn random_valid<R: Rng>(instance: &SchedulingInstance, rng: &mut R) -> Self {
        Self(
            instance
                .projects
                .iter()
                .map(|p| rng.random_range(0..=p.latest_start(instance.horizon)))
                .collect(),
        )
    }

    /// Random member with every start drawn from `[0, horizon)`.
    ///
    /// May be invalid; long projects started late overrun the horizon.
    pub fn random_uniform<R: Rng>(instance: &SchedulingInstance, rng: &mut R) -> Self {
        let horizon = instance.horizon.max(1);
        Self(
            (0..instance.project_count())
                .map(|_| rng.random_range(0..horizon))
                .collect(),
        )
    }

    /// Start times.
    #[inline]
    pub fn starts(&self) -> &[u32] {
        &self.0
    }

    /// Number of projects encoded.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the member encodes no projects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the member, returning the start times.
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for Member {
    fn from(starts: Vec<u32>) -> Self {
        Self(starts)
    }
}

/// n-point crossover.
///
/// Picks `n` distinct cut points in `[1, len)`, sorts them, appends `len`,
/// and swaps the parents' genes on `[cut_0, cut_1)`, `[cut_2, cut_3)`, …
/// producing two offspring. With fewer than two genes there is nothing to
/// cut and the parents are returned unchanged.
///
/// # Panics
/// If the parents differ in length, or if `n >= len` for `len >= 2`.
pub fn n_point_crossover<R: Rng>(
    parent1: &Member,
    parent2: &Member,
    n: usize,
    rng: &mut R,
) -> (Member, Member) {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "crossover parents must encode the same projects"
    );

    let len = parent1.len();
    let mut offspring1 = parent1.0.clone();
    let mut offspring2 = parent2.0.clone();

    if len <= 1 {
        return (Member(offspring1), Member(offspring2));
    }

    assert!(
        n < len,
        "crossover needs n < {len} cut points, got {n}"
    );

    let mut cuts: Vec<usize> = index::sample(rng, len - 1, n)
        .into_iter()
        .map(|i| i + 1)
        .collect();
    cuts.sort_unstable();
    cuts.push(len);

    for pair in cuts.chunks_exact(2) {
        let (from, to) = (pair[0], pair[1]);
        offspring1[from..to].copy_from_slice(&parent2.0[from..to]);
        offspring2[from..to].copy_from_slice(&parent1.0[from..to]);
    }

    (Member(offspring1), Member(offspring2))
}

/// n-point mutation.
///
/// Picks `n` distinct projects and gives each a start time drawn uniformly
/// from `[0, horizon)` excluding its current one, so every chosen gene
/// changes. No-op with fewer than two genes or a single-unit horizon.
///
/// # Panics
/// If `n > len` for `len >= 2`.
pub fn n_point_mutation<R: Rng>(member: &Member, n: usize, horizon: u32, rng: &mut R) -> Member {
    let len = member.len();
    let mut mutated = member.0.clone();

    if len <= 1 || horizon <= 1 {
        return Member(mutated);
    }

    assert!(n <= len, "mutation of {n} genes exceeds member length {len}");

    for i in index::sample(rng, len, n) {
        mutated[i] = redraw(member.0[i], horizon, rng);
    }

    Member(mutated)
}

/// Uniform value in `[0, horizon)` different from `current`.
fn redraw<R: Rng>(current: u32, horizon: u32, rng: &mut R) -> u32 {
    if current >= horizon {
        return rng.random_range(0..horizon);
    }
    let value = rng.random_range(0..horizon - 1);
    if value >= current {
        value + 1
    } else {
        value
    }
}
