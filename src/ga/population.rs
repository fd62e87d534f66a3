//! Insertion-ordered GA population.
//!
//! Members are unique keys; each carries its memoized [`FitnessRecord`],
//! `None` until evaluated. Insertion order is kept so that sampling and
//! selection replay identically under a fixed seed.

use indexmap::IndexMap;
use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;

use super::member::Member;
use super::problem::{FitnessRecord, StaffingProblem};

/// Population of distinct members with lazily computed fitness.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: IndexMap<Member, Option<FitnessRecord>>,
}

impl Population {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds an unevaluated member. Returns `false` (and keeps the existing
    /// entry with its cached fitness) if the member is already present.
    pub fn insert(&mut self, member: Member) -> bool {
        if self.members.contains_key(&member) {
            return false;
        }
        self.members.insert(member, None);
        true
    }

    /// Whether `member` is present.
    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains_key(member)
    }

    /// Cached fitness of `member`, if present and evaluated.
    pub fn record(&self, member: &Member) -> Option<&FitnessRecord> {
        self.members.get(member).and_then(Option::as_ref)
    }

    /// Members in insertion order with their cached fitness.
    pub fn iter(&self) -> impl Iterator<Item = (&Member, Option<&FitnessRecord>)> {
        self.members.iter().map(|(m, r)| (m, r.as_ref()))
    }

    /// Number of members not yet evaluated.
    pub fn pending(&self) -> usize {
        self.members.values().filter(|r| r.is_none()).count()
    }

    /// Evaluates every member without a cached record.
    ///
    /// With `parallel` the work is spread over the rayon pool; the
    /// resulting records are identical either way. Returns the number of
    /// members evaluated.
    pub fn evaluate_pending(&mut self, problem: &StaffingProblem<'_>, parallel: bool) -> usize {
        let pending = self.pending();
        if pending == 0 {
            return 0;
        }

        if parallel {
            self.members
                .par_iter_mut()
                .filter(|(_, record)| record.is_none())
                .for_each(|(member, record)| *record = Some(problem.evaluate(member)));
        } else {
            for (member, record) in self.members.iter_mut() {
                if record.is_none() {
                    *record = Some(problem.evaluate(member));
                }
            }
        }

        pending
    }

    /// Feasible member with the lowest shortage; the first one wins ties.
    pub fn generation_best(&self) -> Option<(&Member, &FitnessRecord)> {
        let mut best: Option<(&Member, &FitnessRecord, u64)> = None;
        for (member, record) in &self.members {
            let Some(record) = record else { continue };
            let Some(shortage) = record.total_shortage else {
                continue;
            };
            match best {
                Some((_, _, current)) if current <= shortage => {}
                _ => best = Some((member, record, shortage)),
            }
        }
        best.map(|(m, r, _)| (m, r))
    }

    /// Drops unevaluated and infeasible members. Returns how many were removed.
    pub fn purge_infeasible(&mut self) -> usize {
        let before = self.members.len();
        self.members
            .retain(|_, record| record.as_ref().is_some_and(FitnessRecord::is_feasible));
        before - self.members.len()
    }

    /// Fitness-proportionate selection down to `target` members.
    ///
    /// Each member weighs `1 / shortage`. Every draw takes a uniform value
    /// in `[0, Σw)`, walks the remaining members subtracting weights until
    /// the value goes negative, moves that member to the new population,
    /// and removes its weight from the sum. No-op when the population
    /// already fits.
    pub fn roulette_select<R: Rng>(&mut self, target: usize, rng: &mut R) {
        if self.members.len() <= target {
            return;
        }

        let mut weights: Vec<f64> = self
            .members
            .values()
            .map(|r| r.as_ref().map_or(0.0, selection_weight))
            .collect();
        let mut sum: f64 = weights.iter().sum();
        let mut selected = IndexMap::with_capacity(target);

        for _ in 0..target {
            let mut value = if sum > 0.0 {
                rng.random_range(0.0..sum)
            } else {
                0.0
            };

            // Rounding can leave `value` just above the remaining mass.
            let mut chosen = weights.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                value -= w;
                if value < 0.0 {
                    chosen = i;
                    break;
                }
            }

            sum -= weights.remove(chosen);
            if let Some((member, record)) = self.members.shift_remove_index(chosen) {
                selected.insert(member, record);
            }
        }

        self.members = selected;
    }

    /// Up to `count` distinct members drawn uniformly without replacement.
    pub fn sample<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Member> {
        let amount = count.min(self.members.len());
        index::sample(rng, self.members.len(), amount)
            .into_iter()
            .filter_map(|i| self.members.get_index(i).map(|(m, _)| m.clone()))
            .collect()
    }
}

/// Roulette weight of an evaluated member.
///
/// Zero shortage only survives until the convergence check, so it is
/// weighted like a shortage of one.
fn selection_weight(record: &FitnessRecord) -> f64 {
    record
        .total_shortage
        .map_or(0.0, |s| 1.0 / s.max(1) as f64)
}
