//! Split scoring plug-ins.
//!
//! A scorer rates how well a partition of examples into groups explains
//! their class labels; higher is better. Leaves are scored as a single
//! group, candidate tests as a pass group and a fail group.
use crate::constants::{DEFAULT_PSEUDO_COUNT, UNSCOREABLE};
use crate::utils::log_beta;
use std::collections::BTreeMap;

/// Class label -> number of examples carrying it. Zero entries are never stored.
pub type ClassCounts<C> = BTreeMap<C, usize>;

pub fn total<C>(counts: &ClassCounts<C>) -> usize {
    counts.values().sum()
}

pub fn increment<C: Ord>(counts: &mut ClassCounts<C>, class: C) {
    *counts.entry(class).or_insert(0) += 1;
}

/// Remove one example of `class`; `false` if there was none to remove.
pub fn decrement<C: Ord>(counts: &mut ClassCounts<C>, class: &C) -> bool {
    match counts.get_mut(class) {
        Some(n) if *n > 1 => {
            *n -= 1;
            true
        }
        Some(_) => {
            counts.remove(class);
            true
        }
        None => false,
    }
}

/// Add every count of `other` into `counts`.
pub fn merge_counts<C: Ord + Clone>(counts: &mut ClassCounts<C>, other: &ClassCounts<C>) {
    for (class, n) in other {
        *counts.entry(class.clone()).or_insert(0) += n;
    }
}

pub trait SplitScorer<C> {
    /// Score a partition of examples, given the class counts of each group.
    /// Returns `UNSCOREABLE` when no real score exists.
    fn score(&self, groups: &[&ClassCounts<C>]) -> f64;

    fn leaf_score(&self, counts: &ClassCounts<C>) -> f64 {
        self.score(&[counts])
    }

    fn split_score(&self, pass: &ClassCounts<C>, fail: &ClassCounts<C>) -> f64 {
        self.score(&[pass, fail])
    }
}

/// Sum over groups of the weighted negative entropy `sum_c n_c ln(n_c / n)`.
///
/// A pure group scores 0, so the best possible split of anything is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyScorer;

impl EntropyScorer {
    pub fn weighted_negative_entropy<C>(counts: &ClassCounts<C>) -> f64 {
        let n: usize = counts.values().sum();
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        counts
            .values()
            .filter(|c| **c > 0)
            .map(|c| {
                let c = *c as f64;
                c * (c / n).ln()
            })
            .sum()
    }
}

impl<C> SplitScorer<C> for EntropyScorer {
    fn score(&self, groups: &[&ClassCounts<C>]) -> f64 {
        groups.iter().map(|g| EntropyScorer::weighted_negative_entropy(g)).sum()
    }
}

/// Log marginal likelihood of the class values under a Dirichlet prior
/// whose `pseudo_count` is spread evenly over every non-empty group and
/// every class value (a BDeu score over the groups of the partition).
///
/// Classes are the values `0..domain_size` of the variable being predicted.
#[derive(Debug, Clone, Copy)]
pub struct BdeuScorer {
    pub domain_size: usize,
    pub pseudo_count: f64,
}

impl BdeuScorer {
    pub fn new(domain_size: usize, pseudo_count: f64) -> Self {
        BdeuScorer {
            domain_size,
            pseudo_count,
        }
    }

    pub fn with_domain(domain_size: usize) -> Self {
        BdeuScorer::new(domain_size, DEFAULT_PSEUDO_COUNT)
    }

    fn group_score(&self, counts: &ClassCounts<usize>, alpha: f64) -> f64 {
        let mut numerator = Vec::with_capacity(self.domain_size);
        let mut denominator = Vec::with_capacity(self.domain_size);
        for value in 0..self.domain_size {
            let n = counts.get(&value).copied().unwrap_or(0) as f64;
            numerator.push(n + alpha);
            denominator.push(alpha);
        }
        log_beta(&numerator) - log_beta(&denominator)
    }
}

impl SplitScorer<usize> for BdeuScorer {
    fn score(&self, groups: &[&ClassCounts<usize>]) -> f64 {
        let non_empty: Vec<&&ClassCounts<usize>> = groups.iter().filter(|g| g.values().any(|n| *n > 0)).collect();
        if non_empty.is_empty() {
            return 0.0;
        }
        if self.domain_size == 0 || self.pseudo_count.is_nan() || self.pseudo_count <= 0.0 {
            return UNSCOREABLE;
        }
        let alpha = self.pseudo_count / (non_empty.len() * self.domain_size) as f64;
        let score: f64 = non_empty.iter().map(|g| self.group_score(g, alpha)).sum();
        if score.is_finite() {
            score
        } else {
            UNSCOREABLE
        }
    }
}
