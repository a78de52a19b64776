use std::collections::BTreeSet;

use serde::Serialize;

use crate::convert::classify::Outcome;
use crate::convert::transform::Disposition;
use crate::core::types::OutcomeKind;

/// At most this many distinct foreign chromosome names are kept for diagnostics
pub const MAX_FOREIGN_CHROMOSOMES: usize = 5;

/// Fraction of rows above which an outcome kind is reported as suspicious
pub const WARN_RATE: f64 = 0.01;

/// Counters for one conversion run.
///
/// Outcome counters count rows: a row with two unmapped positions adds one
/// to `unmapped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStatistics {
    /// Body rows read
    pub rows: u64,
    pub written: u64,
    pub skipped: u64,

    pub mapped: u64,
    pub unmapped: u64,
    pub multiple: u64,
    pub unknown_chromosome: u64,
    pub foreign_chromosome: u64,
    pub not_same_chromosome: u64,

    /// Sample of contig/scaffold names returned by the lookup
    pub foreign_chromosomes: BTreeSet<String>,
}

/// An outcome kind whose rate exceeded [`WARN_RATE`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateWarning {
    pub kind: OutcomeKind,
    pub count: u64,
    pub rate: f64,
}

impl std::fmt::Display for RateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "over {:.0}% of the input rows are {} ({}, {:.2}%); please check the target and query builds",
            WARN_RATE * 100.0,
            self.kind.label(),
            self.count,
            self.rate * 100.0
        )
    }
}

impl RunStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified row and what happened to it.
    pub fn record(&mut self, outcomes: &[Outcome], disposition: Disposition) {
        self.rows += 1;
        match disposition {
            Disposition::Keep => self.written += 1,
            Disposition::Skip(_) => self.skipped += 1,
        }

        let mut seen: Vec<OutcomeKind> = outcomes.iter().map(Outcome::kind).collect();
        seen.sort_unstable();
        seen.dedup();
        for kind in seen {
            *self.counter_mut(kind) += 1;
        }

        for outcome in outcomes {
            if let Outcome::ForeignChromosome(name) = outcome {
                if self.foreign_chromosomes.len() < MAX_FOREIGN_CHROMOSOMES {
                    self.foreign_chromosomes.insert(name.clone());
                }
            }
        }
    }

    fn counter_mut(&mut self, kind: OutcomeKind) -> &mut u64 {
        match kind {
            OutcomeKind::Mapped => &mut self.mapped,
            OutcomeKind::Unmapped => &mut self.unmapped,
            OutcomeKind::Ambiguous => &mut self.multiple,
            OutcomeKind::KeyError => &mut self.unknown_chromosome,
            OutcomeKind::ForeignChromosome => &mut self.foreign_chromosome,
            OutcomeKind::CrossChromosomeMismatch => &mut self.not_same_chromosome,
        }
    }

    /// Rows that had at least one coordinate of this kind
    #[must_use]
    pub fn count(&self, kind: OutcomeKind) -> u64 {
        match kind {
            OutcomeKind::Mapped => self.mapped,
            OutcomeKind::Unmapped => self.unmapped,
            OutcomeKind::Ambiguous => self.multiple,
            OutcomeKind::KeyError => self.unknown_chromosome,
            OutcomeKind::ForeignChromosome => self.foreign_chromosome,
            OutcomeKind::CrossChromosomeMismatch => self.not_same_chromosome,
        }
    }

    /// Fraction of body rows with this kind; 0 when no rows were read
    #[must_use]
    pub fn rate(&self, kind: OutcomeKind) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.count(kind) as f64 / self.rows as f64
        }
    }

    /// Failure kinds whose rate exceeds [`WARN_RATE`]
    #[must_use]
    pub fn warnings(&self) -> Vec<RateWarning> {
        OutcomeKind::ALL
            .iter()
            .filter(|&&kind| kind != OutcomeKind::Mapped)
            .map(|&kind| RateWarning {
                kind,
                count: self.count(kind),
                rate: self.rate(kind),
            })
            .filter(|w| w.rate > WARN_RATE)
            .collect()
    }
}
