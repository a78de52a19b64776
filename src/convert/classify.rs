use thiserror::Error;

use crate::core::chromosome::{canonicalize, is_valid_chromosome, ChromosomeToken};
use crate::core::types::{CoordinateSystem, MappingResult, OutcomeKind, Strand};
use crate::lookup::CoordinateLookup;

/// A position that cannot be expressed in the lookup's 0-based system
#[derive(Debug, Error, PartialEq, Eq)]
#[error("position {position} is below the first base of a {system:?} coordinate system")]
pub struct InvalidPosition {
    pub position: u64,
    pub system: CoordinateSystem,
}

/// A converted coordinate, already shifted back into the input's coordinate system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Canonical chromosome
    pub chromosome: String,
    pub position: u64,
    pub strand: Strand,
}

/// Result of converting one coordinate column of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Mapped(Converted),
    Unmapped,
    /// Number of candidates the lookup reported
    Ambiguous(usize),
    /// The chromosome is absent from the index
    KeyError,
    /// The lookup answered with a contig or scaffold name (as returned)
    ForeignChromosome(String),
    /// The position landed on another primary chromosome
    CrossChromosomeMismatch(Converted),
}

impl Outcome {
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Mapped(_) => OutcomeKind::Mapped,
            Self::Unmapped => OutcomeKind::Unmapped,
            Self::Ambiguous(_) => OutcomeKind::Ambiguous,
            Self::KeyError => OutcomeKind::KeyError,
            Self::ForeignChromosome(_) => OutcomeKind::ForeignChromosome,
            Self::CrossChromosomeMismatch(_) => OutcomeKind::CrossChromosomeMismatch,
        }
    }

    /// The new coordinate, when there is one to write
    #[must_use]
    pub fn converted(&self) -> Option<&Converted> {
        match self {
            Self::Mapped(c) | Self::CrossChromosomeMismatch(c) => Some(c),
            _ => None,
        }
    }
}

/// Wraps a lookup with coordinate-system arithmetic and outcome classification.
#[derive(Debug)]
pub struct Classifier<L> {
    lookup: L,
    system: CoordinateSystem,
}

impl<L: CoordinateLookup> Classifier<L> {
    pub fn new(lookup: L, system: CoordinateSystem) -> Self {
        Self { lookup, system }
    }

    #[must_use]
    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    /// Classify one coordinate given in the input's coordinate system.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPosition` if the position is smaller than the offset
    /// (i.e. `0` in 1-based input).
    pub fn classify(
        &self,
        chromosome: &ChromosomeToken,
        position: u64,
    ) -> Result<Outcome, InvalidPosition> {
        let offset = self.system.offset();
        let query = position.checked_sub(offset).ok_or(InvalidPosition {
            position,
            system: self.system,
        })?;

        let hit = match self.lookup.lookup(&chromosome.canonical, query) {
            MappingResult::UnknownChromosome => return Ok(Outcome::KeyError),
            MappingResult::NotFound => return Ok(Outcome::Unmapped),
            MappingResult::Ambiguous(n) => return Ok(Outcome::Ambiguous(n)),
            MappingResult::Found(hit) => hit,
        };

        let new_chromosome = canonicalize(&hit.chromosome);
        if !is_valid_chromosome(&new_chromosome) {
            return Ok(Outcome::ForeignChromosome(hit.chromosome));
        }

        let converted = Converted {
            position: hit.position + offset,
            strand: hit.strand,
            chromosome: new_chromosome,
        };
        if converted.chromosome == chromosome.canonical {
            Ok(Outcome::Mapped(converted))
        } else {
            Ok(Outcome::CrossChromosomeMismatch(converted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MappedPosition;
    use crate::lookup::MemoryLookup;

    fn lookup() -> MemoryLookup {
        let mut lookup = MemoryLookup::new();
        lookup
            .add("1", 99, MappedPosition::new("chr1", 499, Strand::Plus))
            .add("1", 100, MappedPosition::new("chr2", 700, Strand::Minus))
            .add("1", 101, MappedPosition::new("chr1_gl000191_random", 5, Strand::Plus))
            .add("1", 102, MappedPosition::new("chr1", 1, Strand::Plus))
            .add("1", 102, MappedPosition::new("chr1", 2, Strand::Plus))
            .add("X", 0, MappedPosition::new("chrX", 10, Strand::Plus))
            .add_chromosome("2");
        lookup
    }

    fn converted(chromosome: &str, position: u64, strand: Strand) -> Converted {
        Converted {
            chromosome: chromosome.to_string(),
            position,
            strand,
        }
    }

    #[test]
    fn test_mapped_one_based_offset() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        let outcome = classifier.classify(&ChromosomeToken::new("1"), 100).unwrap();
        assert_eq!(outcome, Outcome::Mapped(converted("1", 500, Strand::Plus)));
        assert_eq!(outcome.kind(), OutcomeKind::Mapped);
    }

    #[test]
    fn test_mapped_zero_based_offset() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::ZeroBased);
        let outcome = classifier.classify(&ChromosomeToken::new("chr1"), 99).unwrap();
        assert_eq!(outcome, Outcome::Mapped(converted("1", 499, Strand::Plus)));
    }

    #[test]
    fn test_canonical_chromosome_used_for_lookup() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        let outcome = classifier.classify(&ChromosomeToken::new("23"), 1).unwrap();
        assert_eq!(outcome, Outcome::Mapped(converted("X", 11, Strand::Plus)));
    }

    #[test]
    fn test_unmapped_ambiguous_key_error() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        let chr1 = ChromosomeToken::new("1");
        assert_eq!(classifier.classify(&chr1, 5000).unwrap(), Outcome::Unmapped);
        assert_eq!(classifier.classify(&chr1, 103).unwrap(), Outcome::Ambiguous(2));
        assert_eq!(
            classifier.classify(&ChromosomeToken::new("2"), 1).unwrap(),
            Outcome::Unmapped
        );
        assert_eq!(
            classifier.classify(&ChromosomeToken::new("chr9"), 1).unwrap(),
            Outcome::KeyError
        );
    }

    #[test]
    fn test_foreign_chromosome() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        let outcome = classifier.classify(&ChromosomeToken::new("1"), 102).unwrap();
        assert_eq!(
            outcome,
            Outcome::ForeignChromosome("chr1_gl000191_random".to_string())
        );
        assert!(outcome.converted().is_none());
    }

    #[test]
    fn test_cross_chromosome_mismatch() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        let outcome = classifier.classify(&ChromosomeToken::new("chr1"), 101).unwrap();
        assert_eq!(
            outcome,
            Outcome::CrossChromosomeMismatch(converted("2", 701, Strand::Minus))
        );
        assert_eq!(outcome.converted().unwrap().chromosome, "2");
    }

    #[test]
    fn test_position_below_offset() {
        let classifier = Classifier::new(lookup(), CoordinateSystem::OneBased);
        assert_eq!(
            classifier.classify(&ChromosomeToken::new("1"), 0),
            Err(InvalidPosition {
                position: 0,
                system: CoordinateSystem::OneBased
            })
        );
        let zero_based = Classifier::new(lookup(), CoordinateSystem::ZeroBased);
        assert!(zero_based.classify(&ChromosomeToken::new("X"), 0).is_ok());
    }
}
