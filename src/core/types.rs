/// Numbering convention of the input positions.
///
/// Chain lookups are 0-based; 1-based input is shifted down by one before the
/// lookup and back up by one before the result is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    ZeroBased,
    #[default]
    OneBased,
}

impl CoordinateSystem {
    #[must_use]
    pub fn offset(self) -> u64 {
        match self {
            Self::ZeroBased => 0,
            Self::OneBased => 1,
        }
    }
}

/// Orientation of a converted coordinate relative to the target build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// A single converted coordinate as reported by a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPosition {
    /// Chromosome name as it appears in the index (may carry a `chr` prefix)
    pub chromosome: String,
    /// 0-based position
    pub position: u64,
    pub strand: Strand,
}

impl MappedPosition {
    pub fn new(chromosome: impl Into<String>, position: u64, strand: Strand) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            strand,
        }
    }
}

/// Answer of a coordinate lookup for one (chromosome, position) query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingResult {
    /// The chromosome does not appear in the index at all
    UnknownChromosome,
    /// The chromosome is known but nothing covers the position
    NotFound,
    /// More than one candidate covers the position
    Ambiguous(usize),
    Found(MappedPosition),
}

/// Classification of one converted coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    Mapped,
    Unmapped,
    Ambiguous,
    KeyError,
    ForeignChromosome,
    CrossChromosomeMismatch,
}

impl OutcomeKind {
    pub const ALL: [Self; 6] = [
        Self::Mapped,
        Self::Unmapped,
        Self::Ambiguous,
        Self::KeyError,
        Self::ForeignChromosome,
        Self::CrossChromosomeMismatch,
    ];

    /// Outcomes that leave no usable coordinate behind
    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, Self::Unmapped | Self::Ambiguous | Self::KeyError)
    }

    /// Short label used in summaries and warnings
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::Unmapped => "unmapped",
            Self::Ambiguous => "multiple",
            Self::KeyError => "unknown_chromosome",
            Self::ForeignChromosome => "foreign_chromosome",
            Self::CrossChromosomeMismatch => "not_same_chromosome",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
